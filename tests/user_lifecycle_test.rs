// ABOUTME: End-to-end scenario walking one pod through its full account lifecycle
// ABOUTME: Login, uploads, second account, deletion cascade, and post-deletion state
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vidpod.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use common::{bearer, TestPod};
use vidpod::errors::ErrorCode;
use vidpod::routes::{CreateUserRequest, UploadVideoRequest};

#[tokio::test]
async fn test_full_account_lifecycle() {
    let pod = TestPod::spawn().await.unwrap();

    // root logs in through the password grant
    let token_a = pod.login_root().await;

    // root uploads a video
    pod.resources
        .video_routes
        .upload(
            Some(&bearer(&token_a)),
            UploadVideoRequest {
                name: "my super name".to_owned(),
                description: "my super description".to_owned(),
                tags: vec!["tag1".to_owned(), "tag2".to_owned()],
                filename: "video_short.webm".to_owned(),
            },
        )
        .await
        .unwrap();

    let page = pod.resources.video_routes.list().await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].author, "root");

    // root creates a second account
    let created = pod
        .resources
        .user_routes
        .create(
            Some(&bearer(&token_a)),
            CreateUserRequest {
                username: "user_1".to_owned(),
                password: "super password".to_owned(),
            },
        )
        .await
        .unwrap();

    // the second account logs in and uploads its own video
    let token_b = pod.login("user_1", "super password").await.unwrap();
    pod.resources
        .video_routes
        .upload(
            Some(&bearer(&token_b)),
            UploadVideoRequest {
                name: "my super name 2".to_owned(),
                description: "my super description 2".to_owned(),
                tags: vec!["tag1".to_owned()],
                filename: "video_short.webm".to_owned(),
            },
        )
        .await
        .unwrap();

    let page = pod.resources.video_routes.list().await.unwrap();
    assert_eq!(page.total, 2);

    // both accounts appear in the directory
    let users = pod
        .resources
        .user_routes
        .list(Some(0), Some(2), Some("createdDate"))
        .await
        .unwrap();
    assert_eq!(users.total, 2);
    assert_eq!(users.data[0].username, "root");
    assert_eq!(users.data[1].username, "user_1");

    // root deletes the second account; the cascade removes exactly its
    // videos and leaves root's untouched
    pod.resources
        .user_routes
        .delete(Some(&bearer(&token_a)), created.id)
        .await
        .unwrap();

    let page = pod.resources.video_routes.list().await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].author, "root");
    assert_eq!(page.data[0].name, "my super name");

    // the deleted account cannot authenticate any more
    let err = pod.login("user_1", "super password").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidGrant);

    // and its outstanding token stopped working mid-session
    let err = pod
        .resources
        .video_routes
        .upload(
            Some(&bearer(&token_b)),
            UploadVideoRequest {
                name: "ghost upload".to_owned(),
                description: String::new(),
                tags: vec![],
                filename: "video_short.webm".to_owned(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthenticated);

    // root's own session is unaffected
    pod.resources
        .user_routes
        .me(Some(&bearer(&token_a)))
        .await
        .unwrap();
}
