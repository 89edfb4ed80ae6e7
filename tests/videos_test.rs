// ABOUTME: Integration tests for the video ownership ledger
// ABOUTME: Upload gating, listing with author identity, and ownership-checked deletion
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vidpod.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use common::{bearer, TestPod};
use uuid::Uuid;
use vidpod::errors::ErrorCode;
use vidpod::routes::UploadVideoRequest;

fn upload_request(name: &str) -> UploadVideoRequest {
    UploadVideoRequest {
        name: name.to_owned(),
        description: "my super description".to_owned(),
        tags: vec!["tag1".to_owned(), "tag2".to_owned()],
        filename: "video_short.webm".to_owned(),
    }
}

#[tokio::test]
async fn test_upload_requires_authentication() {
    let pod = TestPod::spawn().await.unwrap();

    let err = pod
        .resources
        .video_routes
        .upload(None, upload_request("my super name"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthenticated);
    assert_eq!(err.http_status(), 401);

    let err = pod
        .resources
        .video_routes
        .upload(Some("Bearer mysupertoken"), upload_request("my super name"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthenticated);

    // The rejected uploads left no trace in the ledger
    let page = pod.resources.video_routes.list().await.unwrap();
    assert_eq!(page.total, 0);
    assert!(page.data.is_empty());
}

#[tokio::test]
async fn test_upload_and_list() {
    let pod = TestPod::spawn().await.unwrap();
    let token = pod.login_root().await;

    let video_id = pod
        .resources
        .video_routes
        .upload(Some(&bearer(&token)), upload_request("my super name"))
        .await
        .unwrap();

    let page = pod.resources.video_routes.list().await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.data.len(), 1);

    let video = &page.data[0];
    assert_eq!(video.id, video_id);
    assert_eq!(video.name, "my super name");
    assert_eq!(video.author, "root");
    // Tag order is preserved exactly as uploaded
    assert_eq!(video.tags, vec!["tag1", "tag2"]);
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let pod = TestPod::spawn().await.unwrap();
    let token = pod.login_root().await;
    let header = bearer(&token);

    pod.resources
        .video_routes
        .upload(Some(&header), upload_request("my super name"))
        .await
        .unwrap();
    pod.resources
        .video_routes
        .upload(Some(&header), upload_request("my super name 2"))
        .await
        .unwrap();

    let page = pod.resources.video_routes.list().await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.data[0].name, "my super name 2");
    assert_eq!(page.data[1].name, "my super name");
}

#[tokio::test]
async fn test_remove_with_invalid_token() {
    let pod = TestPod::spawn().await.unwrap();
    let token = pod.login_root().await;

    let video_id = pod
        .resources
        .video_routes
        .upload(Some(&bearer(&token)), upload_request("my super name"))
        .await
        .unwrap();

    let err = pod
        .resources
        .video_routes
        .delete(Some("Bearer bad_token"), video_id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthenticated);

    // The video is still listed
    let page = pod.resources.video_routes.list().await.unwrap();
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn test_remove_with_another_users_token() {
    let pod = TestPod::spawn().await.unwrap();
    pod.create_user("user_1", "super password").await;
    let author_token = pod.login("user_1", "super password").await.unwrap();

    let video_id = pod
        .resources
        .video_routes
        .upload(Some(&bearer(&author_token)), upload_request("my super name"))
        .await
        .unwrap();

    pod.create_user("user_2", "super password").await;
    let intruder_token = pod.login("user_2", "super password").await.unwrap();

    let err = pod
        .resources
        .video_routes
        .delete(Some(&bearer(&intruder_token)), video_id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Forbidden);
    assert_eq!(err.http_status(), 403);

    let page = pod.resources.video_routes.list().await.unwrap();
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn test_remove_with_author_token() {
    let pod = TestPod::spawn().await.unwrap();
    let token = pod.login_root().await;

    let video_id = pod
        .resources
        .video_routes
        .upload(Some(&bearer(&token)), upload_request("my super name"))
        .await
        .unwrap();

    pod.resources
        .video_routes
        .delete(Some(&bearer(&token)), video_id)
        .await
        .unwrap();

    let page = pod.resources.video_routes.list().await.unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_admin_may_remove_any_video() {
    let pod = TestPod::spawn().await.unwrap();
    pod.create_user("user_1", "super password").await;
    let author_token = pod.login("user_1", "super password").await.unwrap();

    let video_id = pod
        .resources
        .video_routes
        .upload(Some(&bearer(&author_token)), upload_request("my super name"))
        .await
        .unwrap();

    let root_token = pod.login_root().await;
    pod.resources
        .video_routes
        .delete(Some(&bearer(&root_token)), video_id)
        .await
        .unwrap();

    let page = pod.resources.video_routes.list().await.unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_remove_unknown_video() {
    let pod = TestPod::spawn().await.unwrap();
    let token = pod.login_root().await;

    let err = pod
        .resources
        .video_routes
        .delete(Some(&bearer(&token)), Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_upload_validates_payload() {
    let pod = TestPod::spawn().await.unwrap();
    let token = pod.login_root().await;

    let mut request = upload_request("");
    let err = pod
        .resources
        .video_routes
        .upload(Some(&bearer(&token)), request)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    request = upload_request("my super name");
    request.filename = String::new();
    let err = pod
        .resources
        .video_routes
        .upload(Some(&bearer(&token)), request)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let page = pod.resources.video_routes.list().await.unwrap();
    assert_eq!(page.total, 0);
}
