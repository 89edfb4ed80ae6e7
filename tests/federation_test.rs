// ABOUTME: Integration tests for the federation gate
// ABOUTME: Authentication precondition and the pending/active/terminated state machine
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vidpod.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use common::{bearer, TestPod};
use vidpod::errors::ErrorCode;
use vidpod::models::PodState;
use vidpod::routes::FriendRequest;

const PEER: &str = "http://pod2.example.com:9000";

fn friend_request() -> FriendRequest {
    FriendRequest {
        host: PEER.to_owned(),
    }
}

#[tokio::test]
async fn test_make_friends_requires_authentication() {
    let pod = TestPod::spawn().await.unwrap();

    let err = pod
        .resources
        .pod_routes
        .make_friends(None, friend_request())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthenticated);
    assert_eq!(err.http_status(), 401);

    let err = pod
        .resources
        .pod_routes
        .make_friends(Some("Bearer mysupertoken"), friend_request())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthenticated);

    // No relationship was created by the rejected calls
    let page = pod.resources.pod_routes.list().await.unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_quit_friends_requires_authentication() {
    let pod = TestPod::spawn().await.unwrap();

    let err = pod
        .resources
        .pod_routes
        .quit_friends(Some("Bearer mysupertoken"), friend_request())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthenticated);
}

#[tokio::test]
async fn test_make_friends_creates_pending_relationship() {
    let pod = TestPod::spawn().await.unwrap();
    let token = pod.login_root().await;

    let relationship = pod
        .resources
        .pod_routes
        .make_friends(Some(&bearer(&token)), friend_request())
        .await
        .unwrap();

    assert_eq!(relationship.host, "pod2.example.com:9000");
    assert_eq!(relationship.state, PodState::Pending);

    let page = pod.resources.pod_routes.list().await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].state, PodState::Pending);
}

#[tokio::test]
async fn test_duplicate_friendship_is_rejected() {
    let pod = TestPod::spawn().await.unwrap();
    let token = pod.login_root().await;
    let header = bearer(&token);

    pod.resources
        .pod_routes
        .make_friends(Some(&header), friend_request())
        .await
        .unwrap();

    let err = pod
        .resources
        .pod_routes
        .make_friends(Some(&header), friend_request())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_full_relationship_state_machine() {
    let pod = TestPod::spawn().await.unwrap();
    let token = pod.login_root().await;
    let header = bearer(&token);

    pod.resources
        .pod_routes
        .make_friends(Some(&header), friend_request())
        .await
        .unwrap();

    // Peer accepts: pending -> active
    pod.resources
        .federation_service
        .accept_friend(PEER)
        .await
        .unwrap();
    let page = pod.resources.pod_routes.list().await.unwrap();
    assert_eq!(page.data[0].state, PodState::Active);

    // Quit: active -> terminated
    pod.resources
        .pod_routes
        .quit_friends(Some(&header), friend_request())
        .await
        .unwrap();
    let page = pod.resources.pod_routes.list().await.unwrap();
    assert_eq!(page.data[0].state, PodState::Terminated);

    // Quitting again finds no active relationship
    let err = pod
        .resources
        .pod_routes
        .quit_friends(Some(&header), friend_request())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    // A terminated peer may be befriended again
    let relationship = pod
        .resources
        .pod_routes
        .make_friends(Some(&header), friend_request())
        .await
        .unwrap();
    assert_eq!(relationship.state, PodState::Pending);
}

#[tokio::test]
async fn test_accept_requires_pending_state() {
    let pod = TestPod::spawn().await.unwrap();

    let err = pod
        .resources
        .federation_service
        .accept_friend(PEER)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_quit_without_active_relationship() {
    let pod = TestPod::spawn().await.unwrap();
    let token = pod.login_root().await;
    let header = bearer(&token);

    // Unknown peer
    let err = pod
        .resources
        .pod_routes
        .quit_friends(Some(&header), friend_request())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    // Pending but never accepted
    pod.resources
        .pod_routes
        .make_friends(Some(&header), friend_request())
        .await
        .unwrap();
    let err = pod
        .resources
        .pod_routes
        .quit_friends(Some(&header), friend_request())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_peer_address_validation() {
    let pod = TestPod::spawn().await.unwrap();
    let token = pod.login_root().await;
    let header = bearer(&token);

    for address in ["not a url", "ftp://pod.example.com", "http://"] {
        let err = pod
            .resources
            .pod_routes
            .make_friends(
                Some(&header),
                FriendRequest {
                    host: address.to_owned(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput, "address: {address}");
    }

    let page = pod.resources.pod_routes.list().await.unwrap();
    assert_eq!(page.total, 0);
}
