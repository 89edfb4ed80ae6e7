// ABOUTME: Video endpoint handlers: upload, list, delete
// ABOUTME: Upload requires authentication; deletion additionally requires authorship
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vidpod.org

use crate::database::VideoWithAuthor;
use crate::errors::AppResult;
use crate::middleware::{AuthGuard, Capability};
use crate::pagination::Page;
use crate::videos::VideoService;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Video upload request. `filename` references the artifact handed to the
/// external storage pipeline; only the metadata lands in this core.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadVideoRequest {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub filename: String,
}

/// Public view of a ledger entry with its author embedded
#[derive(Debug, Clone, Serialize)]
pub struct VideoResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub author: String,
    pub filename: String,
    #[serde(rename = "createdDate")]
    pub created_at: DateTime<Utc>,
}

impl From<VideoWithAuthor> for VideoResponse {
    fn from(entry: VideoWithAuthor) -> Self {
        Self {
            id: entry.video.id,
            name: entry.video.name,
            description: entry.video.description,
            tags: entry.video.tags,
            author: entry.author,
            filename: entry.video.filename,
            created_at: entry.video.created_at,
        }
    }
}

/// Handlers for the videos endpoint group
#[derive(Clone)]
pub struct VideoRoutes {
    guard: Arc<AuthGuard>,
    videos: Arc<VideoService>,
}

impl VideoRoutes {
    #[must_use]
    pub const fn new(guard: Arc<AuthGuard>, videos: Arc<VideoService>) -> Self {
        Self { guard, videos }
    }

    /// Upload a video (authenticated callers only). The authenticated
    /// subject becomes the immutable author of the record.
    ///
    /// # Errors
    /// 401 without a valid token; no state changes on a rejected call
    pub async fn upload(
        &self,
        authorization: Option<&str>,
        request: UploadVideoRequest,
    ) -> AppResult<Uuid> {
        let author = self
            .guard
            .require(authorization, Capability::Authenticated)
            .await?;

        let video = self
            .videos
            .publish(
                &author,
                &request.name,
                &request.description,
                request.tags,
                &request.filename,
            )
            .await?;

        Ok(video.id)
    }

    /// List all videos (public)
    ///
    /// # Errors
    /// Internal errors only
    pub async fn list(&self) -> AppResult<Page<VideoResponse>> {
        let page = self.videos.list().await?;

        Ok(Page::new(
            page.total,
            page.data.into_iter().map(VideoResponse::from).collect(),
        ))
    }

    /// Delete a video (author or admin)
    ///
    /// # Errors
    /// 401 without a valid token, 403 for someone else's video, 404 for
    /// an unknown id
    pub async fn delete(&self, authorization: Option<&str>, video_id: Uuid) -> AppResult<()> {
        self.guard
            .require(authorization, Capability::VideoOwner(video_id))
            .await?;

        self.videos.remove(video_id).await
    }
}
