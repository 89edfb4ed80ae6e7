// ABOUTME: Video ownership ledger service
// ABOUTME: Publishes, lists, and removes metadata records bound to their authoring account
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vidpod.org

//! # Video Ownership Ledger
//!
//! Metadata records only; the artifact bytes live in the external storage
//! pipeline and are referenced by filename. Authorship is fixed at
//! creation and enforced upstream by the authorization guard.

use crate::database::{Database, VideoWithAuthor};
use crate::errors::{AppError, AppResult};
use crate::models::{User, Video};
use crate::pagination::Page;
use std::sync::Arc;
use uuid::Uuid;

/// Video ledger service
#[derive(Clone)]
pub struct VideoService {
    database: Arc<Database>,
}

impl VideoService {
    #[must_use]
    pub const fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Record a new video owned by `author`. The guard has already
    /// authenticated the author; a valid owner and well-formed fields
    /// always succeed.
    ///
    /// # Errors
    /// Returns a validation error for an empty name or file reference
    pub async fn publish(
        &self,
        author: &User,
        name: &str,
        description: &str,
        tags: Vec<String>,
        filename: &str,
    ) -> AppResult<Video> {
        if name.is_empty() {
            return Err(AppError::validation("Video name must not be empty"));
        }
        if filename.is_empty() {
            return Err(AppError::validation("Video file reference must not be empty"));
        }

        let video = Video::new(
            author.id,
            name.to_owned(),
            description.to_owned(),
            tags,
            filename.to_owned(),
        );

        self.database.insert_video(&video).await?;

        tracing::info!(
            video_id = %video.id,
            author = %author.username,
            "Video published"
        );

        Ok(video)
    }

    /// List the full ledger, newest first, author identity embedded
    ///
    /// # Errors
    /// Returns an error if the snapshot read fails
    pub async fn list(&self) -> AppResult<Page<VideoWithAuthor>> {
        self.database.list_videos().await
    }

    /// Remove a ledger entry. Ownership was already confirmed by the
    /// guard; this simply deletes the record.
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown video
    pub async fn remove(&self, video_id: Uuid) -> AppResult<()> {
        self.database.delete_video(video_id).await?;
        tracing::info!(video_id = %video_id, "Video removed");
        Ok(())
    }
}
