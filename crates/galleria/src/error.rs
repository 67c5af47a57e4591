//! Error types for Galleria operations.
//!
//! This module provides the main error type [`GalleryError`] which wraps
//! the error conditions of every pipeline stage.

use std::io;

use thiserror::Error;

use galleria_directory::DirectoryError;

/// The main error type for Galleria operations.
///
/// # Failure Scope
///
/// Directory failures, [`DirectoryError::RemoteUnavailable`] among them,
/// always abort a run. `AssetUnavailable` and `Decode` concern a single
/// contributor and are subject to the configured
/// [`AvatarFailurePolicy`](crate::config::AvatarFailurePolicy).
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Directory(#[from] DirectoryError),

    #[error("Avatar of '{id}' unavailable: {source}")]
    AssetUnavailable {
        id: String,
        #[source]
        source: DirectoryError,
    },

    #[error("Avatar of '{id}' is not a valid image: {source}")]
    Decode {
        id: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode avatar of '{id}': {source}")]
    Encode {
        id: String,
        #[source]
        source: image::ImageError,
    },
}

impl GalleryError {
    /// Whether the directory listing itself could not be retrieved.
    pub fn is_remote_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Directory(DirectoryError::RemoteUnavailable { .. })
        )
    }

    /// Whether the error concerns a single contributor rather than the run.
    pub fn is_per_avatar(&self) -> bool {
        matches!(
            self,
            Self::AssetUnavailable { .. } | Self::Decode { .. }
        )
    }
}
