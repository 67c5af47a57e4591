//! Configuration types for Galleria gallery generation.
//!
//! This module provides configuration structures that control the gallery
//! geometry and how the remote directory is contacted. All types implement
//! [`serde::Deserialize`] and every field has a default, so a partial TOML
//! file is enough.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining gallery and network settings.
//! - [`GalleryConfig`] - Avatar size, columns per row and the avatar failure policy.
//! - [`NetworkConfig`] - Directory endpoint, timeout, retry backoff and concurrency.
//!
//! # Example
//!
//! ```
//! # use galleria::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.gallery().avatar_size(), 48);
//! assert_eq!(config.gallery().columns_per_row(), 10);
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use galleria_directory::{
    ClientOptions, DEFAULT_API_BASE, RetryPolicy, retry::DEFAULT_MAX_ATTEMPTS,
};

use galleria_core::layout::GridLayout;

use crate::error::GalleryError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Gallery geometry section.
    #[serde(default)]
    gallery: GalleryConfig,

    /// Network section.
    #[serde(default)]
    network: NetworkConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(gallery: GalleryConfig, network: NetworkConfig) -> Self {
        Self { gallery, network }
    }

    /// Returns the gallery configuration.
    pub fn gallery(&self) -> &GalleryConfig {
        &self.gallery
    }

    /// Returns a mutable reference to the gallery configuration.
    pub fn gallery_mut(&mut self) -> &mut GalleryConfig {
        &mut self.gallery
    }

    /// Returns the network configuration.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Returns a mutable reference to the network configuration.
    pub fn network_mut(&mut self) -> &mut NetworkConfig {
        &mut self.network
    }

    /// Checks that the configuration describes a buildable gallery.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<(), GalleryError> {
        if self.gallery.avatar_size == 0 {
            return Err(GalleryError::Config(
                "gallery.avatar_size must be at least 1".to_string(),
            ));
        }
        if self.gallery.columns_per_row == 0 {
            return Err(GalleryError::Config(
                "gallery.columns_per_row must be at least 1".to_string(),
            ));
        }
        if GridLayout::checked_canvas_width(self.gallery.avatar_size, self.gallery.columns_per_row)
            .is_none()
        {
            return Err(GalleryError::Config(format!(
                "gallery of {} avatars of {} px per row is wider than {} px",
                self.gallery.columns_per_row,
                self.gallery.avatar_size,
                u32::MAX
            )));
        }
        if self.network.concurrency == 0 {
            return Err(GalleryError::Config(
                "network.concurrency must be at least 1".to_string(),
            ));
        }
        self.network.api_base_url()?;
        Ok(())
    }
}

/// What to do when one avatar cannot be downloaded or decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvatarFailurePolicy {
    /// Abort the whole run with the avatar's error.
    #[default]
    Abort,
    /// Leave the contributor out of the gallery and continue.
    Skip,
}

/// Gallery geometry and failure handling.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Displayed side length of each avatar, in pixels.
    avatar_size: u32,

    /// Avatars per row before wrapping.
    columns_per_row: u32,

    /// Policy for per-avatar failures.
    on_avatar_error: AvatarFailurePolicy,
}

impl GalleryConfig {
    /// Returns the avatar side length.
    pub fn avatar_size(&self) -> u32 {
        self.avatar_size
    }

    /// Returns the number of avatars per row.
    pub fn columns_per_row(&self) -> u32 {
        self.columns_per_row
    }

    /// Returns the avatar failure policy.
    pub fn on_avatar_error(&self) -> AvatarFailurePolicy {
        self.on_avatar_error
    }

    /// Sets the avatar side length (builder style).
    pub fn with_avatar_size(mut self, avatar_size: u32) -> Self {
        self.avatar_size = avatar_size;
        self
    }

    /// Sets the number of avatars per row (builder style).
    pub fn with_columns_per_row(mut self, columns_per_row: u32) -> Self {
        self.columns_per_row = columns_per_row;
        self
    }

    /// Sets the avatar failure policy (builder style).
    pub fn with_on_avatar_error(mut self, policy: AvatarFailurePolicy) -> Self {
        self.on_avatar_error = policy;
        self
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            avatar_size: 48,
            columns_per_row: 10,
            on_avatar_error: AvatarFailurePolicy::default(),
        }
    }
}

/// How the remote directory and avatar hosts are contacted.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Base URL of the directory API.
    api_base_url: String,

    /// Per-attempt request timeout, in seconds.
    timeout_secs: u64,

    /// Base delay between attempts, in milliseconds.
    retry_backoff_ms: u64,

    /// Avatars downloaded and transformed at the same time.
    concurrency: usize,

    /// Optional bearer token for listing requests.
    token: Option<String>,
}

impl NetworkConfig {
    /// Returns the parsed directory base URL.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::Config`] if the configured string is not an
    /// absolute URL.
    pub fn api_base_url(&self) -> Result<Url, GalleryError> {
        Url::parse(&self.api_base_url).map_err(|err| {
            GalleryError::Config(format!(
                "Invalid network.api_base_url '{}': {err}",
                self.api_base_url
            ))
        })
    }

    /// Returns the per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the retry policy derived from the backoff setting.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            DEFAULT_MAX_ATTEMPTS,
            Duration::from_millis(self.retry_backoff_ms),
        )
    }

    /// Returns the download concurrency.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the configured token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Sets the directory base URL (builder style).
    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self
    }

    /// Sets the base retry delay (builder style).
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the download concurrency (builder style).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Sets the bearer token (builder style).
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Builds directory client options from this section.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::Config`] for an invalid base URL.
    pub fn client_options(&self) -> Result<ClientOptions, GalleryError> {
        Ok(ClientOptions::new(self.api_base_url()?)
            .with_timeout(self.timeout())
            .with_retry(self.retry_policy())
            .with_token(self.token.clone()))
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            timeout_secs: 30,
            retry_backoff_ms: 250,
            concurrency: 8,
            token: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.gallery().avatar_size(), 48);
        assert_eq!(config.gallery().columns_per_row(), 10);
        assert_eq!(config.gallery().on_avatar_error(), AvatarFailurePolicy::Abort);
        assert_eq!(config.network().timeout(), Duration::from_secs(30));
        assert_eq!(config.network().concurrency(), 8);
        assert_eq!(config.network().retry_policy().max_attempts(), 3);
        assert_eq!(
            config.network().api_base_url().unwrap().as_str(),
            "https://api.github.com/"
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [gallery]
            columns_per_row = 3
            on_avatar_error = "skip"

            [network]
            retry_backoff_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.gallery().avatar_size(), 48);
        assert_eq!(config.gallery().columns_per_row(), 3);
        assert_eq!(config.gallery().on_avatar_error(), AvatarFailurePolicy::Skip);
        assert_eq!(config.network().retry_policy().backoff(), Duration::ZERO);
        assert_eq!(config.network().timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_validate_rejects_zero_geometry() {
        let mut config = AppConfig::default();
        *config.gallery_mut() = GalleryConfig::default().with_columns_per_row(0);
        assert!(matches!(config.validate(), Err(GalleryError::Config(_))));

        *config.gallery_mut() = GalleryConfig::default().with_avatar_size(0);
        assert!(matches!(config.validate(), Err(GalleryError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_overflowing_width() {
        let mut config = AppConfig::default();
        *config.gallery_mut() = GalleryConfig::default()
            .with_avatar_size(100_000)
            .with_columns_per_row(100_000);
        assert!(matches!(config.validate(), Err(GalleryError::Config(msg)) if msg.contains("wider than")));

        *config.gallery_mut() = GalleryConfig::default()
            .with_avatar_size(u32::MAX)
            .with_columns_per_row(1);
        assert!(matches!(config.validate(), Err(GalleryError::Config(_))));

        *config.gallery_mut() = GalleryConfig::default()
            .with_avatar_size(4096)
            .with_columns_per_row(1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_network() {
        let mut config = AppConfig::default();
        *config.network_mut() = NetworkConfig::default().with_api_base_url("not a url");
        assert!(matches!(config.validate(), Err(GalleryError::Config(_))));

        *config.network_mut() = NetworkConfig::default().with_concurrency(0);
        assert!(matches!(config.validate(), Err(GalleryError::Config(_))));
    }
}
