//! Galleria - SVG galleries of circular, clickable contributor avatars.
//!
//! Fetching, masking, layout and SVG composition for contributor galleries.
//! The pipeline retrieves the full contributor listing of a repository,
//! downloads and circularly masks every avatar, places the avatars on a
//! row-major grid and embeds them inline in a single SVG document.

pub mod avatar;
pub mod config;
pub mod export;

mod error;

pub use galleria_core::{entity, geometry, layout};

pub use error::GalleryError;

use std::pin::pin;

use futures_util::{StreamExt, stream};
use log::{debug, info, warn};

use galleria_directory::DirectoryClient;

use avatar::AvatarTransformer;
use config::{AppConfig, AvatarFailurePolicy};
use entity::DirectoryListing;
use export::svg::SvgComposer;
use layout::GridLayout;

/// Builder for fetching and rendering contributor galleries.
///
/// # Examples
///
/// ```rust,no_run
/// use galleria::{GalleryBuilder, config::AppConfig};
///
/// # async fn run() -> Result<(), galleria::GalleryError> {
/// let builder = GalleryBuilder::new(AppConfig::default())?;
///
/// // Fetch the listing, then render it
/// let listing = builder.fetch_listing("taichi-dev", "taichi").await?;
/// let svg = builder.render_svg(&listing).await?;
///
/// // Or do both at once
/// let svg = builder.build("taichi-dev", "taichi").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GalleryBuilder {
    config: AppConfig,
    client: DirectoryClient,
}

impl GalleryBuilder {
    /// Create a new gallery builder with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::Config`] for an invalid configuration and
    /// [`GalleryError::Directory`] if the HTTP client cannot be created.
    pub fn new(config: AppConfig) -> Result<Self, GalleryError> {
        config.validate()?;
        let client = DirectoryClient::new(config.network().client_options()?)?;
        Ok(Self { config, client })
    }

    /// Returns the configuration the builder was created with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Retrieve the complete contributor listing of `owner/repo`.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::Directory`] when a listing page stays
    /// unavailable after every retry.
    pub async fn fetch_listing(&self, owner: &str, repo: &str) -> Result<DirectoryListing, GalleryError> {
        Ok(self.client.fetch(owner, repo).await?)
    }

    /// Render a listing to an SVG string.
    ///
    /// Avatars are downloaded and masked concurrently, but placements are
    /// assigned in listing order by a single sequential pass, so the output
    /// does not depend on download timing.
    ///
    /// # Errors
    ///
    /// With [`AvatarFailurePolicy::Abort`] the first avatar failure, in
    /// listing order, is returned. With [`AvatarFailurePolicy::Skip`] failing
    /// contributors are left out and only encoding errors abort.
    pub async fn render_svg(&self, listing: &DirectoryListing) -> Result<String, GalleryError> {
        let gallery = self.config.gallery();
        let concurrency = self.config.network().concurrency();

        info!(
            entities = listing.len(),
            avatar_size = gallery.avatar_size(),
            columns_per_row = gallery.columns_per_row(),
            concurrency = concurrency;
            "Rendering gallery"
        );

        let transformer = AvatarTransformer::new(&self.client, gallery.avatar_size());
        let mut layout = GridLayout::new(gallery.avatar_size(), gallery.columns_per_row());
        let mut composer = SvgComposer::new(gallery.avatar_size());
        let mut skipped = 0usize;

        let mut avatars = pin!(
            stream::iter(listing.iter())
                .map(|entity| {
                    let transformer = &transformer;
                    async move { (entity, transformer.transform(entity).await) }
                })
                .buffered(concurrency)
        );

        while let Some((entity, result)) = avatars.next().await {
            let avatar = match result {
                Ok(avatar) => avatar,
                Err(err) if err.is_per_avatar() && gallery.on_avatar_error() == AvatarFailurePolicy::Skip => {
                    warn!(id = entity.id(), err:% = err; "Skipping contributor");
                    skipped += 1;
                    continue;
                }
                Err(err) => return Err(err),
            };

            let placement = layout.place();
            debug!(id = entity.id(), placement:% = placement; "Avatar placed");
            composer.push(entity, &avatar, placement);
        }

        let bounds = layout.canvas_bounds();
        info!(
            placed = layout.placed(),
            skipped = skipped,
            bounds:% = bounds;
            "Gallery laid out"
        );

        Ok(composer.finish(bounds))
    }

    /// Fetch the listing of `owner/repo` and render it.
    ///
    /// # Errors
    ///
    /// See [`fetch_listing`](Self::fetch_listing) and
    /// [`render_svg`](Self::render_svg).
    pub async fn build(&self, owner: &str, repo: &str) -> Result<String, GalleryError> {
        let listing = self.fetch_listing(owner, repo).await?;
        self.render_svg(&listing).await
    }
}
