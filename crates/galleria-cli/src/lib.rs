//! CLI logic for the Galleria gallery generator.
//!
//! This module contains the core CLI logic: configuration loading, applying
//! command-line overrides and driving the gallery pipeline to an SVG file.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;
pub use config::load_config;

use std::{env, fs};

use log::{debug, info};

use galleria::{
    GalleryBuilder, GalleryError,
    config::{AppConfig, AvatarFailurePolicy},
};

/// Environment variable consulted for an API token.
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Run the Galleria CLI application
///
/// This function fetches the contributor listing of the requested repository,
/// renders the gallery and writes the resulting SVG to the output file. The
/// file is only written once the whole pipeline succeeded.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `GalleryError` for:
/// - Configuration loading errors
/// - Directory failures
/// - Avatar failures under the abort policy
/// - File I/O errors
pub fn run(args: &Args) -> Result<(), GalleryError> {
    info!(
        owner = args.owner,
        repo = args.repo;
        "Generating contributor gallery"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    apply_overrides(&mut app_config, args, env::var(TOKEN_ENV_VAR).ok());
    debug!(gallery:? = app_config.gallery(); "Effective gallery configuration");

    let output = output_path(args, &app_config);
    let builder = GalleryBuilder::new(app_config)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let svg = runtime.block_on(builder.build(&args.owner, &args.repo))?;

    fs::write(&output, svg)?;

    info!(output_file = output; "SVG exported successfully");

    Ok(())
}

/// Apply command-line flags and the environment token on top of the loaded
/// configuration.
///
/// Flags win over the file. The environment token is only used when the
/// file carries none.
fn apply_overrides(config: &mut AppConfig, args: &Args, env_token: Option<String>) {
    let gallery = config.gallery_mut();
    if let Some(size) = args.avatar_size {
        *gallery = gallery.clone().with_avatar_size(size);
    }
    if let Some(per_row) = args.num_per_row {
        *gallery = gallery.clone().with_columns_per_row(per_row);
    }
    if args.skip_failed_avatars {
        *gallery = gallery.clone().with_on_avatar_error(AvatarFailurePolicy::Skip);
    }

    let network = config.network_mut();
    if network.token().is_none() {
        if let Some(token) = env_token.filter(|token| !token.is_empty()) {
            *network = network.clone().with_token(Some(token));
        }
    }
}

fn output_path(args: &Args, config: &AppConfig) -> String {
    args.output.clone().unwrap_or_else(|| {
        format!(
            "contributors_{}_{}_{}.svg",
            args.owner,
            args.repo,
            config.gallery().columns_per_row()
        )
    })
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use galleria::config::{GalleryConfig, NetworkConfig};

    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["galleria", "-o", "acme", "-r", "widgets"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_default_output_path_uses_columns_per_row() {
        let args = parse(&[]);
        let config = AppConfig::default();
        assert_eq!(output_path(&args, &config), "contributors_acme_widgets_10.svg");
    }

    #[test]
    fn test_explicit_output_path() {
        let args = parse(&["--output", "out/gallery.svg"]);
        assert_eq!(output_path(&args, &AppConfig::default()), "out/gallery.svg");
    }

    #[test]
    fn test_flags_override_file() {
        let args = parse(&["-a", "64", "-n", "4", "--skip-failed-avatars"]);
        let mut config = AppConfig::new(
            GalleryConfig::default().with_avatar_size(20).with_columns_per_row(7),
            NetworkConfig::default(),
        );

        apply_overrides(&mut config, &args, None);

        assert_eq!(config.gallery().avatar_size(), 64);
        assert_eq!(config.gallery().columns_per_row(), 4);
        assert_eq!(config.gallery().on_avatar_error(), AvatarFailurePolicy::Skip);
        assert_eq!(output_path(&args, &config), "contributors_acme_widgets_4.svg");
    }

    #[test]
    fn test_environment_token_fills_missing_token() {
        let args = parse(&[]);
        let mut config = AppConfig::default();

        apply_overrides(&mut config, &args, Some("from-env".to_string()));
        assert_eq!(config.network().token(), Some("from-env"));
    }

    #[test]
    fn test_file_token_wins_over_environment() {
        let args = parse(&[]);
        let mut config = AppConfig::new(
            GalleryConfig::default(),
            NetworkConfig::default().with_token(Some("from-file".to_string())),
        );

        apply_overrides(&mut config, &args, Some("from-env".to_string()));
        assert_eq!(config.network().token(), Some("from-file"));
    }

    #[test]
    fn test_empty_environment_token_is_ignored() {
        let args = parse(&[]);
        let mut config = AppConfig::default();

        apply_overrides(&mut config, &args, Some(String::new()));
        assert_eq!(config.network().token(), None);
    }
}
