//! Command-line argument definitions for the Galleria CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the repository, override the gallery
//! geometry, and control output, configuration and logging.

use clap::Parser;

/// Command-line arguments for the Galleria gallery generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Organization or user owning the repository
    #[arg(short, long, visible_alias = "organization")]
    pub owner: String,

    /// Repository name
    #[arg(short, long)]
    pub repo: String,

    /// Side length of each avatar in the resulting SVG
    #[arg(short, long)]
    pub avatar_size: Option<u32>,

    /// Number of avatars per row
    #[arg(short = 'n', long)]
    pub num_per_row: Option<u32>,

    /// Path to the output SVG file
    /// [default: contributors_<owner>_<repo>_<num_per_row>.svg]
    #[arg(long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Leave out contributors whose avatar cannot be fetched or decoded
    #[arg(long)]
    pub skip_failed_avatars: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_arguments() {
        let args = Args::try_parse_from(["galleria", "-o", "taichi-dev", "-r", "taichi"]).unwrap();
        assert_eq!(args.owner, "taichi-dev");
        assert_eq!(args.repo, "taichi");
        assert_eq!(args.avatar_size, None);
        assert_eq!(args.num_per_row, None);
        assert_eq!(args.output, None);
        assert!(!args.skip_failed_avatars);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_organization_alias_and_overrides() {
        let args = Args::try_parse_from([
            "galleria",
            "--organization",
            "acme",
            "--repo",
            "widgets",
            "-a",
            "64",
            "-n",
            "5",
            "--output",
            "gallery.svg",
            "--skip-failed-avatars",
        ])
        .unwrap();

        assert_eq!(args.owner, "acme");
        assert_eq!(args.avatar_size, Some(64));
        assert_eq!(args.num_per_row, Some(5));
        assert_eq!(args.output.as_deref(), Some("gallery.svg"));
        assert!(args.skip_failed_avatars);
    }

    #[test]
    fn test_missing_repo_is_rejected() {
        assert!(Args::try_parse_from(["galleria", "-o", "acme"]).is_err());
    }
}
