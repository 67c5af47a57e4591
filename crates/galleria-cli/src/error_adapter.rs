//! Error adapter for converting GalleryError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;

use galleria::GalleryError;
use galleria_directory::DirectoryError;

/// Adapter giving a [`GalleryError`] a stable code and a hint.
pub struct ErrorAdapter<'a>(pub &'a GalleryError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            GalleryError::Io(_) => "galleria::io",
            GalleryError::Config(_) => "galleria::config",
            GalleryError::Directory(DirectoryError::RemoteUnavailable { .. }) => "galleria::remote",
            GalleryError::Directory(_) => "galleria::directory",
            GalleryError::AssetUnavailable { .. } => "galleria::asset",
            GalleryError::Decode { .. } => "galleria::decode",
            GalleryError::Encode { .. } => "galleria::encode",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            GalleryError::Directory(DirectoryError::RemoteUnavailable { .. }) => {
                "check the owner and repository names, or set GITHUB_TOKEN if the API is rate limiting you"
            }
            GalleryError::AssetUnavailable { .. } | GalleryError::Decode { .. } => {
                "pass --skip-failed-avatars to leave contributors with broken avatars out"
            }
            GalleryError::Config(_) => "see the [gallery] and [network] sections of the configuration file",
            _ => return None,
        };
        Some(Box::new(help))
    }
}

/// Renders `err` as a graphical miette report.
///
/// Falls back to the plain error message if the renderer fails.
pub fn render(err: &GalleryError) -> String {
    let handler = miette::GraphicalReportHandler::new();
    let mut rendered = String::new();

    match handler.render_report(&mut rendered, &ErrorAdapter(err)) {
        Ok(()) => rendered,
        Err(_) => err.to_string(),
    }
}
