//! Galleria Core Types and Definitions
//!
//! This crate provides the foundational types shared by every Galleria crate.
//! It includes:
//!
//! - **Entities**: Contributor records and the ordered, deduplicated
//!   [`entity::DirectoryListing`] built from them
//! - **Geometry**: [`geometry::Placement`] and [`geometry::CanvasBounds`]
//! - **Layout**: The stateful row-major [`layout::GridLayout`] cursor

pub mod entity;
pub mod geometry;
pub mod layout;
