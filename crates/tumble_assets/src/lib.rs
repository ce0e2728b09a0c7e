//! Asset utilities for the tumble demo: finding the resource folder and
//! decoding the textures it holds.

pub mod image_data;
pub mod locate;

use std::path::PathBuf;

use thiserror::Error;

pub use image_data::{load_or_checker, load_rgb, ImageData};
pub use locate::{find_resource_root, TexturePaths, MARKER_FILE};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("could not decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },
}
