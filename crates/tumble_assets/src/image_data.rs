use std::path::Path;

use crate::AssetError;

/// Decoded 8-bit RGB pixels, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    /// `width * height * 3` bytes.
    pub pixels: Vec<u8>,
}

impl ImageData {
    /// Two-colour checkerboard with square cells of `cell` pixels.
    pub fn checkerboard(size: u32, cell: u32, a: [u8; 3], b: [u8; 3]) -> Self {
        let size = size.max(1);
        let cell = cell.max(1);
        let mut pixels = Vec::with_capacity((size * size * 3) as usize);
        for y in 0..size {
            for x in 0..size {
                let color = if (x / cell + y / cell) % 2 == 0 { a } else { b };
                pixels.extend_from_slice(&color);
            }
        }
        Self { width: size, height: size, pixels }
    }

    /// Expand to RGBA8 with opaque alpha, as the GPU upload expects.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .chunks_exact(3)
            .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
            .collect()
    }
}

/// Decode any supported file (BMP, PPM/PNM, PNG) to RGB.
pub fn load_rgb(path: &Path) -> Result<ImageData, AssetError> {
    if !path.is_file() {
        return Err(AssetError::NotFound(path.to_path_buf()));
    }
    let decoded = image::open(path).map_err(|e| AssetError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(ImageData { width, height, pixels: rgb.into_raw() })
}

/// [`load_rgb`], or a magenta/black checkerboard when the file is missing or
/// broken, so a bad install still renders.
pub fn load_or_checker(path: &Path) -> ImageData {
    match load_rgb(path) {
        Ok(image) => {
            log::debug!("loaded {} ({}x{})", path.display(), image.width, image.height);
            image
        }
        Err(err) => {
            log::warn!("{err}; using a generated checkerboard");
            ImageData::checkerboard(64, 8, [255, 0, 255], [0, 0, 0])
        }
    }
}
