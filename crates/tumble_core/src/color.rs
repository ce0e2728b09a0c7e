//! RGBA colour type used for albedo, clear colour and the flat palette.
//!
//! Stored as four `f32` values in linear light (0.0 – 1.0).
//!
//! # Example
//! ```rust,ignore
//! use tumble_core::Color;
//!
//! let grey = Color::gray(0.5);
//! let sky  = Color::from_hex(0x87CEEBFF);
//! let [r, g, b, a] = sky.to_array();
//! ```

/// Linear-space RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    // ── Constructors ────────────────────────────────────────────────────────

    /// Opaque colour from red, green, blue components.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Colour from all four components.
    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque grey with every channel set to `v`.
    #[inline]
    pub const fn gray(v: f32) -> Self {
        Self::rgb(v, v, v)
    }

    /// Construct from a packed `0xRRGGBBAA` hexadecimal value.
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 24) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let b = ((hex >> 8)  & 0xFF) as f32 / 255.0;
        let a = ((hex)        & 0xFF) as f32 / 255.0;
        Self { r, g, b, a }
    }

    /// Parse `"#RRGGBB"` or `"#RRGGBBAA"` (leading `#` optional).
    ///
    /// Returns `None` for anything else; used by the config loader.
    pub fn parse(text: &str) -> Option<Self> {
        parse_hex(text).map(Self::from_hex)
    }

    // ── Conversions ─────────────────────────────────────────────────────────

    /// Returns `[r, g, b, a]`.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Converts to a `wgpu`-compatible clear colour in `f64`.
    pub fn to_f64_array(self) -> [f64; 4] {
        [self.r as f64, self.g as f64, self.b as f64, self.a as f64]
    }

    // ── Constants ───────────────────────────────────────────────────────────

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const RED:   Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE:  Self = Self::rgb(0.0, 0.0, 1.0);
}

impl From<Color> for [f32; 4] {
    fn from(c: Color) -> Self {
        c.to_array()
    }
}

/// `#RRGGBB` / `#RRGGBBAA` to packed `0xRRGGBBAA`.
fn parse_hex(text: &str) -> Option<u32> {
    let digits = text.trim().trim_start_matches('#');
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        6 => u32::from_str_radix(digits, 16).ok().map(|v| (v << 8) | 0xFF),
        8 => u32::from_str_radix(digits, 16).ok(),
        _ => None,
    }
}
