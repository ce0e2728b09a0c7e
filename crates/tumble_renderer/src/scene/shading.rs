use tumble_core::{BodySnapshot, Color, ShapeKind};

use crate::resources::TextureId;

/// Resolved per-draw shading: a texture multiplied by a tint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shading {
    pub albedo: Color,
    pub texture: TextureId,
}

impl Shading {
    pub fn flat(color: Color) -> Self {
        Self { albedo: color, texture: TextureId::WHITE }
    }

    pub fn textured(texture: TextureId) -> Self {
        Self { albedo: Color::WHITE, texture }
    }
}

/// How bodies pick their look.
#[derive(Debug, Clone, PartialEq)]
pub enum ShadingPolicy {
    /// Colour by enumeration position modulo the palette length.
    Palette { colors: Vec<Color>, ground: Color },
    /// One texture for boxes, spheres cycle through `balls` by body id.
    Textured { boxes: TextureId, balls: Vec<TextureId>, ground: TextureId },
}

impl ShadingPolicy {
    /// Red, green, blue bodies on a mid-grey ground.
    pub fn primary_palette() -> Self {
        ShadingPolicy::Palette {
            colors: vec![Color::RED, Color::GREEN, Color::BLUE],
            ground: Color::gray(0.5),
        }
    }

    /// Shading for the `index`-th body of this frame's enumeration.
    pub fn body(&self, index: usize, body: &BodySnapshot) -> Shading {
        match self {
            ShadingPolicy::Palette { colors, .. } => {
                let color = match colors.len() {
                    0 => Color::WHITE,
                    n => colors[index % n],
                };
                Shading::flat(color)
            }
            ShadingPolicy::Textured { boxes, balls, .. } => match body.kind {
                ShapeKind::Box => Shading::textured(*boxes),
                ShapeKind::Sphere if !balls.is_empty() => {
                    Shading::textured(balls[(body.id.0 % balls.len() as u64) as usize])
                }
                _ => Shading::textured(TextureId::WHITE),
            },
        }
    }

    pub fn ground(&self) -> Shading {
        match self {
            ShadingPolicy::Palette { ground, .. } => Shading::flat(*ground),
            ShadingPolicy::Textured { ground, .. } => Shading::textured(*ground),
        }
    }
}
