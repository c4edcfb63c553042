//! Colour palettes for agent identity tags.
//!
//! The simulation never reads an agent's colour; palettes only decide which
//! tag each agent is born with.

use glam::Vec3;
use rand::Rng;

/// Predefined five-colour palettes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Palette {
    /// Warm coral and sea-green tones (default).
    #[default]
    Reef,

    /// Deep blues and teals.
    Ocean,

    /// Oranges, pinks and a dusk purple.
    Sunset,

    /// Black to white.
    Grayscale,
}

impl Palette {
    /// The five colours of this palette, RGB in 0.0-1.0.
    pub fn colors(&self) -> [Vec3; 5] {
        match self {
            Palette::Reef => [
                rgb(0x69d2e7),
                rgb(0xa7dbd8),
                rgb(0xe0e4cc),
                rgb(0xf38630),
                rgb(0xfa6900),
            ],
            Palette::Ocean => [
                rgb(0x03045e),
                rgb(0x0077b6),
                rgb(0x00b4d8),
                rgb(0x90e0ef),
                rgb(0xcaf0f8),
            ],
            Palette::Sunset => [
                rgb(0x355070),
                rgb(0x6d597a),
                rgb(0xb56576),
                rgb(0xe56b6f),
                rgb(0xeaac8b),
            ],
            Palette::Grayscale => [
                Vec3::splat(0.0),
                Vec3::splat(0.25),
                Vec3::splat(0.5),
                Vec3::splat(0.75),
                Vec3::splat(1.0),
            ],
        }
    }

    /// A uniformly random colour from the palette.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let colors = self.colors();
        colors[rng.gen_range(0..colors.len())]
    }
}

/// Unpack a `0xRRGGBB` literal into linear 0.0-1.0 channels.
fn rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}
