//! Slice colors for an arbitrary number of categories.
//!
//! Up to twelve categories draw from a fixed palette of mutually distinct
//! colors. Beyond that, extra hues are spread with golden-ratio stepping:
//! each step adds the golden ratio conjugate to the hue (mod 1), which keeps
//! consecutive hues far apart for any count without precomputing a table.

use crate::color::{Hsla, Rgba};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Golden ratio conjugate, `(sqrt(5) - 1) / 2`.
pub const GOLDEN_RATIO_CONJUGATE: f64 = 0.618_033_988_749_895;

/// Fixed base palette, in allocation order.
pub const BASE_PALETTE: [Rgba; 12] = [
    Rgba::rgb(0xFF, 0x63, 0x84),
    Rgba::rgb(0x36, 0xA2, 0xEB),
    Rgba::rgb(0xFF, 0xCE, 0x56),
    Rgba::rgb(0x4B, 0xC0, 0xC0),
    Rgba::rgb(0x99, 0x66, 0xFF),
    Rgba::rgb(0xFF, 0x9F, 0x40),
    Rgba::rgb(0xFF, 0x6B, 0x6B),
    Rgba::rgb(0x4E, 0xCD, 0xC4),
    Rgba::rgb(0x45, 0xB7, 0xD1),
    Rgba::rgb(0x96, 0xCE, 0xB4),
    Rgba::rgb(0xFE, 0xCA, 0x57),
    Rgba::rgb(0xFF, 0x9F, 0xF3),
];

const SATURATION_STEPS: [f32; 3] = [0.65, 0.75, 0.85];
const LIGHTNESS_STEPS: [f32; 4] = [0.50, 0.58, 0.66, 0.74];

/// Produces distinct slice colors.
///
/// The starting hue for generated colors comes from the allocator's RNG, so
/// two allocators built with the same seed return identical palettes.
#[derive(Debug, Clone)]
pub struct ColorAllocator {
    rng: StdRng,
}

impl Default for ColorAllocator {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl ColorAllocator {
    /// Allocator with a reproducible starting hue.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Allocator with an OS-random starting hue.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Exactly `count` distinct colors; base palette first.
    pub fn colors(&mut self, count: usize) -> Vec<Rgba> {
        if count <= BASE_PALETTE.len() {
            return BASE_PALETTE[..count].to_vec();
        }

        let start: f64 = self.rng.gen();
        extend_golden(BASE_PALETTE.to_vec(), start, count)
    }
}

/// Append golden-ratio colors to `colors` until it holds `count` entries.
///
/// The i-th generated color cycles saturation every three steps and
/// lightness every four. A color equal to one already present is skipped and
/// the hue steps again, until the HSL grid runs out of fresh colors (thousands
/// of categories); past that point duplicates are accepted so the count is
/// still met.
fn extend_golden(mut colors: Vec<Rgba>, start_hue: f64, count: usize) -> Vec<Rgba> {
    let mut hue = start_hue.rem_euclid(1.0);
    let mut i = 0usize;
    let max_attempts = count.saturating_mul(8).saturating_add(64);

    while colors.len() < count {
        hue = (hue + GOLDEN_RATIO_CONJUGATE) % 1.0;

        let degrees = (hue * 360.0).floor() as f32;
        let color = Hsla::hsl(
            degrees,
            SATURATION_STEPS[i % SATURATION_STEPS.len()],
            LIGHTNESS_STEPS[i % LIGHTNESS_STEPS.len()],
        )
        .to_rgba();

        if i >= max_attempts || !colors.contains(&color) {
            colors.push(color);
        }
        i += 1;
    }

    colors
}
