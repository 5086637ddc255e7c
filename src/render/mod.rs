//! Rasterization for the framebuffer chart renderer.
//!
//! # Algorithms
//!
//! - **Wu's Anti-aliased Line**: slice borders
//! - **Midpoint Circle**: legend point markers and the pie rim
//! - **Angular scan fill**: pie wedges
//! - **Glyph coverage blending**: title and legend text (`fontdue`)
//!
//! # References
//!
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.

mod primitives;
mod text;

pub use primitives::{
    draw_circle, draw_circle_outline, draw_line_aa, draw_spoke, fill_wedge,
};
pub use text::Fonts;
