//! Output encoders (PNG, SVG).

mod png_encoder;
mod svg;

pub use png_encoder::{png_data_url, PngEncoder};
pub use svg::{SvgElement, SvgEncoder, TextAnchor};
