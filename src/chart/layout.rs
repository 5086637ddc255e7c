//! Pie geometry: title position, pie disc, slice angles and legend rows.
//!
//! Shared by every renderer and by tooltip hit-testing, so a point on the
//! exported image maps to the same slice the renderer drew there.

use super::spec::{LegendPosition, PieSpec};
use crate::geometry::{Point, Rect};
use std::f32::consts::TAU;

/// Height reserved for the title.
pub const TITLE_HEIGHT: f32 = 36.0;
/// Title font size.
pub const TITLE_FONT_SIZE: f32 = 16.0;
/// Legend font size.
pub const LEGEND_FONT_SIZE: f32 = 12.0;
/// Height of one legend row (font plus padding).
pub const LEGEND_ROW_HEIGHT: f32 = LEGEND_FONT_SIZE + 10.0;
/// Radius of the point-style legend swatch.
pub const LEGEND_SWATCH_RADIUS: f32 = 5.0;

const PADDING: f32 = 10.0;
const SIDE_LEGEND_FRACTION: f32 = 0.38;
const STACKED_LEGEND_MAX_FRACTION: f32 = 0.4;

/// One slice as a pair of clock angles (radians, clockwise from 12 o'clock).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceAngles {
    /// Start angle.
    pub start: f32,
    /// End angle, `>= start`.
    pub end: f32,
}

impl SliceAngles {
    /// Middle of the slice.
    #[must_use]
    pub fn mid(&self) -> f32 {
        (self.start + self.end) / 2.0
    }

    /// Angular size of the slice.
    #[must_use]
    pub fn span(&self) -> f32 {
        self.end - self.start
    }
}

/// Anchor points of one legend row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendRow {
    /// Center of the swatch.
    pub swatch: Point,
    /// Start of the text baseline.
    pub text: Point,
}

/// Resolved geometry of a pie on a surface of a given size.
#[derive(Debug, Clone, PartialEq)]
pub struct PieLayout {
    /// Center of the title baseline.
    pub title: Point,
    /// Pie center.
    pub center: Point,
    /// Pie radius.
    pub radius: f32,
    /// Slice angles, parallel to `PieSpec::values`.
    pub slices: Vec<SliceAngles>,
    /// Legend rows, parallel to `PieSpec::labels`.
    pub legend: Vec<LegendRow>,
}

impl PieLayout {
    /// Lay out `spec` on a `width` x `height` surface.
    #[must_use]
    pub fn compute(width: u32, height: u32, spec: &PieSpec) -> Self {
        let (w, h) = (width as f32, height as f32);
        let title = Point::new(w / 2.0, PADDING + TITLE_FONT_SIZE);
        let body = Rect::new(0.0, TITLE_HEIGHT, w, (h - TITLE_HEIGHT).max(0.0)).inset(PADDING);

        let rows = spec.labels.len();
        let (plot, legend_area) = split_body(body, spec.style.legend_position, rows);

        let radius = (plot.width.min(plot.height) / 2.0 - spec.style.border_width).max(0.0);

        Self {
            title,
            center: plot.center(),
            radius,
            slices: slice_angles(&spec.values),
            legend: legend_rows(legend_area, spec.style.legend_position, rows),
        }
    }

    /// Index of the slice under `point`, if any.
    #[must_use]
    pub fn slice_at(&self, point: Point) -> Option<usize> {
        if self.center.distance(point) > self.radius {
            return None;
        }
        let angle = self.center.clock_angle_to(point);
        self.slices
            .iter()
            .position(|s| angle >= s.start && angle < s.end)
    }
}

fn split_body(body: Rect, position: LegendPosition, rows: usize) -> (Rect, Rect) {
    let stacked = (rows as f32 * LEGEND_ROW_HEIGHT).min(body.height * STACKED_LEGEND_MAX_FRACTION);
    let side = body.width * SIDE_LEGEND_FRACTION;

    match position {
        LegendPosition::Right => (
            Rect::new(body.x, body.y, body.width - side, body.height),
            Rect::new(body.x + body.width - side, body.y, side, body.height),
        ),
        LegendPosition::Left => (
            Rect::new(body.x + side, body.y, body.width - side, body.height),
            Rect::new(body.x, body.y, side, body.height),
        ),
        LegendPosition::Top => (
            Rect::new(body.x, body.y + stacked, body.width, body.height - stacked),
            Rect::new(body.x, body.y, body.width, stacked),
        ),
        LegendPosition::Bottom => (
            Rect::new(body.x, body.y, body.width, body.height - stacked),
            Rect::new(body.x, body.y + body.height - stacked, body.width, stacked),
        ),
    }
}

fn legend_rows(area: Rect, position: LegendPosition, rows: usize) -> Vec<LegendRow> {
    let needed = rows as f32 * LEGEND_ROW_HEIGHT;
    let top = area.y + ((area.height - needed) / 2.0).max(0.0);
    let left = match position {
        LegendPosition::Left | LegendPosition::Right => area.x,
        LegendPosition::Top | LegendPosition::Bottom => area.x + area.width / 4.0,
    };

    (0..rows)
        .map(|i| {
            let y = top + (i as f32 + 0.5) * LEGEND_ROW_HEIGHT;
            let swatch = Point::new(left + LEGEND_SWATCH_RADIUS + 2.0, y);
            LegendRow {
                swatch,
                text: Point::new(swatch.x + LEGEND_SWATCH_RADIUS + 8.0, y + LEGEND_FONT_SIZE / 3.0),
            }
        })
        .collect()
}

fn slice_angles(values: &[f64]) -> Vec<SliceAngles> {
    let total: f64 = values.iter().sum();
    if values.is_empty() || total <= 0.0 {
        return Vec::new();
    }

    let mut acc = 0.0;
    let mut slices: Vec<SliceAngles> = values
        .iter()
        .map(|v| {
            let start = (acc / total) as f32 * TAU;
            acc += v;
            SliceAngles {
                start,
                end: (acc / total) as f32 * TAU,
            }
        })
        .collect();

    if let Some(last) = slices.last_mut() {
        last.end = TAU;
    }
    slices
}
