//! Sub-renderers composed by the chart builders.
//!
//! Every renderer draws in its own local coordinates through a
//! [`LocalCanvas`] and returns a [`HitLayer`] for pointer hit tests.

mod axis;
mod canvas;
mod format;
mod hit;
mod interpolate;
mod legend;
mod line;
mod multi_bar;
mod pie;
mod stacked_area;
mod text_metrics;

pub use axis::{AxisOrientation, AxisRenderer, AxisShift, AxisTick};
pub use canvas::{LocalCanvas, circle_points};
pub use format::{
    ValueFormatterFn, format_grouped, grouped_formatter, precision_for_step, utc_time_formatter,
};
pub use hit::{HitLayer, HitRegion, HitShape, clockwise_angle};
pub use interpolate::{Interpolation, interpolate};
pub use legend::{
    LegendAlign, LegendItem, LegendLayout, LegendMetrics, LegendRenderer, solo_disabled,
    toggle_disabled,
};
pub use line::LineRenderer;
pub use multi_bar::MultiBarRenderer;
pub use pie::{PieArc, PieLabelType, PieRenderer, PieSlice, pie_arcs};
pub use stacked_area::StackedAreaRenderer;
pub use text_metrics::estimate_label_text_width_px;

use serde::{Deserialize, Serialize};

use crate::core::{Series, YAxis};
use crate::render::Color;

/// Sub-chart pipeline that produced drawing output in a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubChart {
    Bars(YAxis),
    Lines(YAxis),
    StackedArea(YAxis),
    Pie,
}

/// Paint order of the composite pipelines. Hit tests walk it backwards.
pub const COMPOSITE_DRAW_ORDER: [SubChart; 6] = [
    SubChart::Bars(YAxis::Primary),
    SubChart::Bars(YAxis::Secondary),
    SubChart::Lines(YAxis::Primary),
    SubChart::Lines(YAxis::Secondary),
    SubChart::StackedArea(YAxis::Primary),
    SubChart::StackedArea(YAxis::Secondary),
];

/// Series paired with its index in the chart data and its resolved color.
#[derive(Debug, Clone, Copy)]
pub struct ColoredSeries<'a> {
    pub index: usize,
    pub series: &'a Series,
    pub color: Color,
}

/// d3 `category20` palette.
pub const CATEGORY20: [Color; 20] = [
    Color::from_rgb8(0x1f, 0x77, 0xb4),
    Color::from_rgb8(0xae, 0xc7, 0xe8),
    Color::from_rgb8(0xff, 0x7f, 0x0e),
    Color::from_rgb8(0xff, 0xbb, 0x78),
    Color::from_rgb8(0x2c, 0xa0, 0x2c),
    Color::from_rgb8(0x98, 0xdf, 0x8a),
    Color::from_rgb8(0xd6, 0x27, 0x28),
    Color::from_rgb8(0xff, 0x98, 0x96),
    Color::from_rgb8(0x94, 0x67, 0xbd),
    Color::from_rgb8(0xc5, 0xb0, 0xd5),
    Color::from_rgb8(0x8c, 0x56, 0x4b),
    Color::from_rgb8(0xc4, 0x9c, 0x94),
    Color::from_rgb8(0xe3, 0x77, 0xc2),
    Color::from_rgb8(0xf7, 0xb6, 0xd2),
    Color::from_rgb8(0x7f, 0x7f, 0x7f),
    Color::from_rgb8(0xc7, 0xc7, 0xc7),
    Color::from_rgb8(0xbc, 0xbd, 0x22),
    Color::from_rgb8(0xdb, 0xdb, 0x8d),
    Color::from_rgb8(0x17, 0xbe, 0xcf),
    Color::from_rgb8(0x9e, 0xda, 0xe5),
];

/// Explicit color if set, otherwise the palette entry for `index`.
#[must_use]
pub fn resolve_color(explicit: Option<Color>, palette: &[Color], index: usize) -> Color {
    explicit
        .or_else(|| {
            if palette.is_empty() {
                None
            } else {
                Some(palette[index % palette.len()])
            }
        })
        .unwrap_or(CATEGORY20[index % CATEGORY20.len()])
}
