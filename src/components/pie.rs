use std::f64::consts::TAU;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::components::{HitLayer, HitShape, LocalCanvas, ValueFormatterFn, format_grouped};
use crate::core::PieDatum;
use crate::interaction::{HoverEvent, HoverTarget};
use crate::render::{Color, TextHAlign};

/// Angular extent of one slice, clockwise from twelve o'clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieArc {
    pub index: usize,
    pub value: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl PieArc {
    #[must_use]
    pub fn fraction(self) -> f64 {
        (self.end_angle - self.start_angle) / TAU
    }
}

/// Lays slices out in input order around the full circle.
///
/// Negative and non-finite values take no room.
#[must_use]
pub fn pie_arcs(values: &[f64]) -> Vec<PieArc> {
    let sizes: Vec<f64> = values
        .iter()
        .map(|&value| if value.is_finite() { value.max(0.0) } else { 0.0 })
        .collect();
    let total: f64 = sizes.iter().sum();
    let scale = if total > 0.0 { TAU / total } else { 0.0 };

    let mut angle = 0.0;
    values
        .iter()
        .zip(&sizes)
        .enumerate()
        .map(|(index, (&value, &size))| {
            let start_angle = angle;
            angle += size * scale;
            PieArc {
                index,
                value,
                start_angle,
                end_angle: angle,
            }
        })
        .collect()
}

/// Text placed on slices large enough to carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PieLabelType {
    #[default]
    Key,
    Value,
    Percent,
}

/// One slice to draw: datum, position in the chart data and fill.
#[derive(Debug, Clone, Copy)]
pub struct PieSlice<'a> {
    pub index: usize,
    pub datum: &'a PieDatum,
    pub color: Color,
}

#[derive(Clone)]
pub struct PieRenderer {
    pub donut: bool,
    /// Inner radius as a fraction of the outer radius when `donut` is set.
    pub donut_ratio: f64,
    pub show_labels: bool,
    pub label_type: PieLabelType,
    /// Slices below this share of the circle get no label.
    pub label_threshold: f64,
    pub font_size_px: f64,
    pub value_formatter: Option<ValueFormatterFn>,
}

impl fmt::Debug for PieRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PieRenderer")
            .field("donut", &self.donut)
            .field("donut_ratio", &self.donut_ratio)
            .field("show_labels", &self.show_labels)
            .field("label_type", &self.label_type)
            .field("label_threshold", &self.label_threshold)
            .finish_non_exhaustive()
    }
}

impl Default for PieRenderer {
    fn default() -> Self {
        Self {
            donut: false,
            donut_ratio: 0.5,
            show_labels: true,
            label_type: PieLabelType::Key,
            label_threshold: 0.02,
            font_size_px: 12.0,
            value_formatter: None,
        }
    }
}

const ARC_SEGMENT_RADIANS: f64 = TAU / 96.0;

impl PieRenderer {
    fn format_value(&self, value: f64) -> String {
        match &self.value_formatter {
            Some(formatter) => formatter(value),
            None => format_grouped(value, 2),
        }
    }

    #[must_use]
    pub fn radii(&self, width: f64, height: f64) -> (f64, f64) {
        let outer = (width.min(height) * 0.5).max(0.0);
        let inner = if self.donut {
            outer * self.donut_ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        (inner, outer)
    }

    pub fn draw(
        &self,
        canvas: &mut LocalCanvas<'_>,
        slices: &[PieSlice<'_>],
        width: f64,
        height: f64,
        highlighted: Option<HoverTarget>,
    ) -> HitLayer {
        let mut layer = HitLayer::default();
        let center = (width * 0.5, height * 0.5);
        let (inner, outer) = self.radii(width, height);
        let values: Vec<f64> = slices
            .iter()
            .map(|slice| if slice.datum.disabled { 0.0 } else { slice.datum.value })
            .collect();
        let arcs = pie_arcs(&values);

        for (slice, arc) in slices.iter().zip(&arcs) {
            if arc.end_angle <= arc.start_angle {
                continue;
            }
            let mid = (arc.start_angle + arc.end_angle) * 0.5;
            let centroid = polar(center, (inner + outer) * 0.5, mid);
            let event = HoverEvent {
                pos: [centroid.0, centroid.1],
                series_key: slice.datum.label.clone(),
                series_index: slice.index,
                y_axis: None,
                point: None,
                point_index: slice.index,
                value: slice.datum.value,
                color: slice.color,
            };

            let grow = if highlighted == Some(event.target()) {
                outer * 0.03
            } else {
                0.0
            };
            canvas.polygon(
                &wedge_points(center, inner, outer + grow, arc.start_angle, arc.end_angle),
                slice.color,
            );

            if self.show_labels && arc.fraction() > self.label_threshold {
                let text = match self.label_type {
                    PieLabelType::Key => slice.datum.label.clone(),
                    PieLabelType::Value => self.format_value(slice.datum.value),
                    PieLabelType::Percent => format!("{:.0}%", arc.fraction() * 100.0),
                };
                canvas.text(
                    text,
                    (centroid.0, centroid.1 + self.font_size_px * 0.32),
                    self.font_size_px,
                    Color::rgb(0.0, 0.0, 0.0),
                    TextHAlign::Center,
                );
            }

            layer.push(
                HitShape::Wedge {
                    center,
                    inner_radius: inner,
                    outer_radius: outer,
                    start_angle: arc.start_angle,
                    end_angle: arc.end_angle,
                },
                event,
            );
        }
        layer
    }
}

fn polar(center: (f64, f64), radius: f64, angle: f64) -> (f64, f64) {
    (center.0 + radius * angle.sin(), center.1 - radius * angle.cos())
}

fn wedge_points(center: (f64, f64), inner: f64, outer: f64, start: f64, end: f64) -> Vec<(f64, f64)> {
    let segments = ((end - start) / ARC_SEGMENT_RADIANS).ceil().max(1.0) as usize;
    let angle_at = |step: usize| start + (end - start) * step as f64 / segments as f64;

    let mut points: Vec<(f64, f64)> = (0..=segments)
        .map(|step| polar(center, outer, angle_at(step)))
        .collect();
    if inner > 0.0 {
        points.extend((0..=segments).rev().map(|step| polar(center, inner, angle_at(step))));
    } else {
        points.push(center);
    }
    points
}

#[cfg(test)]
mod tests {
    use std::f64::consts::TAU;

    use super::{PieRenderer, PieSlice, pie_arcs};
    use crate::components::LocalCanvas;
    use crate::core::{PieDatum, Viewport};
    use crate::render::{Color, RenderFrame};

    #[test]
    fn arcs_split_the_circle_proportionally() {
        let arcs = pie_arcs(&[1.0, 3.0, f64::NAN]);
        assert!((arcs[0].end_angle - TAU * 0.25).abs() <= 1e-12);
        assert!((arcs[1].end_angle - TAU).abs() <= 1e-12);
        assert_eq!(arcs[2].start_angle, arcs[2].end_angle);
    }

    #[test]
    fn disabled_slices_are_skipped_but_keep_their_index() {
        let data = [
            PieDatum::new("a", 1.0).with_disabled(true),
            PieDatum::new("b", 1.0),
            PieDatum::new("c", 1.0),
        ];
        let slices: Vec<PieSlice<'_>> = data
            .iter()
            .enumerate()
            .map(|(index, datum)| PieSlice {
                index,
                datum,
                color: Color::rgb(0.5, 0.5, 0.5),
            })
            .collect();
        let mut frame = RenderFrame::new(Viewport::new(100, 100));
        let mut canvas = LocalCanvas::new(&mut frame, (0.0, 0.0));
        let layer = PieRenderer::default().draw(&mut canvas, &slices, 100.0, 100.0, None);

        assert_eq!(frame.polygons.len(), 2);
        assert!(frame.find_text("a").is_none());
        // right half of the circle belongs to "b"
        let hit = layer.hit_test((80.0, 50.0)).expect("slice b");
        assert_eq!(hit.series_index, 1);
        let other = layer.hit_test((20.0, 50.0)).expect("slice c");
        assert_eq!(other.series_index, 2);
    }

    #[test]
    fn donut_leaves_the_centre_open() {
        let renderer = PieRenderer {
            donut: true,
            ..PieRenderer::default()
        };
        assert_eq!(renderer.radii(200.0, 100.0), (25.0, 50.0));
    }
}
