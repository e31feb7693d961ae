use crate::components::{
    ColoredSeries, HitLayer, HitShape, Interpolation, LocalCanvas, circle_points, interpolate,
};
use crate::core::{LinearScale, Series, YAxis, stack_layout};
use crate::interaction::{HoverEvent, HoverTarget};
use crate::render::Color;

/// Areas stacked on a running total in input order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackedAreaRenderer {
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
    pub y_axis: YAxis,
    pub interpolation: Interpolation,
    pub fill_opacity: f64,
    pub hover_radius: f64,
    pub highlight_radius: f64,
}

impl StackedAreaRenderer {
    #[must_use]
    pub fn new(x_scale: LinearScale, y_scale: LinearScale, y_axis: YAxis) -> Self {
        Self {
            x_scale,
            y_scale,
            y_axis,
            interpolation: Interpolation::Linear,
            fill_opacity: 0.75,
            hover_radius: 20.0,
            highlight_radius: 3.5,
        }
    }

    #[must_use]
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    #[must_use]
    pub fn with_hover_radius(mut self, hover_radius: f64) -> Self {
        self.hover_radius = hover_radius;
        self
    }

    pub fn draw(
        &self,
        canvas: &mut LocalCanvas<'_>,
        series: &[ColoredSeries<'_>],
        highlighted: Option<HoverTarget>,
    ) -> HitLayer {
        let mut layer = HitLayer::default();
        let plain: Vec<&Series> = series.iter().map(|entry| entry.series).collect();
        let stacked = stack_layout(&plain, false);

        for (entry, points) in series.iter().zip(&stacked) {
            let top: Vec<(f64, f64)> = points
                .iter()
                .map(|point| (self.x_scale.map(point.x), self.y_scale.map(point.y1)))
                .collect();
            let bottom: Vec<(f64, f64)> = points
                .iter()
                .map(|point| (self.x_scale.map(point.x), self.y_scale.map(point.y0)))
                .collect();
            if top.len() >= 2 && top.iter().chain(&bottom).all(|(x, y)| x.is_finite() && y.is_finite()) {
                let mut outline = interpolate(&top, self.interpolation);
                let mut lower = interpolate(&bottom, self.interpolation);
                lower.reverse();
                outline.append(&mut lower);
                let fill = Color {
                    alpha: entry.color.alpha * self.fill_opacity,
                    ..entry.color
                };
                canvas.polygon(&outline, fill);
            }

            for (point_index, (stacked_point, &(x, y))) in points.iter().zip(&top).enumerate() {
                if !x.is_finite() || !y.is_finite() {
                    continue;
                }
                let event = HoverEvent {
                    pos: [x, y],
                    series_key: entry.series.key.clone(),
                    series_index: entry.index,
                    y_axis: Some(self.y_axis),
                    point: entry.series.values.get(point_index).copied(),
                    point_index,
                    value: stacked_point.y,
                    color: entry.color,
                };
                if highlighted == Some(event.target()) {
                    canvas.polygon(&circle_points((x, y), self.highlight_radius), entry.color);
                }
                layer.push(
                    HitShape::Point {
                        x,
                        y,
                        radius: self.hover_radius,
                    },
                    event,
                );
            }
        }
        layer
    }
}

#[cfg(test)]
mod tests {
    use super::StackedAreaRenderer;
    use crate::components::{ColoredSeries, LocalCanvas};
    use crate::core::{LinearScale, Series, SeriesKind, Viewport, YAxis};
    use crate::render::{Color, RenderFrame};

    #[test]
    fn second_area_sits_on_top_of_the_first() {
        let a = Series::new("a", SeriesKind::Area, YAxis::Primary)
            .with_points(&[(0.0, 1.0), (1.0, 1.0)]);
        let b = Series::new("b", SeriesKind::Area, YAxis::Primary)
            .with_points(&[(0.0, 2.0), (1.0, 2.0)]);
        let renderer = StackedAreaRenderer::new(
            LinearScale::new((0.0, 1.0), (0.0, 100.0)),
            LinearScale::new((0.0, 10.0), (100.0, 0.0)),
            YAxis::Primary,
        );
        let color = Color::rgb(1.0, 0.0, 0.0);
        let entries = [
            ColoredSeries {
                index: 0,
                series: &a,
                color,
            },
            ColoredSeries {
                index: 1,
                series: &b,
                color,
            },
        ];

        let mut frame = RenderFrame::new(Viewport::new(100, 100));
        let mut canvas = LocalCanvas::new(&mut frame, (0.0, 0.0));
        let layer = renderer.draw(&mut canvas, &entries, None);

        assert_eq!(frame.polygons.len(), 2);
        assert_eq!(frame.polygons[1].points[0], (0.0, 70.0));
        assert_eq!(frame.polygons[1].points[3], (0.0, 90.0));
        let hit = layer.hit_test((0.0, 71.0)).expect("top of second area");
        assert_eq!(hit.series_index, 1);
        assert_eq!(hit.value, 2.0);
    }
}
