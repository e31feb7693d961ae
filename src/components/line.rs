use crate::components::{
    ColoredSeries, HitLayer, HitShape, Interpolation, LocalCanvas, circle_points, interpolate,
};
use crate::core::{DataPoint, LinearScale, YAxis};
use crate::interaction::{HoverEvent, HoverTarget};

/// Draws one polyline per series and exposes its points for hover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineRenderer {
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
    pub y_axis: YAxis,
    pub interpolation: Interpolation,
    pub stroke_width: f64,
    pub hover_radius: f64,
    pub highlight_radius: f64,
}

impl LineRenderer {
    #[must_use]
    pub fn new(x_scale: LinearScale, y_scale: LinearScale, y_axis: YAxis) -> Self {
        Self {
            x_scale,
            y_scale,
            y_axis,
            interpolation: Interpolation::Linear,
            stroke_width: 1.5,
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

    /// Pads the x range so the outermost points sit `padding` px inside the plot.
    ///
    /// Used to line points up with the centres of bands drawn alongside.
    #[must_use]
    pub fn with_x_padding(mut self, padding: f64) -> Self {
        let (start, end) = self.x_scale.range();
        self.x_scale = self.x_scale.with_range((start + padding, end - padding));
        self
    }

    fn project(&self, point: DataPoint) -> (f64, f64) {
        (self.x_scale.map(point.x), self.y_scale.map(point.y))
    }

    pub fn draw(
        &self,
        canvas: &mut LocalCanvas<'_>,
        series: &[ColoredSeries<'_>],
        highlighted: Option<HoverTarget>,
    ) -> HitLayer {
        let mut layer = HitLayer::default();
        for entry in series {
            let projected: Vec<(f64, f64)> = entry
                .series
                .values
                .iter()
                .map(|&point| self.project(point))
                .collect();

            // Non-finite points break the line into separate runs.
            for run in projected
                .split(|&(x, y)| !x.is_finite() || !y.is_finite())
                .filter(|run| !run.is_empty())
            {
                let path = interpolate(run, self.interpolation);
                canvas.polyline(&path, self.stroke_width, entry.color);
            }

            for (point_index, (&point, &(x, y))) in
                entry.series.values.iter().zip(&projected).enumerate()
            {
                if !x.is_finite() || !y.is_finite() {
                    continue;
                }
                let event = HoverEvent {
                    pos: [x, y],
                    series_key: entry.series.key.clone(),
                    series_index: entry.index,
                    y_axis: Some(self.y_axis),
                    point: Some(point),
                    point_index,
                    value: point.y,
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
    use super::LineRenderer;
    use crate::components::{ColoredSeries, LocalCanvas};
    use crate::core::{LinearScale, Series, SeriesKind, Viewport, YAxis};
    use crate::render::{Color, RenderFrame};

    #[test]
    fn padded_line_keeps_end_points_inside_the_plot() {
        let series = Series::new("a", SeriesKind::Line, YAxis::Primary)
            .with_points(&[(0.0, 0.0), (10.0, 10.0)]);
        let renderer = LineRenderer::new(
            LinearScale::new((0.0, 10.0), (0.0, 100.0)),
            LinearScale::new((0.0, 10.0), (50.0, 0.0)),
            YAxis::Primary,
        )
        .with_x_padding(5.0);

        let mut frame = RenderFrame::new(Viewport::new(200, 100));
        let mut canvas = LocalCanvas::new(&mut frame, (10.0, 20.0));
        let colored = [ColoredSeries {
            index: 0,
            series: &series,
            color: Color::rgb(0.0, 0.0, 1.0),
        }];
        let layer = renderer.draw(&mut canvas, &colored, None);

        assert_eq!(frame.lines.len(), 1);
        assert_eq!(frame.lines[0].x1, 15.0);
        assert_eq!(frame.lines[0].x2, 105.0);
        let hit = layer.hit_test((94.0, 1.0)).expect("last point hovered");
        assert_eq!(hit.point_index, 1);
        assert_eq!(hit.pos, [95.0, 0.0]);
    }
}
