use crate::components::{ColoredSeries, HitLayer, HitShape, LocalCanvas};
use crate::core::{BandScale, DataPoint, LinearScale, Series, YAxis, stack_layout};
use crate::interaction::{HoverEvent, HoverTarget};
use crate::render::{Color, RectPrimitive};

/// Grouped or stacked bars over an ordinal band scale of the x values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiBarRenderer {
    pub y_scale: LinearScale,
    pub y_axis: YAxis,
    pub width: f64,
    pub height: f64,
    /// Fraction of each band step left empty between groups.
    pub group_spacing: f64,
    pub stacked: bool,
    pub min_bar_height: f64,
}

impl MultiBarRenderer {
    #[must_use]
    pub fn new(y_scale: LinearScale, y_axis: YAxis, width: f64, height: f64) -> Self {
        Self {
            y_scale,
            y_axis,
            width,
            height,
            group_spacing: 0.1,
            stacked: false,
            min_bar_height: 1.0,
        }
    }

    #[must_use]
    pub fn with_group_spacing(mut self, group_spacing: f64) -> Self {
        self.group_spacing = group_spacing;
        self
    }

    #[must_use]
    pub fn with_stacked(mut self, stacked: bool) -> Self {
        self.stacked = stacked;
        self
    }

    /// Band scale over every x value of `series`, in first-seen order.
    #[must_use]
    pub fn band_scale(&self, series: &[ColoredSeries<'_>]) -> BandScale {
        BandScale::new(
            series
                .iter()
                .flat_map(|entry| entry.series.values.iter().map(|point| point.x)),
            (0.0, self.width),
            self.group_spacing,
        )
    }

    /// Distance from the plot's left edge to the centre of the first band.
    ///
    /// `None` when there is nothing to draw.
    #[must_use]
    pub fn range_band_centre_offset(&self, series: &[ColoredSeries<'_>]) -> Option<f64> {
        let band = self.band_scale(series);
        (!band.is_empty()).then(|| band.centre_offset())
    }

    fn baseline(&self) -> f64 {
        let zero = self.y_scale.map(0.0);
        if zero.is_finite() {
            zero.clamp(0.0, self.height.max(0.0))
        } else {
            self.height
        }
    }

    pub fn draw(
        &self,
        canvas: &mut LocalCanvas<'_>,
        series: &[ColoredSeries<'_>],
        highlighted: Option<HoverTarget>,
    ) -> HitLayer {
        let mut layer = HitLayer::default();
        let band = self.band_scale(series);
        if band.is_empty() {
            return layer;
        }
        // Negative plot widths collapse bars to zero width.
        let band_width = band.band_width().max(0.0);
        let group_len = series.len() as f64;

        let stacked_tops = if self.stacked {
            let plain: Vec<&Series> = series.iter().map(|entry| entry.series).collect();
            Some(stack_layout(&plain, true))
        } else {
            None
        };

        for (slot, entry) in series.iter().enumerate() {
            for (point_index, &point) in entry.series.values.iter().enumerate() {
                let Some(band_x) = band.position(point.x) else {
                    continue;
                };
                let (x, width, low, high) = match &stacked_tops {
                    Some(stacked) => {
                        let stacked_point = stacked[slot][point_index];
                        (
                            band_x,
                            band_width,
                            stacked_point.y0.min(stacked_point.y1),
                            stacked_point.y0.max(stacked_point.y1),
                        )
                    }
                    None => {
                        let width = band_width / group_len;
                        (
                            band_x + width * slot as f64,
                            width,
                            point.y.min(0.0),
                            point.y.max(0.0),
                        )
                    }
                };
                let Some((top, height)) = self.vertical_extent(low, high) else {
                    continue;
                };

                let event = self.hover_event(entry, point, point_index, x + width * 0.5, top);
                let fill = if highlighted == Some(event.target()) {
                    lighten(entry.color)
                } else {
                    entry.color
                };
                canvas.rect(RectPrimitive::new(x, top, width, height, fill));
                layer.push(
                    HitShape::Rect {
                        x,
                        y: top,
                        width,
                        height,
                    },
                    event,
                );
            }
        }
        layer
    }

    fn vertical_extent(&self, low: f64, high: f64) -> Option<(f64, f64)> {
        let (top, bottom) = if self.stacked {
            (self.y_scale.map(high), self.y_scale.map(low))
        } else {
            let baseline = self.baseline();
            if high > 0.0 {
                (self.y_scale.map(high), baseline)
            } else {
                (baseline, self.y_scale.map(low))
            }
        };
        if !top.is_finite() || !bottom.is_finite() {
            return None;
        }
        let (top, bottom) = (top.min(bottom), top.max(bottom));
        Some((top, (bottom - top).max(self.min_bar_height)))
    }

    fn hover_event(
        &self,
        entry: &ColoredSeries<'_>,
        point: DataPoint,
        point_index: usize,
        x: f64,
        y: f64,
    ) -> HoverEvent {
        HoverEvent {
            pos: [x, y],
            series_key: entry.series.key.clone(),
            series_index: entry.index,
            y_axis: Some(self.y_axis),
            point: Some(point),
            point_index,
            value: point.y,
            color: entry.color,
        }
    }
}

fn lighten(color: Color) -> Color {
    let mix = |channel: f64| channel + (1.0 - channel) * 0.3;
    Color::rgba(mix(color.red), mix(color.green), mix(color.blue), color.alpha)
}

#[cfg(test)]
mod tests {
    use super::MultiBarRenderer;
    use crate::components::{ColoredSeries, LocalCanvas};
    use crate::core::{LinearScale, Series, SeriesKind, Viewport, YAxis};
    use crate::render::{Color, RenderFrame};

    fn colored(series: &Series, index: usize) -> ColoredSeries<'_> {
        ColoredSeries {
            index,
            series,
            color: Color::rgb(0.2, 0.4, 0.6),
        }
    }

    #[test]
    fn grouped_bars_split_each_band_between_series() {
        let a = Series::new("a", SeriesKind::Bar, YAxis::Primary)
            .with_points(&[(0.0, 10.0), (1.0, 5.0)]);
        let b = Series::new("b", SeriesKind::Bar, YAxis::Primary)
            .with_points(&[(0.0, 4.0), (1.0, -2.0)]);
        let renderer = MultiBarRenderer::new(
            LinearScale::new((-10.0, 10.0), (100.0, 0.0)),
            YAxis::Primary,
            210.0,
            100.0,
        );
        let entries = [colored(&a, 0), colored(&b, 1)];

        let mut frame = RenderFrame::new(Viewport::new(300, 200));
        let mut canvas = LocalCanvas::new(&mut frame, (0.0, 0.0));
        let layer = renderer.draw(&mut canvas, &entries, None);

        assert_eq!(frame.rects.len(), 4);
        let first = frame.rects[0];
        let second = frame.rects[2];
        assert!((second.x - (first.x + first.width)).abs() <= 1e-9);
        // negative bar hangs below the zero line
        let negative = frame.rects[3];
        assert!((negative.y - 50.0).abs() <= 1e-9);
        assert!((negative.height - 10.0).abs() <= 1e-9);
        assert_eq!(layer.len(), 4);
    }

    #[test]
    fn centre_offset_is_reported_only_for_non_empty_bars() {
        let renderer = MultiBarRenderer::new(
            LinearScale::new((0.0, 1.0), (100.0, 0.0)),
            YAxis::Secondary,
            1000.0,
            100.0,
        );
        assert_eq!(renderer.range_band_centre_offset(&[]), None);

        let a = Series::new("a", SeriesKind::Bar, YAxis::Secondary)
            .with_points(&[(0.0, 1.0), (1.0, 1.0), (2.0, 1.0), (3.0, 1.0)]);
        let offset = renderer
            .range_band_centre_offset(&[colored(&a, 0)])
            .expect("offset");
        let step = 1000.0 / (4.0 - 0.1 + 0.2);
        assert!((offset - step * 0.55).abs() <= 1e-9);
    }

    #[test]
    fn stacked_bars_share_the_full_band() {
        let a = Series::new("a", SeriesKind::Bar, YAxis::Primary).with_points(&[(0.0, 2.0)]);
        let b = Series::new("b", SeriesKind::Bar, YAxis::Primary).with_points(&[(0.0, 3.0)]);
        let renderer = MultiBarRenderer::new(
            LinearScale::new((0.0, 10.0), (100.0, 0.0)),
            YAxis::Primary,
            100.0,
            100.0,
        )
        .with_stacked(true);
        let mut frame = RenderFrame::new(Viewport::new(100, 100));
        let mut canvas = LocalCanvas::new(&mut frame, (0.0, 0.0));
        renderer.draw(&mut canvas, &[colored(&a, 0), colored(&b, 1)], None);

        assert_eq!(frame.rects[0].x, frame.rects[1].x);
        assert!((frame.rects[1].y - 50.0).abs() <= 1e-9);
        assert!((frame.rects[1].height - 30.0).abs() <= 1e-9);
    }
}
