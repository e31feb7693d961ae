use std::fmt;

use serde::{Deserialize, Serialize};

use crate::components::{LocalCanvas, ValueFormatterFn, format_grouped, precision_for_step};
use crate::core::LinearScale;
use crate::render::{Color, TextHAlign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisOrientation {
    Bottom,
    Left,
    Right,
}

/// Affine correction applied to an axis after projection:
/// `pixel = translate + factor * scale(value)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisShift {
    pub translate: f64,
    pub factor: f64,
}

impl Default for AxisShift {
    fn default() -> Self {
        Self {
            translate: 0.0,
            factor: 1.0,
        }
    }
}

impl AxisShift {
    /// Shift that pulls the outermost ticks `offset` px inside a `width` px axis.
    #[must_use]
    pub fn centred_on_bands(offset: f64, width: f64) -> Self {
        if width == 0.0 || !offset.is_finite() {
            return Self::default();
        }
        Self {
            translate: offset,
            factor: (width - 2.0 * offset) / width,
        }
    }

    #[must_use]
    pub fn apply(self, pixel: f64) -> f64 {
        self.translate + self.factor * pixel
    }
}

/// One tick as drawn: data value, pixel position along the axis and label.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub value: f64,
    pub position: f64,
    pub label: String,
}

/// Axis line, tick marks, optional grid lines and tick labels.
#[derive(Clone)]
pub struct AxisRenderer {
    pub orientation: AxisOrientation,
    pub scale: LinearScale,
    pub tick_count: usize,
    pub shift: AxisShift,
    pub tick_length: f64,
    /// Grid line length across the plot; zero draws none.
    pub grid_length: f64,
    pub font_size_px: f64,
    pub line_color: Color,
    pub grid_color: Color,
    pub label_color: Color,
    pub formatter: Option<ValueFormatterFn>,
}

impl fmt::Debug for AxisRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxisRenderer")
            .field("orientation", &self.orientation)
            .field("scale", &self.scale)
            .field("tick_count", &self.tick_count)
            .field("shift", &self.shift)
            .field("has_formatter", &self.formatter.is_some())
            .finish_non_exhaustive()
    }
}

impl AxisRenderer {
    #[must_use]
    pub fn new(orientation: AxisOrientation, scale: LinearScale, tick_count: usize) -> Self {
        Self {
            orientation,
            scale,
            tick_count,
            shift: AxisShift::default(),
            tick_length: 6.0,
            grid_length: 0.0,
            font_size_px: 11.0,
            line_color: Color::rgb(0.2, 0.2, 0.2),
            grid_color: Color::rgba(0.0, 0.0, 0.0, 0.1),
            label_color: Color::rgb(0.2, 0.2, 0.2),
            formatter: None,
        }
    }

    #[must_use]
    pub fn with_shift(mut self, shift: AxisShift) -> Self {
        self.shift = shift;
        self
    }

    #[must_use]
    pub fn with_grid_length(mut self, grid_length: f64) -> Self {
        self.grid_length = grid_length;
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Option<ValueFormatterFn>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Ticks with positions and labels, without drawing.
    #[must_use]
    pub fn ticks(&self) -> Vec<AxisTick> {
        let values = self.scale.ticks(self.tick_count);
        let step = match values.as_slice() {
            [first, second, ..] => second - first,
            _ => 1.0,
        };
        let precision = precision_for_step(step);
        values
            .into_iter()
            .map(|value| AxisTick {
                value,
                position: self.shift.apply(self.scale.map(value)),
                label: match &self.formatter {
                    Some(formatter) => formatter(value),
                    None => format_grouped(value, precision),
                },
            })
            .collect()
    }

    /// Draws with the canvas origin on the axis line: bottom-left corner of the
    /// plot for bottom and left axes, bottom-right corner for right axes.
    pub fn draw(&self, canvas: &mut LocalCanvas<'_>) -> Vec<AxisTick> {
        let ticks = self.ticks();
        let (r0, r1) = self.scale.range();
        let (start, end) = (self.shift.apply(r0), self.shift.apply(r1));
        let font = self.font_size_px;

        match self.orientation {
            AxisOrientation::Bottom => {
                canvas.line((start, 0.0), (end, 0.0), 1.0, self.line_color);
                for tick in &ticks {
                    let x = tick.position;
                    if self.grid_length > 0.0 {
                        canvas.line((x, 0.0), (x, -self.grid_length), 1.0, self.grid_color);
                    }
                    canvas.line((x, 0.0), (x, self.tick_length), 1.0, self.line_color);
                    canvas.text(
                        tick.label.clone(),
                        (x, self.tick_length + font + 2.0),
                        font,
                        self.label_color,
                        TextHAlign::Center,
                    );
                }
            }
            AxisOrientation::Left | AxisOrientation::Right => {
                let direction = if self.orientation == AxisOrientation::Left {
                    -1.0
                } else {
                    1.0
                };
                canvas.line((0.0, start), (0.0, end), 1.0, self.line_color);
                for tick in &ticks {
                    let y = tick.position;
                    if self.grid_length > 0.0 {
                        canvas.line((0.0, y), (-direction * self.grid_length, y), 1.0, self.grid_color);
                    }
                    canvas.line((0.0, y), (direction * self.tick_length, y), 1.0, self.line_color);
                    let align = if direction < 0.0 {
                        TextHAlign::Right
                    } else {
                        TextHAlign::Left
                    };
                    canvas.text(
                        tick.label.clone(),
                        (direction * (self.tick_length + 3.0), y + font / 3.0),
                        font,
                        self.label_color,
                        align,
                    );
                }
            }
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{AxisOrientation, AxisRenderer, AxisShift};
    use crate::components::LocalCanvas;
    use crate::core::{LinearScale, Viewport};
    use crate::render::RenderFrame;

    #[test]
    fn band_shift_moves_end_ticks_inwards() {
        let shift = AxisShift::centred_on_bands(50.0, 1000.0);
        assert!((shift.apply(0.0) - 50.0).abs() <= 1e-9);
        assert!((shift.apply(1000.0) - 950.0).abs() <= 1e-9);
        assert_eq!(AxisShift::centred_on_bands(10.0, 0.0), AxisShift::default());
    }

    #[test]
    fn default_labels_use_tick_step_precision() {
        let axis = AxisRenderer::new(
            AxisOrientation::Left,
            LinearScale::new((0.0, 1.0), (100.0, 0.0)),
            5,
        );
        let labels: Vec<String> = axis.ticks().into_iter().map(|tick| tick.label).collect();
        assert_eq!(labels, vec!["0.0", "0.2", "0.4", "0.6", "0.8", "1.0"]);
    }

    #[test]
    fn custom_formatter_labels_every_tick() {
        let axis = AxisRenderer::new(
            AxisOrientation::Bottom,
            LinearScale::new((0.0, 10.0), (0.0, 100.0)),
            2,
        )
        .with_formatter(Some(Arc::new(|value| format!("t{value}"))));
        let mut frame = RenderFrame::new(Viewport::new(120, 50));
        let mut canvas = LocalCanvas::new(&mut frame, (10.0, 40.0));
        let ticks = axis.draw(&mut canvas);

        assert_eq!(ticks.len(), 3);
        assert!(frame.find_text("t5").is_some());
        // axis line plus one tick mark per tick
        assert_eq!(frame.lines.len(), 4);
    }
}
