//! Series legend: wrapped layout, drawing and toggle semantics.

use serde::{Deserialize, Serialize};

use crate::components::{LocalCanvas, circle_points, estimate_label_text_width_px};
use crate::render::{Color, TextHAlign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LegendAlign {
    /// Pushed against the right edge of the legend area.
    #[default]
    Right,
    Centre,
}

/// Sizing constants of the legend layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendMetrics {
    pub font_size_px: f64,
    /// Added to each label width for the bullet and trailing gap.
    pub item_padding_px: f64,
    pub row_height_px: f64,
    pub margin_top_px: f64,
    pub margin_bottom_px: f64,
    pub bullet_radius_px: f64,
}

impl Default for LegendMetrics {
    fn default() -> Self {
        Self {
            font_size_px: 12.0,
            item_padding_px: 28.0,
            row_height_px: 20.0,
            margin_top_px: 5.0,
            margin_bottom_px: 5.0,
            bullet_radius_px: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendItem {
    pub label: String,
    pub color: Color,
    pub disabled: bool,
}

/// Measured legend, in legend-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendLayout {
    pub available_width: f64,
    pub items_per_row: usize,
    pub column_widths: Vec<f64>,
    /// Bullet centre of every item.
    pub item_positions: Vec<(f64, f64)>,
    pub height: f64,
}

impl LegendLayout {
    #[must_use]
    pub fn rows(&self) -> usize {
        self.item_positions.len().div_ceil(self.items_per_row.max(1))
    }

    #[must_use]
    pub fn content_width(&self) -> f64 {
        self.column_widths.iter().sum()
    }

    /// Index of the item whose cell contains `pos`.
    #[must_use]
    pub fn item_at(&self, pos: (f64, f64), metrics: &LegendMetrics) -> Option<usize> {
        let half_row = metrics.row_height_px * 0.5;
        let per_row = self.items_per_row.max(1);
        self.item_positions
            .iter()
            .enumerate()
            .find(|&(index, &(x, y))| {
                let width = self.column_widths.get(index % per_row).copied().unwrap_or(0.0);
                let left = x - metrics.bullet_radius_px;
                pos.0 >= left && pos.0 < left + width && pos.1 >= y - half_row && pos.1 < y + half_row
            })
            .map(|(index, _)| index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LegendRenderer {
    pub metrics: LegendMetrics,
    pub align: LegendAlign,
}

impl LegendRenderer {
    #[must_use]
    pub fn new(metrics: LegendMetrics, align: LegendAlign) -> Self {
        Self { metrics, align }
    }

    /// Packs items into as many equal columns as fit in `available_width`.
    ///
    /// Columns take the widest item they hold; rows wrap left to right.
    #[must_use]
    pub fn measure(&self, labels: &[&str], available_width: f64) -> LegendLayout {
        let metrics = &self.metrics;
        let widths: Vec<f64> = labels
            .iter()
            .map(|label| {
                estimate_label_text_width_px(label, metrics.font_size_px) + metrics.item_padding_px
            })
            .collect();

        let mut per_row = 0;
        let mut total = 0.0;
        while total < available_width && per_row < widths.len() {
            total += widths[per_row];
            per_row += 1;
        }
        per_row = per_row.max(1);
        let mut columns: Vec<f64> = widths.iter().take(per_row).copied().collect();

        while total > available_width && per_row > 1 {
            per_row -= 1;
            columns = vec![0.0; per_row];
            for (index, &width) in widths.iter().enumerate() {
                let column = &mut columns[index % per_row];
                *column = column.max(width);
            }
            total = columns.iter().sum();
        }

        let offset_x = match self.align {
            LegendAlign::Right => available_width - total,
            LegendAlign::Centre => (available_width - total) * 0.5,
        };
        let column_starts: Vec<f64> = columns
            .iter()
            .scan(0.0, |x, width| {
                let start = *x;
                *x += width;
                Some(start)
            })
            .collect();
        let item_positions = (0..widths.len())
            .map(|index| {
                let row = (index / per_row) as f64;
                (
                    offset_x + column_starts[index % per_row],
                    metrics.margin_top_px + 5.0 + row * metrics.row_height_px,
                )
            })
            .collect();

        let rows = widths.len().div_ceil(per_row) as f64;
        LegendLayout {
            available_width,
            items_per_row: per_row,
            column_widths: columns,
            item_positions,
            height: metrics.margin_top_px + metrics.margin_bottom_px + rows * metrics.row_height_px,
        }
    }

    pub fn draw(&self, canvas: &mut LocalCanvas<'_>, items: &[LegendItem], layout: &LegendLayout) {
        let metrics = &self.metrics;
        for (item, &(x, y)) in items.iter().zip(&layout.item_positions) {
            let bullet = circle_points((x, y), metrics.bullet_radius_px);
            if item.disabled {
                let mut ring = bullet.clone();
                ring.push(bullet[0]);
                canvas.polyline(&ring, 1.5, item.color);
            } else {
                canvas.polygon(&bullet, item.color);
            }
            canvas.text(
                item.label.clone(),
                (x + metrics.bullet_radius_px + 3.0, y + metrics.font_size_px * 0.32),
                metrics.font_size_px,
                Color::rgb(0.0, 0.0, 0.0),
                TextHAlign::Left,
            );
        }
    }
}

/// Disabled flags after clicking item `index`.
///
/// A plain click toggles the item; when that would disable everything all
/// items are enabled again. In radio mode the clicked item becomes the only
/// enabled one.
#[must_use]
pub fn toggle_disabled(disabled: &[bool], index: usize, radio: bool) -> Vec<bool> {
    if index >= disabled.len() {
        return disabled.to_vec();
    }
    if radio {
        return solo_disabled(disabled.len(), index);
    }
    let mut next = disabled.to_vec();
    next[index] = !next[index];
    if next.iter().all(|&flag| flag) {
        next.iter_mut().for_each(|flag| *flag = false);
    }
    next
}

/// Disabled flags with only `index` enabled (legend double-click).
#[must_use]
pub fn solo_disabled(len: usize, index: usize) -> Vec<bool> {
    (0..len).map(|position| position != index).collect()
}

#[cfg(test)]
mod tests {
    use super::{LegendAlign, LegendMetrics, LegendRenderer, solo_disabled, toggle_disabled};

    #[test]
    fn wide_legends_wrap_into_rows() {
        let renderer = LegendRenderer::new(LegendMetrics::default(), LegendAlign::Right);
        let labels = ["alpha", "beta", "gamma", "delta"];

        let single = renderer.measure(&labels, 10_000.0);
        assert_eq!(single.items_per_row, 4);
        assert_eq!(single.rows(), 1);
        assert!((single.height - 30.0).abs() <= 1e-9);

        let narrow = renderer.measure(&labels, single.content_width() / 2.0);
        assert!(narrow.items_per_row < 4);
        assert!(narrow.rows() >= 2);
        assert!((narrow.height - (10.0 + 20.0 * narrow.rows() as f64)).abs() <= 1e-9);
        assert!(narrow.content_width() <= single.content_width() / 2.0 || narrow.items_per_row == 1);
    }

    #[test]
    fn right_aligned_items_end_at_the_right_edge() {
        let renderer = LegendRenderer::new(LegendMetrics::default(), LegendAlign::Right);
        let layout = renderer.measure(&["one", "two"], 500.0);
        let last = layout.item_positions[1].0 + layout.column_widths[1];
        assert!((last - 500.0).abs() <= 1e-9);
        assert_eq!(layout.item_at(layout.item_positions[1], &renderer.metrics), Some(1));
    }

    #[test]
    fn disabling_the_last_enabled_item_resets_all() {
        assert_eq!(toggle_disabled(&[false, true], 0, false), vec![false, false]);
        assert_eq!(toggle_disabled(&[false, false], 1, false), vec![false, true]);
        assert_eq!(toggle_disabled(&[false, false, false], 2, true), vec![true, true, false]);
        assert_eq!(solo_disabled(3, 0), vec![false, true, true]);
    }
}
