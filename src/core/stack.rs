use serde::{Deserialize, Serialize};

use crate::core::Series;

/// One value of a stacked series with its baseline (`y0`) and top (`y1`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StackedPoint {
    pub x: f64,
    pub y: f64,
    pub y0: f64,
    pub y1: f64,
}

/// Stacks index-aligned series on a zero baseline.
///
/// With `split_sign`, positive and negative values grow away from zero on
/// separate accumulators (bar stacking). Without it every value is added to a
/// single running total (area stacking). Missing values count as zero.
#[must_use]
pub fn stack_layout(series: &[&Series], split_sign: bool) -> Vec<Vec<StackedPoint>> {
    let width = series
        .iter()
        .map(|series| series.values.len())
        .max()
        .unwrap_or(0);
    let mut positive = vec![0.0_f64; width];
    let mut negative = vec![0.0_f64; width];

    series
        .iter()
        .map(|series| {
            series
                .values
                .iter()
                .enumerate()
                .map(|(index, point)| {
                    let y = if point.y.is_finite() { point.y } else { 0.0 };
                    let base = if split_sign && y < 0.0 {
                        &mut negative[index]
                    } else {
                        &mut positive[index]
                    };
                    let y0 = *base;
                    *base += y;
                    StackedPoint {
                        x: point.x,
                        y: point.y,
                        y0,
                        y1: *base,
                    }
                })
                .collect()
        })
        .collect()
}
