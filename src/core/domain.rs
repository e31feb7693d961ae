//! Series filtering and axis-domain resolution for composite charts.
//!
//! Domains are recomputed from scratch every render pass. Only enabled
//! series contribute; stacked groups add a synthetic total series so the
//! axis covers the full stack height and always includes zero.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{DataPoint, Series, SeriesKind, YAxis};

/// Enabled series assigned to `y_axis` and drawn as `kind`, in input order.
#[must_use]
pub fn filter_by_axis_and_type(data: &[Series], y_axis: YAxis, kind: SeriesKind) -> Vec<&Series> {
    data.iter()
        .filter(|series| series.is_enabled() && series.matches(y_axis, kind))
        .collect()
}

/// Point lists of every enabled series on `y_axis`, whatever its kind.
#[must_use]
pub fn extract_points(data: &[Series], y_axis: YAxis) -> Vec<Vec<DataPoint>> {
    data.iter()
        .filter(|series| series.is_enabled() && series.y_axis == y_axis)
        .map(|series| series.values.clone())
        .collect()
}

/// Elementwise `y` sum of index-aligned series plus a `(0, 0)` anchor.
///
/// X values come from the first series. Values are matched by index, not by
/// x; a partner series that is too short contributes `NaN` for the missing
/// slots.
#[must_use]
pub fn reduce_stacked_series<'a, I>(series: I) -> Vec<DataPoint>
where
    I: IntoIterator<Item = &'a Series>,
{
    let mut iter = series.into_iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };

    let mut totals = first.values.clone();
    for other in iter {
        if other.values.len() != totals.len() {
            warn!(
                series = %other.key,
                expected = totals.len(),
                actual = other.values.len(),
                "stacked series lengths differ; summing by index"
            );
        }
        for (index, total) in totals.iter_mut().enumerate() {
            total.y += other.values.get(index).map_or(f64::NAN, |point| point.y);
        }
    }

    totals.push(DataPoint::new(0.0, 0.0));
    totals
}

/// Min/max over the finite values; `None` when there are none.
#[must_use]
pub fn extent<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|value| value.is_finite())
        .fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        })
}

/// Explicit y-domain overrides, one per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DomainOverrides {
    #[serde(default)]
    pub y1: Option<(f64, f64)>,
    #[serde(default)]
    pub y2: Option<(f64, f64)>,
}

/// Resolved domains of one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisDomains {
    pub x: Option<(f64, f64)>,
    pub y1: Option<(f64, f64)>,
    pub y2: Option<(f64, f64)>,
}

impl AxisDomains {
    #[must_use]
    pub fn y(self, y_axis: YAxis) -> Option<(f64, f64)> {
        match y_axis {
            YAxis::Primary => self.y1,
            YAxis::Secondary => self.y2,
        }
    }
}

/// Fallback used when an axis has nothing to show.
pub const EMPTY_DOMAIN: (f64, f64) = (0.0, 1.0);

/// Computes the x-domain and both y-domains.
///
/// `stacked_bars` folds stacked bar totals into the y-domains in addition to
/// the stacked-area totals.
#[must_use]
pub fn resolve_domains(data: &[Series], overrides: DomainOverrides, stacked_bars: bool) -> AxisDomains {
    let points1 = extract_points(data, YAxis::Primary);
    let points2 = extract_points(data, YAxis::Secondary);

    let x = extent(
        points1
            .iter()
            .chain(points2.iter())
            .flat_map(|points| points.iter().map(|point| point.x)),
    );

    let y1 = overrides
        .y1
        .or_else(|| y_extent(data, &points1, YAxis::Primary, stacked_bars));
    let y2 = overrides
        .y2
        .or_else(|| y_extent(data, &points2, YAxis::Secondary, stacked_bars));

    AxisDomains { x, y1, y2 }
}

fn y_extent(
    data: &[Series],
    points: &[Vec<DataPoint>],
    y_axis: YAxis,
    stacked_bars: bool,
) -> Option<(f64, f64)> {
    let mut extra = reduce_stacked_series(filter_by_axis_and_type(data, y_axis, SeriesKind::Area));
    if stacked_bars {
        let mut bars = reduce_stacked_series(filter_by_axis_and_type(data, y_axis, SeriesKind::Bar));
        bars.append(&mut extra);
        extra = bars;
    }

    extent(
        points
            .iter()
            .flatten()
            .chain(extra.iter())
            .map(|point| point.y),
    )
}
