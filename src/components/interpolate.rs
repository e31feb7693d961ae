//! Path interpolation between pixel-space points.

use serde::{Deserialize, Serialize};

/// Curve drawn through consecutive points of a line or area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Interpolation {
    #[default]
    Linear,
    /// Horizontal-vertical steps changing value at the midpoint.
    Step,
    /// Vertical first, then horizontal.
    StepBefore,
    /// Horizontal first, then vertical.
    StepAfter,
    /// Monotone cubic (Fritsch-Carlson), never overshoots the data.
    Monotone,
}

const MONOTONE_SAMPLES_PER_SEGMENT: usize = 8;

/// Polyline vertices tracing `points` with the given curve.
#[must_use]
pub fn interpolate(points: &[(f64, f64)], mode: Interpolation) -> Vec<(f64, f64)> {
    if points.len() < 2 {
        return points.to_vec();
    }
    match mode {
        Interpolation::Linear => points.to_vec(),
        Interpolation::Step => step_mid(points),
        Interpolation::StepBefore => step(points, true),
        Interpolation::StepAfter => step(points, false),
        Interpolation::Monotone => monotone(points),
    }
}

fn step(points: &[(f64, f64)], vertical_first: bool) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(points.len() * 2 - 1);
    out.push(points[0]);
    for pair in points.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        out.push(if vertical_first { (x0, y1) } else { (x1, y0) });
        out.push((x1, y1));
    }
    out
}

fn step_mid(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(points.len() * 3 - 2);
    out.push(points[0]);
    for pair in points.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        let mid = (x0 + x1) * 0.5;
        out.push((mid, y0));
        out.push((mid, y1));
        out.push((x1, y1));
    }
    out
}

fn monotone(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let tangents = monotone_tangents(points);
    let mut out = Vec::with_capacity((points.len() - 1) * MONOTONE_SAMPLES_PER_SEGMENT + 1);
    out.push(points[0]);
    for (index, pair) in points.windows(2).enumerate() {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        let h = x1 - x0;
        let (m0, m1) = (tangents[index], tangents[index + 1]);
        for sample in 1..=MONOTONE_SAMPLES_PER_SEGMENT {
            let t = sample as f64 / MONOTONE_SAMPLES_PER_SEGMENT as f64;
            let t2 = t * t;
            let t3 = t2 * t;
            let y = (2.0 * t3 - 3.0 * t2 + 1.0) * y0
                + (t3 - 2.0 * t2 + t) * h * m0
                + (-2.0 * t3 + 3.0 * t2) * y1
                + (t3 - t2) * h * m1;
            out.push((x0 + h * t, y));
        }
    }
    out
}

/// Per-point slopes limited so the Hermite spline stays monotone.
fn monotone_tangents(points: &[(f64, f64)]) -> Vec<f64> {
    let slopes: Vec<f64> = points
        .windows(2)
        .map(|pair| {
            let dx = pair[1].0 - pair[0].0;
            if dx == 0.0 {
                0.0
            } else {
                (pair[1].1 - pair[0].1) / dx
            }
        })
        .collect();

    let last = slopes.len();
    let mut tangents = Vec::with_capacity(points.len());
    tangents.push(slopes[0]);
    for index in 1..last {
        tangents.push((slopes[index - 1] + slopes[index]) * 0.5);
    }
    tangents.push(slopes[last - 1]);

    for (index, &slope) in slopes.iter().enumerate() {
        if slope == 0.0 {
            tangents[index] = 0.0;
            tangents[index + 1] = 0.0;
            continue;
        }
        let a = tangents[index] / slope;
        let b = tangents[index + 1] / slope;
        let s = a * a + b * b;
        if s > 9.0 {
            let scale = slope * 3.0 / s.sqrt();
            tangents[index] = scale * a;
            tangents[index + 1] = scale * b;
        }
    }
    tangents
}

#[cfg(test)]
mod tests {
    use super::{Interpolation, interpolate};

    #[test]
    fn step_modes_place_the_corner_on_opposite_sides() {
        let points = [(0.0, 0.0), (10.0, 5.0)];
        assert_eq!(
            interpolate(&points, Interpolation::StepAfter),
            vec![(0.0, 0.0), (10.0, 0.0), (10.0, 5.0)]
        );
        assert_eq!(
            interpolate(&points, Interpolation::StepBefore),
            vec![(0.0, 0.0), (0.0, 5.0), (10.0, 5.0)]
        );
    }

    #[test]
    fn monotone_curve_does_not_overshoot_plateaus() {
        let points = [(0.0, 0.0), (1.0, 10.0), (2.0, 10.0), (3.0, 0.0)];
        let curve = interpolate(&points, Interpolation::Monotone);
        assert!(curve.iter().all(|&(_, y)| (-1e-9..=10.0 + 1e-9).contains(&y)));
        assert_eq!(curve.first(), Some(&(0.0, 0.0)));
        let end = curve.last().expect("curve end");
        assert!((end.0 - 3.0).abs() <= 1e-9 && end.1.abs() <= 1e-9);
    }

    #[test]
    fn single_point_is_returned_unchanged() {
        assert_eq!(interpolate(&[(1.0, 2.0)], Interpolation::Monotone), vec![(1.0, 2.0)]);
    }
}
