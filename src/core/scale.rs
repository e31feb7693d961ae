use serde::{Deserialize, Serialize};

/// Continuous linear mapping from a data domain to a pixel range.
///
/// A zero-span domain maps every value to the start of the range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    #[must_use]
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        self.domain
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.range
    }

    #[must_use]
    pub fn with_range(mut self, range: (f64, f64)) -> Self {
        self.range = range;
        self
    }

    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 {
            return r0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = r1 - r0;
        if span == 0.0 {
            return d0;
        }
        d0 + (pixel - r0) / span * (d1 - d0)
    }

    /// Returns round tick values inside the domain, aiming for `count` ticks.
    ///
    /// Steps are powers of ten multiplied by 1, 2 or 5.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        let (mut min, mut max) = self.domain;
        if count == 0 || !min.is_finite() || !max.is_finite() {
            return Vec::new();
        }
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        if min == max {
            return vec![min];
        }

        let step = tick_step(max - min, count);
        if step <= 0.0 || !step.is_finite() {
            return vec![min, max];
        }

        let start = (min / step).ceil() * step;
        let stop = (max / step).floor() * step + step * 0.5;
        let mut ticks = Vec::new();
        let mut index = 0.0_f64;
        loop {
            let value = start + step * index;
            if value > stop || ticks.len() >= 10_000 {
                break;
            }
            ticks.push(value);
            index += 1.0;
        }
        ticks
    }
}

fn tick_step(span: f64, count: usize) -> f64 {
    let target = count as f64;
    let mut step = 10_f64.powf((span / target).log10().floor());
    let error = target / span * step;
    if error <= 0.15 {
        step *= 10.0;
    } else if error <= 0.35 {
        step *= 5.0;
    } else if error <= 0.75 {
        step *= 2.0;
    }
    step
}

#[cfg(test)]
mod tests {
    use super::LinearScale;

    #[test]
    fn maps_and_inverts_inverted_pixel_range() {
        let scale = LinearScale::new((0.0, 100.0), (400.0, 0.0));
        assert!((scale.map(25.0) - 300.0).abs() <= 1e-9);
        assert!((scale.invert(300.0) - 25.0).abs() <= 1e-9);
    }

    #[test]
    fn zero_span_domain_maps_to_range_start() {
        let scale = LinearScale::new((5.0, 5.0), (10.0, 90.0));
        assert_eq!(scale.map(5.0), 10.0);
        assert_eq!(scale.map(500.0), 10.0);
    }

    #[test]
    fn ticks_stay_inside_domain_on_round_steps() {
        let ticks = LinearScale::new((0.0, 97.0), (0.0, 1.0)).ticks(5);
        assert_eq!(ticks, vec![0.0, 20.0, 40.0, 60.0, 80.0]);

        let ticks = LinearScale::new((-3.0, 3.0), (0.0, 1.0)).ticks(6);
        assert_eq!(ticks, vec![-3.0, -2.0, -1.0, 0.0, 1.0, 2.0, 3.0]);
    }
}
