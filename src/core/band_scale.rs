use indexmap::IndexSet;
use ordered_float::OrderedFloat;

/// Ordinal band scale over distinct x values, in first-seen order.
///
/// `padding` is a fraction of the step reserved between bands; the same
/// fraction is reserved before the first and after the last band.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: IndexSet<OrderedFloat<f64>>,
    range: (f64, f64),
    padding: f64,
    outer_padding: f64,
}

impl BandScale {
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = f64>, range: (f64, f64), padding: f64) -> Self {
        let padding = padding.clamp(0.0, 1.0);
        Self {
            domain: values.into_iter().map(OrderedFloat).collect(),
            range,
            padding,
            outer_padding: padding,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.domain.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        if self.domain.is_empty() {
            return 0.0;
        }
        let count = self.domain.len() as f64;
        (self.range.1 - self.range.0) / (count - self.padding + 2.0 * self.outer_padding)
    }

    #[must_use]
    pub fn band_width(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    /// Left edge of the band holding `value`.
    #[must_use]
    pub fn position(&self, value: f64) -> Option<f64> {
        let index = self.domain.get_index_of(&OrderedFloat(value))?;
        Some(self.position_at(index))
    }

    #[must_use]
    pub fn position_at(&self, index: usize) -> f64 {
        let step = self.step();
        self.range.0 + step * self.outer_padding + step * index as f64
    }

    /// Distance from the range start to the centre of the first band.
    ///
    /// Point renderings shifted by this amount line up with band centres.
    #[must_use]
    pub fn centre_offset(&self) -> f64 {
        if self.domain.is_empty() {
            return 0.0;
        }
        self.position_at(0) - self.range.0 + self.band_width() * 0.5
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.domain.iter().map(|value| value.0)
    }
}

#[cfg(test)]
mod tests {
    use super::BandScale;

    #[test]
    fn duplicate_values_collapse_into_one_band() {
        let scale = BandScale::new([3.0, 1.0, 3.0, 2.0], (0.0, 100.0), 0.1);
        assert_eq!(scale.len(), 3);
        assert_eq!(scale.values().collect::<Vec<_>>(), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn centre_offset_is_symmetric_across_the_range() {
        let scale = BandScale::new([0.0, 1.0, 2.0, 3.0], (0.0, 1000.0), 0.1);
        let offset = scale.centre_offset();
        let last_centre = scale.position_at(3) + scale.band_width() * 0.5;
        assert!((last_centre - (1000.0 - offset)).abs() <= 1e-9);
        assert!((offset - scale.step() * 0.55).abs() <= 1e-9);
    }

    #[test]
    fn empty_scale_has_no_offset() {
        let scale = BandScale::new(Vec::<f64>::new(), (0.0, 500.0), 0.1);
        assert!(scale.is_empty());
        assert_eq!(scale.centre_offset(), 0.0);
        assert_eq!(scale.band_width(), 0.0);
    }
}
