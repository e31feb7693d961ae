//! Enabled/disabled bookkeeping applied to chart-owned records.

use serde::{Deserialize, Serialize};

use crate::core::{PieDatum, Series};
use crate::error::{ChartError, ChartResult};

/// Record that a legend can switch on and off.
pub trait Toggleable {
    fn is_disabled(&self) -> bool;
    fn set_disabled(&mut self, disabled: bool);
}

impl Toggleable for Series {
    fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }
}

impl Toggleable for PieDatum {
    fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }
}

/// New disabled flags for every record, computed before being applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDelta {
    pub disabled: Vec<bool>,
}

impl StateDelta {
    #[must_use]
    pub fn new(disabled: Vec<bool>) -> Self {
        Self { disabled }
    }

    /// Stretches or cuts `flags` to `len` records. Slots past the end of
    /// `flags` take `missing`; extra flags are dropped.
    #[must_use]
    pub fn fitted(flags: &[bool], len: usize, missing: bool) -> Self {
        let disabled = (0..len)
            .map(|index| flags.get(index).copied().unwrap_or(missing))
            .collect();
        Self { disabled }
    }
}

#[must_use]
pub fn disabled_flags<T: Toggleable>(records: &[T]) -> Vec<bool> {
    records.iter().map(Toggleable::is_disabled).collect()
}

/// Writes `delta` into `records`. Lengths must match.
///
/// Returns whether any flag changed.
pub fn apply_state_delta<T: Toggleable>(records: &mut [T], delta: &StateDelta) -> ChartResult<bool> {
    if delta.disabled.len() != records.len() {
        return Err(ChartError::StateLength {
            expected: records.len(),
            actual: delta.disabled.len(),
        });
    }
    let mut changed = false;
    for (record, &disabled) in records.iter_mut().zip(&delta.disabled) {
        if record.is_disabled() != disabled {
            record.set_disabled(disabled);
            changed = true;
        }
    }
    Ok(changed)
}
