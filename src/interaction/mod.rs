use serde::{Deserialize, Serialize};

use crate::core::{DataPoint, Margin, YAxis};
use crate::render::Color;

/// Hover notification produced by a sub-renderer hit test.
///
/// `pos` is relative to the emitting sub-renderer's origin until the event
/// relay translates it into container coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverEvent {
    pub pos: [f64; 2],
    pub series_key: String,
    pub series_index: usize,
    pub y_axis: Option<YAxis>,
    pub point: Option<DataPoint>,
    pub point_index: usize,
    pub value: f64,
    pub color: Color,
}

impl HoverEvent {
    /// Same event with `pos` shifted by the plot origin.
    #[must_use]
    pub fn translated(mut self, margin: Margin) -> Self {
        self.pos = [self.pos[0] + margin.left, self.pos[1] + margin.top];
        self
    }

    /// Identity of the hovered element, stable across pointer moves.
    #[must_use]
    pub fn target(&self) -> HoverTarget {
        HoverTarget {
            series_index: self.series_index,
            point_index: self.point_index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HoverTarget {
    pub series_index: usize,
    pub point_index: usize,
}

/// Drops stacked-area hovers whose value rounds to zero.
///
/// A value is suppressed when `round(value * precision) == 0`; the default
/// precision of 100 rounds at two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoverSuppression {
    pub precision: f64,
}

impl Default for HoverSuppression {
    fn default() -> Self {
        Self { precision: 100.0 }
    }
}

impl HoverSuppression {
    #[must_use]
    pub fn suppresses(self, value: f64) -> bool {
        (value * self.precision).round() == 0.0
    }
}

/// Work queued during a pass and run after it completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredAction {
    ClearHoverHighlight,
}

/// Pointer state shared by both chart types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    hovered: Option<HoverEvent>,
    highlighted: Option<HoverTarget>,
    deferred: Vec<DeferredAction>,
}

impl InteractionState {
    #[must_use]
    pub fn hovered(&self) -> Option<&HoverEvent> {
        self.hovered.as_ref()
    }

    #[must_use]
    pub fn highlighted(&self) -> Option<HoverTarget> {
        self.highlighted
    }

    pub fn set_hovered(&mut self, event: Option<HoverEvent>) -> Option<HoverEvent> {
        std::mem::replace(&mut self.hovered, event)
    }

    pub fn set_highlighted(&mut self, target: Option<HoverTarget>) {
        self.highlighted = target;
    }

    /// Queues `action` unless the same action is already pending.
    pub fn defer(&mut self, action: DeferredAction) {
        if !self.deferred.contains(&action) {
            self.deferred.push(action);
        }
    }

    #[must_use]
    pub fn pending_deferred(&self) -> usize {
        self.deferred.len()
    }

    /// Runs every queued action in order. Returns how many ran.
    pub fn run_deferred(&mut self) -> usize {
        let actions = std::mem::take(&mut self.deferred);
        for action in &actions {
            match action {
                DeferredAction::ClearHoverHighlight => self.highlighted = None,
            }
        }
        actions.len()
    }
}
