//! Typed chart notifications and the observer list they are dispatched to.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{ChartError, ChartResult};
use crate::interaction::HoverEvent;

/// Enabled/disabled mirror of the chart's items, as read by state getters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChartState {
    pub active: Vec<bool>,
}

impl ChartState {
    #[must_use]
    pub fn from_disabled(disabled: &[bool]) -> Self {
        Self {
            active: disabled.iter().map(|flag| !flag).collect(),
        }
    }

    #[must_use]
    pub fn disabled(&self) -> Vec<bool> {
        self.active.iter().map(|flag| !flag).collect()
    }
}

/// External request to replace the disabled flags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChangeStateRequest {
    #[serde(default)]
    pub disabled: Option<Vec<bool>>,
}

/// Every notification a chart publishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "topic", content = "payload", rename_all = "camelCase")]
pub enum ChartEvent {
    TooltipShow(HoverEvent),
    TooltipHide(HoverEvent),
    /// Legend toggles; carries the new disabled flags.
    StateChange { disabled: Vec<bool> },
    ChangeState(ChangeStateRequest),
    RenderEnd,
}

impl ChartEvent {
    #[must_use]
    pub fn topic(&self) -> &'static str {
        match self {
            Self::TooltipShow(_) => "tooltipShow",
            Self::TooltipHide(_) => "tooltipHide",
            Self::StateChange { .. } => "stateChange",
            Self::ChangeState(_) => "changeState",
            Self::RenderEnd => "renderEnd",
        }
    }
}

/// Listener registered on a chart.
///
/// Observers see events after the chart has applied them and cannot mutate
/// chart internals.
pub trait ChartObserver {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: &ChartEvent);
}

/// Ordered observer list with unique ids.
#[derive(Default)]
pub struct EventRelay {
    observers: Vec<Box<dyn ChartObserver>>,
}

impl std::fmt::Debug for EventRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRelay")
            .field(
                "observers",
                &self
                    .observers
                    .iter()
                    .map(|observer| observer.id().to_owned())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl EventRelay {
    /// Registers an observer with unique identifier.
    pub fn register(&mut self, observer: Box<dyn ChartObserver>) -> ChartResult<()> {
        let observer_id = observer.id().to_owned();
        if observer_id.is_empty() {
            return Err(ChartError::InvalidData(
                "observer id must not be empty".to_owned(),
            ));
        }
        if self.has_observer(&observer_id) {
            return Err(ChartError::DuplicateObserver(observer_id));
        }
        self.observers.push(observer);
        Ok(())
    }

    /// Unregisters an observer by id. Returns `true` when removed.
    pub fn unregister(&mut self, observer_id: &str) -> bool {
        if let Some(position) = self
            .observers
            .iter()
            .position(|entry| entry.id() == observer_id)
        {
            self.observers.remove(position);
            return true;
        }
        false
    }

    #[must_use]
    pub fn has_observer(&self, observer_id: &str) -> bool {
        self.observers
            .iter()
            .any(|observer| observer.id() == observer_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn emit(&mut self, event: &ChartEvent) {
        trace!(topic = event.topic(), observers = self.observers.len(), "chart event");
        for observer in &mut self.observers {
            observer.on_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartEvent, ChartState};

    #[test]
    fn state_mirrors_disabled_flags() {
        let state = ChartState::from_disabled(&[true, false]);
        assert_eq!(state.active, vec![false, true]);
        assert_eq!(state.disabled(), vec![true, false]);
    }

    #[test]
    fn events_serialize_with_topic_names() {
        let json = serde_json::to_string(&ChartEvent::StateChange {
            disabled: vec![false, true],
        })
        .expect("serialize event");
        assert_eq!(
            json,
            r#"{"topic":"stateChange","payload":{"disabled":[false,true]}}"#
        );
        assert_eq!(ChartEvent::RenderEnd.topic(), "renderEnd");
    }
}
