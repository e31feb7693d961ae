use std::fmt;

use tracing::trace;

use crate::core::Margin;
use crate::events::{ChartEvent, ChartObserver, EventRelay};
use crate::error::ChartResult;
use crate::interaction::{DeferredAction, HoverEvent, InteractionState};

use super::{TooltipPresenter, TooltipRequest};

/// Event, tooltip and pointer state shared by both chart kinds.
#[derive(Default)]
pub(super) struct ChartRuntimeState {
    pub(super) relay: EventRelay,
    pub(super) tooltip: Option<Box<dyn TooltipPresenter>>,
    pub(super) interaction: InteractionState,
    /// Position of the chart container inside the tooltip's positioning parent.
    pub(super) container_offset: (f64, f64),
    pub(super) needs_update: bool,
}

impl fmt::Debug for ChartRuntimeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartRuntimeState")
            .field("relay", &self.relay)
            .field("has_tooltip_presenter", &self.tooltip.is_some())
            .field("interaction", &self.interaction)
            .field("container_offset", &self.container_offset)
            .field("needs_update", &self.needs_update)
            .finish()
    }
}

impl ChartRuntimeState {
    pub(super) fn with_pending_update() -> Self {
        Self {
            needs_update: true,
            ..Self::default()
        }
    }

    pub(super) fn register(&mut self, observer: Box<dyn ChartObserver>) -> ChartResult<()> {
        self.relay.register(observer)
    }

    pub(super) fn emit(&mut self, event: &ChartEvent) {
        self.relay.emit(event);
    }

    /// Publishes a hover over `hit` (local coordinates).
    ///
    /// Re-hovering the current element is a no-op. A suppressed hit only
    /// highlights the element and queues the highlight clear.
    pub(super) fn pointer_hit(
        &mut self,
        hit: HoverEvent,
        suppressed: bool,
        margin: Margin,
        tooltips: bool,
        request: Option<TooltipRequest>,
    ) -> Option<HoverEvent> {
        let target = hit.target();
        if let Some(current) = self.interaction.hovered() {
            if current.target() == target {
                return Some(current.clone());
            }
        }
        self.pointer_leave(tooltips);

        self.interaction.set_highlighted(Some(target));
        self.needs_update = true;
        if suppressed {
            trace!(series = %hit.series_key, value = hit.value, "hover suppressed");
            self.interaction.defer(DeferredAction::ClearHoverHighlight);
            return None;
        }

        let event = hit.translated(margin);
        self.interaction.set_hovered(Some(event.clone()));
        self.relay.emit(&ChartEvent::TooltipShow(event.clone()));
        if let (true, Some(presenter), Some(request)) = (tooltips, self.tooltip.as_mut(), request) {
            presenter.show(&request);
        }
        Some(event)
    }

    /// Ends the current hover, if any. Returns whether one was active.
    pub(super) fn pointer_leave(&mut self, tooltips: bool) -> bool {
        let Some(previous) = self.interaction.set_hovered(None) else {
            return false;
        };
        self.interaction.set_highlighted(None);
        self.needs_update = true;
        self.relay.emit(&ChartEvent::TooltipHide(previous));
        if tooltips {
            if let Some(presenter) = self.tooltip.as_mut() {
                presenter.cleanup();
            }
        }
        true
    }

    pub(super) fn run_deferred(&mut self) -> usize {
        let ran = self.interaction.run_deferred();
        if ran > 0 {
            self.needs_update = true;
        }
        ran
    }
}
