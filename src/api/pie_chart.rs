use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::components::{
    HitLayer, LegendAlign, LegendItem, LegendLayout, LegendRenderer, LocalCanvas, PieArc,
    PieRenderer, PieSlice, SubChart, ValueFormatterFn, format_grouped, pie_arcs, resolve_color,
    solo_disabled, toggle_disabled,
};
use crate::core::{Margin, PieDatum, Viewport};
use crate::error::ChartResult;
use crate::events::{ChangeStateRequest, ChartEvent, ChartObserver, ChartState};
use crate::interaction::HoverEvent;
use crate::render::{Color, RenderFrame, Renderer, TextHAlign};

use super::chart_runtime::ChartRuntimeState;
use super::{
    MarginBox, PieChartConfig, StateDelta, TooltipContentFn, TooltipContext,
    TooltipGravity, TooltipPresenter, TooltipRequest, apply_state_delta, available_size,
    default_pie_tooltip, disabled_flags, legend_origin, outer_size,
};

const NO_DATA_FONT_SIZE_PX: f64 = 14.0;

/// Outcome of one pie render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PieRenderSummary {
    pub no_data: bool,
    pub outer: (f64, f64),
    pub available: (f64, f64),
    pub margin: Margin,
    /// One arc per slice in input order; disabled slices have zero extent.
    pub arcs: Vec<PieArc>,
    pub drawn: SmallVec<[SubChart; 1]>,
    pub legend: Option<LegendLayout>,
    pub legend_origin: Option<(f64, f64)>,
}

#[derive(Debug, Clone, Default)]
struct PiePass {
    margin: Margin,
    layer: HitLayer,
    legend: Option<(LegendLayout, (f64, f64))>,
}

/// Pie or donut chart over labelled values.
pub struct PieChart<R: Renderer> {
    renderer: R,
    config: PieChartConfig,
    data: Vec<PieDatum>,
    margin: MarginBox,
    /// Last disabled vector applied through `change_state`.
    state_disabled: Option<Vec<bool>>,
    default_state: Option<ChartState>,
    value_formatter: Option<ValueFormatterFn>,
    tooltip_content: Option<TooltipContentFn>,
    runtime: ChartRuntimeState,
    last_pass: Option<PiePass>,
}

impl<R: Renderer> fmt::Debug for PieChart<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PieChart")
            .field("config", &self.config)
            .field("slices", &self.data.len())
            .field("margin", &self.margin)
            .field("default_state", &self.default_state)
            .field("runtime", &self.runtime)
            .finish_non_exhaustive()
    }
}

impl<R: Renderer> PieChart<R> {
    pub fn new(renderer: R, config: PieChartConfig) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            renderer,
            margin: MarginBox::new(config.margin),
            config,
            data: Vec::new(),
            state_disabled: None,
            default_state: None,
            value_formatter: None,
            tooltip_content: None,
            runtime: ChartRuntimeState::with_pending_update(),
            last_pass: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &PieChartConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PieChartConfig) -> ChartResult<()> {
        config.validate()?;
        self.margin = MarginBox::new(config.margin);
        self.config = config;
        self.runtime.needs_update = true;
        Ok(())
    }

    #[must_use]
    pub fn data(&self) -> &[PieDatum] {
        &self.data
    }

    pub fn set_data(&mut self, data: Vec<PieDatum>) {
        debug!(slices = data.len(), "set pie data");
        self.data = data;
        self.runtime.needs_update = true;
    }

    #[must_use]
    pub fn margin(&self) -> Margin {
        self.margin.margin
    }

    #[must_use]
    pub fn needs_update(&self) -> bool {
        self.runtime.needs_update
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    pub fn register_observer(&mut self, observer: Box<dyn ChartObserver>) -> ChartResult<()> {
        self.runtime.register(observer)
    }

    pub fn unregister_observer(&mut self, observer_id: &str) -> bool {
        self.runtime.relay.unregister(observer_id)
    }

    #[must_use]
    pub fn has_observer(&self, observer_id: &str) -> bool {
        self.runtime.relay.has_observer(observer_id)
    }

    pub fn set_tooltip_presenter(&mut self, presenter: Option<Box<dyn TooltipPresenter>>) {
        self.runtime.tooltip = presenter;
    }

    pub fn set_container_offset(&mut self, left: f64, top: f64) {
        self.runtime.container_offset = (left, top);
    }

    /// Formatter for slice values in labels and tooltips.
    pub fn set_value_formatter(&mut self, formatter: Option<ValueFormatterFn>) {
        self.value_formatter = formatter;
        self.runtime.needs_update = true;
    }

    pub fn set_tooltip_content(&mut self, content: Option<TooltipContentFn>) {
        self.tooltip_content = content;
    }

    /// `{active}` mirror of the slices' disabled flags.
    #[must_use]
    pub fn state(&self) -> ChartState {
        ChartState::from_disabled(&disabled_flags(&self.data))
    }

    /// Disables every slice whose `active` flag is false or missing.
    /// Flags past the last slice are ignored.
    pub fn set_state(&mut self, state: &ChartState) -> ChartResult<()> {
        // Slices without an `active` entry count as inactive.
        let delta = StateDelta::fitted(&state.disabled(), self.data.len(), true);
        apply_state_delta(&mut self.data, &delta)?;
        self.runtime.needs_update = true;
        Ok(())
    }

    /// Applies an external state request and republishes it.
    pub fn change_state(&mut self, request: ChangeStateRequest) -> ChartResult<()> {
        if let Some(disabled) = &request.disabled {
            // Slices without a `disabled` entry are switched back on.
            let delta = StateDelta::fitted(disabled, self.data.len(), false);
            apply_state_delta(&mut self.data, &delta)?;
            self.state_disabled = Some(disabled.clone());
        }
        self.runtime.needs_update = true;
        self.runtime.emit(&ChartEvent::ChangeState(request));
        Ok(())
    }

    /// Disabled vector last applied through [`Self::change_state`].
    #[must_use]
    pub fn requested_disabled(&self) -> Option<&[bool]> {
        self.state_disabled.as_deref()
    }

    /// State captured by the first render pass.
    #[must_use]
    pub fn default_state(&self) -> Option<&ChartState> {
        self.default_state.as_ref()
    }

    /// Restores the state captured by the first render pass.
    pub fn reset_to_default_state(&mut self) -> ChartResult<bool> {
        let Some(state) = self.default_state.clone() else {
            return Ok(false);
        };
        self.set_state(&state)?;
        Ok(true)
    }

    pub fn render(&mut self) -> ChartResult<PieRenderSummary> {
        let outer = outer_size(
            self.renderer.container_size(),
            self.config.width,
            self.config.height,
            self.config.fallback_size,
        );
        let viewport = Viewport::new(
            outer.0.max(1.0).round() as u32,
            outer.1.max(1.0).round() as u32,
        );
        let mut frame = RenderFrame::new(viewport).with_transition_ms(self.config.duration_ms);

        if self.default_state.is_none() && !self.data.is_empty() {
            self.default_state = Some(self.state());
        }

        let (summary, pass, margin) = if self.data.is_empty() {
            self.build_no_data(&mut frame, outer)
        } else {
            self.build_chart(&mut frame, outer)
        };

        self.renderer.render(&frame)?;
        self.margin = margin;
        self.last_pass = pass;
        self.runtime.needs_update = false;
        self.runtime.emit(&ChartEvent::RenderEnd);
        debug!(
            no_data = summary.no_data,
            slices = summary.arcs.len(),
            available_width = summary.available.0,
            available_height = summary.available.1,
            "pie render pass"
        );
        Ok(summary)
    }

    fn build_no_data(
        &self,
        frame: &mut RenderFrame,
        outer: (f64, f64),
    ) -> (PieRenderSummary, Option<PiePass>, MarginBox) {
        let margin = self.margin.margin;
        let available = available_size(outer, margin);
        LocalCanvas::new(frame, (0.0, 0.0)).text(
            self.config.no_data_text.clone(),
            (
                margin.left + available.0 * 0.5,
                margin.top + available.1 * 0.5,
            ),
            NO_DATA_FONT_SIZE_PX,
            Color::rgb(0.0, 0.0, 0.0),
            TextHAlign::Center,
        );
        let summary = PieRenderSummary {
            no_data: true,
            outer,
            available,
            margin,
            arcs: Vec::new(),
            drawn: SmallVec::new(),
            legend: None,
            legend_origin: None,
        };
        (summary, None, self.margin)
    }

    fn build_chart(
        &self,
        frame: &mut RenderFrame,
        outer: (f64, f64),
    ) -> (PieRenderSummary, Option<PiePass>, MarginBox) {
        let config = &self.config;
        let colors: Vec<Color> = self
            .data
            .iter()
            .enumerate()
            .map(|(index, datum)| resolve_color(datum.color, &config.palette, index))
            .collect();

        let mut margin_box = self.margin;
        let mut available = available_size(outer, margin_box.margin);

        let legend = if config.show_legend.is_visible() {
            let renderer = LegendRenderer::new(config.legend_metrics, LegendAlign::Centre);
            let labels: Vec<&str> = self.data.iter().map(|datum| datum.label.as_str()).collect();
            let layout = renderer.measure(&labels, available.0);
            margin_box = margin_box.apply_legend_height(config.show_legend, layout.height);
            available = available_size(outer, margin_box.margin);
            let origin = legend_origin(
                config.show_legend,
                available,
                margin_box.margin,
                layout.height,
                0.0,
            );
            Some((renderer, layout, origin))
        } else {
            None
        };

        let margin = margin_box.margin;
        if available.0 <= 0.0 || available.1 <= 0.0 {
            warn!(
                width = available.0,
                height = available.1,
                "pie drawing area is empty"
            );
        }

        let slices: Vec<PieSlice<'_>> = self
            .data
            .iter()
            .zip(&colors)
            .enumerate()
            .map(|(index, (datum, &color))| PieSlice {
                index,
                datum,
                color,
            })
            .collect();
        let pie = PieRenderer {
            donut: config.donut,
            donut_ratio: config.donut_ratio,
            show_labels: config.show_labels,
            label_type: config.label_type,
            label_threshold: config.label_threshold,
            value_formatter: Some(self.value_formatter()),
            ..PieRenderer::default()
        };

        let mut plot = LocalCanvas::new(frame, (margin.left, margin.top));
        let layer = pie.draw(
            &mut plot,
            &slices,
            available.0,
            available.1,
            self.runtime.interaction.highlighted(),
        );
        let arcs = pie_arcs(
            &self
                .data
                .iter()
                .map(|datum| if datum.disabled { 0.0 } else { datum.value })
                .collect::<Vec<_>>(),
        );

        let legend = legend.map(|(renderer, layout, origin)| {
            let items: Vec<LegendItem> = self
                .data
                .iter()
                .zip(&colors)
                .map(|(datum, &color)| LegendItem {
                    label: datum.label.clone(),
                    color,
                    disabled: datum.disabled,
                })
                .collect();
            renderer.draw(&mut plot.nested(origin), &items, &layout);
            (layout, origin)
        });

        let mut drawn = SmallVec::new();
        if !layer.is_empty() {
            drawn.push(SubChart::Pie);
        }
        let summary = PieRenderSummary {
            no_data: false,
            outer,
            available,
            margin,
            arcs,
            drawn,
            legend_origin: legend.as_ref().map(|(_, origin)| *origin),
            legend: legend.as_ref().map(|(layout, _)| layout.clone()),
        };
        let pass = PiePass {
            margin,
            layer,
            legend,
        };
        (summary, Some(pass), margin_box)
    }

    fn value_formatter(&self) -> ValueFormatterFn {
        match &self.value_formatter {
            Some(formatter) => formatter.clone(),
            None => {
                let decimals = self.config.value_decimals;
                Arc::new(move |value: f64| format_grouped(value, decimals))
            }
        }
    }

    /// Pointer moved to `(x, y)` in container coordinates.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<HoverEvent> {
        let pass = self.last_pass.as_ref()?;
        let local = (x - pass.margin.left, y - pass.margin.top);
        let Some(event) = pass.layer.hit_test(local).cloned() else {
            self.pointer_leave();
            return None;
        };
        let margin = pass.margin;
        let request = self
            .config
            .tooltips
            .then(|| self.tooltip_request(&event.clone().translated(margin)));
        self.runtime
            .pointer_hit(event, false, margin, self.config.tooltips, request)
    }

    pub fn pointer_leave(&mut self) -> bool {
        self.runtime.pointer_leave(self.config.tooltips)
    }

    pub fn run_deferred(&mut self) -> usize {
        self.runtime.run_deferred()
    }

    #[must_use]
    pub fn hovered(&self) -> Option<&HoverEvent> {
        self.runtime.interaction.hovered()
    }

    fn tooltip_request(&self, event: &HoverEvent) -> TooltipRequest {
        let y = self.value_formatter()(event.value);
        let color = event.color.to_hex();
        let context = TooltipContext {
            key: &event.series_key,
            x: "",
            y: &y,
            color: &color,
            event,
        };
        let content = match &self.tooltip_content {
            Some(content) => content(&context),
            None => default_pie_tooltip()(&context),
        };
        let (offset_left, offset_top) = self.runtime.container_offset;
        TooltipRequest {
            left: event.pos[0] + offset_left,
            top: event.pos[1] + offset_top - self.config.tooltip_lift_px,
            content,
            gravity: if event.value < 0.0 {
                TooltipGravity::N
            } else {
                TooltipGravity::S
            },
        }
    }

    #[must_use]
    pub fn legend_item_at(&self, x: f64, y: f64) -> Option<usize> {
        let pass = self.last_pass.as_ref()?;
        let (layout, origin) = pass.legend.as_ref()?;
        let local = (
            x - pass.margin.left - origin.0,
            y - pass.margin.top - origin.1,
        );
        layout.item_at(local, &self.config.legend_metrics)
    }

    pub fn legend_click(&mut self, x: f64, y: f64) -> ChartResult<Option<usize>> {
        let Some(index) = self.legend_item_at(x, y) else {
            return Ok(None);
        };
        self.toggle_slice(index)?;
        Ok(Some(index))
    }

    pub fn legend_double_click(&mut self, x: f64, y: f64) -> ChartResult<Option<usize>> {
        let Some(index) = self.legend_item_at(x, y) else {
            return Ok(None);
        };
        self.apply_legend_delta(&StateDelta::new(solo_disabled(self.data.len(), index)))?;
        Ok(Some(index))
    }

    pub fn toggle_slice(&mut self, index: usize) -> ChartResult<()> {
        let disabled = toggle_disabled(
            &disabled_flags(&self.data),
            index,
            self.config.legend_radio_mode,
        );
        self.apply_legend_delta(&StateDelta::new(disabled))
    }

    fn apply_legend_delta(&mut self, delta: &StateDelta) -> ChartResult<()> {
        if apply_state_delta(&mut self.data, delta)? {
            self.runtime.needs_update = true;
        }
        self.runtime.emit(&ChartEvent::StateChange {
            disabled: delta.disabled.clone(),
        });
        Ok(())
    }
}
