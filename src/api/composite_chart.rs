use std::borrow::Cow;
use std::fmt;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::components::{
    AxisOrientation, AxisRenderer, AxisShift, AxisTick, COMPOSITE_DRAW_ORDER, ColoredSeries,
    HitLayer, LegendAlign, LegendItem, LegendLayout, LegendRenderer, LineRenderer, LocalCanvas,
    MultiBarRenderer, StackedAreaRenderer, SubChart, ValueFormatterFn, format_grouped,
    precision_for_step, resolve_color, solo_disabled, toggle_disabled,
};
use crate::core::{
    AxisDomains, DataPoint, EMPTY_DOMAIN, LinearScale, Margin, Series, SeriesKind, Viewport,
    YAxis, resolve_domains,
};
use crate::error::ChartResult;
use crate::events::{ChartEvent, ChartObserver};
use crate::interaction::HoverEvent;
use crate::render::{Color, RenderFrame, Renderer, TextHAlign};

use super::chart_runtime::ChartRuntimeState;
use super::{
    CompositeChartConfig, LegendMode, MarginBox, PointAccessorFn, StateDelta, TooltipContentFn,
    TooltipContext, TooltipGravity, TooltipPresenter, TooltipRequest, apply_state_delta,
    available_size, default_composite_tooltip, disabled_flags, legend_origin, outer_size,
    tick_count,
};

const NO_DATA_FONT_SIZE_PX: f64 = 14.0;

/// Outcome of one composite render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeRenderSummary {
    /// The placeholder text was drawn instead of the chart.
    pub no_data: bool,
    pub outer: (f64, f64),
    pub available: (f64, f64),
    pub margin: Margin,
    pub domains: AxisDomains,
    /// Horizontal shift applied to lines and the x-axis to meet bar centres.
    pub band_centre_offset: f64,
    /// Pipelines that drew at least one series, in draw order.
    pub drawn: SmallVec<[SubChart; 6]>,
    pub legend: Option<LegendLayout>,
    pub legend_origin: Option<(f64, f64)>,
    pub x_ticks: Vec<AxisTick>,
    /// `None` when the axis has no enabled series.
    pub y1_ticks: Option<Vec<AxisTick>>,
    pub y2_ticks: Option<Vec<AxisTick>>,
}

/// Geometry of the last pass, kept for pointer and legend hit tests.
#[derive(Debug, Clone, Default)]
struct CompositePass {
    margin: Margin,
    layers: Vec<(SubChart, HitLayer)>,
    legend: Option<(LegendLayout, (f64, f64))>,
    x_precision: usize,
    y_precision: [usize; 2],
}

#[derive(Clone, Default)]
struct CompositeCallbacks {
    x_accessor: Option<PointAccessorFn>,
    y_accessor: Option<PointAccessorFn>,
    x_tick_formatter: Option<ValueFormatterFn>,
    y1_tick_formatter: Option<ValueFormatterFn>,
    y2_tick_formatter: Option<ValueFormatterFn>,
    tooltip_content: Option<TooltipContentFn>,
}

/// Line, bar and stacked-area series sharing an x-axis, on two y-axes.
pub struct CompositeChart<R: Renderer> {
    renderer: R,
    config: CompositeChartConfig,
    data: Vec<Series>,
    margin: MarginBox,
    callbacks: CompositeCallbacks,
    runtime: ChartRuntimeState,
    last_pass: Option<CompositePass>,
}

impl<R: Renderer> fmt::Debug for CompositeChart<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeChart")
            .field("config", &self.config)
            .field("series", &self.data.len())
            .field("margin", &self.margin)
            .field("runtime", &self.runtime)
            .finish_non_exhaustive()
    }
}

impl<R: Renderer> CompositeChart<R> {
    pub fn new(renderer: R, config: CompositeChartConfig) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            renderer,
            margin: MarginBox::new(config.margin),
            config,
            data: Vec::new(),
            callbacks: CompositeCallbacks::default(),
            runtime: ChartRuntimeState::with_pending_update(),
            last_pass: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &CompositeChartConfig {
        &self.config
    }

    /// Replaces the configuration. The margin baseline is reset.
    pub fn set_config(&mut self, config: CompositeChartConfig) -> ChartResult<()> {
        config.validate()?;
        self.margin = MarginBox::new(config.margin);
        self.config = config;
        self.runtime.needs_update = true;
        Ok(())
    }

    #[must_use]
    pub fn data(&self) -> &[Series] {
        &self.data
    }

    pub fn set_data(&mut self, data: Vec<Series>) {
        debug!(series = data.len(), "set composite data");
        self.data = data;
        self.runtime.needs_update = true;
    }

    /// Current margin, including any legend adjustment from the last pass.
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

    /// Offset added to tooltip anchors, e.g. the container's position in its parent.
    pub fn set_container_offset(&mut self, left: f64, top: f64) {
        self.runtime.container_offset = (left, top);
    }

    pub fn set_x_accessor(&mut self, accessor: Option<PointAccessorFn>) {
        self.callbacks.x_accessor = accessor;
        self.runtime.needs_update = true;
    }

    pub fn set_y_accessor(&mut self, accessor: Option<PointAccessorFn>) {
        self.callbacks.y_accessor = accessor;
        self.runtime.needs_update = true;
    }

    pub fn set_x_tick_formatter(&mut self, formatter: Option<ValueFormatterFn>) {
        self.callbacks.x_tick_formatter = formatter;
        self.runtime.needs_update = true;
    }

    pub fn set_y_tick_formatter(&mut self, y_axis: YAxis, formatter: Option<ValueFormatterFn>) {
        match y_axis {
            YAxis::Primary => self.callbacks.y1_tick_formatter = formatter,
            YAxis::Secondary => self.callbacks.y2_tick_formatter = formatter,
        }
        self.runtime.needs_update = true;
    }

    pub fn set_tooltip_content(&mut self, content: Option<TooltipContentFn>) {
        self.callbacks.tooltip_content = content;
    }

    /// Runs one full layout and draw pass and hands the frame to the renderer.
    pub fn render(&mut self) -> ChartResult<CompositeRenderSummary> {
        let container = self.renderer.container_size();
        let outer = outer_size(
            container,
            self.config.width,
            self.config.height,
            self.config.fallback_size,
        );
        let viewport = Viewport::new(
            outer.0.max(1.0).round() as u32,
            outer.1.max(1.0).round() as u32,
        );
        let mut frame = RenderFrame::new(viewport).with_transition_ms(self.config.duration_ms);

        let (summary, pass, margin) = if self.has_no_data() {
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
            drawn = summary.drawn.len(),
            available_width = summary.available.0,
            available_height = summary.available.1,
            band_centre_offset = summary.band_centre_offset,
            "composite render pass"
        );
        Ok(summary)
    }

    fn has_no_data(&self) -> bool {
        self.data.iter().all(|series| series.values.is_empty())
    }

    fn build_no_data(
        &self,
        frame: &mut RenderFrame,
        outer: (f64, f64),
    ) -> (CompositeRenderSummary, Option<CompositePass>, MarginBox) {
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
        let summary = CompositeRenderSummary {
            no_data: true,
            outer,
            available,
            margin,
            domains: AxisDomains {
                x: None,
                y1: None,
                y2: None,
            },
            band_centre_offset: 0.0,
            drawn: SmallVec::new(),
            legend: None,
            legend_origin: None,
            x_ticks: Vec::new(),
            y1_ticks: None,
            y2_ticks: None,
        };
        (summary, None, self.margin)
    }

    /// Series values with the configured accessors applied.
    fn resolved_data(&self) -> Cow<'_, [Series]> {
        if self.callbacks.x_accessor.is_none() && self.callbacks.y_accessor.is_none() {
            return Cow::Borrowed(&self.data);
        }
        let x_of = self.callbacks.x_accessor.as_ref();
        let y_of = self.callbacks.y_accessor.as_ref();
        Cow::Owned(
            self.data
                .iter()
                .map(|series| Series {
                    values: series
                        .values
                        .iter()
                        .enumerate()
                        .map(|(index, point)| {
                            DataPoint::new(
                                x_of.map_or(point.x, |accessor| accessor(point, index)),
                                y_of.map_or(point.y, |accessor| accessor(point, index)),
                            )
                        })
                        .collect(),
                    ..series.clone()
                })
                .collect(),
        )
    }

    fn build_chart(
        &self,
        frame: &mut RenderFrame,
        outer: (f64, f64),
    ) -> (CompositeRenderSummary, Option<CompositePass>, MarginBox) {
        let config = &self.config;
        let data = self.resolved_data();
        let colors: Vec<Color> = data
            .iter()
            .enumerate()
            .map(|(index, series)| resolve_color(series.color, &config.palette, index))
            .collect();

        let mut margin_box = self.margin;
        let mut available = available_size(outer, margin_box.margin);

        let legend = if config.show_legend.is_visible() {
            let (width, align) = match config.show_legend {
                LegendMode::Bottom => (available.0, LegendAlign::Centre),
                _ => (available.0 * 0.5, LegendAlign::Right),
            };
            let renderer = LegendRenderer::new(config.legend_metrics, align);
            let labels: Vec<String> = data.iter().map(Series::display_key).collect();
            let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();
            let layout = renderer.measure(&label_refs, width);

            margin_box = margin_box.apply_legend_height(config.show_legend, layout.height);
            available = available_size(outer, margin_box.margin);
            let origin = legend_origin(
                config.show_legend,
                available,
                margin_box.margin,
                layout.height,
                available.0 * 0.5,
            );
            let items: Vec<LegendItem> = labels
                .into_iter()
                .zip(data.iter().zip(&colors))
                .map(|(label, (series, &color))| LegendItem {
                    label,
                    color,
                    disabled: series.disabled,
                })
                .collect();
            Some((renderer, layout, origin, items))
        } else {
            None
        };

        let margin = margin_box.margin;
        let (width, height) = available;
        let domains = resolve_domains(&data, config.domain_overrides(), config.stacked_bars);
        let x_scale = LinearScale::new(domains.x.unwrap_or(EMPTY_DOMAIN), (0.0, width));
        let y_scales = [YAxis::Primary, YAxis::Secondary].map(|y_axis| {
            let domain = domains.y(y_axis).unwrap_or_else(|| {
                trace!(axis = y_axis.number(), "empty y domain; using fallback");
                EMPTY_DOMAIN
            });
            LinearScale::new(domain, (height, 0.0))
        });
        let y_scale = |y_axis: YAxis| match y_axis {
            YAxis::Primary => y_scales[0],
            YAxis::Secondary => y_scales[1],
        };

        let highlighted = self.runtime.interaction.highlighted();
        let mut plot = LocalCanvas::new(frame, (margin.left, margin.top));
        let mut layers = Vec::with_capacity(COMPOSITE_DRAW_ORDER.len());
        let mut drawn = SmallVec::new();
        let mut bar_offsets = [None, None];

        for sub_chart in COMPOSITE_DRAW_ORDER {
            let layer = match sub_chart {
                SubChart::Bars(y_axis) => {
                    let entries = entries_for(&data, &colors, y_axis, SeriesKind::Bar);
                    if entries.is_empty() {
                        continue;
                    }
                    let bars = MultiBarRenderer::new(y_scale(y_axis), y_axis, width, height)
                        .with_group_spacing(config.bar_group_spacing)
                        .with_stacked(config.stacked_bars);
                    bar_offsets[usize::from(y_axis == YAxis::Secondary)] =
                        bars.range_band_centre_offset(&entries);
                    bars.draw(&mut plot, &entries, highlighted)
                }
                SubChart::Lines(y_axis) => {
                    let entries = entries_for(&data, &colors, y_axis, SeriesKind::Line);
                    if entries.is_empty() {
                        continue;
                    }
                    let offset = config
                        .bar_offset_tie_break
                        .resolve(bar_offsets[0], bar_offsets[1]);
                    let mut lines = LineRenderer::new(x_scale, y_scale(y_axis), y_axis)
                        .with_interpolation(config.interpolation)
                        .with_hover_radius(config.hover_radius_px);
                    if offset > 0.0 {
                        lines = lines.with_x_padding(offset);
                    }
                    lines.draw(&mut plot, &entries, highlighted)
                }
                SubChart::StackedArea(y_axis) => {
                    let entries = entries_for(&data, &colors, y_axis, SeriesKind::Area);
                    if entries.is_empty() {
                        continue;
                    }
                    StackedAreaRenderer::new(x_scale, y_scale(y_axis), y_axis)
                        .with_interpolation(config.interpolation)
                        .with_hover_radius(config.hover_radius_px)
                        .draw(&mut plot, &entries, highlighted)
                }
                SubChart::Pie => continue,
            };
            drawn.push(sub_chart);
            layers.push((sub_chart, layer));
        }

        let band_centre_offset = config
            .bar_offset_tie_break
            .resolve(bar_offsets[0], bar_offsets[1]);

        let longest = data.iter().map(|series| series.values.len()).max().unwrap_or(0);
        let x_axis = AxisRenderer::new(
            AxisOrientation::Bottom,
            x_scale,
            tick_count(width / config.x_tick_spacing_px, longest),
        )
        .with_shift(AxisShift::centred_on_bands(band_centre_offset, width))
        .with_grid_length(height)
        .with_formatter(self.callbacks.x_tick_formatter.clone());
        let x_ticks = x_axis.draw(&mut plot.nested((0.0, height)));

        let y_tick_count = tick_count(height / config.y_tick_spacing_px, longest);
        let mut y_ticks = [None, None];
        for (slot, (y_axis, orientation, origin_x, formatter)) in [
            (
                YAxis::Primary,
                AxisOrientation::Left,
                0.0,
                &self.callbacks.y1_tick_formatter,
            ),
            (
                YAxis::Secondary,
                AxisOrientation::Right,
                width,
                &self.callbacks.y2_tick_formatter,
            ),
        ]
        .into_iter()
        .enumerate()
        {
            let axis_has_series = data
                .iter()
                .any(|series| series.is_enabled() && series.y_axis == y_axis);
            if !axis_has_series {
                continue;
            }
            let axis = AxisRenderer::new(orientation, y_scale(y_axis), y_tick_count)
                .with_grid_length(width)
                .with_formatter(formatter.clone());
            y_ticks[slot] = Some(axis.draw(&mut plot.nested((origin_x, 0.0))));
        }

        let legend = legend.map(|(renderer, layout, origin, items)| {
            renderer.draw(&mut plot.nested(origin), &items, &layout);
            (layout, origin)
        });

        let tick_precision = |ticks: &[AxisTick]| match ticks {
            [first, second, ..] => precision_for_step(second.value - first.value),
            _ => 0,
        };
        let pass = CompositePass {
            margin,
            layers,
            legend: legend.clone(),
            x_precision: tick_precision(x_ticks.as_slice()),
            y_precision: [
                y_ticks[0].as_deref().map_or(0, tick_precision),
                y_ticks[1].as_deref().map_or(0, tick_precision),
            ],
        };
        let [y1_ticks, y2_ticks] = y_ticks;
        let summary = CompositeRenderSummary {
            no_data: false,
            outer,
            available,
            margin,
            domains,
            band_centre_offset,
            drawn,
            legend_origin: legend.as_ref().map(|(_, origin)| *origin),
            legend: legend.map(|(layout, _)| layout),
            x_ticks,
            y1_ticks,
            y2_ticks,
        };
        (summary, Some(pass), margin_box)
    }

    /// Pointer moved to `(x, y)` in container coordinates.
    ///
    /// Returns the published hover event, translated to container
    /// coordinates, or `None` when nothing is hovered or the hover was
    /// suppressed.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<HoverEvent> {
        let pass = self.last_pass.as_ref()?;
        let local = (x - pass.margin.left, y - pass.margin.top);
        let hit = pass.layers.iter().rev().find_map(|(sub_chart, layer)| {
            layer
                .hit_test(local)
                .map(|event| (*sub_chart, event.clone()))
        });

        let Some((sub_chart, event)) = hit else {
            self.pointer_leave();
            return None;
        };
        let suppressed = matches!(sub_chart, SubChart::StackedArea(_))
            && self.config.hover_suppression.suppresses(event.value);
        let margin = pass.margin;
        let request = (!suppressed && self.config.tooltips)
            .then(|| self.tooltip_request(&event.clone().translated(margin)));
        self.runtime
            .pointer_hit(event, suppressed, margin, self.config.tooltips, request)
    }

    /// Pointer left the hovered element or the chart.
    pub fn pointer_leave(&mut self) -> bool {
        self.runtime.pointer_leave(self.config.tooltips)
    }

    /// Runs work deferred by the last pointer events. Returns how many actions ran.
    pub fn run_deferred(&mut self) -> usize {
        self.runtime.run_deferred()
    }

    #[must_use]
    pub fn hovered(&self) -> Option<&HoverEvent> {
        self.runtime.interaction.hovered()
    }

    fn tooltip_request(&self, event: &HoverEvent) -> TooltipRequest {
        let pass = self.last_pass.as_ref();
        let point = event.point.unwrap_or(DataPoint::new(f64::NAN, event.value));
        let x = match &self.callbacks.x_tick_formatter {
            Some(formatter) => formatter(point.x),
            None => format_grouped(point.x, pass.map_or(0, |pass| pass.x_precision)),
        };
        let (formatter, slot) = match event.y_axis.unwrap_or_default() {
            YAxis::Primary => (&self.callbacks.y1_tick_formatter, 0),
            YAxis::Secondary => (&self.callbacks.y2_tick_formatter, 1),
        };
        let y = match formatter {
            Some(formatter) => formatter(point.y),
            None => format_grouped(point.y, pass.map_or(0, |pass| pass.y_precision[slot])),
        };
        let key = self
            .data
            .get(event.series_index)
            .map_or_else(|| event.series_key.clone(), Series::display_key);
        let color = event.color.to_hex();
        let context = TooltipContext {
            key: &key,
            x: &x,
            y: &y,
            color: &color,
            event,
        };
        let content = match &self.callbacks.tooltip_content {
            Some(content) => content(&context),
            None => default_composite_tooltip()(&context),
        };
        let (offset_left, offset_top) = self.runtime.container_offset;
        TooltipRequest {
            left: event.pos[0] + offset_left,
            top: event.pos[1] + offset_top,
            content,
            gravity: TooltipGravity::S,
        }
    }

    /// Legend item under `(x, y)` in container coordinates.
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

    /// Click at `(x, y)`; toggles the legend item there. Returns the item index.
    pub fn legend_click(&mut self, x: f64, y: f64) -> ChartResult<Option<usize>> {
        let Some(index) = self.legend_item_at(x, y) else {
            return Ok(None);
        };
        self.toggle_series(index)?;
        Ok(Some(index))
    }

    /// Double click at `(x, y)`; leaves only the legend item there enabled.
    pub fn legend_double_click(&mut self, x: f64, y: f64) -> ChartResult<Option<usize>> {
        let Some(index) = self.legend_item_at(x, y) else {
            return Ok(None);
        };
        let delta = StateDelta::new(solo_disabled(self.data.len(), index));
        self.apply_legend_delta(&delta)?;
        Ok(Some(index))
    }

    /// Legend toggle of series `index`, honouring radio mode and the
    /// all-disabled reset.
    pub fn toggle_series(&mut self, index: usize) -> ChartResult<()> {
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

fn entries_for<'a>(
    data: &'a [Series],
    colors: &[Color],
    y_axis: YAxis,
    kind: SeriesKind,
) -> Vec<ColoredSeries<'a>> {
    data.iter()
        .enumerate()
        .filter(|(_, series)| series.is_enabled() && series.matches(y_axis, kind))
        .map(|(index, series)| ColoredSeries {
            index,
            series,
            color: colors[index],
        })
        .collect()
}
