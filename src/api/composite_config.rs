use serde::{Deserialize, Serialize};

use crate::components::{CATEGORY20, Interpolation, LegendMetrics};
use crate::core::{DomainOverrides, Margin, MarginPatch, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::HoverSuppression;
use crate::render::Color;

use super::LegendMode;

/// Which bar pipeline's centring offset wins when both axes draw bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BarOffsetTieBreak {
    /// Right-axis bars are drawn last and overwrite the left-axis offset.
    #[default]
    LastDrawn,
    FirstDrawn,
    /// The larger of the two offsets (fewer bands).
    Widest,
}

impl BarOffsetTieBreak {
    #[must_use]
    pub fn resolve(self, primary: Option<f64>, secondary: Option<f64>) -> f64 {
        match (primary, secondary) {
            (Some(first), Some(second)) => match self {
                Self::LastDrawn => second,
                Self::FirstDrawn => first,
                Self::Widest => first.max(second),
            },
            (Some(offset), None) | (None, Some(offset)) => offset,
            (None, None) => 0.0,
        }
    }
}

/// Serializable setup of a [`super::CompositeChart`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeChartConfig {
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default = "default_composite_margin")]
    pub margin: Margin,
    #[serde(default)]
    pub show_legend: LegendMode,
    #[serde(default)]
    pub legend_radio_mode: bool,
    #[serde(default = "default_palette")]
    pub palette: Vec<Color>,
    #[serde(default = "default_true")]
    pub tooltips: bool,
    #[serde(default = "default_no_data_text")]
    pub no_data_text: String,
    #[serde(default)]
    pub y_domain1: Option<(f64, f64)>,
    #[serde(default)]
    pub y_domain2: Option<(f64, f64)>,
    #[serde(default = "default_interpolation")]
    pub interpolation: Interpolation,
    #[serde(default)]
    pub stacked_bars: bool,
    #[serde(default = "default_bar_group_spacing")]
    pub bar_group_spacing: f64,
    #[serde(default = "default_hover_radius")]
    pub hover_radius_px: f64,
    #[serde(default)]
    pub hover_suppression: HoverSuppression,
    #[serde(default)]
    pub bar_offset_tie_break: BarOffsetTieBreak,
    #[serde(default = "default_fallback_size")]
    pub fallback_size: Viewport,
    #[serde(default = "default_x_tick_spacing")]
    pub x_tick_spacing_px: f64,
    #[serde(default = "default_y_tick_spacing")]
    pub y_tick_spacing_px: f64,
    #[serde(default)]
    pub legend_metrics: LegendMetrics,
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u32,
}

impl Default for CompositeChartConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            margin: default_composite_margin(),
            show_legend: LegendMode::default(),
            legend_radio_mode: false,
            palette: default_palette(),
            tooltips: true,
            no_data_text: default_no_data_text(),
            y_domain1: None,
            y_domain2: None,
            interpolation: default_interpolation(),
            stacked_bars: false,
            bar_group_spacing: default_bar_group_spacing(),
            hover_radius_px: default_hover_radius(),
            hover_suppression: HoverSuppression::default(),
            bar_offset_tie_break: BarOffsetTieBreak::default(),
            fallback_size: default_fallback_size(),
            x_tick_spacing_px: default_x_tick_spacing(),
            y_tick_spacing_px: default_y_tick_spacing(),
            legend_metrics: LegendMetrics::default(),
            duration_ms: default_duration_ms(),
        }
    }
}

impl CompositeChartConfig {
    /// Fixes the outer size instead of asking the renderer for it.
    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Overrides only the margin sides set in `patch`.
    #[must_use]
    pub fn with_margin_patch(mut self, patch: MarginPatch) -> Self {
        self.margin = self.margin.patched(patch);
        self
    }

    #[must_use]
    pub fn with_legend(mut self, mode: LegendMode) -> Self {
        self.show_legend = mode;
        self
    }

    #[must_use]
    pub fn with_legend_radio_mode(mut self, enabled: bool) -> Self {
        self.legend_radio_mode = enabled;
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: Vec<Color>) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn with_tooltips(mut self, enabled: bool) -> Self {
        self.tooltips = enabled;
        self
    }

    #[must_use]
    pub fn with_no_data_text(mut self, text: impl Into<String>) -> Self {
        self.no_data_text = text.into();
        self
    }

    #[must_use]
    pub fn with_y_domain1(mut self, domain: Option<(f64, f64)>) -> Self {
        self.y_domain1 = domain;
        self
    }

    #[must_use]
    pub fn with_y_domain2(mut self, domain: Option<(f64, f64)>) -> Self {
        self.y_domain2 = domain;
        self
    }

    #[must_use]
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    #[must_use]
    pub fn with_stacked_bars(mut self, stacked: bool) -> Self {
        self.stacked_bars = stacked;
        self
    }

    #[must_use]
    pub fn with_bar_group_spacing(mut self, spacing: f64) -> Self {
        self.bar_group_spacing = spacing;
        self
    }

    #[must_use]
    pub fn with_hover_radius_px(mut self, radius: f64) -> Self {
        self.hover_radius_px = radius;
        self
    }

    #[must_use]
    pub fn with_hover_suppression(mut self, suppression: HoverSuppression) -> Self {
        self.hover_suppression = suppression;
        self
    }

    #[must_use]
    pub fn with_bar_offset_tie_break(mut self, tie_break: BarOffsetTieBreak) -> Self {
        self.bar_offset_tie_break = tie_break;
        self
    }

    #[must_use]
    pub fn with_fallback_size(mut self, size: Viewport) -> Self {
        self.fallback_size = size;
        self
    }

    #[must_use]
    pub fn with_tick_spacing_px(mut self, x_spacing: f64, y_spacing: f64) -> Self {
        self.x_tick_spacing_px = x_spacing;
        self.y_tick_spacing_px = y_spacing;
        self
    }

    #[must_use]
    pub fn with_legend_metrics(mut self, metrics: LegendMetrics) -> Self {
        self.legend_metrics = metrics;
        self
    }

    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    #[must_use]
    pub fn domain_overrides(&self) -> DomainOverrides {
        DomainOverrides {
            y1: self.y_domain1,
            y2: self.y_domain2,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        validate_outer_size(self.width, self.height, self.fallback_size)?;
        validate_margin(self.margin)?;
        validate_palette(&self.palette)?;
        for (name, domain) in [("y_domain1", self.y_domain1), ("y_domain2", self.y_domain2)] {
            if let Some((min, max)) = domain {
                if !min.is_finite() || !max.is_finite() {
                    return Err(ChartError::InvalidConfig(format!("{name} must be finite")));
                }
            }
        }
        if !(0.0..1.0).contains(&self.bar_group_spacing) {
            return Err(ChartError::InvalidConfig(
                "bar group spacing must be in [0, 1)".to_owned(),
            ));
        }
        if !self.hover_radius_px.is_finite() || self.hover_radius_px < 0.0 {
            return Err(ChartError::InvalidConfig(
                "hover radius must be finite and >= 0".to_owned(),
            ));
        }
        let precision = self.hover_suppression.precision;
        if !precision.is_finite() || precision <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "hover suppression precision must be finite and > 0".to_owned(),
            ));
        }
        for (name, spacing) in [
            ("x tick spacing", self.x_tick_spacing_px),
            ("y tick spacing", self.y_tick_spacing_px),
        ] {
            if !spacing.is_finite() || spacing <= 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        validate_legend_metrics(self.legend_metrics)
    }
}

pub(super) fn validate_outer_size(
    width: Option<f64>,
    height: Option<f64>,
    fallback: Viewport,
) -> ChartResult<()> {
    if !fallback.is_valid() {
        return Err(ChartError::InvalidViewport {
            width: fallback.width,
            height: fallback.height,
        });
    }
    for (name, value) in [("width", width), ("height", height)] {
        if let Some(value) = value {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
    }
    Ok(())
}

pub(super) fn validate_margin(margin: Margin) -> ChartResult<()> {
    if !margin.is_finite() {
        return Err(ChartError::InvalidConfig(
            "margin values must be finite".to_owned(),
        ));
    }
    Ok(())
}

pub(super) fn validate_palette(palette: &[Color]) -> ChartResult<()> {
    for color in palette {
        color.validate()?;
    }
    Ok(())
}

pub(super) fn validate_legend_metrics(metrics: LegendMetrics) -> ChartResult<()> {
    let values = [
        metrics.font_size_px,
        metrics.item_padding_px,
        metrics.row_height_px,
        metrics.margin_top_px,
        metrics.margin_bottom_px,
        metrics.bullet_radius_px,
    ];
    if values.iter().any(|value| !value.is_finite() || *value < 0.0) {
        return Err(ChartError::InvalidConfig(
            "legend metrics must be finite and >= 0".to_owned(),
        ));
    }
    if metrics.font_size_px <= 0.0 {
        return Err(ChartError::InvalidConfig(
            "legend font size must be > 0".to_owned(),
        ));
    }
    Ok(())
}

fn default_composite_margin() -> Margin {
    Margin::new(30.0, 20.0, 50.0, 60.0)
}

pub(super) fn default_palette() -> Vec<Color> {
    CATEGORY20.to_vec()
}

pub(super) fn default_true() -> bool {
    true
}

pub(super) fn default_no_data_text() -> String {
    "No Data Available.".to_owned()
}

fn default_interpolation() -> Interpolation {
    Interpolation::Monotone
}

fn default_bar_group_spacing() -> f64 {
    0.1
}

fn default_hover_radius() -> f64 {
    20.0
}

pub(super) fn default_fallback_size() -> Viewport {
    Viewport::new(960, 400)
}

fn default_x_tick_spacing() -> f64 {
    100.0
}

fn default_y_tick_spacing() -> f64 {
    36.0
}

pub(super) fn default_duration_ms() -> u32 {
    250
}

#[cfg(test)]
mod tests {
    use super::{BarOffsetTieBreak, CompositeChartConfig};
    use crate::api::LegendMode;
    use crate::components::Interpolation;

    #[test]
    fn empty_json_yields_defaults() {
        let config: CompositeChartConfig = serde_json::from_str("{}").expect("parse config");
        assert_eq!(config, CompositeChartConfig::default());
        assert_eq!(config.margin.bottom, 50.0);
        assert_eq!(config.interpolation, Interpolation::Monotone);
        assert_eq!(config.no_data_text, "No Data Available.");
        assert_eq!(config.palette.len(), 20);
    }

    #[test]
    fn legend_and_domain_options_parse() {
        let json = r#"{"show_legend":"bottom","y_domain1":[0,100],"width":640}"#;
        let config: CompositeChartConfig = serde_json::from_str(json).expect("parse config");
        assert_eq!(config.show_legend, LegendMode::Bottom);
        assert_eq!(config.y_domain1, Some((0.0, 100.0)));
        assert_eq!(config.width, Some(640.0));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(CompositeChartConfig::default().validate().is_ok());
        assert!(
            CompositeChartConfig::default()
                .with_bar_group_spacing(1.0)
                .validate()
                .is_err()
        );
        assert!(
            CompositeChartConfig::default()
                .with_size(f64::NAN, 10.0)
                .validate()
                .is_err()
        );
        assert!(
            CompositeChartConfig::default()
                .with_y_domain2(Some((0.0, f64::INFINITY)))
                .validate()
                .is_err()
        );
    }

    #[test]
    fn tie_break_picks_the_configured_axis() {
        assert_eq!(BarOffsetTieBreak::LastDrawn.resolve(Some(10.0), Some(20.0)), 20.0);
        assert_eq!(BarOffsetTieBreak::FirstDrawn.resolve(Some(10.0), Some(20.0)), 10.0);
        assert_eq!(BarOffsetTieBreak::Widest.resolve(Some(30.0), Some(20.0)), 30.0);
        assert_eq!(BarOffsetTieBreak::LastDrawn.resolve(Some(10.0), None), 10.0);
        assert_eq!(BarOffsetTieBreak::FirstDrawn.resolve(None, None), 0.0);
    }
}
