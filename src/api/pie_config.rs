use serde::{Deserialize, Serialize};

use crate::components::{LegendMetrics, PieLabelType};
use crate::core::{Margin, MarginPatch, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

use super::LegendMode;
use super::composite_config::{
    default_duration_ms, default_fallback_size, default_no_data_text, default_palette,
    default_true, validate_legend_metrics, validate_margin, validate_outer_size, validate_palette,
};

/// Serializable setup of a [`super::PieChart`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieChartConfig {
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default = "default_pie_margin")]
    pub margin: Margin,
    #[serde(default)]
    pub show_legend: LegendMode,
    #[serde(default)]
    pub legend_radio_mode: bool,
    #[serde(default = "default_palette")]
    pub palette: Vec<Color>,
    #[serde(default = "default_true")]
    pub tooltips: bool,
    /// Upward shift of the tooltip anchor so it does not sit under the pointer.
    #[serde(default = "default_tooltip_lift")]
    pub tooltip_lift_px: f64,
    #[serde(default = "default_no_data_text")]
    pub no_data_text: String,
    #[serde(default)]
    pub donut: bool,
    #[serde(default = "default_donut_ratio")]
    pub donut_ratio: f64,
    #[serde(default = "default_true")]
    pub show_labels: bool,
    #[serde(default)]
    pub label_type: PieLabelType,
    #[serde(default = "default_label_threshold")]
    pub label_threshold: f64,
    #[serde(default = "default_value_decimals")]
    pub value_decimals: usize,
    #[serde(default = "default_fallback_size")]
    pub fallback_size: Viewport,
    #[serde(default)]
    pub legend_metrics: LegendMetrics,
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u32,
}

impl Default for PieChartConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            margin: default_pie_margin(),
            show_legend: LegendMode::default(),
            legend_radio_mode: false,
            palette: default_palette(),
            tooltips: true,
            tooltip_lift_px: default_tooltip_lift(),
            no_data_text: default_no_data_text(),
            donut: false,
            donut_ratio: default_donut_ratio(),
            show_labels: true,
            label_type: PieLabelType::default(),
            label_threshold: default_label_threshold(),
            value_decimals: default_value_decimals(),
            fallback_size: default_fallback_size(),
            legend_metrics: LegendMetrics::default(),
            duration_ms: default_duration_ms(),
        }
    }
}

impl PieChartConfig {
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
    pub fn with_donut(mut self, donut: bool, ratio: f64) -> Self {
        self.donut = donut;
        self.donut_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_labels(mut self, show: bool, label_type: PieLabelType, threshold: f64) -> Self {
        self.show_labels = show;
        self.label_type = label_type;
        self.label_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_value_decimals(mut self, decimals: usize) -> Self {
        self.value_decimals = decimals;
        self
    }

    #[must_use]
    pub fn with_fallback_size(mut self, size: Viewport) -> Self {
        self.fallback_size = size;
        self
    }

    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        validate_outer_size(self.width, self.height, self.fallback_size)?;
        validate_margin(self.margin)?;
        validate_palette(&self.palette)?;
        if !(0.0..=1.0).contains(&self.donut_ratio) {
            return Err(ChartError::InvalidConfig(
                "donut ratio must be in [0, 1]".to_owned(),
            ));
        }
        if !(0.0..=1.0).contains(&self.label_threshold) {
            return Err(ChartError::InvalidConfig(
                "label threshold must be in [0, 1]".to_owned(),
            ));
        }
        if !self.tooltip_lift_px.is_finite() {
            return Err(ChartError::InvalidConfig(
                "tooltip lift must be finite".to_owned(),
            ));
        }
        validate_legend_metrics(self.legend_metrics)
    }
}

fn default_pie_margin() -> Margin {
    Margin::new(30.0, 20.0, 20.0, 20.0)
}

fn default_tooltip_lift() -> f64 {
    50.0
}

fn default_donut_ratio() -> f64 {
    0.5
}

fn default_label_threshold() -> f64 {
    0.02
}

fn default_value_decimals() -> usize {
    2
}
