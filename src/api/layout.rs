//! Available-area and legend placement math shared by both chart kinds.

use serde::{Deserialize, Serialize};

use crate::core::{Margin, Viewport};
use crate::error::ChartError;

/// Legend visibility and placement.
///
/// Serialized as `false` (hidden), `true` (top) or `"bottom"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "LegendModeRepr", into = "LegendModeRepr")]
pub enum LegendMode {
    Hidden,
    #[default]
    Top,
    Bottom,
}

impl LegendMode {
    #[must_use]
    pub fn is_visible(self) -> bool {
        self != Self::Hidden
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum LegendModeRepr {
    Flag(bool),
    Placement(String),
}

impl TryFrom<LegendModeRepr> for LegendMode {
    type Error = ChartError;

    fn try_from(value: LegendModeRepr) -> Result<Self, Self::Error> {
        match value {
            LegendModeRepr::Flag(false) => Ok(Self::Hidden),
            LegendModeRepr::Flag(true) => Ok(Self::Top),
            LegendModeRepr::Placement(placement) => match placement.as_str() {
                "top" => Ok(Self::Top),
                "bottom" => Ok(Self::Bottom),
                other => Err(ChartError::InvalidConfig(format!(
                    "unknown legend placement `{other}`"
                ))),
            },
        }
    }
}

impl From<LegendMode> for LegendModeRepr {
    fn from(value: LegendMode) -> Self {
        match value {
            LegendMode::Hidden => Self::Flag(false),
            LegendMode::Top => Self::Flag(true),
            LegendMode::Bottom => Self::Placement("bottom".to_owned()),
        }
    }
}

/// Margin plus the bottom value it had before a bottom legend first grew it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginBox {
    pub margin: Margin,
    #[serde(default)]
    pub original_bottom: Option<f64>,
}

impl MarginBox {
    #[must_use]
    pub fn new(margin: Margin) -> Self {
        Self {
            margin,
            original_bottom: None,
        }
    }

    /// Makes room for a legend of `legend_height` px.
    ///
    /// A bottom legend sits on top of the pre-legend bottom margin, which is
    /// remembered on first use so repeated passes do not accumulate. A top
    /// legend replaces the top margin.
    #[must_use]
    pub fn apply_legend_height(mut self, mode: LegendMode, legend_height: f64) -> Self {
        match mode {
            LegendMode::Hidden => {}
            LegendMode::Bottom => {
                let baseline = *self.original_bottom.get_or_insert(self.margin.bottom);
                self.margin.bottom = legend_height + baseline;
            }
            LegendMode::Top => {
                if self.margin.top != legend_height {
                    self.margin.top = legend_height;
                }
            }
        }
        self
    }
}

/// Outer chart size: explicit size, else the container's, else the fallback.
///
/// Zero-sized container dimensions count as unknown.
#[must_use]
pub fn outer_size(
    container: Option<Viewport>,
    width: Option<f64>,
    height: Option<f64>,
    fallback: Viewport,
) -> (f64, f64) {
    let container_width = container.map(|c| c.width).filter(|&w| w > 0);
    let container_height = container.map(|c| c.height).filter(|&h| h > 0);
    (
        width.unwrap_or_else(|| f64::from(container_width.unwrap_or(fallback.width))),
        height.unwrap_or_else(|| f64::from(container_height.unwrap_or(fallback.height))),
    )
}

/// Drawing area inside the margins. May be negative for tiny containers.
#[must_use]
pub fn available_size(outer: (f64, f64), margin: Margin) -> (f64, f64) {
    (
        outer.0 - margin.left - margin.right,
        outer.1 - margin.top - margin.bottom,
    )
}

/// Legend origin relative to the plot's top-left corner.
///
/// `top_x` is the horizontal start of a top legend; the composite chart puts
/// it at half the plot width, the pie chart at zero.
#[must_use]
pub fn legend_origin(
    mode: LegendMode,
    available: (f64, f64),
    margin: Margin,
    legend_height: f64,
    top_x: f64,
) -> (f64, f64) {
    match mode {
        LegendMode::Bottom => (0.0, available.1 + (margin.bottom - legend_height)),
        LegendMode::Top | LegendMode::Hidden => (top_x, -margin.top),
    }
}

/// Tick count for an axis: `target`, unless the longest series has fewer
/// values, in which case one less than that length.
#[must_use]
pub fn tick_count(target: f64, longest_series: usize) -> usize {
    let longest = longest_series.max(1);
    if !target.is_finite() || target <= 0.0 {
        return 0;
    }
    if target > longest as f64 {
        longest - 1
    } else {
        target.floor() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::{LegendMode, MarginBox, available_size, legend_origin, outer_size, tick_count};
    use crate::core::{Margin, Viewport};

    #[test]
    fn legend_mode_accepts_flags_and_bottom() {
        assert_eq!(serde_json::from_str::<LegendMode>("false").ok(), Some(LegendMode::Hidden));
        assert_eq!(serde_json::from_str::<LegendMode>("true").ok(), Some(LegendMode::Top));
        assert_eq!(
            serde_json::from_str::<LegendMode>("\"bottom\"").ok(),
            Some(LegendMode::Bottom)
        );
        assert!(serde_json::from_str::<LegendMode>("\"left\"").is_err());
        assert_eq!(
            serde_json::to_string(&LegendMode::Bottom).expect("serialize"),
            "\"bottom\""
        );
    }

    #[test]
    fn bottom_legend_growth_is_idempotent() {
        let start = MarginBox::new(Margin::new(30.0, 20.0, 50.0, 60.0));
        let once = start.apply_legend_height(LegendMode::Bottom, 30.0);
        let twice = once.apply_legend_height(LegendMode::Bottom, 30.0);
        assert_eq!(once.margin.bottom, 80.0);
        assert_eq!(twice, once);
        assert_eq!(twice.original_bottom, Some(50.0));

        let shrunk = twice.apply_legend_height(LegendMode::Bottom, 10.0);
        assert_eq!(shrunk.margin.bottom, 60.0);
    }

    #[test]
    fn top_legend_replaces_top_margin() {
        let start = MarginBox::new(Margin::new(30.0, 20.0, 50.0, 60.0));
        let placed = start.apply_legend_height(LegendMode::Top, 50.0);
        assert_eq!(placed.margin.top, 50.0);
        assert_eq!(placed.original_bottom, None);
        assert_eq!(start.apply_legend_height(LegendMode::Hidden, 50.0), start);
    }

    #[test]
    fn zero_container_dimensions_fall_back() {
        let fallback = Viewport::new(960, 400);
        assert_eq!(outer_size(None, None, None, fallback), (960.0, 400.0));
        assert_eq!(
            outer_size(Some(Viewport::new(0, 300)), None, None, fallback),
            (960.0, 300.0)
        );
        assert_eq!(
            outer_size(Some(Viewport::new(500, 300)), Some(640.0), None, fallback),
            (640.0, 300.0)
        );
    }

    #[test]
    fn legend_origin_follows_placement() {
        let margin = Margin::new(30.0, 20.0, 80.0, 60.0);
        let available = available_size((960.0, 400.0), margin);
        assert_eq!(available, (880.0, 290.0));
        assert_eq!(
            legend_origin(LegendMode::Bottom, available, margin, 30.0, 440.0),
            (0.0, 340.0)
        );
        assert_eq!(
            legend_origin(LegendMode::Top, available, margin, 30.0, 440.0),
            (440.0, -30.0)
        );
    }

    #[test]
    fn tick_count_is_capped_by_series_length() {
        assert_eq!(tick_count(8.8, 100), 8);
        assert_eq!(tick_count(8.8, 5), 4);
        assert_eq!(tick_count(3.0, 0), 0);
        assert_eq!(tick_count(-2.0, 10), 0);
    }
}
