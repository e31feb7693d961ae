use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::DataPoint;
use crate::interaction::HoverEvent;

/// Side of the anchor the tooltip box is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TooltipGravity {
    N,
    #[default]
    S,
    E,
    W,
}

/// Fully resolved tooltip: container position, markup and placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipRequest {
    pub left: f64,
    pub top: f64,
    pub content: String,
    pub gravity: TooltipGravity,
}

/// Host widget that displays tooltips.
pub trait TooltipPresenter {
    fn show(&mut self, request: &TooltipRequest);
    fn cleanup(&mut self);
}

/// Inputs of a tooltip content formatter.
#[derive(Debug, Clone, Copy)]
pub struct TooltipContext<'a> {
    pub key: &'a str,
    /// Formatted x value; empty for pie slices.
    pub x: &'a str,
    pub y: &'a str,
    pub color: &'a str,
    pub event: &'a HoverEvent,
}

pub type TooltipContentFn = Arc<dyn Fn(&TooltipContext<'_>) -> String + Send + Sync + 'static>;

/// Reads one coordinate out of a data point; the second argument is its index.
pub type PointAccessorFn = Arc<dyn Fn(&DataPoint, usize) -> f64 + Send + Sync + 'static>;

#[must_use]
pub fn default_composite_tooltip() -> TooltipContentFn {
    Arc::new(|context| format!("<h3>{}</h3><p>{} at {}</p>", context.key, context.y, context.x))
}

#[must_use]
pub fn default_pie_tooltip() -> TooltipContentFn {
    Arc::new(|context| {
        format!(
            "<h3 style=\"background-color: {}\">{}</h3><p>{}</p>",
            context.color, context.key, context.y
        )
    })
}

/// Records requests instead of displaying them.
#[derive(Debug, Clone, Default)]
pub struct RecordingTooltipPresenter {
    pub shown: Vec<TooltipRequest>,
    pub cleanups: usize,
}

impl TooltipPresenter for RecordingTooltipPresenter {
    fn show(&mut self, request: &TooltipRequest) {
        self.shown.push(request.clone());
    }

    fn cleanup(&mut self) {
        self.cleanups += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{TooltipContext, default_composite_tooltip, default_pie_tooltip};
    use crate::interaction::HoverEvent;
    use crate::render::Color;

    #[test]
    fn default_content_matches_chart_kind() {
        let event = HoverEvent {
            pos: [0.0, 0.0],
            series_key: "a".to_owned(),
            series_index: 0,
            y_axis: None,
            point: None,
            point_index: 0,
            value: 3.0,
            color: Color::rgb(1.0, 0.0, 0.0),
        };
        let context = TooltipContext {
            key: "Sales",
            x: "2",
            y: "3.0",
            color: "#ff0000",
            event: &event,
        };
        assert_eq!(default_composite_tooltip()(&context), "<h3>Sales</h3><p>3.0 at 2</p>");
        assert_eq!(
            default_pie_tooltip()(&context),
            "<h3 style=\"background-color: #ff0000\">Sales</h3><p>3.0</p>"
        );
    }
}
