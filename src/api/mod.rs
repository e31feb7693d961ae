//! Chart runtimes: composite (lines, bars, stacked areas on two y-axes) and pie.

mod chart_runtime;
mod composite_chart;
mod composite_config;
mod json_contract;
mod layout;
mod pie_chart;
mod pie_config;
mod state;
mod tooltip;

pub use composite_chart::{CompositeChart, CompositeRenderSummary};
pub use composite_config::{BarOffsetTieBreak, CompositeChartConfig};
pub use json_contract::{
    PIE_DATA_JSON_SCHEMA_V1, PieDataJsonContractV1, SERIES_JSON_SCHEMA_V1,
    SeriesListJsonContractV1, pie_data_from_json_str, pie_data_to_json_contract_v1_pretty,
    series_from_json_str, series_to_json_contract_v1_pretty,
};
pub use layout::{LegendMode, MarginBox, available_size, legend_origin, outer_size, tick_count};
pub use pie_chart::{PieChart, PieRenderSummary};
pub use pie_config::PieChartConfig;
pub use state::{StateDelta, Toggleable, apply_state_delta, disabled_flags};
pub use tooltip::{
    PointAccessorFn, RecordingTooltipPresenter, TooltipContentFn, TooltipContext,
    TooltipGravity, TooltipPresenter, TooltipRequest, default_composite_tooltip,
    default_pie_tooltip,
};
