//! chart-compose: composite and pie chart composition.
//!
//! Charts lay out legends, axes and sub-chart pipelines into a backend-agnostic
//! [`render::RenderFrame`] and publish typed events for hover, legend and
//! state changes. Drawing is delegated to a [`render::Renderer`].

pub mod api;
pub mod components;
pub mod core;
pub mod error;
pub mod events;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{CompositeChart, CompositeChartConfig, LegendMode, PieChart, PieChartConfig};
pub use error::{ChartError, ChartResult};
