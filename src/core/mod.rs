pub mod band_scale;
pub mod domain;
pub mod scale;
pub mod series;
pub mod stack;
pub mod types;

pub use band_scale::BandScale;
pub use domain::{
    AxisDomains, DomainOverrides, EMPTY_DOMAIN, extent, extract_points, filter_by_axis_and_type,
    reduce_stacked_series, resolve_domains,
};
pub use scale::LinearScale;
pub use series::{PieDatum, Series, SeriesKind, YAxis};
pub use stack::{StackedPoint, stack_layout};
pub use types::{DataPoint, Margin, MarginPatch, Viewport};
