//! Month keys and monthly rate series

pub mod loader;
mod month;
mod series;

pub use loader::{load_rate_series, series_from_points, RateUnit};
pub use month::{Month, ParseMonthError};
pub use series::RateSeries;
