//! Growth Index Timelines
//!
//! Types for the timeline returned by TokenGuard, the resampler that derives
//! the displayed series, and CSV/JSON export of the result.
//!
//! ## Example
//!
//! ```rust
//! use growthdash::timeline::{resample, Granularity, TimelinePoint};
//!
//! let series: Vec<TimelinePoint> = (0..10)
//!     .map(|i| TimelinePoint::new(format!("2024-01-{:02}", i + 1), i as f64))
//!     .collect();
//!
//! let monthly = resample(&series, Granularity::FourWeeks);
//! assert_eq!(monthly.len(), 3);
//! ```

mod export;
mod resample;
mod types;

pub use export::{export, to_csv, ExportError, ExportFormat};
pub use resample::resample;
pub use types::{
    DisplayedTimeline, Granularity, MetricGroup, Series, TimelinePoint, TimelineResponse,
    TimelineRow,
};
