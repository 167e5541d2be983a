//! Timeline data types
//!
//! Mirrors the JSON returned by the growth index timeline endpoint, plus the
//! derived [`DisplayedTimeline`] handed to renderers.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::dashboard::SelectionError;

/// Epoch values at or above this are treated as milliseconds
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// A single `(date, value)` sample of the growth index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    /// Date as sent by the API (ISO 8601 or epoch)
    #[serde(deserialize_with = "deserialize_date")]
    pub date: String,
    /// Growth index value
    pub value: f64,
}

impl TimelinePoint {
    pub fn new(date: impl Into<String>, value: f64) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }

    /// Parse the date into a UTC timestamp
    ///
    /// Accepts RFC 3339, `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`
    /// and epoch seconds or milliseconds.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.date.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(ndt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
            return Some(Utc.from_utc_datetime(&ndt));
        }
        if let Ok(ndt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(Utc.from_utc_datetime(&ndt));
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0).map(|ndt| Utc.from_utc_datetime(&ndt));
        }
        if let Ok(epoch) = raw.parse::<i64>() {
            return if epoch.abs() >= EPOCH_MILLIS_THRESHOLD {
                DateTime::from_timestamp_millis(epoch)
            } else {
                DateTime::from_timestamp(epoch, 0)
            };
        }

        None
    }

    /// Date label for axes and tables (`YYYY-MM-DD`), falling back to the raw value
    pub fn day_label(&self) -> String {
        self.timestamp()
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| self.date.clone())
    }
}

/// Accept the date either as a string or as a bare epoch number
fn deserialize_date<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDate {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match RawDate::deserialize(deserializer)? {
        RawDate::Text(s) => s,
        RawDate::Int(n) => n.to_string(),
        RawDate::Float(f) => (f as i64).to_string(),
    })
}

/// Ordered sequence of points, ascending by date
pub type Series = Vec<TimelinePoint>;

/// One named metric group of the response
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricGroup {
    #[serde(rename = "tg_growth_index")]
    pub growth_index: Series,
}

impl MetricGroup {
    pub fn new(growth_index: Series) -> Self {
        Self { growth_index }
    }
}

/// Response of the basic timeline endpoint for one chain pair
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimelineResponse {
    /// Network-wide cumulative index
    pub cumulative: MetricGroup,
    /// Index of the compared chain
    pub blockchain: MetricGroup,
}

/// Sampling stride in weeks per displayed point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Granularity {
    #[default]
    OneWeek,
    TwoWeeks,
    FourWeeks,
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [
        Granularity::OneWeek,
        Granularity::TwoWeeks,
        Granularity::FourWeeks,
    ];

    /// Stride as a point count
    pub fn stride(&self) -> usize {
        match self {
            Granularity::OneWeek => 1,
            Granularity::TwoWeeks => 2,
            Granularity::FourWeeks => 4,
        }
    }
}

impl TryFrom<u32> for Granularity {
    type Error = SelectionError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Granularity::OneWeek),
            2 => Ok(Granularity::TwoWeeks),
            4 => Ok(Granularity::FourWeeks),
            other => Err(SelectionError::InvalidGranularity(other)),
        }
    }
}

impl From<Granularity> for u32 {
    fn from(value: Granularity) -> Self {
        value.stride() as u32
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Week(s)", self.stride())
    }
}

/// Resampled timeline ready for rendering
///
/// Derived from a [`TimelineResponse`] and a [`Granularity`]; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayedTimeline {
    pub cumulative: Series,
    pub blockchain: Series,
}

impl DisplayedTimeline {
    /// Resample both groups of a response with the same stride
    pub fn from_response(response: &TimelineResponse, granularity: Granularity) -> Self {
        Self {
            cumulative: super::resample(&response.cumulative.growth_index, granularity),
            blockchain: super::resample(&response.blockchain.growth_index, granularity),
        }
    }

    /// Number of rows when both series are laid out side by side
    pub fn len(&self) -> usize {
        self.cumulative.len().max(self.blockchain.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows of `(date label, blockchain value, cumulative value)`
    ///
    /// The x axis follows the blockchain series, as the chart does.
    pub fn rows(&self) -> Vec<TimelineRow> {
        (0..self.len())
            .map(|i| {
                let blockchain = self.blockchain.get(i);
                let cumulative = self.cumulative.get(i);
                TimelineRow {
                    date: blockchain
                        .or(cumulative)
                        .map(TimelinePoint::day_label)
                        .unwrap_or_default(),
                    blockchain: blockchain.map(|p| p.value),
                    cumulative: cumulative.map(|p| p.value),
                }
            })
            .collect()
    }
}

/// One row of a displayed timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineRow {
    pub date: String,
    pub blockchain: Option<f64>,
    pub cumulative: Option<f64>,
}
