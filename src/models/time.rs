use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Half-open time interval `[start, end)` in UTC.
///
/// All overlap reasoning in the scheduling core uses half-open semantics: a
/// class ending exactly when another starts does not overlap it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Build a range, rejecting empty or inverted intervals.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Range starting at `start` and lasting `minutes`.
    pub fn from_start(start: DateTime<Utc>, minutes: i64) -> Option<Self> {
        Self::new(start, start + Duration::minutes(minutes))
    }

    /// Check whether an instant lies inside this interval (inclusive start,
    /// exclusive end).
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }

    /// Half-open overlap test: `[a, b)` and `[c, d)` overlap iff `a < d && c < b`.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Length of the interval.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Time-of-day bucket used by the search engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    /// 06:00 (inclusive) to 12:00 (exclusive)
    Morning,
    /// 12:00 (inclusive) to 17:00 (exclusive)
    Afternoon,
    /// 17:00 (inclusive) to 21:00 (exclusive)
    Evening,
}

impl TimeOfDay {
    /// Classify a start time into a bucket. Hours outside all buckets (late
    /// night, early morning) return `None` and match no bucket filter.
    pub fn bucket_of(t: DateTime<Utc>) -> Option<TimeOfDay> {
        match t.hour() {
            6..=11 => Some(TimeOfDay::Morning),
            12..=16 => Some(TimeOfDay::Afternoon),
            17..=20 => Some(TimeOfDay::Evening),
            _ => None,
        }
    }
}

impl std::str::FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morning" => Ok(TimeOfDay::Morning),
            "afternoon" => Ok(TimeOfDay::Afternoon),
            "evening" => Ok(TimeOfDay::Evening),
            _ => Err(format!("Unknown time of day bucket: {}", s)),
        }
    }
}
