// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;
#[cfg(test)]
use std::ops::Add;

use chrono::DateTime;
#[cfg(test)]
use chrono::Duration;
use chrono::SecondsFormat;
use chrono::Utc;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::de;

use crate::error::ErrorReport;
use crate::error::Fallible;

/// An instant in time, always held in UTC.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn new(ts: DateTime<Utc>) -> Self {
        Self(ts)
    }

    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn into_inner(self) -> DateTime<Utc> {
        self.0
    }

    /// Parses an RFC 3339 string. Any offset is accepted and normalized to
    /// UTC.
    pub fn from_rfc3339(s: &str) -> Fallible<Self> {
        let ts = DateTime::parse_from_rfc3339(s)
            .map_err(|e| ErrorReport::malformed("timestamp", format!("{s:?}: {e}")))?;
        Ok(Self(ts.with_timezone(&Utc)))
    }

    /// Formats as RFC 3339 with an explicit `+00:00` offset. Sub-second
    /// digits are emitted only when present, so the output parses back to
    /// the same instant.
    pub fn to_rfc3339(self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, false)
    }

    /// Whole days elapsed from `earlier` to `self`, rounded down. Negative
    /// when `earlier` is in the future.
    pub fn whole_days_since(self, earlier: Timestamp) -> i64 {
        let secs = (self.0 - earlier.0).num_seconds();
        secs.div_euclid(86_400)
    }

    /// Nanoseconds since the Unix epoch, saturating outside the
    /// representable range.
    pub fn unix_nanos(self) -> i64 {
        self.0
            .timestamp_nanos_opt()
            .unwrap_or(if self.0.timestamp() < 0 { i64::MIN } else { i64::MAX })
    }
}

#[cfg(test)]
impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Self::Output {
        Timestamp(self.0 + rhs)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        Timestamp::from_rfc3339(&string).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> Timestamp {
        Timestamp::new(Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap())
    }

    #[test]
    fn test_rfc3339_has_offset() {
        let t = ts(2024, 1, 2, 3, 4);
        assert_eq!(t.to_rfc3339(), "2024-01-02T03:04:00+00:00");
    }

    #[test]
    fn test_parse_normalizes_offset() -> Fallible<()> {
        let t = Timestamp::from_rfc3339("2024-01-02T05:04:00+02:00")?;
        assert_eq!(t, ts(2024, 1, 2, 3, 4));
        Ok(())
    }

    #[test]
    fn test_subsecond_precision_survives() -> Fallible<()> {
        let t = Timestamp::new(Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap());
        assert_eq!(Timestamp::from_rfc3339(&t.to_rfc3339())?, t);
        Ok(())
    }

    #[test]
    fn test_parse_garbage() {
        assert!(Timestamp::from_rfc3339("yesterday").is_err());
    }

    #[test]
    fn test_whole_days_since() {
        let due = ts(2024, 1, 1, 12, 0);
        assert_eq!(ts(2024, 1, 1, 12, 0).whole_days_since(due), 0);
        assert_eq!(ts(2024, 1, 2, 11, 59).whole_days_since(due), 0);
        assert_eq!(ts(2024, 1, 2, 12, 0).whole_days_since(due), 1);
        assert_eq!(ts(2024, 1, 5, 13, 0).whole_days_since(due), 4);
        assert_eq!(ts(2024, 1, 1, 11, 0).whole_days_since(due), -1);
    }
}
