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

use std::path::Path;

use chrono::Duration;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;

/// The smallest ease factor the scheduler will ever assign on a lapse or a
/// hard review.
pub const MIN_EASE: f64 = 1.3;

/// Tunable scheduling parameters.
///
/// Step lists are encoded as integer seconds. Any key missing from an
/// encoded configuration takes its default.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Delays between reviews of a new card, before it graduates.
    #[serde(with = "seconds")]
    pub learning_steps: Vec<Duration>,
    /// Interval in days assigned when a card graduates with Good.
    pub graduating_interval: u32,
    /// Interval in days assigned when a card graduates with Easy.
    pub easy_interval: u32,
    /// Delays between reviews of a lapsed card.
    #[serde(with = "seconds")]
    pub relearning_steps: Vec<Duration>,
    pub minimum_interval: u32,
    pub maximum_interval: u32,
    pub starting_ease: f64,
    pub easy_bonus: f64,
    /// Scales every review interval.
    pub interval_modifier: f64,
    /// Interval multiplier for Hard on a review card.
    pub hard_interval: f64,
    /// Fraction of the interval kept after a lapse.
    pub new_interval: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            learning_steps: vec![Duration::minutes(1), Duration::minutes(10)],
            graduating_interval: 1,
            easy_interval: 4,
            relearning_steps: vec![Duration::minutes(10)],
            minimum_interval: 1,
            maximum_interval: 36500,
            starting_ease: 2.5,
            easy_bonus: 1.3,
            interval_modifier: 1.0,
            hard_interval: 1.2,
            new_interval: 0.0,
        }
    }
}

impl SchedulerConfig {
    /// Checks that the parameters describe a sensible schedule.
    ///
    /// The scheduler accepts any configuration without calling this; it is
    /// for callers that load parameters from untrusted sources.
    pub fn validate(&self) -> Fallible<()> {
        for (field, steps) in [
            ("learning_steps", &self.learning_steps),
            ("relearning_steps", &self.relearning_steps),
        ] {
            if steps.iter().any(|step| *step < Duration::zero()) {
                return Err(ErrorReport::invalid_value(field, "steps must not be negative"));
            }
        }
        if self.minimum_interval > self.maximum_interval {
            return Err(ErrorReport::invalid_value(
                "minimum_interval",
                format!(
                    "minimum interval ({}) exceeds maximum interval ({})",
                    self.minimum_interval, self.maximum_interval
                ),
            ));
        }
        if self.starting_ease.is_nan() || self.starting_ease < MIN_EASE {
            return Err(ErrorReport::invalid_value(
                "starting_ease",
                format!("must be at least {MIN_EASE}, got {}", self.starting_ease),
            ));
        }
        for (field, value) in [
            ("easy_bonus", self.easy_bonus),
            ("interval_modifier", self.interval_modifier),
            ("hard_interval", self.hard_interval),
            ("new_interval", self.new_interval),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ErrorReport::invalid_value(
                    field,
                    format!("must be a non-negative number, got {value}"),
                ));
            }
        }
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Fallible<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Fallible<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Loads a configuration from a TOML file.
    pub fn load(path: &Path) -> Fallible<Self> {
        log::debug!("Loading scheduler configuration from {path:?}");
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Writes the configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Fallible<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

/// Encodes a list of durations as whole seconds.
mod seconds {
    use chrono::Duration;
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;
    use serde::de;
    use serde::ser::SerializeSeq;

    pub fn serialize<S>(steps: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(steps.len()))?;
        for step in steps {
            seq.serialize_element(&step.num_seconds())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Vec<i64> = Vec::deserialize(deserializer)?;
        secs.into_iter()
            .map(|s| {
                Duration::try_seconds(s)
                    .ok_or_else(|| de::Error::custom(format!("step out of range: {s} seconds")))
            })
            .collect()
    }
}
