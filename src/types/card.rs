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

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::de;
use serde_json::Value;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::mapping::Mapping;
use crate::mapping::expect_mapping;
use crate::mapping::get_i64;
use crate::mapping::get_opt_f64;
use crate::mapping::get_opt_u32;
use crate::mapping::get_str;
use crate::types::card_id::CardId;
use crate::types::state::State;
use crate::types::timestamp::Timestamp;

/// A card's scheduling state.
///
/// Cards are values: reviewing one produces a new card and leaves the
/// original untouched.
#[derive(Clone, PartialEq, Debug)]
pub struct Card {
    pub card_id: CardId,
    pub state: State,
    /// Index into the learning or relearning steps. `None` in review.
    pub step: Option<u32>,
    /// The ease factor. `None` until the card first graduates.
    pub ease: Option<f64>,
    /// When the card is next eligible for review.
    pub due: Timestamp,
    /// The current interval in days. `None` until the card first graduates.
    pub current_interval: Option<u32>,
}

impl Card {
    /// Creates a new card, stamped with the current time.
    pub fn new() -> Self {
        Self::new_at(Timestamp::now())
    }

    /// Creates a new card as of `created_at`: due immediately, at the first
    /// learning step, with an identifier derived from the creation time.
    pub fn new_at(created_at: Timestamp) -> Self {
        Self::with_id(CardId::from_timestamp(created_at), created_at)
    }

    pub fn with_id(card_id: CardId, created_at: Timestamp) -> Self {
        Self {
            card_id,
            state: State::Learning,
            step: Some(0),
            ease: None,
            due: created_at,
            current_interval: None,
        }
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        self.due <= now
    }

    pub fn to_dict(&self) -> Mapping {
        let mut map = Mapping::new();
        map.insert("card_id".into(), Value::from(self.card_id.as_int()));
        map.insert("state".into(), Value::from(self.state.as_int()));
        map.insert("step".into(), self.step.map_or(Value::Null, Value::from));
        map.insert("ease".into(), self.ease.map_or(Value::Null, Value::from));
        map.insert("due".into(), Value::from(self.due.to_rfc3339()));
        map.insert(
            "current_interval".into(),
            self.current_interval.map_or(Value::Null, Value::from),
        );
        map
    }

    pub fn from_dict(map: &Mapping) -> Fallible<Self> {
        let card_id = CardId::new(get_i64(map, "card_id")?);
        let state = State::try_from(get_i64(map, "state")?)?;
        let step = get_opt_u32(map, "step")?;
        let ease = get_opt_f64(map, "ease")?;
        let due = Timestamp::from_rfc3339(get_str(map, "due")?)
            .map_err(|e| ErrorReport::malformed("due", e.message()))?;
        let current_interval = get_opt_u32(map, "current_interval")?;
        if step.is_some() && !state.uses_steps() {
            return Err(ErrorReport::malformed("step", format!("{state} card has a step")));
        }
        Ok(Self {
            card_id,
            state,
            step,
            ease,
            due,
            current_interval,
        })
    }
}

impl Default for Card {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_dict().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let map = expect_mapping(value, "card").map_err(de::Error::custom)?;
        Card::from_dict(&map).map_err(de::Error::custom)
    }
}
