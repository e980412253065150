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
use crate::mapping::get_map;
use crate::mapping::get_str;
use crate::types::card::Card;
use crate::types::rating::Rating;
use crate::types::timestamp::Timestamp;

/// A record of a single review.
#[derive(Clone, PartialEq, Debug)]
pub struct ReviewLog {
    /// The card as it was before the review was applied. This is an owned
    /// copy, independent of both the input and the resulting card.
    pub card: Card,
    pub rating: Rating,
    pub review_datetime: Timestamp,
}

impl ReviewLog {
    pub fn new(card: Card, rating: Rating, review_datetime: Timestamp) -> Self {
        Self {
            card,
            rating,
            review_datetime,
        }
    }

    pub fn to_dict(&self) -> Mapping {
        let mut map = Mapping::new();
        map.insert("card".into(), Value::Object(self.card.to_dict()));
        map.insert("rating".into(), Value::from(self.rating.as_int()));
        map.insert(
            "review_datetime".into(),
            Value::from(self.review_datetime.to_rfc3339()),
        );
        map
    }

    pub fn from_dict(map: &Mapping) -> Fallible<Self> {
        let card = Card::from_dict(get_map(map, "card")?)?;
        let rating = Rating::try_from(get_i64(map, "rating")?)?;
        let review_datetime = Timestamp::from_rfc3339(get_str(map, "review_datetime")?)
            .map_err(|e| ErrorReport::malformed("review_datetime", e.message()))?;
        Ok(Self {
            card,
            rating,
            review_datetime,
        })
    }
}

impl Serialize for ReviewLog {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_dict().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ReviewLog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let map = expect_mapping(value, "review_log").map_err(de::Error::custom)?;
        ReviewLog::from_dict(&map).map_err(de::Error::custom)
    }
}
