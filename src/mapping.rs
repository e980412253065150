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

//! Field accessors for plain key-value records.
//!
//! Every accessor names the field it failed on, so a bad record is reported
//! as e.g. `ease: expected a number` rather than a generic parse error.

use serde_json::Map;
use serde_json::Value;

use crate::error::ErrorReport;
use crate::error::Fallible;

pub type Mapping = Map<String, Value>;

fn require<'a>(map: &'a Mapping, field: &str) -> Fallible<&'a Value> {
    match map.get(field) {
        Some(Value::Null) | None => Err(ErrorReport::malformed(field, "missing required field")),
        Some(value) => Ok(value),
    }
}

/// An absent key and an explicit `null` both decode to `None`.
fn optional<'a>(map: &'a Mapping, field: &str) -> Option<&'a Value> {
    match map.get(field) {
        Some(Value::Null) | None => None,
        Some(value) => Some(value),
    }
}

fn as_i64(value: &Value, field: &str) -> Fallible<i64> {
    value
        .as_i64()
        .ok_or_else(|| ErrorReport::malformed(field, format!("expected an integer, got {value}")))
}

fn as_u32(value: &Value, field: &str) -> Fallible<u32> {
    let n = as_i64(value, field)?;
    u32::try_from(n).map_err(|_| {
        ErrorReport::malformed(field, format!("expected a non-negative integer, got {n}"))
    })
}

fn as_f64(value: &Value, field: &str) -> Fallible<f64> {
    value
        .as_f64()
        .ok_or_else(|| ErrorReport::malformed(field, format!("expected a number, got {value}")))
}

pub fn get_i64(map: &Mapping, field: &str) -> Fallible<i64> {
    as_i64(require(map, field)?, field)
}

pub fn get_opt_u32(map: &Mapping, field: &str) -> Fallible<Option<u32>> {
    optional(map, field).map(|v| as_u32(v, field)).transpose()
}

pub fn get_opt_f64(map: &Mapping, field: &str) -> Fallible<Option<f64>> {
    optional(map, field).map(|v| as_f64(v, field)).transpose()
}

pub fn get_str<'a>(map: &'a Mapping, field: &str) -> Fallible<&'a str> {
    let value = require(map, field)?;
    value
        .as_str()
        .ok_or_else(|| ErrorReport::malformed(field, format!("expected a string, got {value}")))
}

pub fn get_map<'a>(map: &'a Mapping, field: &str) -> Fallible<&'a Mapping> {
    let value = require(map, field)?;
    value
        .as_object()
        .ok_or_else(|| ErrorReport::malformed(field, format!("expected a mapping, got {value}")))
}

/// Converts an arbitrary JSON value into a mapping, for records that arrive
/// as a bare `Value`.
pub fn expect_mapping(value: Value, what: &str) -> Fallible<Mapping> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ErrorReport::malformed(
            what,
            format!("expected a mapping, got {other}"),
        )),
    }
}
