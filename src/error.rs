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

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

/// The broad category of an error.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    /// A value outside its allowed set: an unknown state or rating, or a
    /// configuration value that fails validation.
    InvalidValue,
    /// A record that is missing a field, holds a field of the wrong type,
    /// or whose fields contradict each other.
    MalformedRecord,
    /// Filesystem or stream I/O.
    Io,
    Other,
}

#[derive(Debug)]
pub struct ErrorReport {
    kind: ErrorKind,
    field: Option<String>,
    message: String,
}

pub type Fallible<T> = Result<T, ErrorReport>;

impl ErrorReport {
    pub fn new(message: &str) -> Self {
        Self {
            kind: ErrorKind::Other,
            field: None,
            message: message.to_string(),
        }
    }

    pub fn invalid_value(field: &str, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidValue,
            field: Some(field.to_string()),
            message: message.into(),
        }
    }

    pub fn malformed(field: &str, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::MalformedRecord,
            field: Some(field.to_string()),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The name of the offending field, if the error concerns one.
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for ErrorReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl Error for ErrorReport {}

pub fn fail<T>(message: impl Into<String>) -> Fallible<T> {
    let message: String = message.into();
    Err(ErrorReport::new(&message))
}

impl From<std::io::Error> for ErrorReport {
    fn from(value: std::io::Error) -> Self {
        Self {
            kind: ErrorKind::Io,
            field: None,
            message: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for ErrorReport {
    fn from(value: serde_json::Error) -> Self {
        let kind = if value.is_io() {
            ErrorKind::Io
        } else {
            ErrorKind::MalformedRecord
        };
        Self {
            kind,
            field: None,
            message: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for ErrorReport {
    fn from(value: toml::de::Error) -> Self {
        Self {
            kind: ErrorKind::MalformedRecord,
            field: None,
            message: value.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ErrorReport {
    fn from(value: toml::ser::Error) -> Self {
        Self::new(&value.to_string())
    }
}
