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

use crate::error::ErrorReport;

/// The learning phase a card is in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum State {
    /// A new card working through the learning steps.
    Learning,
    /// A graduated card scheduled in whole days.
    Review,
    /// A review card that lapsed and is working through the relearning
    /// steps.
    Relearning,
}

impl State {
    pub fn as_int(self) -> i64 {
        match self {
            State::Learning => 1,
            State::Review => 2,
            State::Relearning => 3,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            State::Learning => "learning",
            State::Review => "review",
            State::Relearning => "relearning",
        }
    }

    /// Whether cards in this state track a step index.
    pub fn uses_steps(self) -> bool {
        match self {
            State::Learning | State::Relearning => true,
            State::Review => false,
        }
    }
}

impl TryFrom<i64> for State {
    type Error = ErrorReport;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(State::Learning),
            2 => Ok(State::Review),
            3 => Ok(State::Relearning),
            _ => Err(ErrorReport::invalid_value(
                "state",
                format!("Invalid state: {value}"),
            )),
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::error::Fallible;

    #[test]
    fn test_ordinals() -> Fallible<()> {
        for state in [State::Learning, State::Review, State::Relearning] {
            assert_eq!(State::try_from(state.as_int())?, state);
        }
        assert_eq!(State::Learning.as_int(), 1);
        assert_eq!(State::Relearning.as_int(), 3);
        Ok(())
    }

    #[test]
    fn test_invalid_ordinal() {
        for value in [0, 4, -1] {
            let err = State::try_from(value).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidValue);
            assert_eq!(err.field(), Some("state"));
        }
    }
}
