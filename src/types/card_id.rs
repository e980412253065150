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

use crate::types::timestamp::Timestamp;

/// An opaque card identifier.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct CardId(i64);

impl CardId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Derives an identifier from a creation timestamp.
    ///
    /// The nanosecond value is hashed with BLAKE3 and the first eight bytes
    /// of the digest are taken, with the sign bit cleared so the identifier
    /// is always non-negative. Equal timestamps give equal identifiers.
    pub fn from_timestamp(created_at: Timestamp) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"card_id");
        hasher.update(&created_at.unix_nanos().to_le_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest.as_bytes()[..8]);
        Self(i64::from_le_bytes(bytes) & i64::MAX)
    }

    pub fn as_int(self) -> i64 {
        self.0
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;

    fn at(nanos: u32) -> Timestamp {
        Timestamp::new(Utc.timestamp_opt(1_700_000_000, nanos).unwrap())
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(CardId::from_timestamp(at(0)), CardId::from_timestamp(at(0)));
    }

    #[test]
    fn test_distinct_for_adjacent_instants() {
        let a = CardId::from_timestamp(at(0));
        let b = CardId::from_timestamp(at(1));
        assert_ne!(a, b);
    }

    #[test]
    fn test_non_negative() {
        for n in 0..64 {
            assert!(CardId::from_timestamp(at(n)).as_int() >= 0);
        }
    }
}
