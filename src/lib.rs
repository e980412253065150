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

//! Anki-style SM-2 scheduling for a single card.
//!
//! ```
//! use anki_sm_2::Card;
//! use anki_sm_2::Rating;
//! use anki_sm_2::Scheduler;
//! use anki_sm_2::State;
//! use anki_sm_2::Timestamp;
//!
//! let scheduler = Scheduler::default();
//! let now = Timestamp::now();
//! let card = Card::new_at(now);
//! let (card, log) = scheduler.review_card(&card, Rating::Easy, now).unwrap();
//! assert_eq!(card.state, State::Review);
//! assert_eq!(log.rating, Rating::Easy);
//! ```

pub mod cli;
pub mod config;
pub mod error;
mod mapping;
pub mod scheduler;
pub mod types;

pub use config::SchedulerConfig;
pub use error::ErrorKind;
pub use error::ErrorReport;
pub use error::Fallible;
pub use mapping::Mapping;
pub use scheduler::Scheduler;
pub use types::card::Card;
pub use types::card_id::CardId;
pub use types::rating::Rating;
pub use types::review_log::ReviewLog;
pub use types::state::State;
pub use types::timestamp::Timestamp;
