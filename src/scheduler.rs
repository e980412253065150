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

//! The SM-2 review scheduler.
//!
//! A card moves through three states:
//!
//! - Learning: new cards step through `learning_steps` (minutes/hours) and
//!   graduate on Good at the last step, or on Easy at any step.
//! - Review: graduated cards are scheduled in whole days. Each review
//!   grows or shrinks the interval by the ease factor. Again lapses the
//!   card into Relearning.
//! - Relearning: lapsed cards step through `relearning_steps` and return to
//!   Review with the interval and ease they were left with after the lapse.
//!
//! All interval arithmetic rounds half to even.

use chrono::Duration;
use serde_json::Value;

use crate::config::MIN_EASE;
use crate::config::SchedulerConfig;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::mapping::Mapping;
use crate::mapping::expect_mapping;
use crate::types::card::Card;
use crate::types::rating::Rating;
use crate::types::review_log::ReviewLog;
use crate::types::state::State;
use crate::types::timestamp::Timestamp;

/// Ease multiplier on a lapse.
const LAPSE_EASE_FACTOR: f64 = 0.80;

/// Ease multiplier on Hard in review.
const HARD_EASE_FACTOR: f64 = 0.85;

/// Ease multiplier on Easy in review.
const EASY_EASE_FACTOR: f64 = 1.15;

/// The keys of an encoded scheduler. All are required when decoding.
const CONFIG_FIELDS: [&str; 11] = [
    "learning_steps",
    "graduating_interval",
    "easy_interval",
    "relearning_steps",
    "minimum_interval",
    "maximum_interval",
    "starting_ease",
    "easy_bonus",
    "interval_modifier",
    "hard_interval",
    "new_interval",
];

/// Computes review outcomes. Holds only its configuration, which is never
/// modified after construction.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Scheduler {
    config: SchedulerConfig,
}

/// What a rating does to a card that is working through a list of steps.
enum StepOutcome {
    /// The card stays on steps, at `step`, due after `delay`.
    Stay { step: u32, delay: Duration },
    /// The card leaves the steps for review.
    Graduate { easy: bool },
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Reviews a card at the current time.
    pub fn review_card_now(&self, card: &Card, rating: Rating) -> Fallible<(Card, ReviewLog)> {
        self.review_card(card, rating, Timestamp::now())
    }

    /// Applies a rating given at `now` to `card`.
    ///
    /// Returns the updated card and a log holding a copy of the card as it
    /// was before the review. The input card is not modified. Fails only if
    /// the card's optional fields contradict its state, e.g. a review card
    /// without an ease factor.
    pub fn review_card(
        &self,
        card: &Card,
        rating: Rating,
        now: Timestamp,
    ) -> Fallible<(Card, ReviewLog)> {
        let next = match card.state {
            State::Learning => self.review_learning(card, rating, now)?,
            State::Review => self.review_review(card, rating, now)?,
            State::Relearning => self.review_relearning(card, rating, now)?,
        };
        log::debug!(
            "Card {} rated {rating}: {} -> {}, due {}",
            card.card_id,
            card.state,
            next.state,
            next.due
        );
        let log = ReviewLog::new(card.clone(), rating, now);
        Ok((next, log))
    }

    /// The due date each rating would produce, in rating order.
    pub fn preview(&self, card: &Card, now: Timestamp) -> Fallible<Vec<(Rating, Timestamp)>> {
        Rating::ALL
            .into_iter()
            .map(|rating| {
                let (next, _) = self.review_card(card, rating, now)?;
                Ok((rating, next.due))
            })
            .collect()
    }

    fn review_learning(&self, card: &Card, rating: Rating, now: Timestamp) -> Fallible<Card> {
        let step = require_step(card)?;
        let mut next = card.clone();
        match advance_steps(&self.config.learning_steps, "learning_steps", step, rating)? {
            StepOutcome::Stay { step, delay } => {
                next.step = Some(step);
                next.due = due_after(now, delay)?;
            }
            StepOutcome::Graduate { easy } => {
                let interval = if easy {
                    self.config.easy_interval
                } else {
                    self.config.graduating_interval
                };
                next.state = State::Review;
                next.step = None;
                next.ease = Some(self.config.starting_ease);
                next.current_interval = Some(interval);
                next.due = due_in_days(now, interval)?;
            }
        }
        Ok(next)
    }

    fn review_review(&self, card: &Card, rating: Rating, now: Timestamp) -> Fallible<Card> {
        if card.step.is_some() {
            return Err(ErrorReport::malformed("step", "review card has a step"));
        }
        let (ease, interval) = require_graduated(card)?;
        let interval = f64::from(interval);
        let config = &self.config;
        let days_overdue = now.whole_days_since(card.due).max(0) as f64;
        let mut next = card.clone();
        let new_interval = match rating {
            Rating::Again => {
                next.state = State::Relearning;
                next.step = Some(0);
                next.ease = Some(MIN_EASE.max(ease * LAPSE_EASE_FACTOR));
                round_days(interval * config.new_interval * config.interval_modifier)
                    .max(config.minimum_interval)
            }
            Rating::Hard => {
                next.ease = Some(MIN_EASE.max(ease * HARD_EASE_FACTOR));
                round_days(interval * config.hard_interval * config.interval_modifier)
                    .min(config.maximum_interval)
            }
            Rating::Good => {
                // Late reviews get credit for half the days overdue.
                round_days((interval + days_overdue / 2.0) * ease * config.interval_modifier)
                    .min(config.maximum_interval)
            }
            Rating::Easy => {
                let days = round_days(
                    (interval + days_overdue) * ease * config.easy_bonus * config.interval_modifier,
                )
                .min(config.maximum_interval);
                next.ease = Some(ease * EASY_EASE_FACTOR);
                days
            }
        };
        next.current_interval = Some(new_interval);
        next.due = due_in_days(now, new_interval)?;
        Ok(next)
    }

    fn review_relearning(&self, card: &Card, rating: Rating, now: Timestamp) -> Fallible<Card> {
        let step = require_step(card)?;
        // The ease is carried back to review unchanged.
        let (_ease, interval) = require_graduated(card)?;
        let mut next = card.clone();
        match advance_steps(&self.config.relearning_steps, "relearning_steps", step, rating)? {
            StepOutcome::Stay { step, delay } => {
                next.step = Some(step);
                next.due = due_after(now, delay)?;
            }
            StepOutcome::Graduate { .. } => {
                next.state = State::Review;
                next.step = None;
                next.due = due_in_days(now, interval)?;
            }
        }
        Ok(next)
    }

    pub fn to_dict(&self) -> Fallible<Mapping> {
        let value = serde_json::to_value(&self.config)?;
        expect_mapping(value, "scheduler")
    }

    /// Decodes a scheduler. Unlike configuration files, every key must be
    /// present.
    pub fn from_dict(map: &Mapping) -> Fallible<Self> {
        for field in CONFIG_FIELDS {
            if !map.contains_key(field) {
                return Err(ErrorReport::malformed(field, "missing required field"));
            }
        }
        let config: SchedulerConfig = serde_json::from_value(Value::Object(map.clone()))?;
        Ok(Self::new(config))
    }
}

fn advance_steps(
    steps: &[Duration],
    field: &str,
    step: u32,
    rating: Rating,
) -> Fallible<StepOutcome> {
    let outcome = match rating {
        Rating::Again => StepOutcome::Stay {
            step: 0,
            delay: step_delay(steps, 0),
        },
        Rating::Hard => {
            let delay = if step == 0 && steps.len() >= 2 {
                steps[0]
                    .checked_add(&steps[1])
                    .ok_or_else(|| ErrorReport::invalid_value(field, "steps too long to average"))?
                    / 2
            } else {
                step_delay(steps, step)
            };
            StepOutcome::Stay { step, delay }
        }
        Rating::Good => {
            if step as usize + 1 >= steps.len() {
                StepOutcome::Graduate { easy: false }
            } else {
                StepOutcome::Stay {
                    step: step + 1,
                    delay: step_delay(steps, step + 1),
                }
            }
        }
        Rating::Easy => StepOutcome::Graduate { easy: true },
    };
    Ok(outcome)
}

/// The delay for a step. Indices past the end use the last step, which
/// happens when the step list is shortened while cards are mid-way through
/// it. An empty list means no delay.
fn step_delay(steps: &[Duration], step: u32) -> Duration {
    steps
        .get(step as usize)
        .or(steps.last())
        .copied()
        .unwrap_or_else(Duration::zero)
}

/// Rounds half to even. Negative and NaN results become zero.
fn round_days(days: f64) -> u32 {
    days.round_ties_even() as u32
}

fn due_after(now: Timestamp, delay: Duration) -> Fallible<Timestamp> {
    now.into_inner()
        .checked_add_signed(delay)
        .map(Timestamp::new)
        .ok_or_else(|| ErrorReport::invalid_value("due", "due date out of range"))
}

fn due_in_days(now: Timestamp, days: u32) -> Fallible<Timestamp> {
    due_after(now, Duration::days(i64::from(days)))
}

fn require_step(card: &Card) -> Fallible<u32> {
    card.step.ok_or_else(|| {
        ErrorReport::malformed("step", format!("{} card has no step", card.state))
    })
}

/// The ease and interval of a card that has graduated at least once.
fn require_graduated(card: &Card) -> Fallible<(f64, u32)> {
    let ease = card.ease.ok_or_else(|| {
        ErrorReport::malformed("ease", format!("{} card has no ease", card.state))
    })?;
    let interval = card.current_interval.ok_or_else(|| {
        ErrorReport::malformed(
            "current_interval",
            format!("{} card has no current interval", card.state),
        )
    })?;
    Ok((ease, interval))
}
