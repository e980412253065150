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

use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use clap::Parser;
use serde_json::Value;
use serde_json::json;

use crate::config::SchedulerConfig;
use crate::error::Fallible;
use crate::error::fail;
use crate::scheduler::Scheduler;
use crate::types::card::Card;
use crate::types::card_id::CardId;
use crate::types::rating::Rating;
use crate::types::timestamp::Timestamp;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Print a new card as JSON.
    New {
        /// Card identifier. Derived from the current time if omitted.
        #[arg(long)]
        id: Option<i64>,
    },
    /// Review a card and print the updated card and the review log as JSON.
    Review {
        /// Path to the card JSON, or `-` to read standard input.
        card: PathBuf,
        /// again, hard, good, easy, or 1-4.
        rating: Rating,
        /// Optional path to a TOML scheduler configuration.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Review time as RFC 3339. Defaults to now.
        #[arg(long)]
        now: Option<String>,
    },
    /// Print the default scheduler configuration as TOML.
    Config,
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    let output = execute(cli)?;
    println!("{output}");
    Ok(())
}

fn execute(cli: Command) -> Fallible<String> {
    match cli {
        Command::New { id } => {
            let now = Timestamp::now();
            let card = match id {
                Some(id) => Card::with_id(CardId::new(id), now),
                None => Card::new_at(now),
            };
            Ok(serde_json::to_string_pretty(&card)?)
        }
        Command::Review {
            card,
            rating,
            config,
            now,
        } => {
            let config = match config {
                Some(path) => {
                    if !path.exists() {
                        return fail(format!("config file {path:?} does not exist."));
                    }
                    let config = SchedulerConfig::load(&path)?;
                    config.validate()?;
                    config
                }
                None => SchedulerConfig::default(),
            };
            let now = match now {
                Some(now) => Timestamp::from_rfc3339(&now)?,
                None => Timestamp::now(),
            };
            let card: Card = serde_json::from_str(&read_input(&card)?)?;
            let scheduler = Scheduler::new(config);
            let (card, review_log) = scheduler.review_card(&card, rating, now)?;
            let output = json!({
                "card": Value::Object(card.to_dict()),
                "review_log": Value::Object(review_log.to_dict()),
            });
            Ok(serde_json::to_string_pretty(&output)?)
        }
        Command::Config => SchedulerConfig::default().to_toml(),
    }
}

fn read_input(path: &Path) -> Fallible<String> {
    if path.as_os_str() == "-" {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        Ok(input)
    } else {
        if !path.exists() {
            return fail(format!("card file {path:?} does not exist."));
        }
        Ok(std::fs::read_to_string(path)?)
    }
}
