// Copyright 2025 itscheems
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

//! In-memory, single-threaded price-time priority matching core.
//!
//! - Per-symbol order books ([`book::OrderBook`]) with O(1) FIFO append
//!   and cancellation ([`price_level::PriceLevel`]) and O(log M) best-price
//!   access (`BTreeMap`-backed sides).
//! - A [`matching::MatchingEngine`] dispatching Market/Limit/IOC/FOK
//!   orders through price-time priority matching.
//! - An [`runner::EngineRunner`] that drives the engine on a dedicated
//!   thread, decoupled from ingress/egress transport by bounded
//!   [`queue`]/[`event`] channels.
//!
//! Transport (how orders arrive, how market data leaves) is deliberately
//! outside this crate; [`queue::IngressQueue`] and [`event::EventBuffer`]
//! are the seams an external process wires into.

pub mod book;
pub mod config;
pub mod decimal;
pub mod error;
pub mod event;
pub mod matching;
pub mod price_level;
pub mod queue;
pub mod runner;
pub mod types;
pub mod wire;

pub use book::OrderBook;
pub use config::RunnerConfig;
pub use decimal::{FixedPoint, Price, Qty};
pub use error::{BookError, MatchingError};
pub use event::{EventBuffer, EventConsumer, EventProducer, MatchingEvent};
pub use matching::MatchingEngine;
pub use queue::{IngressQueue, QueueError, QueueReceiver, QueueSender};
pub use runner::EngineRunner;
pub use types::*;
