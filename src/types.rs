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

use serde::{Deserialize, Serialize};

use crate::decimal::{Price, Qty};

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
	Buy,
	Sell,
}

impl Side {
	pub fn opposite(self) -> Side {
		match self {
			Side::Buy => Side::Sell,
			Side::Sell => Side::Buy,
		}
	}
}

/// Order type, as accepted by the matching engine.
///
/// Stop and iceberg orders are out of scope; only these four are ever
/// dispatched by [`crate::matching::MatchingEngine::process`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
	Market,
	Limit,
	Ioc,
	Fok,
}

/// Order identifier, assigned by the ingress collaborator (not this crate).
pub type OrderId = String;

/// Symbol identifier, e.g. "BTC-USDT".
pub type Symbol = String;

/// An instruction handed to the matching engine exactly once.
///
/// `remaining_qty` is the only field the engine mutates; everything else
/// is fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
	pub id: OrderId,
	pub symbol: Symbol,
	pub side: Side,
	pub order_type: OrderType,
	/// Ignored for `Market` orders.
	pub price: Price,
	pub original_qty: Qty,
	pub remaining_qty: Qty,
	/// Seconds since epoch, as accepted by the ingress collaborator.
	pub timestamp: u64,
	/// Monotonic arrival sequence stamped by the engine at `process()`
	/// entry. `timestamp` is caller-supplied and may tie across orders;
	/// `sequence` never does, so it's the true FIFO tie-breaker.
	pub sequence: u64,
}

impl Order {
	pub fn is_fully_filled(&self) -> bool {
		self.remaining_qty.is_zero()
	}
}

/// A single maker/taker match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
	pub trade_id: String,
	pub symbol: Symbol,
	pub maker_order_id: OrderId,
	pub taker_order_id: OrderId,
	/// Always the maker's resting price, never the taker's limit.
	pub price: Price,
	pub quantity: Qty,
	pub aggressor_side: Side,
	pub timestamp: u64,
}

/// Top-of-book snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BboSnapshot {
	pub symbol: Symbol,
	pub best_bid: Option<Price>,
	pub best_ask: Option<Price>,
	pub timestamp: u64,
}

/// Aggregated depth snapshot, best price first on each side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct L2Snapshot {
	pub symbol: Symbol,
	pub timestamp: u64,
	pub bids: Vec<(Price, Qty)>,
	pub asks: Vec<(Price, Qty)>,
}

pub const DEFAULT_L2_DEPTH: usize = 10;
