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

//! Per-symbol limit order book: two price-sorted sides plus an id index
//! for O(1) cancellation.
//!
//! Bids and asks use `BTreeMap` (a balanced BST keyed by price) so both
//! sides iterate from the best price outward and `first_key_value` touches
//! only the leftmost spine rather than scanning the whole map. Bids are
//! keyed by [`ReversePrice`] so ascending map-key order is descending price
//! order, keeping both sides' "best" at the front of iteration.

use std::collections::{BTreeMap, HashMap};

use crate::decimal::{Price, Qty, ReversePrice};
use crate::error::BookError;
use crate::price_level::{OrderHandle, PriceLevel};
use crate::types::{Order, OrderId, Side, Symbol};

struct OrderLocation {
	side: Side,
	price: Price,
	handle: OrderHandle,
}

pub struct OrderBook {
	symbol: Symbol,
	bids: BTreeMap<ReversePrice, PriceLevel>,
	asks: BTreeMap<Price, PriceLevel>,
	order_index: HashMap<OrderId, OrderLocation>,
}

impl OrderBook {
	pub fn new(symbol: Symbol) -> Self {
		Self {
			symbol,
			bids: BTreeMap::new(),
			asks: BTreeMap::new(),
			order_index: HashMap::new(),
		}
	}

	pub fn symbol(&self) -> &str {
		&self.symbol
	}

	/// Rests `order` on the book. Caller guarantees this is a LIMIT order
	/// with `remaining_qty > 0` left after matching.
	///
	/// O(1) if the price level already exists, else O(log M) for the
	/// `BTreeMap` insertion. Fails only if `order.id` is already resting.
	pub fn add_order(&mut self, order: Order) -> Result<(), BookError> {
		if self.order_index.contains_key(&order.id) {
			return Err(BookError::DuplicateOrderId(order.id));
		}

		let side = order.side;
		let price = order.price;
		let id = order.id.clone();

		let handle = match side {
			Side::Buy => self
				.bids
				.entry(ReversePrice(price))
				.or_insert_with(|| PriceLevel::new(price))
				.append(order),
			Side::Sell => self
				.asks
				.entry(price)
				.or_insert_with(|| PriceLevel::new(price))
				.append(order),
		};

		self.order_index
			.insert(id, OrderLocation { side, price, handle });
		Ok(())
	}

	/// Removes a resting order by id. O(1) expected; O(log M) worst case
	/// when the level becomes empty and must be dropped from the map.
	/// Returns `false` for an unknown id rather than raising.
	pub fn cancel_order(&mut self, order_id: &str) -> bool {
		let Some(loc) = self.order_index.remove(order_id) else {
			return false;
		};

		let removed = match loc.side {
			Side::Buy => {
				let key = ReversePrice(loc.price);
				let level = self
					.bids
					.get_mut(&key)
					.expect("order_index/level invariant");
				let removed = level.remove(loc.handle);
				if level.is_empty() {
					self.bids.remove(&key);
				}
				removed
			}
			Side::Sell => {
				let level = self
					.asks
					.get_mut(&loc.price)
					.expect("order_index/level invariant");
				let removed = level.remove(loc.handle);
				if level.is_empty() {
					self.asks.remove(&loc.price);
				}
				removed
			}
		};

		removed.is_some()
	}

	pub fn best_bid(&self) -> Option<Price> {
		self.bids.keys().next().map(|rp| rp.0)
	}

	pub fn best_ask(&self) -> Option<Price> {
		self.asks.keys().next().copied()
	}

	/// Best resting price on `side` (bids for Buy, asks for Sell).
	pub fn best_price(&self, side: Side) -> Option<Price> {
		match side {
			Side::Buy => self.best_bid(),
			Side::Sell => self.best_ask(),
		}
	}

	/// The price level at the book's current best price on `side`, if any.
	/// Used by the matcher; never exposed outside the crate.
	pub(crate) fn best_level_mut(&mut self, side: Side) -> Option<&mut PriceLevel> {
		match side {
			Side::Buy => self.bids.values_mut().next(),
			Side::Sell => self.asks.values_mut().next(),
		}
	}

	/// Aggregate resting quantity on `side` at prices at least as good as
	/// `limit_price` for the taker crossing into that side — i.e. asks at
	/// or below `limit_price` when `side` is Sell, bids at or above
	/// `limit_price` when `side` is Buy. O(K) in the number of qualifying
	/// levels, used by the FOK pre-check.
	pub fn available_liquidity(&self, side: Side, limit_price: Price) -> Qty {
		match side {
			Side::Sell => self
				.asks
				.range(..=limit_price)
				.map(|(_, level)| level.total_quantity())
				.sum(),
			Side::Buy => self
				.bids
				.range(..=ReversePrice(limit_price))
				.map(|(_, level)| level.total_quantity())
				.sum(),
		}
	}

	/// Up to `depth` `(price, total_quantity)` pairs per side, best price
	/// first on each side.
	pub fn l2_snapshot(&self, depth: usize) -> (Vec<(Price, Qty)>, Vec<(Price, Qty)>) {
		let bids = self
			.bids
			.iter()
			.take(depth)
			.map(|(key, level)| (key.0, level.total_quantity()))
			.collect();
		let asks = self
			.asks
			.iter()
			.take(depth)
			.map(|(price, level)| (*price, level.total_quantity()))
			.collect();
		(bids, asks)
	}

	pub fn is_order_resting(&self, order_id: &str) -> bool {
		self.order_index.contains_key(order_id)
	}

	#[cfg(test)]
	pub(crate) fn bid_levels(&self) -> usize {
		self.bids.len()
	}

	#[cfg(test)]
	pub(crate) fn ask_levels(&self) -> usize {
		self.asks.len()
	}
}
