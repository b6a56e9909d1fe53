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

//! Price-time priority matching for Market, Limit, IOC and FOK orders.
//!
//! One [`OrderBook`] per symbol, lazily created on first touch. The engine
//! is not `Sync` by design — per the concurrency model, exactly one thread
//! (the `EngineRunner` loop) ever calls `process`.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::book::OrderBook;
use crate::decimal::{Price, Qty};
use crate::error::MatchingError;
use crate::types::{Order, OrderType, Side, Symbol, Trade};

pub struct MatchingEngine {
	books: HashMap<Symbol, OrderBook>,
	trades: Vec<Trade>,
	next_trade_id: u64,
	next_sequence: u64,
}

impl Default for MatchingEngine {
	fn default() -> Self {
		Self::new()
	}
}

impl MatchingEngine {
	pub fn new() -> Self {
		Self {
			books: HashMap::new(),
			trades: Vec::new(),
			next_trade_id: 1,
			next_sequence: 0,
		}
	}

	/// Entry point. Dispatches by `order.order_type`; never raises on an
	/// empty book or a no-match condition. Returns the trades produced by
	/// this call (also appended to the permanent history returned by
	/// [`Self::trades`]).
	///
	/// The only error path is a LIMIT order whose id collides with one
	/// already resting — a caller bug per the ingress contract. Any trades
	/// already produced by this call before that point remain committed to
	/// the trade history; trade emission, not a successful return, is the
	/// commit point.
	pub fn process(&mut self, mut order: Order) -> Result<Vec<Trade>, MatchingError> {
		debug_assert_eq!(
			order.remaining_qty, order.original_qty,
			"process() must receive an order at its initial remaining_qty"
		);
		debug_assert!(order.original_qty.is_positive(), "order quantity must be positive");
		if matches!(order.order_type, OrderType::Limit | OrderType::Ioc | OrderType::Fok) {
			debug_assert!(order.price.is_positive(), "priced order types require price > 0");
		}

		self.next_sequence += 1;
		order.sequence = self.next_sequence;

		let symbol = order.symbol.clone();
		let book = self
			.books
			.entry(symbol.clone())
			.or_insert_with(|| OrderBook::new(symbol));

		let trades = match order.order_type {
			OrderType::Market => {
				let (_, trades) =
					Self::match_loop(book, &mut self.trades, &mut self.next_trade_id, order, None);
				trades
			}
			OrderType::Limit => {
				let limit_price = order.price;
				let (resting, trades) = Self::match_loop(
					book,
					&mut self.trades,
					&mut self.next_trade_id,
					order,
					Some(limit_price),
				);
				if resting.remaining_qty.is_positive() {
					let order_id = resting.id.clone();
					book.add_order(resting).map_err(|err| {
						warn!(order_id = %order_id, error = %err, "failed to rest limit order");
						MatchingError::from(err)
					})?;
				}
				trades
			}
			OrderType::Ioc => {
				let limit_price = order.price;
				let (discarded, trades) = Self::match_loop(
					book,
					&mut self.trades,
					&mut self.next_trade_id,
					order,
					Some(limit_price),
				);
				if discarded.remaining_qty.is_positive() {
					debug!(order_id = %discarded.id, remaining = %discarded.remaining_qty, "IOC remainder discarded");
				}
				trades
			}
			OrderType::Fok => {
				let counter_side = order.side.opposite();
				let available = book.available_liquidity(counter_side, order.price);
				if available < order.remaining_qty {
					debug!(order_id = %order.id, available = %available, requested = %order.remaining_qty, "FOK killed: insufficient liquidity");
					Vec::new()
				} else {
					let (_, trades) = Self::match_loop(
						book,
						&mut self.trades,
						&mut self.next_trade_id,
						order,
						Some(order.price),
					);
					trades
				}
			}
		};

		Ok(trades)
	}

	/// Append-only trade history, in emission order.
	pub fn trades(&self) -> &[Trade] {
		&self.trades
	}

	/// Read-only view of a symbol's book, for snapshots. `None` if the
	/// symbol has never been touched.
	pub fn book(&self, symbol: &str) -> Option<&OrderBook> {
		self.books.get(symbol)
	}

	/// Cancels a resting order. The engine has no internal cancellation of
	/// its own (an order is either consumed or left resting by `process`);
	/// this is the mutation path external cancel instructions use once
	/// they arrive as their own message on the inbound channel. `false` if
	/// the symbol or id is unknown.
	pub fn cancel(&mut self, symbol: &str, order_id: &str) -> bool {
		self.books
			.get_mut(symbol)
			.map(|book| book.cancel_order(order_id))
			.unwrap_or(false)
	}

	/// Shared matching loop for LIMIT/IOC/FOK (after any FOK pre-check) and
	/// MARKET (with `limit_price = None`, i.e. no marketability check).
	///
	/// Trades are appended to `trade_history` (the permanent commit point)
	/// as they are produced, in the same order they're returned.
	fn match_loop(
		book: &mut OrderBook,
		trade_history: &mut Vec<Trade>,
		next_trade_id: &mut u64,
		mut order: Order,
		limit_price: Option<Price>,
	) -> (Order, Vec<Trade>) {
		let counter_side = order.side.opposite();
		let mut emitted = Vec::new();

		while order.remaining_qty.is_positive() {
			let Some(best_price) = book.best_price(counter_side) else {
				break;
			};
			if let Some(limit) = limit_price {
				if !marketable(order.side, limit, best_price) {
					break;
				}
			}

			let level = book
				.best_level_mut(counter_side)
				.expect("best_price returned Some so its level exists");

			let (maker_id, maker_exhausted, fill) = {
				let resting = level
					.front_mut()
					.expect("a non-empty level always has a front order");
				let fill: Qty = order.remaining_qty.min(resting.remaining_qty);
				resting.remaining_qty = resting.remaining_qty - fill;
				(resting.id.clone(), resting.remaining_qty.is_zero(), fill)
			};
			level.decrement_total(fill);
			order.remaining_qty = order.remaining_qty - fill;

			let trade = Trade {
				trade_id: format!("T{:04}", *next_trade_id),
				symbol: order.symbol.clone(),
				maker_order_id: maker_id.clone(),
				taker_order_id: order.id.clone(),
				price: best_price,
				quantity: fill,
				aggressor_side: order.side,
				timestamp: order.timestamp,
			};
			*next_trade_id += 1;

			debug!(
				trade_id = %trade.trade_id,
				maker = %trade.maker_order_id,
				taker = %trade.taker_order_id,
				price = %trade.price,
				qty = %trade.quantity,
				"trade executed"
			);

			trade_history.push(trade.clone());
			emitted.push(trade);

			if maker_exhausted {
				book.cancel_order(&maker_id);
			}
		}

		(order, emitted)
	}
}

/// `true` when a taker on `taker_side` with `limit` is willing to trade at
/// `best_price`. BUY: `limit >= best_price`. SELL: `limit <= best_price`.
fn marketable(taker_side: Side, limit: Price, best_price: Price) -> bool {
	match taker_side {
		Side::Buy => limit >= best_price,
		Side::Sell => limit <= best_price,
	}
}
