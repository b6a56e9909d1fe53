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

//! JSON wire shapes for the ingress/egress boundary.
//!
//! `Price`/`Qty` already serialize as decimal strings (see `decimal`), so
//! [`InboundOrderRecord`] and the outbound event records below mirror the
//! canonical types closely. This module exists for the one place they
//! genuinely differ: an inbound record's `price` is optional (absent for
//! `Market` orders) and its `timestamp` is optional (stamped on arrival if
//! missing), neither of which belongs on [`crate::types::Order`] itself.

use serde::{Deserialize, Serialize};

use crate::decimal::{Price, Qty};
use crate::types::{BboSnapshot, L2Snapshot, Order, OrderId, OrderType, Side, Symbol, Trade};

/// The shape an inbound transport deserializes an order submission into,
/// before converting it to a canonical [`Order`] via [`TryFrom`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundOrderRecord {
	pub id: OrderId,
	pub symbol: Symbol,
	pub side: Side,
	pub order_type: OrderType,
	/// Required for `Limit`/`Ioc`/`Fok`; ignored (and may be omitted) for
	/// `Market`.
	#[serde(default)]
	pub price: Option<Price>,
	pub quantity: Qty,
	/// Seconds since epoch. If absent, the conversion stamps the current
	/// time.
	#[serde(default)]
	pub timestamp: Option<u64>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InboundOrderError {
	#[error("order {0}: price is required for order type {1:?}")]
	MissingPrice(OrderId, OrderType),
	#[error("order {0}: quantity must be positive")]
	NonPositiveQuantity(OrderId),
}

impl TryFrom<InboundOrderRecord> for Order {
	type Error = InboundOrderError;

	fn try_from(record: InboundOrderRecord) -> Result<Self, Self::Error> {
		if !record.quantity.is_positive() {
			return Err(InboundOrderError::NonPositiveQuantity(record.id));
		}

		let price = match record.order_type {
			OrderType::Market => record.price.unwrap_or(Price::from_raw(0)),
			OrderType::Limit | OrderType::Ioc | OrderType::Fok => match record.price {
				Some(price) if price.is_positive() => price,
				_ => return Err(InboundOrderError::MissingPrice(record.id, record.order_type)),
			},
		};

		Ok(Order {
			id: record.id,
			symbol: record.symbol,
			side: record.side,
			order_type: record.order_type,
			price,
			original_qty: record.quantity,
			remaining_qty: record.quantity,
			timestamp: record.timestamp.unwrap_or_else(now_seconds),
			sequence: 0,
		})
	}
}

/// Outbound record for a single trade. Identical in shape to [`Trade`];
/// kept as its own type so the wire format can diverge from the internal
/// one without touching matching logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
	pub trade_id: String,
	pub symbol: Symbol,
	pub maker_order_id: OrderId,
	pub taker_order_id: OrderId,
	pub price: Price,
	pub quantity: Qty,
	pub aggressor_side: Side,
	pub timestamp: u64,
}

impl From<Trade> for TradeRecord {
	fn from(trade: Trade) -> Self {
		Self {
			trade_id: trade.trade_id,
			symbol: trade.symbol,
			maker_order_id: trade.maker_order_id,
			taker_order_id: trade.taker_order_id,
			price: trade.price,
			quantity: trade.quantity,
			aggressor_side: trade.aggressor_side,
			timestamp: trade.timestamp,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BboRecord {
	pub symbol: Symbol,
	pub best_bid: Option<Price>,
	pub best_ask: Option<Price>,
	pub timestamp: u64,
}

impl From<BboSnapshot> for BboRecord {
	fn from(bbo: BboSnapshot) -> Self {
		Self {
			symbol: bbo.symbol,
			best_bid: bbo.best_bid,
			best_ask: bbo.best_ask,
			timestamp: bbo.timestamp,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct L2Record {
	pub symbol: Symbol,
	pub timestamp: u64,
	pub bids: Vec<(Price, Qty)>,
	pub asks: Vec<(Price, Qty)>,
}

impl From<L2Snapshot> for L2Record {
	fn from(l2: L2Snapshot) -> Self {
		Self {
			symbol: l2.symbol,
			timestamp: l2.timestamp,
			bids: l2.bids,
			asks: l2.asks,
		}
	}
}

fn now_seconds() -> u64 {
	use std::time::{SystemTime, UNIX_EPOCH};
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_secs())
		.unwrap_or(0)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn deserializes_a_limit_order_from_json() {
		let json = r#"{
			"id": "o1",
			"symbol": "BTC-USDT",
			"side": "buy",
			"order_type": "limit",
			"price": "60000.5",
			"quantity": "1.25",
			"timestamp": 1700000000
		}"#;
		let record: InboundOrderRecord = serde_json::from_str(json).unwrap();
		let order: Order = record.try_into().unwrap();
		assert_eq!(order.price.to_string(), "60000.50000000");
		assert_eq!(order.remaining_qty.to_string(), "1.25000000");
		assert_eq!(order.timestamp, 1700000000);
	}

	#[test]
	fn market_order_does_not_require_a_price() {
		let json = r#"{
			"id": "o1",
			"symbol": "BTC-USDT",
			"side": "sell",
			"order_type": "market",
			"quantity": "2"
		}"#;
		let record: InboundOrderRecord = serde_json::from_str(json).unwrap();
		let order: Order = record.try_into().unwrap();
		assert_eq!(order.price.raw(), 0);
	}

	#[test]
	fn limit_order_without_price_is_rejected() {
		let record = InboundOrderRecord {
			id: "o1".to_string(),
			symbol: "BTC-USDT".to_string(),
			side: Side::Buy,
			order_type: OrderType::Limit,
			price: None,
			quantity: "1".parse().unwrap(),
			timestamp: None,
		};
		let err = Order::try_from(record).unwrap_err();
		assert_eq!(err, InboundOrderError::MissingPrice("o1".to_string(), OrderType::Limit));
	}

	#[test]
	fn zero_quantity_is_rejected() {
		let record = InboundOrderRecord {
			id: "o1".to_string(),
			symbol: "BTC-USDT".to_string(),
			side: Side::Buy,
			order_type: OrderType::Market,
			price: None,
			quantity: "0".parse().unwrap(),
			timestamp: None,
		};
		let err = Order::try_from(record).unwrap_err();
		assert_eq!(err, InboundOrderError::NonPositiveQuantity("o1".to_string()));
	}

	#[test]
	fn trade_record_round_trips_through_json() {
		let trade = Trade {
			trade_id: "T1".to_string(),
			symbol: "BTC-USDT".to_string(),
			maker_order_id: "m1".to_string(),
			taker_order_id: "t1".to_string(),
			price: "60000".parse().unwrap(),
			quantity: "1".parse().unwrap(),
			aggressor_side: Side::Buy,
			timestamp: 1700000000,
		};
		let record = TradeRecord::from(trade);
		let json = serde_json::to_string(&record).unwrap();
		assert!(json.contains("\"price\":\"60000.00000000\""));
		let parsed: TradeRecord = serde_json::from_str(&json).unwrap();
		assert_eq!(parsed.trade_id, "T1");
	}
}
