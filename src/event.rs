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

//! Market-data events the [`crate::runner::EngineRunner`] publishes after
//! each processed order, and the SPSC buffer that decouples their
//! production from whatever transport ships them out.
//!
//! Publication happens in a fixed order per processed order: all trades,
//! then the BBO snapshot, then the L2 snapshot — so subscribers relying on
//! event order never observe a depth update that precedes the trade that
//! caused it.

use crossbeam::channel::{Receiver, Sender, TryRecvError, TrySendError, bounded};

use crate::types::{BboSnapshot, L2Snapshot, Trade};

/// A single piece of market data produced by the matching loop.
#[derive(Debug, Clone)]
pub enum MatchingEvent {
	Trade(Trade),
	Bbo(BboSnapshot),
	L2(L2Snapshot),
}

/// SPSC buffer decoupling event production (the matching loop) from event
/// delivery (whatever egress transport drains it). Bounded; the producer
/// never blocks, so a slow consumer applies backpressure to the runner
/// rather than stalling matching.
pub struct EventBuffer {
	sender: Sender<MatchingEvent>,
	receiver: Receiver<MatchingEvent>,
}

impl EventBuffer {
	pub fn new(capacity: usize) -> Self {
		let (sender, receiver) = bounded(capacity);
		Self { sender, receiver }
	}

	pub fn split(self) -> (EventProducer, EventConsumer) {
		(
			EventProducer { sender: self.sender },
			EventConsumer { receiver: self.receiver },
		)
	}
}

pub struct EventProducer {
	sender: Sender<MatchingEvent>,
}

impl EventProducer {
	/// Non-blocking. `Err(EventBufferError::Full)` signals the consumer
	/// isn't keeping up; the runner logs this and moves on rather than
	/// stalling the matching loop on a slow subscriber.
	pub fn push(&self, event: MatchingEvent) -> Result<(), EventBufferError> {
		self.sender.try_send(event).map_err(|err| match err {
			TrySendError::Full(_) => EventBufferError::Full,
			TrySendError::Disconnected(_) => EventBufferError::Disconnected,
		})
	}

	pub fn is_full(&self) -> bool {
		self.sender.is_full()
	}
}

pub struct EventConsumer {
	receiver: Receiver<MatchingEvent>,
}

impl EventConsumer {
	pub fn try_recv(&self) -> Result<MatchingEvent, EventBufferError> {
		self.receiver.try_recv().map_err(|err| match err {
			TryRecvError::Empty => EventBufferError::Empty,
			TryRecvError::Disconnected => EventBufferError::Disconnected,
		})
	}

	pub fn recv(&self) -> Result<MatchingEvent, EventBufferError> {
		self.receiver.recv().map_err(|_| EventBufferError::Disconnected)
	}

	/// Up to `max_count` events, non-blocking, stopping early once the
	/// buffer runs dry.
	pub fn drain(&self, max_count: usize) -> Vec<MatchingEvent> {
		let mut events = Vec::with_capacity(max_count);
		for _ in 0..max_count {
			match self.try_recv() {
				Ok(event) => events.push(event),
				Err(_) => break,
			}
		}
		events
	}
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EventBufferError {
	#[error("event buffer is full")]
	Full,
	#[error("event buffer is empty")]
	Empty,
	#[error("event buffer disconnected")]
	Disconnected,
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::Side;

	fn test_trade(trade_id: &str) -> MatchingEvent {
		MatchingEvent::Trade(Trade {
			trade_id: trade_id.to_string(),
			symbol: "BTC-USDT".to_string(),
			maker_order_id: "m1".to_string(),
			taker_order_id: "t1".to_string(),
			price: "50000".parse().unwrap(),
			quantity: "1".parse().unwrap(),
			aggressor_side: Side::Buy,
			timestamp: 1000,
		})
	}

	fn trade_id(event: &MatchingEvent) -> &str {
		match event {
			MatchingEvent::Trade(trade) => &trade.trade_id,
			_ => panic!("expected a trade event"),
		}
	}

	#[test]
	fn push_then_recv_returns_same_event() {
		let buffer = EventBuffer::new(10);
		let (producer, consumer) = buffer.split();

		producer.push(test_trade("T1")).unwrap();

		let received = consumer.recv().unwrap();
		assert_eq!(trade_id(&received), "T1");
	}

	#[test]
	fn push_past_capacity_reports_full() {
		let buffer = EventBuffer::new(2);
		let (producer, _consumer) = buffer.split();

		producer.push(test_trade("T1")).unwrap();
		producer.push(test_trade("T2")).unwrap();

		let result = producer.push(test_trade("T3"));
		assert_eq!(result, Err(EventBufferError::Full));
	}

	#[test]
	fn drain_stops_when_buffer_runs_dry() {
		let buffer = EventBuffer::new(10);
		let (producer, consumer) = buffer.split();

		for i in 0..5 {
			producer.push(test_trade(&format!("T{i}"))).unwrap();
		}

		let drained = consumer.drain(10);
		assert_eq!(drained.len(), 5);
		assert_eq!(consumer.drain(10).len(), 0);
	}

	#[test]
	fn events_drain_in_fifo_order() {
		let buffer = EventBuffer::new(10);
		let (producer, consumer) = buffer.split();

		producer.push(test_trade("T1")).unwrap();
		producer.push(test_trade("T2")).unwrap();

		let drained = consumer.drain(10);
		assert_eq!(trade_id(&drained[0]), "T1");
		assert_eq!(trade_id(&drained[1]), "T2");
	}
}
