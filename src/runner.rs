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

//! Drives [`MatchingEngine`] on a dedicated thread: dequeue, process,
//! publish, repeat.
//!
//! The engine itself is moved entirely into the runner's thread — no
//! external `Mutex`, no shared ownership. Matching state changes only ever
//! happen on this one thread, which is what keeps the whole core free of
//! internal locking.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, info, warn};

use crate::config::RunnerConfig;
use crate::event::{EventProducer, MatchingEvent};
use crate::matching::MatchingEngine;
use crate::queue::{QueueError, QueueReceiver};
use crate::types::{BboSnapshot, L2Snapshot, Trade};

/// Owns the matching loop's dedicated thread.
pub struct EngineRunner {
	thread_handle: Option<JoinHandle<()>>,
	shutdown: Arc<AtomicBool>,
}

impl EngineRunner {
	/// Spawns the matching loop. `queue_receiver` is the sole consumer end
	/// of the ingress queue; `event_producer` is the sole producer end of
	/// the outbound event buffer.
	pub fn start(config: RunnerConfig, queue_receiver: QueueReceiver, event_producer: EventProducer) -> Self {
		let shutdown = Arc::new(AtomicBool::new(false));
		let shutdown_clone = shutdown.clone();

		let thread_handle = thread::Builder::new()
			.name("matching-loop".to_string())
			.spawn(move || {
				info!(target: "runner", "engine runner started");
				Self::run(config, queue_receiver, event_producer, &shutdown_clone);
				info!(target: "runner", "engine runner stopped");
			})
			.expect("failed to spawn matching loop thread");

		Self {
			thread_handle: Some(thread_handle),
			shutdown,
		}
	}

	/// Signals the loop to stop after its current `recv_timeout` wakes up.
	/// Does not block; call [`Self::join`] to wait for actual exit.
	pub fn stop(&self) {
		self.shutdown.store(true, Ordering::SeqCst);
	}

	pub fn join(mut self) {
		if let Some(handle) = self.thread_handle.take() {
			let _ = handle.join();
		}
	}

	fn run(config: RunnerConfig, queue_receiver: QueueReceiver, event_producer: EventProducer, shutdown: &AtomicBool) {
		let mut engine = MatchingEngine::new();
		let mut processed: u64 = 0;
		let poll_interval = Duration::from_secs(1);

		while !shutdown.load(Ordering::Relaxed) {
			match queue_receiver.recv_timeout(poll_interval) {
				Ok(order) => {
					let order_id = order.id.clone();
					let symbol = order.symbol.clone();
					match engine.process(order) {
						Ok(trades) => {
							Self::publish(&engine, &event_producer, &symbol, &trades, config.l2_depth);
							processed += 1;
							if config.stats_period > 0 && processed % config.stats_period == 0 {
								info!(
									target: "runner",
									processed,
									trades_total = engine.trades().len(),
									"runner stats"
								);
							}
						}
						Err(err) => {
							warn!(target: "runner", order_id = %order_id, error = %err, "order rejected");
						}
					}
				}
				Err(QueueError::Empty) => continue,
				Err(QueueError::Disconnected) => {
					info!(target: "runner", "ingress disconnected, stopping");
					break;
				}
				Err(QueueError::Full) => unreachable!("recv_timeout never reports Full"),
			}
		}
	}

	/// Publishes in the fixed order: every trade from this call, then the
	/// BBO, then the L2 snapshot. A full event buffer is logged and
	/// skipped rather than blocking the matching loop.
	fn publish(
		engine: &MatchingEngine,
		event_producer: &EventProducer,
		symbol: &str,
		trades: &[Trade],
		l2_depth: usize,
	) {
		for trade in trades {
			if let Err(err) = event_producer.push(MatchingEvent::Trade(trade.clone())) {
				warn!(target: "runner", error = %err, trade_id = %trade.trade_id, "dropping trade event");
			}
		}

		let Some(book) = engine.book(symbol) else {
			return;
		};
		let timestamp = now_seconds();

		let bbo = BboSnapshot {
			symbol: symbol.to_string(),
			best_bid: book.best_bid(),
			best_ask: book.best_ask(),
			timestamp,
		};
		debug!(target: "runner", symbol, best_bid = ?bbo.best_bid, best_ask = ?bbo.best_ask, "bbo");
		if let Err(err) = event_producer.push(MatchingEvent::Bbo(bbo)) {
			warn!(target: "runner", error = %err, symbol, "dropping bbo event");
		}

		let (bids, asks) = book.l2_snapshot(l2_depth);
		let l2 = L2Snapshot {
			symbol: symbol.to_string(),
			timestamp,
			bids,
			asks,
		};
		if let Err(err) = event_producer.push(MatchingEvent::L2(l2)) {
			warn!(target: "runner", error = %err, symbol, "dropping l2 event");
		}
	}
}

fn now_seconds() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_secs())
		.unwrap_or(0)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::event::EventBuffer;
	use crate::queue::IngressQueue;
	use crate::types::{Order, OrderType, Side};

	fn market_order(id: &str, symbol: &str, side: Side, order_type: OrderType, price: &str, qty: &str) -> Order {
		Order {
			id: id.to_string(),
			symbol: symbol.to_string(),
			side,
			order_type,
			price: price.parse().unwrap(),
			original_qty: qty.parse().unwrap(),
			remaining_qty: qty.parse().unwrap(),
			timestamp: now_seconds(),
			sequence: 0,
		}
	}

	#[test]
	fn runner_publishes_bbo_after_resting_a_limit_order() {
		let ingress = IngressQueue::new(16);
		let (queue_sender, queue_receiver) = ingress.split();
		let events = EventBuffer::new(16);
		let (event_producer, event_consumer) = events.split();

		let runner = EngineRunner::start(RunnerConfig::default(), queue_receiver, event_producer);

		queue_sender
			.try_enqueue(market_order("a1", "BTC-USDT", Side::Sell, OrderType::Limit, "60000", "1"))
			.unwrap();

		let event = event_consumer.recv().unwrap();
		match event {
			MatchingEvent::Bbo(bbo) => {
				assert_eq!(bbo.symbol, "BTC-USDT");
				assert_eq!(bbo.best_ask.unwrap().to_string(), "60000.00000000");
			}
			other => panic!("expected BBO event first for a non-crossing rest, got {other:?}"),
		}

		runner.stop();
		runner.join();
	}

	#[test]
	fn runner_publishes_trade_before_bbo_on_a_cross() {
		let ingress = IngressQueue::new(16);
		let (queue_sender, queue_receiver) = ingress.split();
		let events = EventBuffer::new(16);
		let (event_producer, event_consumer) = events.split();

		let runner = EngineRunner::start(RunnerConfig::default(), queue_receiver, event_producer);

		queue_sender
			.try_enqueue(market_order("a1", "BTC-USDT", Side::Sell, OrderType::Limit, "60000", "1"))
			.unwrap();
		// drain the rest's own BBO/L2 before sending the crossing order
		let _ = event_consumer.recv();
		let _ = event_consumer.recv();

		queue_sender
			.try_enqueue(market_order("t1", "BTC-USDT", Side::Buy, OrderType::Market, "0", "1"))
			.unwrap();

		let first = event_consumer.recv().unwrap();
		assert!(matches!(first, MatchingEvent::Trade(_)), "expected trade first, got {first:?}");
		let second = event_consumer.recv().unwrap();
		assert!(matches!(second, MatchingEvent::Bbo(_)), "expected bbo second, got {second:?}");
		let third = event_consumer.recv().unwrap();
		assert!(matches!(third, MatchingEvent::L2(_)), "expected l2 third, got {third:?}");

		runner.stop();
		runner.join();
	}
}
