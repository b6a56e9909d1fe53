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

//! Ingress queue: the boundary between the (external, multi-threaded)
//! transport layer and the single-threaded [`crate::matching::MatchingEngine`]
//! loop.
//!
//! Multiple producers, one consumer, bounded capacity. The queue makes no
//! business decisions about order acceptance and does no prioritization or
//! retry — when full, it signals backpressure to the caller via
//! `QueueError::Full`, which the transport is expected to turn into an
//! overloaded/rejected response.

use crossbeam::channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError, bounded};

use crate::types::Order;

pub struct IngressQueue {
	sender: Sender<Order>,
	receiver: Receiver<Order>,
}

impl IngressQueue {
	/// Capacity should be tuned to the expected order arrival rate versus
	/// the matching loop's processing rate and the backpressure latency
	/// that's acceptable upstream.
	pub fn new(capacity: usize) -> Self {
		let (sender, receiver) = bounded(capacity);
		Self { sender, receiver }
	}

	/// Splits into a cloneable sender and a single-consumer receiver.
	pub fn split(self) -> (QueueSender, QueueReceiver) {
		(
			QueueSender { sender: self.sender },
			QueueReceiver { receiver: self.receiver },
		)
	}
}

/// Producer handle. Cloneable and `Send`, for use by multiple transport
/// threads.
#[derive(Clone)]
pub struct QueueSender {
	sender: Sender<Order>,
}

impl QueueSender {
	pub fn try_enqueue(&self, order: Order) -> Result<(), QueueError> {
		self.sender.try_send(order).map_err(|err| match err {
			TrySendError::Full(_) => QueueError::Full,
			TrySendError::Disconnected(_) => QueueError::Disconnected,
		})
	}

	pub fn is_full(&self) -> bool {
		self.sender.is_full()
	}
}

/// Consumer handle. Not cloneable — exactly one [`crate::runner::EngineRunner`]
/// loop ever holds one.
pub struct QueueReceiver {
	receiver: Receiver<Order>,
}

impl QueueReceiver {
	pub fn recv(&self) -> Result<Order, QueueError> {
		self.receiver.recv().map_err(|_| QueueError::Disconnected)
	}

	/// Blocks for up to `timeout`, returning `QueueError::Empty` if nothing
	/// arrives — what the runner's loop uses so it can still check its
	/// shutdown flag and log periodic stats when the queue is idle.
	pub fn recv_timeout(&self, timeout: std::time::Duration) -> Result<Order, QueueError> {
		self.receiver.recv_timeout(timeout).map_err(|err| match err {
			RecvTimeoutError::Timeout => QueueError::Empty,
			RecvTimeoutError::Disconnected => QueueError::Disconnected,
		})
	}

	pub fn try_recv(&self) -> Result<Order, QueueError> {
		self.receiver.try_recv().map_err(|err| match err {
			TryRecvError::Empty => QueueError::Empty,
			TryRecvError::Disconnected => QueueError::Disconnected,
		})
	}
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueueError {
	#[error("queue is full")]
	Full,
	#[error("queue is empty")]
	Empty,
	#[error("queue disconnected")]
	Disconnected,
}
