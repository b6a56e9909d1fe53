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

//! A single price level: a FIFO queue of resting orders sharing a price.
//!
//! Backed by a `slab::Slab` threaded into a doubly linked list — append is
//! `slab.insert` plus a tail link, removal given a handle is `slab.remove`
//! plus re-linking the neighbors, both O(1) regardless of queue length.
//! A `Vec`/`VecDeque` with position-scan removal (the obvious alternative)
//! is the tombstone/swap-remove trap this avoids: neither keeps FIFO order
//! under removal without a scan.

use slab::Slab;

use crate::decimal::{Price, Qty};
use crate::types::Order;

/// Stable reference to an order inside a [`PriceLevel`], valid until that
/// order is removed. Opaque to callers outside this module except for
/// `OrderBook`, which stores it in `order_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderHandle(usize);

struct Slot {
	order: Order,
	prev: Option<usize>,
	next: Option<usize>,
}

pub struct PriceLevel {
	price: Price,
	slots: Slab<Slot>,
	head: Option<usize>,
	tail: Option<usize>,
	total_quantity: Qty,
}

impl PriceLevel {
	pub fn new(price: Price) -> Self {
		Self {
			price,
			slots: Slab::new(),
			head: None,
			tail: None,
			total_quantity: Qty::from_raw(0),
		}
	}

	pub fn price(&self) -> Price {
		self.price
	}

	/// Appends to the tail. O(1).
	pub fn append(&mut self, order: Order) -> OrderHandle {
		self.total_quantity = self.total_quantity + order.remaining_qty;
		let prev_tail = self.tail;
		let key = self.slots.insert(Slot {
			order,
			prev: prev_tail,
			next: None,
		});
		if let Some(prev_tail) = prev_tail {
			self.slots[prev_tail].next = Some(key);
		} else {
			self.head = Some(key);
		}
		self.tail = Some(key);
		OrderHandle(key)
	}

	/// Removes the order at `handle`. O(1), never scans.
	pub fn remove(&mut self, handle: OrderHandle) -> Option<Order> {
		if !self.slots.contains(handle.0) {
			return None;
		}
		let Slot { order, prev, next } = self.slots.remove(handle.0);
		match prev {
			Some(prev) => self.slots[prev].next = next,
			None => self.head = next,
		}
		match next {
			Some(next) => self.slots[next].prev = prev,
			None => self.tail = prev,
		}
		self.total_quantity = self.total_quantity - order.remaining_qty;
		Some(order)
	}

	/// The oldest resting order — the next one the matcher trades against.
	pub fn front(&self) -> Option<&Order> {
		self.head.map(|key| &self.slots[key].order)
	}

	pub fn front_mut(&mut self) -> Option<&mut Order> {
		self.head.map(|key| &mut self.slots[key].order)
	}

	pub fn front_handle(&self) -> Option<OrderHandle> {
		self.head.map(OrderHandle)
	}

	pub fn is_empty(&self) -> bool {
		self.head.is_none()
	}

	pub fn total_quantity(&self) -> Qty {
		self.total_quantity
	}

	/// Shrinks the cached aggregate after a partial fill of the front
	/// order (whose `remaining_qty` the caller has already decremented).
	pub fn decrement_total(&mut self, qty: Qty) {
		self.total_quantity = self.total_quantity - qty;
	}

	#[cfg(test)]
	pub fn iter(&self) -> impl Iterator<Item = &Order> {
		let mut next = self.head;
		std::iter::from_fn(move || {
			let key = next?;
			let slot = &self.slots[key];
			next = slot.next;
			Some(&slot.order)
		})
	}
}
