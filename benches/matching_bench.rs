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

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};

use matching_core::{MatchingEngine, Order, OrderType, Side};

#[derive(Clone, Copy)]
enum Scenario {
	/// Alternating buy/sell limit orders on either side of the mid price —
	/// nothing crosses, so every order just rests.
	NoCross,
	/// Every order sits at the same price — each new one immediately
	/// trades out the previous one.
	CrossHeavy,
	/// A deep two-sided book punctuated by occasional sweep-sized takers.
	DeepBook,
}

struct OrderGenerator {
	counter: u64,
	scenario: Scenario,
}

impl OrderGenerator {
	fn new(scenario: Scenario) -> Self {
		Self { counter: 0, scenario }
	}

	fn next_order(&mut self) -> Order {
		self.counter += 1;
		let id = format!("o{}", self.counter);

		let (side, order_type, price, qty) = match self.scenario {
			Scenario::NoCross => {
				if self.counter % 2 == 0 {
					(Side::Buy, OrderType::Limit, 44_000 + (self.counter % 1_000), 1)
				} else {
					(Side::Sell, OrderType::Limit, 56_000 + (self.counter % 1_000), 1)
				}
			}
			Scenario::CrossHeavy => {
				let side = if self.counter % 2 == 0 { Side::Buy } else { Side::Sell };
				(side, OrderType::Limit, 50_000, 10)
			}
			Scenario::DeepBook => {
				if self.counter % 100 == 0 {
					let side = if (self.counter / 100) % 2 == 0 { Side::Buy } else { Side::Sell };
					let price: u64 = match side {
						Side::Buy => 1_000_000,
						Side::Sell => 1,
					};
					(side, OrderType::Market, price, 10_000)
				} else {
					let mid: i64 = 50_000;
					let levels: i64 = 2_000;
					let offset = (self.counter % levels as u64) as i64 - levels / 2;
					let side = if self.counter % 2 == 0 { Side::Buy } else { Side::Sell };
					let price = match side {
						Side::Buy => mid - 1 - offset.abs(),
						Side::Sell => mid + 1 + offset.abs(),
					};
					(side, OrderType::Limit, price as u64, 1_000)
				}
			}
		};

		Order {
			id,
			symbol: "BTC-USDT".to_string(),
			side,
			order_type,
			price: price.to_string().parse().unwrap(),
			original_qty: qty.to_string().parse().unwrap(),
			remaining_qty: qty.to_string().parse().unwrap(),
			timestamp: 1_700_000_000,
			sequence: 0,
		}
	}

	fn warmup_orders(&self, count: usize) -> Vec<Order> {
		let mid: i64 = 50_000;
		let levels: i64 = 2_000;
		let half = levels / 2;

		(0..count)
			.map(|i| {
				let side = if i % 2 == 0 { Side::Buy } else { Side::Sell };
				let level = (i as i64 / 2) % half;
				let price = match side {
					Side::Buy => mid - 1 - level,
					Side::Sell => mid + 1 + level,
				};
				Order {
					id: format!("warmup-{i}"),
					symbol: "BTC-USDT".to_string(),
					side,
					order_type: OrderType::Limit,
					price: price.to_string().parse().unwrap(),
					original_qty: "1000".parse().unwrap(),
					remaining_qty: "1000".parse().unwrap(),
					timestamp: 1_700_000_000,
					sequence: 0,
				}
			})
			.collect()
	}
}

fn bench_scenario(c: &mut Criterion, name: &str, scenario: Scenario, batch: usize) {
	c.bench_function(name, |b| {
		b.iter_batched(
			|| {
				let mut engine = MatchingEngine::new();
				if matches!(scenario, Scenario::DeepBook) {
					let generator = OrderGenerator::new(scenario);
					for order in generator.warmup_orders(100_000) {
						engine.process(order).unwrap();
					}
				}
				let generator = OrderGenerator::new(scenario);
				(engine, generator)
			},
			|(mut engine, mut generator)| {
				for _ in 0..batch {
					let order = generator.next_order();
					engine.process(order).ok();
				}
				engine
			},
			BatchSize::LargeInput,
		);
	});
}

fn bench_no_cross(c: &mut Criterion) {
	bench_scenario(c, "no_cross", Scenario::NoCross, 10_000);
}

fn bench_cross_heavy(c: &mut Criterion) {
	bench_scenario(c, "cross_heavy", Scenario::CrossHeavy, 10_000);
}

fn bench_deep_book(c: &mut Criterion) {
	bench_scenario(c, "deep_book", Scenario::DeepBook, 10_000);
}

criterion_group!(benches, bench_no_cross, bench_cross_heavy, bench_deep_book);
criterion_main!(benches);
