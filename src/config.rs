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

use crate::types::DEFAULT_L2_DEPTH;

fn default_transport_host() -> String {
	"localhost".to_string()
}

fn default_transport_port() -> u16 {
	6379
}

fn default_inbound_queue_name() -> String {
	"order_queue".to_string()
}

fn default_trade_channel() -> String {
	"trade_events".to_string()
}

fn default_bbo_channel() -> String {
	"bbo_updates".to_string()
}

fn default_l2_channel() -> String {
	"order_book_updates".to_string()
}

fn default_ingress_capacity() -> usize {
	4096
}

fn default_event_capacity() -> usize {
	4096
}

fn default_l2_depth() -> usize {
	DEFAULT_L2_DEPTH
}

fn default_stats_period() -> u64 {
	1000
}

/// [`crate::runner::EngineRunner`] configuration.
///
/// This crate has no transport client of its own — `transport_host`,
/// `transport_port` and `transport_db_index` exist only as the connection
/// parameters an embedding transport adapter reads; the runner itself never
/// dials them. `ingress_capacity`/`event_capacity` size the in-process
/// queues between that adapter and the matching loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
	/// Transport host, e.g. a broker or cache the embedding adapter connects
	/// to. Unused by this crate directly.
	#[serde(default = "default_transport_host")]
	pub transport_host: String,
	#[serde(default = "default_transport_port")]
	pub transport_port: u16,
	/// Logical database/namespace selector on the transport, if it has one.
	#[serde(default)]
	pub transport_db_index: u32,
	/// Name of the inbound order queue on the transport.
	#[serde(default = "default_inbound_queue_name")]
	pub inbound_queue_name: String,
	/// Outbound channel name for trade events.
	#[serde(default = "default_trade_channel")]
	pub trade_channel: String,
	/// Outbound channel name for BBO updates.
	#[serde(default = "default_bbo_channel")]
	pub bbo_channel: String,
	/// Outbound channel name for L2 depth updates.
	#[serde(default = "default_l2_channel")]
	pub l2_channel: String,
	/// Bounded capacity of the ingress queue between the transport and the
	/// matching loop.
	#[serde(default = "default_ingress_capacity")]
	pub ingress_capacity: usize,
	/// Bounded capacity of the outbound market-data event buffer.
	#[serde(default = "default_event_capacity")]
	pub event_capacity: usize,
	/// Number of price levels per side included in each L2 snapshot.
	#[serde(default = "default_l2_depth")]
	pub l2_depth: usize,
	/// How many processed orders between periodic stats log lines.
	#[serde(default = "default_stats_period")]
	pub stats_period: u64,
}

impl Default for RunnerConfig {
	fn default() -> Self {
		Self {
			transport_host: default_transport_host(),
			transport_port: default_transport_port(),
			transport_db_index: 0,
			inbound_queue_name: default_inbound_queue_name(),
			trade_channel: default_trade_channel(),
			bbo_channel: default_bbo_channel(),
			l2_channel: default_l2_channel(),
			ingress_capacity: default_ingress_capacity(),
			event_capacity: default_event_capacity(),
			l2_depth: default_l2_depth(),
			stats_period: default_stats_period(),
		}
	}
}

impl RunnerConfig {
	/// Loads from `MATCHING_*` environment variables, falling back to the
	/// defaults above for anything unset, e.g. `MATCHING_L2_DEPTH=20`.
	pub fn from_env() -> Result<Self, config::ConfigError> {
		config::Config::builder()
			.add_source(config::Environment::with_prefix("MATCHING"))
			.build()?
			.try_deserialize()
	}

	/// Loads from a config file (`path`, extension-sniffed by the `config`
	/// crate), then layers `MATCHING_*` environment overrides on top.
	pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
		config::Config::builder()
			.add_source(config::File::with_name(path))
			.add_source(config::Environment::with_prefix("MATCHING"))
			.build()?
			.try_deserialize()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_sane() {
		let cfg = RunnerConfig::default();
		assert!(cfg.ingress_capacity > 0);
		assert!(cfg.event_capacity > 0);
		assert_eq!(cfg.l2_depth, DEFAULT_L2_DEPTH);
	}

	#[test]
	fn from_env_overrides_default_l2_depth() {
		// SAFETY: tests in this module don't run concurrently with other
		// tests that read MATCHING_L2_DEPTH.
		unsafe {
			std::env::set_var("MATCHING_L2_DEPTH", "25");
		}
		let cfg = RunnerConfig::from_env().unwrap();
		assert_eq!(cfg.l2_depth, 25);
		unsafe {
			std::env::remove_var("MATCHING_L2_DEPTH");
		}
	}
}
