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

//! Standalone binary wiring a [`matching_core::RunnerConfig`] and a bare
//! [`matching_core::EngineRunner`] together.
//!
//! This crate has no transport of its own, so the only thing this binary
//! demonstrates is the matching loop's lifecycle: load config, start the
//! runner, block until `ctrl_c`, stop and join. An actual deployment
//! replaces the unused ends of the ingress/event channels with a real
//! transport.

use std::process::ExitCode;

use matching_core::{EngineRunner, EventBuffer, IngressQueue, RunnerConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let config = match RunnerConfig::from_env() {
		Ok(config) => config,
		Err(err) => {
			error!(error = %err, "failed to load runner configuration");
			return ExitCode::from(1);
		}
	};

	let ingress = IngressQueue::new(config.ingress_capacity);
	let events = EventBuffer::new(config.event_capacity);
	let (_queue_sender, queue_receiver) = ingress.split();
	let (event_producer, _event_consumer) = events.split();

	info!(
		event = "engine_starting",
		inbound_queue_name = %config.inbound_queue_name,
		trade_channel = %config.trade_channel,
		bbo_channel = %config.bbo_channel,
		l2_channel = %config.l2_channel,
		l2_depth = config.l2_depth,
		"starting engine runner"
	);
	let runner = EngineRunner::start(config, queue_receiver, event_producer);

	if tokio::signal::ctrl_c().await.is_err() {
		error!("failed to install ctrl_c handler, shutting down anyway");
	}

	info!("shutdown signal received, stopping runner");
	runner.stop();
	runner.join();

	ExitCode::SUCCESS
}
