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

use thiserror::Error;

use crate::types::OrderId;

/// Errors the order book reports via return value rather than raising.
///
/// Per the book's failure contract, `DuplicateOrderId` is the only hard
/// error — it indicates a caller bug (the ingress collaborator failed to
/// deduplicate before handing the order to the engine).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookError {
	#[error("duplicate order id: {0}")]
	DuplicateOrderId(OrderId),
}

/// Errors surfaced by [`crate::matching::MatchingEngine::process`].
///
/// Matching handlers never raise on empty-book or no-match conditions;
/// these variants cover only precondition violations and duplicate ids,
/// which the runner logs and skips past rather than treating as fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchingError {
	#[error("invalid order {0}: {1}")]
	InvalidOrder(OrderId, String),
	#[error("duplicate order id: {0}")]
	DuplicateOrderId(OrderId),
}

impl From<BookError> for MatchingError {
	fn from(err: BookError) -> Self {
		match err {
			BookError::DuplicateOrderId(id) => MatchingError::DuplicateOrderId(id),
		}
	}
}
