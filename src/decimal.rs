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

//! Fixed-precision numerics for prices and quantities.
//!
//! Both are scaled `i64`s (8 decimal digits) so comparisons and sums are
//! exact integer operations instead of float arithmetic. The wire layer
//! (`wire` module) is the only place that talks to decimal strings.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Decimal digits of precision carried by every `FixedPoint` value.
pub const SCALE: i64 = 100_000_000;

#[derive(Debug, Error)]
pub enum ParseFixedPointError {
	#[error("empty numeric string")]
	Empty,
	#[error("invalid numeric string: {0}")]
	Invalid(String),
	#[error("too many fractional digits (max 8): {0}")]
	TooPrecise(String),
}

/// A scaled fixed-point integer. Never constructed directly by callers;
/// use [`Price`] or [`Qty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FixedPoint(i64);

impl FixedPoint {
	pub fn from_raw(raw: i64) -> Self {
		Self(raw)
	}

	pub fn raw(self) -> i64 {
		self.0
	}

	pub fn is_zero(self) -> bool {
		self.0 == 0
	}

	pub fn is_positive(self) -> bool {
		self.0 > 0
	}

	pub fn min(self, other: Self) -> Self {
		if self.0 <= other.0 { self } else { other }
	}
}

impl FromStr for FixedPoint {
	type Err = ParseFixedPointError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		if s.is_empty() {
			return Err(ParseFixedPointError::Empty);
		}

		let (sign, s) = match s.strip_prefix('-') {
			Some(rest) => (-1i64, rest),
			None => (1i64, s),
		};

		let mut parts = s.splitn(2, '.');
		let int_part = parts.next().unwrap_or("0");
		let frac_part = parts.next().unwrap_or("");

		if frac_part.len() > 8 {
			return Err(ParseFixedPointError::TooPrecise(s.to_string()));
		}
		if !int_part.chars().all(|c| c.is_ascii_digit())
			|| !frac_part.chars().all(|c| c.is_ascii_digit())
		{
			return Err(ParseFixedPointError::Invalid(s.to_string()));
		}

		let int_value: i64 = if int_part.is_empty() {
			0
		} else {
			int_part
				.parse()
				.map_err(|_| ParseFixedPointError::Invalid(s.to_string()))?
		};
		let mut frac_value: i64 = if frac_part.is_empty() {
			0
		} else {
			frac_part
				.parse()
				.map_err(|_| ParseFixedPointError::Invalid(s.to_string()))?
		};
		for _ in frac_part.len()..8 {
			frac_value *= 10;
		}

		Ok(FixedPoint(sign * (int_value * SCALE + frac_value)))
	}
}

impl fmt::Display for FixedPoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let negative = self.0 < 0;
		let magnitude = self.0.unsigned_abs();
		let int_part = magnitude / SCALE as u64;
		let frac_part = magnitude % SCALE as u64;
		if negative {
			write!(f, "-")?;
		}
		write!(f, "{int_part}.{frac_part:08}")
	}
}

impl Add for FixedPoint {
	type Output = FixedPoint;
	fn add(self, rhs: Self) -> Self::Output {
		FixedPoint(self.0 + rhs.0)
	}
}

impl Sub for FixedPoint {
	type Output = FixedPoint;
	fn sub(self, rhs: Self) -> Self::Output {
		FixedPoint(self.0 - rhs.0)
	}
}

impl Sum for FixedPoint {
	fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
		iter.fold(FixedPoint(0), |acc, x| acc + x)
	}
}

macro_rules! fixed_point_newtype {
	($name:ident) => {
		#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
		pub struct $name(pub FixedPoint);

		impl $name {
			pub fn from_raw(raw: i64) -> Self {
				Self(FixedPoint::from_raw(raw))
			}

			pub fn raw(self) -> i64 {
				self.0.raw()
			}

			pub fn is_zero(self) -> bool {
				self.0.is_zero()
			}

			pub fn is_positive(self) -> bool {
				self.0.is_positive()
			}

			pub fn min(self, other: Self) -> Self {
				Self(self.0.min(other.0))
			}
		}

		impl FromStr for $name {
			type Err = ParseFixedPointError;
			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Ok(Self(s.parse()?))
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				fmt::Display::fmt(&self.0, f)
			}
		}

		impl Add for $name {
			type Output = $name;
			fn add(self, rhs: Self) -> Self::Output {
				Self(self.0 + rhs.0)
			}
		}

		impl Sub for $name {
			type Output = $name;
			fn sub(self, rhs: Self) -> Self::Output {
				Self(self.0 - rhs.0)
			}
		}

		impl Sum for $name {
			fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
				iter.fold(Self::from_raw(0), |acc, x| acc + x)
			}
		}

		// Wire-format boundary: always a decimal string, never a JSON
		// number (which would round-trip through floats).
		impl Serialize for $name {
			fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
			where
				S: Serializer,
			{
				serializer.serialize_str(&self.to_string())
			}
		}

		impl<'de> Deserialize<'de> for $name {
			fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
			where
				D: Deserializer<'de>,
			{
				let s = String::deserialize(deserializer)?;
				s.parse().map_err(serde::de::Error::custom)
			}
		}
	};
}

fixed_point_newtype!(Price);
fixed_point_newtype!(Qty);

/// Orders a `Price` with the highest value first — the iteration order a
/// bid-side `BTreeMap` needs (best bid = highest price).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReversePrice(pub Price);

impl PartialOrd for ReversePrice {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for ReversePrice {
	fn cmp(&self, other: &Self) -> Ordering {
		other.0.cmp(&self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_and_displays_round_trip() {
		let p: Price = "60000.5".parse().unwrap();
		assert_eq!(p.to_string(), "60000.50000000");
	}

	#[test]
	fn parses_integer_without_fraction() {
		let p: Price = "100".parse().unwrap();
		assert_eq!(p.raw(), 100 * SCALE);
	}

	#[test]
	fn rejects_too_precise() {
		assert!("1.123456789".parse::<Price>().is_err());
	}

	#[test]
	fn rejects_garbage() {
		assert!("abc".parse::<Price>().is_err());
		assert!("".parse::<Price>().is_err());
	}

	#[test]
	fn reverse_price_orders_high_to_low() {
		let mut prices: Vec<ReversePrice> = vec![
			ReversePrice("10".parse().unwrap()),
			ReversePrice("30".parse().unwrap()),
			ReversePrice("20".parse().unwrap()),
		];
		prices.sort();
		assert_eq!(prices[0].0.to_string(), "30.00000000");
		assert_eq!(prices[2].0.to_string(), "10.00000000");
	}

	#[test]
	fn qty_sums_exactly() {
		let a: Qty = "0.3".parse().unwrap();
		let b: Qty = "0.7".parse().unwrap();
		assert_eq!((a + b).to_string(), "1.00000000");
	}
}
