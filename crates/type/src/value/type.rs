// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// The declared type of a value or of an expression result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
	/// The type of an expression whose value is not determinable,
	/// e.g. an unresolved reference.
	Undefined,
	Boolean,
	/// An 8-byte signed integer
	Int8,
	/// An 8-byte floating point
	Float8,
	/// A UTF-8 encoded text
	Utf8,
	/// A binary large object
	Blob,
	/// A date value (year, month, day)
	Date,
	/// A date and time value with nanosecond precision in UTC
	DateTime,
	/// A time value within a day
	Time,
	/// An interval representing a duration
	Interval,
}

impl Type {
	pub fn is_number(&self) -> bool {
		matches!(self, Type::Int8 | Type::Float8)
	}

	pub fn is_temporal(&self) -> bool {
		matches!(
			self,
			Type::Date | Type::DateTime | Type::Time | Type::Interval
		)
	}

	/// The sole authority for whether two typed expressions or values may
	/// interact in a binary operator, a condition branch merge or an
	/// assignment.
	pub fn is_comparable(&self, other: Type) -> bool {
		if *self == other {
			return true;
		}
		match (*self, other) {
			(Type::Undefined, _) | (_, Type::Undefined) => true,
			(l, r) if l.is_number() && r.is_number() => true,
			(Type::Date, Type::DateTime)
			| (Type::DateTime, Type::Date) => true,
			_ => false,
		}
	}

	/// The common type two numeric operands widen to.
	pub fn promote(left: Type, right: Type) -> Type {
		match (left, right) {
			(Type::Undefined, r) => r,
			(l, Type::Undefined) => l,
			(Type::Float8, _) | (_, Type::Float8) => Type::Float8,
			(l, _) => l,
		}
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Type::Undefined => f.write_str("UNDEFINED"),
			Type::Boolean => f.write_str("BOOLEAN"),
			Type::Int8 => f.write_str("INT8"),
			Type::Float8 => f.write_str("FLOAT8"),
			Type::Utf8 => f.write_str("UTF8"),
			Type::Blob => f.write_str("BLOB"),
			Type::Date => f.write_str("DATE"),
			Type::DateTime => f.write_str("DATETIME"),
			Type::Time => f.write_str("TIME"),
			Type::Interval => f.write_str("INTERVAL"),
		}
	}
}
