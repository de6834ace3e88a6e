// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use std::{
	fmt::{Display, Formatter},
	hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

mod blob;
mod bytes;
pub mod operator;
mod ordered;
mod temporal;
mod text;
mod r#type;

pub use blob::Blob;
pub use bytes::ByteSource;
pub use ordered::OrderedF64;
pub use temporal::{Date, DateTime, Interval, Time};
pub use text::Text;
pub use r#type::Type;

/// A SQL scalar value.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Value {
	/// The SQL NULL marker, carrying the declared type it stands in for.
	Null(Type),
	/// The three-valued unknown truth value.
	Unknown,
	/// A boolean: true or false.
	Boolean(bool),
	/// An 8-byte signed integer
	Int8(i64),
	/// An 8-byte floating point
	Float8(OrderedF64),
	/// A UTF-8 encoded text
	Utf8(Text),
	/// A binary large object
	Blob(Blob),
	/// A date value (year, month, day)
	Date(Date),
	/// A date and time value with nanosecond precision in UTC
	DateTime(DateTime),
	/// A time value within a day
	Time(Time),
	/// An interval representing a duration
	Interval(Interval),
}

impl Value {
	pub fn null_of(value_type: Type) -> Self {
		Value::Null(value_type)
	}

	pub fn bool(v: impl Into<bool>) -> Self {
		Value::Boolean(v.into())
	}

	pub fn int8(v: impl Into<i64>) -> Self {
		Value::Int8(v.into())
	}

	pub fn float8(v: impl Into<f64>) -> Self {
		OrderedF64::try_from(v.into())
			.map(Value::Float8)
			.unwrap_or(Value::Unknown)
	}

	pub fn utf8(v: impl Into<Text>) -> Self {
		Value::Utf8(v.into())
	}

	pub fn blob(v: impl Into<Blob>) -> Self {
		Value::Blob(v.into())
	}

	pub fn date(v: impl Into<Date>) -> Self {
		Value::Date(v.into())
	}

	pub fn datetime(v: impl Into<DateTime>) -> Self {
		Value::DateTime(v.into())
	}

	pub fn time(v: impl Into<Time>) -> Self {
		Value::Time(v.into())
	}

	pub fn interval(v: impl Into<Interval>) -> Self {
		Value::Interval(v.into())
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null(_))
	}

	pub fn is_unknown(&self) -> bool {
		matches!(self, Value::Unknown)
	}

	pub fn is_true(&self) -> bool {
		matches!(self, Value::Boolean(true))
	}

	pub fn is_false(&self) -> bool {
		matches!(self, Value::Boolean(false))
	}

	pub fn get_type(&self) -> Type {
		match self {
			Value::Null(value_type) => *value_type,
			Value::Unknown => Type::Undefined,
			Value::Boolean(_) => Type::Boolean,
			Value::Int8(_) => Type::Int8,
			Value::Float8(_) => Type::Float8,
			Value::Utf8(_) => Type::Utf8,
			Value::Blob(_) => Type::Blob,
			Value::Date(_) => Type::Date,
			Value::DateTime(_) => Type::DateTime,
			Value::Time(_) => Type::Time,
			Value::Interval(_) => Type::Interval,
		}
	}
}

impl PartialEq for Value {
	/// Structural equality. Two null markers are equal regardless of the
	/// declared type they carry; a null is never equal to a concrete
	/// value.
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::Null(_), Value::Null(_)) => true,
			(Value::Unknown, Value::Unknown) => true,
			(Value::Boolean(l), Value::Boolean(r)) => l == r,
			(Value::Int8(l), Value::Int8(r)) => l == r,
			(Value::Float8(l), Value::Float8(r)) => l == r,
			(Value::Utf8(l), Value::Utf8(r)) => l == r,
			(Value::Blob(l), Value::Blob(r)) => l == r,
			(Value::Date(l), Value::Date(r)) => l == r,
			(Value::DateTime(l), Value::DateTime(r)) => l == r,
			(Value::Time(l), Value::Time(r)) => l == r,
			(Value::Interval(l), Value::Interval(r)) => l == r,
			_ => false,
		}
	}
}

impl Eq for Value {}

impl Hash for Value {
	fn hash<H: Hasher>(&self, state: &mut H) {
		std::mem::discriminant(self).hash(state);
		match self {
			// all nulls are equal, so they all hash the same
			Value::Null(_) => {}
			Value::Unknown => {}
			Value::Boolean(v) => v.hash(state),
			Value::Int8(v) => v.hash(state),
			Value::Float8(v) => v.hash(state),
			Value::Utf8(v) => v.hash(state),
			Value::Blob(v) => v.hash(state),
			Value::Date(v) => v.hash(state),
			Value::DateTime(v) => v.hash(state),
			Value::Time(v) => v.hash(state),
			Value::Interval(v) => v.hash(state),
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Null(_) => f.write_str("NULL"),
			Value::Unknown => f.write_str("UNKNOWN"),
			Value::Boolean(true) => f.write_str("TRUE"),
			Value::Boolean(false) => f.write_str("FALSE"),
			Value::Int8(value) => Display::fmt(value, f),
			Value::Float8(value) => Display::fmt(value, f),
			Value::Utf8(value) => write!(f, "'{}'", value),
			Value::Blob(value) => Display::fmt(value, f),
			Value::Date(value) => Display::fmt(value, f),
			Value::DateTime(value) => Display::fmt(value, f),
			Value::Time(value) => Display::fmt(value, f),
			Value::Interval(value) => Display::fmt(value, f),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{Type, Value};

	#[test]
	fn null_equals_null_across_declared_types() {
		assert_eq!(
			Value::null_of(Type::Int8),
			Value::null_of(Type::Utf8)
		);
	}

	#[test]
	fn null_never_equals_concrete() {
		assert_ne!(Value::null_of(Type::Int8), Value::int8(0));
		assert_ne!(Value::null_of(Type::Boolean), Value::bool(false));
	}

	#[test]
	fn null_and_unknown_are_distinct() {
		assert_ne!(Value::null_of(Type::Boolean), Value::Unknown);
		assert!(Value::null_of(Type::Boolean).is_null());
		assert!(!Value::null_of(Type::Boolean).is_unknown());
		assert!(Value::Unknown.is_unknown());
		assert!(!Value::Unknown.is_null());
	}

	#[test]
	fn null_keeps_declared_type() {
		assert_eq!(
			Value::null_of(Type::Int8).get_type(),
			Type::Int8
		);
		assert_eq!(Value::Unknown.get_type(), Type::Undefined);
	}

	#[test]
	fn display() {
		assert_eq!(format!("{}", Value::int8(42)), "42");
		assert_eq!(format!("{}", Value::utf8("a")), "'a'");
		assert_eq!(format!("{}", Value::null_of(Type::Int8)), "NULL");
	}
}
