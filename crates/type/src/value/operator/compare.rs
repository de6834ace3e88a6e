// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use std::cmp::Ordering;

use super::propagate;
use crate::{Result, TypeError, Value};

impl Value {
	/// Orders two values of mutually comparable kinds. Null and unknown
	/// markers have no position in an ordering.
	pub fn compare(&self, other: &Value) -> Result<Ordering> {
		let unordered = || TypeError::Unordered {
			left: self.get_type(),
			right: other.get_type(),
		};
		match (self, other) {
			(Value::Boolean(l), Value::Boolean(r)) => Ok(l.cmp(r)),
			(Value::Int8(l), Value::Int8(r)) => Ok(l.cmp(r)),
			(Value::Float8(l), Value::Float8(r)) => Ok(l.cmp(r)),
			(Value::Int8(l), Value::Float8(r)) => (*l as f64)
				.partial_cmp(&r.value())
				.ok_or_else(unordered),
			(Value::Float8(l), Value::Int8(r)) => l
				.value()
				.partial_cmp(&(*r as f64))
				.ok_or_else(unordered),
			(Value::Utf8(l), Value::Utf8(r)) => l.compare(r),
			(Value::Blob(l), Value::Blob(r)) => l.compare(r),
			(Value::Date(l), Value::Date(r)) => Ok(l.cmp(r)),
			(Value::DateTime(l), Value::DateTime(r)) => Ok(l.cmp(r)),
			(Value::Date(l), Value::DateTime(r)) => {
				Ok(l.at_midnight().cmp(r))
			}
			(Value::DateTime(l), Value::Date(r)) => {
				Ok(l.cmp(&r.at_midnight()))
			}
			(Value::Time(l), Value::Time(r)) => Ok(l.cmp(r)),
			(Value::Interval(l), Value::Interval(r)) => Ok(l.cmp(r)),
			_ => Err(unordered()),
		}
	}

	pub fn greater_than(&self, other: &Value) -> Result<Value> {
		self.ordering_op("greater_than", other, Ordering::is_gt)
	}

	pub fn greater_than_or_equal(&self, other: &Value) -> Result<Value> {
		self.ordering_op("greater_than_or_equal", other, Ordering::is_ge)
	}

	pub fn less_than(&self, other: &Value) -> Result<Value> {
		self.ordering_op("less_than", other, Ordering::is_lt)
	}

	pub fn less_than_or_equal(&self, other: &Value) -> Result<Value> {
		self.ordering_op("less_than_or_equal", other, Ordering::is_le)
	}

	/// Three-valued equality: equal nulls are equal to each other, a
	/// null against a concrete value is unknown.
	pub fn equal(&self, other: &Value) -> Result<Value> {
		if let Some(value) = three_valued_identity(
			"equal", self, other, true,
		)? {
			return Ok(value);
		}
		Ok(Value::Boolean(self.compare(other)? == Ordering::Equal))
	}

	pub fn not_equal(&self, other: &Value) -> Result<Value> {
		if let Some(value) = three_valued_identity(
			"not_equal", self, other, false,
		)? {
			return Ok(value);
		}
		Ok(Value::Boolean(self.compare(other)? != Ordering::Equal))
	}

	fn ordering_op(
		&self,
		operation: &'static str,
		other: &Value,
		test: fn(Ordering) -> bool,
	) -> Result<Value> {
		if let Some(value) = propagate(operation, self, other)? {
			// a missing operand makes the comparison unknown
			return Ok(match value {
				Value::Null(_) => Value::Unknown,
				value => value,
			});
		}
		Ok(Value::Boolean(test(self.compare(other)?)))
	}
}

/// The shared null/unknown table for `equal` and `not_equal`: two markers
/// of the same family compare as identical, a marker against a concrete
/// value is unknown.
fn three_valued_identity(
	operation: &'static str,
	left: &Value,
	right: &Value,
	identical: bool,
) -> Result<Option<Value>> {
	let left_type = left.get_type();
	let right_type = right.get_type();
	if !left_type.is_comparable(right_type) {
		return Err(TypeError::Incomparable {
			operation,
			left: left_type,
			right: right_type,
		});
	}
	Ok(match (left, right) {
		(Value::Null(_), Value::Null(_)) => {
			Some(Value::Boolean(identical))
		}
		(Value::Unknown, Value::Unknown) => {
			Some(Value::Boolean(identical))
		}
		(l, r) if l.is_null()
			|| r.is_null()
			|| l.is_unknown()
			|| r.is_unknown() =>
		{
			Some(Value::Unknown)
		}
		_ => None,
	})
}
