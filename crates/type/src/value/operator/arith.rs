// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use super::propagate;
use crate::{
	Result, TypeError, Value,
	value::{Interval, OrderedF64, temporal::NANOS_PER_DAY},
};

impl Value {
	pub fn add(&self, other: &Value) -> Result<Value> {
		if let Some(value) = propagate("add", self, other)? {
			return Ok(value);
		}
		match (self, other) {
			(Value::Int8(l), Value::Int8(r)) => l
				.checked_add(*r)
				.map(Value::Int8)
				.ok_or(TypeError::NumericOverflow {
					operation: "add",
				}),
			(l, r) if both_numeric(l, r) => {
				float_op(l, r, |l, r| l + r)
			}
			(Value::Utf8(l), Value::Utf8(r)) => {
				Ok(Value::Utf8(l.concat(r)?))
			}
			(Value::Blob(l), Value::Blob(r)) => {
				Ok(Value::Blob(l.concat(r)?))
			}
			(Value::Interval(l), Value::Interval(r)) => l
				.nanos()
				.checked_add(r.nanos())
				.map(|n| Value::Interval(Interval::from_nanos(n)))
				.ok_or(TypeError::NumericOverflow {
					operation: "add",
				}),
			(l, r) => Err(TypeError::Incomparable {
				operation: "add",
				left: l.get_type(),
				right: r.get_type(),
			}),
		}
	}

	pub fn subtract(&self, other: &Value) -> Result<Value> {
		if let Some(value) = propagate("subtract", self, other)? {
			return Ok(value);
		}
		match (self, other) {
			(Value::Int8(l), Value::Int8(r)) => l
				.checked_sub(*r)
				.map(Value::Int8)
				.ok_or(TypeError::NumericOverflow {
					operation: "subtract",
				}),
			(l, r) if both_numeric(l, r) => {
				float_op(l, r, |l, r| l - r)
			}
			(Value::Interval(l), Value::Interval(r)) => l
				.nanos()
				.checked_sub(r.nanos())
				.map(|n| Value::Interval(Interval::from_nanos(n)))
				.ok_or(TypeError::NumericOverflow {
					operation: "subtract",
				}),
			(Value::Time(l), Value::Time(r)) => {
				Ok(Value::Interval(Interval::from_nanos(
					l.nanos() - r.nanos(),
				)))
			}
			(l, r) if both_dateish(l, r) => {
				elapsed("subtract", l, r)
			}
			(l, r) => Err(TypeError::Incomparable {
				operation: "subtract",
				left: l.get_type(),
				right: r.get_type(),
			}),
		}
	}

	pub fn multiply(&self, other: &Value) -> Result<Value> {
		if let Some(value) = propagate("multiply", self, other)? {
			return Ok(value);
		}
		match (self, other) {
			(Value::Int8(l), Value::Int8(r)) => l
				.checked_mul(*r)
				.map(Value::Int8)
				.ok_or(TypeError::NumericOverflow {
					operation: "multiply",
				}),
			(l, r) if both_numeric(l, r) => {
				float_op(l, r, |l, r| l * r)
			}
			(l, r) => Err(TypeError::Incomparable {
				operation: "multiply",
				left: l.get_type(),
				right: r.get_type(),
			}),
		}
	}

	pub fn divide(&self, other: &Value) -> Result<Value> {
		if let Some(value) = propagate("divide", self, other)? {
			return Ok(value);
		}
		match (self, other) {
			(Value::Int8(l), Value::Int8(r)) => {
				if *r == 0 {
					return Err(TypeError::DivisionByZero);
				}
				l.checked_div(*r).map(Value::Int8).ok_or(
					TypeError::NumericOverflow {
						operation: "divide",
					},
				)
			}
			(l, r) if both_numeric(l, r) => {
				if as_float(r) == 0.0 {
					return Err(TypeError::DivisionByZero);
				}
				float_op(l, r, |l, r| l / r)
			}
			(l, r) => Err(TypeError::Incomparable {
				operation: "divide",
				left: l.get_type(),
				right: r.get_type(),
			}),
		}
	}

	pub fn modulo(&self, other: &Value) -> Result<Value> {
		if let Some(value) = propagate("modulo", self, other)? {
			return Ok(value);
		}
		match (self, other) {
			(Value::Int8(l), Value::Int8(r)) => {
				if *r == 0 {
					return Err(TypeError::DivisionByZero);
				}
				l.checked_rem(*r).map(Value::Int8).ok_or(
					TypeError::NumericOverflow {
						operation: "modulo",
					},
				)
			}
			(l, r) if both_numeric(l, r) => {
				if as_float(r) == 0.0 {
					return Err(TypeError::DivisionByZero);
				}
				float_op(l, r, |l, r| l % r)
			}
			(l, r) => Err(TypeError::Incomparable {
				operation: "modulo",
				left: l.get_type(),
				right: r.get_type(),
			}),
		}
	}

	pub fn negate(&self) -> Result<Value> {
		match self {
			Value::Unknown => Ok(Value::Unknown),
			Value::Null(t) => Ok(Value::Null(*t)),
			Value::Int8(v) => v.checked_neg().map(Value::Int8).ok_or(
				TypeError::NumericOverflow {
					operation: "negate",
				},
			),
			Value::Float8(v) => {
				Ok(Value::float8(-v.value()))
			}
			Value::Interval(v) => {
				Ok(Value::Interval(Interval::from_nanos(
					-v.nanos(),
				)))
			}
			other => Err(TypeError::Incomparable {
				operation: "negate",
				left: other.get_type(),
				right: other.get_type(),
			}),
		}
	}
}

fn both_numeric(left: &Value, right: &Value) -> bool {
	left.get_type().is_number() && right.get_type().is_number()
}

fn both_dateish(left: &Value, right: &Value) -> bool {
	matches!(left, Value::Date(_) | Value::DateTime(_))
		&& matches!(right, Value::Date(_) | Value::DateTime(_))
}

fn as_float(value: &Value) -> f64 {
	match value {
		Value::Int8(v) => *v as f64,
		Value::Float8(v) => v.value(),
		_ => unreachable!("caller checked numeric kinds"),
	}
}

fn float_op(
	left: &Value,
	right: &Value,
	apply: fn(f64, f64) -> f64,
) -> Result<Value> {
	let result = apply(as_float(left), as_float(right));
	OrderedF64::try_from(result)
		.map(Value::Float8)
		.map_err(|_| TypeError::NotFinite)
}

fn elapsed(
	operation: &'static str,
	left: &Value,
	right: &Value,
) -> Result<Value> {
	let nanos_of = |value: &Value| match value {
		Value::Date(date) => {
			(date.days() as i64).checked_mul(NANOS_PER_DAY)
		}
		Value::DateTime(datetime) => Some(datetime.nanos()),
		_ => unreachable!("caller checked temporal kinds"),
	};
	let (left, right) = match (nanos_of(left), nanos_of(right)) {
		(Some(l), Some(r)) => (l, r),
		_ => {
			return Err(TypeError::NumericOverflow {
				operation,
			});
		}
	};
	left.checked_sub(right)
		.map(|n| Value::Interval(Interval::from_nanos(n)))
		.ok_or(TypeError::NumericOverflow {
			operation,
		})
}

#[cfg(test)]
mod tests {
	use crate::{TypeError, Value, value::{Date, Interval, Type}};

	#[test]
	fn add_integers() {
		let result = Value::int8(23).add(&Value::int8(54)).unwrap();
		assert_eq!(result, Value::int8(77));
	}

	#[test]
	fn add_promotes_to_float() {
		let result = Value::int8(1).add(&Value::float8(0.5)).unwrap();
		assert_eq!(result, Value::float8(1.5));
	}

	#[test]
	fn add_null_propagates_with_promoted_type() {
		let result = Value::int8(1)
			.add(&Value::null_of(Type::Float8))
			.unwrap();
		assert_eq!(result.get_type(), Type::Float8);
		assert!(result.is_null());
	}

	#[test]
	fn add_unknown_propagates_as_unknown() {
		let result =
			Value::int8(1).add(&Value::Unknown).unwrap();
		assert!(result.is_unknown());
	}

	#[test]
	fn add_concatenates_text() {
		let result = Value::utf8("ab").add(&Value::utf8("cd")).unwrap();
		assert_eq!(result, Value::utf8("abcd"));
	}

	#[test]
	fn add_incompatible_kinds_is_type_error() {
		let result = Value::int8(1).add(&Value::utf8("a"));
		assert!(matches!(
			result,
			Err(TypeError::Incomparable { .. })
		));
	}

	#[test]
	fn divide_by_zero() {
		assert!(matches!(
			Value::int8(1).divide(&Value::int8(0)),
			Err(TypeError::DivisionByZero)
		));
		assert!(matches!(
			Value::float8(1.0).divide(&Value::float8(0.0)),
			Err(TypeError::DivisionByZero)
		));
	}

	#[test]
	fn integer_overflow_is_an_error() {
		assert!(matches!(
			Value::int8(i64::MAX).add(&Value::int8(1)),
			Err(TypeError::NumericOverflow { .. })
		));
	}

	#[test]
	fn modulo() {
		let result = Value::int8(10).modulo(&Value::int8(3)).unwrap();
		assert_eq!(result, Value::int8(1));
	}

	#[test]
	fn date_difference_is_an_interval() {
		let later = Value::date(Date::from_ymd(2017, 2, 11));
		let earlier = Value::date(Date::from_ymd(2017, 2, 10));
		let result = later.subtract(&earlier).unwrap();
		assert_eq!(
			result,
			Value::interval(Interval::from_seconds(86_400))
		);
	}

	#[test]
	fn negate() {
		assert_eq!(
			Value::int8(5).negate().unwrap(),
			Value::int8(-5)
		);
		assert!(Value::null_of(Type::Int8)
			.negate()
			.unwrap()
			.is_null());
	}
}
