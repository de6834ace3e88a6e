// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use crate::{Result, TypeError, Value};

/// Maps a logical operand to its three-valued truth: `None` is the
/// unknown row of the tables. Null operands sit in the unknown row too,
/// but any propagated result is `Unknown`, never `Null`.
fn truth(operation: &'static str, value: &Value) -> Result<Option<bool>> {
	match value {
		Value::Boolean(v) => Ok(Some(*v)),
		Value::Null(_) | Value::Unknown => Ok(None),
		other => Err(TypeError::NotBoolean {
			operation,
			found: other.get_type(),
		}),
	}
}

fn from_truth(truth: Option<bool>) -> Value {
	match truth {
		Some(v) => Value::Boolean(v),
		None => Value::Unknown,
	}
}

impl Value {
	pub fn and(&self, other: &Value) -> Result<Value> {
		let left = truth("and", self)?;
		let right = truth("and", other)?;
		Ok(from_truth(match (left, right) {
			(Some(false), _) | (_, Some(false)) => Some(false),
			(Some(true), Some(true)) => Some(true),
			_ => None,
		}))
	}

	pub fn or(&self, other: &Value) -> Result<Value> {
		let left = truth("or", self)?;
		let right = truth("or", other)?;
		Ok(from_truth(match (left, right) {
			(Some(true), _) | (_, Some(true)) => Some(true),
			(Some(false), Some(false)) => Some(false),
			_ => None,
		}))
	}

	pub fn xor(&self, other: &Value) -> Result<Value> {
		let left = truth("xor", self)?;
		let right = truth("xor", other)?;
		Ok(from_truth(match (left, right) {
			(Some(l), Some(r)) => Some(l != r),
			_ => None,
		}))
	}

	pub fn not(&self) -> Result<Value> {
		Ok(from_truth(truth("not", self)?.map(|v| !v)))
	}
}

#[cfg(test)]
mod tests {
	use crate::{TypeError, Value, value::Type};

	fn unknowns() -> [Value; 2] {
		[Value::Unknown, Value::null_of(Type::Boolean)]
	}

	#[test]
	fn and_table() {
		let t = Value::bool(true);
		let f = Value::bool(false);
		assert_eq!(t.and(&t).unwrap(), t);
		assert_eq!(t.and(&f).unwrap(), f);
		for u in unknowns() {
			// Unknown AND false = false
			assert_eq!(u.and(&f).unwrap(), f);
			assert_eq!(f.and(&u).unwrap(), f);
			assert!(u.and(&t).unwrap().is_unknown());
			assert!(t.and(&u).unwrap().is_unknown());
			assert!(u.and(&u).unwrap().is_unknown());
		}
	}

	#[test]
	fn or_table() {
		let t = Value::bool(true);
		let f = Value::bool(false);
		assert_eq!(f.or(&f).unwrap(), f);
		assert_eq!(f.or(&t).unwrap(), t);
		for u in unknowns() {
			// Unknown OR true = true
			assert_eq!(u.or(&t).unwrap(), t);
			assert_eq!(t.or(&u).unwrap(), t);
			assert!(u.or(&f).unwrap().is_unknown());
			assert!(f.or(&u).unwrap().is_unknown());
		}
	}

	#[test]
	fn xor_table() {
		let t = Value::bool(true);
		let f = Value::bool(false);
		assert_eq!(t.xor(&f).unwrap(), t);
		assert_eq!(t.xor(&t).unwrap(), f);
		for u in unknowns() {
			assert!(u.xor(&t).unwrap().is_unknown());
			assert!(f.xor(&u).unwrap().is_unknown());
		}
	}

	#[test]
	fn not_table() {
		assert_eq!(
			Value::bool(true).not().unwrap(),
			Value::bool(false)
		);
		for u in unknowns() {
			assert!(u.not().unwrap().is_unknown());
		}
	}

	#[test]
	fn null_operand_propagates_as_unknown_not_null() {
		let result = Value::null_of(Type::Boolean)
			.and(&Value::bool(true))
			.unwrap();
		assert!(result.is_unknown());
		assert!(!result.is_null());
	}

	#[test]
	fn non_boolean_operand_is_a_type_error() {
		assert!(matches!(
			Value::int8(1).and(&Value::bool(true)),
			Err(TypeError::NotBoolean { .. })
		));
	}
}
