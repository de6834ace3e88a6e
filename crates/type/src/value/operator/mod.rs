// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

//! The binary and unary operators defined over [`Value`](super::Value).
//!
//! Every operator is a pure function of its operands. Declared-type
//! compatibility is consulted before any concrete work, and null/unknown
//! operands propagate before the operator sees a payload.

mod arith;
mod compare;
mod is;
mod logic;

use crate::{Result, TypeError, Value, value::Type};

/// Rejects operand kinds that may not interact, then routes null and
/// unknown operands: unknown wins over null, null results carry the
/// promoted declared type.
pub(crate) fn propagate(
	operation: &'static str,
	left: &Value,
	right: &Value,
) -> Result<Option<Value>> {
	let (left_type, right_type) = (left.get_type(), right.get_type());
	if !left_type.is_comparable(right_type) {
		return Err(TypeError::Incomparable {
			operation,
			left: left_type,
			right: right_type,
		});
	}
	if left.is_unknown() || right.is_unknown() {
		return Ok(Some(Value::Unknown));
	}
	if left.is_null() || right.is_null() {
		return Ok(Some(Value::Null(Type::promote(
			left_type, right_type,
		))));
	}
	Ok(None)
}
