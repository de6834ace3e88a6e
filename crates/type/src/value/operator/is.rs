// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use crate::{Result, Value};

impl Value {
	/// Identity test. Unlike [`Value::equal`] this never propagates a
	/// missing operand: `NULL IS NULL` is true, `NULL IS 1` is false.
	pub fn is(&self, other: &Value) -> Result<Value> {
		Ok(Value::Boolean(self == other))
	}

	pub fn is_not(&self, other: &Value) -> Result<Value> {
		Ok(Value::Boolean(self != other))
	}
}
