// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use async_trait::async_trait;
use strata_engine::{
	Error, Method, MethodContext, MethodInfo, ParameterInfo, Result,
};
use strata_type::{Type, TypeError, Value};

/// `ABS(value)`: the absolute value of a number.
pub struct Abs {
	info: MethodInfo,
}

impl Abs {
	pub fn new() -> Self {
		Self {
			info: MethodInfo::function("ABS", Type::Float8)
				.unwrap()
				.with_parameter(
					ParameterInfo::new(
						"value",
						Type::Undefined,
					)
					.unwrap(),
				)
				.unwrap(),
		}
	}
}

impl Default for Abs {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Method for Abs {
	fn info(&self) -> &MethodInfo {
		&self.info
	}

	async fn execute(&self, context: &mut MethodContext<'_>) -> Result<()> {
		let value = context.value("value")?;
		let result = match &value {
			value if value.is_null() || value.is_unknown() => {
				value.clone()
			}
			Value::Int8(v) => v.checked_abs().map(Value::Int8).ok_or(
				TypeError::NumericOverflow {
					operation: "abs",
				},
			)?,
			Value::Float8(v) => Value::float8(v.value().abs()),
			other => {
				return Err(Error::Type(
					TypeError::Incomparable {
						operation: "abs",
						left: other.get_type(),
						right: other.get_type(),
					},
				));
			}
		};
		context.set_result(result)
	}
}
