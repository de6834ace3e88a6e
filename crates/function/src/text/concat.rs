// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use async_trait::async_trait;
use strata_engine::{
	Method, MethodContext, MethodInfo, ParameterInfo, Result,
};
use strata_type::Type;

/// `CONCAT(left, right)`: text concatenation through the value model,
/// so streamed operands copy through bounded buffers.
pub struct Concat {
	info: MethodInfo,
}

impl Concat {
	pub fn new() -> Self {
		Self {
			info: MethodInfo::function("CONCAT", Type::Utf8)
				.unwrap()
				.with_parameter(
					ParameterInfo::new(
						"left",
						Type::Utf8,
					)
					.unwrap(),
				)
				.unwrap()
				.with_parameter(
					ParameterInfo::new(
						"right",
						Type::Utf8,
					)
					.unwrap(),
				)
				.unwrap(),
		}
	}
}

impl Default for Concat {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Method for Concat {
	fn info(&self) -> &MethodInfo {
		&self.info
	}

	async fn execute(&self, context: &mut MethodContext<'_>) -> Result<()> {
		let left = context.value("left")?;
		let right = context.value("right")?;
		context.set_result(left.add(&right)?)
	}
}

#[cfg(test)]
mod tests {
	use strata_engine::{
		Context, Expression, Invoke, InvokeArgument, Method,
	};
	use strata_type::{Type, Value};

	use super::Concat;

	fn invoke(left: Value, right: Value) -> Invoke {
		Invoke::new("CONCAT")
			.with_argument(InvokeArgument::positional(
				Expression::constant(left),
			))
			.unwrap()
			.with_argument(InvokeArgument::positional(
				Expression::constant(right),
			))
			.unwrap()
	}

	#[tokio::test]
	async fn concatenates() {
		let context = Context::root("test");
		let result = Concat::new()
			.execute_invoke(
				&context,
				&invoke(
					Value::utf8("str"),
					Value::utf8("ata"),
				),
			)
			.await
			.unwrap();
		assert_eq!(
			result.returned_value(),
			Some(&Value::utf8("strata"))
		);
	}

	#[tokio::test]
	async fn null_operand_yields_typed_null() {
		let context = Context::root("test");
		let result = Concat::new()
			.execute_invoke(
				&context,
				&invoke(
					Value::utf8("str"),
					Value::null_of(Type::Utf8),
				),
			)
			.await
			.unwrap();
		let value = result.returned_value().unwrap();
		assert!(value.is_null());
		assert_eq!(value.get_type(), Type::Utf8);
	}
}
