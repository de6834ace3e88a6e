// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use async_trait::async_trait;
use strata_engine::{
	Aggregate, IterateContext, MethodInfo, ParameterInfo, Result,
};
use strata_type::{Type, Value};

/// `COUNT(input)`: the number of rows whose value is neither null nor
/// unknown.
pub struct Count {
	info: MethodInfo,
}

impl Count {
	pub fn new() -> Self {
		Self {
			info: MethodInfo::function("COUNT", Type::Int8)
				.unwrap()
				.with_parameter(
					ParameterInfo::new(
						"input",
						Type::Undefined,
					)
					.unwrap(),
				)
				.unwrap(),
		}
	}
}

impl Default for Count {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Aggregate for Count {
	fn info(&self) -> &MethodInfo {
		&self.info
	}

	async fn iterate(&self, context: &mut IterateContext) -> Result<()> {
		let counted = context
			.accumulated()
			.cloned()
			.unwrap_or(Value::int8(0));
		let current = context.current();

		let result = if current.is_null() || current.is_unknown() {
			counted
		} else {
			counted.add(&Value::int8(1))?
		};
		context.set_result(result);
		Ok(())
	}
}
