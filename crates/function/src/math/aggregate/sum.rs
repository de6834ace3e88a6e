// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use async_trait::async_trait;
use strata_engine::{
	Aggregate, IterateContext, MethodInfo, ParameterInfo, Result,
};
use strata_type::{Type, Value};

/// `SUM(input)`: adds the non-null row values; null rows contribute
/// nothing, a group of only nulls sums to null.
pub struct Sum {
	info: MethodInfo,
}

impl Sum {
	pub fn new() -> Self {
		Self {
			info: MethodInfo::function("SUM", Type::Float8)
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

impl Default for Sum {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Aggregate for Sum {
	fn info(&self) -> &MethodInfo {
		&self.info
	}

	async fn iterate(&self, context: &mut IterateContext) -> Result<()> {
		let current = context.current().clone();
		let accumulated = context.accumulated().cloned();

		let result = if current.is_null() || current.is_unknown() {
			accumulated
				.unwrap_or(Value::null_of(Type::Float8))
		} else {
			match accumulated {
				Some(sum) if !sum.is_null() => {
					sum.add(&current)?
				}
				_ => current,
			}
		};

		context.set_result(result);
		Ok(())
	}
}
