// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use async_trait::async_trait;
use strata_engine::{
	Aggregate, IterateContext, MergeContext, MethodInfo, ParameterInfo,
	Result,
};
use strata_type::{Type, Value};

/// `AVG(input)`: accumulates the null-skipped sum, then divides by the
/// group row count in the merge phase.
pub struct Avg {
	info: MethodInfo,
}

impl Avg {
	pub fn new() -> Self {
		Self {
			info: MethodInfo::function("AVG", Type::Float8)
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

impl Default for Avg {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Aggregate for Avg {
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

	async fn merge(&self, context: &mut MergeContext) -> Result<()> {
		let sum = context.accumulated().clone();
		if sum.is_null() || sum.is_unknown() {
			// a group of only nulls averages to null
			return Ok(());
		}

		let rows = Value::float8(context.rows() as f64);
		let average = sum.divide(&rows)?;
		context.set_output(average)
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use strata_engine::{
		Context, Expression, GroupResolver, Invoke, InvokeArgument,
		Method,
	};
	use strata_testing::FixtureGroup;
	use strata_type::Value;

	use super::Avg;

	#[tokio::test]
	async fn averages_over_the_group_size() {
		let context = Context::root("test");
		let group: Arc<dyn GroupResolver> = Arc::new(
			FixtureGroup::new(["n"])
				.row([Value::int8(23)])
				.row([Value::int8(54)])
				.row([Value::int8(23)]),
		);
		context.register(group);

		let invoke = Invoke::new("AVG")
			.with_argument(InvokeArgument::positional(
				Expression::reference("n"),
			))
			.unwrap();
		let result = Avg::new()
			.execute_invoke(&context, &invoke)
			.await
			.unwrap();
		assert_eq!(
			result.returned_value(),
			Some(&Value::float8(100.0 / 3.0))
		);
	}
}
