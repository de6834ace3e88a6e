// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use std::cmp::Ordering;

use async_trait::async_trait;
use strata_engine::{
	Aggregate, IterateContext, MethodInfo, ParameterInfo, Result,
};
use strata_type::{Type, Value};

/// `MIN(input)`: the smallest non-null value of the group, over any
/// mutually comparable kind.
pub struct Min {
	info: MethodInfo,
}

impl Min {
	pub fn new() -> Self {
		Self {
			info: MethodInfo::function("MIN", Type::Undefined)
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

impl Default for Min {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Aggregate for Min {
	fn info(&self) -> &MethodInfo {
		&self.info
	}

	async fn iterate(&self, context: &mut IterateContext) -> Result<()> {
		context.set_result(keep_extreme(
			context.accumulated().cloned(),
			context.current().clone(),
			Ordering::Less,
		)?);
		Ok(())
	}
}

/// Shared by [`Min`] and [`super::Max`]: keeps whichever of the running
/// value and the current row compares on the wanted side.
pub(crate) fn keep_extreme(
	accumulated: Option<Value>,
	current: Value,
	wanted: Ordering,
) -> Result<Value> {
	if current.is_null() || current.is_unknown() {
		return Ok(accumulated
			.unwrap_or(Value::null_of(Type::Undefined)));
	}
	match accumulated {
		Some(best) if !best.is_null() && !best.is_unknown() => {
			if current.compare(&best)? == wanted {
				Ok(current)
			} else {
				Ok(best)
			}
		}
		_ => Ok(current),
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
	use strata_type::{Type, Value};

	use super::Min;

	#[tokio::test]
	async fn minimum_skips_nulls() {
		let context = Context::root("test");
		let group: Arc<dyn GroupResolver> = Arc::new(
			FixtureGroup::new(["n"])
				.row([Value::int8(54)])
				.row([Value::null_of(Type::Int8)])
				.row([Value::int8(23)]),
		);
		context.register(group);

		let invoke = Invoke::new("MIN")
			.with_argument(InvokeArgument::positional(
				Expression::reference("n"),
			))
			.unwrap();
		let result = Min::new()
			.execute_invoke(&context, &invoke)
			.await
			.unwrap();
		assert_eq!(result.returned_value(), Some(&Value::int8(23)));
	}

	#[tokio::test]
	async fn minimum_orders_text() {
		let context = Context::root("test");
		let group: Arc<dyn GroupResolver> = Arc::new(
			FixtureGroup::new(["s"])
				.row([Value::utf8("pear")])
				.row([Value::utf8("apple")]),
		);
		context.register(group);

		let invoke = Invoke::new("MIN")
			.with_argument(InvokeArgument::positional(
				Expression::reference("s"),
			))
			.unwrap();
		let result = Min::new()
			.execute_invoke(&context, &invoke)
			.await
			.unwrap();
		assert_eq!(
			result.returned_value(),
			Some(&Value::utf8("apple"))
		);
	}
}
