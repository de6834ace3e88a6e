// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use std::cmp::Ordering;

use async_trait::async_trait;
use strata_engine::{
	Aggregate, IterateContext, MethodInfo, ParameterInfo, Result,
};
use strata_type::Type;

use super::min::keep_extreme;

/// `MAX(input)`: the largest non-null value of the group.
pub struct Max {
	info: MethodInfo,
}

impl Max {
	pub fn new() -> Self {
		Self {
			info: MethodInfo::function("MAX", Type::Undefined)
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

impl Default for Max {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Aggregate for Max {
	fn info(&self) -> &MethodInfo {
		&self.info
	}

	async fn iterate(&self, context: &mut IterateContext) -> Result<()> {
		context.set_result(keep_extreme(
			context.accumulated().cloned(),
			context.current().clone(),
			Ordering::Greater,
		)?);
		Ok(())
	}
}
