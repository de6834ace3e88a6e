// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use async_trait::async_trait;
use strata_engine::{
	Method, MethodContext, MethodInfo, ParameterInfo, Result,
};
use strata_type::Type;

use super::upper::map_text;

/// `LOWER(value)`: the text with every character lowercased.
pub struct Lower {
	info: MethodInfo,
}

impl Lower {
	pub fn new() -> Self {
		Self {
			info: MethodInfo::function("LOWER", Type::Utf8)
				.unwrap()
				.with_parameter(
					ParameterInfo::new(
						"value",
						Type::Utf8,
					)
					.unwrap(),
				)
				.unwrap(),
		}
	}
}

impl Default for Lower {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Method for Lower {
	fn info(&self) -> &MethodInfo {
		&self.info
	}

	async fn execute(&self, context: &mut MethodContext<'_>) -> Result<()> {
		let result = map_text(context.value("value")?, |text| {
			text.to_lowercase()
		})?;
		context.set_result(result)
	}
}
