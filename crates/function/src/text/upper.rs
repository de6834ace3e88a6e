// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use async_trait::async_trait;
use strata_engine::{
	Error, Method, MethodContext, MethodInfo, ParameterInfo, Result,
};
use strata_type::{Type, TypeError, Value};

/// `UPPER(value)`: the text with every character uppercased.
pub struct Upper {
	info: MethodInfo,
}

impl Upper {
	pub fn new() -> Self {
		Self {
			info: MethodInfo::function("UPPER", Type::Utf8)
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

impl Default for Upper {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Method for Upper {
	fn info(&self) -> &MethodInfo {
		&self.info
	}

	async fn execute(&self, context: &mut MethodContext<'_>) -> Result<()> {
		let result = map_text(context.value("value")?, |text| {
			text.to_uppercase()
		})?;
		context.set_result(result)
	}
}

/// Shared by the text scalars: null passes through, anything non-text
/// is a type error.
pub(crate) fn map_text(
	value: Value,
	apply: fn(&str) -> String,
) -> Result<Value> {
	match &value {
		value if value.is_null() || value.is_unknown() => {
			Ok(value.clone())
		}
		Value::Utf8(text) => {
			let materialized = text.materialize()?;
			Ok(Value::utf8(apply(&materialized)))
		}
		other => Err(Error::Type(TypeError::Incomparable {
			operation: "text function",
			left: other.get_type(),
			right: Type::Utf8,
		})),
	}
}
