// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use indexmap::IndexMap;
use strata_type::Value;

use super::MethodInfo;
use crate::{Context, Error, Expression, Result};

/// The immutable snapshot of a completed method call: the returned
/// expression for functions, the output parameter map for procedures.
#[derive(Debug)]
pub struct MethodResult {
	returned: Option<Expression>,
	outputs: IndexMap<String, Expression>,
}

impl MethodResult {
	pub(crate) fn new(
		returned: Option<Expression>,
		outputs: IndexMap<String, Expression>,
	) -> Self {
		Self {
			returned,
			outputs,
		}
	}

	pub fn returned(&self) -> Option<&Expression> {
		self.returned.as_ref()
	}

	pub fn has_returned(&self) -> bool {
		self.returned.is_some()
	}

	/// The returned constant value of a function call.
	pub fn returned_value(&self) -> Option<&Value> {
		self.returned.as_ref().and_then(Expression::as_constant)
	}

	pub fn output(&self, name: &str) -> Option<&Expression> {
		self.outputs.get(name)
	}

	pub fn outputs(&self) -> impl Iterator<Item = (&str, &Expression)> {
		self.outputs
			.iter()
			.map(|(name, value)| (name.as_str(), value))
	}

	/// Checks the snapshot against the declared return and output types
	/// before it is handed back to the caller.
	pub(crate) fn validate(
		&self,
		info: &MethodInfo,
		context: &Context<'_>,
	) -> Result<()> {
		if let Some(return_type) = info.return_type() {
			let returned = self.returned.as_ref().ok_or_else(
				|| Error::MissingResult {
					method: info.name().to_string(),
				},
			)?;
			let found = returned.infer_type(context)?;
			if !found.is_comparable(return_type) {
				return Err(Error::ResultTypeMismatch {
					method: info.name().to_string(),
					declared: return_type,
					found,
				});
			}
		}

		for parameter in
			info.parameters().iter().filter(|p| p.is_output())
		{
			let output = self
				.outputs
				.get(parameter.name())
				.ok_or_else(|| Error::MissingOutput {
					method: info.name().to_string(),
					name: parameter.name().to_string(),
				})?;
			let found = output.infer_type(context)?;
			if !found.is_comparable(parameter.value_type()) {
				return Err(Error::OutputTypeMismatch {
					name: parameter.name().to_string(),
					declared: parameter.value_type(),
					found,
				});
			}
		}

		Ok(())
	}
}
