// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

//! Named, typed storage cells resolved through the context chain.

use std::{collections::HashMap, sync::RwLock};

use strata_type::Type;

use crate::{Context, Error, Expression, Result};

const INVALID_NAME_CHARS: &[char] =
	&[' ', '$', '.', '|', '\\', ':', '/', '#', '\''];

pub fn is_valid_name(name: &str) -> bool {
	!name.is_empty() && !name.contains(INVALID_NAME_CHARS)
}

#[derive(Clone, Debug)]
pub struct VariableInfo {
	name: String,
	value_type: Type,
	constant: bool,
	default_value: Option<Expression>,
}

impl VariableInfo {
	pub fn new(name: impl Into<String>, value_type: Type) -> Result<Self> {
		let name = name.into();
		if !is_valid_name(&name) {
			return Err(Error::InvalidName {
				name,
			});
		}
		Ok(Self {
			name,
			value_type,
			constant: false,
			default_value: None,
		})
	}

	pub fn constant(mut self) -> Self {
		self.constant = true;
		self
	}

	pub fn with_default(mut self, default_value: Expression) -> Self {
		self.default_value = Some(default_value);
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn value_type(&self) -> Type {
		self.value_type
	}

	pub fn is_constant(&self) -> bool {
		self.constant
	}

	pub fn default_value(&self) -> Option<&Expression> {
		self.default_value.as_ref()
	}
}

/// A declared variable holding at most one unreduced expression.
#[derive(Clone, Debug)]
pub struct Variable {
	info: VariableInfo,
	value: Option<Expression>,
}

impl Variable {
	pub fn new(info: VariableInfo) -> Self {
		Self {
			info,
			value: None,
		}
	}

	pub fn info(&self) -> &VariableInfo {
		&self.info
	}

	pub fn name(&self) -> &str {
		self.info.name()
	}

	pub fn value(&self) -> Option<&Expression> {
		self.value.as_ref()
	}

	/// Assigns a new value. Constant-ness and type compatibility are
	/// checked here, never deferred to evaluation.
	pub fn set_value(
		&mut self,
		value: Expression,
		context: &Context<'_>,
	) -> Result<()> {
		if self.info.constant {
			return Err(Error::ConstantVariable {
				name: self.info.name.clone(),
			});
		}

		let found = value.infer_type(context)?;
		if !found.is_comparable(self.info.value_type) {
			return Err(Error::AssignmentTypeMismatch {
				name: self.info.name.clone(),
				declared: self.info.value_type,
				found,
			});
		}

		self.value = Some(value);
		Ok(())
	}

	/// The expression evaluation works from: the current value if set,
	/// else the declared default.
	pub fn current_expression(&self) -> Option<&Expression> {
		self.value.as_ref().or(self.info.default_value.as_ref())
	}

	pub fn evaluate(&self, context: &Context<'_>) -> Result<Expression> {
		let expression =
			self.current_expression().ok_or_else(|| {
				Error::VariableNotSet {
					name: self.info.name.clone(),
				}
			})?;
		expression.reduce(context)
	}
}

/// Resolves variables by name during expression reduction.
pub trait VariableResolver: Send + Sync {
	fn resolve_variable(
		&self,
		name: &str,
		ignore_case: bool,
	) -> Option<Variable>;
}

/// A resolver that also accepts assignments.
pub trait VariableManager: VariableResolver {
	/// Assigns `value` to the named variable, declaring it when absent,
	/// and returns the expression the variable now holds.
	fn assign_variable(
		&self,
		name: &str,
		value: Expression,
		context: &Context<'_>,
	) -> Result<Expression>;
}

/// The in-memory variable store.
#[derive(Default)]
pub struct Variables {
	inner: RwLock<HashMap<String, Variable>>,
}

impl Variables {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn declare(&self, info: VariableInfo) -> Result<()> {
		let mut inner = self.inner.write().unwrap();
		if inner.contains_key(info.name()) {
			return Err(Error::DuplicateVariable {
				name: info.name().to_string(),
			});
		}
		inner.insert(info.name().to_string(), Variable::new(info));
		Ok(())
	}

	fn key_of(&self, name: &str, ignore_case: bool) -> Option<String> {
		let inner = self.inner.read().unwrap();
		if inner.contains_key(name) {
			return Some(name.to_string());
		}
		if ignore_case {
			return inner
				.keys()
				.find(|key| key.eq_ignore_ascii_case(name))
				.cloned();
		}
		None
	}
}

impl VariableResolver for Variables {
	fn resolve_variable(
		&self,
		name: &str,
		ignore_case: bool,
	) -> Option<Variable> {
		let key = self.key_of(name, ignore_case)?;
		self.inner.read().unwrap().get(&key).cloned()
	}
}

impl VariableManager for Variables {
	fn assign_variable(
		&self,
		name: &str,
		value: Expression,
		context: &Context<'_>,
	) -> Result<Expression> {
		// reduce eagerly so the variable holds a constant and the
		// assignment expression itself reduces to one
		let reduced = value.reduce(context)?;

		let ignore_case = context.get_value("ignore_case", false);
		let key = self.key_of(name, ignore_case);

		let mut inner = self.inner.write().unwrap();
		if let Some(variable) =
			key.and_then(|key| inner.get_mut(&key))
		{
			variable.set_value(reduced.clone(), context)?;
			return Ok(reduced);
		}

		let value_type = match reduced.as_constant() {
			Some(value) => value.get_type(),
			None => Type::Undefined,
		};
		let mut variable =
			Variable::new(VariableInfo::new(name, value_type)?);
		variable.set_value(reduced.clone(), context)?;
		inner.insert(name.to_string(), variable);
		Ok(reduced)
	}
}
