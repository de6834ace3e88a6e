// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use std::sync::Arc;

use indexmap::IndexMap;
use strata_type::{Type, Value};

use super::{Invoke, MethodInfo, MethodResult, bind_arguments};
use crate::{
	Context, Error, Expression, Result,
	variable::{Variable, VariableInfo, VariableResolver},
};

/// The execution scope of one method call.
///
/// Created per invocation, it binds the call's arguments, opens a child
/// context in which parameter names resolve as constant variables, and
/// carries the mutable result slot (functions) and output map (procedures).
/// Its lifetime is exactly the call's duration.
pub struct MethodContext<'a> {
	context: Context<'a>,
	info: MethodInfo,
	arguments: Arc<IndexMap<String, Expression>>,
	result: Option<Expression>,
	outputs: IndexMap<String, Expression>,
}

impl<'a> MethodContext<'a> {
	pub(crate) fn new(
		parent: &'a Context<'a>,
		info: MethodInfo,
		invoke: &Invoke,
	) -> Result<Self> {
		let arguments = Arc::new(bind_arguments(&info, invoke)?);

		let context = parent.child(format!("method:{}", info.name()));
		let resolver: Arc<dyn VariableResolver> =
			Arc::new(ArgumentResolver {
				info: info.clone(),
				arguments: arguments.clone(),
			});
		context.register(resolver);

		Ok(Self {
			context,
			info,
			arguments,
			result: None,
			outputs: IndexMap::new(),
		})
	}

	/// The context nested reductions run against.
	pub fn context(&self) -> &Context<'a> {
		&self.context
	}

	pub fn info(&self) -> &MethodInfo {
		&self.info
	}

	/// The bound argument expression for a parameter name.
	pub fn argument(&self, name: &str) -> Result<&Expression> {
		self.arguments.get(name).ok_or_else(|| {
			Error::UnknownArgument {
				name: name.to_string(),
			}
		})
	}

	/// The bound argument at a parameter position.
	pub fn argument_at(&self, index: usize) -> Result<&Expression> {
		self.arguments
			.get_index(index)
			.map(|(_, value)| value)
			.ok_or_else(|| Error::UnknownArgument {
				name: index.to_string(),
			})
	}

	/// Reduces the named argument to its constant value.
	pub fn value(&self, name: &str) -> Result<Value> {
		let reduced = self.argument(name)?.reduce(&self.context)?;
		match reduced.as_constant() {
			Some(value) => Ok(value.clone()),
			None => Err(Error::ArgumentNotConstant {
				name: name.to_string(),
			}),
		}
	}

	pub fn value_at(&self, index: usize) -> Result<Value> {
		let reduced =
			self.argument_at(index)?.reduce(&self.context)?;
		match reduced.as_constant() {
			Some(value) => Ok(value.clone()),
			None => Err(Error::ArgumentNotConstant {
				name: index.to_string(),
			}),
		}
	}

	/// Stores a function's result value. A null or unknown value is
	/// rewritten to a typed null of the declared return type, so an
	/// untyped null never escapes a typed function.
	pub fn set_result(&mut self, value: Value) -> Result<()> {
		let return_type = self.declared_return_type()?;
		let value = if value.is_null() || value.is_unknown() {
			Value::null_of(return_type)
		} else {
			value
		};
		self.set_result_expression(Expression::constant(value))
	}

	pub fn set_result_expression(
		&mut self,
		value: Expression,
	) -> Result<()> {
		let return_type = self.declared_return_type()?;

		let value = match value.as_constant() {
			Some(constant)
				if constant.is_null()
					|| constant.is_unknown() =>
			{
				Expression::constant(Value::null_of(
					return_type,
				))
			}
			_ => {
				let found =
					value.infer_type(&self.context)?;
				if !found.is_comparable(return_type) {
					return Err(
						Error::ResultTypeMismatch {
							method: self
								.info
								.name()
								.to_string(),
							declared: return_type,
							found,
						},
					);
				}
				value
			}
		};

		self.result = Some(value);
		Ok(())
	}

	/// Stores a procedure's output parameter value.
	pub fn set_output(
		&mut self,
		name: &str,
		value: Expression,
	) -> Result<()> {
		if !self.info.is_procedure() {
			return Err(Error::NotAProcedure {
				method: self.info.name().to_string(),
			});
		}
		let parameter = self
			.info
			.parameter(name, false)
			.ok_or_else(|| Error::UnknownArgument {
				name: name.to_string(),
			})?;
		if !parameter.is_output() {
			return Err(Error::NotAnOutput {
				name: name.to_string(),
			});
		}

		self.outputs.insert(name.to_string(), value);
		Ok(())
	}

	pub(crate) fn into_result(self) -> MethodResult {
		MethodResult::new(self.result, self.outputs)
	}

	fn declared_return_type(&self) -> Result<Type> {
		self.info.return_type().ok_or_else(|| Error::NotAFunction {
			method: self.info.name().to_string(),
		})
	}
}

/// Lets parameter names resolve as constant variables while the method
/// body reduces nested expressions.
struct ArgumentResolver {
	info: MethodInfo,
	arguments: Arc<IndexMap<String, Expression>>,
}

impl VariableResolver for ArgumentResolver {
	fn resolve_variable(
		&self,
		name: &str,
		ignore_case: bool,
	) -> Option<Variable> {
		let parameter = self.info.parameter(name, ignore_case)?;
		let value = match self.arguments.get(parameter.name()) {
			Some(value) => value.clone(),
			None => Expression::constant(Value::null_of(
				parameter.value_type(),
			)),
		};
		let info = VariableInfo::new(
			parameter.name(),
			parameter.value_type(),
		)
		.ok()?
		.constant()
		.with_default(value);
		Some(Variable::new(info))
	}
}
