// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

//! The routine execution framework: method descriptors, call-site
//! descriptors, argument binding and the per-call execution driver.

use std::{
	fmt::{Display, Formatter},
	sync::Arc,
};

use async_trait::async_trait;
use indexmap::IndexMap;
use strata_type::Type;
use tracing::debug;

pub mod aggregate;
mod context;
mod registry;
mod result;

pub use aggregate::{
	Aggregate, GroupResolver, InitializeContext, IterateContext,
	MergeContext, ReferenceResolver,
};
pub use context::MethodContext;
pub use registry::{MethodRegistry, MethodRegistryBuilder};
pub use result::MethodResult;

use crate::{Context, Error, Expression, Result, variable};

#[derive(Clone, Debug, PartialEq)]
pub enum MethodKind {
	Function {
		return_type: Type,
	},
	Procedure,
}

#[derive(Clone, Debug)]
pub struct ParameterInfo {
	name: String,
	value_type: Type,
	default_value: Option<Expression>,
	output: bool,
}

impl ParameterInfo {
	pub fn new(name: impl Into<String>, value_type: Type) -> Result<Self> {
		let name = name.into();
		if !variable::is_valid_name(&name) {
			return Err(Error::InvalidName {
				name,
			});
		}
		Ok(Self {
			name,
			value_type,
			default_value: None,
			output: false,
		})
	}

	pub fn with_default(mut self, default_value: Expression) -> Self {
		self.default_value = Some(default_value);
		self
	}

	pub fn output(mut self) -> Self {
		self.output = true;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn value_type(&self) -> Type {
		self.value_type
	}

	pub fn default_value(&self) -> Option<&Expression> {
		self.default_value.as_ref()
	}

	pub fn is_output(&self) -> bool {
		self.output
	}
}

#[derive(Clone, Debug)]
pub struct MethodInfo {
	name: String,
	parameters: Vec<ParameterInfo>,
	kind: MethodKind,
}

impl MethodInfo {
	pub fn function(
		name: impl Into<String>,
		return_type: Type,
	) -> Result<Self> {
		Self::new(name, MethodKind::Function {
			return_type,
		})
	}

	pub fn procedure(name: impl Into<String>) -> Result<Self> {
		Self::new(name, MethodKind::Procedure)
	}

	fn new(name: impl Into<String>, kind: MethodKind) -> Result<Self> {
		let name = name.into();
		if name.trim().is_empty() {
			return Err(Error::InvalidName {
				name,
			});
		}
		Ok(Self {
			name,
			parameters: Vec::new(),
			kind,
		})
	}

	pub fn with_parameter(mut self, parameter: ParameterInfo) -> Result<Self> {
		if self.parameter(parameter.name(), false).is_some() {
			return Err(Error::DuplicateParameter {
				name: parameter.name().to_string(),
			});
		}
		self.parameters.push(parameter);
		Ok(self)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn parameters(&self) -> &[ParameterInfo] {
		&self.parameters
	}

	pub fn kind(&self) -> &MethodKind {
		&self.kind
	}

	pub fn is_function(&self) -> bool {
		matches!(self.kind, MethodKind::Function { .. })
	}

	pub fn is_procedure(&self) -> bool {
		matches!(self.kind, MethodKind::Procedure)
	}

	pub fn return_type(&self) -> Option<Type> {
		match self.kind {
			MethodKind::Function {
				return_type,
			} => Some(return_type),
			MethodKind::Procedure => None,
		}
	}

	pub fn parameter(
		&self,
		name: &str,
		ignore_case: bool,
	) -> Option<&ParameterInfo> {
		self.parameters.iter().find(|parameter| {
			if ignore_case {
				parameter.name().eq_ignore_ascii_case(name)
			} else {
				parameter.name() == name
			}
		})
	}
}

impl Display for MethodInfo {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match &self.kind {
			MethodKind::Function {
				return_type,
			} => {
				write!(f, "FUNCTION {}(", self.name)?;
				self.fmt_parameters(f)?;
				write!(f, ") RETURNS {}", return_type)
			}
			MethodKind::Procedure => {
				write!(f, "PROCEDURE {}(", self.name)?;
				self.fmt_parameters(f)?;
				f.write_str(")")
			}
		}
	}
}

impl MethodInfo {
	fn fmt_parameters(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		for (i, parameter) in self.parameters.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(
				f,
				"{} {}",
				parameter.name(),
				parameter.value_type()
			)?;
			if parameter.is_output() {
				f.write_str(" OUTPUT")?;
			}
		}
		Ok(())
	}
}

/// One argument at a call site, positional or named.
#[derive(Clone, Debug, PartialEq)]
pub struct InvokeArgument {
	name: Option<String>,
	value: Expression,
}

impl InvokeArgument {
	pub fn positional(value: Expression) -> Self {
		Self {
			name: None,
			value,
		}
	}

	pub fn named(name: impl Into<String>, value: Expression) -> Self {
		Self {
			name: Some(name.into()),
			value,
		}
	}

	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	pub fn value(&self) -> &Expression {
		&self.value
	}
}

/// A call-site descriptor: a method name plus either positional or
/// fully named arguments, never a mix.
#[derive(Clone, Debug, PartialEq)]
pub struct Invoke {
	method: String,
	arguments: Vec<InvokeArgument>,
}

impl Invoke {
	pub fn new(method: impl Into<String>) -> Self {
		Self {
			method: method.into(),
			arguments: Vec::new(),
		}
	}

	pub fn with_argument(mut self, argument: InvokeArgument) -> Result<Self> {
		let mixed = match argument.name() {
			Some(_) => self
				.arguments
				.iter()
				.any(|existing| existing.name().is_none()),
			None => self.is_named(),
		};
		if mixed {
			return Err(Error::MixedArguments);
		}
		self.arguments.push(argument);
		Ok(self)
	}

	pub fn method(&self) -> &str {
		&self.method
	}

	pub fn arguments(&self) -> &[InvokeArgument] {
		&self.arguments
	}

	pub fn is_named(&self) -> bool {
		self.arguments
			.iter()
			.any(|argument| argument.name().is_some())
	}
}

impl Display for Invoke {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}(", self.method)?;
		for (i, argument) in self.arguments.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			if let Some(name) = argument.name() {
				write!(f, "{} => ", name)?;
			}
			Display::fmt(argument.value(), f)?;
		}
		f.write_str(")")
	}
}

/// Binds an invoke's arguments to a method's parameters, by name or by
/// position. The bound map iterates in parameter declaration order, so
/// binding the same invoke twice yields an identical map.
pub(crate) fn bind_arguments(
	info: &MethodInfo,
	invoke: &Invoke,
) -> Result<IndexMap<String, Expression>> {
	let mut bound = IndexMap::with_capacity(info.parameters().len());

	if invoke.is_named() {
		for argument in invoke.arguments() {
			let name = argument.name().unwrap_or_default();
			if info.parameter(name, false).is_none() {
				return Err(Error::UnknownArgument {
					name: name.to_string(),
				});
			}
		}
		for parameter in info.parameters() {
			let supplied = invoke.arguments().iter().find(
				|argument| {
					argument.name()
						== Some(parameter.name())
				},
			);
			let value = match supplied {
				Some(argument) => argument.value().clone(),
				None => match parameter.default_value() {
					Some(default) => default.clone(),
					None => {
						return Err(
							Error::MissingArgument {
								name: parameter
									.name()
									.to_string(),
							},
						);
					}
				},
			};
			bound.insert(parameter.name().to_string(), value);
		}
	} else {
		if info.parameters().len() != invoke.arguments().len() {
			return Err(Error::ArgumentCountMismatch {
				method: info.name().to_string(),
				expected: info.parameters().len(),
				found: invoke.arguments().len(),
			});
		}
		for (parameter, argument) in
			info.parameters().iter().zip(invoke.arguments())
		{
			bound.insert(
				parameter.name().to_string(),
				argument.value().clone(),
			);
		}
	}

	Ok(bound)
}

/// A callable SQL routine.
///
/// `execute` is the abstract body; `execute_invoke` is the framework
/// driver every caller goes through: fresh per-call context, body, result
/// snapshot, validation. The context is torn down on every exit path.
#[async_trait]
pub trait Method: Send + Sync {
	fn info(&self) -> &MethodInfo;

	async fn execute(&self, context: &mut MethodContext<'_>)
	-> Result<()>;

	async fn execute_invoke(
		&self,
		context: &Context<'_>,
		invoke: &Invoke,
	) -> Result<MethodResult> {
		debug!(method = self.info().name(), "executing method");

		let mut method_context =
			MethodContext::new(context, self.info().clone(), invoke)?;
		self.execute(&mut method_context).await?;

		let result = method_context.into_result();
		result.validate(self.info(), context)?;
		Ok(result)
	}
}

/// Resolves a method for a call site. Registration is external setup,
/// not part of per-call evaluation.
pub trait MethodResolver: Send + Sync {
	fn resolve_method(
		&self,
		context: &Context<'_>,
		invoke: &Invoke,
	) -> Option<Arc<dyn Method>>;
}

#[cfg(test)]
mod tests {
	use strata_type::{Type, Value};

	use super::{
		Invoke, InvokeArgument, MethodInfo, ParameterInfo,
		bind_arguments,
	};
	use crate::{Error, Expression};

	fn two_parameter_function() -> MethodInfo {
		MethodInfo::function("F", Type::Int8)
			.unwrap()
			.with_parameter(
				ParameterInfo::new("a", Type::Int8).unwrap(),
			)
			.unwrap()
			.with_parameter(
				ParameterInfo::new("b", Type::Int8)
					.unwrap()
					.with_default(Expression::constant(
						Value::int8(10),
					)),
			)
			.unwrap()
	}

	#[test]
	fn named_binding_fills_defaults() {
		let info = two_parameter_function();
		let invoke = Invoke::new("F")
			.with_argument(InvokeArgument::named(
				"a",
				Expression::constant(Value::int8(1)),
			))
			.unwrap();

		let bound = bind_arguments(&info, &invoke).unwrap();
		assert_eq!(
			bound.get("a"),
			Some(&Expression::constant(Value::int8(1)))
		);
		assert_eq!(
			bound.get("b"),
			Some(&Expression::constant(Value::int8(10)))
		);
	}

	#[test]
	fn named_binding_is_deterministic() {
		let info = two_parameter_function();
		let invoke = Invoke::new("F")
			.with_argument(InvokeArgument::named(
				"b",
				Expression::constant(Value::int8(2)),
			))
			.unwrap()
			.with_argument(InvokeArgument::named(
				"a",
				Expression::constant(Value::int8(1)),
			))
			.unwrap();

		let first = bind_arguments(&info, &invoke).unwrap();
		let second = bind_arguments(&info, &invoke).unwrap();
		assert_eq!(first, second);
		// declaration order, not supply order
		let keys: Vec<_> = first.keys().cloned().collect();
		assert_eq!(keys, ["a", "b"]);
	}

	#[test]
	fn unknown_named_argument_is_rejected() {
		let info = two_parameter_function();
		let invoke = Invoke::new("F")
			.with_argument(InvokeArgument::named(
				"c",
				Expression::constant(Value::int8(1)),
			))
			.unwrap();

		assert!(matches!(
			bind_arguments(&info, &invoke),
			Err(Error::UnknownArgument { .. })
		));
	}

	#[test]
	fn missing_required_parameter_is_a_binding_error() {
		let info = two_parameter_function();
		let invoke = Invoke::new("F")
			.with_argument(InvokeArgument::named(
				"b",
				Expression::constant(Value::int8(2)),
			))
			.unwrap();

		assert!(matches!(
			bind_arguments(&info, &invoke),
			Err(Error::MissingArgument { .. })
		));
	}

	#[test]
	fn positional_binding_requires_exact_count() {
		let info = two_parameter_function();
		let invoke = Invoke::new("F")
			.with_argument(InvokeArgument::positional(
				Expression::constant(Value::int8(1)),
			))
			.unwrap();

		assert!(matches!(
			bind_arguments(&info, &invoke),
			Err(Error::ArgumentCountMismatch { .. })
		));
	}

	#[test]
	fn mixed_arguments_are_rejected_at_construction() {
		let result = Invoke::new("F")
			.with_argument(InvokeArgument::positional(
				Expression::constant(Value::int8(1)),
			))
			.unwrap()
			.with_argument(InvokeArgument::named(
				"b",
				Expression::constant(Value::int8(2)),
			));

		assert!(matches!(result, Err(Error::MixedArguments)));
	}

	mod execute {
		use std::sync::{
			Arc,
			atomic::{AtomicBool, Ordering},
		};

		use async_trait::async_trait;
		use strata_type::{Type, Value};

		use crate::{
			Context, Error, Expression, Invoke, InvokeArgument,
			Method, MethodContext, MethodInfo, ParameterInfo,
			Result,
		};

		struct Half {
			info: MethodInfo,
			ran: AtomicBool,
		}

		impl Half {
			fn new() -> Self {
				Self {
					info: MethodInfo::function(
						"half",
						Type::Int8,
					)
					.unwrap()
					.with_parameter(
						ParameterInfo::new(
							"x",
							Type::Int8,
						)
						.unwrap(),
					)
					.unwrap(),
					ran: AtomicBool::new(false),
				}
			}
		}

		#[async_trait]
		impl Method for Half {
			fn info(&self) -> &MethodInfo {
				&self.info
			}

			async fn execute(
				&self,
				context: &mut MethodContext<'_>,
			) -> Result<()> {
				self.ran.store(true, Ordering::SeqCst);
				let x = context.value("x")?;
				context.set_result(
					x.divide(&Value::int8(2))?,
				)
			}
		}

		#[tokio::test]
		async fn function_call_round_trip() {
			let context = Context::root("test");
			let invoke = Invoke::new("half")
				.with_argument(InvokeArgument::positional(
					Expression::constant(Value::int8(
						42,
					)),
				))
				.unwrap();

			let result = Half::new()
				.execute_invoke(&context, &invoke)
				.await
				.unwrap();
			assert_eq!(
				result.returned_value(),
				Some(&Value::int8(21))
			);
		}

		#[tokio::test]
		async fn binding_error_precedes_the_body() {
			let context = Context::root("test");
			let method = Half::new();

			let result = method
				.execute_invoke(&context, &Invoke::new("half"))
				.await;
			assert!(matches!(
				result,
				Err(Error::ArgumentCountMismatch { .. })
			));
			assert!(!method.ran.load(Ordering::SeqCst));
		}

		#[tokio::test]
		async fn body_error_propagates() {
			let context = Context::root("test");
			let invoke = Invoke::new("half")
				.with_argument(InvokeArgument::positional(
					Expression::variable_assign(
						"x",
						Expression::constant(
							Value::int8(1),
						),
					)
					.unwrap(),
				))
				.unwrap();

			// the argument assignment finds no manager
			let result = Half::new()
				.execute_invoke(&context, &invoke)
				.await;
			assert!(matches!(
				result,
				Err(Error::NoVariableManager)
			));
		}

		struct Swap {
			info: MethodInfo,
		}

		impl Swap {
			fn new() -> Self {
				Self {
					info: MethodInfo::procedure("swap")
						.unwrap()
						.with_parameter(
							ParameterInfo::new(
								"input",
								Type::Int8,
							)
							.unwrap(),
						)
						.unwrap()
						.with_parameter(
							ParameterInfo::new(
								"output",
								Type::Int8,
							)
							.unwrap()
							.output(),
						)
						.unwrap(),
				}
			}
		}

		#[async_trait]
		impl Method for Swap {
			fn info(&self) -> &MethodInfo {
				&self.info
			}

			async fn execute(
				&self,
				context: &mut MethodContext<'_>,
			) -> Result<()> {
				let input = context.value("input")?;
				context.set_output(
					"output",
					Expression::constant(
						input.negate()?,
					),
				)
			}
		}

		fn swap_invoke() -> Invoke {
			Invoke::new("swap")
				.with_argument(InvokeArgument::positional(
					Expression::constant(Value::int8(7)),
				))
				.unwrap()
				.with_argument(InvokeArgument::positional(
					Expression::constant(
						Value::null_of(Type::Int8),
					),
				))
				.unwrap()
		}

		#[tokio::test]
		async fn procedure_outputs_are_validated_and_returned() {
			let context = Context::root("test");
			let result = Swap::new()
				.execute_invoke(&context, &swap_invoke())
				.await
				.unwrap();

			assert!(!result.has_returned());
			assert_eq!(
				result.output("output"),
				Some(&Expression::constant(Value::int8(
					-7
				)))
			);
		}

		struct Silent {
			info: MethodInfo,
		}

		#[async_trait]
		impl Method for Silent {
			fn info(&self) -> &MethodInfo {
				&self.info
			}

			async fn execute(
				&self,
				_context: &mut MethodContext<'_>,
			) -> Result<()> {
				Ok(())
			}
		}

		#[tokio::test]
		async fn function_with_no_result_fails_validation() {
			let context = Context::root("test");
			let method = Silent {
				info: MethodInfo::function(
					"silent",
					Type::Int8,
				)
				.unwrap(),
			};

			let result = method
				.execute_invoke(&context, &Invoke::new("silent"))
				.await;
			assert!(matches!(
				result,
				Err(Error::MissingResult { .. })
			));
		}

		#[tokio::test]
		async fn procedure_missing_output_fails_validation() {
			let context = Context::root("test");
			let mut info = MethodInfo::procedure("noop").unwrap();
			info = info
				.with_parameter(
					ParameterInfo::new(
						"out",
						Type::Int8,
					)
					.unwrap()
					.output(),
				)
				.unwrap();
			let method = Silent {
				info,
			};

			let invoke = Invoke::new("noop")
				.with_argument(InvokeArgument::positional(
					Expression::constant(
						Value::null_of(Type::Int8),
					),
				))
				.unwrap();
			let result = method
				.execute_invoke(&context, &invoke)
				.await;
			assert!(matches!(
				result,
				Err(Error::MissingOutput { .. })
			));
		}

		#[tokio::test]
		async fn named_arguments_bind_by_parameter_name() {
			let context = Context::root("test");
			let invoke = Invoke::new("half")
				.with_argument(InvokeArgument::named(
					"x",
					Expression::constant(Value::int8(
						10,
					)),
				))
				.unwrap();

			let result = Half::new()
				.execute_invoke(&context, &invoke)
				.await
				.unwrap();
			assert_eq!(
				result.returned_value(),
				Some(&Value::int8(5))
			);
		}
	}

	#[test]
	fn duplicate_parameters_are_rejected() {
		let result = MethodInfo::function("F", Type::Int8)
			.unwrap()
			.with_parameter(
				ParameterInfo::new("a", Type::Int8).unwrap(),
			)
			.unwrap()
			.with_parameter(
				ParameterInfo::new("a", Type::Int8).unwrap(),
			);
		assert!(matches!(
			result,
			Err(Error::DuplicateParameter { .. })
		));
	}
}
