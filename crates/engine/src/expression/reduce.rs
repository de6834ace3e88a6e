// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

//! Reduction: resolving an expression tree to a single constant node.

use std::sync::Arc;

use futures_util::{FutureExt, future::BoxFuture};
use strata_type::{Type, Value};

use super::{BinaryExpression, BinaryOperator, ConditionExpression,
	Expression};
use crate::{
	Context, Error, Result,
	method::{MethodResolver, ReferenceResolver},
	variable::{VariableManager, VariableResolver},
};

impl Expression {
	/// Reduces this tree to a constant node against `context`.
	///
	/// Kernel reductions never suspend; a user-supplied method body
	/// that does surfaces as [`Error::WouldBlock`] here instead of
	/// blocking the thread.
	pub fn reduce(&self, context: &Context<'_>) -> Result<Expression> {
		self.reduce_async(context)
			.now_or_never()
			.ok_or(Error::WouldBlock)?
	}

	/// The asynchronous reduction every other entry point drives.
	/// Strictly sequential: one logical thread per call, suspension
	/// only at nested reductions and method bodies.
	pub fn reduce_async<'a>(
		&'a self,
		context: &'a Context<'a>,
	) -> BoxFuture<'a, Result<Expression>> {
		Box::pin(async move {
			match self {
				// terminal, reduction is a no-op
				Expression::Constant(_) => Ok(self.clone()),
				Expression::Binary(binary) => {
					reduce_binary(binary, context).await
				}
				Expression::Condition(condition) => {
					reduce_condition(condition, context)
						.await
				}
				Expression::Variable(variable) => {
					reduce_variable(
						variable.name(),
						context,
					)
					.await
				}
				Expression::VariableAssign(assign) => {
					let manager = context
						.resolve::<Arc<dyn VariableManager>>()
						.ok_or(Error::NoVariableManager)?;
					manager.assign_variable(
						assign.name(),
						(*assign.value).clone(),
						context,
					)
				}
				Expression::Invoke(invoke) => {
					reduce_invoke(&invoke.invoke, context)
						.await
				}
				Expression::Reference(reference) => {
					let value = context
						.resolve::<Arc<dyn ReferenceResolver>>()
						.and_then(|resolver| {
							resolver.resolve_reference(
								reference.name(),
							)
						});
					Ok(Expression::constant(
						value.unwrap_or(Value::Unknown),
					))
				}
			}
		})
	}
}

/// Reduces both sides in descending precedence order, restores the
/// syntactic left/right order, then applies the operator. Reduction
/// order is observable through side effects such as embedded
/// assignments and is preserved exactly.
async fn reduce_binary(
	binary: &BinaryExpression,
	context: &Context<'_>,
) -> Result<Expression> {
	let left_first =
		binary.left.precedence() >= binary.right.precedence();

	let (left, right) = if left_first {
		let left = binary.left.reduce_async(context).await?;
		let right = binary.right.reduce_async(context).await?;
		(left, right)
	} else {
		let right = binary.right.reduce_async(context).await?;
		let left = binary.left.reduce_async(context).await?;
		(left, right)
	};

	let left = left.as_constant().ok_or(Error::NotConstant {
		side: "left",
	})?;
	let right = right.as_constant().ok_or(Error::NotConstant {
		side: "right",
	})?;

	let result = apply_operator(binary.operator, left, right)?;
	Ok(Expression::constant(result))
}

/// SQL CASE semantics: the test must be typed boolean and the branches
/// mutually comparable before anything evaluates; only the selected
/// branch is reduced; a null or unknown test short-circuits.
async fn reduce_condition(
	condition: &ConditionExpression,
	context: &Context<'_>,
) -> Result<Expression> {
	let test_type = condition.test.infer_type(context)?;
	if !test_type.is_comparable(Type::Boolean) {
		return Err(Error::TestNotBoolean {
			found: test_type,
		});
	}

	let if_true = condition.if_true.infer_type(context)?;
	let if_false = condition.if_false.infer_type(context)?;
	if !if_true.is_comparable(if_false) {
		return Err(Error::BranchMismatch {
			if_true,
			if_false,
		});
	}

	let reduced = condition.test.reduce_async(context).await?;
	let test = reduced.as_constant().ok_or(Error::NotConstant {
		side: "test",
	})?;

	if test.is_null() || test.is_unknown() {
		return Ok(Expression::constant(test.clone()));
	}
	if test.is_true() {
		return condition.if_true.reduce_async(context).await;
	}
	if test.is_false() {
		return condition.if_false.reduce_async(context).await;
	}
	Err(Error::TestNotBoolean {
		found: test.get_type(),
	})
}

/// An unresolvable variable reduces to unknown, not to an error: the
/// value is not determinable here, the call is not broken.
async fn reduce_variable(
	name: &str,
	context: &Context<'_>,
) -> Result<Expression> {
	let ignore_case = context.get_value("ignore_case", false);
	let variable = context
		.resolve::<Arc<dyn VariableResolver>>()
		.and_then(|resolver| {
			resolver.resolve_variable(name, ignore_case)
		});

	match variable {
		None => Ok(Expression::constant(Value::Unknown)),
		Some(variable) => {
			let expression = variable
				.current_expression()
				.cloned()
				.ok_or_else(|| Error::VariableNotSet {
					name: name.to_string(),
				})?;
			expression.reduce_async(context).await
		}
	}
}

async fn reduce_invoke(
	invoke: &crate::method::Invoke,
	context: &Context<'_>,
) -> Result<Expression> {
	let resolver = context
		.resolve::<Arc<dyn MethodResolver>>()
		.ok_or_else(|| Error::NoMethodResolver {
			method: invoke.method().to_string(),
		})?;
	let method = resolver.resolve_method(context, invoke).ok_or_else(
		|| Error::UnknownMethod {
			method: invoke.method().to_string(),
		},
	)?;
	if !method.info().is_function() {
		return Err(Error::NotAFunction {
			method: invoke.method().to_string(),
		});
	}

	let result = method.execute_invoke(context, invoke).await?;
	result.returned().cloned().ok_or_else(|| Error::MissingResult {
		method: invoke.method().to_string(),
	})
}

fn apply_operator(
	operator: BinaryOperator,
	left: &Value,
	right: &Value,
) -> Result<Value> {
	let result = match operator {
		BinaryOperator::Add => left.add(right)?,
		BinaryOperator::Subtract => left.subtract(right)?,
		BinaryOperator::Multiply => left.multiply(right)?,
		BinaryOperator::Divide => left.divide(right)?,
		BinaryOperator::Modulo => left.modulo(right)?,
		BinaryOperator::GreaterThan => left.greater_than(right)?,
		BinaryOperator::GreaterThanOrEqual => {
			left.greater_than_or_equal(right)?
		}
		BinaryOperator::LessThan => left.less_than(right)?,
		BinaryOperator::LessThanOrEqual => {
			left.less_than_or_equal(right)?
		}
		BinaryOperator::Equal => left.equal(right)?,
		BinaryOperator::NotEqual => left.not_equal(right)?,
		BinaryOperator::Is => left.is(right)?,
		BinaryOperator::IsNot => left.is_not(right)?,
		BinaryOperator::And => left.and(right)?,
		BinaryOperator::Or => left.or(right)?,
		BinaryOperator::XOr => left.xor(right)?,
	};
	Ok(result)
}
