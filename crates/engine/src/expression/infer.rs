// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use std::sync::Arc;

use strata_type::Type;

use super::Expression;
use crate::{
	Context, Error, Result,
	method::{MethodResolver, ReferenceResolver},
	variable::{VariableManager, VariableResolver},
};

impl Expression {
	/// The declared type of this expression's result, without reducing
	/// it. Consulted for condition branch merges, assignments and
	/// result validation.
	pub fn infer_type(&self, context: &Context<'_>) -> Result<Type> {
		match self {
			Expression::Constant(constant) => {
				Ok(constant.value.get_type())
			}
			Expression::Binary(binary) => {
				if binary.operator.is_arithmetic() {
					let left = binary
						.left
						.infer_type(context)?;
					let right = binary
						.right
						.infer_type(context)?;
					Ok(Type::promote(left, right))
				} else {
					Ok(Type::Boolean)
				}
			}
			Expression::Condition(condition) => {
				condition.if_true.infer_type(context)
			}
			Expression::Variable(variable) => {
				let ignore_case = context
					.get_value("ignore_case", false);
				context.resolve::<Arc<dyn VariableResolver>>()
					.and_then(|resolver| {
						resolver.resolve_variable(
							variable.name(),
							ignore_case,
						)
					})
					.map(|found| found.info().value_type())
					.ok_or_else(|| {
						Error::UnresolvedVariable {
							name: variable
								.name()
								.to_string(),
						}
					})
			}
			Expression::VariableAssign(assign) => {
				let manager = context
					.resolve::<Arc<dyn VariableManager>>()
					.ok_or(Error::NoVariableManager)?;
				let ignore_case = context
					.get_value("ignore_case", false);
				manager.resolve_variable(
					assign.name(),
					ignore_case,
				)
				.map(|found| found.info().value_type())
				.ok_or_else(|| Error::UnresolvedVariable {
					name: assign.name().to_string(),
				})
			}
			Expression::Invoke(invoke) => {
				let method_name =
					invoke.invoke.method().to_string();
				let resolver = context
					.resolve::<Arc<dyn MethodResolver>>()
					.ok_or_else(|| {
						Error::NoMethodResolver {
							method: method_name
								.clone(),
						}
					})?;
				let method = resolver
					.resolve_method(context, &invoke.invoke)
					.ok_or_else(|| {
						Error::UnknownMethod {
							method: method_name
								.clone(),
						}
					})?;
				method.info().return_type().ok_or(
					Error::NotAFunction {
						method: method_name,
					},
				)
			}
			Expression::Reference(reference) => Ok(context
				.resolve::<Arc<dyn ReferenceResolver>>()
				.and_then(|resolver| {
					resolver.type_of(reference.name())
				})
				.unwrap_or(Type::Undefined)),
		}
	}
}
