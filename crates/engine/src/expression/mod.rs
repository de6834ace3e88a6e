// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

//! The expression tree.
//!
//! One variant per expression kind, each carrying only the fields that kind
//! needs. Trees are immutable and persistent: reduction builds new trees.

use std::fmt::{Display, Formatter};

use strata_type::Value;

mod infer;
mod reduce;

use crate::{Error, Result, method::Invoke, variable};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpressionKind {
	Constant,
	Binary,
	Condition,
	Variable,
	VariableAssign,
	Invoke,
	Reference,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
	Add,
	Subtract,
	Multiply,
	Divide,
	Modulo,
	GreaterThan,
	GreaterThanOrEqual,
	LessThan,
	LessThanOrEqual,
	Equal,
	NotEqual,
	Is,
	IsNot,
	And,
	Or,
	XOr,
}

impl BinaryOperator {
	pub fn is_arithmetic(&self) -> bool {
		matches!(
			self,
			BinaryOperator::Add
				| BinaryOperator::Subtract
				| BinaryOperator::Multiply
				| BinaryOperator::Divide
				| BinaryOperator::Modulo
		)
	}

	fn precedence(&self) -> u8 {
		match self {
			BinaryOperator::Multiply
			| BinaryOperator::Divide
			| BinaryOperator::Modulo => 7,
			BinaryOperator::Add | BinaryOperator::Subtract => 6,
			BinaryOperator::GreaterThan
			| BinaryOperator::GreaterThanOrEqual
			| BinaryOperator::LessThan
			| BinaryOperator::LessThanOrEqual
			| BinaryOperator::Equal
			| BinaryOperator::NotEqual => 5,
			BinaryOperator::Is | BinaryOperator::IsNot => 4,
			BinaryOperator::And => 3,
			BinaryOperator::XOr => 2,
			BinaryOperator::Or => 2,
		}
	}
}

impl Display for BinaryOperator {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			BinaryOperator::Add => f.write_str("+"),
			BinaryOperator::Subtract => f.write_str("-"),
			BinaryOperator::Multiply => f.write_str("*"),
			BinaryOperator::Divide => f.write_str("/"),
			BinaryOperator::Modulo => f.write_str("%"),
			BinaryOperator::GreaterThan => f.write_str(">"),
			BinaryOperator::GreaterThanOrEqual => f.write_str(">="),
			BinaryOperator::LessThan => f.write_str("<"),
			BinaryOperator::LessThanOrEqual => f.write_str("<="),
			BinaryOperator::Equal => f.write_str("="),
			BinaryOperator::NotEqual => f.write_str("<>"),
			BinaryOperator::Is => f.write_str("IS"),
			BinaryOperator::IsNot => f.write_str("IS NOT"),
			BinaryOperator::And => f.write_str("AND"),
			BinaryOperator::Or => f.write_str("OR"),
			BinaryOperator::XOr => f.write_str("XOR"),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConstantExpression {
	pub value: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BinaryExpression {
	pub operator: BinaryOperator,
	pub left: Box<Expression>,
	pub right: Box<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConditionExpression {
	pub test: Box<Expression>,
	pub if_true: Box<Expression>,
	pub if_false: Box<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VariableExpression {
	name: String,
}

impl VariableExpression {
	pub fn name(&self) -> &str {
		&self.name
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct VariableAssignExpression {
	name: String,
	pub value: Box<Expression>,
}

impl VariableAssignExpression {
	pub fn name(&self) -> &str {
		&self.name
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct InvokeExpression {
	pub invoke: Invoke,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceExpression {
	name: String,
}

impl ReferenceExpression {
	pub fn name(&self) -> &str {
		&self.name
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
	Constant(ConstantExpression),
	Binary(BinaryExpression),
	Condition(ConditionExpression),
	Variable(VariableExpression),
	VariableAssign(VariableAssignExpression),
	Invoke(InvokeExpression),
	Reference(ReferenceExpression),
}

impl Expression {
	pub fn constant(value: Value) -> Self {
		Expression::Constant(ConstantExpression {
			value,
		})
	}

	pub fn binary(
		operator: BinaryOperator,
		left: Expression,
		right: Expression,
	) -> Self {
		Expression::Binary(BinaryExpression {
			operator,
			left: Box::new(left),
			right: Box::new(right),
		})
	}

	pub fn condition(
		test: Expression,
		if_true: Expression,
		if_false: Expression,
	) -> Self {
		Expression::Condition(ConditionExpression {
			test: Box::new(test),
			if_true: Box::new(if_true),
			if_false: Box::new(if_false),
		})
	}

	/// Builds a variable reference. The name is validated here, never at
	/// reduction time.
	pub fn variable(name: impl Into<String>) -> Result<Self> {
		let name = name.into();
		if !variable::is_valid_name(&name) {
			return Err(Error::InvalidName {
				name,
			});
		}
		Ok(Expression::Variable(VariableExpression {
			name,
		}))
	}

	pub fn variable_assign(
		name: impl Into<String>,
		value: Expression,
	) -> Result<Self> {
		let name = name.into();
		if !variable::is_valid_name(&name) {
			return Err(Error::InvalidName {
				name,
			});
		}
		Ok(Expression::VariableAssign(VariableAssignExpression {
			name,
			value: Box::new(value),
		}))
	}

	pub fn invoke(invoke: Invoke) -> Self {
		Expression::Invoke(InvokeExpression {
			invoke,
		})
	}

	pub fn reference(name: impl Into<String>) -> Self {
		Expression::Reference(ReferenceExpression {
			name: name.into(),
		})
	}

	pub fn kind(&self) -> ExpressionKind {
		match self {
			Expression::Constant(_) => ExpressionKind::Constant,
			Expression::Binary(_) => ExpressionKind::Binary,
			Expression::Condition(_) => ExpressionKind::Condition,
			Expression::Variable(_) => ExpressionKind::Variable,
			Expression::VariableAssign(_) => {
				ExpressionKind::VariableAssign
			}
			Expression::Invoke(_) => ExpressionKind::Invoke,
			Expression::Reference(_) => ExpressionKind::Reference,
		}
	}

	/// False only for terminal constants; reducing one is a no-op.
	pub fn can_reduce(&self) -> bool {
		!matches!(self, Expression::Constant(_))
	}

	pub fn is_reference(&self) -> bool {
		matches!(
			self,
			Expression::Variable(_)
				| Expression::VariableAssign(_)
				| Expression::Reference(_)
		)
	}

	/// The value of a constant node.
	pub fn as_constant(&self) -> Option<&Value> {
		match self {
			Expression::Constant(constant) => Some(&constant.value),
			_ => None,
		}
	}

	pub(crate) fn precedence(&self) -> u8 {
		match self {
			Expression::Constant(_) => 10,
			Expression::Reference(_)
			| Expression::Variable(_)
			| Expression::Invoke(_) => 9,
			Expression::Binary(binary) => {
				binary.operator.precedence()
			}
			Expression::Condition(_) => 2,
			Expression::VariableAssign(_) => 1,
		}
	}
}

impl Display for Expression {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Expression::Constant(constant) => {
				Display::fmt(&constant.value, f)
			}
			Expression::Binary(binary) => write!(
				f,
				"({} {} {})",
				binary.left, binary.operator, binary.right
			),
			Expression::Condition(condition) => write!(
				f,
				"CASE WHEN {} THEN {} ELSE {} END",
				condition.test,
				condition.if_true,
				condition.if_false
			),
			Expression::Variable(variable) => {
				write!(f, ":{}", variable.name)
			}
			Expression::VariableAssign(assign) => {
				write!(f, ":{} := {}", assign.name, assign.value)
			}
			Expression::Invoke(invoke) => {
				Display::fmt(&invoke.invoke, f)
			}
			Expression::Reference(reference) => {
				f.write_str(&reference.name)
			}
		}
	}
}
