// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod context;
mod error;
pub mod expression;
pub mod method;
pub mod variable;

pub use context::Context;
pub use error::Error;
pub use expression::{BinaryOperator, Expression, ExpressionKind};
pub use method::{
	Aggregate, GroupResolver, InitializeContext, Invoke, InvokeArgument,
	IterateContext, MergeContext, Method, MethodContext, MethodInfo,
	MethodKind, MethodRegistry, MethodRegistryBuilder, MethodResolver,
	MethodResult, ParameterInfo, ReferenceResolver,
};
pub use variable::{
	Variable, VariableInfo, VariableManager, VariableResolver, Variables,
};

pub type Result<T> = std::result::Result<T, Error>;
