// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use strata_type::{Type, TypeError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Type(#[from] TypeError),

	// construction
	#[error("'{name}' is not a valid variable name")]
	InvalidName {
		name: String,
	},

	#[error("an invoke cannot mix named and positional arguments")]
	MixedArguments,

	#[error("duplicate parameter '{name}'")]
	DuplicateParameter {
		name: String,
	},

	// reduction
	#[error("the reduced {side} side of a binary expression is not constant")]
	NotConstant {
		side: &'static str,
	},

	#[error("the condition test does not have a boolean result, found {found}")]
	TestNotBoolean {
		found: Type,
	},

	#[error("the condition branch types {if_true} and {if_false} are not compatible")]
	BranchMismatch {
		if_true: Type,
		if_false: Type,
	},

	#[error("reduction suspended on a pending future, use reduce_async")]
	WouldBlock,

	// resolution
	#[error("no variable manager was found in the context chain")]
	NoVariableManager,

	#[error("no method resolver was found in the context chain to resolve '{method}'")]
	NoMethodResolver {
		method: String,
	},

	#[error("no method '{method}' could be resolved")]
	UnknownMethod {
		method: String,
	},

	#[error("aggregate '{method}' requires a group resolver in context")]
	NoGroupResolver {
		method: String,
	},

	#[error("variable '{name}' cannot be resolved")]
	UnresolvedVariable {
		name: String,
	},

	// variables
	#[error("variable '{name}' has no value set")]
	VariableNotSet {
		name: String,
	},

	#[error("cannot set constant variable '{name}'")]
	ConstantVariable {
		name: String,
	},

	#[error("variable '{name}' is already declared")]
	DuplicateVariable {
		name: String,
	},

	#[error("type {found} is not compatible with the type {declared} of variable '{name}'")]
	AssignmentTypeMismatch {
		name: String,
		declared: Type,
		found: Type,
	},

	// argument binding
	#[error("argument '{name}' does not correspond to any parameter")]
	UnknownArgument {
		name: String,
	},

	#[error("no value for parameter '{name}' and the parameter has no default")]
	MissingArgument {
		name: String,
	},

	#[error("invoke of '{method}' supplies {found} arguments but {expected} parameters are declared")]
	ArgumentCountMismatch {
		method: String,
		expected: usize,
		found: usize,
	},

	#[error("the argument '{name}' does not reduce to a constant value")]
	ArgumentNotConstant {
		name: String,
	},

	// methods
	#[error("method '{method}' is not a function")]
	NotAFunction {
		method: String,
	},

	#[error("method '{method}' is not a procedure")]
	NotAProcedure {
		method: String,
	},

	#[error("parameter '{name}' is not an output parameter")]
	NotAnOutput {
		name: String,
	},

	#[error("function '{method}' set no result")]
	MissingResult {
		method: String,
	},

	#[error("result type {found} is not compatible with the return type {declared} of '{method}'")]
	ResultTypeMismatch {
		method: String,
		declared: Type,
		found: Type,
	},

	#[error("output parameter '{name}' of '{method}' was not set")]
	MissingOutput {
		method: String,
		name: String,
	},

	#[error("output '{name}' type {found} is not compatible with the declared type {declared}")]
	OutputTypeMismatch {
		name: String,
		declared: Type,
		found: Type,
	},

	// engine invariants
	#[error("aggregate iteration produced no accumulated value")]
	NoAccumulatedValue,

	#[error("the aggregate merge output cannot be null")]
	NullMergeOutput,
}
