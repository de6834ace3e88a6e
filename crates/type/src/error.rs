// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use crate::value::Type;

#[derive(Debug, thiserror::Error)]
pub enum TypeError {
	#[error("cannot apply {operation} to {left} and {right}")]
	Incomparable {
		operation: &'static str,
		left: Type,
		right: Type,
	},

	#[error("{operation} requires a boolean operand, found {found}")]
	NotBoolean {
		operation: &'static str,
		found: Type,
	},

	#[error("cannot order {left} against {right}")]
	Unordered {
		left: Type,
		right: Type,
	},

	#[error("division by zero")]
	DivisionByZero,

	#[error("numeric overflow in {operation}")]
	NumericOverflow {
		operation: &'static str,
	},

	#[error("floating point value is not finite")]
	NotFinite,

	#[error("streamed value source failed: {0}")]
	Source(#[from] std::io::Error),

	#[error("streamed text is not valid utf-8")]
	InvalidUtf8,
}
