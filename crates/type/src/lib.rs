// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod error;
pub mod value;

pub use error::TypeError;
pub use value::{
	Blob, ByteSource, Date, DateTime, Interval, OrderedF64, Text, Time,
	Type, Value,
};

pub type Result<T> = std::result::Result<T, TypeError>;
