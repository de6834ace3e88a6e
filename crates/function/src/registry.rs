// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use std::sync::{Arc, OnceLock};

use strata_engine::MethodRegistry;

use crate::{
	math::{
		aggregate::{Avg, Count, Max, Min, Sum},
		scalar::Abs,
	},
	text::{Concat, Lower, Upper},
};

static BUILTIN: OnceLock<Arc<MethodRegistry>> = OnceLock::new();

/// The built-in method registry.
///
/// Built completely on first use and frozen from then on; concurrent
/// first callers all observe the same single initialization.
pub fn registry() -> Arc<MethodRegistry> {
	BUILTIN.get_or_init(|| {
		Arc::new(
			MethodRegistry::builder()
				.register(Arc::new(Avg::new()))
				.register(Arc::new(Count::new()))
				.register(Arc::new(Max::new()))
				.register(Arc::new(Min::new()))
				.register(Arc::new(Sum::new()))
				.register(Arc::new(Abs::new()))
				.register(Arc::new(Concat::new()))
				.register(Arc::new(Lower::new()))
				.register(Arc::new(Upper::new()))
				.build(),
		)
	})
	.clone()
}
