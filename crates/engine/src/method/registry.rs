// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use std::{collections::HashMap, sync::Arc};

use super::{Invoke, Method, MethodResolver};
use crate::Context;

/// A frozen, name-keyed method store.
///
/// The registry is built completely and then frozen, so concurrent first
/// use never races an initialization pass. Method names resolve
/// case-insensitively, per SQL routine naming.
pub struct MethodRegistry {
	methods: HashMap<String, Arc<dyn Method>>,
}

impl MethodRegistry {
	pub fn builder() -> MethodRegistryBuilder {
		MethodRegistryBuilder {
			methods: HashMap::new(),
		}
	}

	pub fn len(&self) -> usize {
		self.methods.len()
	}

	pub fn is_empty(&self) -> bool {
		self.methods.is_empty()
	}

	pub fn get(&self, name: &str) -> Option<Arc<dyn Method>> {
		self.methods.get(&name.to_ascii_uppercase()).cloned()
	}
}

impl MethodResolver for MethodRegistry {
	fn resolve_method(
		&self,
		_context: &Context<'_>,
		invoke: &Invoke,
	) -> Option<Arc<dyn Method>> {
		self.get(invoke.method())
	}
}

pub struct MethodRegistryBuilder {
	methods: HashMap<String, Arc<dyn Method>>,
}

impl MethodRegistryBuilder {
	pub fn register(mut self, method: Arc<dyn Method>) -> Self {
		self.methods.insert(
			method.info().name().to_ascii_uppercase(),
			method,
		);
		self
	}

	pub fn build(self) -> MethodRegistry {
		MethodRegistry {
			methods: self.methods,
		}
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use async_trait::async_trait;
	use strata_type::{Type, Value};

	use super::MethodRegistry;
	use crate::{
		Context, Invoke, Method, MethodContext, MethodInfo,
		MethodResolver, Result,
	};

	struct Answer {
		info: MethodInfo,
	}

	#[async_trait]
	impl Method for Answer {
		fn info(&self) -> &MethodInfo {
			&self.info
		}

		async fn execute(
			&self,
			context: &mut MethodContext<'_>,
		) -> Result<()> {
			context.set_result(Value::int8(42))
		}
	}

	fn registry() -> MethodRegistry {
		MethodRegistry::builder()
			.register(Arc::new(Answer {
				info: MethodInfo::function(
					"answer",
					Type::Int8,
				)
				.unwrap(),
			}))
			.build()
	}

	#[test]
	fn lookup_is_case_insensitive() {
		let registry = registry();
		let context = Context::root("test");

		assert!(registry
			.resolve_method(&context, &Invoke::new("ANSWER"))
			.is_some());
		assert!(registry
			.resolve_method(&context, &Invoke::new("Answer"))
			.is_some());
		assert!(registry
			.resolve_method(&context, &Invoke::new("unknown"))
			.is_none());
	}
}
