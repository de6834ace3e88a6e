// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

//! A hierarchical execution scope.
//!
//! Contexts form a parent-pointing chain: a child borrows its parent, so a
//! scope can never outlive the unit of work that opened it, and dropping a
//! context releases exactly its own registrations. Lookups search the local
//! scope first and fall through to ancestors.

use std::{
	any::{Any, TypeId},
	collections::HashMap,
	sync::RwLock,
};

type ServiceKey = (TypeId, Option<String>);

struct BoxedValue {
	value: Box<dyn Any + Send + Sync>,
}

impl BoxedValue {
	fn new<T: Clone + Any + Send + Sync>(value: T) -> Self {
		Self {
			value: Box::new(value),
		}
	}

	fn value<T: Clone + Any + Send + Sync>(&self) -> Option<T> {
		self.value.downcast_ref::<T>().cloned()
	}
}

pub struct Context<'a> {
	name: String,
	parent: Option<&'a Context<'a>>,
	scope: RwLock<HashMap<ServiceKey, BoxedValue>>,
	values: RwLock<HashMap<String, BoxedValue>>,
}

impl Context<'static> {
	pub fn root(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			parent: None,
			scope: RwLock::new(HashMap::new()),
			values: RwLock::new(HashMap::new()),
		}
	}
}

impl<'a> Context<'a> {
	/// Opens a child scope. The child sees everything the parent sees
	/// until it shadows an entry locally.
	pub fn child<'b>(&'b self, name: impl Into<String>) -> Context<'b> {
		Context {
			name: name.into(),
			parent: Some(self),
			scope: RwLock::new(HashMap::new()),
			values: RwLock::new(HashMap::new()),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn parent(&self) -> Option<&Context<'a>> {
		self.parent
	}

	/// Registers a service in the local scope only, shadowing but never
	/// replacing a same-keyed ancestor entry.
	pub fn register<T: Clone + Any + Send + Sync>(&self, service: T) {
		self.scope
			.write()
			.unwrap()
			.insert((TypeId::of::<T>(), None), BoxedValue::new(service));
	}

	pub fn register_named<T: Clone + Any + Send + Sync>(
		&self,
		name: impl Into<String>,
		service: T,
	) {
		self.scope.write().unwrap().insert(
			(TypeId::of::<T>(), Some(name.into())),
			BoxedValue::new(service),
		);
	}

	/// Finds the nearest registration of `T`, walking from this scope to
	/// the root. Absence is not an error at this layer.
	pub fn resolve<T: Clone + Any + Send + Sync>(&self) -> Option<T> {
		self.resolve_key((TypeId::of::<T>(), None))
	}

	pub fn resolve_named<T: Clone + Any + Send + Sync>(
		&self,
		name: &str,
	) -> Option<T> {
		self.resolve_key((TypeId::of::<T>(), Some(name.to_string())))
	}

	fn resolve_key<T: Clone + Any + Send + Sync>(
		&self,
		key: ServiceKey,
	) -> Option<T> {
		let mut current = Some(self);
		while let Some(context) = current {
			let found = context
				.scope
				.read()
				.unwrap()
				.get(&key)
				.and_then(BoxedValue::value::<T>);
			if found.is_some() {
				return found;
			}
			current = context.parent;
		}
		None
	}

	/// Sets an ambient value in the local scope.
	pub fn set_value<T: Clone + Any + Send + Sync>(
		&self,
		key: impl Into<String>,
		value: T,
	) {
		self.values
			.write()
			.unwrap()
			.insert(key.into(), BoxedValue::new(value));
	}

	/// Reads an ambient value, falling back to the parent chain and then
	/// to the supplied default.
	pub fn get_value<T: Clone + Any + Send + Sync>(
		&self,
		key: &str,
		default: T,
	) -> T {
		let mut current = Some(self);
		while let Some(context) = current {
			let found = context
				.values
				.read()
				.unwrap()
				.get(key)
				.and_then(BoxedValue::value::<T>);
			if let Some(value) = found {
				return value;
			}
			current = context.parent;
		}
		default
	}
}
