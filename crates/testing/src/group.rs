// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use std::sync::Arc;

use strata_engine::{GroupResolver, ReferenceResolver};
use strata_type::{Type, Value};

/// An in-memory row group over named columns.
///
/// ```
/// use strata_testing::FixtureGroup;
/// use strata_type::Value;
///
/// let group = FixtureGroup::new(["n"])
/// 	.row([Value::int8(23)])
/// 	.row([Value::int8(54)])
/// 	.row([Value::int8(23)]);
/// ```
#[derive(Clone)]
pub struct FixtureGroup {
	columns: Arc<Vec<String>>,
	rows: Vec<Arc<Vec<Value>>>,
}

impl FixtureGroup {
	pub fn new<const N: usize>(columns: [&str; N]) -> Self {
		Self {
			columns: Arc::new(
				columns.iter()
					.map(|name| name.to_string())
					.collect(),
			),
			rows: Vec::new(),
		}
	}

	pub fn row<const N: usize>(mut self, values: [Value; N]) -> Self {
		assert_eq!(
			values.len(),
			self.columns.len(),
			"row width must match the declared columns"
		);
		self.rows.push(Arc::new(values.into_iter().collect()));
		self
	}

	fn column_index(&self, name: &str) -> Option<usize> {
		self.columns.iter().position(|column| column == name)
	}
}

impl GroupResolver for FixtureGroup {
	fn size(&self) -> usize {
		self.rows.len()
	}

	fn resolver(&self, row: usize) -> Arc<dyn ReferenceResolver> {
		Arc::new(FixtureRow {
			columns: self.columns.clone(),
			values: self.rows[row].clone(),
		})
	}

	fn resolve_reference(&self, name: &str, row: usize) -> Option<Value> {
		let index = self.column_index(name)?;
		self.rows.get(row).map(|values| values[index].clone())
	}
}

/// One row of a [`FixtureGroup`], exposed as a reference resolver.
pub struct FixtureRow {
	columns: Arc<Vec<String>>,
	values: Arc<Vec<Value>>,
}

impl ReferenceResolver for FixtureRow {
	fn resolve_reference(&self, name: &str) -> Option<Value> {
		let index = self
			.columns
			.iter()
			.position(|column| column == name)?;
		self.values.get(index).cloned()
	}

	fn type_of(&self, name: &str) -> Option<Type> {
		self.resolve_reference(name)
			.map(|value| value.get_type())
	}
}

#[cfg(test)]
mod tests {
	use strata_engine::GroupResolver;
	use strata_type::Value;

	use super::FixtureGroup;

	#[test]
	fn resolves_by_column_and_row() {
		let group = FixtureGroup::new(["a", "b"])
			.row([Value::int8(1), Value::utf8("x")])
			.row([Value::int8(2), Value::utf8("y")]);

		assert_eq!(group.size(), 2);
		assert_eq!(
			group.resolve_reference("b", 1),
			Some(Value::utf8("y"))
		);
		assert_eq!(group.resolve_reference("missing", 0), None);

		let row = group.resolver(0);
		assert_eq!(
			row.resolve_reference("a"),
			Some(Value::int8(1))
		);
	}
}
