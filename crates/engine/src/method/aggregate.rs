// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

//! The aggregate accumulation protocol: initialize, iterate once per
//! group row in index order, merge once at the end.

use std::sync::Arc;

use async_trait::async_trait;
use strata_type::{Type, Value};
use tracing::debug;

use super::{Method, MethodContext, MethodInfo};
use crate::{Error, Expression, Result};

/// Row-indexed access to a logical row group, supplied by the table or
/// query layer. The protocol is defined purely in terms of this surface
/// and is storage-agnostic.
pub trait GroupResolver: Send + Sync {
	fn size(&self) -> usize;

	/// A reference resolver scoped to one row of the group.
	fn resolver(&self, row: usize) -> Arc<dyn ReferenceResolver>;

	fn resolve_reference(&self, name: &str, row: usize) -> Option<Value>;
}

/// Resolves a column or field name to a value for the current row.
pub trait ReferenceResolver: Send + Sync {
	fn resolve_reference(&self, name: &str) -> Option<Value>;

	fn type_of(&self, name: &str) -> Option<Type>;
}

/// The seed phase. The implementation may replace the input expression
/// and may skip iteration entirely, in which case the input becomes the
/// result directly.
pub struct InitializeContext {
	input: Expression,
	iterate: bool,
}

impl InitializeContext {
	fn new(input: Expression) -> Self {
		Self {
			input,
			iterate: true,
		}
	}

	pub fn input(&self) -> &Expression {
		&self.input
	}

	pub fn set_input(&mut self, input: Expression) {
		self.input = input;
	}

	pub fn skip_iteration(&mut self) {
		self.iterate = false;
	}

	fn into_parts(self) -> (Expression, bool) {
		(self.input, self.iterate)
	}
}

/// One accumulation step: the running value (none before row 0) and the
/// current row's contribution. The implementation must leave a result.
pub struct IterateContext {
	accumulated: Option<Value>,
	current: Value,
	result: Option<Value>,
}

impl IterateContext {
	fn new(accumulated: Option<Value>, current: Value) -> Self {
		Self {
			accumulated,
			current,
			result: None,
		}
	}

	pub fn accumulated(&self) -> Option<&Value> {
		self.accumulated.as_ref()
	}

	pub fn current(&self) -> &Value {
		&self.current
	}

	pub fn set_result(&mut self, result: Value) {
		self.result = Some(result);
	}
}

/// The final phase; may override the accumulated value.
pub struct MergeContext {
	accumulated: Value,
	rows: usize,
	output: Option<Value>,
}

impl MergeContext {
	fn new(accumulated: Value, rows: usize) -> Self {
		Self {
			accumulated,
			rows,
			output: None,
		}
	}

	pub fn accumulated(&self) -> &Value {
		&self.accumulated
	}

	/// The size of the group that was accumulated.
	pub fn rows(&self) -> usize {
		self.rows
	}

	pub fn set_output(&mut self, output: Value) -> Result<()> {
		if output.is_null() {
			return Err(Error::NullMergeOutput);
		}
		self.output = Some(output);
		Ok(())
	}

	fn into_output(self) -> Value {
		self.output.unwrap_or(self.accumulated)
	}
}

/// An aggregate function, accumulated over a row group by the framework.
#[async_trait]
pub trait Aggregate: Send + Sync {
	fn info(&self) -> &MethodInfo;

	async fn initialize(
		&self,
		_context: &mut InitializeContext,
	) -> Result<()> {
		Ok(())
	}

	async fn iterate(&self, context: &mut IterateContext) -> Result<()>;

	async fn merge(&self, _context: &mut MergeContext) -> Result<()> {
		Ok(())
	}
}

/// Every aggregate executes as a method through the group protocol.
#[async_trait]
impl<T: Aggregate> Method for T {
	fn info(&self) -> &MethodInfo {
		Aggregate::info(self)
	}

	async fn execute(&self, context: &mut MethodContext<'_>) -> Result<()> {
		let info = Aggregate::info(self);
		let group = context
			.context()
			.resolve::<Arc<dyn GroupResolver>>()
			.ok_or_else(|| Error::NoGroupResolver {
				method: info.name().to_string(),
			})?;

		let return_type = info.return_type().ok_or_else(|| {
			Error::NotAFunction {
				method: info.name().to_string(),
			}
		})?;

		debug!(
			method = info.name(),
			rows = group.size(),
			"executing aggregate"
		);

		// an empty group aggregates to a typed null, no phase runs
		if group.size() == 0 {
			return context
				.set_result(Value::null_of(return_type));
		}

		let mut seed =
			InitializeContext::new(context.argument_at(0)?.clone());
		self.initialize(&mut seed).await?;
		let (input, iterate) = seed.into_parts();

		if !iterate {
			return context.set_result_expression(input);
		}

		let accumulated = match &input {
			Expression::Reference(reference) => {
				accumulate_reference(
					self,
					reference.name(),
					group.as_ref(),
				)
				.await?
			}
			input => {
				accumulate_values(
					self,
					context,
					input,
					group.as_ref(),
				)
				.await?
			}
		};

		let mut merge =
			MergeContext::new(accumulated, group.size());
		self.merge(&mut merge).await?;

		context.set_result(merge.into_output())
	}
}

/// Fast path: the input is a bare column reference, so each row's value
/// comes straight from the group resolver.
async fn accumulate_reference<T: Aggregate + ?Sized>(
	aggregate: &T,
	name: &str,
	group: &dyn GroupResolver,
) -> Result<Value> {
	let mut accumulated = None;
	for row in 0..group.size() {
		let current = group
			.resolve_reference(name, row)
			.unwrap_or(Value::Unknown);
		accumulated = Some(
			run_iterate(aggregate, accumulated.take(), current)
				.await?,
		);
	}
	accumulated.ok_or(Error::NoAccumulatedValue)
}

/// General path: reduce the input expression once per row inside a scope
/// that resolves references against that row.
async fn accumulate_values<T: Aggregate + ?Sized>(
	aggregate: &T,
	context: &MethodContext<'_>,
	input: &Expression,
	group: &dyn GroupResolver,
) -> Result<Value> {
	let mut accumulated = None;
	for row in 0..group.size() {
		let current = {
			let scope = context.context().child("reduce");
			scope.register(group.resolver(row));

			let reduced = input.reduce_async(&scope).await?;
			match reduced.as_constant() {
				Some(value) => value.clone(),
				None => {
					return Err(Error::NotConstant {
						side: "aggregate input",
					});
				}
			}
		};
		accumulated = Some(
			run_iterate(aggregate, accumulated.take(), current)
				.await?,
		);
	}
	accumulated.ok_or(Error::NoAccumulatedValue)
}

async fn run_iterate<T: Aggregate + ?Sized>(
	aggregate: &T,
	accumulated: Option<Value>,
	current: Value,
) -> Result<Value> {
	let mut step = IterateContext::new(accumulated, current);
	aggregate.iterate(&mut step).await?;
	// an iterate step that leaves no accumulator is a defect in the
	// aggregate, not a domain null
	step.result.ok_or(Error::NoAccumulatedValue)
}

#[cfg(test)]
mod tests {
	use std::sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	};

	use async_trait::async_trait;
	use strata_type::{Type, Value};

	use super::{
		Aggregate, GroupResolver, InitializeContext, IterateContext,
		MergeContext, ReferenceResolver,
	};
	use crate::{
		Context, Error, Expression, Invoke, InvokeArgument, Method,
		MethodInfo, ParameterInfo, Result,
	};

	struct TestGroup {
		column: &'static str,
		rows: Vec<i64>,
	}

	impl GroupResolver for TestGroup {
		fn size(&self) -> usize {
			self.rows.len()
		}

		fn resolver(&self, row: usize) -> Arc<dyn ReferenceResolver> {
			Arc::new(TestRow {
				column: self.column,
				value: self.rows[row],
			})
		}

		fn resolve_reference(
			&self,
			name: &str,
			row: usize,
		) -> Option<Value> {
			(name == self.column)
				.then(|| Value::int8(self.rows[row]))
		}
	}

	struct TestRow {
		column: &'static str,
		value: i64,
	}

	impl ReferenceResolver for TestRow {
		fn resolve_reference(&self, name: &str) -> Option<Value> {
			(name == self.column).then(|| Value::int8(self.value))
		}

		fn type_of(&self, name: &str) -> Option<Type> {
			(name == self.column).then_some(Type::Int8)
		}
	}

	struct ProbeSum {
		info: MethodInfo,
		initialized: AtomicUsize,
		iterated: AtomicUsize,
		merged: AtomicUsize,
	}

	impl ProbeSum {
		fn new() -> Self {
			Self {
				info: MethodInfo::function("sum", Type::Int8)
					.unwrap()
					.with_parameter(
						ParameterInfo::new(
							"input",
							Type::Int8,
						)
						.unwrap(),
					)
					.unwrap(),
				initialized: AtomicUsize::new(0),
				iterated: AtomicUsize::new(0),
				merged: AtomicUsize::new(0),
			}
		}
	}

	#[async_trait]
	impl Aggregate for ProbeSum {
		fn info(&self) -> &MethodInfo {
			&self.info
		}

		async fn initialize(
			&self,
			_context: &mut InitializeContext,
		) -> Result<()> {
			self.initialized.fetch_add(1, Ordering::SeqCst);
			Ok(())
		}

		async fn iterate(
			&self,
			context: &mut IterateContext,
		) -> Result<()> {
			self.iterated.fetch_add(1, Ordering::SeqCst);
			let accumulated = context
				.accumulated()
				.cloned()
				.unwrap_or(Value::int8(0));
			let result = accumulated.add(context.current())?;
			context.set_result(result);
			Ok(())
		}

		async fn merge(
			&self,
			_context: &mut MergeContext,
		) -> Result<()> {
			self.merged.fetch_add(1, Ordering::SeqCst);
			Ok(())
		}
	}

	fn invoke_on(column: &str) -> Invoke {
		Invoke::new("sum")
			.with_argument(InvokeArgument::positional(
				Expression::reference(column),
			))
			.unwrap()
	}

	fn register_group(context: &Context<'_>, rows: Vec<i64>) {
		let group: Arc<dyn GroupResolver> = Arc::new(TestGroup {
			column: "n",
			rows,
		});
		context.register(group);
	}

	#[tokio::test]
	async fn missing_group_resolver_is_fatal() {
		let context = Context::root("test");
		let sum = ProbeSum::new();

		let result = sum
			.execute_invoke(&context, &invoke_on("n"))
			.await;
		assert!(matches!(
			result,
			Err(Error::NoGroupResolver { .. })
		));
	}

	#[tokio::test]
	async fn empty_group_yields_typed_null_without_any_phase() {
		let context = Context::root("test");
		register_group(&context, vec![]);
		let sum = ProbeSum::new();

		let result = sum
			.execute_invoke(&context, &invoke_on("n"))
			.await
			.unwrap();

		let value = result.returned_value().unwrap();
		assert!(value.is_null());
		assert_eq!(value.get_type(), Type::Int8);
		assert_eq!(sum.initialized.load(Ordering::SeqCst), 0);
		assert_eq!(sum.iterated.load(Ordering::SeqCst), 0);
		assert_eq!(sum.merged.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn sum_accumulates_in_row_order() {
		let context = Context::root("test");
		register_group(&context, vec![23, 54, 23]);
		let sum = ProbeSum::new();

		let result = sum
			.execute_invoke(&context, &invoke_on("n"))
			.await
			.unwrap();

		assert_eq!(
			result.returned_value(),
			Some(&Value::int8(100))
		);
		assert_eq!(sum.initialized.load(Ordering::SeqCst), 1);
		assert_eq!(sum.iterated.load(Ordering::SeqCst), 3);
		assert_eq!(sum.merged.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn general_input_reduces_per_row() {
		let context = Context::root("test");
		register_group(&context, vec![23, 54, 23]);
		let sum = ProbeSum::new();

		// n * 2 is not a bare reference, so each row reduces the
		// expression against a row-scoped resolver
		let invoke = Invoke::new("sum")
			.with_argument(InvokeArgument::positional(
				Expression::binary(
					crate::BinaryOperator::Multiply,
					Expression::reference("n"),
					Expression::constant(Value::int8(2)),
				),
			))
			.unwrap();

		let result = sum
			.execute_invoke(&context, &invoke)
			.await
			.unwrap();
		assert_eq!(
			result.returned_value(),
			Some(&Value::int8(200))
		);
	}

	struct SeedOnly {
		info: MethodInfo,
	}

	#[async_trait]
	impl Aggregate for SeedOnly {
		fn info(&self) -> &MethodInfo {
			&self.info
		}

		async fn initialize(
			&self,
			context: &mut InitializeContext,
		) -> Result<()> {
			context.set_input(Expression::constant(Value::int8(
				-1,
			)));
			context.skip_iteration();
			Ok(())
		}

		async fn iterate(
			&self,
			_context: &mut IterateContext,
		) -> Result<()> {
			unreachable!("iteration was skipped")
		}
	}

	#[tokio::test]
	async fn initialize_may_replace_input_and_skip_iteration() {
		let context = Context::root("test");
		register_group(&context, vec![1, 2, 3]);
		let aggregate = SeedOnly {
			info: MethodInfo::function("seed", Type::Int8)
				.unwrap()
				.with_parameter(
					ParameterInfo::new(
						"input",
						Type::Int8,
					)
					.unwrap(),
				)
				.unwrap(),
		};

		let result = aggregate
			.execute_invoke(&context, &invoke_on("n"))
			.await
			.unwrap();
		assert_eq!(
			result.returned_value(),
			Some(&Value::int8(-1))
		);
	}

	struct Forgetful {
		info: MethodInfo,
	}

	#[async_trait]
	impl Aggregate for Forgetful {
		fn info(&self) -> &MethodInfo {
			&self.info
		}

		async fn iterate(
			&self,
			_context: &mut IterateContext,
		) -> Result<()> {
			// leaves no accumulated value
			Ok(())
		}
	}

	#[tokio::test]
	async fn iterate_without_result_is_an_engine_error() {
		let context = Context::root("test");
		register_group(&context, vec![1]);
		let aggregate = Forgetful {
			info: MethodInfo::function("broken", Type::Int8)
				.unwrap()
				.with_parameter(
					ParameterInfo::new(
						"input",
						Type::Int8,
					)
					.unwrap(),
				)
				.unwrap(),
		};

		let result = aggregate
			.execute_invoke(&context, &invoke_on("n"))
			.await;
		assert!(matches!(
			result,
			Err(Error::NoAccumulatedValue)
		));
	}
}
