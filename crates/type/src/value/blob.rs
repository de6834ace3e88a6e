// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use std::{
	cmp::Ordering,
	fmt::{Debug, Display, Formatter},
	sync::Arc,
};

use serde::{Deserialize, Serialize, Serializer};

use super::bytes::{ByteSource, cmp_readers, copy_into};
use crate::Result;

/// A binary large object behind the same source surface as [`super::Text`].
#[derive(Clone)]
pub enum Blob {
	Inline(Vec<u8>),
	Streamed(Arc<dyn ByteSource>),
}

impl Blob {
	pub fn inline(bytes: impl Into<Vec<u8>>) -> Self {
		Blob::Inline(bytes.into())
	}

	pub fn streamed(source: Arc<dyn ByteSource>) -> Self {
		Blob::Streamed(source)
	}

	pub fn len(&self) -> u64 {
		match self {
			Blob::Inline(bytes) => bytes.len() as u64,
			Blob::Streamed(source) => source.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			Blob::Inline(bytes) => Some(bytes),
			Blob::Streamed(_) => None,
		}
	}

	pub fn materialize(&self) -> Result<Vec<u8>> {
		match self {
			Blob::Inline(bytes) => Ok(bytes.clone()),
			Blob::Streamed(source) => {
				let mut out = Vec::with_capacity(
					source.len() as usize,
				);
				copy_into(&mut *source.open()?, &mut out)?;
				Ok(out)
			}
		}
	}

	pub fn concat(&self, other: &Blob) -> Result<Blob> {
		let mut out =
			Vec::with_capacity((self.len() + other.len()) as usize);
		self.copy_to(&mut out)?;
		other.copy_to(&mut out)?;
		Ok(Blob::Inline(out))
	}

	pub fn compare(&self, other: &Blob) -> Result<Ordering> {
		if let (Some(left), Some(right)) =
			(self.as_bytes(), other.as_bytes())
		{
			return Ok(left.cmp(right));
		}
		let mut left = self.reader()?;
		let mut right = other.reader()?;
		Ok(cmp_readers(&mut *left, &mut *right)?)
	}

	fn copy_to(&self, out: &mut Vec<u8>) -> Result<()> {
		match self {
			Blob::Inline(bytes) => {
				out.extend_from_slice(bytes);
				Ok(())
			}
			Blob::Streamed(source) => {
				copy_into(&mut *source.open()?, out)?;
				Ok(())
			}
		}
	}

	fn reader(&self) -> Result<Box<dyn std::io::Read + '_>> {
		match self {
			Blob::Inline(bytes) => Ok(Box::new(bytes.as_slice())),
			Blob::Streamed(source) => Ok(source.open()?),
		}
	}
}

impl From<&[u8]> for Blob {
	fn from(bytes: &[u8]) -> Self {
		Blob::Inline(bytes.to_vec())
	}
}

impl From<Vec<u8>> for Blob {
	fn from(bytes: Vec<u8>) -> Self {
		Blob::Inline(bytes)
	}
}

impl PartialEq for Blob {
	fn eq(&self, other: &Self) -> bool {
		if self.len() != other.len() {
			return false;
		}
		matches!(self.compare(other), Ok(Ordering::Equal))
	}
}

impl Eq for Blob {}

impl std::hash::Hash for Blob {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.len().hash(state);
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Blob::Inline(bytes) => f
				.debug_struct("Inline")
				.field("len", &bytes.len())
				.finish(),
			Blob::Streamed(source) => f
				.debug_struct("Streamed")
				.field("len", &source.len())
				.finish(),
		}
	}
}

impl Display for Blob {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "blob({} bytes)", self.len())
	}
}

impl Serialize for Blob {
	fn serialize<S: Serializer>(
		&self,
		serializer: S,
	) -> std::result::Result<S::Ok, S::Error> {
		match self.materialize() {
			Ok(bytes) => serializer.serialize_bytes(&bytes),
			Err(err) => Err(serde::ser::Error::custom(err)),
		}
	}
}

impl<'de> Deserialize<'de> for Blob {
	fn deserialize<D: serde::Deserializer<'de>>(
		deserializer: D,
	) -> std::result::Result<Self, D::Error> {
		Ok(Blob::Inline(Vec::<u8>::deserialize(deserializer)?))
	}
}

#[cfg(test)]
mod tests {
	use super::Blob;

	#[test]
	fn concat_inline() {
		let result = Blob::inline(vec![1u8, 2])
			.concat(&Blob::inline(vec![3u8]))
			.unwrap();
		assert_eq!(result.as_bytes(), Some(&[1u8, 2, 3][..]));
	}

	#[test]
	fn compare_by_content() {
		let left = Blob::inline(vec![1u8, 2]);
		let right = Blob::inline(vec![1u8, 3]);
		assert_eq!(
			left.compare(&right).unwrap(),
			std::cmp::Ordering::Less
		);
		assert_ne!(left, right);
	}
}
