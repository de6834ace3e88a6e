// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

use std::{
	cmp::Ordering,
	fmt::{Debug, Display, Formatter},
	sync::Arc,
};

use serde::{Deserialize, Serialize, Serializer};

use super::bytes::{ByteSource, cmp_readers, copy_into};
use crate::{Result, TypeError};

/// A UTF-8 text value.
///
/// Small values are held inline; large values may wrap any [`ByteSource`]
/// whose bytes are valid UTF-8. Concatenating two inline values copies
/// contiguous memory; as soon as one side is streamed the copy goes through
/// a bounded buffer instead of materializing the operand.
#[derive(Clone)]
pub enum Text {
	Inline(String),
	Streamed(Arc<dyn ByteSource>),
}

impl Text {
	pub fn inline(value: impl Into<String>) -> Self {
		Text::Inline(value.into())
	}

	pub fn streamed(source: Arc<dyn ByteSource>) -> Self {
		Text::Streamed(source)
	}

	pub fn len(&self) -> u64 {
		match self {
			Text::Inline(value) => value.len() as u64,
			Text::Streamed(source) => source.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Text::Inline(value) => Some(value),
			Text::Streamed(_) => None,
		}
	}

	/// Reads the whole value into an owned string.
	pub fn materialize(&self) -> Result<String> {
		match self {
			Text::Inline(value) => Ok(value.clone()),
			Text::Streamed(source) => {
				let mut out = Vec::with_capacity(
					source.len() as usize,
				);
				copy_into(&mut *source.open()?, &mut out)?;
				String::from_utf8(out)
					.map_err(|_| TypeError::InvalidUtf8)
			}
		}
	}

	pub fn concat(&self, other: &Text) -> Result<Text> {
		if let (Text::Inline(left), Text::Inline(right)) = (self, other)
		{
			let mut out = String::with_capacity(
				left.len() + right.len(),
			);
			out.push_str(left);
			out.push_str(right);
			return Ok(Text::Inline(out));
		}

		let mut out =
			Vec::with_capacity((self.len() + other.len()) as usize);
		self.copy_to(&mut out)?;
		other.copy_to(&mut out)?;
		String::from_utf8(out)
			.map(Text::Inline)
			.map_err(|_| TypeError::InvalidUtf8)
	}

	pub fn compare(&self, other: &Text) -> Result<Ordering> {
		if let (Some(left), Some(right)) =
			(self.as_str(), other.as_str())
		{
			return Ok(left.cmp(right));
		}
		// utf-8 byte order agrees with code point order
		let mut left = self.reader()?;
		let mut right = other.reader()?;
		Ok(cmp_readers(&mut *left, &mut *right)?)
	}

	fn copy_to(&self, out: &mut Vec<u8>) -> Result<()> {
		match self {
			Text::Inline(value) => {
				out.extend_from_slice(value.as_bytes());
				Ok(())
			}
			Text::Streamed(source) => {
				copy_into(&mut *source.open()?, out)?;
				Ok(())
			}
		}
	}

	fn reader(&self) -> Result<Box<dyn std::io::Read + '_>> {
		match self {
			Text::Inline(value) => {
				Ok(Box::new(value.as_bytes()))
			}
			Text::Streamed(source) => Ok(source.open()?),
		}
	}
}

impl From<&str> for Text {
	fn from(value: &str) -> Self {
		Text::Inline(value.to_string())
	}
}

impl From<String> for Text {
	fn from(value: String) -> Self {
		Text::Inline(value)
	}
}

impl PartialEq for Text {
	fn eq(&self, other: &Self) -> bool {
		if self.len() != other.len() {
			return false;
		}
		matches!(self.compare(other), Ok(Ordering::Equal))
	}
}

impl Eq for Text {}

impl std::hash::Hash for Text {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.len().hash(state);
	}
}

impl Debug for Text {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Text::Inline(value) => {
				f.debug_tuple("Inline").field(value).finish()
			}
			Text::Streamed(source) => f
				.debug_struct("Streamed")
				.field("len", &source.len())
				.finish(),
		}
	}
}

impl Display for Text {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Text::Inline(value) => f.write_str(value),
			Text::Streamed(_) => match self.materialize() {
				Ok(value) => f.write_str(&value),
				Err(_) => f.write_str("<stream>"),
			},
		}
	}
}

impl Serialize for Text {
	fn serialize<S: Serializer>(
		&self,
		serializer: S,
	) -> std::result::Result<S::Ok, S::Error> {
		match self.materialize() {
			Ok(value) => serializer.serialize_str(&value),
			Err(err) => Err(serde::ser::Error::custom(err)),
		}
	}
}

impl<'de> Deserialize<'de> for Text {
	fn deserialize<D: serde::Deserializer<'de>>(
		deserializer: D,
	) -> std::result::Result<Self, D::Error> {
		Ok(Text::Inline(String::deserialize(deserializer)?))
	}
}
