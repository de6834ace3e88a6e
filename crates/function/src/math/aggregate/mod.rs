// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

mod avg;
mod count;
mod max;
mod min;
mod sum;

pub use avg::Avg;
pub use count::Count;
pub use max::Max;
pub use min::Min;
pub use sum::Sum;
