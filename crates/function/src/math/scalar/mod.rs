// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

mod abs;

pub use abs::Abs;
