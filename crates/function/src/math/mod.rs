// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 strata

pub mod aggregate;
pub mod scalar;
