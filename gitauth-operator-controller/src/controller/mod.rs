// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

pub mod context;
pub mod stack;
pub mod utils;
