// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

pub const ENV_PREFIX: &str = "GITAUTH_OPERATOR";
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
