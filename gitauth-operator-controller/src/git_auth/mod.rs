// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

//! Resolution of declarative git authentication into concrete credentials.
//!
//! [`selector::SelectorResolver`] reads single values out of Secrets, files and
//! environment variables. [`assembler::GitAuthSession`] drives it for either
//! the structured `gitAuth` config or the legacy `gitAuthSecret` and produces a
//! [`types::GitAuth`] bundle for the git client.

pub mod assembler;
pub mod error;
pub mod fetcher;
pub mod selector;
pub mod types;

pub use assembler::GitAuthSession;
pub use error::{GitAuthError, GitAuthResult};
pub use fetcher::SecretFetcher;
pub use types::{GitAuth, GitAuthField, GitAuthMethod, GitAuthSource};
