/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The crate's one ordinary error type (§7).
//!
//! Absent keys on `get`/`delete` are not errors (`Option::None` / identity
//! return, respectively). Invariant violations reached during descent are
//! programmer errors and are raised as panics, never as an `Error` value —
//! see the `debug_assert!`/`unreachable!` call sites in `bitmap_node.rs`,
//! `collision_node.rs` and `node.rs`.

use core::fmt;

use crate::config::ConfigError;

/// The crate's ordinary (non-fatal) error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Indexed access (e.g. `Index::index`) found no entry for the given
    /// key. `get`, `contains_key` and `delete` do not use this variant;
    /// they signal absence through `Option`/identity instead (§7).
    KeyNotFound,
    /// Construction of a [`crate::Config`] was rejected (§6.1).
    InvalidConfig(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyNotFound => write!(f, "no entry found for key"),
            Error::InvalidConfig(e) => write!(f, "invalid trie configuration: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidConfig(e) => Some(e),
            Error::KeyNotFound => None,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Error {
        Error::InvalidConfig(e)
    }
}
