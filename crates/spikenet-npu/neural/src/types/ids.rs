// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Entity identifiers and the simulation step type

use core::fmt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Simulation time step index. Owned and advanced by a backend.
pub type Step = u64;

/// 128-bit unique identifier for populations, projections, endpoints and
/// external input channels.
///
/// Created from UUID v7, so identifiers sort by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(Uuid);

impl Uid {
    /// Create a fresh identifier
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// All-zero identifier, only meaningful as a placeholder
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for Uid {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for Uid {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uids_are_unique_and_ordered() {
        let a = Uid::new();
        let b = Uid::new();
        assert_ne!(a, b);
        assert!(a < b);
        assert!(!a.is_nil());
        assert!(Uid::nil().is_nil());
    }

    #[test]
    fn test_uid_serializes_as_plain_uuid() {
        let uid = Uid::new();
        let json = serde_json::to_string(&uid).unwrap();
        assert_eq!(json, format!("\"{}\"", uid));
        let back: Uid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, uid);
    }
}
