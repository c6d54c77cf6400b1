//! # Domain Identity Newtypes
//!
//! Newtype wrappers for all record identifiers in the compliance stack.
//! These prevent accidental identifier confusion — you cannot pass a
//! `TodoId` where a `SubmissionId` is expected, so a to-do's back
//! reference can never be crossed with its own id.
//!
//! Every read and write in the stack is scoped by an explicit `UserId`;
//! making it a distinct type keeps that scoping visible in signatures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a user account. All submissions and to-do items
/// are owned by exactly one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

/// Unique identifier for a compliance submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub Uuid);

/// Unique identifier for a to-do item (task or flagged item).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TodoId(pub Uuid);

/// Unique identifier for a compliance account type (reference data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountTypeId(pub Uuid);

/// Unique identifier for a resource guide (reference data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(pub Uuid);

macro_rules! impl_id {
    ($name:ident, $prefix:literal) => {
        impl $name {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

impl_id!(UserId, "user");
impl_id!(SubmissionId, "submission");
impl_id!(TodoId, "todo");
impl_id!(AccountTypeId, "account-type");
impl_id!(ResourceId, "resource");
