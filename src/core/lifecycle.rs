//! Lifecycle guard
//!
//! Every resource is either `Active` or `Inactive` while it exists. Deletion
//! removes the record, so `Deleted` is terminal and never stored.
//!
//! ```text
//! Active   --disable--> Inactive
//! Inactive --enable---> Active
//! Active | Inactive --delete--> Deleted
//! ```
//!
//! This module has no dependency on storage, errors or identity so that
//! every service can compose it.

use serde::Serialize;
use std::fmt;

/// Stored lifecycle state of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Active,
    Inactive,
}

impl LifecycleState {
    pub fn from_active(is_active: bool) -> Self {
        if is_active {
            LifecycleState::Active
        } else {
            LifecycleState::Inactive
        }
    }
}

/// Operations a resource service performs on an existing resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Read,
    GetRelated,
    Update,
    Delete,
    Disable,
    Enable,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Read => "read",
            Operation::GetRelated => "list related resources of",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Disable => "disable",
            Operation::Enable => "enable",
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Operation::Update | Operation::Delete | Operation::Disable | Operation::Enable
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the guard rejected an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardFailure {
    NotFound,
    AlreadyDisabled,
    AlreadyEnabled,
}

/// State a storage write must still observe for the write to apply.
///
/// Repositories evaluate this in the same step as the write, which closes the
/// window between the guard check and the mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatePrecondition {
    Any,
    Active,
    Inactive,
}

impl StatePrecondition {
    pub fn admits(&self, is_active: bool) -> bool {
        match self {
            StatePrecondition::Any => true,
            StatePrecondition::Active => is_active,
            StatePrecondition::Inactive => !is_active,
        }
    }

    /// Value the `is_active` column must hold, if constrained.
    pub fn required_active(&self) -> Option<bool> {
        match self {
            StatePrecondition::Any => None,
            StatePrecondition::Active => Some(true),
            StatePrecondition::Inactive => Some(false),
        }
    }
}

/// Check sequence enforcing visibility and valid transitions
pub struct LifecycleGuard;

impl LifecycleGuard {
    /// Decide whether `operation` may proceed on a resource in `state`.
    ///
    /// `state` is `None` when the record does not exist. `privileged` is set
    /// for callers allowed to see inactive resources (admins); it only
    /// matters for `Delete`.
    pub fn check(
        operation: Operation,
        state: Option<LifecycleState>,
        privileged: bool,
    ) -> Result<LifecycleState, GuardFailure> {
        let state = state.ok_or(GuardFailure::NotFound)?;

        match (operation, state) {
            (Operation::Enable, LifecycleState::Active) => Err(GuardFailure::AlreadyEnabled),
            (Operation::Enable, LifecycleState::Inactive) => Ok(state),
            (Operation::Disable, LifecycleState::Inactive) => Err(GuardFailure::AlreadyDisabled),
            (Operation::Delete, LifecycleState::Inactive) if privileged => Ok(state),
            (_, LifecycleState::Inactive) => Err(GuardFailure::NotFound),
            (_, LifecycleState::Active) => Ok(state),
        }
    }

    /// Precondition the mutating write must carry for `operation`.
    pub fn precondition(operation: Operation, observed: LifecycleState) -> StatePrecondition {
        match operation {
            Operation::Enable => StatePrecondition::Inactive,
            Operation::Delete => match observed {
                LifecycleState::Active => StatePrecondition::Active,
                LifecycleState::Inactive => StatePrecondition::Inactive,
            },
            _ => StatePrecondition::Active,
        }
    }
}
