//! Fetch and mutation status shared between the state machine and the UI.

use crate::models::entity::EntityId;

/// Lifecycle of the canonical collection's current fetch context.
///
/// `Error` keeps the previous items visible; only the banner changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

/// What a mutation does to its target resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

/// Transient state of one in-flight or recently failed mutation.
///
/// Created when the mutation starts; dropped on success, or kept with its
/// error after a failure until the UI acknowledges it.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRecord {
    pub kind: MutationKind,
    pub target: Option<EntityId>,
    pub submitting: bool,
    pub error: Option<String>,
}

impl MutationRecord {
    pub(crate) fn started(kind: MutationKind, target: Option<EntityId>) -> Self {
        Self {
            kind,
            target,
            submitting: true,
            error: None,
        }
    }
}
