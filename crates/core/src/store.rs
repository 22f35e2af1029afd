//! Collaborator contracts for the representative relationship manager.
//!
//! The manager never talks to storage or to downstream services directly; it
//! is constructed with explicit handles to these four seams (no hidden global
//! registry). Each contract is an object-safe async trait so callers can
//! inject a database-backed implementation, the in-memory reference
//! implementation from [`crate::memory`], or a test double.

use crate::error::RepresentativesResult;
use crate::model::{
    GeneratePendingActions, NewRepresentation, PendingAction, Representation, User,
};
use async_trait::async_trait;
use prm_types::Identity;
use uuid::Uuid;

/// Persistence contract for representation records.
///
/// There is deliberately no physical-deletion method: deletion in this system
/// is always logical, via the `deleted_at` tombstone set by [`delete`].
/// Implementations must also uphold the active-pair invariant: at most one
/// non-tombstoned record per (patient, representative) pair with status
/// `Requested` or `Approved`. [`insert`] and [`restore`] return
/// [`RepresentativesError::DuplicateActivePair`] when the invariant would
/// break, which turns concurrent-invite races into a conflict instead of a
/// duplicate row.
///
/// [`delete`]: RepresentationStore::delete
/// [`insert`]: RepresentationStore::insert
/// [`restore`]: RepresentationStore::restore
/// [`RepresentativesError::DuplicateActivePair`]: crate::error::RepresentativesError::DuplicateActivePair
#[async_trait]
pub trait RepresentationStore: Send + Sync {
    /// Looks up a record by id, tombstoned or not.
    async fn find_by_id(&self, id: Uuid) -> RepresentativesResult<Option<Representation>>;

    /// Active `Approved` records where the given profile is the representative.
    async fn find_approved_for_representative(
        &self,
        representative_profile_id: Uuid,
    ) -> RepresentativesResult<Vec<Representation>>;

    /// Active records (any status) where the given profile is the represented
    /// party.
    async fn find_for_patient(
        &self,
        patient_profile_id: Uuid,
    ) -> RepresentativesResult<Vec<Representation>>;

    /// Looks up the record for an ordered pair, including tombstoned records,
    /// so a removed relationship can be restored instead of duplicated.
    async fn find_pair_with_deleted(
        &self,
        patient_profile_id: Uuid,
        representative_profile_id: Uuid,
    ) -> RepresentativesResult<Option<Representation>>;

    /// Inserts a new record, allocating id and timestamps.
    async fn insert(&self, new: NewRepresentation) -> RepresentativesResult<Representation>;

    /// Persists the mutable fields of an existing record.
    async fn save(&self, representation: &Representation) -> RepresentativesResult<()>;

    /// Clears the soft-delete tombstone of a record.
    async fn restore(&self, id: Uuid) -> RepresentativesResult<()>;

    /// Sets the soft-delete tombstone. Logical deletion only; the record stays
    /// queryable through [`find_by_id`](RepresentationStore::find_by_id) and
    /// [`find_pair_with_deleted`](RepresentationStore::find_pair_with_deleted).
    async fn delete(&self, id: Uuid) -> RepresentativesResult<()>;
}

/// User directory lookups.
///
/// Logically deleted users do not resolve through either method, which is what
/// lets the list operations drop rows whose counter-party no longer exists.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds a live user by national identity document.
    async fn find_by_identity(&self, identity: &Identity) -> RepresentativesResult<Option<User>>;

    /// Finds the live user linked to a patient profile.
    async fn find_by_profile(&self, profile_id: Uuid) -> RepresentativesResult<Option<User>>;
}

/// Downstream order updates triggered by representative changes.
#[async_trait]
pub trait OrderNotifier: Send + Sync {
    /// Awaited side effect; no return value is consumed.
    async fn update_orders_by_representative(&self, profile_id: Uuid)
        -> RepresentativesResult<()>;
}

/// Pending-action generation and resend.
///
/// The collaborator owns the action lifecycle; this core only looks actions
/// up by (sender, target) pair and requests creation or resend.
#[async_trait]
pub trait PendingActionsService: Send + Sync {
    /// All actions from a sender profile to a target profile, any kind.
    async fn find_between(
        &self,
        sender_profile_id: Uuid,
        target_profile_id: Uuid,
    ) -> RepresentativesResult<Vec<PendingAction>>;

    /// Generates a new action for the given user.
    async fn generate(&self, request: GeneratePendingActions) -> RepresentativesResult<()>;

    /// Resends existing actions.
    async fn resend(&self, actions: &[PendingAction]) -> RepresentativesResult<()>;
}
