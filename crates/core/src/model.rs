//! Data model for patient-representative relationships.
//!
//! This module defines the relationship record linking a patient profile to a
//! representative profile ("apoderado"), the user record resolved through the
//! user directory, and the pending-action records exchanged with the
//! notification collaborator.
//!
//! ## Pure data
//!
//! These are plain serde structs with no storage or API concerns; persistence
//! lives behind the traits in [`crate::store`] and wire shapes belong to the
//! API crates.

use crate::constants::ADULT_AGE_YEARS;
use chrono::{DateTime, NaiveDate, Utc};
use prm_types::Identity;
use uuid::Uuid;

/// Status of a representation record.
///
/// The record moves `Requested` → `Approved` (external acceptance flow) →
/// `Removed`. A `Removed` record is soft-deleted but can be restored back to
/// `Requested` by a re-invite, so no status is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepresentationStatus {
    Requested,
    Approved,
    Removed,
}

impl std::fmt::Display for RepresentationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RepresentationStatus::Requested => "requested",
            RepresentationStatus::Approved => "approved",
            RepresentationStatus::Removed => "removed",
        };
        write!(f, "{s}")
    }
}

/// A directed relationship record: the patient profile is represented by the
/// representative profile.
///
/// The soft-delete tombstone (`deleted_at`) is independent of `status`; a
/// removed record carries both `status == Removed` and a tombstone until a
/// re-invite restores it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Representation {
    pub id: Uuid,
    pub patient_profile_id: Uuid,
    pub representative_profile_id: Uuid,
    pub status: RepresentationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Representation {
    /// Returns true when the record has no soft-delete tombstone.
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Fields required to insert a new representation record.
///
/// Identifier and timestamps are allocated by the store.
#[derive(Debug, Clone)]
pub struct NewRepresentation {
    pub patient_profile_id: Uuid,
    pub representative_profile_id: Uuid,
    pub status: RepresentationStatus,
}

/// A user as resolved through the user directory.
///
/// Carries the password field as stored; it must never reach a caller. All
/// structures returned by this core expose [`PublicUser`] instead.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct User {
    pub id: Uuid,
    pub identity: Identity,
    pub birthdate: NaiveDate,
    pub patient_profile_id: Option<Uuid>,
    pub password: String,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Caller-facing projection of a [`User`] without the password field.
///
/// Stripping is done by projection rather than by blanking a field, so a
/// password can never be serialised out of this core by accident.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub identity: Identity,
    pub birthdate: NaiveDate,
    pub patient_profile_id: Option<Uuid>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            identity: user.identity.clone(),
            birthdate: user.birthdate,
            patient_profile_id: user.patient_profile_id,
        }
    }
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// The kind of task a pending action asks its target to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PendingActionKind {
    /// Ask the invited representative to approve the representation request.
    #[serde(rename = "approveRepresented")]
    ApproveRepresented,
    /// Ask an underage user left without representatives to add one.
    #[serde(rename = "addUnderageRepresentative")]
    AddUnderageRepresentative,
}

/// A notification/task awaiting response from a target profile.
///
/// The lifecycle of these records is owned by the pending-actions
/// collaborator; this core only requests creation or resend.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PendingAction {
    pub id: Uuid,
    pub sender_profile_id: Uuid,
    pub target_profile_id: Uuid,
    pub action: PendingActionKind,
    pub invite_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub resent_at: Option<DateTime<Utc>>,
    pub resend_count: u32,
}

/// Request payload for generating a pending action.
#[derive(Debug, Clone)]
pub struct GeneratePendingActions {
    /// The user on whose behalf the action is generated.
    pub user: User,
    pub action: PendingActionKind,
    /// The invite the action refers to, when the action concerns one.
    pub invite: Option<Representation>,
}

/// A representation record joined with its resolved counter-party user.
///
/// For "who do I represent" lists the counter-party is the represented
/// patient; for "who represents me" lists it is the representative.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RepresentationView {
    pub representation: Representation,
    pub counterparty: PublicUser,
}

/// Returns true when the birthdate corresponds to someone younger than
/// [`ADULT_AGE_YEARS`] full years on the given date.
///
/// A birthdate in the future also counts as underage.
pub fn is_underage(birthdate: NaiveDate, on: NaiveDate) -> bool {
    match on.years_since(birthdate) {
        Some(years) => years < ADULT_AGE_YEARS,
        None => true,
    }
}
