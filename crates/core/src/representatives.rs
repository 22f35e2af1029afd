//! Representative relationship management.
//!
//! This module provides the service that manages "patient is represented by"
//! relationships: listing them from either side, inviting a representative by
//! identity document, and removing a relationship from either side.
//!
//! ## Status transitions
//!
//! ```text
//!  (none) ──invite──► requested ──approval──► approved ──removal──► removed
//!                         ▲                                  (soft-deleted)
//!                         └────────── re-invite (restore) ──────────┘
//! ```
//!
//! The approval step belongs to an external acceptance flow; this service
//! only creates requests, removes relationships, and restores removed ones.
//!
//! ## Pure relationship operations
//!
//! Storage, user lookups, order updates and pending actions sit behind the
//! traits in [`crate::store`]; HTTP concerns belong to the API crates.

use crate::error::{RepresentativesError, RepresentativesResult};
use crate::model::{
    is_underage, GeneratePendingActions, NewRepresentation, PendingActionKind, PublicUser,
    Representation, RepresentationStatus, RepresentationView, User,
};
use crate::store::{OrderNotifier, PendingActionsService, RepresentationStore, UserDirectory};
use chrono::Utc;
use prm_types::Identity;
use std::sync::Arc;
use uuid::Uuid;

/// Service managing patient-representative relationships.
///
/// Constructed with explicit handles to its four collaborators; it holds no
/// other state and is cheap to clone.
#[derive(Clone)]
pub struct RepresentativesService {
    store: Arc<dyn RepresentationStore>,
    users: Arc<dyn UserDirectory>,
    orders: Arc<dyn OrderNotifier>,
    pending: Arc<dyn PendingActionsService>,
}

impl RepresentativesService {
    /// Creates a new service over the given collaborators.
    pub fn new(
        store: Arc<dyn RepresentationStore>,
        users: Arc<dyn UserDirectory>,
        orders: Arc<dyn OrderNotifier>,
        pending: Arc<dyn PendingActionsService>,
    ) -> Self {
        Self {
            store,
            users,
            orders,
            pending,
        }
    }

    /// Lists the patients the given profile represents.
    ///
    /// Only `approved`, non-deleted records are returned, each joined with the
    /// represented patient's user record. Rows whose counter-party user has
    /// been logically deleted are dropped, and passwords never appear in the
    /// result ([`PublicUser`] carries no password field).
    pub async fn get_represented(
        &self,
        representative_profile_id: Uuid,
    ) -> RepresentativesResult<Vec<RepresentationView>> {
        let records = self
            .store
            .find_approved_for_representative(representative_profile_id)
            .await?;
        self.resolve_views(records, |r| r.patient_profile_id).await
    }

    /// Lists the representatives of the given profile.
    ///
    /// The symmetric query: non-deleted records of any status where the
    /// profile is the represented party, joined with each representative's
    /// user record. Same deletion filter and password stripping as
    /// [`get_represented`](Self::get_represented).
    pub async fn get_representatives(
        &self,
        patient_profile_id: Uuid,
    ) -> RepresentativesResult<Vec<RepresentationView>> {
        let records = self.store.find_for_patient(patient_profile_id).await?;
        self.resolve_views(records, |r| r.representative_profile_id)
            .await
    }

    /// Invites a user, looked up by identity document, to become a
    /// representative of the calling profile.
    ///
    /// Validation order: the target must exist and own a patient profile, must
    /// be an adult, and must not be the caller. An existing record for the
    /// pair is then consulted, tombstones included:
    ///
    /// - `requested` → the invite is already pending (conflict);
    /// - `approved` → the representative is already registered (conflict);
    /// - `removed` → the record is set back to `requested`, persisted and
    ///   restored — the same record is reused, no duplicate is created;
    /// - none → a new `requested` record is inserted.
    ///
    /// Any pending actions already addressed to the representative are resent;
    /// otherwise a new `approveRepresented` action carrying the invite is
    /// generated on behalf of the caller.
    ///
    /// # Returns
    ///
    /// The refreshed representatives list of the caller, reflecting the new or
    /// restored record.
    ///
    /// # Errors
    ///
    /// Returns a `RepresentativesError` if:
    /// - no user exists for the identity, or the user has no patient profile,
    /// - the target is underage or is the caller themselves,
    /// - an active request or registration already exists for the pair,
    /// - a collaborator fails.
    pub async fn create_representative(
        &self,
        patient_profile_id: Uuid,
        identity: &Identity,
    ) -> RepresentativesResult<Vec<RepresentationView>> {
        let user = self
            .users
            .find_by_identity(identity)
            .await?
            .ok_or(RepresentativesError::UserNotFound)?;
        let representative_profile_id = user
            .patient_profile_id
            .ok_or(RepresentativesError::MissingPatientProfile)?;

        if is_underage(user.birthdate, Utc::now().date_naive()) {
            return Err(RepresentativesError::RepresentativeUnderage);
        }
        if representative_profile_id == patient_profile_id {
            return Err(RepresentativesError::SelfRepresentation);
        }

        let invite = match self
            .store
            .find_pair_with_deleted(patient_profile_id, representative_profile_id)
            .await?
        {
            Some(mut existing) => match existing.status {
                RepresentationStatus::Requested => {
                    return Err(RepresentativesError::InvitePending)
                }
                RepresentationStatus::Approved => {
                    return Err(RepresentativesError::AlreadyRegistered)
                }
                RepresentationStatus::Removed => {
                    existing.status = RepresentationStatus::Requested;
                    self.store.save(&existing).await?;
                    self.store.restore(existing.id).await?;
                    existing.deleted_at = None;
                    tracing::info!(invite = %existing.id, "restored removed representation to requested");
                    existing
                }
            },
            None => {
                let created = self
                    .store
                    .insert(NewRepresentation {
                        patient_profile_id,
                        representative_profile_id,
                        status: RepresentationStatus::Requested,
                    })
                    .await?;
                tracing::info!(invite = %created.id, "created representation request");
                created
            }
        };

        let existing_actions = self
            .pending
            .find_between(patient_profile_id, invite.representative_profile_id)
            .await?;
        if existing_actions.is_empty() {
            let caller = self
                .users
                .find_by_profile(patient_profile_id)
                .await?
                .ok_or(RepresentativesError::ProfileNotFound(patient_profile_id))?;
            self.pending
                .generate(GeneratePendingActions {
                    user: caller,
                    action: PendingActionKind::ApproveRepresented,
                    invite: Some(invite),
                })
                .await?;
        } else {
            self.pending.resend(&existing_actions).await?;
        }

        self.get_representatives(patient_profile_id).await
    }

    /// Removes one of the caller's representatives.
    ///
    /// The order-update collaborator is notified before the record is touched,
    /// and fires even when the given id matches no record (the record's
    /// representative profile when found, the caller's profile otherwise).
    /// A found record is set to `removed`, persisted and soft-deleted; an
    /// unknown id is a silent no-op for the mutation.
    ///
    /// After the removal the caller's user is resolved, the representatives
    /// list is refreshed and the underage safeguard runs before the list is
    /// returned.
    pub async fn remove_representative(
        &self,
        patient_profile_id: Uuid,
        representation_id: Uuid,
    ) -> RepresentativesResult<Vec<RepresentationView>> {
        let invite = self.store.find_by_id(representation_id).await?;

        let order_target = invite
            .as_ref()
            .map(|i| i.representative_profile_id)
            .unwrap_or(patient_profile_id);
        self.orders
            .update_orders_by_representative(order_target)
            .await?;

        if let Some(mut invite) = invite {
            invite.status = RepresentationStatus::Removed;
            self.store.save(&invite).await?;
            self.store.delete(invite.id).await?;
            tracing::info!(invite = %invite.id, "removed representative");
        }

        let user = self
            .users
            .find_by_profile(patient_profile_id)
            .await?
            .ok_or(RepresentativesError::ProfileNotFound(patient_profile_id))?;
        let representatives = self.get_representatives(patient_profile_id).await?;
        self.handle_underage_user(&user, &representatives).await?;

        Ok(representatives)
    }

    /// Removes a relationship from the representative's side.
    ///
    /// Mirrors [`remove_representative`](Self::remove_representative) with two
    /// deliberate differences: the order-update collaborator is notified with
    /// the caller-supplied profile id rather than a profile taken from the
    /// record, and the acting user for the underage safeguard is resolved via
    /// the record's represented-profile id.
    pub async fn remove_represented(
        &self,
        patient_profile_id: Uuid,
        representation_id: Uuid,
    ) -> RepresentativesResult<Vec<RepresentationView>> {
        let invite = self.store.find_by_id(representation_id).await?;

        self.orders
            .update_orders_by_representative(patient_profile_id)
            .await?;

        let acting_profile_id = invite
            .as_ref()
            .map(|i| i.patient_profile_id)
            .unwrap_or(patient_profile_id);

        if let Some(mut invite) = invite {
            invite.status = RepresentationStatus::Removed;
            self.store.save(&invite).await?;
            self.store.delete(invite.id).await?;
            // Trailing write is idempotent: status is already removed and the
            // tombstone is owned by delete.
            self.store.save(&invite).await?;
            tracing::info!(invite = %invite.id, "removed represented patient");
        }

        let user = self
            .users
            .find_by_profile(acting_profile_id)
            .await?
            .ok_or(RepresentativesError::ProfileNotFound(acting_profile_id))?;
        let representatives = self.get_representatives(patient_profile_id).await?;
        self.handle_underage_user(&user, &representatives).await?;

        Ok(representatives)
    }

    /// Remediation safeguard: a minor must always keep at least one active
    /// representative.
    ///
    /// When the acting user is underage and their representatives list is
    /// empty, one `addUnderageRepresentative` pending action is generated.
    /// The removal itself is never blocked.
    async fn handle_underage_user(
        &self,
        user: &User,
        representatives: &[RepresentationView],
    ) -> RepresentativesResult<()> {
        if !is_underage(user.birthdate, Utc::now().date_naive()) {
            return Ok(());
        }
        if representatives.is_empty() {
            tracing::warn!(user = %user.id, "minor left without representatives");
            self.pending
                .generate(GeneratePendingActions {
                    user: user.clone(),
                    action: PendingActionKind::AddUnderageRepresentative,
                    invite: None,
                })
                .await?;
        }
        Ok(())
    }

    /// Joins records with their counter-party users, dropping rows whose
    /// counter-party no longer resolves.
    async fn resolve_views(
        &self,
        records: Vec<Representation>,
        counterparty_of: fn(&Representation) -> Uuid,
    ) -> RepresentativesResult<Vec<RepresentationView>> {
        let mut views = Vec::with_capacity(records.len());
        for record in records {
            if let Some(user) = self.users.find_by_profile(counterparty_of(&record)).await? {
                views.push(RepresentationView {
                    representation: record,
                    counterparty: PublicUser::from(user),
                });
            }
        }
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{
        MemoryOrderNotifier, MemoryPendingActions, MemoryRepresentationStore, MemoryUserDirectory,
    };
    use chrono::{Months, NaiveDate};

    struct Fixture {
        store: Arc<MemoryRepresentationStore>,
        users: Arc<MemoryUserDirectory>,
        orders: Arc<MemoryOrderNotifier>,
        pending: Arc<MemoryPendingActions>,
        service: RepresentativesService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryRepresentationStore::new());
        let users = Arc::new(MemoryUserDirectory::new());
        let orders = Arc::new(MemoryOrderNotifier::new());
        let pending = Arc::new(MemoryPendingActions::new());
        let service = RepresentativesService::new(
            store.clone(),
            users.clone(),
            orders.clone(),
            pending.clone(),
        );
        Fixture {
            store,
            users,
            orders,
            pending,
            service,
        }
    }

    fn years_ago(years: u32) -> NaiveDate {
        Utc::now()
            .date_naive()
            .checked_sub_months(Months::new(12 * years))
            .unwrap()
    }

    async fn seed_user(fx: &Fixture, identity: &str, birthdate: NaiveDate) -> (Uuid, User) {
        let profile_id = Uuid::new_v4();
        let user = User {
            id: Uuid::new_v4(),
            identity: Identity::new(identity).unwrap(),
            birthdate,
            patient_profile_id: Some(profile_id),
            password: "s3cret".into(),
            deleted_at: None,
        };
        fx.users.add(user.clone()).await;
        (profile_id, user)
    }

    async fn seed_record(
        fx: &Fixture,
        patient_profile_id: Uuid,
        representative_profile_id: Uuid,
        status: RepresentationStatus,
    ) -> Representation {
        let now = Utc::now();
        let record = Representation {
            id: Uuid::new_v4(),
            patient_profile_id,
            representative_profile_id,
            status,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        fx.store.seed(record.clone()).await;
        record
    }

    #[tokio::test]
    async fn test_invite_creates_requested_record_and_pending_action() {
        let fx = fixture();
        let (a, _) = seed_user(&fx, "11111111", years_ago(30)).await;
        let (b, b_user) = seed_user(&fx, "12345678", years_ago(25)).await;

        let reps = fx
            .service
            .create_representative(a, &Identity::new("12345678").unwrap())
            .await
            .unwrap();

        assert_eq!(reps.len(), 1);
        assert_eq!(reps[0].representation.status, RepresentationStatus::Requested);
        assert_eq!(reps[0].representation.patient_profile_id, a);
        assert_eq!(reps[0].representation.representative_profile_id, b);
        assert_eq!(reps[0].counterparty.id, b_user.id);

        let actions = fx.pending.actions().await;
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].action, PendingActionKind::ApproveRepresented);
        assert_eq!(actions[0].sender_profile_id, a);
        assert_eq!(actions[0].target_profile_id, b);
        assert!(actions[0].invite_id.is_some());
    }

    #[tokio::test]
    async fn test_invite_unknown_identity_fails_not_found() {
        let fx = fixture();
        let (a, _) = seed_user(&fx, "11111111", years_ago(30)).await;

        let err = fx
            .service
            .create_representative(a, &Identity::new("99999999").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, RepresentativesError::UserNotFound));
        assert!(fx.store.find_for_patient(a).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invite_user_without_profile_fails_not_found() {
        let fx = fixture();
        let (a, _) = seed_user(&fx, "11111111", years_ago(30)).await;
        fx.users
            .add(User {
                id: Uuid::new_v4(),
                identity: Identity::new("22222222").unwrap(),
                birthdate: years_ago(40),
                patient_profile_id: None,
                password: "s3cret".into(),
                deleted_at: None,
            })
            .await;

        let err = fx
            .service
            .create_representative(a, &Identity::new("22222222").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, RepresentativesError::MissingPatientProfile));
        assert_eq!(err.kind(), crate::error::RejectionKind::NotFound);
    }

    #[tokio::test]
    async fn test_invite_minor_fails_and_leaves_no_trace() {
        let fx = fixture();
        let (a, _) = seed_user(&fx, "11111111", years_ago(30)).await;
        seed_user(&fx, "33333333", years_ago(15)).await;

        let err = fx
            .service
            .create_representative(a, &Identity::new("33333333").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, RepresentativesError::RepresentativeUnderage));
        assert_eq!(err.kind(), crate::error::RejectionKind::InvalidOperation);
        assert!(fx.store.find_for_patient(a).await.unwrap().is_empty());
        assert!(fx.pending.actions().await.is_empty());
    }

    #[tokio::test]
    async fn test_invite_self_fails_invalid_operation() {
        let fx = fixture();
        let (a, _) = seed_user(&fx, "11111111", years_ago(30)).await;

        let err = fx
            .service
            .create_representative(a, &Identity::new("11111111").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, RepresentativesError::SelfRepresentation));
    }

    #[tokio::test]
    async fn test_invite_with_pending_request_fails_conflict() {
        let fx = fixture();
        let (a, _) = seed_user(&fx, "11111111", years_ago(30)).await;
        seed_user(&fx, "12345678", years_ago(25)).await;
        let identity = Identity::new("12345678").unwrap();

        fx.service.create_representative(a, &identity).await.unwrap();
        let err = fx
            .service
            .create_representative(a, &identity)
            .await
            .unwrap_err();

        assert!(matches!(err, RepresentativesError::InvitePending));
        assert_eq!(err.kind(), crate::error::RejectionKind::Conflict);
    }

    #[tokio::test]
    async fn test_invite_approved_pair_fails_conflict() {
        let fx = fixture();
        let (a, _) = seed_user(&fx, "11111111", years_ago(30)).await;
        let (b, _) = seed_user(&fx, "12345678", years_ago(25)).await;
        seed_record(&fx, a, b, RepresentationStatus::Approved).await;

        let err = fx
            .service
            .create_representative(a, &Identity::new("12345678").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, RepresentativesError::AlreadyRegistered));
    }

    #[tokio::test]
    async fn test_reinvite_restores_removed_record_and_resends_action() {
        let fx = fixture();
        let (a, _) = seed_user(&fx, "11111111", years_ago(30)).await;
        let (_b, _) = seed_user(&fx, "12345678", years_ago(25)).await;
        let identity = Identity::new("12345678").unwrap();

        let reps = fx.service.create_representative(a, &identity).await.unwrap();
        let original_id = reps[0].representation.id;

        fx.service
            .remove_representative(a, original_id)
            .await
            .unwrap();

        let reps = fx.service.create_representative(a, &identity).await.unwrap();

        // Same record, restored: no duplicate id, no tombstone.
        assert_eq!(reps.len(), 1);
        assert_eq!(reps[0].representation.id, original_id);
        assert_eq!(reps[0].representation.status, RepresentationStatus::Requested);
        assert!(reps[0].representation.deleted_at.is_none());

        // The original pending action is resent, not duplicated.
        let actions = fx.pending.actions().await;
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].resend_count, 1);
        assert!(actions[0].resent_at.is_some());
    }

    #[tokio::test]
    async fn test_lists_exclude_deleted_counterparty_users() {
        let fx = fixture();
        let (rep, _) = seed_user(&fx, "11111111", years_ago(40)).await;
        let (p1, _) = seed_user(&fx, "22222222", years_ago(30)).await;

        // Second patient exists only as a logically deleted user.
        let p2 = Uuid::new_v4();
        fx.users
            .add(User {
                id: Uuid::new_v4(),
                identity: Identity::new("33333333").unwrap(),
                birthdate: years_ago(35),
                patient_profile_id: Some(p2),
                password: "s3cret".into(),
                deleted_at: Some(Utc::now()),
            })
            .await;

        seed_record(&fx, p1, rep, RepresentationStatus::Approved).await;
        seed_record(&fx, p2, rep, RepresentationStatus::Approved).await;

        let represented = fx.service.get_represented(rep).await.unwrap();
        assert_eq!(represented.len(), 1);
        assert_eq!(represented[0].representation.patient_profile_id, p1);
    }

    #[tokio::test]
    async fn test_get_represented_returns_only_approved() {
        let fx = fixture();
        let (rep, _) = seed_user(&fx, "11111111", years_ago(40)).await;
        let (p1, _) = seed_user(&fx, "22222222", years_ago(30)).await;
        let (p2, _) = seed_user(&fx, "33333333", years_ago(30)).await;

        seed_record(&fx, p1, rep, RepresentationStatus::Approved).await;
        seed_record(&fx, p2, rep, RepresentationStatus::Requested).await;

        let represented = fx.service.get_represented(rep).await.unwrap();
        assert_eq!(represented.len(), 1);
        assert_eq!(
            represented[0].representation.status,
            RepresentationStatus::Approved
        );

        // The my-representatives side has no status filter.
        let representatives = fx.service.get_representatives(p2).await.unwrap();
        assert_eq!(representatives.len(), 1);
    }

    #[tokio::test]
    async fn test_views_never_serialise_password_data() {
        let fx = fixture();
        let (a, _) = seed_user(&fx, "11111111", years_ago(30)).await;
        let (b, _) = seed_user(&fx, "12345678", years_ago(25)).await;
        seed_record(&fx, a, b, RepresentationStatus::Approved).await;

        let representatives = fx.service.get_representatives(a).await.unwrap();
        let json = serde_json::to_string(&representatives).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("s3cret"));
    }

    #[tokio::test]
    async fn test_remove_representative_soft_deletes_and_notifies() {
        let fx = fixture();
        let (a, _) = seed_user(&fx, "11111111", years_ago(30)).await;
        let (b, _) = seed_user(&fx, "12345678", years_ago(25)).await;
        let record = seed_record(&fx, a, b, RepresentationStatus::Approved).await;

        let reps = fx
            .service
            .remove_representative(a, record.id)
            .await
            .unwrap();

        assert!(reps.is_empty());
        assert_eq!(fx.orders.calls().await, vec![b]);

        let stored = fx.store.find_by_id(record.id).await.unwrap().unwrap();
        assert_eq!(stored.status, RepresentationStatus::Removed);
        assert!(stored.deleted_at.is_some());
    }

    #[tokio::test]
    async fn test_remove_representative_notifies_even_for_unknown_id() {
        let fx = fixture();
        let (a, _) = seed_user(&fx, "11111111", years_ago(30)).await;

        fx.service
            .remove_representative(a, Uuid::new_v4())
            .await
            .unwrap();

        assert_eq!(fx.orders.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_represented_notifies_even_for_unknown_id() {
        let fx = fixture();
        // A minor caller makes the acting-user fallback observable: with no
        // record to take a profile from, the safeguard must evaluate the
        // caller themselves.
        let (minor, _) = seed_user(&fx, "44444444", years_ago(14)).await;

        let reps = fx
            .service
            .remove_represented(minor, Uuid::new_v4())
            .await
            .unwrap();

        // Exactly one notification, with the caller-supplied profile id.
        assert_eq!(fx.orders.calls().await, vec![minor]);
        assert!(reps.is_empty());

        let actions = fx.pending.actions().await;
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].action, PendingActionKind::AddUnderageRepresentative);
        assert_eq!(actions[0].sender_profile_id, minor);
    }

    #[tokio::test]
    async fn test_underage_safeguard_fires_when_last_representative_removed() {
        let fx = fixture();
        let (minor, _) = seed_user(&fx, "44444444", years_ago(14)).await;
        let (rep, _) = seed_user(&fx, "11111111", years_ago(40)).await;
        let record = seed_record(&fx, minor, rep, RepresentationStatus::Approved).await;

        fx.service
            .remove_representative(minor, record.id)
            .await
            .unwrap();

        let remediation: Vec<_> = fx
            .pending
            .actions()
            .await
            .into_iter()
            .filter(|a| a.action == PendingActionKind::AddUnderageRepresentative)
            .collect();
        assert_eq!(remediation.len(), 1);
    }

    #[tokio::test]
    async fn test_underage_safeguard_skipped_while_a_representative_remains() {
        let fx = fixture();
        let (minor, _) = seed_user(&fx, "44444444", years_ago(14)).await;
        let (r1, _) = seed_user(&fx, "11111111", years_ago(40)).await;
        let (r2, _) = seed_user(&fx, "22222222", years_ago(45)).await;
        let record = seed_record(&fx, minor, r1, RepresentationStatus::Approved).await;
        seed_record(&fx, minor, r2, RepresentationStatus::Approved).await;

        fx.service
            .remove_representative(minor, record.id)
            .await
            .unwrap();

        assert!(fx
            .pending
            .actions()
            .await
            .iter()
            .all(|a| a.action != PendingActionKind::AddUnderageRepresentative));
    }

    #[tokio::test]
    async fn test_underage_safeguard_skipped_for_adults() {
        let fx = fixture();
        let (a, _) = seed_user(&fx, "11111111", years_ago(30)).await;
        let (b, _) = seed_user(&fx, "12345678", years_ago(25)).await;
        let record = seed_record(&fx, a, b, RepresentationStatus::Approved).await;

        fx.service.remove_representative(a, record.id).await.unwrap();

        assert!(fx.pending.actions().await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_represented_notifies_with_caller_profile() {
        let fx = fixture();
        let (patient, _) = seed_user(&fx, "22222222", years_ago(30)).await;
        let (rep, _) = seed_user(&fx, "11111111", years_ago(40)).await;
        let record = seed_record(&fx, patient, rep, RepresentationStatus::Approved).await;

        fx.service.remove_represented(rep, record.id).await.unwrap();

        // Caller-supplied profile id, not the one on the record.
        assert_eq!(fx.orders.calls().await, vec![rep]);

        let stored = fx.store.find_by_id(record.id).await.unwrap().unwrap();
        assert_eq!(stored.status, RepresentationStatus::Removed);
        assert!(stored.deleted_at.is_some());
    }

    #[tokio::test]
    async fn test_remove_represented_resolves_acting_user_from_record() {
        let fx = fixture();
        // The represented patient is a minor; the representative is an adult
        // with no representatives of their own.
        let (minor, _) = seed_user(&fx, "44444444", years_ago(14)).await;
        let (rep, _) = seed_user(&fx, "11111111", years_ago(40)).await;
        let record = seed_record(&fx, minor, rep, RepresentationStatus::Approved).await;

        fx.service.remove_represented(rep, record.id).await.unwrap();

        // The safeguard evaluated the record's represented user (the minor).
        let remediation: Vec<_> = fx
            .pending
            .actions()
            .await
            .into_iter()
            .filter(|a| a.action == PendingActionKind::AddUnderageRepresentative)
            .collect();
        assert_eq!(remediation.len(), 1);
        assert_eq!(remediation[0].sender_profile_id, minor);
    }
}
