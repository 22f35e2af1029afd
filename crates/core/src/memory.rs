//! In-memory reference implementations of the collaborator contracts.
//!
//! These back the workspace binaries (the system runs end-to-end without an
//! external database) and double as test fixtures for the service tests. The
//! store implementation is the reference for the semantics a database-backed
//! store must provide: tombstone-only deletion and the active-pair uniqueness
//! invariant.

use crate::error::{RepresentativesError, RepresentativesResult};
use crate::model::{
    GeneratePendingActions, NewRepresentation, PendingAction, Representation,
    RepresentationStatus, User,
};
use crate::store::{OrderNotifier, PendingActionsService, RepresentationStore, UserDirectory};
use async_trait::async_trait;
use chrono::Utc;
use prm_types::Identity;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory representation store.
#[derive(Default)]
pub struct MemoryRepresentationStore {
    records: RwLock<HashMap<Uuid, Representation>>,
}

impl MemoryRepresentationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record directly, bypassing the invariant checks. Intended for
    /// tests and fixtures.
    pub async fn seed(&self, representation: Representation) {
        self.records
            .write()
            .await
            .insert(representation.id, representation);
    }

    fn pair_has_active_record(
        records: &HashMap<Uuid, Representation>,
        patient_profile_id: Uuid,
        representative_profile_id: Uuid,
        excluding: Option<Uuid>,
    ) -> bool {
        records.values().any(|r| {
            Some(r.id) != excluding
                && r.patient_profile_id == patient_profile_id
                && r.representative_profile_id == representative_profile_id
                && r.is_active()
                && r.status != RepresentationStatus::Removed
        })
    }
}

#[async_trait]
impl RepresentationStore for MemoryRepresentationStore {
    async fn find_by_id(&self, id: Uuid) -> RepresentativesResult<Option<Representation>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn find_approved_for_representative(
        &self,
        representative_profile_id: Uuid,
    ) -> RepresentativesResult<Vec<Representation>> {
        let records = self.records.read().await;
        let mut found: Vec<Representation> = records
            .values()
            .filter(|r| {
                r.representative_profile_id == representative_profile_id
                    && r.is_active()
                    && r.status == RepresentationStatus::Approved
            })
            .cloned()
            .collect();
        found.sort_by_key(|r| r.created_at);
        Ok(found)
    }

    async fn find_for_patient(
        &self,
        patient_profile_id: Uuid,
    ) -> RepresentativesResult<Vec<Representation>> {
        let records = self.records.read().await;
        let mut found: Vec<Representation> = records
            .values()
            .filter(|r| r.patient_profile_id == patient_profile_id && r.is_active())
            .cloned()
            .collect();
        found.sort_by_key(|r| r.created_at);
        Ok(found)
    }

    async fn find_pair_with_deleted(
        &self,
        patient_profile_id: Uuid,
        representative_profile_id: Uuid,
    ) -> RepresentativesResult<Option<Representation>> {
        let records = self.records.read().await;
        let mut candidates: Vec<&Representation> = records
            .values()
            .filter(|r| {
                r.patient_profile_id == patient_profile_id
                    && r.representative_profile_id == representative_profile_id
            })
            .collect();
        // An active record wins over tombstones; among tombstones, the most
        // recently touched one is the restore candidate.
        candidates.sort_by_key(|r| (r.is_active(), r.updated_at));
        Ok(candidates.last().map(|r| (*r).clone()))
    }

    async fn insert(&self, new: NewRepresentation) -> RepresentativesResult<Representation> {
        let mut records = self.records.write().await;
        if Self::pair_has_active_record(
            &records,
            new.patient_profile_id,
            new.representative_profile_id,
            None,
        ) {
            return Err(RepresentativesError::DuplicateActivePair);
        }

        let now = Utc::now();
        let representation = Representation {
            id: Uuid::new_v4(),
            patient_profile_id: new.patient_profile_id,
            representative_profile_id: new.representative_profile_id,
            status: new.status,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        records.insert(representation.id, representation.clone());
        Ok(representation)
    }

    async fn save(&self, representation: &Representation) -> RepresentativesResult<()> {
        let mut records = self.records.write().await;
        let mut updated = representation.clone();
        updated.updated_at = Utc::now();
        // The tombstone column is owned by delete/restore, not by save.
        if let Some(existing) = records.get(&representation.id) {
            updated.deleted_at = existing.deleted_at;
            updated.created_at = existing.created_at;
        }
        records.insert(updated.id, updated);
        Ok(())
    }

    async fn restore(&self, id: Uuid) -> RepresentativesResult<()> {
        let mut records = self.records.write().await;
        let Some(record) = records.get(&id).cloned() else {
            return Ok(());
        };
        if Self::pair_has_active_record(
            &records,
            record.patient_profile_id,
            record.representative_profile_id,
            Some(id),
        ) {
            return Err(RepresentativesError::DuplicateActivePair);
        }
        if let Some(record) = records.get_mut(&id) {
            record.deleted_at = None;
            record.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepresentativesResult<()> {
        let mut records = self.records.write().await;
        if let Some(record) = records.get_mut(&id) {
            let now = Utc::now();
            record.deleted_at = Some(now);
            record.updated_at = now;
        }
        Ok(())
    }
}

/// In-memory user directory.
#[derive(Default)]
pub struct MemoryUserDirectory {
    users: RwLock<Vec<User>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, user: User) {
        self.users.write().await.push(user);
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_identity(&self, identity: &Identity) -> RepresentativesResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.deleted_at.is_none() && &u.identity == identity)
            .cloned())
    }

    async fn find_by_profile(&self, profile_id: Uuid) -> RepresentativesResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.deleted_at.is_none() && u.patient_profile_id == Some(profile_id))
            .cloned())
    }
}

/// Order notifier that records every call.
///
/// The orders subsystem itself is a downstream collaborator; this
/// implementation exists so the binaries have something to wire in and so
/// tests can assert on call counts and arguments.
#[derive(Default)]
pub struct MemoryOrderNotifier {
    calls: RwLock<Vec<Uuid>>,
}

impl MemoryOrderNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile ids the notifier was invoked with, in call order.
    pub async fn calls(&self) -> Vec<Uuid> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl OrderNotifier for MemoryOrderNotifier {
    async fn update_orders_by_representative(
        &self,
        profile_id: Uuid,
    ) -> RepresentativesResult<()> {
        tracing::debug!(%profile_id, "updating orders for representative change");
        self.calls.write().await.push(profile_id);
        Ok(())
    }
}

/// In-memory pending-actions collaborator.
#[derive(Default)]
pub struct MemoryPendingActions {
    actions: RwLock<Vec<PendingAction>>,
}

impl MemoryPendingActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every action held, for inspection in tests.
    pub async fn actions(&self) -> Vec<PendingAction> {
        self.actions.read().await.clone()
    }
}

#[async_trait]
impl PendingActionsService for MemoryPendingActions {
    async fn find_between(
        &self,
        sender_profile_id: Uuid,
        target_profile_id: Uuid,
    ) -> RepresentativesResult<Vec<PendingAction>> {
        let actions = self.actions.read().await;
        Ok(actions
            .iter()
            .filter(|a| {
                a.sender_profile_id == sender_profile_id
                    && a.target_profile_id == target_profile_id
            })
            .cloned()
            .collect())
    }

    async fn generate(&self, request: GeneratePendingActions) -> RepresentativesResult<()> {
        let sender_profile_id = request
            .user
            .patient_profile_id
            .unwrap_or_else(Uuid::nil);
        let target_profile_id = request
            .invite
            .as_ref()
            .map(|i| i.representative_profile_id)
            .unwrap_or(sender_profile_id);

        tracing::debug!(
            %sender_profile_id,
            %target_profile_id,
            action = ?request.action,
            "generating pending action"
        );

        self.actions.write().await.push(PendingAction {
            id: Uuid::new_v4(),
            sender_profile_id,
            target_profile_id,
            action: request.action,
            invite_id: request.invite.map(|i| i.id),
            created_at: Utc::now(),
            resent_at: None,
            resend_count: 0,
        });
        Ok(())
    }

    async fn resend(&self, actions: &[PendingAction]) -> RepresentativesResult<()> {
        let ids: Vec<Uuid> = actions.iter().map(|a| a.id).collect();
        let mut held = self.actions.write().await;
        for action in held.iter_mut().filter(|a| ids.contains(&a.id)) {
            action.resent_at = Some(Utc::now());
            action.resend_count += 1;
        }
        Ok(())
    }
}
