//! # PRM Core
//!
//! Core business logic for the patient representative manager.
//!
//! This crate contains the relationship data model and the service that
//! drives it:
//! - Relationship records with soft-delete tombstones and the
//!   requested/approved/removed status machine
//! - The invite, removal and restore workflow, including the underage
//!   remediation safeguard
//! - Trait seams for the storage and collaborator contracts, plus in-memory
//!   reference implementations
//!
//! **No API concerns**: HTTP servers, DTOs and status-code mapping belong in
//! `api-rest` and `api-shared`.

pub mod constants;
pub mod error;
pub mod memory;
pub mod model;
pub mod representatives;
pub mod store;

pub use error::{RejectionKind, RepresentativesError, RepresentativesResult};
pub use model::{
    is_underage, GeneratePendingActions, NewRepresentation, PendingAction, PendingActionKind,
    PublicUser, Representation, RepresentationStatus, RepresentationView, User,
};
pub use representatives::RepresentativesService;
pub use store::{OrderNotifier, PendingActionsService, RepresentationStore, UserDirectory};
