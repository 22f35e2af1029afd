//! Wire DTOs for the PRM REST surface.
//!
//! These types define the JSON shapes exchanged with clients. They carry no
//! behaviour; the REST crate converts between them and the core model. The
//! counter-party user shape deliberately has no password field.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// The counter-party user joined onto a relationship record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CounterpartyDto {
    pub id: Uuid,
    /// National identity document number.
    pub identity: String,
    pub birthdate: NaiveDate,
    pub patient_profile_id: Option<Uuid>,
}

/// A patient-representative relationship record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RepresentationDto {
    pub id: Uuid,
    pub patient_profile_id: Uuid,
    pub representative_profile_id: Uuid,
    /// One of `requested`, `approved`, `removed`.
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub counterparty: CounterpartyDto,
}

/// Response for the my-representatives listing and the mutating operations,
/// which all return the refreshed list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RepresentativesRes {
    pub representatives: Vec<RepresentationDto>,
}

/// Response for the patients-I-represent listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RepresentedRes {
    pub represented: Vec<RepresentationDto>,
}

/// Request to invite a representative by identity document.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateRepresentativeReq {
    /// National identity document number (DNI) of the invited user.
    pub identity: String,
}

/// Error payload returned with non-2xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub message: String,
}
