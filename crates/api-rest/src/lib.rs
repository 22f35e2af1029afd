//! # API REST
//!
//! REST API implementation for PRM.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status-code mapping)
//!
//! Uses `api-shared` for the wire types and `prm-core` for the behaviour.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use api_shared::dto::{
    CounterpartyDto, CreateRepresentativeReq, ErrorRes, HealthRes, RepresentationDto,
    RepresentativesRes, RepresentedRes,
};
use api_shared::HealthService;
use prm_core::{
    RejectionKind, RepresentationView, RepresentativesError, RepresentativesService,
};
use prm_types::Identity;

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub representatives: Arc<RepresentativesService>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        get_represented,
        get_representatives,
        create_representative,
        remove_representative,
        remove_represented,
    ),
    components(schemas(
        HealthRes,
        CounterpartyDto,
        RepresentationDto,
        RepresentativesRes,
        RepresentedRes,
        CreateRepresentativeReq,
        ErrorRes,
    ))
)]
struct ApiDoc;

/// Builds the REST router with all routes, Swagger UI and CORS.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/profiles/:profile_id/represented", get(get_represented))
        .route(
            "/profiles/:profile_id/representatives",
            get(get_representatives),
        )
        .route(
            "/profiles/:profile_id/representatives",
            post(create_representative),
        )
        .route(
            "/profiles/:profile_id/representatives/:representation_id",
            delete(remove_representative),
        )
        .route(
            "/profiles/:profile_id/represented/:representation_id",
            delete(remove_represented),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

type Rejection = (StatusCode, Json<ErrorRes>);

/// Maps a core error onto an HTTP status with a client-safe message.
///
/// Collaborator failures are logged and flattened to a generic 500 so
/// internals never leak to clients.
fn reject(err: RepresentativesError) -> Rejection {
    let status = match err.kind() {
        RejectionKind::NotFound => StatusCode::NOT_FOUND,
        RejectionKind::InvalidOperation => StatusCode::BAD_REQUEST,
        RejectionKind::Conflict => StatusCode::CONFLICT,
        RejectionKind::Internal => {
            tracing::error!(error = %err, "representatives operation failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorRes {
                    message: "Internal error".into(),
                }),
            );
        }
    };
    (
        status,
        Json(ErrorRes {
            message: err.to_string(),
        }),
    )
}

fn parse_identity(raw: &str) -> Result<Identity, Rejection> {
    Identity::new(raw).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorRes {
                message: e.to_string(),
            }),
        )
    })
}

fn to_dto(view: RepresentationView) -> RepresentationDto {
    RepresentationDto {
        id: view.representation.id,
        patient_profile_id: view.representation.patient_profile_id,
        representative_profile_id: view.representation.representative_profile_id,
        status: view.representation.status.to_string(),
        created_at: view.representation.created_at,
        updated_at: view.representation.updated_at,
        counterparty: CounterpartyDto {
            id: view.counterparty.id,
            identity: view.counterparty.identity.to_string(),
            birthdate: view.counterparty.birthdate,
            patient_profile_id: view.counterparty.patient_profile_id,
        },
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API.
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/profiles/{profile_id}/represented",
    params(("profile_id" = Uuid, Path, description = "Profile acting as representative")),
    responses(
        (status = 200, description = "Patients represented by this profile", body = RepresentedRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Lists the patients the given profile represents.
///
/// Only approved, non-deleted relationships are returned; rows whose
/// counter-party user is logically deleted are dropped.
async fn get_represented(
    State(state): State<AppState>,
    AxumPath(profile_id): AxumPath<Uuid>,
) -> Result<Json<RepresentedRes>, Rejection> {
    let views = state
        .representatives
        .get_represented(profile_id)
        .await
        .map_err(reject)?;
    Ok(Json(RepresentedRes {
        represented: views.into_iter().map(to_dto).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/profiles/{profile_id}/representatives",
    params(("profile_id" = Uuid, Path, description = "Represented profile")),
    responses(
        (status = 200, description = "Representatives of this profile", body = RepresentativesRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Lists the representatives of the given profile.
async fn get_representatives(
    State(state): State<AppState>,
    AxumPath(profile_id): AxumPath<Uuid>,
) -> Result<Json<RepresentativesRes>, Rejection> {
    let views = state
        .representatives
        .get_representatives(profile_id)
        .await
        .map_err(reject)?;
    Ok(Json(RepresentativesRes {
        representatives: views.into_iter().map(to_dto).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/profiles/{profile_id}/representatives",
    params(("profile_id" = Uuid, Path, description = "Represented profile")),
    request_body = CreateRepresentativeReq,
    responses(
        (status = 200, description = "Refreshed representatives list", body = RepresentativesRes),
        (status = 400, description = "Invalid identity, underage target or self-representation", body = ErrorRes),
        (status = 404, description = "No user for the given identity", body = ErrorRes),
        (status = 409, description = "Invite already pending or representative already registered", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Invites a user, looked up by identity document, as a representative.
///
/// Returns the caller's refreshed representatives list, which reflects the new
/// or restored relationship record.
async fn create_representative(
    State(state): State<AppState>,
    AxumPath(profile_id): AxumPath<Uuid>,
    Json(req): Json<CreateRepresentativeReq>,
) -> Result<Json<RepresentativesRes>, Rejection> {
    let identity = parse_identity(&req.identity)?;
    let views = state
        .representatives
        .create_representative(profile_id, &identity)
        .await
        .map_err(reject)?;
    Ok(Json(RepresentativesRes {
        representatives: views.into_iter().map(to_dto).collect(),
    }))
}

#[utoipa::path(
    delete,
    path = "/profiles/{profile_id}/representatives/{representation_id}",
    params(
        ("profile_id" = Uuid, Path, description = "Represented profile"),
        ("representation_id" = Uuid, Path, description = "Relationship record id")
    ),
    responses(
        (status = 200, description = "Refreshed representatives list", body = RepresentativesRes),
        (status = 404, description = "Caller profile not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Removes one of the caller's representatives (soft delete).
async fn remove_representative(
    State(state): State<AppState>,
    AxumPath((profile_id, representation_id)): AxumPath<(Uuid, Uuid)>,
) -> Result<Json<RepresentativesRes>, Rejection> {
    let views = state
        .representatives
        .remove_representative(profile_id, representation_id)
        .await
        .map_err(reject)?;
    Ok(Json(RepresentativesRes {
        representatives: views.into_iter().map(to_dto).collect(),
    }))
}

#[utoipa::path(
    delete,
    path = "/profiles/{profile_id}/represented/{representation_id}",
    params(
        ("profile_id" = Uuid, Path, description = "Profile acting as representative"),
        ("representation_id" = Uuid, Path, description = "Relationship record id")
    ),
    responses(
        (status = 200, description = "Refreshed representatives list", body = RepresentativesRes),
        (status = 404, description = "Acting profile not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Removes a relationship from the representative's side (soft delete).
async fn remove_represented(
    State(state): State<AppState>,
    AxumPath((profile_id, representation_id)): AxumPath<(Uuid, Uuid)>,
) -> Result<Json<RepresentativesRes>, Rejection> {
    let views = state
        .representatives
        .remove_represented(profile_id, representation_id)
        .await
        .map_err(reject)?;
    Ok(Json(RepresentativesRes {
        representatives: views.into_iter().map(to_dto).collect(),
    }))
}
