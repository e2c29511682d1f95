// Copyright (C) 2026 The signalements authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use signalements_api::{
    ApiError, BulkTransitionRequest, BulkTransitionResponse, CreateReportRequest,
    GlobalCapabilities, ReportCapabilities, TransitionRequest, TransmitReportsRequest,
    TransmitReportsResponse, UpdateOfficeRequest, UpdateReportRequest, bulk_transition,
    compute_global_capabilities, create_report, get_report, list_packages, list_reports,
    report_audit_trail, report_capabilities, route_candidates, transition, transmit_reports,
    translate_persistence_error, update_office, update_report,
};
use signalements_audit::AuditEvent;
use signalements_domain::{Office, Package, Report};
use signalements_persistence::{Persistence, PersistenceError, Seed, SeedSummary};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::session::SessionActor;

/// Signalements Server - HTTP server for property-tax anomaly reports
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// JSON file of reference data (communes, organizations, users, offices) to load at start-up
    #[arg(short, long)]
    seed: Option<String>,
}

/// Application state shared across handlers.
///
/// Handlers run one at a time against the single connection.
#[derive(Clone)]
struct AppState {
    persistence: Arc<Mutex<Persistence>>,
}

/// API request for a workflow step.
///
/// `lock_version` is the version of the report the client acted on.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct TransitionApiRequest {
    lock_version: i64,
    #[serde(flatten)]
    transition: TransitionRequest,
}

/// API request for editing a report.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct UpdateReportApiRequest {
    lock_version: i64,
    #[serde(flatten)]
    changes: UpdateReportRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ListReportsApiResponse {
    reports: Vec<Report>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ListPackagesApiResponse {
    packages: Vec<Package>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RouteCandidatesApiResponse {
    report_id: i64,
    offices: Vec<Office>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AuditTrailApiResponse {
    report_id: i64,
    events: Vec<AuditEvent>,
}

/// API response for errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidTransition { .. } | ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::RoutingMismatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err).into()
    }
}

/// Loads the stored report and stamps it with the client's version.
///
/// The handlers compare that version with the stored one before writing.
fn client_snapshot(
    persistence: &mut Persistence,
    report_id: i64,
    lock_version: i64,
) -> Result<Report, HttpError> {
    let mut report: Report = persistence.get_report(report_id)?;
    report.lock_version = lock_version;
    Ok(report)
}

async fn handle_list_reports(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
) -> Result<Json<ListReportsApiResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let reports: Vec<Report> = list_reports(&mut persistence, &actor)?;
    Ok(Json(ListReportsApiResponse { reports }))
}

async fn handle_create_report(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, cause): SessionActor,
    Json(req): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<Report>), HttpError> {
    info!(
        user_id = actor.user.user_id,
        commune = %req.commune,
        form_type = %req.form_type,
        "Handling create_report request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let report: Report = create_report(&mut persistence, &actor, &req, cause)?;
    Ok((StatusCode::CREATED, Json(report)))
}

async fn handle_get_report(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(report_id): Path<i64>,
) -> Result<Json<Report>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(get_report(&mut persistence, &actor, report_id)?))
}

async fn handle_update_report(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, cause): SessionActor,
    Path(report_id): Path<i64>,
    Json(req): Json<UpdateReportApiRequest>,
) -> Result<Json<Report>, HttpError> {
    info!(
        user_id = actor.user.user_id,
        report_id,
        lock_version = req.lock_version,
        "Handling update_report request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let snapshot: Report = client_snapshot(&mut persistence, report_id, req.lock_version)?;
    let report: Report = update_report(&mut persistence, &actor, &snapshot, &req.changes, cause)?;
    Ok(Json(report))
}

async fn handle_transition(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, cause): SessionActor,
    Path(report_id): Path<i64>,
    Json(req): Json<TransitionApiRequest>,
) -> Result<Json<Report>, HttpError> {
    info!(
        user_id = actor.user.user_id,
        report_id,
        lock_version = req.lock_version,
        transition = ?req.transition,
        "Handling transition request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let snapshot: Report = client_snapshot(&mut persistence, report_id, req.lock_version)?;
    let report: Report = transition(&mut persistence, &actor, &snapshot, &req.transition, cause)?;
    Ok(Json(report))
}

async fn handle_transmit(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, cause): SessionActor,
    Json(req): Json<TransmitReportsRequest>,
) -> Result<Json<TransmitReportsResponse>, HttpError> {
    info!(
        user_id = actor.user.user_id,
        reports = req.report_ids.len(),
        "Handling transmit request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let response: TransmitReportsResponse =
        transmit_reports(&mut persistence, &actor, &req.report_ids, &cause)?;
    Ok(Json(response))
}

async fn handle_bulk_transition(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, cause): SessionActor,
    Json(req): Json<BulkTransitionRequest>,
) -> Json<BulkTransitionResponse> {
    info!(
        user_id = actor.user.user_id,
        reports = req.report_ids.len(),
        transition = ?req.transition,
        "Handling bulk transition request"
    );
    let mut persistence = app_state.persistence.lock().await;
    Json(bulk_transition(
        &mut persistence,
        &actor,
        &req.report_ids,
        &req.transition,
        &cause,
    ))
}

async fn handle_report_capabilities(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(report_id): Path<i64>,
) -> Result<Json<ReportCapabilities>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(report_capabilities(
        &mut persistence,
        &actor,
        report_id,
    )?))
}

async fn handle_report_audit_trail(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(report_id): Path<i64>,
) -> Result<Json<AuditTrailApiResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let events: Vec<AuditEvent> = report_audit_trail(&mut persistence, &actor, report_id)?;
    Ok(Json(AuditTrailApiResponse { report_id, events }))
}

async fn handle_route_candidates(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(report_id): Path<i64>,
) -> Result<Json<RouteCandidatesApiResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let offices: Vec<Office> = route_candidates(&mut persistence, &actor, report_id)?;
    Ok(Json(RouteCandidatesApiResponse { report_id, offices }))
}

async fn handle_list_packages(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
) -> Result<Json<ListPackagesApiResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let packages: Vec<Package> = list_packages(&mut persistence, &actor)?;
    Ok(Json(ListPackagesApiResponse { packages }))
}

async fn handle_update_office(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor, _): SessionActor,
    Path(office_id): Path<i64>,
    Json(req): Json<UpdateOfficeRequest>,
) -> Result<Json<Office>, HttpError> {
    info!(
        user_id = actor.user.user_id,
        office_id,
        "Handling update_office request"
    );
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(update_office(&mut persistence, &actor, office_id, &req)?))
}

#[allow(clippy::unused_async)]
async fn handle_global_capabilities(
    SessionActor(actor, _): SessionActor,
) -> Json<GlobalCapabilities> {
    Json(compute_global_capabilities(&actor))
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/reports", get(handle_list_reports).post(handle_create_report))
        .route("/reports/transmit", post(handle_transmit))
        .route("/reports/bulk", post(handle_bulk_transition))
        .route(
            "/reports/{report_id}",
            get(handle_get_report).patch(handle_update_report),
        )
        .route("/reports/{report_id}/transitions", post(handle_transition))
        .route(
            "/reports/{report_id}/capabilities",
            get(handle_report_capabilities),
        )
        .route("/reports/{report_id}/audit", get(handle_report_audit_trail))
        .route(
            "/reports/{report_id}/route_candidates",
            get(handle_route_candidates),
        )
        .route("/packages", get(handle_list_packages))
        .route("/offices/{office_id}", patch(handle_update_office))
        .route("/capabilities", get(handle_global_capabilities))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing signalements server");

    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    if let Some(seed_path) = &args.seed {
        let seed: Seed = Seed::from_path(seed_path)?;
        let summary: SeedSummary = persistence.load_seed(&seed)?;
        info!(
            path = %seed_path,
            communes = summary.communes,
            organizations = summary.organizations,
            users = summary.users,
            offices = summary.offices,
            "Loaded seed data"
        );
    }

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use serde_json::{Value, json};
    use signalements_api::BulkItemStatus;
    use tower::ServiceExt;

    const SEED_JSON: &str = include_str!("../../../data/seed.json");

    const COLLECTIVITY_USER: i64 = 100;
    const OTHER_COLLECTIVITY_USER: i64 = 101;
    const DDFIP_ADMIN: i64 = 110;
    const OFFICE_MEMBER: i64 = 112;
    const DGFIP_USER: i64 = 130;

    /// Helper to create test app state with seeded in-memory persistence.
    fn create_test_app_state() -> AppState {
        let mut persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        persistence
            .load_seed(&Seed::from_json_str(SEED_JSON).expect("Invalid seed fixture"))
            .expect("Failed to load seed");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
        }
    }

    fn request(method: &str, uri: &str, user_id: Option<i64>, body: Option<&Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user_id) = user_id {
            builder = builder.header(session::USER_ID_HEADER, user_id.to_string());
        }
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        user_id: i64,
        body: Option<Value>,
    ) -> (HttpStatusCode, Value) {
        let response = app
            .clone()
            .oneshot(request(method, uri, Some(user_id), body.as_ref()))
            .await
            .unwrap();
        let status: HttpStatusCode = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap()
        };
        (status, value)
    }

    async fn create_test_report(app: &Router, commune: &str, form_type: &str) -> Report {
        let (status, body) = send(
            app,
            "POST",
            "/reports",
            COLLECTIVITY_USER,
            Some(json!({ "commune": commune, "form_type": form_type })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::CREATED);
        serde_json::from_value(body).unwrap()
    }

    async fn step(app: &Router, user_id: i64, report: &Report, transition: Value) -> (HttpStatusCode, Value) {
        let mut body: Value = transition;
        body["lock_version"] = json!(report.lock_version);
        send(
            app,
            "POST",
            &format!("/reports/{}/transitions", report.report_id),
            user_id,
            Some(body),
        )
        .await
    }

    /// Creates a report on Bayonne and takes it to `transmitted`.
    async fn create_transmitted_report(app: &Router, form_type: &str) -> Report {
        let draft: Report = create_test_report(app, "64102", form_type).await;
        let (status, _) = step(app, COLLECTIVITY_USER, &draft, json!({ "action": "mark_ready" })).await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, body) = send(
            app,
            "POST",
            "/reports/transmit",
            COLLECTIVITY_USER,
            Some(json!({ "report_ids": [draft.report_id] })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        let response: TransmitReportsResponse = serde_json::from_value(body).unwrap();
        response.reports[0].clone()
    }

    #[tokio::test]
    async fn test_missing_user_header_is_unauthorized() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .clone()
            .oneshot(request("GET", "/reports", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);

        let (status, body) = send(&app, "GET", "/reports", 999, None).await;
        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], json!(true));
    }

    #[tokio::test]
    async fn test_create_and_get_report() {
        let app: Router = build_router(create_test_app_state());
        let report: Report = create_test_report(&app, "64102", "valuation_habitation").await;
        assert_eq!(report.lock_version, 0);

        let (status, body) = send(
            &app,
            "GET",
            &format!("/reports/{}", report.report_id),
            COLLECTIVITY_USER,
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["state"], json!("draft"));
        assert_eq!(body["origin"], json!("web_ui"));

        let (status, _) = send(
            &app,
            "GET",
            &format!("/reports/{}", report.report_id),
            OTHER_COLLECTIVITY_USER,
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::FORBIDDEN);

        let (status, _) = send(&app, "GET", "/reports/999", COLLECTIVITY_USER, None).await;
        assert_eq!(status, HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_input_returns_bad_request() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(
            &app,
            "POST",
            "/reports",
            COLLECTIVITY_USER,
            Some(json!({ "commune": "64102", "form_type": "valuation_castle" })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("form_type"));
    }

    #[tokio::test]
    async fn test_ddfip_cannot_create_reports() {
        let app: Router = build_router(create_test_app_state());

        let (status, _) = send(
            &app,
            "POST",
            "/reports",
            DDFIP_ADMIN,
            Some(json!({ "commune": "64102", "form_type": "valuation_habitation" })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_update_report_with_lock_version() {
        let app: Router = build_router(create_test_app_state());
        let report: Report = create_test_report(&app, "64102", "valuation_habitation").await;
        let uri: String = format!("/reports/{}", report.report_id);

        let (status, body) = send(
            &app,
            "PATCH",
            &uri,
            COLLECTIVITY_USER,
            Some(json!({ "lock_version": 0, "priority": "high", "note": "Veranda" })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["priority"], json!("high"));
        assert_eq!(body["lock_version"], json!(1));

        let (status, _) = send(
            &app,
            "PATCH",
            &uri,
            COLLECTIVITY_USER,
            Some(json!({ "lock_version": 0, "note": "Stale edit" })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_workflow_through_http() {
        let app: Router = build_router(create_test_app_state());
        let transmitted: Report = create_transmitted_report(&app, "valuation_habitation").await;
        assert_eq!(transmitted.ddfip_id, Some(10));

        let (status, body) = step(&app, DDFIP_ADMIN, &transmitted, json!({ "action": "accept" })).await;
        assert_eq!(status, HttpStatusCode::OK);
        let accepted: Report = serde_json::from_value(body).unwrap();

        let (status, body) = send(
            &app,
            "GET",
            &format!("/reports/{}/route_candidates", accepted.report_id),
            DDFIP_ADMIN,
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["offices"][0]["office_id"], json!(1));

        let (status, _) = step(
            &app,
            DDFIP_ADMIN,
            &accepted,
            json!({ "action": "assign", "office_id": 2 }),
        )
        .await;
        assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = step(
            &app,
            DDFIP_ADMIN,
            &accepted,
            json!({ "action": "assign", "office_id": 1 }),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        let assigned: Report = serde_json::from_value(body).unwrap();

        let (status, body) = step(
            &app,
            OFFICE_MEMBER,
            &assigned,
            json!({ "action": "resolve", "resolution": "applicable", "reponse": "Corrected" }),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        let applicable: Report = serde_json::from_value(body).unwrap();

        let (status, _) = step(&app, OFFICE_MEMBER, &applicable, json!({ "action": "confirm" })).await;
        assert_eq!(status, HttpStatusCode::FORBIDDEN);

        let (status, body) = step(&app, DDFIP_ADMIN, &applicable, json!({ "action": "confirm" })).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["state"], json!("approved"));

        let (status, body) = send(
            &app,
            "GET",
            &format!("/reports/{}/audit", assigned.report_id),
            COLLECTIVITY_USER,
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["events"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_illegal_and_stale_transitions_conflict() {
        let app: Router = build_router(create_test_app_state());
        let transmitted: Report = create_transmitted_report(&app, "valuation_habitation").await;

        let (status, _) = step(
            &app,
            DDFIP_ADMIN,
            &transmitted,
            json!({ "action": "assign", "office_id": 1 }),
        )
        .await;
        assert_eq!(status, HttpStatusCode::CONFLICT);

        let (status, _) = step(&app, DDFIP_ADMIN, &transmitted, json!({ "action": "accept" })).await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, body) = step(
            &app,
            DDFIP_ADMIN,
            &transmitted,
            json!({ "action": "reject", "reason": "Duplicate" }),
        )
        .await;
        assert_eq!(status, HttpStatusCode::CONFLICT);
        assert!(body["message"].as_str().unwrap().contains("version"));
    }

    #[tokio::test]
    async fn test_collectivity_cannot_discard_transmitted_report() {
        let app: Router = build_router(create_test_app_state());
        let transmitted: Report = create_transmitted_report(&app, "occupancy_habitation").await;

        let (status, _) = step(&app, COLLECTIVITY_USER, &transmitted, json!({ "action": "discard" })).await;
        assert_eq!(status, HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_bulk_transition_over_http() {
        let app: Router = build_router(create_test_app_state());
        let first: Report = create_transmitted_report(&app, "valuation_habitation").await;
        let second: Report = create_transmitted_report(&app, "occupancy_habitation").await;

        let (status, body) = send(
            &app,
            "POST",
            "/reports/bulk",
            DDFIP_ADMIN,
            Some(json!({
                "report_ids": [first.report_id, second.report_id, 999],
                "transition": { "action": "accept" }
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        let response: BulkTransitionResponse = serde_json::from_value(body).unwrap();
        let statuses: Vec<BulkItemStatus> = response.outcomes.iter().map(|o| o.status).collect();
        assert_eq!(
            statuses,
            vec![
                BulkItemStatus::Succeeded,
                BulkItemStatus::Succeeded,
                BulkItemStatus::Failed
            ]
        );
    }

    #[tokio::test]
    async fn test_listings_are_scoped() {
        let app: Router = build_router(create_test_app_state());
        create_test_report(&app, "64102", "valuation_habitation").await;
        create_transmitted_report(&app, "valuation_habitation").await;

        let (_, body) = send(&app, "GET", "/reports", COLLECTIVITY_USER, None).await;
        assert_eq!(body["reports"].as_array().unwrap().len(), 2);

        let (_, body) = send(&app, "GET", "/reports", DGFIP_USER, None).await;
        assert_eq!(body["reports"].as_array().unwrap().len(), 1);

        let (_, body) = send(&app, "GET", "/reports", OTHER_COLLECTIVITY_USER, None).await;
        assert!(body["reports"].as_array().unwrap().is_empty());

        let (status, body) = send(&app, "GET", "/packages", DDFIP_ADMIN, None).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["packages"].as_array().unwrap().len(), 1);

        let (_, body) = send(&app, "GET", "/packages", OFFICE_MEMBER, None).await;
        assert!(body["packages"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_capabilities_endpoints() {
        let app: Router = build_router(create_test_app_state());
        let report: Report = create_test_report(&app, "64102", "valuation_habitation").await;

        let (status, body) = send(
            &app,
            "GET",
            &format!("/reports/{}/capabilities", report.report_id),
            COLLECTIVITY_USER,
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["can_update"], json!("allowed"));
        assert_eq!(body["can_accept"], json!("denied"));

        let (status, body) = send(&app, "GET", "/capabilities", DDFIP_ADMIN, None).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["can_create_report"], json!("denied"));
        assert_eq!(body["can_manage_offices"], json!("allowed"));
    }

    #[tokio::test]
    async fn test_update_office_over_http() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(
            &app,
            "PATCH",
            "/offices/2",
            DDFIP_ADMIN,
            Some(json!({ "member_ids": [113] })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["member_ids"], json!([113]));

        let (status, _) = send(
            &app,
            "PATCH",
            "/offices/2",
            OFFICE_MEMBER,
            Some(json!({ "member_ids": [] })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::FORBIDDEN);

        let (status, _) = send(
            &app,
            "PATCH",
            "/offices/99",
            DDFIP_ADMIN,
            Some(json!({ "member_ids": [] })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::NOT_FOUND);
    }
}
