use crate::core::{MatchError, Matcher};
use crate::models::{
    ErrorResponse, HealthResponse, MatchMentorsRequest, MatchMentorsResponse, MatchQuery,
    MentorsResponse,
};
use crate::services::{CaseArchive, DashScopeClient, MentorRepository};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<MentorRepository>,
    pub archive: Arc<CaseArchive>,
    pub oracle: Arc<DashScopeClient>,
    pub matcher: Matcher,
}

/// Configure mentor-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/mentors", web::get().to(list_mentors))
        .route("/mentors/reload", web::post().to(reload_mentors))
        .route("/match-mentors", web::post().to(match_mentors));
}

/// Health check endpoint
///
/// GET /health
pub(crate) async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        mentor_count: state.repository.len(),
        timestamp: chrono::Utc::now(),
    })
}

/// List the full mentor pool
///
/// GET /api/mentors
async fn list_mentors(state: web::Data<AppState>) -> impl Responder {
    let mentors = state.repository.snapshot();

    HttpResponse::Ok().json(MentorsResponse {
        count: mentors.len(),
        mentors: mentors.as_ref().clone(),
    })
}

/// Reload the mentor pool from disk
///
/// POST /api/mentors/reload
async fn reload_mentors(state: web::Data<AppState>) -> impl Responder {
    match state.repository.reload() {
        Ok(count) => HttpResponse::Ok().json(serde_json::json!({ "count": count })),
        Err(e) => {
            tracing::error!("Failed to reload mentor pool: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to reload mentor pool".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Match mentors endpoint
///
/// POST /api/match-mentors
///
/// Request body:
/// ```json
/// {
///   "direction": "金融",
///   "position": "分析师"
/// }
/// ```
async fn match_mentors(
    state: web::Data<AppState>,
    req: web::Json<MatchMentorsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for match request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let query = MatchQuery::new(req.direction.clone(), req.position.clone());
    let pool = state.repository.snapshot();

    tracing::info!(
        "Matching mentors, direction: {}, position: {}",
        query.direction,
        query.position.as_deref().unwrap_or("unspecified")
    );

    match state
        .matcher
        .select_mentors(&query, &pool, state.oracle.as_ref())
        .await
    {
        Ok(mentors) => {
            tracing::info!(
                "Returning {} mentors (from a pool of {})",
                mentors.len(),
                pool.len()
            );
            HttpResponse::Ok().json(MatchMentorsResponse {
                count: mentors.len(),
                mentors,
            })
        }
        Err(e @ MatchError::InvalidRequest) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid request".to_string(),
            message: e.to_string(),
            status_code: 400,
        }),
    }
}
