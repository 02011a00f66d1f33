use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{
    Decision, ErrorResponse, HealthResponse, MatchDecisionRequest, MatchDecisionResponse,
    MatchesListQuery, MutualFriendsQuery, PotentialMatchQuery, PotentialMatchResponse,
    UserListResponse,
};
use crate::core::DecisionError;
use crate::services::{MatchService, MatchServiceError};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MatchService>,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/potential-matches", web::get().to(next_potential_match))
        .route("/match-decisions", web::post().to(record_decision))
        .route("/matches-list", web::get().to(matches_list))
        .route("/mutual-friends", web::get().to(mutual_friends));
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Map a service error onto a JSON error response
pub(crate) fn service_error(context: &str, err: MatchServiceError) -> HttpResponse {
    match err {
        MatchServiceError::InvalidInput(message) => HttpResponse::BadRequest().json(ErrorResponse {
            error: context.to_string(),
            message,
            status_code: 400,
        }),
        MatchServiceError::Decision(e @ DecisionError::SelfDecision(_)) => {
            HttpResponse::BadRequest().json(ErrorResponse {
                error: context.to_string(),
                message: e.to_string(),
                status_code: 400,
            })
        }
        MatchServiceError::Decision(e @ DecisionError::DecisionAfterMatch { .. }) => {
            HttpResponse::Conflict().json(ErrorResponse {
                error: context.to_string(),
                message: e.to_string(),
                status_code: 409,
            })
        }
        MatchServiceError::Store(e) => {
            tracing::error!("{}: {}", context, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: context.to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.service.health().await;
    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Next potential match endpoint
///
/// GET /api/v1/potential-matches?userId={userId}
///
/// Each call surfaces a different candidate until the queue is exhausted,
/// after which `potentialMatchId` is null and `exhausted` is true.
async fn next_potential_match(
    state: web::Data<AppState>,
    query: web::Query<PotentialMatchQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    match state.service.next_potential_match(&query.user_id).await {
        Ok(next) => HttpResponse::Ok().json(PotentialMatchResponse {
            user_id: query.user_id.clone(),
            exhausted: next.is_none(),
            potential_match_id: next,
        }),
        Err(e) => service_error("Failed to fetch next potential match", e),
    }
}

/// Record decision endpoint
///
/// POST /api/v1/match-decisions
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "potentialMatchId": "string",
///   "decision": "FRIENDED|PASSED"
/// }
/// ```
async fn record_decision(
    state: web::Data<AppState>,
    req: web::Json<MatchDecisionRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let decision: Decision = match req.decision.parse() {
        Ok(decision) => decision,
        Err(e) => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid decision".to_string(),
                message: format!("{}", e),
                status_code: 400,
            });
        }
    };

    match state
        .service
        .record_decision(&req.user_id, &req.potential_match_id, decision)
        .await
    {
        Ok(report) => HttpResponse::Ok().json(MatchDecisionResponse {
            success: true,
            event_id: uuid::Uuid::new_v4().to_string(),
            decision: report.decision,
            mutual_match: report.mutual_match.is_some(),
        }),
        Err(e) => service_error("Failed to record decision", e),
    }
}

/// Mutual matches endpoint
///
/// GET /api/v1/matches-list?userId={userId}
async fn matches_list(
    state: web::Data<AppState>,
    query: web::Query<MatchesListQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    match state.service.matches_list(&query.user_id).await {
        Ok(ids) => HttpResponse::Ok().json(UserListResponse::from(ids)),
        Err(e) => service_error("Failed to fetch matches", e),
    }
}

/// Mutual friends endpoint
///
/// GET /api/v1/mutual-friends?userId1={userId}&userId2={userId}
///
/// Responds with a bare JSON array of user IDs.
async fn mutual_friends(
    state: web::Data<AppState>,
    query: web::Query<MutualFriendsQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    match state.service.mutual_friends(&query.user_id_1, &query.user_id_2).await {
        Ok(ids) => HttpResponse::Ok().json(ids),
        Err(e) => service_error("Failed to fetch mutual friends", e),
    }
}
