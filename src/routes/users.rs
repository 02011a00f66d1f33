use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{ErrorResponse, UserData, UserDataQuery, UserDataRequest, UserDataResponse};
use crate::routes::matches::{service_error, AppState};

/// Configure profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/user-data", web::get().to(get_user_data))
        .route("/user-data", web::post().to(save_user_data));
}

/// Profile lookup endpoint
///
/// GET /api/v1/user-data?userId={userId}
async fn get_user_data(
    state: web::Data<AppState>,
    query: web::Query<UserDataQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state.service.get_user(&query.user_id).await {
        Ok(user) => HttpResponse::Ok().json(UserDataResponse {
            user_found: user.is_some(),
            user,
        }),
        Err(e) => service_error("Failed to fetch user data", e),
    }
}

/// Profile create/update endpoint
///
/// POST /api/v1/user-data
///
/// Fields left empty keep their stored values.
async fn save_user_data(
    state: web::Data<AppState>,
    req: web::Json<UserDataRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let req = req.into_inner();
    let update = UserData {
        user_id: req.user_id,
        name: req.name,
        email: req.email.unwrap_or_default(),
        bio: req.bio,
        friend_ids: req.friend_ids,
    };

    match state.service.upsert_user(update).await {
        Ok(user) => HttpResponse::Ok().json(UserDataResponse {
            user_found: true,
            user: Some(user),
        }),
        Err(e) => service_error("Failed to save user data", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{MatchService, MemoryStore};
    use actix_web::{test, App};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_user_data_create_then_read() {
        let state = AppState {
            service: Arc::new(MatchService::new(Arc::new(MemoryStore::new()))),
        };
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/user-data?userId=a").to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["userFound"], false);

        let req = test::TestRequest::post()
            .uri("/user-data")
            .set_json(serde_json::json!({
                "userId": "a",
                "name": "Ada",
                "friendIds": ["b", "a"],
            }))
            .to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["userFound"], true);
        assert_eq!(resp["friendIds"], serde_json::json!(["b"]));

        let req = test::TestRequest::get().uri("/user-data?userId=a").to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["name"], "Ada");
    }

    #[actix_web::test]
    async fn test_bad_email_rejected() {
        let state = AppState {
            service: Arc::new(MatchService::new(Arc::new(MemoryStore::new()))),
        };
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/user-data")
            .set_json(serde_json::json!({ "userId": "a", "email": "not-an-email" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }
}
