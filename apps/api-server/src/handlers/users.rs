//! User endpoints - the targets of a listing's `owner` reference.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use market_core::domain::User;
use market_core::ports::{BaseRepository, Clock, UserRepository};
use market_shared::dto::{CreateUserRequest, UserResponse, ViolationDto};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const INVALID_EMAIL_MESSAGE: &str = "This value is not a valid email address.";

fn to_response(user: &User) -> UserResponse {
    UserResponse {
        iri: User::iri(user.id),
        id: user.id.to_string(),
        email: user.email.clone(),
        created_at: user.created_at.to_rfc3339(),
    }
}

/// Create a user.
///
/// POST /api/users
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreateUserRequest>,
) -> AppResult<HttpResponse> {
    let email = body.into_inner().email.trim().to_string();

    if !email.contains('@') {
        return Err(AppError::Validation(vec![ViolationDto {
            property_path: "email".to_string(),
            message: INVALID_EMAIL_MESSAGE.to_string(),
        }]));
    }

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let user = state
        .users
        .insert(User::new(email, state.clock.now()))
        .await?;
    tracing::info!(user_id = %user.id, "User created");

    Ok(HttpResponse::Created().json(to_response(&user)))
}

/// Fetch a user.
///
/// GET /api/users/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))?;

    Ok(HttpResponse::Ok().json(to_response(&user)))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};
    use serde_json::{Value, json};

    use crate::config::ListingsConfig;
    use crate::handlers::configure_routes;
    use crate::state::AppState;

    #[actix_rt::test]
    async fn test_create_and_get_user() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::in_memory(ListingsConfig::default())))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({"email": "cheeselover@example.com"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        let created: Value = test::read_body_json(resp).await;
        let iri = created["@id"].as_str().unwrap();
        assert_eq!(iri, format!("/api/users/{}", created["id"].as_str().unwrap()));

        let req = test::TestRequest::get().uri(iri).to_request();
        let fetched: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched, created);

        let req = test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({"email": "cheeselover@example.com"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 409);

        let req = test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({"email": "not-an-email"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 422);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["violations"][0]["propertyPath"], "email");
    }
}
