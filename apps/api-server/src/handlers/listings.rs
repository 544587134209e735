//! Listing endpoints.

use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, web};
use uuid::Uuid;

use market_core::resource::{CollectionQuery, ReadScope, Representation};
use market_shared::CollectionResponse;

use crate::middleware::error::AppResult;
use crate::negotiate::{self, Format};
use crate::state::AppState;

/// GET /api/listings
pub async fn list(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<Vec<(String, String)>>,
) -> AppResult<HttpResponse> {
    let query = CollectionQuery::from_pairs(&query)?;
    let page = state.listings.list(&query).await?;

    match Format::from_request(&req) {
        Format::Json => Ok(HttpResponse::Ok().json(CollectionResponse {
            items: page.items,
            total_items: page.total_items,
            page: page.page,
            items_per_page: page.items_per_page,
        })),
        Format::Csv => {
            let columns = state
                .listings
                .projector()
                .columns(ReadScope::Collection, query.properties.as_deref());
            let body = negotiate::to_csv(&columns, &page.items)?;
            Ok(negotiate::csv_response(StatusCode::OK, body))
        }
    }
}

/// GET /api/listings/{id}
pub async fn get(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let item = state.listings.get(path.into_inner()).await?;
    respond(&req, &state, StatusCode::OK, item)
}

/// POST /api/listings
pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<Representation>,
) -> AppResult<HttpResponse> {
    let item = state.listings.create(&body).await?;
    respond(&req, &state, StatusCode::CREATED, item)
}

/// PUT /api/listings/{id}
pub async fn update(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<Representation>,
) -> AppResult<HttpResponse> {
    let item = state.listings.update(path.into_inner(), &body).await?;
    respond(&req, &state, StatusCode::OK, item)
}

/// PUT /api/listings/{id}/publish
pub async fn publish(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<Representation>,
) -> AppResult<HttpResponse> {
    let item = state.listings.publish(path.into_inner(), &body).await?;
    respond(&req, &state, StatusCode::OK, item)
}

fn respond(
    req: &HttpRequest,
    state: &AppState,
    status: StatusCode,
    item: Representation,
) -> AppResult<HttpResponse> {
    let mut response = match Format::from_request(req) {
        Format::Json => HttpResponse::build(status).json(&item),
        Format::Csv => {
            let columns = state.listings.projector().columns(ReadScope::Item, None);
            let body = negotiate::to_csv(&columns, std::slice::from_ref(&item))?;
            negotiate::csv_response(status, body)
        }
    };

    if status == StatusCode::CREATED {
        let location = item
            .get("id")
            .and_then(|id| id.as_str())
            .and_then(|id| header::HeaderValue::from_str(&format!("/api/listings/{id}")).ok());
        if let Some(location) = location {
            response.headers_mut().insert(header::LOCATION, location);
        }
    }

    Ok(response)
}
