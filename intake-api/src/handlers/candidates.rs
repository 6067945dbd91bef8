use actix_web::{web, HttpResponse, Result as ActixResult};
use serde::Deserialize;
use shared_types::{CandidatesResponse, DeleteCandidateResponse};
use std::sync::Arc;

use crate::database::candidates as candidates_db;
use crate::database::details as details_db;
use crate::database::{Database, StoreError};

#[derive(Debug, Deserialize)]
pub struct CandidateSearchQuery {
    pub search: Option<String>,
}

fn store_error(e: StoreError) -> actix_web::Error {
    match e {
        StoreError::NotFound => actix_web::error::ErrorNotFound(e.to_string()),
        _ => actix_web::error::ErrorInternalServerError(e.to_string()),
    }
}

pub async fn list_candidates(
    db: web::Data<Arc<Database>>,
    query: web::Query<CandidateSearchQuery>,
) -> ActixResult<HttpResponse> {
    let search = query.into_inner().search.unwrap_or_default();

    let candidates = candidates_db::search_candidates(db.pool.clone(), &search)
        .await
        .map_err(store_error)?;

    Ok(HttpResponse::Ok().json(CandidatesResponse { candidates }))
}

pub async fn get_candidate(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let candidate_id = path.into_inner();

    let candidate = candidates_db::get_candidate(db.pool.clone(), candidate_id)
        .await
        .map_err(store_error)?;

    Ok(HttpResponse::Ok().json(candidate))
}

pub async fn get_candidate_details(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let candidate_id = path.into_inner();

    let details = details_db::get_candidate_details(db.pool.clone(), candidate_id)
        .await
        .map_err(store_error)?;

    Ok(HttpResponse::Ok().json(details))
}

pub async fn delete_candidate(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let candidate_id = path.into_inner();

    let deleted = candidates_db::delete_candidate(db.pool.clone(), candidate_id)
        .await
        .map_err(store_error)?;

    if deleted {
        tracing::info!("Deleted candidate {}", candidate_id);
    }

    Ok(HttpResponse::Ok().json(DeleteCandidateResponse {
        candidate_id,
        deleted,
    }))
}
