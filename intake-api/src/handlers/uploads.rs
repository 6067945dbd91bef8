use actix_web::{http::StatusCode, web, HttpResponse, Result as ActixResult};
use shared_types::{ErrorResponse, ProcessedDocumentResponse};
use std::sync::Arc;

use crate::database::StoreError;
use crate::jobs::intake_manager::{IntakeError, IntakeManager};

fn error_status(e: &IntakeError) -> StatusCode {
    match e {
        IntakeError::InvalidFileName(_) => StatusCode::BAD_REQUEST,
        IntakeError::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
        IntakeError::Storage(StoreError::ConstraintViolation(_)) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Accept a raw PDF body and run it through the intake pipeline
pub async fn upload_document(
    manager: web::Data<Arc<IntakeManager>>,
    path: web::Path<String>,
    body: web::Bytes,
) -> ActixResult<HttpResponse> {
    let file_name = path.into_inner();

    match manager.process_upload(&file_name, &body).await {
        Ok(document) => Ok(HttpResponse::Created().json(ProcessedDocumentResponse {
            file_name,
            document,
        })),
        Err(e) => {
            tracing::error!("Failed to process upload {}: {}", file_name, e);
            Ok(HttpResponse::build(error_status(&e)).json(ErrorResponse::new(e.to_string())))
        }
    }
}
