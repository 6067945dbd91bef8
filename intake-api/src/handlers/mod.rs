pub mod candidates;
pub mod uploads;

use actix_web::web;

/// Register the JSON API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/uploads/{file_name}", web::post().to(uploads::upload_document))
        .route("/api/candidates", web::get().to(candidates::list_candidates))
        .route("/api/candidates/{id}", web::get().to(candidates::get_candidate))
        .route(
            "/api/candidates/{id}/details",
            web::get().to(candidates::get_candidate_details),
        )
        .route("/api/candidates/{id}", web::delete().to(candidates::delete_candidate));
}
