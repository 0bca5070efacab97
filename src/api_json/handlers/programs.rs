use actix_web::{web, HttpResponse, Responder};

use crate::server::AppState;

/// GET /api/programs
/// Curricula available per academic year: `{ "<year>": [ { key, department, file } ] }`.
pub async fn programs_handler(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.registry.index())
}
