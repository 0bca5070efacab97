use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use tracing::warn;

use crate::advice::AdviceRequest;
use crate::server::AppState;

/// POST /api/advice
/// Always answers 200 with `{ "reply": ... }`; provider failures become a reply text.
pub async fn advice_handler(state: web::Data<AppState>, body: web::Json<AdviceRequest>) -> impl Responder {
    let request = body.into_inner();
    let reply = match state.advisor.advise(&request).await {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, student = %request.study_data.student_id, "advice unavailable");
            e.user_message().to_string()
        }
    };
    HttpResponse::Ok().json(json!({"reply": reply}))
}
