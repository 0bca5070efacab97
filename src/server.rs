use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing::{info, warn};

use crate::advice::{AdviceProvider, GroqAdvisor};
use crate::api_json::handlers::{advice_handler, analyze_handler, help_handler, programs_handler, upload_handler, view_handler};
use crate::config::AppConfig;
use crate::curriculum::ProgramRegistry;
use crate::error::Error;

/// Shared, read-only state. Each request loads its own curriculum; nothing here mutates.
pub struct AppState {
    pub registry: ProgramRegistry,
    pub advisor: Arc<dyn AdviceProvider>,
}

impl AppState {
    pub fn new(registry: ProgramRegistry, advisor: Arc<dyn AdviceProvider>) -> Self {
        AppState { registry, advisor }
    }
}

/// Route table, shared by `run_server` and the handler tests.
/// Malformed JSON bodies answer with the same `{"error": ...}` shape as every other failure.
pub fn routes(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        warn!(error = %err, "rejected JSON body");
        Error::InvalidInput(err.to_string()).into()
    });

    cfg.app_data(json_config).service(
        web::scope("/api")
            .route("/programs", web::get().to(programs_handler))
            .route("/analyze", web::post().to(analyze_handler))
            .route("/upload", web::post().to(upload_handler))
            .route("/view", web::post().to(view_handler))
            .route("/advice", web::post().to(advice_handler)),
    )
    .route("/help", web::get().to(help_handler));
}

pub async fn run_server(config: AppConfig) -> std::io::Result<()> {
    let registry = match ProgramRegistry::load(&config.programs_dir) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "program index unavailable, serving an empty list");
            ProgramRegistry::empty(&config.programs_dir)
        }
    };

    let advisor = GroqAdvisor::new(config.advice_api_key.clone(), config.advice_url.clone())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    if !advisor.has_api_key() {
        warn!("no advice API key configured; /api/advice will answer with a notice");
    }

    let state = web::Data::new(AppState::new(registry, Arc::new(advisor)));

    info!(bind = %config.bind_addr, "starting HTTP server");
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .configure(routes)
    })
    .bind(config.bind_addr.as_str())?
    .run()
    .await
}
