use crate::api::{self, AppState};
use crate::config::Settings;
use crate::error::AppError;
use crate::model::SentimentPipeline;
use crate::prediction::Predictor;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::info;
use std::path::Path;
use std::sync::Arc;

/// Shared State
/// Loads the artifact at `path` into the state every worker shares.
pub fn load_state<P: AsRef<Path>>(path: P) -> Result<web::Data<AppState>, AppError> {
  let pipeline: SentimentPipeline = SentimentPipeline::load(path)?;
  Ok(web::Data::new(AppState { predictor: Predictor::new(Arc::new(pipeline)) }))
}

/// Application Setup
/// Registers the shared state, the payload limit and the routes.
pub fn app_config(
  state: web::Data<AppState>,
  max_payload_bytes: usize,
) -> impl Fn(&mut web::ServiceConfig) + Clone + Send + 'static {
  move |cfg: &mut web::ServiceConfig| {
    cfg
      .app_data(state.clone())
      .app_data(web::PayloadConfig::new(max_payload_bytes))
      .configure(api::configure);
  }
}

/// Serve
/// Loads the artifact before binding, so a bad artifact never accepts traffic.
pub async fn run(settings: Settings) -> Result<(), AppError> {
  let state: web::Data<AppState> = load_state(&settings.model.path)?;
  let setup = app_config(state, settings.server.max_payload_bytes);

  info!("Starting sentiment API on http://{}", settings.bind_address());

  let mut server = HttpServer::new(move || App::new().wrap(Logger::default()).configure(setup.clone()));
  if let Some(workers) = settings.server.workers {
    server = server.workers(workers);
  }

  server.bind(settings.bind_address())?.run().await?;
  Ok(())
}
