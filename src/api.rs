use crate::error::ApiError;
use crate::prediction::{PredictionOutcome, Predictor};

use actix_web::{web, HttpResponse, Responder};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct HealthResponse {
  pub status: String,
}

/// Request schema for `POST /predict`.
#[derive(Deserialize, Debug)]
pub struct PredictRequest {
  pub text: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PredictResponse {
  pub input_text: String,
  pub cleaned_text: String,
  pub prediction: i64,
  pub label: String,
  pub score: f64,
}

impl From<PredictionOutcome> for PredictResponse {
  fn from(outcome: PredictionOutcome) -> Self {
    Self {
      input_text: outcome.input_text,
      cleaned_text: outcome.cleaned_text,
      prediction: outcome.prediction,
      label: outcome.label.to_string(),
      score: outcome.score,
    }
  }
}

pub struct AppState {
  pub predictor: Predictor,
}

/// Validates the raw body against `PredictRequest` and returns the text.
/// Content type is not checked; any body that parses as the schema is accepted.
/// The body must be a JSON object: serde would otherwise accept the array form
/// of a struct.
pub fn parse_predict_request(body: &[u8]) -> Result<String, ApiError> {
  let value: Value = serde_json::from_slice(body)
    .map_err(|_| ApiError::InvalidInput("Request body must be valid JSON".to_string()))?;
  if !value.is_object() {
    return Err(ApiError::InvalidInput("Request body must be a JSON object".to_string()));
  }

  let request: PredictRequest = serde_json::from_value(value)
    .map_err(|e| ApiError::InvalidInput(format!("'text' must be a string: {e}")))?;
  request
    .text
    .ok_or_else(|| ApiError::InvalidInput("JSON body must contain 'text' field".to_string()))
}

pub async fn health() -> impl Responder {
  HttpResponse::Ok().json(HealthResponse { status: "ok".to_string() })
}

pub async fn predict(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, ApiError> {
  let text: String = parse_predict_request(&body).map_err(|e| {
    warn!("Rejected predict request: {}", e);
    e
  })?;

  let predictor: Predictor = state.predictor.clone();
  let outcome: PredictionOutcome = web::block(move || predictor.predict(&text)).await.map_err(|e| {
    error!("Prediction failed: {}", e);
    ApiError::Internal("prediction failed".to_string())
  })?;

  Ok(HttpResponse::Ok().json(PredictResponse::from(outcome)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
  cfg
    .service(web::resource("/health").route(web::get().to(health)))
    .service(web::resource("/predict").route(web::post().to(predict)));
}
