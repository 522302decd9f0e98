use lib_sentiment::api::AppState;
use lib_sentiment::{Predictor, SentimentPipeline};

use actix_web::web;
use std::sync::Arc;

pub fn fixture_path() -> String {
  let curr_dir: String = match std::env::current_dir() {
    Ok(path) => path.display().to_string(),
    Err(e) => panic!("Error: {:?}", e),
  };
  format!("{}/data/sentiment_pipeline.json", curr_dir)
}

pub fn app_state() -> web::Data<AppState> {
  let pipeline: SentimentPipeline = SentimentPipeline::load(fixture_path()).unwrap();
  web::Data::new(AppState { predictor: Predictor::new(Arc::new(pipeline)) })
}
