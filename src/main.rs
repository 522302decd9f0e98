use env_logger::Env;
use lib_sentiment::cli::{Cli, Command, EvaluateArgs};
use lib_sentiment::evaluate::{evaluate, CsvLayout, EvaluationReport};
use lib_sentiment::server;
use lib_sentiment::{AppError, PredictionOutcome, Predictor, SentimentPipeline, Settings};
use log::{error, info};
use structopt::StructOpt;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

#[actix_web::main]
async fn main() {
  env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

  let cli: Cli = Cli::from_args();
  if let Err(e) = run(cli).await {
    error!("{}", e);
    std::process::exit(1);
  }
}

async fn run(cli: Cli) -> Result<(), AppError> {
  match cli.command {
    Command::Serve(args) => {
      let mut settings: Settings = Settings::load(cli.config.as_deref())?;
      args.apply(&mut settings);
      server::run(settings).await
    }
    Command::Predict { model, text } => {
      let settings: Settings = Settings::load(cli.config.as_deref())?;
      let predictor: Predictor = load_predictor(model.unwrap_or(settings.model.path))?;
      let outcome: PredictionOutcome = predictor.predict(&text.join(" "));
      println!("{}", serde_json::to_string_pretty(&outcome)?);
      Ok(())
    }
    Command::Evaluate(args) => {
      let settings: Settings = Settings::load(cli.config.as_deref())?;
      run_evaluation(settings, args)
    }
    Command::Convert { input, output } => {
      let pipeline: SentimentPipeline = SentimentPipeline::load(&input)?;
      pipeline.save(&output)?;
      info!("Wrote {} -> {}", input.display(), output.display());
      Ok(())
    }
  }
}

fn load_predictor(path: PathBuf) -> Result<Predictor, AppError> {
  let pipeline: SentimentPipeline = SentimentPipeline::load(path)?;
  Ok(Predictor::new(Arc::new(pipeline)))
}

fn run_evaluation(settings: Settings, args: EvaluateArgs) -> Result<(), AppError> {
  let predictor: Predictor = load_predictor(args.model.unwrap_or(settings.model.path))?;
  let layout: CsvLayout = CsvLayout {
    label_column: args.label_column,
    text_column: args.text_column,
    has_headers: args.has_headers,
  };

  let file: File = File::open(&args.data)?;
  let report: EvaluationReport = evaluate(&predictor, file, layout)?;

  info!(
    "Evaluated {}: accuracy {:.4}, precision {:.4}, recall {:.4}",
    args.data.display(),
    report.accuracy(),
    report.precision(),
    report.recall()
  );
  println!("{}", serde_json::to_string_pretty(&report)?);
  Ok(())
}
