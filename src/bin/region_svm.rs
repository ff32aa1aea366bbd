//! Region classifier training and evaluation tool.
//!
//! Usage:
//!   region_svm train features.csv --model model.gz
//!   region_svm train features.csv --model model.gz --sigma 1.5
//!   region_svm train features.csv --folds 5 --seed 7 --threads 4 --voting
//!   region_svm evaluate features.csv --model model.gz --report report.json --format json
//!   region_svm info model.gz

use region_oxide::config::{DecisionMethod, TrainerConfig};
use region_oxide::dataset::{read_dataset, write_report, ReportFormat};
use region_oxide::ml::{load_model, Evaluator, ModelTrainer};
use region_oxide::Category;
use std::path::PathBuf;
use std::process;

const USAGE: &str = "usage:
  region_svm train <features.csv> [--model PATH] [--sigma S] [--folds K] [--seed N]
                   [--threads N] [--complexity C] [--voting] [--limit ROWS]
  region_svm evaluate <features.csv> --model PATH [--limit ROWS] [--report PATH] [--format text|json]
  region_svm info <model.gz>";

#[derive(Debug)]
enum Command {
    Train,
    Evaluate,
    Info,
}

struct CliConfig {
    command: Command,
    input: PathBuf,
    model: Option<PathBuf>,
    sigma: Option<f64>,
    folds: Option<usize>,
    seed: Option<u64>,
    threads: Option<usize>,
    complexity: Option<f64>,
    voting: bool,
    limit: Option<usize>,
    report: Option<PathBuf>,
    format: ReportFormat,
}

fn value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T, String> {
    let raw = args.get(i).ok_or_else(|| format!("{} needs a value", flag))?;
    raw.parse::<T>()
        .map_err(|_| format!("invalid value '{}' for {}", raw, flag))
}

impl CliConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let command = match args.get(1).map(String::as_str) {
            Some("train") => Command::Train,
            Some("evaluate") => Command::Evaluate,
            Some("info") => Command::Info,
            Some(other) => return Err(format!("unknown command '{}'", other)),
            None => return Err("missing command".to_string()),
        };
        let input = args
            .get(2)
            .map(PathBuf::from)
            .ok_or_else(|| "missing input path".to_string())?;

        let mut config = Self {
            command,
            input,
            model: None,
            sigma: None,
            folds: None,
            seed: None,
            threads: None,
            complexity: None,
            voting: false,
            limit: None,
            report: None,
            format: ReportFormat::default(),
        };

        let mut i = 3;
        while i < args.len() {
            let flag = args[i].as_str();
            match flag {
                "--model" => {
                    i += 1;
                    config.model = Some(value::<PathBuf>(&args, i, flag)?);
                },
                "--sigma" => {
                    i += 1;
                    config.sigma = Some(value(&args, i, flag)?);
                },
                "--folds" => {
                    i += 1;
                    config.folds = Some(value(&args, i, flag)?);
                },
                "--seed" => {
                    i += 1;
                    config.seed = Some(value(&args, i, flag)?);
                },
                "--threads" => {
                    i += 1;
                    config.threads = Some(value(&args, i, flag)?);
                },
                "--complexity" => {
                    i += 1;
                    config.complexity = Some(value(&args, i, flag)?);
                },
                "--limit" => {
                    i += 1;
                    config.limit = Some(value(&args, i, flag)?);
                },
                "--report" => {
                    i += 1;
                    config.report = Some(value::<PathBuf>(&args, i, flag)?);
                },
                "--format" => {
                    i += 1;
                    config.format = value(&args, i, flag)?;
                },
                "--voting" => config.voting = true,
                other => return Err(format!("unknown option '{}'", other)),
            }
            i += 1;
        }
        Ok(config)
    }

    fn trainer_config(&self) -> TrainerConfig {
        let mut config = TrainerConfig::new()
            .with_parallelism(self.threads)
            .with_model_path(self.model.clone().unwrap_or_else(|| PathBuf::from("model.gz")));
        if let Some(folds) = self.folds {
            config = config.with_folds(folds);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(c) = self.complexity {
            config = config.with_complexity(c);
        }
        if self.voting {
            config = config.with_decision(DecisionMethod::Voting);
        }
        config
    }
}

fn train(config: &CliConfig) -> region_oxide::Result<()> {
    let data = read_dataset(&config.input, config.limit)?;
    let counts = data.class_counts();
    for c in Category::ALL {
        println!("{:>6}: {} examples", c.name(), counts[c.index()]);
    }

    let trainer = ModelTrainer::new(config.trainer_config());
    let outcome = match config.sigma {
        Some(sigma) => {
            println!("Training SVM model with sigma={}...", sigma);
            trainer.fixed_sigma_train(&data.inputs, &data.labels, sigma)?
        },
        None => {
            println!("Training SVM model with cross-validation...");
            trainer.grid_search_train(&data.inputs, &data.labels)?
        },
    };

    if let Some(metrics) = &outcome.metrics {
        println!("Grid search over {} rows, {} folds:", metrics.cross_validation_rows, metrics.folds);
        for trial in &metrics.trials {
            println!(
                "  sigma={:<12} training error {:.5} (var {:.5})  validation error {:.5} (var {:.5})",
                trial.sigma,
                trial.training_error_mean,
                trial.training_error_variance,
                trial.validation_error_mean,
                trial.validation_error_variance
            );
        }
    }
    println!("Using sigma={}", outcome.sigma);
    println!("Support vectors: {}", outcome.model.support_vector_count());
    if let Some(path) = &trainer.config().model_path {
        println!("Model written to {}", path.display());
    }
    Ok(())
}

fn evaluate(config: &CliConfig) -> region_oxide::Result<()> {
    let model_path = config.model.clone().unwrap_or_else(|| PathBuf::from("model.gz"));
    let model = load_model(&model_path)?;
    let data = read_dataset(&config.input, config.limit)?;

    println!("Evaluating SVM model...");
    let report = Evaluator::new().evaluate(&model, &data.inputs, &data.labels)?;
    match &config.report {
        Some(path) => write_report(&report, path, config.format)?,
        None => print!("{}", report),
    }
    Ok(())
}

fn info(config: &CliConfig) -> region_oxide::Result<()> {
    let model = load_model(&config.input)?;
    println!("Model: {}", config.input.display());
    println!("  sigma:           {}", model.sigma());
    println!("  decision:        {:?}", model.decision_method());
    println!(
        "  classes:         {}",
        model.classes().iter().map(|c| c.name()).collect::<Vec<_>>().join(", ")
    );
    println!("  machines:        {}", model.machines().len());
    println!("  support vectors: {}", model.support_vector_count());
    Ok(())
}

fn main() {
    env_logger::init();

    let config = match CliConfig::from_args() {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("{}\n\n{}", msg, USAGE);
            process::exit(2);
        },
    };

    let result = match config.command {
        Command::Train => train(&config),
        Command::Evaluate => evaluate(&config),
        Command::Info => info(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
