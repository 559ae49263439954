//! Command-line front end for the pricing models.
//!
//! Prices call and put side by side for the closed-form and lattice models, and reports
//! summary statistics of the final row for Monte Carlo, the way the old dashboard did.

use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use optpricer::core::OptionType;
use optpricer::engines::monte_carlo::PathEnsemble;
use optpricer::registry::{
    BinomialTreeParams, BlackScholesParams, Model, ModelOutput, ModelRequest, MonteCarloParams,
    resolve,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

type AppResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "optpricer")]
#[command(about = "European option pricing: Black-Scholes, binomial tree, Monte Carlo")]
struct Cli {
    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List registered model names
    Models,
    /// Price with parameters given on the command line
    Price(PriceArgs),
    /// Evaluate a JSON request file, e.g. {"model": "Binomial Tree", "steps": 200}
    Run {
        request: PathBuf,

        /// Seed for Monte Carlo requests
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Include every simulated path in JSON output
        #[arg(long)]
        dump_paths: bool,
    },
}

#[derive(Args)]
struct PriceArgs {
    /// Model name, one of `optpricer models`
    #[arg(long, default_value = "Black-Scholes")]
    model: String,

    /// Initial stock price S0
    #[arg(long, default_value_t = 100.0)]
    spot: f64,

    /// Strike K
    #[arg(long, default_value_t = 100.0)]
    strike: f64,

    /// Time to maturity in years
    #[arg(long, default_value_t = 1.0)]
    expiry: f64,

    /// Continuously compounded risk-free rate
    #[arg(long, default_value_t = 0.05, allow_negative_numbers = true)]
    rate: f64,

    /// Volatility
    #[arg(long, default_value_t = 0.2)]
    vol: f64,

    /// Binomial tree steps N
    #[arg(long, default_value_t = 100)]
    steps: usize,

    /// Monte Carlo drift
    #[arg(long, default_value_t = 0.07, allow_negative_numbers = true)]
    mu: f64,

    /// Monte Carlo path count
    #[arg(long, default_value_t = 1_000)]
    simulations: usize,

    /// Monte Carlo time rows per path
    #[arg(long, default_value_t = 252)]
    path_steps: usize,

    /// Monte Carlo seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Include every simulated path in JSON output
    #[arg(long)]
    dump_paths: bool,
}

impl PriceArgs {
    fn request(&self, model: Model) -> ModelRequest {
        match model {
            Model::BlackScholes => ModelRequest::BlackScholes(BlackScholesParams {
                spot: self.spot,
                strike: self.strike,
                expiry: self.expiry,
                rate: self.rate,
                vol: self.vol,
                option_type: OptionType::Call,
            }),
            Model::BinomialTree => ModelRequest::BinomialTree(BinomialTreeParams {
                spot: self.spot,
                strike: self.strike,
                expiry: self.expiry,
                rate: self.rate,
                vol: self.vol,
                option_type: OptionType::Call,
                steps: self.steps,
            }),
            Model::MonteCarlo => ModelRequest::MonteCarlo(MonteCarloParams {
                spot: self.spot,
                mu: self.mu,
                vol: self.vol,
                expiry: self.expiry,
                n_simulations: self.simulations,
                n_steps: self.path_steps,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct PriceReport {
    model: &'static str,
    prices: BTreeMap<&'static str, f64>,
}

#[derive(Debug, Serialize)]
struct SimulationReport<'a> {
    model: &'static str,
    n_steps: usize,
    n_simulations: usize,
    mean_final_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_final_price: Option<f64>,
    std_final_price: f64,
    standard_error: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    paths: Option<&'a PathEnsemble>,
}

impl<'a> SimulationReport<'a> {
    fn new(request: &ModelRequest, paths: &'a PathEnsemble, dump_paths: bool) -> Self {
        let expected_final_price = match request {
            ModelRequest::MonteCarlo(params) => Some(params.expected_final_price()),
            ModelRequest::BlackScholes(_) | ModelRequest::BinomialTree(_) => None,
        };
        Self {
            model: Model::MonteCarlo.name(),
            n_steps: paths.n_steps(),
            n_simulations: paths.n_simulations(),
            mean_final_price: paths.mean_final_price(),
            expected_final_price,
            std_final_price: paths.std_final_price(),
            standard_error: paths.standard_error_final(),
            paths: dump_paths.then_some(paths),
        }
    }

    fn print_text(&self) {
        println!("Results: {}", self.model);
        println!(
            "Simulated {} paths x {} steps",
            self.n_simulations, self.n_steps
        );
        println!("Mean Final Price: {:.2}", self.mean_final_price);
        if let Some(expected) = self.expected_final_price {
            println!("Expected Final Price (GBM): {expected:.2}");
        }
        println!("Std Dev of Final Price: {:.2}", self.std_final_price);
        println!("Standard Error of Mean: {:.4}", self.standard_error);
    }
}

impl PriceReport {
    fn print_text(&self) {
        println!("Results: {}", self.model);
        for (side, price) in &self.prices {
            let label = match *side {
                "call" => "Call Option Price",
                _ => "Put Option Price",
            };
            println!("{label}: {price:.4}");
        }
    }
}

fn emit<T: Serialize>(report: &T, json: bool, print_text: impl FnOnce(&T)) -> AppResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_text(report);
    }
    Ok(())
}

fn price_sides(request: ModelRequest, sides: &[OptionType]) -> AppResult<PriceReport> {
    let mut rng = StdRng::seed_from_u64(0);
    let mut prices = BTreeMap::new();
    for &side in sides {
        let output = request.with_option_type(side).evaluate(&mut rng)?;
        if let Some(price) = output.price() {
            prices.insert(side.as_str(), price);
        }
    }
    Ok(PriceReport {
        model: request.model().name(),
        prices,
    })
}

fn run_price(args: &PriceArgs, json: bool) -> AppResult<()> {
    let model = resolve(&args.model)?;
    let request = args.request(model);
    tracing::info!(model = %model, "pricing from command-line parameters");

    match model {
        Model::MonteCarlo => {
            let mut rng = StdRng::seed_from_u64(args.seed);
            let output = request.evaluate(&mut rng)?;
            if let ModelOutput::Paths(paths) = &output {
                let report = SimulationReport::new(&request, paths, args.dump_paths);
                emit(&report, json, SimulationReport::print_text)?;
            }
        }
        Model::BlackScholes | Model::BinomialTree => {
            let report = price_sides(request, &OptionType::ALL)?;
            emit(&report, json, PriceReport::print_text)?;
        }
    }
    Ok(())
}

fn run_request(path: &Path, seed: u64, dump_paths: bool, json: bool) -> AppResult<()> {
    let raw = fs::read_to_string(path)?;
    let request: ModelRequest = serde_json::from_str(&raw)?;
    tracing::info!(model = %request.model(), path = %path.display(), "loaded request");

    let mut rng = StdRng::seed_from_u64(seed);
    match request.evaluate(&mut rng)? {
        ModelOutput::Price(price) => {
            let side = match request {
                ModelRequest::BlackScholes(params) => params.option_type,
                ModelRequest::BinomialTree(params) => params.option_type,
                ModelRequest::MonteCarlo(_) => OptionType::Call,
            };
            let report = PriceReport {
                model: request.model().name(),
                prices: BTreeMap::from([(side.as_str(), price)]),
            };
            emit(&report, json, PriceReport::print_text)
        }
        ModelOutput::Paths(paths) => {
            let report = SimulationReport::new(&request, &paths, dump_paths);
            emit(&report, json, SimulationReport::print_text)
        }
    }
}

fn run(cli: Cli) -> AppResult<()> {
    match &cli.command {
        Command::Models => {
            if cli.json {
                let names: Vec<&str> = Model::ALL.iter().map(|m| m.name()).collect();
                println!("{}", serde_json::to_string_pretty(&names)?);
            } else {
                for model in Model::ALL {
                    println!("{model}");
                }
            }
            Ok(())
        }
        Command::Price(args) => run_price(args, cli.json),
        Command::Run {
            request,
            seed,
            dump_paths,
        } => run_request(request, *seed, *dump_paths, cli.json),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("optpricer failed: {err}");
        std::process::exit(1);
    }
}
