use std::io;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use heredity::inference::family_tree::{make_potter_family, make_simpson_family, random_pedigree};
use heredity::inference::{infer_with, HeredityModel, Method, Pedigree};
use heredity::loader::load_pedigree;
use heredity::report::{write_report, Format};
use heredity::{Error, Result};

/// Posterior gene and trait probabilities for every person in a pedigree.
#[derive(Parser, Debug)]
#[command(name = "heredity", version)]
struct Cli {
    /// CSV file with columns name,mother,father,trait
    #[arg(required_unless_present = "demo", conflicts_with = "demo")]
    data: Option<PathBuf>,

    /// Run on a built-in pedigree instead of a file
    #[arg(long, value_enum)]
    demo: Option<Demo>,

    /// JSON model file overriding the default probability tables
    #[arg(long, env = "HEREDITY_MODEL")]
    model: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = MethodArg::Enumerate)]
    method: MethodArg,

    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    format: FormatArg,

    /// Size of the random demo pedigree
    #[arg(long, default_value_t = 6)]
    size: usize,

    /// Seed for the random demo pedigree
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Demo {
    Potter,
    Simpson,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MethodArg {
    Enumerate,
    DepthFirst,
}

impl From<MethodArg> for Method {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Enumerate => Method::Enumerate,
            MethodArg::DepthFirst => Method::DepthFirst,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Format::Text,
            FormatArg::Json => Format::Json,
        }
    }
}

fn pedigree(cli: &Cli) -> Result<Pedigree> {
    match (cli.demo, &cli.data) {
        (Some(Demo::Potter), _) => make_potter_family(),
        (Some(Demo::Simpson), _) => make_simpson_family(),
        (Some(Demo::Random), _) => {
            let mut rng = StdRng::seed_from_u64(cli.seed);
            random_pedigree(&mut rng, cli.size, 0.6, 0.3)
        }
        (None, Some(path)) => load_pedigree(path),
        (None, None) => Err(Error::MalformedPedigree("no pedigree given".into())),
    }
}

fn run(cli: Cli) -> Result<()> {
    let model = match &cli.model {
        Some(path) => HeredityModel::from_path(path)?,
        None => HeredityModel::default(),
    };
    let pedigree = pedigree(&cli)?;
    let inference = infer_with(&pedigree, &model, cli.method.into())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &inference.posteriors, cli.format.into())
}

pub fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error[{}]: {}", e.code(), e);
        std::process::exit(1);
    }
}
