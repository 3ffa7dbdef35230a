// Combination Product Set explorer, CLI entry point.
//
// Builds the configured top-level set (the 1-3-5-7-11-13 eikosany unless a
// config file or flags say otherwise) and prints one view of it per
// subcommand. Output goes to stdout; logs and errors go to stderr.
//
// Usage:
//   cargo run -p cps_cli -- [--config cps.json] [--factors 1,3,5,7]
//     [--choose K] [--name NAME] [--verbose] <COMMAND>
//
// Commands: show, transpositions, embedded, common-tones, collect,
// tonic-sets

mod demos;

use clap::Parser;
use cps_core::factors::checked_product;
use cps_core::{CombinationProductSet, CpsConfig, Transposition, find_common_tones};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "cps")]
#[command(about = "Combination Product Set scales: listings, embeddings, common tones.")]
struct Cli {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base factors, comma separated, e.g. `1,3,5,7,11,13`.
    #[arg(long, value_delimiter = ',')]
    factors: Option<Vec<u64>>,

    /// Elements per combination (defaults to half the factors).
    #[arg(long)]
    choose: Option<usize>,

    #[arg(long)]
    name: Option<String>,

    /// Log engine activity to stderr.
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Element lines, ratios and note indices of the top-level set.
    Show {
        /// Reference tone, e.g. `1*3*5` or `15`.
        #[arg(long)]
        transpose: Option<Transposition>,

        /// Emit a JSON summary instead.
        #[arg(long)]
        json: bool,
    },

    /// The top-level set at every one of its elements as 1/1.
    Transpositions,

    /// Embedded sets laid out against the top-level set.
    Embedded {
        /// Base factors per embedded set (config default: 4).
        #[arg(long)]
        size: Option<usize>,

        /// Choose size of each embedded set (config default: 2).
        #[arg(long)]
        inner: Option<usize>,

        #[arg(long)]
        transpose: Option<Transposition>,

        #[arg(long)]
        csv: bool,
    },

    /// Embedded sets bucketed by tones shared with one of them.
    CommonTones {
        #[arg(long)]
        size: Option<usize>,

        #[arg(long)]
        inner: Option<usize>,

        #[arg(long)]
        transpose: Transposition,

        /// Index of the reference set among the embedded sets.
        #[arg(long, default_value_t = 0)]
        reference: usize,
    },

    /// Named embedded sets as ratios, rows, offsets and note values.
    Collect {
        #[arg(long)]
        transpose: Transposition,

        /// Compact names, e.g. `[1,3,5,7]*11`.
        #[arg(long, num_args = 1.., required = true)]
        names: Vec<String>,
    },

    /// At every transposition, the embedded sets that hold 1/1.
    TonicSets {
        /// Base-factor product to track across transpositions (defaults to
        /// the product of the first embedded-set-size factors).
        #[arg(long)]
        product: Option<u64>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<CpsConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            CpsConfig::from_json(&json)?
        }
        None => CpsConfig::default(),
    };

    if let Some(factors) = &cli.factors {
        config.base_factors = factors.clone();
        // The default name describes the default factors.
        if cli.name.is_none() {
            config.name = None;
        }
    }
    if cli.choose.is_some() {
        config.choose = cli.choose;
    }
    if cli.name.is_some() {
        config.name = cli.name.clone();
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config(&cli)?;
    let mut cps = config.build_set()?;
    let layout = config.list_options();
    let mapping = config.note_mapping();

    tracing::debug!(name = %cps.name(), size = cps.len(), "loaded top-level set");

    let output = match cli.cmd {
        Command::Show { transpose, json } => {
            if let Some(tone) = &transpose {
                cps.transpose(tone)?;
            }
            if json {
                demos::show_json(&cps)?
            } else {
                demos::show(&cps, &layout, &mapping)
            }
        }
        Command::Transpositions => demos::transpositions(&cps)?,
        Command::Embedded {
            size,
            inner,
            transpose,
            csv,
        } => {
            let tone = transpose.unwrap_or_default();
            let children = embedded_at(&mut cps, &config, size, inner, &tone)?;
            if csv {
                demos::embedded_csv(&cps, &children)
            } else {
                demos::embedded_table(&cps, &children, &layout)
            }
        }
        Command::CommonTones {
            size,
            inner,
            transpose,
            reference,
        } => {
            let children = embedded_at(&mut cps, &config, size, inner, &transpose)?;
            let buckets = find_common_tones(&children, reference, &transpose)?;
            demos::common_tones(&children[reference], &buckets)
        }
        Command::Collect { transpose, names } => {
            let children = embedded_at(&mut cps, &config, None, None, &transpose)?;
            demos::collect(&children, &names, &layout, &mapping)?
        }
        Command::TonicSets { product } => {
            let size = config.embedding.subset_size;
            let product = match product {
                Some(product) => product,
                None => {
                    let first = &config.base_factors[..size.min(config.base_factors.len())];
                    checked_product(first).ok_or("default tonic-set product overflows u64")?
                }
            };
            demos::tonic_sets(&cps, size, config.embedding.inner_choose, product, &layout)?
        }
    };
    Ok(output)
}

/// Transpose `cps` to `tone` and find its embedded sets at that tone.
fn embedded_at(
    cps: &mut CombinationProductSet,
    config: &CpsConfig,
    size: Option<usize>,
    inner: Option<usize>,
    tone: &Transposition,
) -> Result<Vec<CombinationProductSet>, cps_core::CpsError> {
    cps.transpose(tone)?;
    cps.find_embedded_sets(
        size.unwrap_or(config.embedding.subset_size),
        inner.unwrap_or(config.embedding.inner_choose),
        Some(tone),
    )
}
