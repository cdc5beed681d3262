//! mtree CLI - Command line interface for mtree
//!
//! Builds a Merkle tree over items given as arguments, read from a file
//! (one item per line), or read from stdin, and reports on it.

use clap::{Args, Parser, Subcommand};
use mtree::hasher::HashAlgorithm;
use mtree::viz::{format_digest, Renderer};
use mtree::{
    logging, BuildStrategy, Config, Digest, DigestEncoding, MerkleTree, OrderingPolicy,
    OutputFormat, TreeExport,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

#[derive(Parser)]
#[command(name = "mtree")]
#[command(about = "Balanced binary Merkle trees with pluggable digests")]
#[command(version)]
struct Cli {
    /// Path to the config file [default: ~/.config/mtree/config.json]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Digest function
    #[arg(long, global = true)]
    hash: Option<HashAlgorithm>,

    /// Leaf ordering policy
    #[arg(long, global = true)]
    order: Option<OrderingPolicy>,

    /// Tree construction strategy
    #[arg(long, global = true)]
    strategy: Option<BuildStrategy>,

    /// Output format (json or text)
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Log to stderr (-v info, -vv debug, -vvv trace); MTREE_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Debug)]
struct ItemArgs {
    /// Items to hash, in order
    items: Vec<String>,

    /// Read items from a file, one per line
    #[arg(long, conflicts_with = "items")]
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the root digest
    Root {
        #[command(flatten)]
        input: ItemArgs,
    },

    /// Draw the tree as an indented diagram
    Show {
        #[command(flatten)]
        input: ItemArgs,
        /// Label nodes with hex even for text digests
        #[arg(long)]
        hex: bool,
    },

    /// Dump every node as JSON
    Export {
        #[command(flatten)]
        input: ItemArgs,
    },

    /// List leaf digests in order
    Leaves {
        #[command(flatten)]
        input: ItemArgs,
    },

    /// Recompute the root and compare it with an expected digest
    Verify {
        /// Expected root digest (hex)
        expected: String,
        #[command(flatten)]
        input: ItemArgs,
    },

    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the effective configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("Command failed: {:#}", e);
            output(
                error_format(&cli),
                &serde_json::json!({
                    "status": "error",
                    "message": format!("{:#}", e)
                }),
            );
            std::process::exit(1);
        }
    }
}

/// Run the command, returning the process exit code
fn run(cli: &Cli) -> anyhow::Result<i32> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    let config = effective_config(cli, &config_path)?;
    debug!(?config, path = %config_path.display(), "Resolved configuration");

    match &cli.command {
        Commands::Root { input } => {
            let tree = build_tree(&config, input)?;
            match config.format {
                OutputFormat::Text => {
                    println!("{}", format_digest(tree.root_digest(), tree.encoding()));
                }
                OutputFormat::Json => output(
                    config.format,
                    &serde_json::json!({
                        "root": tree.root_digest().to_hex(),
                        "hasher": tree.hasher_name(),
                        "strategy": tree.strategy(),
                        "ordering": tree.ordering(),
                        "leaf_count": tree.leaf_count(),
                        "depth": tree.depth()
                    }),
                ),
            }
        }

        Commands::Show { input, hex } => {
            let tree = build_tree(&config, input)?;
            let renderer = if *hex {
                Renderer::new().with_encoding(DigestEncoding::Binary)
            } else {
                Renderer::new()
            };
            print!("{}", renderer.render(&tree));
        }

        Commands::Export { input } => {
            let tree = build_tree(&config, input)?;
            let export = TreeExport::from_tree(&tree);
            output(config.format, &serde_json::to_value(&export)?);
        }

        Commands::Leaves { input } => {
            let tree = build_tree(&config, input)?;
            match config.format {
                OutputFormat::Text => {
                    for leaf in tree.leaves() {
                        println!("{}", format_digest(leaf.digest(), tree.encoding()));
                    }
                }
                OutputFormat::Json => {
                    let leaves: Vec<_> = tree
                        .leaves()
                        .enumerate()
                        .map(|(index, leaf)| {
                            serde_json::json!({
                                "index": index,
                                "digest": leaf.digest().to_hex()
                            })
                        })
                        .collect();
                    output(config.format, &serde_json::json!({ "leaves": leaves }));
                }
            }
        }

        Commands::Verify { expected, input } => {
            let expected = Digest::from_hex(expected)?;
            let tree = build_tree(&config, input)?;
            let matches = tree.verify_root(&expected).is_ok();
            info!(matches, "Verified root");

            output(
                config.format,
                &serde_json::json!({
                    "status": if matches { "ok" } else { "mismatch" },
                    "expected": expected.to_hex(),
                    "actual": tree.root_digest().to_hex()
                }),
            );
            if !matches {
                return Ok(1);
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                output(config.format, &serde_json::to_value(&config)?);
            }
            ConfigAction::Init { force } => {
                if config_path.exists() && !force {
                    anyhow::bail!(
                        "Config file already exists at {} (use --force to overwrite)",
                        config_path.display()
                    );
                }
                config.save(&config_path)?;
                output(
                    config.format,
                    &serde_json::json!({
                        "status": "ok",
                        "message": format!("Wrote config to {}", config_path.display())
                    }),
                );
            }
        },
    }

    Ok(0)
}

/// Format for reporting a failed command
///
/// Follows the effective config; falls back to the flag alone when the
/// config itself cannot be loaded.
fn error_format(cli: &Cli) -> OutputFormat {
    cli.config
        .clone()
        .or_else(|| Config::default_path().ok())
        .and_then(|path| effective_config(cli, &path).ok())
        .map(|config| config.format)
        .unwrap_or_else(|| cli.format.unwrap_or_default())
}

/// Config file values overridden by command-line flags
fn effective_config(cli: &Cli, path: &Path) -> anyhow::Result<Config> {
    let mut config = Config::load(path)?;
    if let Some(hash) = cli.hash {
        config.hash = hash;
    }
    if let Some(order) = cli.order {
        config.order = order;
    }
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    Ok(config)
}

fn build_tree(config: &Config, input: &ItemArgs) -> anyhow::Result<MerkleTree> {
    let items = read_items(input)?;
    let hasher = config.hash.hasher();
    let tree = config.builder().build(&items, &hasher)?;
    Ok(tree)
}

/// Items from arguments, a file, or stdin (in that order of preference)
///
/// File and stdin input is taken as raw bytes, so items need not be UTF-8.
fn read_items(input: &ItemArgs) -> anyhow::Result<Vec<Vec<u8>>> {
    if !input.items.is_empty() {
        return Ok(input.items.iter().map(|item| item.clone().into_bytes()).collect());
    }

    let content = match &input.file {
        Some(path) => std::fs::read(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };

    Ok(split_lines(&content))
}

/// Split on `\n`, dropping a trailing `\r` per line and the final newline
fn split_lines(content: &[u8]) -> Vec<Vec<u8>> {
    if content.is_empty() {
        return Vec::new();
    }
    let content = content.strip_suffix(b"\n").unwrap_or(content);
    content
        .split(|&byte| byte == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line).to_vec())
        .collect()
}

fn output(format: OutputFormat, value: &serde_json::Value) {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string(value),
        OutputFormat::Text => serde_json::to_string_pretty(value),
    };
    match rendered {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}
