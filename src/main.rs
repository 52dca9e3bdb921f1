use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::info;

use boxnode::{
    build_engine_config, build_for_runtime, build_inbounds, export_links, fix_outbound, Outbound,
    RuntimeOutbound, Settings, TunStack,
};

/// Normalize proxy outbounds, build engine configs and export share links
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the inbound list derived from a settings file
    Inbounds {
        /// Settings file (JSON, TOML or YAML)
        #[arg(short, long, value_name = "FILE")]
        settings: Option<PathBuf>,

        /// Override the TUN stack from the settings file
        #[arg(long, value_enum)]
        stack: Option<StackArg>,
    },
    /// Print the fixed form of each outbound
    Fix {
        /// JSON file holding one outbound or an array of them
        input: PathBuf,
    },
    /// Print the engine form of each outbound
    Runtime { input: PathBuf },
    /// Print a complete engine config
    Config {
        input: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        settings: Option<PathBuf>,

        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "OUTPUT_FILE")]
        output: Option<PathBuf>,
    },
    /// Print share links, one per line
    Export {
        input: PathBuf,

        /// Fix the outbounds before exporting
        #[arg(long)]
        fix: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StackArg {
    System,
    Gvisor,
    Mixed,
}

impl From<StackArg> for TunStack {
    fn from(stack: StackArg) -> Self {
        match stack {
            StackArg::System => TunStack::System,
            StackArg::Gvisor => TunStack::GVisor,
            StackArg::Mixed => TunStack::Mixed,
        }
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => Ok(Settings::default()),
    }
}

/// Accepts a single outbound object or an array of them.
fn load_outbounds(path: &Path) -> Result<Vec<Outbound>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    let outbounds = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    };
    Ok(outbounds)
}

fn main() -> Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let args = Args::parse();

    match args.command {
        Command::Inbounds { settings, stack } => {
            let settings = load_settings(settings.as_deref())?;
            let stack = stack.map(TunStack::from).unwrap_or(settings.tun_stack);
            let inbounds = build_inbounds(&settings, stack);
            println!("{}", serde_json::to_string_pretty(&inbounds)?);
        }
        Command::Fix { input } => {
            let fixed: Vec<Outbound> = load_outbounds(&input)?.iter().map(fix_outbound).collect();
            println!("{}", serde_json::to_string_pretty(&fixed)?);
        }
        Command::Runtime { input } => {
            let runtime: Vec<RuntimeOutbound> = load_outbounds(&input)?
                .iter()
                .map(build_for_runtime)
                .collect();
            println!("{}", serde_json::to_string_pretty(&runtime)?);
        }
        Command::Config {
            input,
            settings,
            output,
        } => {
            let settings = load_settings(settings.as_deref())?;
            let config = build_engine_config(&settings, &load_outbounds(&input)?)?;
            let json = config.to_json_pretty()?;
            match output {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!("Engine config written to {}", path.display());
                }
                None => println!("{}", json),
            }
        }
        Command::Export { input, fix } => {
            let mut outbounds = load_outbounds(&input)?;
            if fix {
                outbounds = outbounds.iter().map(fix_outbound).collect();
            }
            println!("{}", export_links(&outbounds));
        }
    }

    Ok(())
}
