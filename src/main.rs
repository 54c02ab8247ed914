//! Stackform CLI entrypoint.
//!
//! This is the main entrypoint for the stackform command-line tool.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use stackform::cli::{Cli, Commands, OutputFormatter};
use stackform::compiler::StackCompiler;
use stackform::config::{ConfigParser, ConfigValidator, DEFAULT_CONFIG_FILE, find_config_file};
use stackform::error::{Result, StackformError};
use stackform::inventory::{
    HttpNetworkInventory, NetworkInventory, NetworkRecord, StaticNetworkInventory,
    StaticParameterStore,
};
use stackform::manifest::ProvisioningManifest;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Template written by `stackform init`.
const STACK_TEMPLATE: &str = r"# Stackform stack file
stack:
  name: my-stack
  network_lookup: vpc-changeme

task:
  cpu_units: 1024
  memory_mib: 2048
  platform:
    architecture: x86_64
    os: linux

container:
  repository: my-stack
  env:
    - name: SERVICE_ID
      value: changeme
  secrets: []

cluster:
  name: my-stack-cluster
  elastic_capacity: true

security:
  name: my-stack-sg
  outbound: allow_all
";

/// Main entrypoint.
fn main() -> ExitCode {
    // Load .env if present; ignore a missing file.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Dispatches the parsed command.
fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.output);

    match cli.command {
        Commands::Init { path, force } => cmd_init(&path, force),
        Commands::Validate { warnings } => cmd_validate(cli.config, &formatter, warnings),
        Commands::Build {
            out,
            inventory_url,
            inventory_file,
            params_file,
            detailed,
        } => cmd_build(
            cli.config,
            &formatter,
            &out,
            inventory_url,
            inventory_file,
            params_file,
            detailed,
        ),
        Commands::Show { manifest, detailed } => cmd_show(&manifest, &formatter, detailed),
    }
}

/// `stackform init` - scaffolds a stack file.
fn cmd_init(path: &std::path::Path, force: bool) -> Result<()> {
    let target = path.join(DEFAULT_CONFIG_FILE);
    if target.exists() && !force {
        return Err(StackformError::internal(format!(
            "{} already exists (use --force to overwrite)",
            target.display()
        )));
    }

    std::fs::create_dir_all(path)?;
    std::fs::write(&target, STACK_TEMPLATE)?;
    info!("Initialized stack file at {}", target.display());
    println!("Created {}", target.display());
    Ok(())
}

/// `stackform validate` - validates the stack file.
fn cmd_validate(config: Option<PathBuf>, formatter: &OutputFormatter, warnings: bool) -> Result<()> {
    let config = load_config(config)?;
    let result = ConfigValidator::new().validate(&config)?;
    print!("{}", formatter.format_validation(&result, warnings));
    Ok(())
}

/// `stackform build` - compiles the stack file into a manifest.
fn cmd_build(
    config: Option<PathBuf>,
    formatter: &OutputFormatter,
    out: &std::path::Path,
    inventory_url: Option<String>,
    inventory_file: Option<PathBuf>,
    params_file: Option<PathBuf>,
    detailed: bool,
) -> Result<()> {
    let config = load_config(config)?;
    ConfigValidator::new().validate(&config)?;

    let params = load_params(params_file)?;
    let manifest = match (inventory_url, inventory_file) {
        (Some(url), _) => {
            let token = std::env::var("STACKFORM_INVENTORY_TOKEN").ok();
            let inventory = HttpNetworkInventory::new(&url, token)?;
            compile(&config, &inventory, &params)?
        }
        (None, Some(file)) => {
            let inventory = load_inventory_file(&file)?;
            compile(&config, &inventory, &params)?
        }
        (None, None) => {
            return Err(StackformError::internal(
                "No network inventory source: pass --inventory-url or --inventory-file",
            ));
        }
    };

    manifest.write_file(out)?;
    print!("{}", formatter.format_manifest(&manifest, detailed));
    println!("\nManifest written to {}", out.display());
    Ok(())
}

/// `stackform show` - renders a previously built manifest.
fn cmd_show(path: &std::path::Path, formatter: &OutputFormatter, detailed: bool) -> Result<()> {
    let manifest = ProvisioningManifest::load_file(path)?;
    print!("{}", formatter.format_manifest(&manifest, detailed));
    Ok(())
}

/// Compiles a stack against the given collaborators.
fn compile(
    config: &stackform::config::StackConfig,
    inventory: &dyn NetworkInventory,
    params: &StaticParameterStore,
) -> Result<ProvisioningManifest> {
    StackCompiler::new(inventory, params).compile(config)
}

/// Locates and loads the stack file.
fn load_config(config: Option<PathBuf>) -> Result<stackform::config::StackConfig> {
    let path = match config {
        Some(path) => path,
        None => {
            let cwd = std::env::current_dir()?;
            find_config_file(&cwd).ok_or_else(|| {
                StackformError::internal(format!(
                    "No {DEFAULT_CONFIG_FILE} found in {} or any parent directory",
                    cwd.display()
                ))
            })?
        }
    };

    debug!("Using stack file: {}", path.display());
    ConfigParser::new().load_with_env(path)
}

/// Loads a network inventory fixture from a JSON file.
fn load_inventory_file(path: &std::path::Path) -> Result<StaticNetworkInventory> {
    let content = std::fs::read_to_string(path)?;
    let records: Vec<NetworkRecord> = serde_json::from_str(&content)
        .map_err(|e| StackformError::internal(format!("Failed to parse inventory file: {e}")))?;
    Ok(StaticNetworkInventory::from_records(records))
}

/// Loads plain configuration-store entries from a JSON file.
fn load_params(path: Option<PathBuf>) -> Result<StaticParameterStore> {
    let Some(path) = path else {
        return Ok(StaticParameterStore::new());
    };

    let content = std::fs::read_to_string(&path)?;
    let entries: HashMap<String, String> = serde_json::from_str(&content)
        .map_err(|e| StackformError::internal(format!("Failed to parse params file: {e}")))?;
    Ok(StaticParameterStore::from_entries(entries))
}
