//! busguard — command-line front end for the access-control policy engine.
//!
//! Usage:
//!   busguard validate --policy policy.rules [--registry actions.toml]
//!   busguard check --policy policy.rules --registry actions.toml \
//!       --uid 500 --gid 500 --action send --default deny

mod config;

use busguard_contracts::{ActionRegistry, AccessVerdict, Credential, NullResolver};
use busguard_policy::Policy;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use config::CliError;

#[derive(Parser)]
#[command(name = "busguard", about = "Access-control policy validator and evaluator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a policy file and report whether it is well-formed.
    Validate {
        #[arg(long)]
        policy: String,
        #[arg(long)]
        registry: Option<String>,
    },
    /// Evaluate a single (credential, action, argument) request against a policy.
    Check {
        #[arg(long)]
        policy: String,
        #[arg(long)]
        registry: Option<String>,
        #[arg(long)]
        uid: u32,
        #[arg(long, default_value_t = 0)]
        gid: u32,
        #[arg(long)]
        action: String,
        #[arg(long)]
        argument: Option<String>,
        #[arg(long, value_enum, default_value_t = DefaultVerdict::Deny)]
        default: DefaultVerdict,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DefaultVerdict {
    Allow,
    Deny,
}

impl From<DefaultVerdict> for AccessVerdict {
    fn from(value: DefaultVerdict) -> Self {
        match value {
            DefaultVerdict::Allow => AccessVerdict::Allow,
            DefaultVerdict::Deny => AccessVerdict::Deny,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Validate { policy, registry } => run_validate(&policy, registry.as_deref()),
        Command::Check { policy, registry, uid, gid, action, argument, default } => {
            run_check(&policy, registry.as_deref(), uid, gid, &action, argument.as_deref(), default.into())
        }
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn load_registry(path: Option<&str>) -> Result<ActionRegistry, CliError> {
    match path {
        Some(p) => config::load_registry(p),
        None => Ok(ActionRegistry::new(Vec::new())),
    }
}

fn run_validate(policy_path: &str, registry_path: Option<&str>) -> Result<(), CliError> {
    let text = config::load_policy_text(policy_path)?;
    let registry = load_registry(registry_path)?;

    match Policy::new_full(&text, &registry) {
        Some(policy) => {
            println!("ok: {} rule(s)", policy.rules().len());
            Ok(())
        }
        None => Err(CliError::InvalidPolicy { path: policy_path.to_string() }),
    }
}

fn run_check(
    policy_path: &str,
    registry_path: Option<&str>,
    uid: u32,
    gid: u32,
    action: &str,
    argument: Option<&str>,
    default: AccessVerdict,
) -> Result<(), CliError> {
    let text = config::load_policy_text(policy_path)?;
    let registry = load_registry(registry_path)?;

    let policy = Policy::new_full(&text, &registry)
        .ok_or_else(|| CliError::InvalidPolicy { path: policy_path.to_string() })?;

    let action_id = registry.lookup(action).map(|a| a.id).unwrap_or(0);
    let credential = Credential::new(uid, gid);
    let resolver = NullResolver;

    let verdict =
        busguard_policy::check(Some(&policy), Some(&credential), action_id, argument, default, &resolver);

    println!("{:?}", verdict);
    Ok(())
}
