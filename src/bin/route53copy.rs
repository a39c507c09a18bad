use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use route53copy::{
    Account,
    changeset::render_records,
    config::{AccountConfig, WaitConfig},
    confirm::{AssumeYes, Confirm, StdinConfirm},
    resolver::SystemResolver,
    validation::validate_domain,
    workflow::{CopyRequest, DeleteRequest, copy_zone, delete_zone},
};
use tokio::signal;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, rename_all = "kebab-case")]
struct Cli {
    /// AWS region for every client (defaults to us-east-1)
    #[arg(long, global = true, value_name = "REGION")]
    region: Option<String>,
    /// Seconds between change-status polls
    #[arg(long, global = true, value_name = "SECS", default_value_t = 15)]
    poll_interval_secs: u64,
    /// Maximum seconds to wait for a record or zone change to be in sync
    #[arg(long, global = true, value_name = "SECS", default_value_t = 120)]
    wait_timeout_secs: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Command {
    /// Copy all records of a zone from one account to another
    Copy {
        source_profile: String,
        dest_profile: String,
        domain: String,
        /// Don't make any changes
        #[arg(long)]
        dry: bool,
        /// Update registrar NS records if the domain is registered on the destination account
        #[arg(long)]
        update_ns: bool,
    },
    /// Remove all records of a zone and then the zone itself
    Delete {
        profile: String,
        domain: String,
        /// Don't make any changes
        #[arg(long)]
        dry: bool,
        /// Delete even if live nameservers still point at the zone
        #[arg(long)]
        force: bool,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Print every record set of a zone
    Records { profile: String, domain: String },
    /// Registrar operations
    #[command(subcommand)]
    Domains(DomainsCommand),
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum DomainsCommand {
    /// List domains registered in the account
    List { profile: String },
    /// Print the account id behind a profile
    Whoami { profile: String },
    /// Start transferring a domain to another account
    Transfer {
        profile: String,
        domain: String,
        account_id: String,
    },
    /// Cancel a pending outbound transfer
    CancelTransfer { profile: String, domain: String },
    /// Accept a transfer using the password from `transfer`
    AcceptTransfer {
        profile: String,
        domain: String,
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    tokio::select! {
        res = run(cli) => res,
        _ = shutdown_signal() => {
            error!("interrupted before completion");
            // a pending confirmation prompt would hold runtime shutdown open
            std::process::exit(130);
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let wait = build_wait_config(&cli)?;
    let account = |profile: String| AccountConfig::new(profile, cli.region.clone());

    match cli.command {
        Command::Copy {
            source_profile,
            dest_profile,
            domain,
            dry,
            update_ns,
        } => {
            let source = Account::connect(account(source_profile), wait).await;
            let destination = Account::connect(account(dest_profile), wait).await;
            let req = CopyRequest {
                domain,
                dry_run: dry,
                update_registrar_ns: update_ns,
            };
            copy_zone(
                &source.zones,
                &destination.zones,
                destination.registrar.as_ref(),
                &req,
            )
            .await?;
        }
        Command::Delete {
            profile,
            domain,
            dry,
            force,
            yes,
        } => {
            let target = Account::connect(account(profile), wait).await;
            let resolver = SystemResolver::from_system_conf()?;
            let confirm: Box<dyn Confirm> = if yes {
                Box::new(AssumeYes)
            } else {
                Box::new(StdinConfirm)
            };
            let req = DeleteRequest {
                domain,
                dry_run: dry,
                force,
            };
            delete_zone(&target.zones, &resolver, confirm.as_ref(), &req).await?;
        }
        Command::Records { profile, domain } => {
            let domain = validate_domain(&domain)?;
            let target = Account::connect(account(profile), wait).await;
            let zone = target.zones.get_hosted_zone(&domain).await?;
            let records = target.zones.get_resource_records(&zone.id).await?;
            info!(zone_id = %zone.id, "{} record sets in {}", records.len(), zone.name);
            for line in render_records(&records) {
                println!("{line}");
            }
        }
        Command::Domains(cmd) => run_domains(cmd, account, wait).await?,
    }

    Ok(())
}

async fn run_domains(
    cmd: DomainsCommand,
    account: impl Fn(String) -> AccountConfig,
    wait: WaitConfig,
) -> Result<()> {
    match cmd {
        DomainsCommand::List { profile } => {
            let target = Account::connect(account(profile), wait).await;
            for domain in target.registrar.list_domains().await? {
                println!("{domain}");
            }
        }
        DomainsCommand::Whoami { profile } => {
            let target = Account::connect(account(profile), wait).await;
            println!("{}", target.registrar.account_id().await?);
        }
        DomainsCommand::Transfer {
            profile,
            domain,
            account_id,
        } => {
            let domain = validate_domain(&domain)?;
            let target = Account::connect(account(profile), wait).await;
            let transfer = target
                .registrar
                .transfer_domain(&domain, &account_id)
                .await?;
            println!("operation: {}", transfer.operation_id);
            println!("password:  {}", transfer.password);
        }
        DomainsCommand::CancelTransfer { profile, domain } => {
            let domain = validate_domain(&domain)?;
            let target = Account::connect(account(profile), wait).await;
            let operation = target.registrar.cancel_transfer(&domain).await?;
            println!("operation: {operation}");
        }
        DomainsCommand::AcceptTransfer {
            profile,
            domain,
            password,
        } => {
            let domain = validate_domain(&domain)?;
            let target = Account::connect(account(profile), wait).await;
            let operation = target
                .registrar
                .accept_transfer(&domain, &password)
                .await?;
            println!("operation: {operation}");
        }
    }
    Ok(())
}

fn build_wait_config(cli: &Cli) -> Result<WaitConfig> {
    if cli.poll_interval_secs == 0 {
        bail!("--poll-interval-secs must be at least 1");
    }
    if cli.wait_timeout_secs < cli.poll_interval_secs {
        bail!("--wait-timeout-secs must not be shorter than --poll-interval-secs");
    }
    let defaults = WaitConfig::default();
    Ok(WaitConfig {
        poll_interval: Duration::from_secs(cli.poll_interval_secs),
        change_timeout: Duration::from_secs(cli.wait_timeout_secs),
        zone_create_timeout: defaults
            .zone_create_timeout
            .max(Duration::from_secs(cli.poll_interval_secs)),
    })
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!("failed to install CTRL+C handler: {err}");
        // keep the workflow running rather than treating this as an interrupt
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

fn init_tracing() {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
