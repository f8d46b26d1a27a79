mod commands;
mod config;
mod observability;

use clap::{Parser, Subcommand};
use commands::CommandError;
use config::{Config, ConfigError};
use fanout::{EndpointCatalog, FanoutError, Region};
use observability::ObservabilityError;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "retarus", about = "Fax and SMS dispatch through mirrored endpoints")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Overrides the region from the configuration file.
    #[arg(long)]
    region: Option<Region>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Print the endpoint catalog.
    Endpoints,
    #[command(subcommand)]
    Fax(FaxCommand),
    #[command(subcommand)]
    Sms(SmsCommand),
}

#[derive(Subcommand)]
enum FaxCommand {
    /// Fax a document to one number.
    Send {
        #[arg(long)]
        number: String,
        #[arg(long)]
        document: PathBuf,
    },
    Report {
        job_id: String,
    },
    /// List the reports currently held by the service.
    Reports,
    Delete {
        job_id: String,
    },
    /// Delete the oldest reports of completed jobs.
    Purge,
    /// Wait for a job's report and write it to `<out>/<job id>.json`.
    Wait {
        job_id: String,
        #[arg(long)]
        out: PathBuf,
        /// Seconds between polls.
        #[arg(long, default_value_t = 10)]
        interval: u64,
    },
}

#[derive(Subcommand)]
enum SmsCommand {
    Send {
        #[arg(long)]
        to: String,
        #[arg(long)]
        text: String,
    },
    Report {
        job_id: String,
    },
    /// Per-SMS delivery status of a job.
    Status {
        job_id: String,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Observability(#[from] ObservabilityError),
    #[error(transparent)]
    Catalog(#[from] FanoutError),
    #[error(transparent)]
    Fax(#[from] fax::FaxError),
    #[error(transparent)]
    Sms(#[from] sms::SmsError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("could not start runtime: {0}")]
    Runtime(std::io::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = Config::from_file(&cli.config)?;
    let _sentry = observability::init_logging(&config.logging)?;
    if let Some(metrics) = &config.metrics {
        observability::init_metrics(metrics)?;
    }

    let region = cli.region.unwrap_or(config.region);
    let catalog = config.catalog()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    runtime.block_on(async {
        match cli.command {
            CliCommand::Endpoints => {
                commands::print_endpoints(&catalog);
                Ok(())
            }
            CliCommand::Fax(command) => run_fax(command, region, &catalog).await,
            CliCommand::Sms(command) => run_sms(command, region, &catalog).await,
        }
    })
}

async fn run_fax(
    command: FaxCommand,
    region: Region,
    catalog: &EndpointCatalog,
) -> Result<(), CliError> {
    let client = fax::Client::new(fax::Config::from_env(region, catalog)?)?;

    match command {
        FaxCommand::Send { number, document } => {
            let job_id = commands::send_fax(&client, &number, &document).await?;
            println!("{job_id}");
        }
        FaxCommand::Report { job_id } => {
            commands::print_json(&client.get_report(&job_id).await?)?;
        }
        FaxCommand::Reports => {
            commands::print_json(&client.get_reports().await?)?;
        }
        FaxCommand::Delete { job_id } => match client.delete_report(&job_id).await? {
            Some(deleted) => commands::print_json(&deleted)?,
            None => println!("no report for {job_id}"),
        },
        FaxCommand::Purge => {
            let deleted = client.delete_reports().await?;
            println!("deleted {} reports", deleted.len());
        }
        FaxCommand::Wait {
            job_id,
            out,
            interval,
        } => {
            let path = commands::wait_for_report(
                &client,
                &job_id,
                &out,
                Duration::from_secs(interval),
            )
            .await?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

async fn run_sms(
    command: SmsCommand,
    region: Region,
    catalog: &EndpointCatalog,
) -> Result<(), CliError> {
    let client = sms::Client::new(sms::Config::from_env(region, catalog)?)?;

    match command {
        SmsCommand::Send { to, text } => {
            let job_id = commands::send_sms(&client, &to, &text).await?;
            println!("{job_id}");
        }
        SmsCommand::Report { job_id } => {
            commands::print_json(&client.get_report(&job_id).await?)?;
        }
        SmsCommand::Status { job_id } => {
            commands::print_json(&client.get_sms_status(&job_id).await?)?;
        }
    }

    Ok(())
}
