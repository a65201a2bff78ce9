use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dnsrec::config::{ClientOptions, ProviderKind};
use dnsrec::dns::{create_provider, DnsRecord, RecordManager};
use dnsrec::secrets;

#[derive(Parser)]
#[command(name = "dnsrec")]
#[command(about = "DNS record client - manage records on Hetzner DNS and Vercel")]
#[command(version)]
struct Cli {
    /// DNS provider (hetzner or vercel)
    #[arg(long, env = "DNSREC_PROVIDER")]
    provider: ProviderKind,

    /// Zone the records belong to (e.g., example.com)
    #[arg(long, env = "DNSREC_ZONE")]
    zone: String,

    /// API token; prompted for when absent
    #[arg(long, env = "DNSREC_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Override the provider API base URL
    #[arg(long, env = "DNSREC_BASE_URL")]
    base_url: Option<String>,

    /// Per-request timeout
    #[arg(long, default_value_t = 30)]
    timeout_seconds: u64,

    #[arg(long, env = "DNSREC_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every record in the zone
    List,

    /// Create a record, or update it when --id is given
    Set {
        #[arg(long = "type")]
        record_type: String,

        /// Record name, relative or fully qualified
        #[arg(long)]
        name: String,

        #[arg(long)]
        value: String,

        /// TTL in seconds; 0 uses the provider default
        #[arg(long, default_value_t = 0)]
        ttl: u64,

        /// Identifier of an existing record to update
        #[arg(long)]
        id: Option<String>,
    },

    /// Delete a record by identifier
    Delete {
        #[arg(long)]
        id: String,
    },
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let token = secrets::resolve_token(cli.token.clone(), cli.provider)?;
    let options = ClientOptions {
        base_url: cli.base_url.clone(),
        timeout: Duration::from_secs(cli.timeout_seconds),
    };
    let provider = create_provider(cli.provider, &token, &options)
        .with_context(|| format!("Failed to set up {} provider", cli.provider))?;
    let manager = RecordManager::new(provider);

    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = wait_for_shutdown().await {
            error!("Error waiting for shutdown signal: {}", e);
            return;
        }
        canceller.cancel();
    });

    match cli.command {
        Commands::List => {
            let records = manager.list_records(&cli.zone, &cancel).await?;
            for record in &records {
                print_record(record);
            }
            info!("{} records in {}", records.len(), cli.zone);
        }

        Commands::Set {
            record_type,
            name,
            value,
            ttl,
            id,
        } => {
            let mut record = DnsRecord::new(&record_type, &name, &value, Duration::from_secs(ttl));
            if let Some(id) = id {
                record = record.with_id(&id);
            }

            let stored = manager.upsert(&cli.zone, &record, &cancel).await?;
            print_record(&stored);
        }

        Commands::Delete { id } => {
            let record = DnsRecord::default().with_id(&id);
            manager.delete(&cli.zone, &record, &cancel).await?;
            println!("Deleted record {}", id);
        }
    }

    Ok(())
}

fn print_record(record: &DnsRecord) {
    let name = if record.name.is_empty() { "@" } else { record.name.as_str() };
    println!(
        "{}\t{}\t{}\t{}\t{}",
        record.id,
        record.record_type,
        name,
        record.ttl.as_secs(),
        record.value
    );
}

async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM, cancelling");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT, cancelling");
            }
        }
    }

    #[cfg(windows)]
    {
        tokio::signal::ctrl_c().await?;
        info!("Received Ctrl+C, cancelling");
    }

    Ok(())
}
