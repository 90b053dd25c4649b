use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use reqwest::Method;

use gateway_client::config::loader::load_registry;
use gateway_client::health::HealthMonitor;
use gateway_client::observability::logging::init_logging;
use gateway_client::security::EnvCredentials;
use gateway_client::{EndpointRegistry, Environment, GatewayClient, RequestOptions, Shutdown};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Operator CLI for the regulatory gateway client", long_about = None)]
struct Cli {
    /// Registry TOML file replacing the built-in endpoint table.
    #[arg(short, long)]
    registry: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the endpoints in the selected registry
    Endpoints,
    /// Probe endpoint health
    Health {
        /// Endpoint id; probes every endpoint when omitted
        id: Option<String>,
    },
    /// Execute a request and print the JSON response
    Call {
        endpoint: String,
        path: String,
        #[arg(short, long, default_value = "GET")]
        method: String,
        /// Inline JSON body
        #[arg(short, long)]
        body: Option<String>,
    },
    /// Run periodic health probes until interrupted, then dump metrics
    Monitor {
        #[arg(short, long, default_value_t = 30)]
        interval_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    let environment = Environment::from_env();
    let registry = match &cli.registry {
        Some(path) => load_registry(path, environment)?,
        None => EndpointRegistry::for_environment(environment),
    };
    let client = Arc::new(GatewayClient::new(
        registry,
        Arc::new(EnvCredentials::new()),
    )?);

    match cli.command {
        Commands::Endpoints => {
            let mut endpoints: Vec<_> = client.registry().endpoints().collect();
            endpoints.sort_by(|a, b| a.id.cmp(&b.id));
            for ep in endpoints {
                println!(
                    "{:<22} {:<50} auth={:<8} {} req/{}s timeout={}ms retries={}{}",
                    ep.id,
                    ep.base_url,
                    ep.auth.as_str(),
                    ep.rate_limit.max_requests,
                    ep.rate_limit.window_secs,
                    ep.timeout_ms,
                    ep.retry_attempts,
                    if ep.requires_vpn { " [vpn]" } else { "" },
                );
            }
        }
        Commands::Health { id } => {
            let ids: Vec<String> = match id {
                Some(id) => vec![id],
                None => client.registry().ids().into_iter().map(String::from).collect(),
            };
            for id in ids {
                let healthy = client.health_check(&id).await;
                println!("{:<22} {}", id, if healthy { "healthy" } else { "unhealthy" });
            }
        }
        Commands::Call {
            endpoint,
            path,
            method,
            body,
        } => {
            let mut options = RequestOptions::default();
            options.method = method.to_uppercase().parse::<Method>()?;
            if let Some(body) = body {
                options.body = Some(serde_json::from_str(&body)?);
            }
            let response: serde_json::Value = client.execute(&endpoint, &path, options).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Monitor { interval_secs } => {
            let shutdown = Shutdown::new();
            let monitor = HealthMonitor::new(client.clone(), Duration::from_secs(interval_secs));
            let receiver = shutdown.subscribe();
            let handle = tokio::spawn(monitor.run(receiver));

            tokio::signal::ctrl_c().await?;
            shutdown.trigger();
            let _ = handle.await;

            println!("{}", serde_json::to_string_pretty(&client.all_metrics())?);
        }
    }

    Ok(())
}
