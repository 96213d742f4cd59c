//! Gateway entry point: CLI parsing, runtime construction, wiring.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lambda_gateway::config::{load_config, validate_config, GatewayConfig};
use lambda_gateway::http::GatewayServer;
use lambda_gateway::invoke::HttpInvoker;
use lambda_gateway::observability::metrics;
use lambda_gateway::routes::{JsonFileStore, RouteCache};

#[derive(Parser)]
#[command(name = "lambda-gateway", about = "HTTP gateway dispatching to backend functions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the gateway server.
    Serve(ServeArgs),

    /// Validate a configuration file and exit.
    CheckConfig {
        #[arg(long)]
        config: PathBuf,
    },
}

#[derive(Args)]
struct ServeArgs {
    /// Configuration file (TOML). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path of the JSON route table.
    #[arg(short = 't', long)]
    routes_file: Option<PathBuf>,

    /// Static single-target override; disables the route store.
    #[arg(long)]
    static_target: Option<String>,

    /// Listening port (binds 0.0.0.0).
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Maximum request body size in bytes.
    #[arg(short = 'm', long)]
    max_body: Option<usize>,

    /// Seconds between route table refreshes.
    #[arg(long)]
    refresh_secs: Option<u64>,

    /// Runtime worker threads; 0 means one per CPU core.
    #[arg(long)]
    workers: Option<usize>,

    /// Verbose logging.
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::CheckConfig { config } => {
            load_config(&config)?;
            println!("configuration OK");
            Ok(())
        }
        Command::Serve(args) => {
            let config = resolve_config(args)?;
            init_tracing(config.runtime.debug);

            let mut builder = tokio::runtime::Builder::new_multi_thread();
            builder.enable_all();
            if config.runtime.workers > 0 {
                builder.worker_threads(config.runtime.workers);
            }
            let runtime = builder.build()?;
            runtime.block_on(serve(config))
        }
    }
}

/// Load the config file (or defaults) and fold in the CLI overrides, then
/// validate the merged result.
fn resolve_config(args: ServeArgs) -> Result<GatewayConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    if let Some(routes_file) = args.routes_file {
        config.routes.routes_file = Some(routes_file);
    }
    if let Some(static_target) = args.static_target {
        config.routes.static_target = Some(static_target);
    }
    if let Some(port) = args.port {
        config.listener.bind_address = format!("0.0.0.0:{port}");
    }
    if let Some(max_body) = args.max_body {
        config.limits.max_body_bytes = max_body;
    }
    if let Some(refresh_secs) = args.refresh_secs {
        config.routes.refresh_interval_secs = refresh_secs;
    }
    if let Some(workers) = args.workers {
        config.runtime.workers = workers;
    }
    if args.debug {
        config.runtime.debug = true;
    }

    if let Err(errors) = validate_config(&config) {
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(joined.into());
    }
    Ok(config)
}

fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "lambda_gateway=debug,tower_http=debug"
    } else {
        "lambda_gateway=info,tower_http=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        refresh_interval_secs = config.routes.refresh_interval_secs,
        max_body_bytes = config.limits.max_body_bytes,
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "failed to parse metrics address"
            ),
        }
    }

    // A failed initial load is fatal: the gateway cannot serve without a
    // route table. Later refresh failures only log.
    let cache = match (&config.routes.static_target, &config.routes.routes_file) {
        (Some(target), None) => Arc::new(RouteCache::with_static_target(target)),
        (None, Some(path)) => {
            let store = Arc::new(JsonFileStore::new(path));
            Arc::new(RouteCache::from_store(store).await?)
        }
        _ => return Err("exactly one route source must be configured".into()),
    };
    cache.spawn_refresh(config.routes.refresh_interval());

    let invoker = Arc::new(HttpInvoker::new(url::Url::parse(&config.invoker.base_url)?));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = GatewayServer::new(&config, cache, invoker);
    server.run(listener).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
