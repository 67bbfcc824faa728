use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use regionwatch::{run_server, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "regionwatch")]
#[command(about = "HTTP service summarizing per-region latency and uptime telemetry")]
struct Args {
    /// Directory probed for telemetry snapshot files
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Address to listen on (host:port)
    #[arg(short, long, default_value = "0.0.0.0:8000")]
    listen: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = ServerConfig::builder()
        .listen_addr(args.listen)
        .data_dir(args.data_dir)
        .build();

    run_server(config).await.map_err(|e| anyhow::anyhow!(e))
}
