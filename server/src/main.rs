use anyhow::Result;
use axum::Router;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use server::{build_app, ServerConfig};
use tokio::net::TcpListener;

#[derive(Parser)]
struct Args {
    /// Corpus file: one `title\x03body\x03url` document per line
    #[arg(long, default_value = "data/raw_html/raw.txt")]
    corpus: PathBuf,
    /// Directory of static files (search page) served at unmatched paths
    #[arg(long)]
    www_root: Option<PathBuf>,
    /// Stem terms to their English root
    #[arg(long, default_value_t = false)]
    stem: bool,
    /// Stop-word file (one word per line) replacing the built-in English list
    #[arg(long)]
    stop_words: Option<PathBuf>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = ServerConfig {
        corpus: args.corpus,
        www_root: args.www_root,
        stem: args.stem,
        stop_words: args.stop_words,
        admin_token: std::env::var("ADMIN_TOKEN").ok(),
    };
    let app: Router = build_app(config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
