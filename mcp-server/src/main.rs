//! Libris MCP Server
//!
//! Exposes the Libris lending API as MCP tools over stdio.
//! Credentials come from environment variables:
//! - LIBRIS_USER / LIBRIS_PASSWORD: manager name and password, or a member id
//! - LIBRIS_API_URL: where the API listens

mod client;
mod server;

use anyhow::Result;
use rmcp::ServiceExt;
use server::LibrisServer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging to stderr (stdout is used for MCP protocol)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Libris MCP server");

    let server = LibrisServer::from_env()?;

    // Serve over stdio - pass as tuple (stdin, stdout)
    let transport = (tokio::io::stdin(), tokio::io::stdout());
    let service = server.serve(transport).await?;

    service.waiting().await?;

    Ok(())
}
