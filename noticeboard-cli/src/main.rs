//! noticeboard CLI - posts/echo HTTP service over PostgreSQL
//!
//! Entry point for the `noticeboard` binary:
//! - `serve` runs the HTTP server until shutdown
//! - `init-db` creates the posts table and exits
//!
//! Database connection parameters come from the environment (`DATABASE_URL`
//! or `DB_HOST`/`DB_PORT`/`DB_NAME`/`DB_USER`/`DB_PASSWORD`); a `.env` file
//! in the working directory is loaded first.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use noticeboard_server::db::{create_pool, ensure_schema, Db, FatalSignal};
use noticeboard_server::{run_server, DbConfig, ServerConfig};

mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "noticeboard",
    author,
    version,
    about = "Posts and echo HTTP service backed by PostgreSQL"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Create the posts table if it does not exist, then exit
    InitDb,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Host to bind the HTTP server to
    #[arg(long, env = "NOTICEBOARD_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind the HTTP server to
    #[arg(long, env = "NOTICEBOARD_PORT", default_value_t = 3000)]
    port: u16,

    /// Allow requests from any origin (development only)
    #[arg(long)]
    cors_permissive: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;

    match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::InitDb => init_db().await,
    }
}

async fn connect() -> Result<(Db, FatalSignal)> {
    let config = DbConfig::from_env().context("database configuration incomplete")?;
    let options = config.connect_options()?;
    let pool = create_pool(options)
        .await
        .context("failed to create connection pool")?;
    Ok(Db::new(pool))
}

async fn serve(args: ServeArgs) -> Result<()> {
    let (db, fatal) = connect().await?;

    let bind_addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", args.host, args.port))?;

    run_server(
        db,
        fatal,
        ServerConfig {
            bind_addr,
            cors_permissive: args.cors_permissive,
        },
    )
    .await
    .context("server exited with error")
}

async fn init_db() -> Result<()> {
    let (db, _fatal) = connect().await?;
    ensure_schema(&db).await.context("schema creation failed")?;
    tracing::info!("posts table ready");
    Ok(())
}
