//! Barracuda API server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), seeds the
//! super_admin account, and serves the REST API. All state is in-memory: a
//! restart discards every lead, settings edit, and registered admin beyond
//! the seeded one.
//!
//! # Password hash generation
//!
//! To print the argon2 PHC string for a password entered on stdin:
//!
//! ```
//! cargo run -p barracuda-api --bin server -- --hash-password
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use barracuda_api::{AppState, ServerConfig, auth::hash_password, router};
use barracuda_core::{
  admin::{AdminRole, NewAdmin},
  memory::MemoryStore,
};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Barracuda affiliate-network API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Helper mode: hash a password and exit.
  if cli.hash_password {
    let password = read_password_from_stdin()?;
    let hash = hash_password(&password)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
    println!("{hash}");
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("BARRACUDA"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Build application state.
  let state = AppState::new(MemoryStore::new(), &server_cfg.jwt_secret);

  // Seed the one super_admin account. The hash is produced here, at
  // startup, from the configured plaintext — never a stored hash literal.
  let seed_hash = hash_password(&server_cfg.seed_admin_password)
    .map_err(|e| anyhow::anyhow!("failed to hash seed password: {e}"))?;
  let seeded = state
    .admins
    .create(NewAdmin {
      email:         server_cfg.seed_admin_email.clone(),
      password_hash: seed_hash,
      name:          server_cfg.seed_admin_name.clone(),
      role:          AdminRole::SuperAdmin,
    })
    .await
    .map_err(|e| anyhow::anyhow!("failed to seed admin: {e}"))?;
  tracing::info!(email = %seeded.email, "seeded super_admin account");

  let app = router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin.
fn read_password_from_stdin() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}
