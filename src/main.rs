//! Back-office gateway binary
//!
//! Standalone wiring around the authorization pipeline with an in-memory
//! account directory. A deployment embeds the library and supplies its own
//! `UserDirectory` instead.

use backoffice_gate::auth::{InMemoryDirectory, Principal, RoleRef};
use backoffice_gate::config::Config;
use backoffice_gate::server;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn, Level};
use uuid::Uuid;

/// Back-office request authorization gateway
#[derive(Parser, Debug)]
#[command(name = "backoffice", version, about)]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long, env = "BACKOFFICE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind port
    #[arg(short, long, env = "BACKOFFICE_PORT")]
    port: Option<u16>,

    /// Bootstrap administrator password; generated when unset
    #[arg(long, env = "BACKOFFICE_ADMIN_PASSWORD", hide_env_values = true)]
    admin_password: Option<String>,
}

#[actix_web::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            warn!("no configuration file given, using defaults");
            Config::default()
        }
    };
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let directory = bootstrap_directory(args.admin_password);

    match server::run_server(config, directory).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Seed the in-memory directory with a bootstrap administrator
///
/// Without at least one account the standalone binary could never issue a
/// session. The generated password is logged once at startup.
fn bootstrap_directory(admin_password: Option<String>) -> Arc<InMemoryDirectory> {
    let directory = InMemoryDirectory::new();
    let admin_id = Uuid::new_v4();

    directory.insert_principal(Principal {
        user_id: admin_id,
        role: Some(RoleRef {
            id: Uuid::new_v4(),
            name: "ADMIN".to_string(),
        }),
        active: true,
    });

    match admin_password {
        Some(password) => {
            directory.insert_credentials("admin", &password, admin_id);
            info!("bootstrap administrator 'admin' uses the supplied password");
        }
        None => {
            let mut bytes = [0u8; 12];
            rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
            let password = hex::encode(bytes);
            directory.insert_credentials("admin", &password, admin_id);
            info!(password = %password, "bootstrap administrator 'admin' created");
        }
    }

    Arc::new(directory)
}
