//! Demo host for route-interceptors.
//!
//! Serves the route files under `demos/routers` with the controllers
//! registered in `demo.rs`.

mod demo;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use route_interceptors::config::load_config;
use route_interceptors::lifecycle::startup::{bind_listener, bootstrap, build_interceptors};
use route_interceptors::observability::logging::init_logging;
use route_interceptors::paths::realpath;
use route_interceptors::Shutdown;

#[derive(Parser)]
#[command(name = "route-interceptors")]
#[command(about = "Serve routes discovered from route-definition files", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "demos/config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Discover routes and serve them (default)
    Serve,
    /// Print the discovered route table and exit
    Routes,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    init_logging(&config.observability)?;

    tracing::info!(
        config = %cli.config.display(),
        bind_address = %config.listener.bind_address,
        router_root = %config.routes.router_root,
        controller_root = %config.routes.controller_root,
        "Configuration loaded"
    );

    let cwd = std::env::current_dir()?;
    let modules = demo::modules(&realpath(&cwd, &config.routes.controller_root));

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Routes => {
            let interceptors = build_interceptors(&config, &cwd, &modules)?;
            for binding in interceptors.bindings() {
                let provenance = binding.provenance();
                println!(
                    "{:<8} {:<24} {} -> {}#{}",
                    binding.method().to_uppercase(),
                    binding.url(),
                    provenance.router,
                    provenance.controller,
                    provenance.action
                );
            }
        }
        Commands::Serve => {
            let server = bootstrap(config.clone(), &cwd, &modules)?;
            let listener = bind_listener(&config).await?;
            server.run(listener, Shutdown::new()).await?;
            tracing::info!("Shutdown complete");
        }
    }

    Ok(())
}
