//! guest-init-rs - A safe Rust guest provisioning agent
//!
//! Fetches instance metadata from an OpenStack-style metadata service and
//! applies the static network configuration it describes.

use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use guest_init_rs::config::{self, loader};
use guest_init_rs::metadata::{MetadataService, http::HttpMetadataService};
use guest_init_rs::osutils::linux::LinuxOsUtils;
use guest_init_rs::plugins::{Plugin, network_config::NetworkConfigPlugin};
use guest_init_rs::{GuestInitError, run_plugins};

#[derive(Parser)]
#[command(name = "guest-init-rs")]
#[command(author, version, about = "Safe Rust guest provisioning agent", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Network adapter to configure (overrides the config file)
    #[arg(long)]
    network_adapter: Option<String>,

    /// Metadata service base URL (overrides the config file)
    #[arg(long)]
    metadata_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the provisioning plugins
    Run,
    /// Fetch and print the instance metadata summary
    Show,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

fn build_service(config: &config::AgentConfig) -> HttpMetadataService {
    let mut service = match &config.metadata_url {
        Some(url) => HttpMetadataService::with_base_url(url),
        None => HttpMetadataService::new(),
    };
    if let Some(path) = &config.config_drive_path {
        service = service.with_config_drive(path);
    }
    service
}

#[tokio::main]
async fn main() -> Result<(), GuestInitError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = config::Paths::new();
    let mut agent_config = loader::load_merged_config(&paths).await?;

    // Command-line flags win over the config file
    if cli.network_adapter.is_some() {
        agent_config.network_adapter = cli.network_adapter;
    }
    if cli.metadata_url.is_some() {
        agent_config.metadata_url = cli.metadata_url;
    }

    let service = build_service(&agent_config);

    match cli.command {
        Some(Commands::Show) => {
            let meta = service.meta_data("openstack").await?;
            println!("uuid:     {}", meta.uuid);
            println!("hostname: {}", meta.hostname);
            println!(
                "network_config: {}",
                match meta.network_config.and_then(|n| n.content_path) {
                    Some(path) => path,
                    None => "(none)".to_string(),
                }
            );
        }
        Some(Commands::Run) | None => {
            let osutils = LinuxOsUtils::new();
            let plugins: Vec<Box<dyn Plugin>> = vec![Box::new(NetworkConfigPlugin::new(
                agent_config.network_adapter.clone(),
            ))];

            let reboot_required = run_plugins(&plugins, &service, &osutils).await?;

            if reboot_required {
                info!("A reboot is required for the applied configuration");
            }
        }
    }

    Ok(())
}
