use anyhow::Context as _;
use clap::{Arg, Command};
use commonware_runtime::{tokio, Metrics, Runner};
use commonware_storage::metadata::{self, Metadata};
use commonware_utils::sequence::U64;
use naocoin_execution::{Ledger, Memory};
use naocoin_node::{
    engine,
    platform::console::Console,
    Config,
};
use naocoin_types::casino::Account;
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    // Parse arguments
    let matches = Command::new("naocoin")
        .about("Chat bot that tracks levels and coins and runs wagering games.")
        .arg(Arg::new("config").long("config").required(true))
        .get_matches();

    // Load config
    let config_file = matches
        .get_one::<String>("config")
        .context("missing --config")?;
    let config_file = std::fs::read_to_string(config_file)
        .with_context(|| format!("could not read config file {config_file}"))?;
    let config: Config =
        serde_yaml::from_str(&config_file).context("could not parse config file")?;
    let config = config.validate()?;

    // Initialize runtime
    let cfg = tokio::Config::default()
        .with_worker_threads(config.worker_threads)
        .with_storage_directory(config.directory.clone())
        .with_catch_panics(true);
    let executor = tokio::Runner::new(cfg);

    // Start runtime
    executor.start(|context| async move {
        // Configure telemetry
        tokio::telemetry::init(
            context.with_label("telemetry"),
            tokio::telemetry::Logging {
                level: config.log_level,
                json: config.log_json,
            },
            Some(SocketAddr::new(
                IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                config.metrics_port,
            )),
            None,
        );

        // Start the console transport
        let platform = Console;
        let inbound = platform.listen();
        info!(
            prefix = config.command_prefix,
            ephemeral = config.ephemeral,
            "listening for messages"
        );

        // Create engine over the selected account store
        let handle = if config.ephemeral {
            let ledger = Arc::new(Ledger::new(Memory::default()));
            engine::Engine::new(
                context.with_label("engine"),
                engine::Config {
                    platform,
                    ledger,
                    mailbox_size: config.mailbox_size,
                    command_prefix: config.command_prefix,
                    response_timeout: config.response_timeout,
                },
            )
            .start(inbound)
        } else {
            let accounts = Metadata::<_, U64, Account>::init(
                context.with_label("accounts"),
                metadata::Config {
                    partition: format!("{}-accounts", config.partition_prefix),
                    codec_config: (),
                },
            )
            .await
            .context("failed to initialize account storage")?;
            engine::Engine::new(
                context.with_label("engine"),
                engine::Config {
                    platform,
                    ledger: Arc::new(Ledger::new(accounts)),
                    mailbox_size: config.mailbox_size,
                    command_prefix: config.command_prefix,
                    response_timeout: config.response_timeout,
                },
            )
            .start(inbound)
        };

        // Wait for the engine to stop
        if let Err(e) = handle.await {
            error!(?e, "engine failed");
        }
        Ok::<_, anyhow::Error>(())
    })
}
