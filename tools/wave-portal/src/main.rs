//! Terminal client for the WavePortal contract.
//!
//! Talks JSON-RPC to a node or wallet bridge that holds unlocked accounts.
//! Without `--rpc-url` every wallet operation reports that no wallet is
//! installed.

mod render;
mod seed;

use anyhow::{Context, bail};
use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use wp_chain_client::abi::DEFAULT_CONTRACT_ADDRESS;
use wp_chain_client::{ChainError, RpcChainClient};
use wp_chain_jsonrpc::{
    CONTRACT_ENV, HttpTransport, JsonRpcConfig, POLL_MS_ENV, RPC_URL_ENV, connect, parse_contract,
    spawn_watcher,
};
use wp_portal_core::config::{DEFAULT_ALLOWED_NETWORK, NETWORK_ENV};
use wp_portal_core::{
    Collage, ConnectionEffect, ConnectionManager, PortalConfig, PortalError, SubmissionFlow,
    WavePortal,
};

const COLUMN_WIDTH: usize = 28;

type Portal = WavePortal<Arc<RpcChainClient<HttpTransport>>>;

#[derive(Parser)]
#[command(name = "wave-portal", about = "Wave at the WavePortal contract from a terminal")]
struct Cli {
    /// JSON-RPC endpoint of the wallet or node.
    #[arg(long, env = RPC_URL_ENV)]
    rpc_url: Option<String>,

    /// WavePortal contract address.
    #[arg(long, env = CONTRACT_ENV, default_value = DEFAULT_CONTRACT_ADDRESS)]
    contract: String,

    /// The only network waves may be sent on.
    #[arg(
        long,
        env = NETWORK_ENV,
        default_value = DEFAULT_ALLOWED_NETWORK,
        value_parser = NonEmptyStringValueParser::new()
    )]
    network: String,

    /// Receipt and wallet polling interval in milliseconds.
    #[arg(
        long,
        env = POLL_MS_ENV,
        default_value_t = 1_000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    poll_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show account, network and whether waving is possible.
    Status,
    /// Ask the wallet for account access.
    Connect,
    /// Print the wave collage.
    List {
        /// Show a single wave in full.
        #[arg(long)]
        detail: Option<String>,
    },
    /// Send a wave.
    Wave {
        text: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Follow wallet changes and new waves until interrupted.
    Watch,
    /// Deploy and seed a contract with sample waves.
    Seed(seed::SeedArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let rpc = JsonRpcConfig {
        endpoint: cli.rpc_url.filter(|url| !url.trim().is_empty()),
        contract: parse_contract(&cli.contract)?,
        poll_interval: Duration::from_millis(cli.poll_ms),
    };
    let config = PortalConfig::default().with_allowed_network(cli.network);

    let portal: Portal = match connect(&rpc) {
        Ok(client) => WavePortal::new(Arc::new(client)),
        Err(ChainError::NoWallet) => WavePortal::without_wallet(),
        Err(err) => return Err(err.into()),
    };
    let mut app = App::new(portal, config);

    match cli.command {
        Command::Status => app.status().await,
        Command::Connect => app.connect().await,
        Command::List { detail } => app.list(detail.as_deref()).await,
        Command::Wave { text, yes } => app.wave(&text, yes).await,
        Command::Watch => app.watch(rpc.poll_interval).await,
        Command::Seed(args) => {
            let client = app.portal.client().context("seeding needs --rpc-url")?;
            seed::run(client, rpc.poll_interval, args).await
        }
    }
}

struct App {
    portal: Portal,
    manager: ConnectionManager,
    collage: Collage,
    flow: SubmissionFlow,
}

impl App {
    fn new(portal: Portal, config: PortalConfig) -> Self {
        Self {
            portal,
            manager: ConnectionManager::new(config.clone()),
            collage: Collage::default(),
            flow: SubmissionFlow::new(config),
        }
    }

    /// Carry out connection effects. Returns true when a reload was asked for.
    fn handle(&self, effects: Vec<ConnectionEffect>) -> bool {
        let mut reload = false;
        for effect in effects {
            match effect {
                ConnectionEffect::Notify(toast) => render::notification(&toast),
                ConnectionEffect::Render => {
                    print!("{}", render::status(&self.manager.snapshot(), self.manager.config()))
                }
                ConnectionEffect::Reload => reload = true,
                ConnectionEffect::RefreshNetwork => debug!("network refresh already applied"),
            }
        }
        reload
    }

    /// Full read path: connection, then waves.
    async fn load(&mut self) {
        let effects = self.manager.load(&self.portal).await;
        self.handle(effects);
        self.reload_collage().await;
    }

    async fn reload_collage(&mut self) {
        self.collage.start_loading();
        let result = self.portal.list_messages().await;
        if let Some(toast) = self.collage.finish_loading(result) {
            render::notification(&toast);
        }
    }

    async fn status(&mut self) -> anyhow::Result<()> {
        let effects = self.manager.load(&self.portal).await;
        self.handle(effects);
        if self.portal.has_wallet() {
            match self.portal.total_waves().await {
                Ok(total) => println!("total waves: {total}"),
                Err(err) => render::notification(&(&err).into()),
            }
        }
        Ok(())
    }

    async fn connect(&mut self) -> anyhow::Result<()> {
        let effects = self.manager.load(&self.portal).await;
        let already = self.manager.snapshot().connected;
        self.handle(effects);
        if already {
            return Ok(());
        }
        let effects = self.manager.connect(&self.portal).await;
        self.handle(effects);
        Ok(())
    }

    async fn list(&mut self, detail: Option<&str>) -> anyhow::Result<()> {
        self.reload_collage().await;
        match detail {
            Some(id) => match self.collage.select(id) {
                Some(message) => print!("{}", render::detail(message)),
                None => bail!("no wave with id {id}"),
            },
            None => print!("{}", render::columns(self.collage.columns(), COLUMN_WIDTH)),
        }
        Ok(())
    }

    async fn wave(&mut self, text: &str, yes: bool) -> anyhow::Result<()> {
        let effects = self.manager.load(&self.portal).await;
        self.handle(effects);
        if !self.manager.interaction_allowed() {
            bail!("waving is not possible right now");
        }

        self.flow.set_text(text);
        if let Some(warning) = render::feedback(&self.flow.feedback()) {
            eprintln!("{warning}");
        }
        if !self.flow.can_submit() {
            let length = self.flow.composer().trimmed().chars().count();
            let max = self.manager.config().max_chars;
            let err = if length == 0 {
                PortalError::EmptyInput
            } else {
                PortalError::TooLong { length, max }
            };
            return Err(err.into());
        }

        let modal = self.flow.request_confirmation()?;
        print!("{}", render::modal(modal));
        if !yes && !confirm_prompt()? {
            self.flow.close_modal();
            info!("wave cancelled");
            return Ok(());
        }

        match self.flow.confirm(&self.portal).await {
            Ok(columns) => {
                println!("wave sent");
                print!("{}", render::columns(&columns, COLUMN_WIDTH));
                Ok(())
            }
            Err(err) => {
                if let Some(modal) = self.flow.modal() {
                    print!("{}", render::modal(modal));
                }
                Err(err.into())
            }
        }
    }

    async fn watch(&mut self, interval: Duration) -> anyhow::Result<()> {
        self.load().await;
        print!("{}", render::columns(self.collage.columns(), COLUMN_WIDTH));

        let client = Arc::clone(self.portal.client()?);
        let (mut events, handle) = spawn_watcher(client, interval);

        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else { break };
                    let effects = self.manager.apply(event);
                    let effects = self.manager.run_network_refresh(&self.portal, effects).await;
                    if self.handle(effects) {
                        self.load().await;
                        print!("{}", render::columns(self.collage.columns(), COLUMN_WIDTH));
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupted");
                    break;
                }
            }
        }

        drop(events);
        handle.abort();
        Ok(())
    }
}

fn confirm_prompt() -> anyhow::Result<bool> {
    print!("Send it? [y/N] ");
    std::io::stdout().flush().context("flushing stdout")?;
    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("reading confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wave_command_parses_text_and_flag() {
        let cli = Cli::try_parse_from(["wave-portal", "wave", "hola mundo", "--yes"]).unwrap();
        match cli.command {
            Command::Wave { text, yes } => {
                assert_eq!(text, "hola mundo");
                assert!(yes);
            }
            _ => panic!("expected wave"),
        }
    }

    #[test]
    fn list_detail_flag() {
        let cli = Cli::try_parse_from(["wave-portal", "list", "--detail", "AA10-0"]).unwrap();
        assert!(matches!(cli.command, Command::List { detail: Some(ref id) } if id == "AA10-0"));
    }

    #[test]
    fn seed_defaults_to_a_tenth_of_an_ether() {
        let cli = Cli::try_parse_from(["wave-portal", "seed"]).unwrap();
        match cli.command {
            Command::Seed(args) => {
                assert_eq!(args.value, "0.1");
                assert!(args.artifact.is_none());
            }
            _ => panic!("expected seed"),
        }
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        assert!(Cli::try_parse_from(["wave-portal", "--poll-ms", "0", "status"]).is_err());
        let cli = Cli::try_parse_from(["wave-portal", "--poll-ms", "250", "status"]).unwrap();
        assert_eq!(cli.poll_ms, 250);
    }

    #[test]
    fn blank_network_is_rejected() {
        assert!(Cli::try_parse_from(["wave-portal", "--network", "", "status"]).is_err());
    }
}
