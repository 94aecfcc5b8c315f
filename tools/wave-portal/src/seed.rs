//! Deploy a WavePortal contract and fill it with sample waves.

use alloy_primitives::U256;
use alloy_primitives::utils::{format_ether, parse_ether};
use anyhow::{Context, bail};
use clap::Args;
use serde::Deserialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use wp_api_types::WalletAddress;
use wp_chain_client::{ChainClient, RpcChainClient};
use wp_chain_jsonrpc::{HttpTransport, parse_contract};

#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Compiled contract artifact (Hardhat JSON with a `bytecode` field).
    /// Without it the configured contract is seeded in place.
    #[arg(long)]
    pub(crate) artifact: Option<PathBuf>,

    /// Ether sent along with the deployment.
    #[arg(long, default_value = "0.1")]
    pub(crate) value: String,
}

impl SeedArgs {
    fn deploy_value(&self) -> anyhow::Result<U256> {
        parse_ether(&self.value).with_context(|| format!("invalid ether amount '{}'", self.value))
    }
}

#[derive(Debug, Deserialize)]
struct Artifact {
    bytecode: String,
}

fn read_bytecode(path: &Path) -> anyhow::Result<String> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading artifact {}", path.display()))?;
    let artifact: Artifact = serde_json::from_str(&raw)
        .with_context(|| format!("parsing artifact {}", path.display()))?;
    if artifact.bytecode.trim_start_matches("0x").is_empty() {
        bail!("artifact {} has no bytecode", path.display());
    }
    Ok(artifact.bytecode)
}

pub async fn run(
    base: &RpcChainClient<HttpTransport>,
    poll_interval: Duration,
    args: SeedArgs,
) -> anyhow::Result<()> {
    let accounts = base.accounts().await?;
    let [deployer, other, ..] = accounts.as_slice() else {
        bail!("seeding needs two unlocked accounts, the wallet has {}", accounts.len());
    };

    let portal = match &args.artifact {
        Some(path) => {
            let value = args.deploy_value()?;
            let address = deploy(base, deployer, &read_bytecode(path)?, value).await?;
            RpcChainClient::new(base.transport().clone(), address)
        }
        None => RpcChainClient::new(base.transport().clone(), base.contract()),
    }
    .with_poll_interval(poll_interval);
    let contract = WalletAddress(portal.contract().to_string());

    println!("Contract deployed to: {}", contract);
    println!("Contract deployed by: {}", deployer);
    print_balance(&portal, &contract).await?;
    println!("{}", portal.total_waves().await?);

    let script = [
        (deployer, "hola mundo desde deployer"),
        (other, "hola mundo desde otra cuenta"),
        (other, "hola mundo desde otra cuenta"),
    ];
    for (from, message) in script {
        let pending = portal.send_wave_as(from, message).await?;
        portal.wait_for_confirmation(&pending).await?;
        println!("{}", portal.total_waves().await?);
        print_balance(&portal, &contract).await?;
    }

    for wave in portal.get_waves().await? {
        println!("{} {} {}", wave.waver, wave.timestamp, wave.message);
    }
    Ok(())
}

async fn deploy(
    client: &RpcChainClient<HttpTransport>,
    from: &WalletAddress,
    bytecode: &str,
    value: U256,
) -> anyhow::Result<alloy_primitives::Address> {
    let pending = client
        .send_transaction(json!({
            "from": from.0,
            "data": bytecode,
            "value": format!("{value:#x}"),
        }))
        .await?;
    let receipt = client.wait_for_confirmation(&pending).await?;
    let address = receipt
        .contract_address
        .context("deployment receipt carries no contract address")?;
    info!("deployed WavePortal at {}", address);
    Ok(parse_contract(&address.0)?)
}

async fn print_balance(
    client: &RpcChainClient<HttpTransport>,
    contract: &WalletAddress,
) -> anyhow::Result<()> {
    let balance = client.balance(contract).await?;
    println!("Contract balance: {}", format_ether(balance));
    Ok(())
}
