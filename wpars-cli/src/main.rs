use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use log::debug;
use serde::Serialize;
use wpars::{Notification, Supplicant, SupplicantConfig};

#[derive(Parser, Debug)]
#[command(name = "wpars")]
#[command(version, about = "Talk to wpa_supplicant over its control socket")]
struct Args {
    /// Interface to control; defaults to the first control socket found
    #[arg(short, long)]
    interface: Option<String>,

    /// wpa_supplicant control directory
    #[arg(long, value_name = "DIR")]
    ctrl_dir: Option<PathBuf>,

    /// Command reply timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the daemon's STATUS report
    Status,
    /// Scan and list access points
    Scan {
        /// Seconds to wait for scan results
        #[arg(long, default_value_t = 10)]
        wait: u64,
    },
    /// List configured network slots
    List,
    /// Scan, then configure and select an access point by SSID
    Connect {
        ssid: String,
        /// Pre-shared key; open networks need none
        #[arg(long)]
        psk: Option<String>,
        /// Seconds to wait for scan results
        #[arg(long, default_value_t = 10)]
        wait: u64,
    },
    /// Disconnect from the current network
    Disconnect,
    /// Write the daemon configuration to disk
    Save,
    /// Print notifications until interrupted
    Monitor,
}

fn print<T: Serialize + std::fmt::Debug>(value: &T, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{value:#?}");
    }
    Ok(())
}

/// Waits for the next discovery, failing on a scan fault.
async fn await_discovery(supplicant: &Supplicant, wait: u64) -> anyhow::Result<()> {
    let mut notifications = supplicant.subscribe();
    supplicant.scan().await?;

    let discovery = async {
        while let Ok(n) = notifications.recv().await {
            match n {
                Notification::Discovery => return Ok(()),
                Notification::Error(fault) => bail!(fault),
                Notification::StateChanged(state) => debug!("state: {state}"),
            }
        }
        bail!("notification stream closed")
    };

    tokio::time::timeout(Duration::from_secs(wait), discovery)
        .await
        .context("timed out waiting for scan results")?
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = SupplicantConfig::new();
    if let Some(interface) = args.interface {
        config = config.with_interface(interface);
    }
    if let Some(dir) = args.ctrl_dir {
        config = config.with_ctrl_dir(dir);
    }
    if let Some(secs) = args.timeout {
        config = config.with_command_timeout(Duration::from_secs(secs));
    }

    let supplicant = Supplicant::open(config)
        .await
        .context("failed to open the wpa_supplicant control socket")?;
    let mut notifications = supplicant.subscribe();
    supplicant.init().await?;

    match args.command {
        Command::Status => print(&supplicant.status().await?, args.json)?,
        Command::Scan { wait } => {
            await_discovery(&supplicant, wait).await?;
            let networks = supplicant.scan_results().await.unwrap_or_default();
            if args.json {
                print(&networks, true)?;
            } else {
                for net in networks {
                    println!(
                        "{:17}  {:32} {:>5} dBm  {:>5} MHz  {}",
                        net.bssid(),
                        net.ssid(),
                        net.signal_level(),
                        net.frequency(),
                        net.flags()
                    );
                }
            }
        }
        Command::List => {
            let networks = supplicant.list_networks().await?;
            if args.json {
                print(&networks, true)?;
            } else {
                for net in networks {
                    println!("{:4} {:32} {:17} {}", net.id, net.ssid, net.bssid, net.flags);
                }
            }
        }
        Command::Connect { ssid, psk, wait } => {
            await_discovery(&supplicant, wait).await?;
            let Some(mut network) = supplicant
                .scan_results()
                .await
                .unwrap_or_default()
                .into_iter()
                .find(|net| net.ssid() == ssid)
            else {
                bail!("no access point named {ssid} in range");
            };
            if let Some(psk) = psk {
                network.set_preshared_key(psk);
            }
            let id = supplicant.connect(&network).await?;
            println!("Selected {network} as network {id}");
        }
        Command::Disconnect => supplicant.disconnect().await?,
        Command::Save => supplicant.save().await?,
        Command::Monitor => {
            while let Ok(n) = notifications.recv().await {
                if args.json {
                    println!("{}", serde_json::to_string(&n)?);
                } else {
                    match n {
                        Notification::StateChanged(state) => println!("state: {state}"),
                        Notification::Discovery => println!("scan results updated"),
                        Notification::Error(fault) => println!("error: {fault}"),
                    }
                }
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    run(Args::parse()).await
}
