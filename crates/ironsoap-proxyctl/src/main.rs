//! Control the SSH SOCKS proxy helper used for reaching firewalled SOAP
//! services: `ironsoap-proxyctl start|stop|status`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ironsoap::socks::{SocksProxy, SocksProxyConfig};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, registry::Registry, EnvFilter};

/// SSH SOCKS proxy control for SOAP endpoints behind a firewall
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// The machine to proxy through
    #[arg(short = 'H', long, help = "Remote host to tunnel through")]
    host: String,

    /// Username on the remote machine
    #[arg(short, long, help = "Username on the remote host")]
    user: String,

    /// Local port for the SOCKS listener
    #[arg(short, long, default_value = "9050", help = "Local SOCKS port")]
    port: u16,

    /// Where the child pid is recorded
    #[arg(long, default_value = "tmp/proxy.pid", help = "Pid file path")]
    pid_path: PathBuf,

    /// Seconds to wait after spawning before reporting liveness
    #[arg(long, default_value = "5", help = "Startup grace in seconds")]
    startup_grace: u64,

    #[command(subcommand)]
    command: ProxyCommand,
}

#[derive(Subcommand)]
enum ProxyCommand {
    /// Start the SOCKS proxy over SSH
    Start,
    /// Stop the SOCKS proxy
    Stop,
    /// Report whether the proxy is running
    Status,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    Registry::default()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging();

    if let Err(e) = run_app(args) {
        error!("proxyctl failed: {:?}", e);
        return Err(e);
    }
    Ok(())
}

fn run_app(args: Args) -> anyhow::Result<()> {
    let config = SocksProxyConfig::builder()
        .host(args.host)
        .user(args.user)
        .port(args.port)
        .pid_path(args.pid_path)
        .startup_grace(Duration::from_secs(args.startup_grace))
        .build();
    let mut proxy = SocksProxy::new(config);

    match args.command {
        ProxyCommand::Start => {
            let running = proxy.start().context("failed to start the SOCKS proxy")?;
            anyhow::ensure!(running, "proxy did not come up");
        }
        ProxyCommand::Stop => {
            proxy.stop().context("failed to stop the SOCKS proxy")?;
        }
        ProxyCommand::Status => {
            println!("{}", proxy.status());
        }
    }
    Ok(())
}
