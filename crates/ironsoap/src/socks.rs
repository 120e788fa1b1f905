//! SOCKS-over-SSH proxy helper.
//!
//! Manages a local `ssh -n -N -D <port>` child process that exposes a SOCKS5
//! endpoint for reaching firewalled services. Pure infrastructure: no
//! protocol semantics, just start/stop/status with a pid file so separate
//! invocations agree about the process.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use tracing::{info, warn};

pub const DEFAULT_PID_PATH: &str = "tmp/proxy.pid";

#[derive(Debug, thiserror::Error)]
pub enum SocksError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid pid file content: {0}")]
    InvalidPidFile(String),
}

/// Tunnel configuration.
#[derive(Debug, Clone, typed_builder::TypedBuilder)]
pub struct SocksProxyConfig {
    /// The machine to proxy through.
    #[builder(setter(into))]
    pub host: String,
    /// The username on the remote machine.
    #[builder(setter(into))]
    pub user: String,
    /// The local port the SOCKS endpoint listens on.
    pub port: u16,
    /// Where the child pid is recorded for monitoring and shutdown.
    #[builder(default = PathBuf::from(DEFAULT_PID_PATH))]
    pub pid_path: PathBuf,
    /// How long to wait after spawning before answering liveness.
    ///
    /// ssh offers no readiness signal on the SOCKS listener; callers that
    /// probe readiness themselves can set this to zero.
    #[builder(default = Duration::from_secs(5))]
    pub startup_grace: Duration,
}

/// Status snapshot for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyStatus {
    Running(u32),
    Stopped,
}

impl fmt::Display for ProxyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyStatus::Running(pid) => write!(f, "SSH SOCKS proxy running as pid {pid}."),
            ProxyStatus::Stopped => write!(f, "SSH SOCKS proxy is not running."),
        }
    }
}

/// A handle on the tunnel process.
pub struct SocksProxy {
    config: SocksProxyConfig,
    child: Option<Child>,
    /// Whether this instance spawned the process (as opposed to finding one
    /// recorded in the pid file).
    started: bool,
}

impl SocksProxy {
    pub fn new(config: SocksProxyConfig) -> Self {
        SocksProxy {
            config,
            child: None,
            started: false,
        }
    }

    pub fn config(&self) -> &SocksProxyConfig {
        &self.config
    }

    pub fn started(&self) -> bool {
        self.started
    }

    /// The command line used to establish the tunnel.
    pub fn command_line(&self) -> Vec<String> {
        vec![
            "ssh".to_string(),
            "-n".to_string(),
            "-N".to_string(),
            "-D".to_string(),
            self.config.port.to_string(),
            format!("{}@{}", self.config.user, self.config.host),
        ]
    }

    fn command(&self) -> Command {
        let line = self.command_line();
        let mut command = Command::new(&line[0]);
        command.args(&line[1..]);
        command.stdin(Stdio::null());
        command
    }

    /// The recorded pid: this instance's child if it spawned one, else the
    /// pid file's content.
    pub fn pid(&self) -> Result<Option<u32>, SocksError> {
        if let Some(child) = &self.child {
            return Ok(Some(child.id()));
        }
        if !self.config.pid_path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.config.pid_path)?;
        let trimmed = content.trim();
        trimmed
            .parse::<u32>()
            .map(Some)
            .map_err(|_| SocksError::InvalidPidFile(trimmed.to_string()))
    }

    /// Answers whether the recorded process is alive.
    pub fn running(&self) -> bool {
        match self.pid() {
            Ok(Some(pid)) => process_alive(pid),
            Ok(None) => false,
            Err(error) => {
                warn!(error = %error, "could not determine proxy pid");
                false
            }
        }
    }

    pub fn status(&self) -> ProxyStatus {
        match self.pid() {
            Ok(Some(pid)) if process_alive(pid) => ProxyStatus::Running(pid),
            _ => ProxyStatus::Stopped,
        }
    }

    /// Ensures the tunnel is up. Answers `true` when the proxy is running
    /// after the call, whether it already was or became so here.
    pub fn start(&mut self) -> Result<bool, SocksError> {
        info!("{}", self.status());
        if self.running() {
            return Ok(true);
        }

        let line = self.command_line().join(" ");
        info!(command = %line, "starting SSH SOCKS proxy");
        let child = self.command().spawn()?;
        self.write_pid_file(child.id())?;
        self.child = Some(child);
        self.started = true;

        // ssh needs a moment before the listener accepts connections.
        std::thread::sleep(self.config.startup_grace);

        let running = self.running();
        if running {
            info!(
                port = self.config.port,
                pid = self.child.as_ref().map(Child::id),
                "started SSH SOCKS proxy"
            );
        } else {
            warn!(port = self.config.port, "failed to start SSH SOCKS proxy");
        }
        Ok(running)
    }

    /// Terminates the recorded process. Answers `true` when it was running,
    /// `false` when there was nothing to stop.
    pub fn stop(&mut self) -> Result<bool, SocksError> {
        if !self.running() {
            info!("SSH SOCKS proxy does not appear to be running.");
            return Ok(false);
        }

        if let Some(pid) = self.pid()? {
            terminate(pid);
        }
        if let Some(mut child) = self.child.take() {
            // Reap the child so it does not linger as a zombie.
            let _ = child.wait();
        }
        if self.config.pid_path.exists() {
            fs::remove_file(&self.config.pid_path)?;
        }
        info!("terminated SSH SOCKS proxy");
        Ok(true)
    }

    fn write_pid_file(&self, pid: u32) -> Result<(), SocksError> {
        if let Some(parent) = self.config.pid_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.config.pid_path, pid.to_string())?;
        Ok(())
    }
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    // Signal 0 probes for existence without touching the process.
    unsafe { libc::kill(pid as libc::pid_t, 0) == 0 }
}

#[cfg(not(unix))]
fn process_alive(_pid: u32) -> bool {
    false
}

#[cfg(unix)]
fn terminate(pid: u32) {
    unsafe {
        libc::kill(pid as libc::pid_t, libc::SIGTERM);
    }
}

#[cfg(not(unix))]
fn terminate(_pid: u32) {}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &std::path::Path) -> SocksProxyConfig {
        SocksProxyConfig::builder()
            .host("bastion.example.com")
            .user("deploy")
            .port(9050)
            .pid_path(dir.join("proxy.pid"))
            .startup_grace(Duration::ZERO)
            .build()
    }

    #[test]
    fn test_command_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        let proxy = SocksProxy::new(config(dir.path()));
        assert_eq!(
            proxy.command_line(),
            vec!["ssh", "-n", "-N", "-D", "9050", "deploy@bastion.example.com"]
        );
    }

    #[test]
    fn test_pid_absent_without_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let proxy = SocksProxy::new(config(dir.path()));
        assert_eq!(proxy.pid().expect("no pid"), None);
        assert!(!proxy.running());
        assert_eq!(proxy.status(), ProxyStatus::Stopped);
    }

    #[test]
    fn test_pid_file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let proxy = SocksProxy::new(config(dir.path()));
        proxy.write_pid_file(12345).expect("writes");
        assert_eq!(proxy.pid().expect("reads"), Some(12345));
    }

    #[test]
    fn test_invalid_pid_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let proxy = SocksProxy::new(config(dir.path()));
        fs::write(dir.path().join("proxy.pid"), "not a pid").expect("writes");
        assert!(matches!(proxy.pid(), Err(SocksError::InvalidPidFile(_))));
        assert!(!proxy.running(), "unreadable pid counts as not running");
    }

    #[test]
    fn test_stop_without_running_process() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut proxy = SocksProxy::new(config(dir.path()));
        assert!(!proxy.stop().expect("stop is a no-op"));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(
            ProxyStatus::Running(42).to_string(),
            "SSH SOCKS proxy running as pid 42."
        );
        assert_eq!(
            ProxyStatus::Stopped.to_string(),
            "SSH SOCKS proxy is not running."
        );
    }
}
