// src/config/model.rs

use serde::Deserialize;

/// Top-level configuration as read from a `Deploy.toml` file.
///
/// ```toml
/// [target]
/// connect_timeout_secs = 10
/// host_key_policy = "accept-new"
///
/// [remote]
/// dir = "/home/ubuntu/arbitrage-bot"
///
/// [payload]
/// files = ["run.py", "config.yaml", "requirements.txt"]
/// secrets = ".env"
///
/// [service]
/// name = "arb-bot"
/// ```
///
/// All sections are optional; the defaults reproduce the bot's standard
/// deployment, so a config file is only needed to override them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Connection options from `[target]`.
    #[serde(default)]
    pub target: TargetSection,

    /// Remote filesystem layout from `[remote]`.
    #[serde(default)]
    pub remote: RemoteSection,

    /// Files shipped to the host, from `[payload]`.
    #[serde(default)]
    pub payload: PayloadSection,

    /// systemd service shape from `[service]`.
    #[serde(default)]
    pub service: ServiceSection,
}

/// `[target]` section: connection parameters shared by `ssh` and `scp`.
///
/// The address itself and the private key are CLI arguments, not config;
/// they change per invocation while these options rarely do.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetSection {
    /// `ConnectTimeout` in seconds for connection establishment.
    ///
    /// This bounds only the connect; a long-running remote install step is
    /// deliberately unbounded.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// `StrictHostKeyChecking` policy: `"accept-new"` or `"strict"`.
    #[serde(default = "default_host_key_policy")]
    pub host_key_policy: String,
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_host_key_policy() -> String {
    "accept-new".to_string()
}

impl Default for TargetSection {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            host_key_policy: default_host_key_policy(),
        }
    }
}

/// `[remote]` section: where the bot lives on the host.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteSection {
    /// Absolute working directory for the deployed bot.
    ///
    /// Created with `mkdir -p`; every later stage runs relative to it.
    #[serde(default = "default_remote_dir")]
    pub dir: String,

    /// Runtime binary looked up on the remote PATH.
    ///
    /// Presence of the binary is the whole detection policy; there is no
    /// version check, so a pre-existing old runtime is accepted as-is.
    #[serde(default = "default_runtime")]
    pub runtime: String,
}

fn default_remote_dir() -> String {
    "/home/ubuntu/arbitrage-bot".to_string()
}

fn default_runtime() -> String {
    "python3".to_string()
}

impl Default for RemoteSection {
    fn default() -> Self {
        Self {
            dir: default_remote_dir(),
            runtime: default_runtime(),
        }
    }
}

/// `[payload]` section: the file set copied to the host.
///
/// Paths are resolved relative to the directory containing the config
/// file (or the current directory when running on defaults).
#[derive(Debug, Clone, Deserialize)]
pub struct PayloadSection {
    /// Required files; a missing one aborts the run before any remote call.
    #[serde(default = "default_payload_files")]
    pub files: Vec<String>,

    /// Optional secrets file (API keys). Shipped when present, otherwise
    /// the run continues with a warning.
    #[serde(default = "default_secrets")]
    pub secrets: String,

    /// pip requirements manifest installed into the venv. Must also be
    /// listed in `files` so it gets transferred.
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// Name of the venv directory under the remote dir. Reused across
    /// redeploys; stale packages persist unless cleared by hand.
    #[serde(default = "default_venv_dir")]
    pub venv_dir: String,

    /// Package name substrings listed after install, for operator
    /// inspection only.
    #[serde(default = "default_expected_packages")]
    pub expected_packages: Vec<String>,

    /// The bot's strategy config inside the remote dir, referenced by the
    /// cheat-sheet's edit entry.
    #[serde(default = "default_bot_config")]
    pub bot_config: String,
}

fn default_payload_files() -> Vec<String> {
    [
        "run.py",
        "arbitrage_bot.py",
        "config.py",
        "control_server.py",
        "fill_handler.py",
        "trade_logger.py",
        "feishu_notifier.py",
        "ws_manager.py",
        "binance_adapter.py",
        "aster_adapter.py",
        "aster_ws_manager.py",
        "gate_adapter.py",
        "gate_ws_manager.py",
        "bitget_adapter.py",
        "bitget_ws_manager.py",
        "cross_exchange_adapter.py",
        "config.yaml",
        "requirements.txt",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_secrets() -> String {
    ".env".to_string()
}

fn default_manifest() -> String {
    "requirements.txt".to_string()
}

fn default_venv_dir() -> String {
    "venv".to_string()
}

fn default_expected_packages() -> Vec<String> {
    ["binance", "websockets", "yaml", "dotenv", "requests"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_bot_config() -> String {
    "config.yaml".to_string()
}

impl Default for PayloadSection {
    fn default() -> Self {
        Self {
            files: default_payload_files(),
            secrets: default_secrets(),
            manifest: default_manifest(),
            venv_dir: default_venv_dir(),
            expected_packages: default_expected_packages(),
            bot_config: default_bot_config(),
        }
    }
}

/// `[service]` section: shape of the installed systemd unit and the
/// post-restart health check.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceSection {
    /// Unit name (without the `.service` suffix).
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Entrypoint file run by the venv interpreter.
    #[serde(default = "default_entrypoint")]
    pub entrypoint: String,

    /// `RestartSec`: fixed delay before each restart attempt.
    #[serde(default = "default_restart_delay_secs")]
    pub restart_delay_secs: u64,

    /// Seconds to wait after `systemctl restart` before querying state.
    #[serde(default = "default_start_grace_secs")]
    pub start_grace_secs: u64,

    /// Journal lines fetched when the service comes up inactive.
    #[serde(default = "default_log_tail_lines")]
    pub log_tail_lines: u32,

    /// The bot's own log file inside the remote dir, referenced by the
    /// cheat-sheet.
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_service_name() -> String {
    "arb-bot".to_string()
}

fn default_entrypoint() -> String {
    "run.py".to_string()
}

fn default_restart_delay_secs() -> u64 {
    5
}

fn default_start_grace_secs() -> u64 {
    3
}

fn default_log_tail_lines() -> u32 {
    50
}

fn default_log_file() -> String {
    "bot.log".to_string()
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            entrypoint: default_entrypoint(),
            restart_delay_secs: default_restart_delay_secs(),
            start_grace_secs: default_start_grace_secs(),
            log_tail_lines: default_log_tail_lines(),
            log_file: default_log_file(),
        }
    }
}
