//! Environment-driven configuration, assembled once at startup.

use std::time::Duration;

use regex::Regex;

/// Optional host-override file, checked in the working directory.
const HOST_FILE: &str = "host.txt";

/// Runtime configuration for one batch run.
///
/// Built by [`AppConfig::from_env`] before any component starts and
/// passed by value into constructors; immutable afterward.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend host.
    pub host: String,
    /// Backend port.
    pub port: u16,
    /// Directory scanned for source videos.
    pub video_dir: String,
    /// Translation target language.
    pub target_language: String,
    /// Whisper model name.
    pub model_name: String,
    /// TTS voice role.
    pub voice_role: String,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    /// Ceiling on consecutive transient poll failures per job; unset
    /// retries forever.
    pub max_transient_failures: Option<u32>,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default               |
    /// |-----------------------------|-----------------------|
    /// | `VT_HOST`                   | `127.0.0.1`           |
    /// | `VT_PORT`                   | `9011`                |
    /// | `VT_VIDEO_DIR`              | `.`                   |
    /// | `VT_TARGET_LANG`            | `en`                  |
    /// | `VT_MODEL_NAME`             | `tiny`                |
    /// | `VT_VOICE_ROLE`             | `zh-CN-YunjianNeural` |
    /// | `VT_REQUEST_TIMEOUT_SECS`   | `30`                  |
    /// | `VT_MAX_TRANSIENT_FAILURES` | unset (retry forever) |
    ///
    /// A `host.txt` file in the working directory overrides
    /// `VT_HOST`/`VT_PORT`; its contents are `host[:port]`, with an
    /// optional `http://`/`https://` prefix that gets stripped.
    pub fn from_env() -> Self {
        let mut host = std::env::var("VT_HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let mut port: u16 = std::env::var("VT_PORT")
            .unwrap_or_else(|_| "9011".into())
            .parse()
            .expect("VT_PORT must be a valid u16");

        if let Ok(contents) = std::fs::read_to_string(HOST_FILE) {
            if let Some((file_host, file_port)) = parse_host_override(&contents) {
                tracing::info!(host = %file_host, port = ?file_port, "Applying host.txt override");
                host = file_host;
                if let Some(p) = file_port {
                    port = p;
                }
            }
        }

        let request_timeout_secs: u64 = std::env::var("VT_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("VT_REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_transient_failures = std::env::var("VT_MAX_TRANSIENT_FAILURES")
            .ok()
            .map(|v| v.parse().expect("VT_MAX_TRANSIENT_FAILURES must be a valid u32"));

        Self {
            host,
            port,
            video_dir: std::env::var("VT_VIDEO_DIR").unwrap_or_else(|_| ".".into()),
            target_language: std::env::var("VT_TARGET_LANG").unwrap_or_else(|_| "en".into()),
            model_name: std::env::var("VT_MODEL_NAME").unwrap_or_else(|_| "tiny".into()),
            voice_role: std::env::var("VT_VOICE_ROLE")
                .unwrap_or_else(|_| "zh-CN-YunjianNeural".into()),
            request_timeout: Duration::from_secs(request_timeout_secs),
            max_transient_failures,
        }
    }
}

/// Parse a `host[:port]` override, tolerating a leading URL scheme.
///
/// Returns `None` for blank contents. An unparseable port is dropped and
/// the host alone is applied.
pub fn parse_host_override(contents: &str) -> Option<(String, Option<u16>)> {
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        return None;
    }

    let scheme = Regex::new(r"^https?://").expect("scheme pattern is valid");
    let stripped = scheme.replace(trimmed, "");

    let mut parts = stripped.splitn(2, ':');
    let host = parts.next()?.to_string();
    if host.is_empty() {
        return None;
    }
    let port = parts.next().and_then(|p| p.parse().ok());
    Some((host, port))
}
