use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings for the relay binary, read from a `key = value` file.
///
/// Blank lines and `#` comments are ignored; unknown keys too, so a config
/// file can be shared with other tooling. Anything the file leaves out keeps
/// its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Address the relay accepts downstream connections on.
    pub listen_addr: String,
    /// Address every session is forwarded to.
    pub upstream_addr: String,
    /// Keepalive interval, for callers that attach a pinger to a stream.
    pub ping_interval: Duration,
    /// Log directory; `None` means `logs/` next to the executable.
    pub log_dir: Option<PathBuf>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:4040".to_owned(),
            upstream_addr: "127.0.0.1:4041".to_owned(),
            ping_interval: Duration::from_secs(30),
            log_dir: None,
        }
    }
}

impl RelayConfig {
    /// Loads from `path`, keeping defaults for anything the file leaves out.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("error reading config {}: {e}", path.display()))?;
        Ok(Self::parse(&content))
    }

    fn parse(content: &str) -> Self {
        let mut cfg = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some(pos) = line.find('=') else { continue };
            let key = line[..pos].trim();
            let value = line[pos + 1..].trim().trim_matches('"');

            match key {
                "listen_addr" => cfg.listen_addr = value.to_owned(),
                "upstream_addr" => cfg.upstream_addr = value.to_owned(),
                "ping_interval_secs" => {
                    if let Ok(secs) = value.parse::<u64>()
                        && secs > 0
                    {
                        cfg.ping_interval = Duration::from_secs(secs);
                    }
                }
                "log_dir" => cfg.log_dir = Some(PathBuf::from(value)),
                _ => {}
            }
        }
        cfg
    }

    /// Resolves the config path: `FRAMELINK_CONFIG` if set, otherwise
    /// `relay.conf` next to the executable so restarts pick up the same file
    /// regardless of the working directory.
    #[must_use]
    pub fn default_path() -> PathBuf {
        if let Ok(p) = std::env::var("FRAMELINK_CONFIG") {
            return PathBuf::from(p);
        }
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|dir| dir.join("relay.conf")))
            .unwrap_or_else(|| PathBuf::from("relay.conf"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn parse_reads_known_keys_and_skips_noise() {
        let cfg = RelayConfig::parse(
            "# relay settings\n\
             \n\
             listen_addr = \"0.0.0.0:9000\"\n\
             upstream_addr = 10.1.2.3:9001\n\
             ping_interval_secs = 5\n\
             log_dir = /var/log/framelink\n\
             color = purple\n\
             not a key value line\n",
        );

        assert_eq!(cfg.listen_addr, "0.0.0.0:9000");
        assert_eq!(cfg.upstream_addr, "10.1.2.3:9001");
        assert_eq!(cfg.ping_interval, Duration::from_secs(5));
        assert_eq!(cfg.log_dir, Some(PathBuf::from("/var/log/framelink")));
    }

    #[test]
    fn empty_input_yields_defaults() {
        assert_eq!(RelayConfig::parse(""), RelayConfig::default());
    }

    #[test]
    fn zero_or_garbage_interval_keeps_the_default() {
        let cfg = RelayConfig::parse("ping_interval_secs = 0\n");
        assert_eq!(cfg.ping_interval, RelayConfig::default().ping_interval);

        let cfg = RelayConfig::parse("ping_interval_secs = soon\n");
        assert_eq!(cfg.ping_interval, RelayConfig::default().ping_interval);
    }

    #[test]
    fn load_reports_a_missing_file() {
        let err = RelayConfig::load(Path::new("/definitely/not/here.conf")).unwrap_err();
        assert!(err.contains("error reading config"));
    }
}
