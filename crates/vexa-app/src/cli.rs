//! CLI argument definitions for the Vexa service.
//!
//! Flags win over their environment variables, which win over the config
//! file. Unset options leave the file value untouched.

use std::path::PathBuf;

use clap::Parser;
use vexa_core::config::VexaConfig;

/// Vexa - a conversational text and voice assistant service.
#[derive(Parser, Debug)]
#[command(name = "vexa", version, about)]
pub struct CliArgs {
    /// Path to the configuration file [default: ~/.vexa/config.toml].
    #[arg(short = 'c', long = "config", env = "VEXA_CONFIG")]
    pub config: Option<PathBuf>,

    /// API server port.
    #[arg(short = 'p', long = "port", env = "VEXA_PORT")]
    pub port: Option<u16>,

    /// Log filter used when RUST_LOG is unset (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Directory for per-request audio scratch files.
    #[arg(short = 's', long = "scratch-dir")]
    pub scratch_dir: Option<PathBuf>,
}

impl CliArgs {
    /// Config file to read; falls back to `.vexa/config.toml` under the home dir.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(|| {
            home_dir()
                .map(|home| home.join(".vexa").join("config.toml"))
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        })
    }

    /// Overlay the given options onto a loaded config.
    pub fn apply_to(&self, config: &mut VexaConfig) {
        if let Some(port) = self.port {
            config.general.port = port;
        }
        if let Some(ref level) = self.log_level {
            config.general.log_level = level.clone();
        }
        if let Some(ref dir) = self.scratch_dir {
            config.general.scratch_dir = dir.to_string_lossy().into_owned();
        }
    }
}

fn home_dir() -> Option<PathBuf> {
    let var = if cfg!(target_os = "windows") {
        "USERPROFILE"
    } else {
        "HOME"
    };
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = CliArgs::parse_from([
            "vexa",
            "--config",
            "/tmp/vexa.toml",
            "-p",
            "8080",
            "--log-level",
            "debug",
            "--scratch-dir",
            "/tmp/scratch",
        ]);
        assert_eq!(args.config_path(), PathBuf::from("/tmp/vexa.toml"));

        let mut config = VexaConfig::default();
        args.apply_to(&mut config);
        assert_eq!(config.general.port, 8080);
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.scratch_dir, "/tmp/scratch");
    }

    #[test]
    fn test_unset_flags_keep_file_values() {
        let args = CliArgs {
            config: None,
            port: None,
            log_level: None,
            scratch_dir: None,
        };
        let mut config = VexaConfig::default();
        config.general.port = 4242;
        config.general.log_level = "warn".to_string();
        args.apply_to(&mut config);

        assert_eq!(config.general.port, 4242);
        assert_eq!(config.general.log_level, "warn");
        assert!(config.general.scratch_dir.is_empty());
        assert!(args.config_path().ends_with("config.toml"));
    }

    #[test]
    fn test_rejects_invalid_port() {
        assert!(CliArgs::try_parse_from(["vexa", "--port", "not-a-port"]).is_err());
    }
}
