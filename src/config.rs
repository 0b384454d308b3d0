//! Launch configuration: which dashboard to open and where its data lives.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Environment variable overriding the supermarket data file.
pub const DATA_ENV: &str = "SUPERMARKET_DATA";
pub const DEFAULT_DATA_PATH: &str = "data/supermarket_sales.csv";

pub const USAGE: &str = "\
usage: rusty-dashboards [cars|supermarket] [PATH]

  cars          car sales dashboard (inline data)
  supermarket   supermarket sales dashboard (default)
  PATH          .csv, .json or .parquet file for the supermarket dashboard
                (default: $SUPERMARKET_DATA, then data/supermarket_sales.csv)";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown dashboard '{0}' (expected 'cars' or 'supermarket')")]
    UnknownDashboard(String),
    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardKind {
    Cars,
    #[default]
    Supermarket,
}

impl FromStr for DashboardKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cars" | "car" | "mobil" => Ok(DashboardKind::Cars),
            "supermarket" | "sales" => Ok(DashboardKind::Supermarket),
            _ => Err(ConfigError::UnknownDashboard(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub dashboard: DashboardKind,
    pub data_path: PathBuf,
}

/// Result of parsing the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Config),
    Help,
}

impl Config {
    /// Parse the process arguments and environment.
    pub fn from_env() -> Result<Command, ConfigError> {
        Self::parse(std::env::args().skip(1), std::env::var(DATA_ENV).ok())
    }

    /// Parse `[DASHBOARD] [PATH]` with an optional fallback for `PATH`.
    pub fn parse<I, S>(args: I, env_path: Option<String>) -> Result<Command, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dashboard = None;
        let mut data_path = None;

        for arg in args {
            let arg: String = arg.into();
            if arg == "-h" || arg == "--help" {
                return Ok(Command::Help);
            }
            if dashboard.is_none() && data_path.is_none() {
                match arg.parse::<DashboardKind>() {
                    Ok(kind) => {
                        dashboard = Some(kind);
                        continue;
                    }
                    // A first argument that names a file skips the dashboard name.
                    Err(_) if looks_like_path(&arg) => {
                        data_path = Some(PathBuf::from(arg));
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            }
            // The car dashboard has its data inline.
            if dashboard == Some(DashboardKind::Cars) {
                return Err(ConfigError::UnexpectedArgument(arg));
            }
            if data_path.is_none() {
                data_path = Some(PathBuf::from(arg));
            } else {
                return Err(ConfigError::UnexpectedArgument(arg));
            }
        }

        let data_path = data_path
            .or_else(|| env_path.filter(|p| !p.is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        Ok(Command::Run(Config {
            dashboard: dashboard.unwrap_or_default(),
            data_path,
        }))
    }
}

fn looks_like_path(arg: &str) -> bool {
    arg.contains('/') || arg.contains('\\') || arg.contains('.')
}
