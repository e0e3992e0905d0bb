//! Command line and environment configuration.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::Url;

use crate::data::STATE_KEY;
use crate::error::ConfigError;
use crate::protocol::DEFAULT_BACKEND_URL;

pub const DEFAULT_TOPICS: [&str; 10] = [
    "Machine Learning",
    "Data Science",
    "Artificial Intelligence",
    "Deep Learning",
    "Natural Language Processing",
    "Computer Vision",
    "Statistics",
    "Programming",
    "Web Development",
    "Database Systems",
];

const APP_DIR_NAME: &str = "interview-coach";
const FALLBACK_STATE_DIR: &str = ".interview-coach";

#[derive(Parser, Debug)]
#[command(version, about = "Practice interview questions in the terminal", long_about = None)]
pub struct Cli {
    /// Base URL of the question service
    #[arg(long, env = "INTERVIEW_COACH_BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
    pub backend_url: String,

    /// Directory holding the saved history
    #[arg(long, env = "INTERVIEW_COACH_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// Directory for log files (defaults to <state-dir>/logs)
    #[arg(long, env = "INTERVIEW_COACH_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log filter, e.g. "info" or "interview_coach=debug"
    #[arg(long, env = "INTERVIEW_COACH_LOG", default_value = "info")]
    pub log_level: String,

    /// Topic offered in setup; repeat to replace the default list
    #[arg(long = "topic", value_name = "NAME")]
    pub topics: Vec<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Print statistics for the saved history and exit
    Stats,
}

/// Resolved settings for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub backend_url: Url,
    pub state_dir: PathBuf,
    pub state_key: String,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub topics: Vec<String>,
}

impl Cli {
    /// Validates the arguments and fills in platform defaults.
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let backend_url = parse_backend_url(&self.backend_url)?;
        let state_dir = match self.state_dir {
            Some(dir) => dir,
            None => default_state_dir()?,
        };
        let log_dir = self.log_dir.unwrap_or_else(|| state_dir.join("logs"));

        let topics: Vec<String> = self
            .topics
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        let topics = if topics.is_empty() {
            DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect()
        } else {
            topics
        };

        Ok(Config {
            backend_url,
            state_dir,
            state_key: STATE_KEY.to_string(),
            log_dir,
            log_level: self.log_level,
            topics,
        })
    }
}

fn parse_backend_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBackendUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {other}"))),
    }
}

fn default_state_dir() -> Result<PathBuf, ConfigError> {
    if let Some(base) = dirs::data_dir() {
        return Ok(base.join(APP_DIR_NAME));
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(FALLBACK_STATE_DIR))
        .map_err(|_| ConfigError::NoStateDir)
}
