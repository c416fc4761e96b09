use flagfill::derive::*;
use flagfill::with_env;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Default, Clone, Copy, TextValue)]
pub enum Mode {
    #[default]
    Fast,
    Safe,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "fast" => Ok(Mode::Fast),
            "safe" => Ok(Mode::Safe),
            _ => Err(format!("unknown mode '{value}'")),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Fast => write!(f, "fast"),
            Mode::Safe => write!(f, "safe"),
        }
    }
}

#[derive(Debug, Default, Fill)]
pub struct Config {
    #[flag(default = "localhost", usage = "the [host] to listen on", aliases = "H")]
    pub host: String,
    #[flag(default = "8080", usage = "the port to listen on")]
    pub port: u32,
    #[flag(default = "30s", usage = "request timeout")]
    pub timeout: Duration,
    #[flag(usage = "enable verbose output")]
    pub verbose: bool,
    #[flag(default = "alpha,beta", usage = "the [peers] to connect to")]
    pub peers: Vec<String>,
    #[flag(usage = "labels as key=value pairs")]
    pub labels: HashMap<String, String>,
    #[flag(usage = "fast or safe")]
    pub mode: Mode,
    pub database: Database,
    #[flag(flatten)]
    pub logging: Logging,
    secret: String,
}

#[derive(Debug, Default, Fill)]
pub struct Database {
    #[flag(default = "postgres://localhost", usage = "the database [url]")]
    pub url: String,
    #[flag(default = "10", usage = "connections in the pool")]
    pub pool_size: u32,
}

#[derive(Debug, Default, Fill)]
pub struct Logging {
    #[flag(default = "info", usage = "the log level", env = "LOG_LEVEL")]
    pub log_level: String,
}

fn main() {
    let mut config = Config::default();

    match flagfill::parse(&mut config, [with_env("DEMO")]) {
        Ok(remaining) => {
            println!("{config:#?}");
            println!("remaining: {remaining:?}");
        }
        Err(_) => std::process::exit(2),
    }
}
