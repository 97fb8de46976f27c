//! Command-line arguments
//!
//! Each flag can also come from its environment variable; clap gives the flag
//! precedence.

use clap::Parser;
use qradio_common::config::ConfigOverrides;
use std::path::PathBuf;

/// Command-line arguments for qradio-server
#[derive(Parser, Debug)]
#[command(name = "qradio-server")]
#[command(about = "Quran radio proxy: relays the Itqan CMS API and recitation audio")]
#[command(version)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Port to try when the primary port is in use (0 disables)
    #[arg(long, env = "QRADIO_FALLBACK_PORT")]
    pub fallback_port: Option<u16>,

    /// Address to bind
    #[arg(long = "bind", env = "QRADIO_BIND")]
    pub bind_address: Option<String>,

    /// Upstream content API base URL
    #[arg(long = "upstream", env = "QRADIO_UPSTREAM")]
    pub upstream_base_url: Option<String>,

    /// Path to the TOML config file
    #[arg(short, long, env = "QRADIO_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            port: self.port,
            fallback_port: self.fallback_port,
            bind_address: self.bind_address.clone(),
            upstream_base_url: self.upstream_base_url.clone(),
        }
    }
}
