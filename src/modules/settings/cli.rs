//
// Copyright (c) 2025 rustmailer.com (https://rustmailer.com)
//
// This file is part of the Aliasd Mailbox Settings Project
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.


use clap::{builder::ValueParser, Parser};
use std::{collections::HashSet, path::PathBuf, sync::LazyLock};

/// 10 GiB, used when a domain does not carry its own per-alias quota.
pub const DEFAULT_MAX_QUOTA_PER_ALIAS: u64 = 10_737_418_240;

#[cfg(not(test))]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::parse);

#[cfg(test)]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(|| {
    // Kept on disk after the run so a failing test's database can be inspected.
    let root_dir = tempfile::Builder::new()
        .prefix("aliasd_test_")
        .tempdir()
        .map(|dir| dir.keep())
        .unwrap_or_else(|_| {
            std::env::temp_dir().join(format!("aliasd_test_{}", std::process::id()))
        });

    Settings {
        aliasd_log_level: "info".to_string(),
        aliasd_http_port: 15640,
        aliasd_bind_ip: Some("0.0.0.0".to_string()),
        aliasd_cors_origins: HashSet::new(),
        aliasd_cors_max_age: 86400,
        aliasd_ansi_logs: true,
        aliasd_log_to_file: false,
        aliasd_json_logs: false,
        aliasd_max_server_log_files: 5,
        aliasd_root_dir: root_dir.to_string_lossy().into_owned(),
        aliasd_metadata_cache_size: Some(67108864),
        aliasd_http_compression_enabled: true,
        aliasd_webui_token_expiration_hours: 24,
        aliasd_max_quota_per_alias: DEFAULT_MAX_QUOTA_PER_ALIAS,
    }
});

#[derive(Debug, Parser)]
#[clap(
    name = "aliasd",
    about = "Mailbox alias settings service for hosted email accounts",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Settings {
    /// aliasd log level (default: "info")
    #[clap(
        long,
        default_value = "info",
        env,
        help = "Set the log level for aliasd"
    )]
    pub aliasd_log_level: String,

    /// aliasd HTTP port (default: 15640)
    #[clap(
        long,
        default_value = "15640",
        env,
        help = "Set the HTTP port for aliasd"
    )]
    pub aliasd_http_port: i32,

    /// The IP address that the service binds to, in IPv4 format (e.g., 192.168.1.1).
    #[clap(
        long,
        env,
        default_value = "0.0.0.0",
        help = "The IP address that the service binds to, in IPv4 format (e.g., 192.168.1.1).",
        value_parser = ValueParser::new(|s: &str| {
            if s.parse::<std::net::Ipv4Addr>().is_err() {
                return Err("The bind IP address must be a valid IPv4 address.".to_string());
            }
            Ok(s.to_string())
        })
    )]
    pub aliasd_bind_ip: Option<String>,

    /// CORS allowed origins (default: any)
    #[clap(
        long,
        default_value = "",
        env,
        help = "Set the allowed CORS origins (comma-separated list, e.g., \"https://example.com, https://another.com\"). Empty allows any origin.",
        value_parser = ValueParser::new(|s: &str| -> Result<HashSet<String>, String> {
            let set: HashSet<String> = s.split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect();
            Ok(set)
        })
    )]
    pub aliasd_cors_origins: HashSet<String>,

    /// CORS max age in seconds (default: 86400)
    #[clap(
        long,
        default_value = "86400",
        env,
        help = "Set the CORS max age in seconds"
    )]
    pub aliasd_cors_max_age: i32,

    /// Enable ANSI logs (default: true)
    #[clap(
        long,
        default_value = "true",
        env,
        help = "Enable ANSI formatted logs"
    )]
    pub aliasd_ansi_logs: bool,

    /// Write logs to rotating files under `<root>/logs` instead of stdout (default: false)
    #[clap(
        long,
        default_value = "false",
        env,
        help = "Enable logging to file"
    )]
    pub aliasd_log_to_file: bool,

    /// Enable JSON logs (default: false)
    #[clap(
        long,
        default_value = "false",
        env,
        help = "Enable JSON formatted logs"
    )]
    pub aliasd_json_logs: bool,

    /// Maximum number of log files (default: 5)
    #[clap(
        long,
        default_value = "5",
        env,
        help = "Set the maximum number of server log files"
    )]
    pub aliasd_max_server_log_files: usize,

    #[clap(
        long,
        env,
        help = "Set the directory holding the aliasd database and logs",
        value_parser = ValueParser::new(|s: &str| {
            let path = PathBuf::from(s);
            if !path.is_absolute() {
                return Err("Path must be an absolute directory path".to_string());
            }
            if !path.exists() {
                return Err(format!("Path {:?} does not exist", path));
            }
            if !path.is_dir() {
                return Err(format!("Path {:?} is not a directory", path));
            }
            Ok(s.to_string())
        })
    )]
    pub aliasd_root_dir: String,

    #[clap(
        long,
        env,
        default_value = "134217728",
        help = "Set the cache size for the aliasd metadata database in bytes"
    )]
    pub aliasd_metadata_cache_size: Option<usize>,

    #[clap(
        long,
        default_value = "true",
        env,
        help = "Enable compression for the open api server"
    )]
    pub aliasd_http_compression_enabled: bool,

    #[clap(
        long,
        default_value = "168",
        env,
        help = "Lifetime of WebUI access tokens in hours"
    )]
    pub aliasd_webui_token_expiration_hours: u64,

    /// Storage quota in bytes applied to aliases whose domain has no own quota.
    #[clap(
        long,
        default_value_t = DEFAULT_MAX_QUOTA_PER_ALIAS,
        env,
        help = "Default maximum storage quota per alias in bytes"
    )]
    pub aliasd_max_quota_per_alias: u64,
}
