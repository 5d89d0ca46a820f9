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

use std::{path::PathBuf, sync::OnceLock};

use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling::{Builder, Rotation},
};
use tracing_subscriber::EnvFilter;

use crate::modules::settings::cli::SETTINGS;

/// Keeps the non-blocking file writer flushing until the process exits.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

pub fn initialize_logging() {
    let filter = EnvFilter::try_new(&SETTINGS.aliasd_log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(SETTINGS.aliasd_ansi_logs && !SETTINGS.aliasd_log_to_file);

    let file_writer = if SETTINGS.aliasd_log_to_file {
        file_writer()
    } else {
        None
    };

    match (file_writer, SETTINGS.aliasd_json_logs) {
        (Some(writer), true) => builder.json().with_writer(writer).init(),
        (Some(writer), false) => builder.with_writer(writer).init(),
        (None, true) => builder.json().init(),
        (None, false) => builder.init(),
    }
}

fn file_writer() -> Option<NonBlocking> {
    let log_dir = PathBuf::from(&SETTINGS.aliasd_root_dir).join("logs");
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Failed to create log directory {:?}: {}", log_dir, e);
        return None;
    }

    let appender = Builder::new()
        .rotation(Rotation::DAILY)
        .filename_prefix("aliasd")
        .filename_suffix("log")
        .max_log_files(SETTINGS.aliasd_max_server_log_files.max(1))
        .build(&log_dir);

    match appender {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(writer)
        }
        Err(e) => {
            eprintln!("Failed to initialize file logging, falling back to stdout: {}", e);
            None
        }
    }
}
