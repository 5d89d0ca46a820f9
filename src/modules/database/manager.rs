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

use crate::modules::error::AliasdError;
use crate::modules::error::code::ErrorCode;
use crate::modules::settings::cli::SETTINGS;
use crate::modules::{database::META_MODELS, error::AliasdResult};
use crate::raise_error;
use native_db::{Builder, Database};
use std::path::PathBuf;
use std::sync::{Arc, LazyLock};
use tracing::info;

use super::persistence_error;

pub static DB_MANAGER: LazyLock<DatabaseManager> = LazyLock::new(DatabaseManager::new);

pub struct DatabaseManager {
    meta_db: Arc<Database<'static>>,
}

impl DatabaseManager {
    fn new() -> Self {
        let meta_db = Self::init_meta_database().expect("Failed to initialize metadata database");
        DatabaseManager { meta_db }
    }

    /// Get a reference to the metadata database
    pub fn meta_db(&self) -> &Arc<Database<'static>> {
        &self.meta_db
    }

    fn meta_db_path() -> PathBuf {
        PathBuf::from(&SETTINGS.aliasd_root_dir).join("meta.db")
    }

    fn init_meta_database() -> AliasdResult<Arc<Database<'static>>> {
        std::fs::create_dir_all(&SETTINGS.aliasd_root_dir)?;
        let path = Self::meta_db_path();
        info!("Initializing metadata database at: {:?}", &path);

        let database = Builder::new()
            .set_cache_size(
                SETTINGS
                    .aliasd_metadata_cache_size
                    .unwrap_or(134217728)
                    .max(67108864),
            ) //default 128MB
            .create(&META_MODELS, path)
            .map_err(Self::handle_database_error)?;

        let rw = database.rw_transaction().map_err(persistence_error)?;
        rw.commit().map_err(persistence_error)?;

        Ok(Arc::new(database))
    }

    fn handle_database_error(error: native_db::db_type::Error) -> AliasdError {
        raise_error!(
            format!("Failed to create database: {:?}", error),
            ErrorCode::PersistenceFailure
        )
    }
}
