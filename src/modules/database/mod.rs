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

use crate::modules::alias::AliasModel;
use crate::modules::domain::DomainModel;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::{AliasdError, AliasdResult};
use crate::modules::token::AccessTokenModel;
use crate::modules::users::UserModel;
use crate::raise_error;
use db_type::{KeyOptions, ToKeyDefinition};
use itertools::Itertools;
use native_db::*;
use std::sync::{Arc, LazyLock};
use transaction::RwTransaction;

pub mod manager;

pub static META_MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut adapter = ModelsAdapter::new();
    adapter.register_metadata_models();
    adapter.models
});

pub struct ModelsAdapter {
    pub models: Models,
}

impl ModelsAdapter {
    pub fn new() -> Self {
        ModelsAdapter {
            models: Models::new(),
        }
    }

    pub fn register_model<T: ToInput>(&mut self) {
        self.models.define::<T>().expect("failed to define model ");
    }

    pub fn register_metadata_models(&mut self) {
        self.register_model::<UserModel>();
        self.register_model::<AccessTokenModel>();
        self.register_model::<DomainModel>();
        self.register_model::<AliasModel>();
    }
}

/// Every storage-layer failure surfaces as an opaque persistence error.
pub fn persistence_error<E: std::fmt::Debug>(error: E) -> AliasdError {
    raise_error!(format!("{:#?}", error), ErrorCode::PersistenceFailure)
}

pub async fn insert_impl<T: ToInput + Clone + Send + 'static>(
    database: &Arc<Database<'static>>,
    item: T,
) -> AliasdResult<()> {
    let db = database.clone();
    tokio::task::spawn_blocking(move || {
        let rw_transaction = db.rw_transaction().map_err(persistence_error)?;
        rw_transaction.insert(item).map_err(persistence_error)?;
        rw_transaction.commit().map_err(persistence_error)?;
        Ok(())
    })
    .await
    .map_err(persistence_error)?
}

/// Read-modify-write of a single record inside one rw transaction.
pub async fn update_impl<T: ToInput + Clone + std::fmt::Debug + Send + 'static>(
    database: &Arc<Database<'static>>,
    current: impl FnOnce(&RwTransaction) -> AliasdResult<T> + Send + 'static,
    updated: impl FnOnce(&T) -> AliasdResult<T> + Send + 'static,
) -> AliasdResult<T> {
    let db = database.clone();
    tokio::task::spawn_blocking(move || {
        let rw = db.rw_transaction().map_err(persistence_error)?;
        let current_item = current(&rw)?;
        let updated_item = updated(&current_item)?;
        rw.update(current_item, updated_item.clone())
            .map_err(persistence_error)?;
        rw.commit().map_err(persistence_error)?;
        Ok(updated_item)
    })
    .await
    .map_err(persistence_error)?
}

pub async fn async_find_impl<T: ToInput + Clone + Send + 'static>(
    database: &Arc<Database<'static>>,
    key: impl ToKey + Send + 'static,
) -> AliasdResult<Option<T>> {
    let db = database.clone();
    tokio::task::spawn_blocking(move || {
        let r_transaction = db.r_transaction().map_err(persistence_error)?;
        let entity: Option<T> = r_transaction
            .get()
            .primary(key)
            .map_err(persistence_error)?;
        Ok(entity)
    })
    .await
    .map_err(persistence_error)?
}

pub async fn with_transaction(
    database: &Arc<Database<'static>>,
    f: impl FnOnce(&RwTransaction) -> AliasdResult<()> + Send + 'static,
) -> AliasdResult<()> {
    let db: Arc<Database<'_>> = database.clone();
    tokio::task::spawn_blocking(move || {
        let rw_transaction = db.rw_transaction().map_err(persistence_error)?;
        f(&rw_transaction)?;
        rw_transaction.commit().map_err(persistence_error)?;
        Ok(())
    })
    .await
    .map_err(persistence_error)?
}

pub async fn filter_by_secondary_key_impl<T: ToInput + Clone + Send + 'static>(
    database: &Arc<Database<'static>>,
    key_def: impl ToKeyDefinition<KeyOptions> + Send + 'static,
    start_with: impl ToKey + Send + 'static,
) -> AliasdResult<Vec<T>> {
    let db = database.clone();
    tokio::task::spawn_blocking(move || {
        let r_transaction = db.r_transaction().map_err(persistence_error)?;
        let entities: Vec<T> = r_transaction
            .scan()
            .secondary(key_def)
            .map_err(persistence_error)?
            .start_with(start_with)
            .map_err(persistence_error)?
            .try_collect()
            .map_err(persistence_error)?;
        Ok(entities)
    })
    .await
    .map_err(persistence_error)?
}

pub async fn secondary_find_impl<T: ToInput + Clone + Send + 'static>(
    database: &Arc<Database<'static>>,
    key_def: impl ToKeyDefinition<KeyOptions> + Send + 'static,
    key: impl ToKey + Send + 'static,
) -> AliasdResult<Option<T>> {
    let db = database.clone();
    tokio::task::spawn_blocking(move || {
        let r_transaction = db.r_transaction().map_err(persistence_error)?;

        let entity: Option<T> = r_transaction
            .get()
            .secondary(key_def, key)
            .map_err(persistence_error)?;

        Ok(entity)
    })
    .await
    .map_err(persistence_error)?
}
