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

use crate::{
    generate_token, id,
    modules::{
        alias::{
            payload::{AliasCreateRequest, AliasTokenResponse},
            settings::{updater::SettingsPatch, AliasSettings},
            view::AccountPayload,
        },
        database::{
            async_find_impl, filter_by_secondary_key_impl, insert_impl, manager::DB_MANAGER,
            persistence_error, secondary_find_impl, update_impl,
        },
        domain::DomainModel,
        error::{code::ErrorCode, AliasdResult},
        settings::cli::SETTINGS,
        utils::encrypt::{hash_secret, verify_secret},
    },
    raise_error, utc_now,
};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub mod payload;
pub mod settings;
pub mod view;

#[cfg(test)]
mod tests;

/// A mailbox address under a domain. Carries the alias's own preferences.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[native_model(id = 30, version = 1)]
#[native_db]
pub struct AliasModel {
    #[primary_key]
    pub id: u64,
    /// Local part.
    pub name: String,
    /// `name@domain`, lowercased.
    #[secondary_key(unique)]
    pub email: String,
    #[secondary_key]
    pub domain_id: u64,
    /// Primary users administering this alias.
    pub user_ids: Vec<u64>,
    /// Bytes.
    pub storage_used: u64,
    pub has_imap: bool,
    pub has_pgp: bool,
    pub public_key: Option<String>,
    pub locale: Option<String>,
    /// PBKDF2 hash of the current alias token, if one was issued.
    pub token_hash: Option<String>,
    pub settings: AliasSettings,
    pub created_at: i64,
    pub updated_at: i64,
}

impl AliasModel {
    pub async fn find(alias_id: u64) -> AliasdResult<Option<AliasModel>> {
        async_find_impl(DB_MANAGER.meta_db(), alias_id).await
    }

    pub async fn get(alias_id: u64) -> AliasdResult<AliasModel> {
        Self::find(alias_id).await?.ok_or_else(|| {
            raise_error!(
                format!("Alias with id={} not found", alias_id),
                ErrorCode::ResourceNotFound
            )
        })
    }

    pub async fn find_by_email(email: &str) -> AliasdResult<Option<AliasModel>> {
        secondary_find_impl::<AliasModel>(
            DB_MANAGER.meta_db(),
            AliasModelKey::email,
            email.to_lowercase(),
        )
        .await
    }

    pub async fn list_by_domain(domain_id: u64) -> AliasdResult<Vec<AliasModel>> {
        filter_by_secondary_key_impl::<AliasModel>(
            DB_MANAGER.meta_db(),
            AliasModelKey::domain_id,
            domain_id,
        )
        .await
    }

    pub async fn create(
        owner_id: u64,
        domain: &DomainModel,
        request: AliasCreateRequest,
    ) -> AliasdResult<AliasModel> {
        request.validate(&domain.name)?;
        let name = request.name.trim().to_lowercase();
        let email = format!("{}@{}", name, domain.name);
        if Self::find_by_email(&email).await?.is_some() {
            return Err(raise_error!(
                format!("Alias '{}' already exists.", email),
                ErrorCode::AlreadyExists
            ));
        }

        let now = utc_now!();
        let alias = AliasModel {
            id: id!(63),
            name,
            email,
            domain_id: domain.id,
            user_ids: vec![owner_id],
            has_imap: request.has_imap.unwrap_or(false),
            locale: request.locale,
            created_at: now,
            updated_at: now,
            ..Default::default()
        };
        insert_impl(DB_MANAGER.meta_db(), alias.clone()).await?;
        info!("Alias '{}' created in domain {}", alias.email, domain.id);
        Ok(alias)
    }

    /// Applies a validated patch in a single read-modify-write.
    ///
    /// Concurrent updates are last-writer-wins per field. `updated_at` only moves when the
    /// stored settings actually change.
    pub async fn update_settings(alias_id: u64, patch: SettingsPatch) -> AliasdResult<AliasModel> {
        if patch.is_empty() {
            debug!("Empty settings update for alias {}", alias_id);
        }
        update_impl(
            DB_MANAGER.meta_db(),
            move |rw| {
                rw.get()
                    .primary::<AliasModel>(alias_id)
                    .map_err(persistence_error)?
                    .ok_or_else(|| {
                        raise_error!(
                            format!("Alias with id={} not found", alias_id),
                            ErrorCode::ResourceNotFound
                        )
                    })
            },
            move |current| {
                let mut updated = current.clone();
                patch.apply_to(&mut updated.settings);
                if updated.settings != current.settings {
                    updated.updated_at = utc_now!();
                }
                Ok(updated)
            },
        )
        .await
    }

    /// Issues a fresh alias token, invalidating the previous one.
    pub async fn issue_token(alias_id: u64) -> AliasdResult<AliasTokenResponse> {
        let token = generate_token!(256);
        let token_hash = hash_secret(&token)?;
        let alias = update_impl(
            DB_MANAGER.meta_db(),
            move |rw| {
                rw.get()
                    .primary::<AliasModel>(alias_id)
                    .map_err(persistence_error)?
                    .ok_or_else(|| {
                        raise_error!(
                            format!("Alias with id={} not found", alias_id),
                            ErrorCode::ResourceNotFound
                        )
                    })
            },
            move |current| {
                let mut updated = current.clone();
                updated.token_hash = Some(token_hash);
                updated.updated_at = utc_now!();
                Ok(updated)
            },
        )
        .await?;

        Ok(AliasTokenResponse {
            alias_id: alias.id.to_string(),
            email: alias.email,
            token,
        })
    }

    /// Verifies an alias address and token pair.
    pub async fn authenticate(email: &str, token: &str) -> AliasdResult<AliasModel> {
        let denied = || {
            raise_error!(
                "Permission denied: invalid alias credentials.".into(),
                ErrorCode::PermissionDenied
            )
        };
        let alias = Self::find_by_email(email).await?.ok_or_else(denied)?;
        match alias.token_hash.as_deref() {
            Some(hash) if verify_secret(token, hash) => Ok(alias),
            _ => {
                warn!("Alias login failed for '{}'.", alias.email);
                Err(denied())
            }
        }
    }

    pub async fn account_payload(&self) -> AliasdResult<AccountPayload> {
        let domain = DomainModel::get(self.domain_id).await?;
        Ok(AccountPayload::assemble(
            self,
            &domain,
            SETTINGS.aliasd_max_quota_per_alias,
        ))
    }
}
