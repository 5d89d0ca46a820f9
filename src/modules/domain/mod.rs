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
    id,
    modules::{
        database::{
            async_find_impl, filter_by_secondary_key_impl, insert_impl, manager::DB_MANAGER,
            secondary_find_impl,
        },
        domain::payload::DomainCreateRequest,
        error::{code::ErrorCode, AliasdResult},
        settings::cli::SETTINGS,
    },
    raise_error, utc_now,
};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};
use tracing::info;

pub mod payload;

/// A mail domain owned by a primary user.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[native_model(id = 20, version = 1)]
#[native_db]
pub struct DomainModel {
    #[primary_key]
    pub id: u64,
    #[secondary_key(unique)]
    pub name: String,
    #[secondary_key]
    pub owner_id: u64,
    pub max_quota_per_alias: Option<u64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl DomainModel {
    /// The per-alias quota in bytes, falling back to the configured default.
    pub fn effective_quota(&self, default_quota: u64) -> u64 {
        self.max_quota_per_alias.unwrap_or(default_quota)
    }

    pub async fn find(domain_id: u64) -> AliasdResult<Option<DomainModel>> {
        async_find_impl(DB_MANAGER.meta_db(), domain_id).await
    }

    pub async fn get(domain_id: u64) -> AliasdResult<DomainModel> {
        Self::find(domain_id).await?.ok_or_else(|| {
            raise_error!(
                format!("Domain with id={} not found", domain_id),
                ErrorCode::ResourceNotFound
            )
        })
    }

    pub async fn find_by_name(name: &str) -> AliasdResult<Option<DomainModel>> {
        secondary_find_impl::<DomainModel>(
            DB_MANAGER.meta_db(),
            DomainModelKey::name,
            name.to_lowercase(),
        )
        .await
    }

    pub async fn list_owned(owner_id: u64) -> AliasdResult<Vec<DomainModel>> {
        filter_by_secondary_key_impl::<DomainModel>(
            DB_MANAGER.meta_db(),
            DomainModelKey::owner_id,
            owner_id,
        )
        .await
    }

    /// Loads a domain and checks that `user_id` owns it.
    ///
    /// A domain owned by someone else is reported as missing.
    pub async fn require_owner(domain_id: u64, user_id: u64) -> AliasdResult<DomainModel> {
        let domain = Self::get(domain_id).await?;
        if domain.owner_id != user_id {
            return Err(raise_error!(
                format!("Domain with id={} not found", domain_id),
                ErrorCode::ResourceNotFound
            ));
        }
        Ok(domain)
    }

    pub async fn create(owner_id: u64, request: DomainCreateRequest) -> AliasdResult<DomainModel> {
        request.validate()?;
        let name = request.name.trim().to_lowercase();
        if Self::find_by_name(&name).await?.is_some() {
            return Err(raise_error!(
                format!("Domain '{}' is already registered.", name),
                ErrorCode::AlreadyExists
            ));
        }

        let now = utc_now!();
        let domain = DomainModel {
            id: id!(63),
            name,
            owner_id,
            max_quota_per_alias: request.max_quota_per_alias,
            created_at: now,
            updated_at: now,
        };
        insert_impl(DB_MANAGER.meta_db(), domain.clone()).await?;
        info!(
            "Domain '{}' created for user {} (quota per alias: {})",
            domain.name,
            owner_id,
            domain.effective_quota(SETTINGS.aliasd_max_quota_per_alias)
        );
        Ok(domain)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::modules::users::tests::registered_user;

    pub(crate) async fn owned_domain(owner_id: u64, quota: Option<u64>) -> DomainModel {
        DomainModel::create(
            owner_id,
            DomainCreateRequest {
                name: format!("d{}.example.com", id!(40)),
                max_quota_per_alias: quota,
            },
        )
        .await
        .unwrap()
    }

    #[test]
    fn quota_falls_back_to_default() {
        let mut domain = DomainModel::default();
        assert_eq!(domain.effective_quota(1024), 1024);
        domain.max_quota_per_alias = Some(10);
        assert_eq!(domain.effective_quota(1024), 10);
    }

    #[tokio::test]
    async fn create_list_and_ownership() {
        let (owner, _) = registered_user().await;
        let (stranger, _) = registered_user().await;
        let domain = owned_domain(owner.id, Some(2048)).await;

        let owned = DomainModel::list_owned(owner.id).await.unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].id, domain.id);

        assert!(DomainModel::require_owner(domain.id, owner.id).await.is_ok());
        let error = DomainModel::require_owner(domain.id, stranger.id)
            .await
            .unwrap_err();
        assert_eq!(error.code(), ErrorCode::ResourceNotFound);

        let duplicate = DomainModel::create(
            stranger.id,
            DomainCreateRequest {
                name: domain.name.to_uppercase(),
                max_quota_per_alias: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(duplicate.code(), ErrorCode::AlreadyExists);
    }
}
