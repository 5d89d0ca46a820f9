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

use crate::modules::database::manager::DB_MANAGER;
use crate::modules::database::{
    async_find_impl, filter_by_secondary_key_impl, insert_impl, persistence_error, update_impl,
    with_transaction,
};
use crate::modules::error::code::ErrorCode;
use crate::modules::error::AliasdResult;
use crate::modules::settings::cli::SETTINGS;
use crate::modules::users::UserModel;
use crate::{generate_token, raise_error, utc_now};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

/// A bearer token issued to a primary user at login or registration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[native_model(id = 11, version = 1)]
#[native_db]
pub struct AccessTokenModel {
    /// The ID of the user who owns this token
    #[secondary_key]
    pub user_id: u64,
    /// The unique token string used for authentication
    #[primary_key]
    pub token: String,
    pub name: Option<String>,
    /// Milliseconds since epoch.
    pub created_at: i64,
    pub updated_at: i64,
    /// Hard expiry. When `None` the token lives for the configured WebUI lifetime.
    pub expire_at: Option<i64>,
    pub last_access_at: i64,
}

impl AccessTokenModel {
    pub fn new_webui_token(user_id: u64) -> AccessTokenModel {
        let now = utc_now!();
        AccessTokenModel {
            token: generate_token!(128),
            created_at: now,
            updated_at: now,
            last_access_at: Default::default(),
            name: Some("WebUI".into()),
            user_id,
            expire_at: None,
        }
    }

    fn is_expired(&self, now: i64) -> bool {
        match self.expire_at {
            Some(expire_at) => now > expire_at,
            None => {
                now.saturating_sub(self.created_at)
                    > lifetime_millis(SETTINGS.aliasd_webui_token_expiration_hours)
            }
        }
    }

    /// Replaces every token the user holds with a fresh one.
    pub async fn reset_webui_token(user_id: u64) -> AliasdResult<String> {
        let old_tokens = Self::list_user_tokens(user_id).await?;
        let new_token = Self::new_webui_token(user_id);
        let new_token_str = new_token.token.clone();

        if old_tokens.is_empty() {
            insert_impl(DB_MANAGER.meta_db(), new_token).await?;
        } else {
            with_transaction(DB_MANAGER.meta_db(), move |rw| {
                for old in old_tokens {
                    rw.remove(old).map_err(persistence_error)?;
                }
                rw.insert(new_token).map_err(persistence_error)?;
                Ok(())
            })
            .await?;
        }

        Ok(new_token_str)
    }

    pub async fn list_user_tokens(user_id: u64) -> AliasdResult<Vec<AccessTokenModel>> {
        filter_by_secondary_key_impl::<AccessTokenModel>(
            DB_MANAGER.meta_db(),
            AccessTokenModelKey::user_id,
            user_id,
        )
        .await
    }

    pub async fn resolve_user_from_token(token: &str) -> AliasdResult<UserModel> {
        let token = async_find_impl::<AccessTokenModel>(DB_MANAGER.meta_db(), token.to_string())
            .await?
            .ok_or_else(|| {
                raise_error!(
                    "Permission denied: no valid access token provided.".into(),
                    ErrorCode::PermissionDenied
                )
            })?;

        if token.is_expired(utc_now!()) {
            return Err(raise_error!(
                "Permission denied: the access token has expired.".into(),
                ErrorCode::PermissionDenied
            ));
        }

        let key = token.token.clone();
        update_impl(
            DB_MANAGER.meta_db(),
            move |rw| {
                rw.get()
                    .primary::<AccessTokenModel>(key)
                    .map_err(persistence_error)?
                    .ok_or_else(|| {
                        raise_error!(
                            "The access token does not exist or has been reset.".into(),
                            ErrorCode::PermissionDenied
                        )
                    })
            },
            |current| {
                let mut updated = current.clone();
                updated.last_access_at = utc_now!();
                Ok(updated)
            },
        )
        .await?;

        UserModel::find(token.user_id).await?.ok_or_else(|| {
            raise_error!(
                "The user associated with this access token does not exist or may have been deleted."
                    .into(),
                ErrorCode::PermissionDenied
            )
        })
    }
}

/// Token lifetime in milliseconds, saturating for oversized configured values.
fn lifetime_millis(hours: u64) -> i64 {
    i64::try_from(hours)
        .unwrap_or(i64::MAX)
        .saturating_mul(MILLIS_PER_HOUR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::users::tests::registered_user;

    #[test]
    fn expiry_rules() {
        let now = utc_now!();
        let mut token = AccessTokenModel::new_webui_token(1);
        assert!(!token.is_expired(now));

        token.created_at =
            now - lifetime_millis(SETTINGS.aliasd_webui_token_expiration_hours) - MILLIS_PER_HOUR;
        assert!(token.is_expired(now));

        token.expire_at = Some(now + MILLIS_PER_HOUR);
        assert!(!token.is_expired(now));
        token.expire_at = Some(now - 1);
        assert!(token.is_expired(now));
    }

    #[test]
    fn huge_lifetime_saturates() {
        assert_eq!(lifetime_millis(2), 2 * MILLIS_PER_HOUR);
        assert_eq!(lifetime_millis(u64::MAX), i64::MAX);
        assert_eq!(lifetime_millis(i64::MAX as u64), i64::MAX);
    }

    #[tokio::test]
    async fn reset_invalidates_previous_token() {
        let (user, first) = registered_user().await;
        let second = AccessTokenModel::reset_webui_token(user.id).await.unwrap();
        assert_ne!(first, second);

        let error = AccessTokenModel::resolve_user_from_token(&first)
            .await
            .unwrap_err();
        assert_eq!(error.code(), ErrorCode::PermissionDenied);
        assert_eq!(
            AccessTokenModel::resolve_user_from_token(&second)
                .await
                .unwrap()
                .id,
            user.id
        );
        assert_eq!(
            AccessTokenModel::list_user_tokens(user.id).await.unwrap().len(),
            1
        );
    }
}
