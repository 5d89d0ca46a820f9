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
            async_find_impl, manager::DB_MANAGER, persistence_error, secondary_find_impl,
            update_impl, with_transaction,
        },
        error::{code::ErrorCode, AliasdResult},
        token::AccessTokenModel,
        users::{
            payload::{LoginRequest, UserCreateRequest, UserUpdateRequest},
            view::UserView,
        },
        utils::encrypt::{hash_secret, verify_secret},
    },
    raise_error, utc_now,
};
use native_db::*;
use native_model::{native_model, Model};
use poem_openapi::Object;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub mod payload;
pub mod view;

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize, Object)]
pub struct LoginResult {
    pub success: bool,
    pub error_message: Option<String>,
    pub access_token: Option<String>,
}

impl LoginResult {
    fn granted(token: String) -> Self {
        Self {
            success: true,
            error_message: None,
            access_token: Some(token),
        }
    }

    fn denied(message: &str) -> Self {
        Self {
            success: false,
            error_message: Some(message.to_string()),
            access_token: None,
        }
    }
}

/// A primary account owner. Owns domains and administers their aliases.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[native_model(id = 10, version = 1)]
#[native_db]
pub struct UserModel {
    #[primary_key]
    pub id: u64,
    #[secondary_key(unique)]
    pub email: String,
    /// PBKDF2 hash, see [`hash_secret`].
    pub password: String,
    pub display_name: Option<String>,
    pub email_verified: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl UserModel {
    pub fn to_view(&self) -> UserView {
        UserView {
            id: self.id.to_string(),
            email: self.email.clone(),
            email_verified: self.email_verified,
            display_name: self.display_name.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub async fn find(user_id: u64) -> AliasdResult<Option<UserModel>> {
        async_find_impl(DB_MANAGER.meta_db(), user_id).await
    }

    pub async fn get(user_id: u64) -> AliasdResult<UserModel> {
        Self::find(user_id).await?.ok_or_else(|| {
            raise_error!(
                format!("User with id={} not found", user_id),
                ErrorCode::ResourceNotFound
            )
        })
    }

    pub async fn find_by_email(email: &str) -> AliasdResult<Option<UserModel>> {
        secondary_find_impl::<UserModel>(
            DB_MANAGER.meta_db(),
            UserModelKey::email,
            email.to_lowercase(),
        )
        .await
    }

    pub async fn check_email_conflict(email: &str, except: Option<u64>) -> AliasdResult<()> {
        if let Some(existing) = Self::find_by_email(email).await? {
            if Some(existing.id) != except {
                return Err(raise_error!(
                    format!("Email '{}' is already registered.", email),
                    ErrorCode::AlreadyExists
                ));
            }
        }
        Ok(())
    }

    /// Creates a primary user and its first WebUI token in one transaction.
    pub async fn register(request: UserCreateRequest) -> AliasdResult<(UserModel, String)> {
        request.validate()?;
        let email = request.email.to_lowercase();
        Self::check_email_conflict(&email, None).await?;

        let now = utc_now!();
        let user = UserModel {
            id: id!(63),
            email,
            password: hash_secret(&request.password)?,
            display_name: request.display_name,
            email_verified: false,
            created_at: now,
            updated_at: now,
        };
        let token = AccessTokenModel::new_webui_token(user.id);
        let token_value = token.token.clone();

        let inserted = user.clone();
        with_transaction(DB_MANAGER.meta_db(), move |rw| {
            rw.insert(inserted).map_err(persistence_error)?;
            rw.insert(token).map_err(persistence_error)?;
            Ok(())
        })
        .await?;

        info!("Registered primary user {} ({})", user.id, user.email);
        Ok((user, token_value))
    }

    pub async fn authenticate(request: LoginRequest) -> AliasdResult<LoginResult> {
        let Some(user) = Self::find_by_email(&request.email).await? else {
            return Ok(LoginResult::denied("User or email not found."));
        };

        if !verify_secret(&request.password, &user.password) {
            warn!("Login failed: incorrect password for user '{}'.", user.email);
            return Ok(LoginResult::denied("Incorrect password."));
        }

        let token = AccessTokenModel::reset_webui_token(user.id).await?;
        Ok(LoginResult::granted(token))
    }

    /// Applies identity changes. Changing the email clears `email_verified`;
    /// changing the password rotates the WebUI token.
    pub async fn update(id: u64, request: UserUpdateRequest) -> AliasdResult<UserModel> {
        request.validate()?;
        let password_changed = request.password.is_some();

        let email = request.email.map(|email| email.to_lowercase());
        if let Some(email) = &email {
            Self::check_email_conflict(email, Some(id)).await?;
        }
        let password = request.password.as_deref().map(hash_secret).transpose()?;
        let display_name = request.display_name;

        let updated = update_impl(
            DB_MANAGER.meta_db(),
            move |rw| {
                rw.get()
                    .primary::<UserModel>(id)
                    .map_err(persistence_error)?
                    .ok_or_else(|| {
                        raise_error!(
                            format!("User with id={} not found", id),
                            ErrorCode::ResourceNotFound
                        )
                    })
            },
            move |current| {
                let mut updated = current.clone();
                if let Some(email) = email {
                    if email != updated.email {
                        updated.email = email;
                        updated.email_verified = false;
                    }
                }
                if let Some(password) = password {
                    updated.password = password;
                }
                if let Some(display_name) = display_name {
                    updated.display_name = Some(display_name);
                }
                updated.updated_at = utc_now!();
                Ok(updated)
            },
        )
        .await?;

        if password_changed {
            AccessTokenModel::reset_webui_token(id).await?;
        }
        Ok(updated)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) async fn registered_user() -> (UserModel, String) {
        let email = format!("owner-{}@example.com", id!(40));
        UserModel::register(UserCreateRequest {
            email,
            password: "correct horse battery".into(),
            display_name: Some("Owner".into()),
        })
        .await
        .unwrap()
    }

    #[test]
    fn view_uses_string_id_and_omits_password() {
        let user = UserModel {
            id: 9_007_199_254_740_993,
            email: "owner@example.com".into(),
            password: "pbkdf2-hash".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(user.to_view()).unwrap();
        assert_eq!(json["id"], "9007199254740993");
        assert!(json.get("password").is_none());
    }

    #[tokio::test]
    async fn register_then_login() {
        let (user, token) = registered_user().await;
        assert!(!token.is_empty());
        assert!(!user.email_verified);
        assert_ne!(user.password, "correct horse battery");

        let denied = UserModel::authenticate(LoginRequest {
            email: user.email.clone(),
            password: "wrong password".into(),
        })
        .await
        .unwrap();
        assert!(!denied.success);

        let granted = UserModel::authenticate(LoginRequest {
            email: user.email.clone(),
            password: "correct horse battery".into(),
        })
        .await
        .unwrap();
        assert!(granted.success);
        let resolved = AccessTokenModel::resolve_user_from_token(&granted.access_token.unwrap())
            .await
            .unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let (user, _) = registered_user().await;
        let error = UserModel::register(UserCreateRequest {
            email: user.email.to_uppercase(),
            password: "another password".into(),
            display_name: None,
        })
        .await
        .unwrap_err();
        assert_eq!(error.code(), ErrorCode::AlreadyExists);
    }

    #[tokio::test]
    async fn email_change_clears_verification() {
        let (user, _) = registered_user().await;
        let user_id = user.id;
        update_impl(
            DB_MANAGER.meta_db(),
            move |rw| {
                rw.get()
                    .primary::<UserModel>(user_id)
                    .map_err(persistence_error)?
                    .ok_or_else(|| raise_error!("missing".into(), ErrorCode::ResourceNotFound))
            },
            |current| {
                let mut verified = current.clone();
                verified.email_verified = true;
                Ok(verified)
            },
        )
        .await
        .unwrap();

        let renamed = UserModel::update(
            user.id,
            UserUpdateRequest {
                display_name: Some("Renamed".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(renamed.email_verified);

        let new_email = format!("moved-{}@example.com", id!(40));
        let moved = UserModel::update(
            user.id,
            UserUpdateRequest {
                email: Some(new_email.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(moved.email, new_email);
        assert!(!moved.email_verified);
        assert!(UserModel::find_by_email(&user.email).await.unwrap().is_none());
    }
}
