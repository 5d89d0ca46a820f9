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

use crate::modules::alias::settings::validator::SettingsValidator;
use crate::modules::alias::AliasModel;
use crate::modules::common::actor::Actor;
use crate::modules::common::auth::ClientContext;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::AliasdResult;
use crate::modules::rest::api::ApiTags;
use crate::modules::rest::ApiResult;
use crate::modules::users::payload::UserUpdateRequest;
use crate::modules::users::view::UserView;
use crate::modules::users::UserModel;
use crate::raise_error;
use poem_openapi::payload::Json;
use poem_openapi::OpenApi;
use serde_json::Value;

pub struct AccountApi;

#[OpenApi(prefix_path = "/api/v1", tag = "ApiTags::Account")]
impl AccountApi {
    /// Get the calling account.
    ///
    /// A primary user receives its own user record. A delegated alias receives the
    /// alias payload: identity, quota and every settings field with defaults filled in.
    #[oai(path = "/account", method = "get", operation_id = "get_account")]
    async fn get_account(&self, context: ClientContext) -> ApiResult<Json<Value>> {
        let body = match context.actor()? {
            Actor::PrimaryUser(user) => user_json(&user.to_view())?,
            Actor::DelegatedAlias(identity) => AliasModel::get(identity.alias_id)
                .await?
                .account_payload()
                .await?
                .into_json(),
        };
        Ok(Json(body))
    }

    /// Partially update the calling account.
    ///
    /// For an alias the body is a settings patch: unknown keys are ignored and the first
    /// invalid field rejects the whole request. For a primary user the body may carry
    /// `email`, `password` and `display_name`.
    #[oai(path = "/account", method = "put", operation_id = "update_account")]
    async fn update_account(
        &self,
        payload: Json<Value>,
        context: ClientContext,
    ) -> ApiResult<Json<Value>> {
        let body = match context.actor()? {
            Actor::PrimaryUser(user) => {
                let request: UserUpdateRequest =
                    serde_json::from_value(payload.0).map_err(|e| {
                        raise_error!(
                            format!("Invalid account update: {}", e),
                            ErrorCode::InvalidBody
                        )
                    })?;
                user_json(&UserModel::update(user.id, request).await?.to_view())?
            }
            Actor::DelegatedAlias(identity) => {
                let patch = SettingsValidator::validate(&payload.0)?;
                AliasModel::update_settings(identity.alias_id, patch)
                    .await?
                    .account_payload()
                    .await?
                    .into_json()
            }
        };
        Ok(Json(body))
    }
}

fn user_json(view: &UserView) -> AliasdResult<Value> {
    serde_json::to_value(view)
        .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))
}
