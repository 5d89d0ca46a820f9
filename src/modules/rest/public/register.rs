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

use crate::modules::users::{payload::UserCreateRequest, LoginResult, UserModel};
use poem::{handler, http::StatusCode, web::Json, IntoResponse, Response, Result};

/// Registers a primary user and signs them in.
#[handler]
pub async fn register(payload: Json<UserCreateRequest>) -> Result<Response> {
    let (_, token) = UserModel::register(payload.0).await?;
    let result = LoginResult {
        success: true,
        error_message: None,
        access_token: Some(token),
    };
    Ok((StatusCode::CREATED, Json(result)).into_response())
}
