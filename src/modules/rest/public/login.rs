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

use crate::modules::users::{payload::LoginRequest, UserModel};
use poem::{handler, http::StatusCode, web::Json, IntoResponse, Response};
use tracing::error;

/// Login endpoint
///
/// Exchanges an email and password for a fresh WebUI access token.
#[handler]
pub async fn login(payload: Json<LoginRequest>) -> Response {
    match UserModel::authenticate(payload.0).await {
        Ok(result) => {
            let status = if result.success {
                StatusCode::OK
            } else {
                StatusCode::UNAUTHORIZED
            };
            (status, Json(result)).into_response()
        }
        Err(e) => {
            error!("Authentication failed with system error: {:?}", e);
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body("Authentication system failed.".to_string())
        }
    }
}
