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

use poem::{Body, Error, IntoResponse, Response};
use tracing::error;

use crate::modules::error::{code::ErrorCode, ApiError, AliasdError};

/// Renders any error that escaped the OpenAPI layer in the same JSON shape as API errors.
pub async fn error_handler(err: Error) -> Response {
    if let Some(aliasd_error) = err.downcast_ref::<AliasdError>() {
        let code = aliasd_error.code();
        return render(
            code.status(),
            ApiError::for_code(
                aliasd_error.to_string(),
                code,
                aliasd_error.field().map(str::to_string),
            ),
        );
    }

    let status = err.status();
    let code = if status == http::StatusCode::METHOD_NOT_ALLOWED {
        ErrorCode::MethodNotAllowed
    } else if status == http::StatusCode::NOT_FOUND {
        ErrorCode::ResourceNotFound
    } else if status.is_client_error() {
        ErrorCode::InvalidParameter
    } else {
        error!("Unhandled poem error: {:?}", err);
        ErrorCode::UnhandledPoemError
    };
    render(status, ApiError::for_code(err.to_string(), code, None))
}

pub(crate) fn render(status: http::StatusCode, body: ApiError) -> Response {
    match Body::from_json(serde_json::json!({
        "code": body.code,
        "message": body.message,
        "field": body.field,
    })) {
        Ok(body) => Response::builder().status(status).body(body),
        Err(_) => status.into_response(),
    }
}
