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

use super::error::code::ErrorCode;
use super::error::handler::render;
use super::error::{AliasdError, ApiError};
use poem::error::ResponseError;
use poem::{http::StatusCode, Error, Response};

pub mod actor;
pub mod auth;
pub mod log;

#[inline]
fn create_aliasd_error(message: &str, code: ErrorCode) -> AliasdError {
    AliasdError::Generic {
        message: message.into(),
        location: snafu::Location::default(),
        code,
    }
}

#[inline]
pub fn create_api_error_response(message: &str, code: ErrorCode) -> Error {
    create_aliasd_error(message, code).into()
}

impl ResponseError for AliasdError {
    fn status(&self) -> StatusCode {
        self.code().status()
    }

    fn as_response(&self) -> Response
    where
        Self: std::error::Error + Send + Sync + 'static,
    {
        let code = self.code();
        if code.is_internal() {
            tracing::error!(error_code = code as u32, error = %self);
        } else {
            tracing::debug!(error_code = code as u32, error = %self);
        }
        render(
            self.status(),
            ApiError::for_code(self.to_string(), code, self.field().map(str::to_string)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poem_error_keeps_status_and_downcasts() {
        let error = create_api_error_response("Alias session is missing", ErrorCode::AuthRequired);
        assert_eq!(error.status(), StatusCode::UNAUTHORIZED);
        let inner = error.downcast_ref::<AliasdError>().unwrap();
        assert_eq!(inner.code(), ErrorCode::AuthRequired);
    }
}
