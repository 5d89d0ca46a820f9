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

use poem::http::StatusCode;
use poem_openapi::Enum;

#[derive(Copy, Clone, Debug, Enum, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCode {
    // Client-side errors (10000–10999)
    InvalidParameter = 10000,
    InvalidBody = 10010,
    InvalidType = 10020,
    InvalidEnum = 10030,
    InvalidLabelKeyword = 10040,
    InvalidLabelColor = 10041,
    InvalidLabelValue = 10042,
    FieldLengthExceeded = 10050,
    MethodNotAllowed = 10090,

    // Authentication and authorization errors (20000–20999)
    PermissionDenied = 20000,
    AuthRequired = 20010,
    InvalidAliasId = 20020,
    Forbidden = 20030,

    // Resource errors (30000–30999)
    ResourceNotFound = 30000,
    AlreadyExists = 30010,

    // Internal system errors (70000–70999)
    InternalError = 70000,
    UnhandledPoemError = 70010,
    IoError = 70020,
    PersistenceFailure = 70030,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidParameter
            | ErrorCode::InvalidBody
            | ErrorCode::InvalidType
            | ErrorCode::InvalidEnum
            | ErrorCode::InvalidLabelKeyword
            | ErrorCode::InvalidLabelColor
            | ErrorCode::InvalidLabelValue
            | ErrorCode::FieldLengthExceeded => StatusCode::BAD_REQUEST,
            ErrorCode::PermissionDenied | ErrorCode::AuthRequired | ErrorCode::InvalidAliasId => {
                StatusCode::UNAUTHORIZED
            }
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::ResourceNotFound => StatusCode::NOT_FOUND,
            ErrorCode::AlreadyExists => StatusCode::CONFLICT,
            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::InternalError
            | ErrorCode::UnhandledPoemError
            | ErrorCode::IoError
            | ErrorCode::PersistenceFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Server-side failures never expose their detail to the caller.
    pub fn is_internal(&self) -> bool {
        self.status().is_server_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_codes_are_client_errors() {
        for code in [
            ErrorCode::InvalidBody,
            ErrorCode::InvalidType,
            ErrorCode::InvalidEnum,
            ErrorCode::InvalidLabelKeyword,
            ErrorCode::InvalidLabelColor,
            ErrorCode::InvalidLabelValue,
            ErrorCode::FieldLengthExceeded,
        ] {
            assert_eq!(code.status(), StatusCode::BAD_REQUEST);
            assert!(!code.is_internal());
        }
    }

    #[test]
    fn alias_identity_failures_are_unauthorized() {
        assert_eq!(ErrorCode::AuthRequired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::InvalidAliasId.status(), StatusCode::UNAUTHORIZED);
        assert!(ErrorCode::PersistenceFailure.is_internal());
    }
}
