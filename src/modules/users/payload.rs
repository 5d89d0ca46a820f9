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
    modules::error::{code::ErrorCode, AliasdResult},
    raise_error,
};
use email_address::EmailAddress;
use poem_openapi::Object;
use serde::{Deserialize, Serialize};

const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 256;
const MAX_DISPLAY_NAME_LEN: usize = 128;

pub(crate) fn validate_email(email: &str) -> AliasdResult<()> {
    if !EmailAddress::is_valid(email) {
        return Err(raise_error!(
            format!("'{}' is not a valid email address.", email),
            ErrorCode::InvalidParameter
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> AliasdResult<()> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(raise_error!(
            format!(
                "Password must be at least {} characters long.",
                MIN_PASSWORD_LEN
            ),
            ErrorCode::InvalidParameter
        ));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(raise_error!(
            format!("Password cannot exceed {} characters.", MAX_PASSWORD_LEN),
            ErrorCode::InvalidParameter
        ));
    }
    Ok(())
}

fn validate_display_name(display_name: &Option<String>) -> AliasdResult<()> {
    if let Some(name) = display_name {
        if name.chars().count() > MAX_DISPLAY_NAME_LEN {
            return Err(raise_error!(
                format!(
                    "Display name cannot exceed {} characters.",
                    MAX_DISPLAY_NAME_LEN
                ),
                ErrorCode::InvalidParameter
            ));
        }
    }
    Ok(())
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct UserCreateRequest {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

impl UserCreateRequest {
    pub fn validate(&self) -> AliasdResult<()> {
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        validate_display_name(&self.display_name)
    }
}

/// Identity changes a primary user may make to their own account.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct UserUpdateRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub display_name: Option<String>,
}

impl UserUpdateRequest {
    pub fn validate(&self) -> AliasdResult<()> {
        if self.email.is_none() && self.password.is_none() && self.display_name.is_none() {
            return Err(raise_error!(
                "Update request must contain at least one of email, password or display_name."
                    .into(),
                ErrorCode::InvalidParameter
            ));
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(password) = &self.password {
            validate_password(password)?;
        }
        validate_display_name(&self.display_name)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_rules() {
        let ok = UserCreateRequest {
            email: "owner@example.com".into(),
            password: "correct horse".into(),
            display_name: None,
        };
        assert!(ok.validate().is_ok());

        let bad_email = UserCreateRequest {
            email: "owner.example.com".into(),
            ..ok.clone()
        };
        assert_eq!(
            bad_email.validate().unwrap_err().code(),
            ErrorCode::InvalidParameter
        );

        let short = UserCreateRequest {
            password: "short".into(),
            ..ok
        };
        assert!(short.validate().is_err());
    }

    #[test]
    fn empty_update_is_rejected() {
        assert!(UserUpdateRequest::default().validate().is_err());
        let rename = UserUpdateRequest {
            display_name: Some("Owner".into()),
            ..Default::default()
        };
        assert!(rename.validate().is_ok());
    }
}
