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

use std::sync::LazyLock;

use email_address::EmailAddress;
use poem_openapi::Object;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    modules::{
        alias::AliasModel,
        error::{code::ErrorCode, AliasdResult},
    },
    raise_error,
};

static LOCAL_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9](?:[a-z0-9._-]{0,62}[a-z0-9])?$").unwrap());

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct AliasCreateRequest {
    /// Local part of the address; the domain is taken from the path.
    pub name: String,
    pub has_imap: Option<bool>,
    pub locale: Option<String>,
}

impl AliasCreateRequest {
    pub fn validate(&self, domain_name: &str) -> AliasdResult<()> {
        let name = self.name.trim().to_lowercase();
        if !LOCAL_PART.is_match(&name)
            || name.contains("..")
            || !EmailAddress::is_valid(&format!("{}@{}", name, domain_name))
        {
            return Err(raise_error!(
                format!("'{}' is not a valid mailbox name.", self.name),
                ErrorCode::InvalidParameter
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct AliasSummary {
    pub id: String,
    pub email: String,
    pub domain_id: String,
    pub has_imap: bool,
    pub storage_used: u64,
    pub created_at: i64,
}

impl From<&AliasModel> for AliasSummary {
    fn from(alias: &AliasModel) -> Self {
        Self {
            id: alias.id.to_string(),
            email: alias.email.clone(),
            domain_id: alias.domain_id.to_string(),
            has_imap: alias.has_imap,
            storage_used: alias.storage_used,
            created_at: alias.created_at,
        }
    }
}

/// Returned once when a token is issued. Only a hash is kept server side.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct AliasTokenResponse {
    pub alias_id: String,
    pub email: String,
    pub token: String,
}
