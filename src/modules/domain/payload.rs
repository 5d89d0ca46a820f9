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

use poem_openapi::Object;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    modules::{
        domain::DomainModel,
        error::{code::ErrorCode, AliasdResult},
    },
    raise_error,
};

static DOMAIN_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63}$").unwrap()
});

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct DomainCreateRequest {
    /// Fully qualified domain name, e.g. `example.com`.
    pub name: String,
    /// Per-alias storage quota in bytes. Falls back to the server default when unset.
    pub max_quota_per_alias: Option<u64>,
}

impl DomainCreateRequest {
    pub fn validate(&self) -> AliasdResult<()> {
        let name = self.name.trim().to_lowercase();
        if name.len() > 253 || !DOMAIN_NAME.is_match(&name) {
            return Err(raise_error!(
                format!("'{}' is not a valid domain name.", self.name),
                ErrorCode::InvalidParameter
            ));
        }
        if self.max_quota_per_alias == Some(0) {
            return Err(raise_error!(
                "max_quota_per_alias must be greater than zero.".into(),
                ErrorCode::InvalidParameter
            ));
        }
        Ok(())
    }
}

/// Outbound domain shape. Ids are strings since they exceed the JSON safe-integer range.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct DomainSummary {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub max_quota_per_alias: Option<u64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&DomainModel> for DomainSummary {
    fn from(domain: &DomainModel) -> Self {
        Self {
            id: domain.id.to_string(),
            name: domain.name.clone(),
            owner_id: domain.owner_id.to_string(),
            max_quota_per_alias: domain.max_quota_per_alias,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_renders_ids_as_strings() {
        let domain = DomainModel {
            id: 9_007_199_254_740_993,
            name: "example.com".into(),
            owner_id: 42,
            ..Default::default()
        };
        let json = serde_json::to_value(DomainSummary::from(&domain)).unwrap();
        assert_eq!(json["id"], "9007199254740993");
        assert_eq!(json["owner_id"], "42");
        assert_eq!(json["max_quota_per_alias"], serde_json::Value::Null);
    }

    #[test]
    fn domain_names() {
        for name in ["example.com", "Mail.Example.org", "a-b.co"] {
            let request = DomainCreateRequest {
                name: name.into(),
                max_quota_per_alias: None,
            };
            assert!(request.validate().is_ok(), "{name}");
        }
        for name in ["localhost", "-bad.com", "spa ce.com", "example.c"] {
            let request = DomainCreateRequest {
                name: name.into(),
                max_quota_per_alias: None,
            };
            assert!(request.validate().is_err(), "{name}");
        }
    }

    #[test]
    fn zero_quota_is_rejected() {
        let request = DomainCreateRequest {
            name: "example.com".into(),
            max_quota_per_alias: Some(0),
        };
        assert!(request.validate().is_err());
    }
}
