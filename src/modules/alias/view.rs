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

use serde_json::{Map, Value};

use crate::modules::{
    alias::{settings::registry::SETTINGS_FIELDS, AliasModel},
    domain::DomainModel,
};

/// The flat representation served to a delegated alias.
///
/// Identity and mailbox state come from the alias record, the quota from its domain and
/// every registered settings field is present, stored value first, default otherwise.
#[derive(Clone, Debug, PartialEq)]
pub struct AccountPayload(Map<String, Value>);

impl AccountPayload {
    pub fn assemble(alias: &AliasModel, domain: &DomainModel, default_quota: u64) -> Self {
        let mut fields = Map::new();
        fields.insert("id".into(), Value::from(alias.id.to_string()));
        fields.insert("name".into(), Value::from(alias.name.clone()));
        fields.insert(
            "email".into(),
            Value::from(format!("{}@{}", alias.name, domain.name)),
        );
        fields.insert("domain_id".into(), Value::from(domain.id.to_string()));
        fields.insert("domain_name".into(), Value::from(domain.name.clone()));
        fields.insert(
            "user_ids".into(),
            Value::from(
                alias
                    .user_ids
                    .iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>(),
            ),
        );
        fields.insert("storage_used".into(), Value::from(alias.storage_used));
        fields.insert(
            "max_quota".into(),
            Value::from(domain.effective_quota(default_quota)),
        );
        fields.insert("has_imap".into(), Value::from(alias.has_imap));
        fields.insert("has_pgp".into(), Value::from(alias.has_pgp));
        fields.insert("public_key".into(), Value::from(alias.public_key.clone()));
        fields.insert("locale".into(), Value::from(alias.locale.clone()));
        fields.insert("created_at".into(), Value::from(alias.created_at));
        fields.insert("updated_at".into(), Value::from(alias.updated_at));

        for field in SETTINGS_FIELDS {
            fields.insert(field.name.to_string(), field.resolve(&alias.settings));
        }
        Self(fields)
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn into_json(self) -> Value {
        Value::Object(self.0)
    }
}
