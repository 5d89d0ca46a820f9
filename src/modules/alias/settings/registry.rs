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

use serde_json::{json, Map, Value};

use crate::modules::alias::settings::{
    labels::validate_labels,
    validator::{
        boolean, integer_choice, json_object, nullable_string, one_of, saved_searches,
        shortcut_map, string_list, FieldResult,
    },
    AliasDefaults, AliasSettings, LayoutMode, PrefetchMode, SettingValue, Theme,
    DEFAULT_MESSAGES_PER_PAGE, DEFAULT_PREFETCH_ENABLED, MESSAGES_PER_PAGE_CHOICES,
};

/// One user-editable settings field.
///
/// `parse` validates and sanitizes an inbound value, `stored` reads the persisted value
/// (if any) back as JSON and `default` is what the account payload shows otherwise.
pub struct SettingsField {
    pub name: &'static str,
    pub parse: fn(&Value) -> FieldResult<SettingValue>,
    pub stored: fn(&AliasSettings) -> Option<Value>,
    pub default: fn() -> Value,
}

impl SettingsField {
    pub fn resolve(&self, settings: &AliasSettings) -> Value {
        (self.stored)(settings).unwrap_or_else(self.default)
    }
}

impl std::fmt::Debug for SettingsField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsField")
            .field("name", &self.name)
            .finish()
    }
}

#[cfg(test)]
pub fn lookup(name: &str) -> Option<&'static SettingsField> {
    SETTINGS_FIELDS.iter().find(|field| field.name == name)
}

pub static SETTINGS_FIELDS: &[SettingsField] = &[
    SettingsField {
        name: "appearance_theme",
        parse: |v| one_of(v, &Theme::ALL, Theme::as_str).map(SettingValue::AppearanceTheme),
        stored: |s| s.appearance_theme.map(|t| json!(t.as_str())),
        default: || json!(Theme::default().as_str()),
    },
    SettingsField {
        name: "appearance_layout_mode",
        parse: |v| {
            one_of(v, &LayoutMode::ALL, LayoutMode::as_str).map(SettingValue::AppearanceLayoutMode)
        },
        stored: |s| s.appearance_layout_mode.map(|m| json!(m.as_str())),
        default: || json!(LayoutMode::default().as_str()),
    },
    SettingsField {
        name: "compose_plain_default",
        parse: |v| boolean(v).map(SettingValue::ComposePlainDefault),
        stored: |s| s.compose_plain_default.map(Value::from),
        default: || json!(false),
    },
    SettingsField {
        name: "mail_messages_per_page",
        parse: |v| {
            integer_choice(v, &MESSAGES_PER_PAGE_CHOICES).map(SettingValue::MailMessagesPerPage)
        },
        stored: |s| s.mail_messages_per_page.map(Value::from),
        default: || json!(DEFAULT_MESSAGES_PER_PAGE),
    },
    SettingsField {
        name: "mail_archive_folder",
        parse: |v| nullable_string(v).map(SettingValue::MailArchiveFolder),
        stored: |s| s.mail_archive_folder.clone().map(Value::from),
        default: || Value::Null,
    },
    SettingsField {
        name: "search_body_indexing",
        parse: |v| boolean(v).map(SettingValue::SearchBodyIndexing),
        stored: |s| s.search_body_indexing.map(Value::from),
        default: || json!(false),
    },
    SettingsField {
        name: "search_saved_searches",
        parse: |v| saved_searches(v).map(SettingValue::SearchSavedSearches),
        stored: |s| {
            s.search_saved_searches
                .as_ref()
                .map(|list| Value::Array(list.iter().map(|search| search.to_json()).collect()))
        },
        default: || json!([]),
    },
    SettingsField {
        name: "prefetch_enabled",
        parse: |v| boolean(v).map(SettingValue::PrefetchEnabled),
        stored: |s| s.prefetch_enabled.map(Value::from),
        default: || json!(DEFAULT_PREFETCH_ENABLED),
    },
    SettingsField {
        name: "prefetch_folders",
        parse: |v| string_list(v).map(SettingValue::PrefetchFolders),
        stored: |s| s.prefetch_folders.clone().map(Value::from),
        default: || json!([]),
    },
    SettingsField {
        name: "prefetch_mode",
        parse: |v| one_of(v, &PrefetchMode::ALL, PrefetchMode::as_str).map(SettingValue::PrefetchMode),
        stored: |s| s.prefetch_mode.map(|m| json!(m.as_str())),
        default: || json!(PrefetchMode::default().as_str()),
    },
    SettingsField {
        name: "shortcuts",
        parse: |v| shortcut_map(v).map(SettingValue::Shortcuts),
        stored: |s| {
            s.shortcuts.as_ref().map(|map| {
                Value::Object(
                    map.iter()
                        .map(|(action, binding)| (action.clone(), Value::from(binding.clone())))
                        .collect(),
                )
            })
        },
        default: || json!({}),
    },
    SettingsField {
        name: "label_settings",
        parse: |v| validate_labels(v).map(SettingValue::LabelSettings),
        stored: |s| {
            s.label_settings.as_ref().map(|labels| {
                Value::Object(
                    labels
                        .iter()
                        .map(|(keyword, label)| (keyword.clone(), label.to_json()))
                        .collect(),
                )
            })
        },
        default: || json!({}),
    },
    SettingsField {
        name: "security_remember_passphrase",
        parse: |v| boolean(v).map(SettingValue::SecurityRememberPassphrase),
        stored: |s| s.security_remember_passphrase.map(Value::from),
        default: || json!(false),
    },
    SettingsField {
        name: "aliases_defaults",
        parse: |v| json_object(v).map(|map| SettingValue::AliasesDefaults(AliasDefaults(map))),
        stored: |s| s.aliases_defaults.as_ref().map(|d| Value::Object(d.0.clone())),
        default: || Value::Object(Map::new()),
    },
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn field_names_are_unique() {
        let names: HashSet<_> = SETTINGS_FIELDS.iter().map(|f| f.name).collect();
        assert_eq!(names.len(), SETTINGS_FIELDS.len());
        assert_eq!(SETTINGS_FIELDS.len(), 14);
    }

    #[test]
    fn every_default_parses_back() {
        // the archive folder default is null, which its rule accepts as "clear"
        for field in SETTINGS_FIELDS {
            let default = (field.default)();
            assert!(
                (field.parse)(&default).is_ok(),
                "default for {} does not validate",
                field.name
            );
        }
    }

    #[test]
    fn resolve_prefers_stored_value() {
        let field = lookup("mail_messages_per_page").unwrap();
        let mut settings = AliasSettings::default();
        assert_eq!(field.resolve(&settings), json!(50));
        settings.mail_messages_per_page = Some(100);
        assert_eq!(field.resolve(&settings), json!(100));
    }

    #[test]
    fn lookup_misses_unknown_names() {
        assert!(lookup("storage_used").is_none());
        assert!(lookup("appearance_theme").is_some());
    }
}
