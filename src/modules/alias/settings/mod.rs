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

//! Per-alias user preferences.
//!
//! [`AliasSettings`] is the stored shape: every field is optional and absence means
//! "use the registered default". Inbound updates go through
//! [`validator::SettingsValidator`], which consults [`registry::SETTINGS_FIELDS`] and
//! yields a [`updater::SettingsPatch`] of typed [`SettingValue`]s.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod labels;
pub mod registry;
pub mod updater;
pub mod validator;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::System, Theme::Light, Theme::Dark];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::System => "system",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum LayoutMode {
    #[default]
    Personal,
    Professional,
}

impl LayoutMode {
    pub const ALL: [LayoutMode; 2] = [LayoutMode::Personal, LayoutMode::Professional];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Personal => "personal",
            LayoutMode::Professional => "professional",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum PrefetchMode {
    #[default]
    Default,
    Custom,
}

impl PrefetchMode {
    pub const ALL: [PrefetchMode; 2] = [PrefetchMode::Default, PrefetchMode::Custom];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrefetchMode::Default => "default",
            PrefetchMode::Custom => "custom",
        }
    }
}

/// Accepted page sizes for the mail list. A closed set, not a range.
pub const MESSAGES_PER_PAGE_CHOICES: [u32; 4] = [10, 25, 50, 100];
pub const DEFAULT_MESSAGES_PER_PAGE: u32 = 50;
pub const DEFAULT_PREFETCH_ENABLED: bool = true;
pub const MAX_SAVED_SEARCH_QUERY_CHARS: usize = 500;

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SavedSearch {
    pub name: String,
    pub query: String,
}

impl SavedSearch {
    pub fn to_json(&self) -> Value {
        serde_json::json!({ "name": self.name, "query": self.query })
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct LabelDefinition {
    pub name: String,
    /// `#RRGGBB`, stored as sent.
    pub color: String,
    pub hidden: Option<bool>,
}

impl LabelDefinition {
    /// `hidden` is only emitted when it was set.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("name".into(), Value::from(self.name.clone()));
        object.insert("color".into(), Value::from(self.color.clone()));
        if let Some(hidden) = self.hidden {
            object.insert("hidden".into(), Value::from(hidden));
        }
        Value::Object(object)
    }
}

/// Free-form compose defaults (display name, signature, ...). Only required to be an object.
///
/// Persisted as JSON text so the record stays readable by non-self-describing codecs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct AliasDefaults(pub Map<String, Value>);

impl From<AliasDefaults> for String {
    fn from(value: AliasDefaults) -> Self {
        Value::Object(value.0).to_string()
    }
}

impl TryFrom<String> for AliasDefaults {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match serde_json::from_str::<Value>(&value) {
            Ok(Value::Object(map)) => Ok(AliasDefaults(map)),
            Ok(_) => Err("aliases_defaults must be a JSON object".into()),
            Err(e) => Err(e.to_string()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AliasSettings {
    pub appearance_theme: Option<Theme>,
    pub appearance_layout_mode: Option<LayoutMode>,
    pub compose_plain_default: Option<bool>,
    pub mail_messages_per_page: Option<u32>,
    pub mail_archive_folder: Option<String>,
    pub search_body_indexing: Option<bool>,
    pub search_saved_searches: Option<Vec<SavedSearch>>,
    pub prefetch_enabled: Option<bool>,
    pub prefetch_folders: Option<Vec<String>>,
    pub prefetch_mode: Option<PrefetchMode>,
    pub shortcuts: Option<BTreeMap<String, String>>,
    pub label_settings: Option<BTreeMap<String, LabelDefinition>>,
    pub security_remember_passphrase: Option<bool>,
    pub aliases_defaults: Option<AliasDefaults>,
}

/// A validated value for exactly one settings field.
#[derive(Clone, Debug, PartialEq)]
pub enum SettingValue {
    AppearanceTheme(Theme),
    AppearanceLayoutMode(LayoutMode),
    ComposePlainDefault(bool),
    MailMessagesPerPage(u32),
    /// `None` clears the folder back to the default.
    MailArchiveFolder(Option<String>),
    SearchBodyIndexing(bool),
    SearchSavedSearches(Vec<SavedSearch>),
    PrefetchEnabled(bool),
    PrefetchFolders(Vec<String>),
    PrefetchMode(PrefetchMode),
    Shortcuts(BTreeMap<String, String>),
    LabelSettings(BTreeMap<String, LabelDefinition>),
    SecurityRememberPassphrase(bool),
    AliasesDefaults(AliasDefaults),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_defaults_round_trip_through_text() {
        let mut map = Map::new();
        map.insert("display_name".into(), Value::from("Jane"));
        map.insert("signature".into(), Value::from("-- \nJane"));
        let text: String = AliasDefaults(map.clone()).into();
        let back = AliasDefaults::try_from(text).unwrap();
        assert_eq!(back.0, map);
    }

    #[test]
    fn alias_defaults_reject_non_object_text() {
        assert!(AliasDefaults::try_from("[1,2]".to_string()).is_err());
        assert!(AliasDefaults::try_from("not json".to_string()).is_err());
    }

    #[test]
    fn label_json_omits_unset_hidden() {
        let label = LabelDefinition {
            name: "Work".into(),
            color: "#33AADD".into(),
            hidden: None,
        };
        assert_eq!(
            label.to_json(),
            serde_json::json!({ "name": "Work", "color": "#33AADD" })
        );

        let hidden = LabelDefinition {
            hidden: Some(true),
            ..label
        };
        assert_eq!(hidden.to_json()["hidden"], Value::Bool(true));
    }
}
