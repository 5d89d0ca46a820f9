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

use crate::modules::alias::settings::{AliasSettings, SettingValue};

/// A validated, ordered set of settings writes. Built by the validator only.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SettingsPatch(Vec<(&'static str, SettingValue)>);

impl SettingsPatch {
    pub fn push(&mut self, field: &'static str, value: SettingValue) {
        self.0.push((field, value));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|(name, _)| *name == field)
    }

    #[cfg(test)]
    pub fn values(&self) -> impl Iterator<Item = &SettingValue> {
        self.0.iter().map(|(_, value)| value)
    }

    /// Writes every value into `settings`. Fields not in the patch are left untouched.
    ///
    /// Collections are replaced wholesale, so an empty label map clears every label.
    pub fn apply_to(self, settings: &mut AliasSettings) {
        for (_, value) in self.0 {
            match value {
                SettingValue::AppearanceTheme(v) => settings.appearance_theme = Some(v),
                SettingValue::AppearanceLayoutMode(v) => settings.appearance_layout_mode = Some(v),
                SettingValue::ComposePlainDefault(v) => settings.compose_plain_default = Some(v),
                SettingValue::MailMessagesPerPage(v) => settings.mail_messages_per_page = Some(v),
                SettingValue::MailArchiveFolder(v) => settings.mail_archive_folder = v,
                SettingValue::SearchBodyIndexing(v) => settings.search_body_indexing = Some(v),
                SettingValue::SearchSavedSearches(v) => settings.search_saved_searches = Some(v),
                SettingValue::PrefetchEnabled(v) => settings.prefetch_enabled = Some(v),
                SettingValue::PrefetchFolders(v) => settings.prefetch_folders = Some(v),
                SettingValue::PrefetchMode(v) => settings.prefetch_mode = Some(v),
                SettingValue::Shortcuts(v) => settings.shortcuts = Some(v),
                SettingValue::LabelSettings(v) => settings.label_settings = Some(v),
                SettingValue::SecurityRememberPassphrase(v) => {
                    settings.security_remember_passphrase = Some(v)
                }
                SettingValue::AliasesDefaults(v) => settings.aliases_defaults = Some(v),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::modules::alias::settings::{
        validator::SettingsValidator, LayoutMode, Theme,
    };

    use super::*;

    fn apply(settings: &mut AliasSettings, payload: serde_json::Value) {
        SettingsValidator::validate(&payload)
            .unwrap()
            .apply_to(settings);
    }

    #[test]
    fn partial_update_leaves_other_fields_alone() {
        let mut settings = AliasSettings::default();
        apply(
            &mut settings,
            json!({ "appearance_layout_mode": "professional", "shortcuts": { "archive": "e" } }),
        );
        apply(&mut settings, json!({ "appearance_theme": "dark" }));

        assert_eq!(settings.appearance_theme, Some(Theme::Dark));
        assert_eq!(
            settings.appearance_layout_mode,
            Some(LayoutMode::Professional)
        );
        assert_eq!(settings.shortcuts.unwrap()["archive"], "e");
        assert_eq!(settings.mail_messages_per_page, None);
    }

    #[test]
    fn label_registry_is_replaced_not_merged() {
        let mut settings = AliasSettings::default();
        apply(
            &mut settings,
            json!({ "label_settings": {
                "work": { "name": "Work", "color": "#33AADD" },
                "home": { "name": "Home", "color": "#00FF00" }
            }}),
        );
        assert_eq!(settings.label_settings.as_ref().unwrap().len(), 2);

        apply(
            &mut settings,
            json!({ "label_settings": { "home": { "name": "Home", "color": "#00FF00" } } }),
        );
        let labels = settings.label_settings.as_ref().unwrap();
        assert_eq!(labels.len(), 1);
        assert!(labels.contains_key("home"));

        apply(&mut settings, json!({ "label_settings": {} }));
        assert!(settings.label_settings.unwrap().is_empty());
    }

    #[test]
    fn applying_same_patch_twice_is_idempotent() {
        let payload = json!({
            "appearance_theme": "light",
            "mail_messages_per_page": 25,
            "prefetch_folders": ["INBOX"],
            "search_saved_searches": [{ "name": "boss", "query": "from:boss" }]
        });
        let mut once = AliasSettings::default();
        apply(&mut once, payload.clone());
        let mut twice = once.clone();
        apply(&mut twice, payload);
        assert_eq!(once, twice);
    }

    #[test]
    fn null_archive_folder_clears_it() {
        let mut settings = AliasSettings::default();
        apply(&mut settings, json!({ "mail_archive_folder": "Archive" }));
        assert_eq!(settings.mail_archive_folder.as_deref(), Some("Archive"));
        apply(&mut settings, json!({ "mail_archive_folder": null }));
        assert_eq!(settings.mail_archive_folder, None);
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut settings = AliasSettings {
            compose_plain_default: Some(true),
            ..Default::default()
        };
        let before = settings.clone();
        SettingsPatch::default().apply_to(&mut settings);
        assert_eq!(settings, before);
    }
}
