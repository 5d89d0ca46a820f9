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

use std::{collections::BTreeMap, sync::LazyLock};

use regex::Regex;
use serde_json::Value;

use crate::modules::{
    alias::settings::{validator::FieldResult, validator::FieldViolation, LabelDefinition},
    error::code::ErrorCode,
};

static LABEL_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());
static LABEL_COLOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap());

/// Validates a full label registry, keyword -> definition.
///
/// The result is sanitized: only `name`, `color` and `hidden` survive, extra keys are dropped.
pub fn validate_labels(value: &Value) -> FieldResult<BTreeMap<String, LabelDefinition>> {
    let registry = value
        .as_object()
        .ok_or_else(|| FieldViolation::invalid_type("an object of labels", value))?;

    let mut labels = BTreeMap::new();
    for (keyword, definition) in registry {
        if !LABEL_KEYWORD.is_match(keyword) {
            return Err(FieldViolation::new(
                ErrorCode::InvalidLabelKeyword,
                format!(
                    "label keyword '{}' may only contain letters, digits, '-' and '_'",
                    keyword
                ),
            ));
        }
        labels.insert(keyword.clone(), validate_label(keyword, definition)?);
    }
    Ok(labels)
}

fn validate_label(keyword: &str, definition: &Value) -> FieldResult<LabelDefinition> {
    let object = definition.as_object().ok_or_else(|| {
        FieldViolation::new(
            ErrorCode::InvalidLabelValue,
            format!("label '{}' must be an object", keyword),
        )
    })?;

    let name = match object.get("name").and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => {
            return Err(FieldViolation::new(
                ErrorCode::InvalidLabelValue,
                format!("label '{}' needs a non-empty name", keyword),
            ))
        }
    };

    let color = match object.get("color").and_then(Value::as_str) {
        Some(color) if LABEL_COLOR.is_match(color) => color.to_string(),
        _ => {
            return Err(FieldViolation::new(
                ErrorCode::InvalidLabelColor,
                format!("label '{}' color must look like #RRGGBB", keyword),
            ))
        }
    };

    let hidden = match object.get("hidden") {
        None => None,
        Some(Value::Bool(hidden)) => Some(*hidden),
        Some(_) => {
            return Err(FieldViolation::new(
                ErrorCode::InvalidLabelValue,
                format!("label '{}' hidden flag must be a boolean", keyword),
            ))
        }
    };

    Ok(LabelDefinition {
        name,
        color,
        hidden,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_well_formed_label() {
        let labels = validate_labels(&json!({
            "work": { "name": "Work", "color": "#33AADD" }
        }))
        .unwrap();
        let work = &labels["work"];
        assert_eq!(work.name, "Work");
        assert_eq!(work.color, "#33AADD");
        assert_eq!(work.hidden, None);
        assert_eq!(work.to_json(), json!({ "name": "Work", "color": "#33AADD" }));
    }

    #[test]
    fn empty_registry_is_valid() {
        assert!(validate_labels(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn keyword_with_space_is_rejected() {
        let err = validate_labels(&json!({
            "my label": { "name": "Mine", "color": "#000000" }
        }))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidLabelKeyword);
    }

    #[test]
    fn bad_colors_are_rejected() {
        for color in [json!("red"), json!("#12345"), json!("#GGGGGG"), json!("33AADD"), json!(3)]
        {
            let err = validate_labels(&json!({
                "work": { "name": "Work", "color": color }
            }))
            .unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidLabelColor);
        }
        let err = validate_labels(&json!({ "work": { "name": "Work" } })).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidLabelColor);
    }

    #[test]
    fn malformed_definitions_are_rejected() {
        for definition in [
            json!("Work"),
            json!({ "color": "#33AADD" }),
            json!({ "name": "", "color": "#33AADD" }),
            json!({ "name": "Work", "color": "#33AADD", "hidden": "yes" }),
        ] {
            let err = validate_labels(&json!({ "work": definition })).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidLabelValue);
        }
    }

    #[test]
    fn extra_keys_are_dropped_and_hidden_kept() {
        let labels = validate_labels(&json!({
            "travel_2024": { "name": "Travel", "color": "#a0b1c2", "hidden": true, "icon": "plane" }
        }))
        .unwrap();
        assert_eq!(
            labels["travel_2024"].to_json(),
            json!({ "name": "Travel", "color": "#a0b1c2", "hidden": true })
        );
    }

    #[test]
    fn non_object_registry_is_a_type_error() {
        let err = validate_labels(&json!([])).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidType);
    }
}
