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

use itertools::Itertools;
use serde_json::Value;
use tracing::{debug, warn};

use crate::modules::{
    alias::settings::{
        registry::SETTINGS_FIELDS, updater::SettingsPatch, SavedSearch,
        MAX_SAVED_SEARCH_QUERY_CHARS,
    },
    error::{code::ErrorCode, AliasdError, AliasdResult},
};
use crate::raise_error;

/// Why a single field value was rejected. The validator attaches the field name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldViolation {
    pub code: ErrorCode,
    pub message: String,
}

impl FieldViolation {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_type(expected: &str, got: &Value) -> Self {
        Self::new(
            ErrorCode::InvalidType,
            format!("expected {}, got {}", expected, json_type_name(got)),
        )
    }
}

pub type FieldResult<T> = Result<T, FieldViolation>;

pub struct SettingsValidator;

impl SettingsValidator {
    /// Filters `payload` down to registered settings fields and validates each one.
    ///
    /// The first rejected field fails the whole payload; nothing is applied partially.
    /// A `null` payload is an empty update. Unknown keys are ignored.
    pub fn validate(payload: &Value) -> AliasdResult<SettingsPatch> {
        let object = match payload {
            Value::Null => return Ok(SettingsPatch::default()),
            Value::Object(object) => object,
            other => {
                return Err(raise_error!(
                    format!(
                        "Request body must be a JSON object, got {}.",
                        json_type_name(other)
                    ),
                    ErrorCode::InvalidBody
                ))
            }
        };

        let mut patch = SettingsPatch::default();
        for field in SETTINGS_FIELDS {
            let Some(value) = object.get(field.name) else {
                continue;
            };
            let sanitized = (field.parse)(value).map_err(|violation| {
                warn!(field = field.name, reason = %violation.message, "Rejected settings update");
                AliasdError::validation(field.name, violation.message, violation.code)
            })?;
            patch.push(field.name, sanitized);
        }

        if patch.len() < object.len() {
            let ignored = object
                .keys()
                .filter(|key| !patch.contains(key))
                .join(", ");
            debug!("Ignoring unknown settings keys: {}", ignored);
        }

        Ok(patch)
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn boolean(value: &Value) -> FieldResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| FieldViolation::invalid_type("a boolean", value))
}

pub(crate) fn string(value: &Value) -> FieldResult<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| FieldViolation::invalid_type("a string", value))
}

pub(crate) fn nullable_string(value: &Value) -> FieldResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        other => Err(FieldViolation::invalid_type("a string or null", other)),
    }
}

/// Matches a string against a closed set of named variants.
pub(crate) fn one_of<T: Copy>(
    value: &Value,
    variants: &[T],
    name: impl Fn(&T) -> &'static str,
) -> FieldResult<T> {
    let s = value
        .as_str()
        .ok_or_else(|| FieldViolation::invalid_type("a string", value))?;
    variants
        .iter()
        .find(|variant| name(variant) == s)
        .copied()
        .ok_or_else(|| {
            FieldViolation::new(
                ErrorCode::InvalidEnum,
                format!(
                    "'{}' is not one of: {}",
                    s,
                    variants.iter().map(|variant| name(variant)).join(", ")
                ),
            )
        })
}

pub(crate) fn integer_choice(value: &Value, choices: &[u32]) -> FieldResult<u32> {
    let n = value
        .as_u64()
        .ok_or_else(|| FieldViolation::invalid_type("an integer", value))?;
    choices
        .iter()
        .copied()
        .find(|choice| u64::from(*choice) == n)
        .ok_or_else(|| {
            FieldViolation::new(
                ErrorCode::InvalidEnum,
                format!("{} is not one of: {}", n, choices.iter().join(", ")),
            )
        })
}

pub(crate) fn string_list(value: &Value) -> FieldResult<Vec<String>> {
    let items = value
        .as_array()
        .ok_or_else(|| FieldViolation::invalid_type("an array of strings", value))?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                FieldViolation::new(
                    ErrorCode::InvalidType,
                    format!("item {} must be a string", index),
                )
            })
        })
        .collect()
}

pub(crate) fn saved_searches(value: &Value) -> FieldResult<Vec<SavedSearch>> {
    let items = value
        .as_array()
        .ok_or_else(|| FieldViolation::invalid_type("an array of saved searches", value))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let object = item.as_object().ok_or_else(|| {
                FieldViolation::new(
                    ErrorCode::InvalidType,
                    format!("item {} must be an object with name and query", index),
                )
            })?;
            let name = object.get("name").and_then(Value::as_str).ok_or_else(|| {
                FieldViolation::new(
                    ErrorCode::InvalidType,
                    format!("item {}: name must be a string", index),
                )
            })?;
            let query = object.get("query").and_then(Value::as_str).ok_or_else(|| {
                FieldViolation::new(
                    ErrorCode::InvalidType,
                    format!("item {}: query must be a string", index),
                )
            })?;
            if query.chars().count() > MAX_SAVED_SEARCH_QUERY_CHARS {
                return Err(FieldViolation::new(
                    ErrorCode::FieldLengthExceeded,
                    format!(
                        "item {}: query exceeds {} characters",
                        index, MAX_SAVED_SEARCH_QUERY_CHARS
                    ),
                ));
            }
            Ok(SavedSearch {
                name: name.to_string(),
                query: query.to_string(),
            })
        })
        .collect()
}

pub(crate) fn shortcut_map(
    value: &Value,
) -> FieldResult<std::collections::BTreeMap<String, String>> {
    let object = value
        .as_object()
        .ok_or_else(|| FieldViolation::invalid_type("an object of key bindings", value))?;
    object
        .iter()
        .map(|(action, binding)| match binding.as_str() {
            Some(binding) if !binding.is_empty() => Ok((action.clone(), binding.to_string())),
            _ => Err(FieldViolation::new(
                ErrorCode::InvalidType,
                format!("binding for '{}' must be a non-empty string", action),
            )),
        })
        .collect()
}

pub(crate) fn json_object(value: &Value) -> FieldResult<serde_json::Map<String, Value>> {
    value
        .as_object()
        .cloned()
        .ok_or_else(|| FieldViolation::invalid_type("an object", value))
}
