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

use serde_json::{json, Value};

use crate::modules::{
    alias::{
        payload::AliasCreateRequest, settings::validator::SettingsValidator, AliasModel,
    },
    domain::tests::owned_domain,
    error::code::ErrorCode,
    settings::cli::SETTINGS,
    users::tests::registered_user,
};

async fn new_alias(quota: Option<u64>) -> AliasModel {
    let (owner, _) = registered_user().await;
    let domain = owned_domain(owner.id, quota).await;
    AliasModel::create(
        owner.id,
        &domain,
        AliasCreateRequest {
            name: "Jane".into(),
            has_imap: Some(true),
            locale: Some("en".into()),
        },
    )
    .await
    .unwrap()
}

async fn put(alias_id: u64, payload: Value) -> Value {
    let patch = SettingsValidator::validate(&payload).unwrap();
    AliasModel::update_settings(alias_id, patch)
        .await
        .unwrap()
        .account_payload()
        .await
        .unwrap()
        .into_json()
}

async fn get(alias_id: u64) -> Value {
    AliasModel::get(alias_id)
        .await
        .unwrap()
        .account_payload()
        .await
        .unwrap()
        .into_json()
}

#[tokio::test]
async fn fresh_alias_reports_defaults_and_global_quota() {
    let alias = new_alias(None).await;
    assert_eq!(alias.name, "jane");
    let payload = get(alias.id).await;
    assert_eq!(payload["email"], json!(alias.email));
    assert_eq!(payload["max_quota"], json!(SETTINGS.aliasd_max_quota_per_alias));
    assert_eq!(payload["appearance_theme"], json!("system"));
    assert_eq!(payload["mail_messages_per_page"], json!(50));
    assert_eq!(payload["label_settings"], json!({}));
    assert_eq!(payload["has_imap"], json!(true));
}

#[tokio::test]
async fn partial_update_round_trips_and_keeps_other_fields() {
    let alias = new_alias(Some(4096)).await;
    put(
        alias.id,
        json!({ "shortcuts": { "archive": "e" }, "compose_plain_default": true }),
    )
    .await;
    let before = get(alias.id).await;

    let after = put(
        alias.id,
        json!({ "appearance_theme": "dark", "mail_archive_folder": "Archive" }),
    )
    .await;
    assert_eq!(after["appearance_theme"], json!("dark"));
    assert_eq!(after["mail_archive_folder"], json!("Archive"));
    assert_eq!(after["max_quota"], json!(4096));

    let untouched = [
        "shortcuts",
        "compose_plain_default",
        "mail_messages_per_page",
        "label_settings",
        "search_saved_searches",
    ];
    for key in untouched {
        assert_eq!(after[key], before[key], "{key} changed");
    }
    assert_eq!(get(alias.id).await, after);
}

#[tokio::test]
async fn same_update_twice_yields_same_payload() {
    let alias = new_alias(None).await;
    let payload = json!({
        "mail_messages_per_page": 100,
        "search_saved_searches": [{ "name": "boss", "query": "from:boss" }],
        "prefetch_mode": "custom"
    });
    let first = put(alias.id, payload.clone()).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = put(alias.id, payload).await;
    assert_eq!(first, second);

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let changed = put(alias.id, json!({ "prefetch_mode": "default" })).await;
    assert_ne!(changed["updated_at"], second["updated_at"]);
}

#[tokio::test]
async fn label_registry_is_replaced_on_every_update() {
    let alias = new_alias(None).await;
    let m1 = json!({ "work": { "name": "Work", "color": "#33AADD" } });
    let stored = put(alias.id, json!({ "label_settings": m1.clone() })).await;
    assert_eq!(stored["label_settings"], m1);

    let cleared = put(alias.id, json!({ "label_settings": {} })).await;
    assert_eq!(cleared["label_settings"], json!({}));
    assert_eq!(get(alias.id).await["label_settings"], json!({}));
}

#[tokio::test]
async fn unknown_keys_are_never_persisted() {
    let alias = new_alias(None).await;
    let payload = put(
        alias.id,
        json!({ "storage_used": 999, "is_admin": true, "search_body_indexing": true }),
    )
    .await;
    assert_eq!(payload["storage_used"], json!(0));
    assert!(payload.get("is_admin").is_none());
    assert_eq!(payload["search_body_indexing"], json!(true));
}

#[tokio::test]
async fn rejected_update_leaves_record_untouched() {
    let alias = new_alias(None).await;
    let before = get(alias.id).await;
    let error = SettingsValidator::validate(&json!({
        "appearance_theme": "dark",
        "mail_messages_per_page": 30
    }))
    .unwrap_err();
    assert_eq!(error.code(), ErrorCode::InvalidEnum);
    assert_eq!(get(alias.id).await, before);
}

#[tokio::test]
async fn missing_alias_is_not_found() {
    let error = AliasModel::update_settings(1, Default::default())
        .await
        .unwrap_err();
    assert_eq!(error.code(), ErrorCode::ResourceNotFound);
    assert_eq!(
        AliasModel::get(1).await.unwrap_err().code(),
        ErrorCode::ResourceNotFound
    );
}

#[tokio::test]
async fn alias_token_authentication() {
    let alias = new_alias(None).await;
    assert_eq!(
        AliasModel::authenticate(&alias.email, "anything")
            .await
            .unwrap_err()
            .code(),
        ErrorCode::PermissionDenied
    );

    let first = AliasModel::issue_token(alias.id).await.unwrap();
    assert_eq!(first.email, alias.email);
    let authed = AliasModel::authenticate(&alias.email, &first.token)
        .await
        .unwrap();
    assert_eq!(authed.id, alias.id);
    assert_ne!(authed.token_hash.as_deref(), Some(first.token.as_str()));

    let second = AliasModel::issue_token(alias.id).await.unwrap();
    assert!(AliasModel::authenticate(&alias.email, &first.token)
        .await
        .is_err());
    assert!(AliasModel::authenticate(&alias.email.to_uppercase(), &second.token)
        .await
        .is_ok());
}

#[tokio::test]
async fn duplicate_alias_conflicts() {
    let (owner, _) = registered_user().await;
    let domain = owned_domain(owner.id, None).await;
    let request = AliasCreateRequest {
        name: "info".into(),
        ..Default::default()
    };
    AliasModel::create(owner.id, &domain, request.clone())
        .await
        .unwrap();
    let error = AliasModel::create(owner.id, &domain, request)
        .await
        .unwrap_err();
    assert_eq!(error.code(), ErrorCode::AlreadyExists);
    assert_eq!(AliasModel::list_by_domain(domain.id).await.unwrap().len(), 1);
}
