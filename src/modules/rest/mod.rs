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

use crate::modules::common::log::Tracing;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::handler::error_handler;
use crate::modules::error::AliasdResult;
use crate::modules::rest::public::login::login;
use crate::modules::rest::public::register::register;
use crate::modules::settings::cli::SETTINGS;

use super::error::ApiErrorResponse;
use crate::modules::common::auth::ApiGuard;
use crate::raise_error;
use api::create_openapi_service;
use http::Method;
use poem::listener::TcpListener;
use poem::middleware::{CatchPanic, Compression, Cors};
use poem::post;
use poem::{EndpointExt, Route, Server};
use std::time::Duration;
use tracing::info;

pub mod api;
pub mod public;

pub type ApiResult<T, E = ApiErrorResponse> = std::result::Result<T, E>;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, stopping HTTP server.");
}

pub async fn start_http_server() -> AliasdResult<()> {
    let listener = TcpListener::bind((
        SETTINGS
            .aliasd_bind_ip
            .clone()
            .unwrap_or_else(|| "0.0.0.0".into()),
        SETTINGS.aliasd_http_port as u16,
    ));

    let api_service = create_openapi_service()
        .summary("Mailbox alias settings and account service");

    let swagger = api_service.swagger_ui();
    let scalar = api_service.scalar();
    let spec_json = api_service.spec_endpoint();

    let open_api_route = Route::new()
        .nest_no_strip("/api/v1", api_service)
        .with(ApiGuard)
        .with(Tracing);

    let cors_origins: Vec<String> = SETTINGS.aliasd_cors_origins.iter().cloned().collect();

    let cors = Cors::new()
        .allow_origins_fn(move |origin| {
            if cors_origins.is_empty() {
                return true;
            }
            cors_origins.iter().any(|o| o == origin)
        })
        .allow_credentials(true)
        .allow_methods(&[
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::OPTIONS,
            Method::HEAD,
        ])
        .allow_headers(vec!["Content-Type", "Authorization"])
        .expose_headers(vec!["Accept"])
        .max_age(SETTINGS.aliasd_cors_max_age);

    let route = Route::new()
        .nest("/api-docs/swagger", swagger)
        .nest("/api-docs/scalar", scalar)
        .nest("/api-docs/spec.json", spec_json)
        .nest("/api/login", post(login).with(Tracing))
        .nest("/api/account", post(register).with(Tracing))
        .nest_no_strip("/api/v1", open_api_route)
        .with(cors)
        .with_if(SETTINGS.aliasd_http_compression_enabled, Compression::new())
        .with(CatchPanic::new());

    let server = Server::new(listener)
        .name("Aliasd Service")
        .idle_timeout(Duration::from_secs(60))
        .run_with_graceful_shutdown(
            route.catch_all_error(error_handler),
            shutdown_signal(),
            Some(Duration::from_secs(5)),
        );
    info!(
        "Aliasd Service is now running on port {}.",
        SETTINGS.aliasd_http_port
    );
    server
        .await
        .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))
}
