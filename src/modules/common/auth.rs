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

use crate::modules::{
    alias::AliasModel,
    common::actor::Actor,
    error::{code::ErrorCode, AliasdResult},
    token::AccessTokenModel,
    users::UserModel,
};
use poem::{
    web::{
        headers::{
            authorization::{Basic, Bearer},
            Authorization, HeaderMapExt,
        },
    },
    Endpoint, FromRequest, Middleware, Request, RequestBody, Result,
};
use std::sync::Arc;

use super::create_api_error_response;

pub struct ApiGuard;

pub struct ApiGuardEndpoint<E> {
    ep: E,
}

impl<E: Endpoint> Middleware<E> for ApiGuard {
    type Output = ApiGuardEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        ApiGuardEndpoint { ep }
    }
}

impl<E: Endpoint> Endpoint for ApiGuardEndpoint<E> {
    type Output = E::Output;

    async fn call(&self, mut req: Request) -> Result<Self::Output> {
        let context = extract_client_context(&req).await?;
        req.set_data(Arc::new(context));
        self.ep.call(req).await
    }
}

/// The authenticated session attached to a request.
#[derive(Clone, Debug)]
pub enum Session {
    /// Bearer token of a primary account owner.
    User(UserModel),
    /// Basic credentials of a mailbox alias.
    Alias {
        alias_id: Option<String>,
        domain_name: String,
        email: String,
    },
}

#[derive(Clone, Debug)]
pub struct ClientContext {
    pub session: Session,
}

impl ClientContext {
    pub fn actor(&self) -> AliasdResult<Actor> {
        Actor::resolve(&self.session)
    }

    /// Resolves the actor and insists on a primary user.
    pub fn require_primary_user(&self) -> AliasdResult<UserModel> {
        self.actor()?.require_primary_user().cloned()
    }
}

impl<'a> FromRequest<'a> for ClientContext {
    async fn from_request(req: &'a Request, _body: &mut RequestBody) -> Result<Self> {
        if let Some(context) = req.data::<Arc<ClientContext>>() {
            return Ok(context.as_ref().clone());
        }
        extract_client_context(req).await
    }
}

pub async fn extract_client_context(req: &Request) -> Result<ClientContext> {
    let headers = req.headers();
    if let Some(bearer) = headers.typed_get::<Authorization<Bearer>>() {
        let user = AccessTokenModel::resolve_user_from_token(bearer.0.token())
            .await
            .map_err(poem::Error::from)?;
        return Ok(ClientContext {
            session: Session::User(user),
        });
    }

    if let Some(basic) = headers.typed_get::<Authorization<Basic>>() {
        let alias = AliasModel::authenticate(basic.0.username(), basic.0.password())
            .await
            .map_err(poem::Error::from)?;
        return Ok(ClientContext {
            session: alias_session(&alias),
        });
    }

    Err(create_api_error_response(
        "Valid credentials not found",
        ErrorCode::PermissionDenied,
    ))
}

fn alias_session(alias: &AliasModel) -> Session {
    let domain_name = alias
        .email
        .rsplit_once('@')
        .map(|(_, domain)| domain.to_string())
        .unwrap_or_default();
    Session::Alias {
        alias_id: Some(alias.id.to_string()),
        domain_name,
        email: alias.email.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::common::actor::Actor;
    use crate::modules::error::INTERNAL_ERROR_MESSAGE;
    use crate::raise_error;
    use poem::http::StatusCode;
    use serde_json::Value;

    async fn rendered(error: crate::modules::error::AliasdError) -> (StatusCode, Value) {
        let response = poem::Error::from(error).into_response();
        let status = response.status();
        let body = response.into_body().into_json::<Value>().await.unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn storage_fault_during_authentication_is_a_masked_server_error() {
        let (status, body) = rendered(raise_error!(
            "Io(Os { code: 5, kind: Uncategorized })".into(),
            ErrorCode::PersistenceFailure
        ))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], INTERNAL_ERROR_MESSAGE);
        assert_eq!(body["code"], ErrorCode::PersistenceFailure as u32);
    }

    #[tokio::test]
    async fn bad_credentials_stay_unauthorized() {
        let (status, body) = rendered(raise_error!(
            "Permission denied: invalid alias credentials.".into(),
            ErrorCode::PermissionDenied
        ))
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Permission denied: invalid alias credentials.");
    }

    #[test]
    fn alias_session_round_trips_through_actor() {
        let alias = AliasModel {
            id: 77,
            name: "jane".into(),
            email: "jane@example.com".into(),
            ..Default::default()
        };
        let context = ClientContext {
            session: alias_session(&alias),
        };
        match context.actor().unwrap() {
            Actor::DelegatedAlias(identity) => {
                assert_eq!(identity.alias_id, 77);
                assert_eq!(identity.domain_name, "example.com");
            }
            other => panic!("unexpected actor: {:?}", other),
        }
        assert_eq!(
            context.require_primary_user().unwrap_err().code(),
            ErrorCode::Forbidden
        );
    }
}
