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

use crate::{
    modules::{
        common::auth::Session,
        error::{code::ErrorCode, AliasdResult},
        users::UserModel,
    },
    raise_error,
};

/// A delegated alias caller, as attached to its session.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AliasIdentity {
    pub alias_id: u64,
    pub domain_name: String,
    pub email: String,
}

/// Who is calling. Resolved once per request and matched by every account operation.
#[derive(Clone, Debug)]
pub enum Actor {
    PrimaryUser(UserModel),
    DelegatedAlias(AliasIdentity),
}

impl Actor {
    pub fn resolve(session: &Session) -> AliasdResult<Actor> {
        match session {
            Session::User(user) => Ok(Actor::PrimaryUser(user.clone())),
            Session::Alias {
                alias_id,
                domain_name,
                email,
            } => {
                let raw = alias_id.as_deref().ok_or_else(|| {
                    raise_error!(
                        "Alias session carries no alias identity.".into(),
                        ErrorCode::AuthRequired
                    )
                })?;
                let alias_id = parse_alias_id(raw).ok_or_else(|| {
                    raise_error!(
                        format!("'{}' is not a valid alias id.", raw),
                        ErrorCode::InvalidAliasId
                    )
                })?;
                Ok(Actor::DelegatedAlias(AliasIdentity {
                    alias_id,
                    domain_name: domain_name.clone(),
                    email: email.clone(),
                }))
            }
        }
    }

    /// Management routes are for primary users only.
    pub fn require_primary_user(&self) -> AliasdResult<&UserModel> {
        match self {
            Actor::PrimaryUser(user) => Ok(user),
            Actor::DelegatedAlias(identity) => Err(raise_error!(
                format!(
                    "Alias '{}' is not allowed to perform this action.",
                    identity.email
                ),
                ErrorCode::Forbidden
            )),
        }
    }
}

fn parse_alias_id(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<u64>().ok().filter(|id| *id != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alias_session(alias_id: Option<&str>) -> Session {
        Session::Alias {
            alias_id: alias_id.map(str::to_string),
            domain_name: "example.com".into(),
            email: "jane@example.com".into(),
        }
    }

    #[test]
    fn user_session_is_primary() {
        let user = UserModel {
            id: 9,
            ..Default::default()
        };
        let actor = Actor::resolve(&Session::User(user)).unwrap();
        assert_eq!(actor.require_primary_user().unwrap().id, 9);
    }

    #[test]
    fn alias_session_resolves_identity() {
        match Actor::resolve(&alias_session(Some("42"))).unwrap() {
            Actor::DelegatedAlias(identity) => {
                assert_eq!(identity.alias_id, 42);
                assert_eq!(identity.domain_name, "example.com");
                assert_eq!(identity.email, "jane@example.com");
            }
            other => panic!("unexpected actor: {:?}", other),
        }
    }

    #[test]
    fn missing_alias_id_requires_auth() {
        let error = Actor::resolve(&alias_session(None)).unwrap_err();
        assert_eq!(error.code(), ErrorCode::AuthRequired);
    }

    #[test]
    fn malformed_alias_id_is_rejected() {
        for raw in ["", "abc", "-1", "0", "12x", "1.5", "99999999999999999999999"] {
            let error = Actor::resolve(&alias_session(Some(raw))).unwrap_err();
            assert_eq!(error.code(), ErrorCode::InvalidAliasId, "{raw}");
        }
    }

    #[test]
    fn alias_cannot_act_as_primary_user() {
        let actor = Actor::resolve(&alias_session(Some("42"))).unwrap();
        assert_eq!(
            actor.require_primary_user().unwrap_err().code(),
            ErrorCode::Forbidden
        );
    }
}
