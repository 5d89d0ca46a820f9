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

use crate::modules::alias::payload::{AliasCreateRequest, AliasSummary, AliasTokenResponse};
use crate::modules::alias::AliasModel;
use crate::modules::common::auth::ClientContext;
use crate::modules::domain::payload::{DomainCreateRequest, DomainSummary};
use crate::modules::domain::DomainModel;
use crate::modules::rest::api::ApiTags;
use crate::modules::rest::ApiResult;
use poem_openapi::param::Path;
use poem_openapi::payload::Json;
use poem_openapi::OpenApi;

pub struct DomainApi;

#[OpenApi(prefix_path = "/api/v1", tag = "ApiTags::Domain")]
impl DomainApi {
    /// List the domains owned by the caller
    #[oai(path = "/domains", method = "get", operation_id = "list_domains")]
    async fn list_domains(&self, context: ClientContext) -> ApiResult<Json<Vec<DomainSummary>>> {
        let user = context.require_primary_user()?;
        let domains = DomainModel::list_owned(user.id).await?;
        Ok(Json(domains.iter().map(DomainSummary::from).collect()))
    }

    /// Register a new domain
    #[oai(path = "/domains", method = "post", operation_id = "create_domain")]
    async fn create_domain(
        &self,
        payload: Json<DomainCreateRequest>,
        context: ClientContext,
    ) -> ApiResult<Json<DomainSummary>> {
        let user = context.require_primary_user()?;
        let domain = DomainModel::create(user.id, payload.0).await?;
        Ok(Json(DomainSummary::from(&domain)))
    }

    #[oai(
        path = "/domains/:domain_id/aliases",
        method = "get",
        operation_id = "list_aliases"
    )]
    async fn list_aliases(
        &self,
        /// The domain ID
        domain_id: Path<u64>,
        context: ClientContext,
    ) -> ApiResult<Json<Vec<AliasSummary>>> {
        let user = context.require_primary_user()?;
        let domain = DomainModel::require_owner(domain_id.0, user.id).await?;
        let aliases = AliasModel::list_by_domain(domain.id).await?;
        Ok(Json(aliases.iter().map(AliasSummary::from).collect()))
    }

    /// Create a mailbox alias in an owned domain
    #[oai(
        path = "/domains/:domain_id/aliases",
        method = "post",
        operation_id = "create_alias"
    )]
    async fn create_alias(
        &self,
        /// The domain ID
        domain_id: Path<u64>,
        payload: Json<AliasCreateRequest>,
        context: ClientContext,
    ) -> ApiResult<Json<AliasSummary>> {
        let user = context.require_primary_user()?;
        let domain = DomainModel::require_owner(domain_id.0, user.id).await?;
        let alias = AliasModel::create(user.id, &domain, payload.0).await?;
        Ok(Json(AliasSummary::from(&alias)))
    }

    /// Issue a new alias token. The previous token stops working immediately.
    #[oai(
        path = "/aliases/:alias_id/token",
        method = "post",
        operation_id = "issue_alias_token"
    )]
    async fn issue_alias_token(
        &self,
        /// The alias ID
        alias_id: Path<u64>,
        context: ClientContext,
    ) -> ApiResult<Json<AliasTokenResponse>> {
        let user = context.require_primary_user()?;
        let alias = AliasModel::get(alias_id.0).await?;
        DomainModel::require_owner(alias.domain_id, user.id).await?;
        Ok(Json(AliasModel::issue_token(alias.id).await?))
    }
}
