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

use crate::aliasd_version;
use crate::modules::rest::api::account::AccountApi;
use crate::modules::rest::api::domain::DomainApi;
use poem_openapi::{OpenApiService, Tags};

pub mod account;
pub mod domain;

#[derive(Tags)]
pub enum ApiTags {
    /// Account retrieval and settings updates for the calling user or alias
    Account,
    /// Domain and alias administration for primary users
    Domain,
}

type AliasdApi = (AccountApi, DomainApi);

pub fn create_openapi_service() -> OpenApiService<AliasdApi, ()> {
    OpenApiService::new((AccountApi, DomainApi), "Aliasd API", aliasd_version!())
}
