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

use std::sync::LazyLock;

use mimalloc::MiMalloc;
use modules::{database::manager::DB_MANAGER, error::AliasdResult, logger, rest::start_http_server};
use tracing::info;

mod modules;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[cfg(not(test))]
#[tokio::main]
async fn main() -> AliasdResult<()> {
    logger::initialize_logging();
    info!("Starting aliasd");
    info!("Version:  {}", aliasd_version!());

    // Open the metadata database before accepting requests.
    LazyLock::force(&DB_MANAGER);

    start_http_server().await?;
    Ok(())
}
