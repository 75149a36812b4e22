// Schools
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Entry point to the schools service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use log::{error, info};
use schools::db::init_schema;
use schools::{ServerOptions, serve};
use schools_core::clocks::SystemClock;
use schools_core::db::Db;
use schools_core::db::postgres::{PostgresDb, PostgresOptions};
use std::fmt::Display;
use std::process;
use std::sync::Arc;

/// Logs `message` as a fatal error and terminates the process.
fn fail(message: String) -> ! {
    error!("{}", message);
    process::exit(1);
}

/// Formats a database setup failure `e` while trying to `action`, including the connection
/// details in `db_desc`.
fn db_error(action: &str, db_desc: &str, e: impl Display) -> String {
    format!("{}: {} (connection: {})", action, e, db_desc)
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let server_opts = ServerOptions::from_env("SCHOOLS").unwrap_or_else(|e| fail(e));
    let db_opts = PostgresOptions::from_env("DB").unwrap_or_else(|e| fail(e));

    let db_desc = format!("{:?}", db_opts);
    info!("Connecting to database {}", db_desc);
    let db = PostgresDb::connect(db_opts)
        .unwrap_or_else(|e| fail(db_error("Cannot connect to the database", &db_desc, e)));
    let db: Arc<dyn Db + Send + Sync> = Arc::new(db);

    let init = match db.ex().await {
        Ok(mut ex) => init_schema(&mut ex).await,
        Err(e) => Err(e),
    };
    if let Err(e) = init {
        db.close().await;
        fail(db_error("Error initializing database", &db_desc, e));
    }
    info!("Database initialized successfully");

    if let Err(e) = serve(server_opts.socket_addr(), db, Arc::new(SystemClock::default())).await {
        fail(format!("Server failed: {}", e));
    }
}
