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

//! Entry point to the REST server.

use crate::driver::Driver;
use axum::Router;
use axum::http::Uri;
use schools_core::rest::RestError;
use tower_http::cors::CorsLayer;

mod add_school_post;
mod health_get;
mod list_schools_get;
mod root_get;
#[cfg(test)]
mod testutils;

/// Handler for any request that does not match a known route.
async fn not_found(uri: Uri) -> RestError {
    RestError::NotFound(format!("Route {} not found", uri.path()))
}

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::{get, post};
    Router::new()
        .route("/", get(root_get::handler))
        .route("/health", get(health_get::handler))
        .route("/addSchool", post(add_school_post::handler))
        .route("/listSchools", get(list_schools_get::handler))
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .with_state(driver)
}
