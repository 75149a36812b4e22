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

//! API to check that the service is alive.

use crate::driver::Driver;
use axum::Json;
use axum::extract::State;
use schools_core::rest::EmptyBody;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Message returned by this API.
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: String,

    #[serde(with = "time::serde::rfc3339")]
    pub(crate) timestamp: OffsetDateTime,
}

/// GET handler for this API.
pub(crate) async fn handler(State(driver): State<Driver>, _: EmptyBody) -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok".to_owned(), timestamp: driver.now_utc() })
}
