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

//! API to describe the service.

use axum::Json;
use schools_core::rest::EmptyBody;
use serde::{Deserialize, Serialize};

/// Paths of the APIs offered by the service.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Endpoints {
    pub(crate) root: String,
    pub(crate) health: String,
    pub(crate) add_school: String,
    pub(crate) list_schools: String,
}

/// Message returned by this API.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct RootResponse {
    pub(crate) success: bool,
    pub(crate) message: String,
    pub(crate) endpoints: Endpoints,
}

/// GET handler for this API.
pub(crate) async fn handler(_: EmptyBody) -> Json<RootResponse> {
    Json(RootResponse {
        success: true,
        message: "School Management API is running".to_owned(),
        endpoints: Endpoints {
            root: "/".to_owned(),
            health: "/health".to_owned(),
            add_school: "/addSchool".to_owned(),
            list_schools: "/listSchools".to_owned(),
        },
    })
}
