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

//! API to register a new school.

use crate::driver::Driver;
use crate::model::{Address, Coordinates, Latitude, Longitude, SchoolName};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use schools_core::rest::{FieldError, RestError, RestResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Message returned by the server after registering a school.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddSchoolResponse {
    pub(crate) success: bool,
    pub(crate) message: String,
    pub(crate) school_id: i64,
}

/// Parses the raw `value` of `field` into a `T`, recording any problems in `errors`.
///
/// A missing or null value is reported with the `missing` message.
fn parse_field<T: DeserializeOwned>(
    value: Option<Value>,
    field: &str,
    missing: &str,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    match value {
        None | Some(Value::Null) => {
            errors.push(FieldError::new(field, missing));
            None
        }
        Some(value) => match T::deserialize(value) {
            Ok(value) => Some(value),
            Err(e) => {
                errors.push(FieldError::new(field, e.to_string()));
                None
            }
        },
    }
}

/// Extracts the fields of the request, which must be a JSON object.
fn into_fields(body: Value) -> RestResult<Map<String, Value>> {
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err(RestError::InvalidRequest("Request body must be a JSON object".to_owned())),
    }
}

/// POST handler for this API.
///
/// The body is taken as a raw JSON value so that all fields can be validated at once and the
/// caller can learn about every problem in a single round trip.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, RestError> {
    let mut fields = into_fields(body)?;

    let mut errors = vec![];
    let name: Option<SchoolName> =
        parse_field(fields.remove("name"), "name", "School name is required", &mut errors);
    let address: Option<Address> =
        parse_field(fields.remove("address"), "address", "Address is required", &mut errors);
    let latitude: Option<Latitude> =
        parse_field(fields.remove("latitude"), "latitude", "Invalid latitude", &mut errors);
    let longitude: Option<Longitude> =
        parse_field(fields.remove("longitude"), "longitude", "Invalid longitude", &mut errors);

    let (Some(name), Some(address), Some(latitude), Some(longitude)) =
        (name, address, latitude, longitude)
    else {
        return Err(RestError::InvalidFields(errors));
    };

    let id = driver
        .add_school(name, address, Coordinates::new(latitude, longitude))
        .await
        .map_err(|e| RestError::from(e).with_context("Error adding school"))?;

    let response = AddSchoolResponse {
        success: true,
        message: "School added successfully".to_owned(),
        school_id: id.as_i64(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}
