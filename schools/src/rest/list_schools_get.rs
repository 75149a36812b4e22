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

//! API to list all schools sorted by their distance to a location.

use crate::driver::Driver;
use crate::model::{Coordinates, Latitude, Longitude, NearbySchool};
use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use schools_core::rest::{EmptyBody, RestError, RestResult};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Unit in which distances are reported.
const DISTANCE_UNIT: &str = "kilometers";

/// Query parameters for this API.
///
/// Values are taken as raw strings so that missing and malformed coordinates can be told apart.
#[derive(Default, Deserialize, Serialize)]
pub(crate) struct ListSchoolsQuery {
    pub(crate) latitude: Option<String>,
    pub(crate) longitude: Option<String>,
}

/// Representation of a school in the response.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct SchoolView {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) address: String,
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) distance: f64,

    #[serde(with = "time::serde::rfc3339")]
    pub(crate) created_at: OffsetDateTime,
}

impl From<NearbySchool> for SchoolView {
    fn from(nearby: NearbySchool) -> Self {
        let school = nearby.school();
        Self {
            id: school.id().as_i64(),
            name: school.name().as_str().to_owned(),
            address: school.address().as_str().to_owned(),
            latitude: round_to(school.coordinates().latitude().as_f64(), 6),
            longitude: round_to(school.coordinates().longitude().as_f64(), 6),
            distance: round_to(*nearby.distance_km(), 2),
            created_at: *school.created_at(),
        }
    }
}

/// Location the distances were computed from.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub(crate) struct UserLocation {
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
}

/// Message returned by this API.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListSchoolsResponse {
    pub(crate) success: bool,
    pub(crate) schools: Vec<SchoolView>,
    pub(crate) total: usize,
    pub(crate) user_location: UserLocation,
    pub(crate) distance_unit: String,
}

/// Rounds `value` to `decimals` fractional digits for presentation purposes.
///
/// Rounding goes through the exact decimal expansion of `value`, so `8.345` (stored as
/// `8.34499...`) rounds down to `8.34`.
fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{:.*}", decimals, value).parse::<f64>().unwrap_or(value)
}

/// Validates the raw query parameters and turns them into coordinates.
fn parse_origin(query: ListSchoolsQuery) -> RestResult<Coordinates> {
    let latitude = query.latitude.filter(|s| !s.is_empty());
    let longitude = query.longitude.filter(|s| !s.is_empty());
    let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
        return Err(RestError::InvalidRequest("Latitude and longitude are required".to_owned()));
    };

    let invalid = |_| RestError::InvalidRequest("Invalid coordinates provided".to_owned());
    let latitude = latitude.parse::<Latitude>().map_err(invalid)?;
    let longitude = longitude.parse::<Longitude>().map_err(invalid)?;
    Ok(Coordinates::new(latitude, longitude))
}

/// GET handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    query: Result<Query<ListSchoolsQuery>, QueryRejection>,
    _: EmptyBody,
) -> Result<Json<ListSchoolsResponse>, RestError> {
    let Query(query) = query.map_err(|e| RestError::InvalidRequest(e.body_text()))?;
    let origin = parse_origin(query)?;

    let nearby = driver
        .list_schools_near(origin)
        .await
        .map_err(|e| RestError::from(e).with_context("Error fetching schools"))?;

    let schools: Vec<SchoolView> = nearby.into_iter().map(SchoolView::from).collect();
    Ok(Json(ListSchoolsResponse {
        success: true,
        total: schools.len(),
        schools,
        user_location: UserLocation {
            latitude: origin.latitude().as_f64(),
            longitude: origin.longitude().as_f64(),
        },
        distance_unit: DISTANCE_UNIT.to_owned(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use axum::http;
    use schools_core::rest::testutils::OneShotBuilder;
    use schools_core::test_payload_must_be_empty;
    use time::macros::datetime;

    fn route() -> (http::Method, String) {
        (http::Method::GET, "/listSchools".to_owned())
    }

    fn query(latitude: &str, longitude: &str) -> ListSchoolsQuery {
        ListSchoolsQuery {
            latitude: Some(latitude.to_owned()),
            longitude: Some(longitude.to_owned()),
        }
    }

    #[test]
    fn test_round_to() {
        assert_eq!(1.23, round_to(1.234, 2));
        assert_eq!(1.24, round_to(1.235001, 2));
        assert_eq!(0.0, round_to(0.00049, 2));
        assert_eq!(-73.123457, round_to(-73.1234567, 6));
        assert_eq!(8.34, round_to(8.345, 2));
        assert_eq!(1.0, round_to(1.005, 2));
        assert_eq!(0.0, round_to(-0.001, 2));
    }

    #[tokio::test]
    async fn test_empty() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_query(query("10", "20"))
            .send_empty()
            .await
            .expect_json::<ListSchoolsResponse>()
            .await;
        assert!(response.success);
        assert!(response.schools.is_empty());
        assert_eq!(0, response.total);
        assert_eq!(UserLocation { latitude: 10.0, longitude: 20.0 }, response.user_location);
        assert_eq!("kilometers", response.distance_unit);

        context.close().await;
    }

    #[tokio::test]
    async fn test_sorted_by_distance() {
        let context = TestContext::setup().await;

        context.clock().set(datetime!(2023-12-01 05:50:20 UTC));
        let far = context.add_school("Far", 0.0, 3.0).await;
        let near = context.add_school("Near", 0.0, 1.0).await;
        let here = context.add_school("Here", 0.0, 0.0).await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_query(query("0", "0"))
            .send_empty()
            .await
            .expect_json::<ListSchoolsResponse>()
            .await;
        assert_eq!(3, response.total);
        let ids: Vec<i64> = response.schools.iter().map(|s| s.id).collect();
        assert_eq!(vec![here.as_i64(), near.as_i64(), far.as_i64()], ids);

        assert_eq!(
            SchoolView {
                id: near.as_i64(),
                name: "Near".to_owned(),
                address: "Address of Near".to_owned(),
                latitude: 0.0,
                longitude: 1.0,
                distance: 111.19,
                created_at: datetime!(2023-12-01 05:50:20 UTC),
            },
            response.schools[1]
        );
        assert_eq!(0.0, response.schools[0].distance);
        assert_eq!(333.58, response.schools[2].distance);

        context.close().await;
    }

    #[tokio::test]
    async fn test_same_place_as_origin() {
        let context = TestContext::setup().await;

        context.add_school("Alpha", 40.7128, -74.0060).await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_query(query("40.7128", "-74.0060"))
            .send_empty()
            .await
            .expect_json::<ListSchoolsResponse>()
            .await;
        assert_eq!(1, response.total);
        assert_eq!("Alpha", response.schools[0].name);
        assert_eq!(0.0, response.schools[0].distance);
        assert_eq!(40.7128, response.schools[0].latitude);
        assert_eq!(-74.006, response.schools[0].longitude);

        context.close().await;
    }

    #[tokio::test]
    async fn test_missing_coordinates() {
        let context = TestContext::setup().await;

        for q in [
            ListSchoolsQuery::default(),
            ListSchoolsQuery { latitude: Some("10".to_owned()), longitude: None },
            ListSchoolsQuery { latitude: None, longitude: Some("10".to_owned()) },
            query("", "10"),
        ] {
            OneShotBuilder::new(context.app(), route())
                .with_query(q)
                .send_empty()
                .await
                .expect_status(http::StatusCode::BAD_REQUEST)
                .expect_error("Latitude and longitude are required")
                .await;
        }

        context.close().await;
    }

    #[tokio::test]
    async fn test_invalid_coordinates() {
        let context = TestContext::setup().await;

        for q in [query("abc", "10"), query("10", "xyz"), query("91", "0"), query("0", "-180.5")] {
            OneShotBuilder::new(context.app(), route())
                .with_query(q)
                .send_empty()
                .await
                .expect_status(http::StatusCode::BAD_REQUEST)
                .expect_error("Invalid coordinates provided")
                .await;
        }

        context.close().await;
    }

    #[tokio::test]
    async fn test_repeated_parameter() {
        let context = TestContext::setup().await;

        let uri = "/listSchools?latitude=1&latitude=2&longitude=0";
        OneShotBuilder::new(context.app(), (http::Method::GET, uri))
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("duplicate field `latitude`")
            .await;

        context.close().await;
    }

    #[tokio::test]
    async fn test_corrupt_row_is_internal_error() {
        let context = TestContext::setup().await;

        context.put_raw_school(123.0, 0.0).await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_query(query("0", "0"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::INTERNAL_SERVER_ERROR)
            .expect_error_response()
            .await;
        assert_eq!("Error fetching schools", response.message);
        assert!(response.error.is_some());

        context.close().await;
    }

    test_payload_must_be_empty!(
        TestContext::setup().await.into_app(),
        route(),
        ListSchoolsQuery {
            latitude: Some("0".to_owned()),
            longitude: Some("0".to_owned()),
        }
    );
}
