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

//! Test utilities for the REST API.

use crate::driver::testutils::TestContext as DriverTestContext;
use crate::model::{Address, Coordinates, School, SchoolId, SchoolName};
use crate::rest::app;
use axum::Router;
use schools_core::clocks::testutils::SettableClock;

/// State of a running test.
pub(crate) struct TestContext {
    /// The driver-level context, which gives access to the database.
    inner: DriverTestContext,

    /// The app router under test.
    app: Router,
}

impl TestContext {
    /// Sets up the app backed by an in-memory database and a settable clock.
    pub(crate) async fn setup() -> Self {
        let inner = DriverTestContext::setup().await;
        let app = app(inner.driver());
        Self { inner, app }
    }

    /// Gets a clone of the app router.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and transforms it into the app router.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Gets the clock used by the app.
    pub(crate) fn clock(&self) -> &SettableClock {
        self.inner.clock()
    }

    /// Registers a school by going through the driver, bypassing the REST layer.
    pub(crate) async fn add_school(&self, name: &str, latitude: f64, longitude: f64) -> SchoolId {
        self.inner
            .driver()
            .add_school(
                SchoolName::new(name).unwrap(),
                Address::new(format!("Address of {}", name)).unwrap(),
                Coordinates::from_degrees(latitude, longitude).unwrap(),
            )
            .await
            .unwrap()
    }

    /// Inserts a school with unvalidated coordinates by directly modifying the database.
    pub(crate) async fn put_raw_school(&self, latitude: f64, longitude: f64) {
        self.inner.put_raw_school(latitude, longitude).await
    }

    /// Gets all schools by directly querying the database.
    pub(crate) async fn get_schools(&self) -> Vec<School> {
        self.inner.get_schools().await
    }

    /// Closes the database connection.
    pub(crate) async fn close(self) {
        self.inner.close().await
    }
}
