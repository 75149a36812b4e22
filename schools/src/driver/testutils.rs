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

//! Test utilities for the business logic.

use crate::db;
use crate::driver::Driver;
use crate::model::School;
use schools_core::clocks::testutils::SettableClock;
use schools_core::db::{Db, Executor};
use std::sync::Arc;
use time::macros::datetime;

/// State of a running test.
pub(crate) struct TestContext {
    /// The database backing the driver.
    db: Arc<dyn Db + Send + Sync>,

    /// The clock used by the driver, which tests can modify at will.
    clock: Arc<SettableClock>,

    /// The driver under test.
    driver: Driver,
}

impl TestContext {
    /// Initializes the driver using an in-memory database and a settable clock.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::new(schools_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::new(SettableClock::new(datetime!(2023-12-01 05:50:20 UTC)));
        let driver = Driver::new(db.clone(), clock.clone());
        Self { db, clock, driver }
    }

    /// Gets the clock used by this test context.
    pub(crate) fn clock(&self) -> &SettableClock {
        self.clock.as_ref()
    }

    /// Gets a copy of the driver in this test context.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Gets all schools by directly querying the database.
    pub(crate) async fn get_schools(&self) -> Vec<School> {
        db::get_schools(&mut self.db.ex().await.unwrap()).await.unwrap()
    }

    /// Inserts a school with unvalidated coordinates by directly modifying the database.
    pub(crate) async fn put_raw_school(&self, latitude: f64, longitude: f64) {
        let mut ex = self.db.ex().await.unwrap();
        let Executor::Sqlite(ex) = &mut ex else {
            panic!("Test contexts are always backed by SQLite");
        };
        let query_str = "
            INSERT INTO schools
                (name, address, latitude, longitude, created_at_secs, created_at_nsecs)
            VALUES ('Corrupt', 'Unknown', ?, ?, 0, 0)
        ";
        sqlx::query(query_str).bind(latitude).bind(longitude).execute(ex.conn()).await.unwrap();
    }

    /// Closes the database connection.  Must be called before dropping the context.
    pub(crate) async fn close(self) {
        self.db.close().await;
    }
}
