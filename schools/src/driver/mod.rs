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

//! Business logic for the schools service.

use schools_core::clocks::Clock;
use schools_core::db::Db;
use std::sync::Arc;

mod schools;
#[cfg(test)]
pub(crate) mod testutils;

/// Registers schools and ranks them by distance.
///
/// Cloning is cheap and every REST handler gets its own copy.  Operations consume the driver.
#[derive(Clone)]
pub struct Driver {
    /// Where schools are persisted.
    db: Arc<dyn Db + Send + Sync>,

    /// Source of creation timestamps.
    clock: Arc<dyn Clock + Send + Sync>,
}

impl Driver {
    /// Creates a driver over the given database and clock.
    pub fn new(db: Arc<dyn Db + Send + Sync>, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self { db, clock }
    }

    /// Returns the current time as seen by the driver's clock.
    pub(crate) fn now_utc(&self) -> time::OffsetDateTime {
        self.clock.now_utc()
    }
}
