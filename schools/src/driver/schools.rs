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

//! Extends the driver with the operations on schools.

use crate::db;
use crate::driver::Driver;
use crate::model::{Address, Coordinates, NearbySchool, SchoolId, SchoolName};
use log::debug;
use schools_core::driver::DriverResult;

impl Driver {
    /// Registers a new school and returns the identifier assigned to it.
    ///
    /// Duplicates are not detected: registering the same school twice yields two entries.
    pub(crate) async fn add_school(
        self,
        name: SchoolName,
        address: Address,
        coordinates: Coordinates,
    ) -> DriverResult<SchoolId> {
        let mut tx = self.db.begin().await?;
        let now = self.now_utc();

        let id = db::put_school(tx.ex(), &name, &address, coordinates, now).await?;

        tx.commit().await?;
        debug!("Registered school {} with id {}", name.as_str(), id.as_i64());
        Ok(id)
    }

    /// Lists all registered schools sorted by increasing distance to `origin`.
    ///
    /// Schools at the same distance keep their insertion order.  Schools whose distance cannot
    /// be computed as a finite number are omitted.
    pub(crate) async fn list_schools_near(
        self,
        origin: Coordinates,
    ) -> DriverResult<Vec<NearbySchool>> {
        let schools = db::get_schools(&mut self.db.ex().await?).await?;

        let mut nearby = Vec::with_capacity(schools.len());
        for school in schools {
            let distance = origin.distance_km(school.coordinates());
            if !distance.is_finite() {
                debug!("Skipping school {} with non-finite distance", school.id().as_i64());
                continue;
            }
            nearby.push(NearbySchool::new(school, distance));
        }

        // Stable sort: ties retain the id order returned by the database.
        nearby.sort_by(|a, b| a.distance_km().total_cmp(b.distance_km()));
        Ok(nearby)
    }
}
