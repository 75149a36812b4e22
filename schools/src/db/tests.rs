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

//! Common tests for any database implementation.

use crate::db::*;
use schools_core::db::Db;
use std::sync::Arc;
use time::macros::datetime;

/// Inserts a row with raw, unvalidated coordinates, bypassing the model types.
async fn put_raw_school(ex: &mut Executor, latitude: f64, longitude: f64) {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO schools (name, address, latitude, longitude, created_at)
                VALUES ('Raw', 'Nowhere', $1, $2, NOW())
            ";
            sqlx::query(query_str)
                .bind(latitude)
                .bind(longitude)
                .execute(ex.conn())
                .await
                .unwrap();
        }

        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO schools
                    (name, address, latitude, longitude, created_at_secs, created_at_nsecs)
                VALUES ('Raw', 'Nowhere', ?, ?, 0, 0)
            ";
            sqlx::query(query_str)
                .bind(latitude)
                .bind(longitude)
                .execute(ex.conn())
                .await
                .unwrap();
        }
    }
}

async fn test_get_schools_empty(db: Arc<dyn Db + Send + Sync>) {
    assert!(get_schools(&mut db.ex().await.unwrap()).await.unwrap().is_empty());

    db.close().await;
}

async fn test_put_and_get_schools(db: Arc<dyn Db + Send + Sync>) {
    let created1 = datetime!(2023-12-01 10:00:00.123456 UTC);
    let coords1 = Coordinates::from_degrees(40.0, -73.0).unwrap();
    let id1 = put_school(
        &mut db.ex().await.unwrap(),
        &SchoolName::new("Alpha").unwrap(),
        &Address::new("1 First Avenue").unwrap(),
        coords1,
        created1,
    )
    .await
    .unwrap();

    let created2 = datetime!(2023-12-02 11:30:00 UTC);
    let coords2 = Coordinates::from_degrees(-33.8688, 151.2093).unwrap();
    let id2 = put_school(
        &mut db.ex().await.unwrap(),
        &SchoolName::new("Beta").unwrap(),
        &Address::new("2 Second Street").unwrap(),
        coords2,
        created2,
    )
    .await
    .unwrap();

    assert!(id1 < id2);

    let schools = get_schools(&mut db.ex().await.unwrap()).await.unwrap();
    assert_eq!(
        vec![
            School::new(
                id1,
                SchoolName::new("Alpha").unwrap(),
                Address::new("1 First Avenue").unwrap(),
                coords1,
                created1,
            ),
            School::new(
                id2,
                SchoolName::new("Beta").unwrap(),
                Address::new("2 Second Street").unwrap(),
                coords2,
                created2,
            ),
        ],
        schools
    );

    db.close().await;
}

async fn test_put_school_allows_duplicates(db: Arc<dyn Db + Send + Sync>) {
    let name = SchoolName::new("Same").unwrap();
    let address = Address::new("Same place").unwrap();
    let coords = Coordinates::from_degrees(1.5, 2.5).unwrap();
    let created = datetime!(2023-12-01 10:00:00 UTC);

    let id1 =
        put_school(&mut db.ex().await.unwrap(), &name, &address, coords, created).await.unwrap();
    let id2 =
        put_school(&mut db.ex().await.unwrap(), &name, &address, coords, created).await.unwrap();
    assert_ne!(id1, id2);

    assert_eq!(2, get_schools(&mut db.ex().await.unwrap()).await.unwrap().len());

    db.close().await;
}

async fn test_put_school_in_committed_tx(db: Arc<dyn Db + Send + Sync>) {
    let mut tx = db.begin().await.unwrap();
    let id = put_school(
        tx.ex(),
        &SchoolName::new("Gamma").unwrap(),
        &Address::new("3 Third Road").unwrap(),
        Coordinates::from_degrees(0.0, 0.0).unwrap(),
        datetime!(2023-12-01 10:00:00 UTC),
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    let schools = get_schools(&mut db.ex().await.unwrap()).await.unwrap();
    assert_eq!(1, schools.len());
    assert_eq!(id, *schools[0].id());
    assert_eq!("Gamma", schools[0].name().as_str());

    db.close().await;
}

async fn test_get_schools_invalid_coordinates(db: Arc<dyn Db + Send + Sync>) {
    put_raw_school(&mut db.ex().await.unwrap(), 95.0, 0.0).await;

    match get_schools(&mut db.ex().await.unwrap()).await {
        Err(DbError::DataIntegrityError(e)) => assert!(e.contains("Invalid latitude")),
        e => panic!("Must have failed with a DataIntegrityError but got: {:?}", e),
    }

    db.close().await;
}

macro_rules! generate_db_tests [
    ( $setup:expr $(, #[$extra:meta] )? ) => {
        schools_core::db::testutils::generate_tests!(
            $(#[$extra],)?
            $setup,
            $crate::db::tests,
            test_get_schools_empty,
            test_put_and_get_schools,
            test_put_school_allows_duplicates,
            test_put_school_in_committed_tx,
            test_get_schools_invalid_coordinates
        );
    }
];

#[cfg(feature = "postgres")]
mod postgres {
    use super::*;
    use schools_core::db::postgres::testutils::setup;

    generate_db_tests!(
        {
            let db: Arc<dyn Db + Send + Sync> = Arc::new(setup().await);
            init_schema(&mut db.ex().await.unwrap()).await.unwrap();
            db
        },
        #[ignore = "Requires environment configuration and is expensive"]
    );
}

mod sqlite {
    use super::*;
    use schools_core::db::sqlite::testutils::setup;

    generate_db_tests!({
        let db: Arc<dyn Db + Send + Sync> = Arc::new(setup().await);
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        db
    });
}
