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

//! Database abstraction to persist and query schools.

use crate::model::{Address, Coordinates, School, SchoolId, SchoolName};
use futures::TryStreamExt;
#[cfg(feature = "postgres")]
use schools_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use schools_core::db::sqlite::{self, build_timestamp, unpack_timestamp};
use schools_core::db::{DbError, DbResult, Executor};
use sqlx::Row;
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use time::OffsetDateTime;

#[cfg(test)]
mod tests;

/// Initializes the database schema.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for School {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
        let address: String = row.try_get("address").map_err(postgres::map_sqlx_error)?;
        let latitude: f64 = row.try_get("latitude").map_err(postgres::map_sqlx_error)?;
        let longitude: f64 = row.try_get("longitude").map_err(postgres::map_sqlx_error)?;
        let created_at: OffsetDateTime =
            row.try_get("created_at").map_err(postgres::map_sqlx_error)?;

        Ok(School::new(
            SchoolId::new(id)?,
            SchoolName::new(name)?,
            Address::new(address)?,
            Coordinates::from_degrees(latitude, longitude)?,
            created_at,
        ))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for School {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
        let address: String = row.try_get("address").map_err(sqlite::map_sqlx_error)?;
        let latitude: f64 = row.try_get("latitude").map_err(sqlite::map_sqlx_error)?;
        let longitude: f64 = row.try_get("longitude").map_err(sqlite::map_sqlx_error)?;
        let created_at_secs: i64 = row.try_get("created_at_secs").map_err(sqlite::map_sqlx_error)?;
        let created_at_nsecs: i64 =
            row.try_get("created_at_nsecs").map_err(sqlite::map_sqlx_error)?;

        Ok(School::new(
            SchoolId::new(id)?,
            SchoolName::new(name)?,
            Address::new(address)?,
            Coordinates::from_degrees(latitude, longitude)?,
            build_timestamp(created_at_secs, created_at_nsecs)?,
        ))
    }
}

/// Inserts a new school with the given attributes and returns the identifier assigned to it by
/// the database.
pub async fn put_school(
    ex: &mut Executor,
    name: &SchoolName,
    address: &Address,
    coordinates: Coordinates,
    created_at: OffsetDateTime,
) -> DbResult<SchoolId> {
    let id: i64 = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO schools (name, address, latitude, longitude, created_at)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
            ";
            let row = sqlx::query(query_str)
                .bind(name.as_str())
                .bind(address.as_str())
                .bind(coordinates.latitude().as_f64())
                .bind(coordinates.longitude().as_f64())
                .bind(created_at)
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("id").map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (created_at_secs, created_at_nsecs) = unpack_timestamp(created_at)?;

            let query_str = "
                INSERT INTO schools
                    (name, address, latitude, longitude, created_at_secs, created_at_nsecs)
                VALUES (?, ?, ?, ?, ?, ?)
            ";
            let done = sqlx::query(query_str)
                .bind(name.as_str())
                .bind(address.as_str())
                .bind(coordinates.latitude().as_f64())
                .bind(coordinates.longitude().as_f64())
                .bind(created_at_secs)
                .bind(created_at_nsecs)
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            if done.rows_affected() != 1 {
                return Err(DbError::BackendError(format!(
                    "Insertion affected {} rows",
                    done.rows_affected()
                )));
            }
            done.last_insert_rowid()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    SchoolId::new(id).map_err(|e| DbError::DataIntegrityError(e.to_string()))
}

/// Gets all registered schools in insertion order.
pub async fn get_schools(ex: &mut Executor) -> DbResult<Vec<School>> {
    let mut schools = vec![];
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM schools ORDER BY id";
            let mut rows = sqlx::query(query_str).fetch(ex.conn());
            while let Some(row) = rows.try_next().await.map_err(postgres::map_sqlx_error)? {
                schools.push(School::try_from(row)?);
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM schools ORDER BY id";
            let mut rows = sqlx::query(query_str).fetch(ex.conn());
            while let Some(row) = rows.try_next().await.map_err(sqlite::map_sqlx_error)? {
                schools.push(School::try_from(row)?);
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    Ok(schools)
}
