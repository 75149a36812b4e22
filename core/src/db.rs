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

//! Persistence primitives shared by all services.
//!
//! Services talk to PostgreSQL in production and to an in-memory SQLite database in tests.  The
//! `Db` trait hides which of the two is in use from the business logic, but queries still need
//! to be written for each system because `sqlx` is statically typed on the backend: the
//! `Executor` enum carries the typed connection and service code matches on it.

use crate::model::ModelError;
use async_trait::async_trait;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

/// Database errors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DbError {
    /// The backend failed in a way we do not classify any further.
    #[error("Database error: {0}")]
    BackendError(String),

    /// Data read back from the database does not satisfy the invariants of the model.
    #[error("Data integrity error: {0}")]
    DataIntegrityError(String),

    /// The queried entity does not exist.
    #[error("Entity not found")]
    NotFound,

    /// No connection could be obtained, typically because the pool is exhausted or timed out.
    #[error("Unavailable")]
    Unavailable,
}

/// Model validation only fails at this layer when rows contain values that could never have
/// been written through the model types.
impl From<ModelError> for DbError {
    fn from(e: ModelError) -> Self {
        DbError::DataIntegrityError(e.to_string())
    }
}

/// Result type for this module.
pub type DbResult<T> = Result<T, DbError>;

/// Typed connection to one of the supported database systems.
///
/// The connection may come straight from the pool or belong to an open transaction.
pub enum Executor {
    /// Connection to PostgreSQL.
    #[cfg(feature = "postgres")]
    Postgres(postgres::PostgresExecutor),

    /// Connection to SQLite.
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite::SqliteExecutor),
}

/// An `Executor` that belongs to an open transaction.
///
/// Dropping it without calling `commit` rolls the transaction back.
pub struct TxExecutor(Executor);

impl TxExecutor {
    /// Returns the executor to issue queries within the transaction.
    pub fn ex(&mut self) -> &mut Executor {
        &mut self.0
    }

    /// Commits the transaction, consuming it.
    pub async fn commit(self) -> DbResult<()> {
        match self.0 {
            #[cfg(feature = "postgres")]
            Executor::Postgres(e) => e.commit().await,

            #[cfg(feature = "sqlite")]
            Executor::Sqlite(e) => e.commit().await,
        }
    }
}

/// Handle to a database connection pool.
#[async_trait]
pub trait Db {
    /// Obtains an executor that runs every query outside of any transaction.
    async fn ex(&self) -> DbResult<Executor>;

    /// Begins a new transaction.
    async fn begin(&self) -> DbResult<TxExecutor>;

    /// Closes the pool once all of its connections have been returned.
    ///
    /// Must be called before dropping the database.  Any later attempt to obtain an executor fails.
    async fn close(&self);
}

/// Macros to run the same tests against every database system.
#[cfg(any(test, feature = "testutils"))]
pub mod testutils {
    pub use paste::paste;

    /// Instantiates the `module::name` test function against the database returned by `setup`.
    ///
    /// The optional `extra` attribute is attached to the generated test, which is useful to
    /// `#[ignore]` tests that need external services.
    #[macro_export]
    macro_rules! generate_one_test [
        ( $name:ident, $setup:expr, $module:path $(, #[$extra:meta] )? ) => {
            #[tokio::test]
            $(#[$extra])?
            async fn $name() {
                $crate::db::testutils::paste! {
                    $module :: [< $name >]($setup).await;
                }
            }
        }
    ];

    pub use generate_one_test;

    /// Instantiates every `name` test function of `module` against the database returned by
    /// `setup`, which must already contain the schema the tests expect.
    #[macro_export]
    macro_rules! generate_tests [
        ( #[$extra:meta], $setup:expr, $module:path $(, $name:ident)+ ) => {
            $(
                $crate::db::testutils::generate_one_test!($name, $setup, $module, #[$extra]);
            )+
        };

        ( $setup:expr, $module:path $(, $name:ident)+ ) => {
            $(
                $crate::db::testutils::generate_one_test!($name, $setup, $module);
            )+
        };
    ];

    pub use generate_tests;
}
