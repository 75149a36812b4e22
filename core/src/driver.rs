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

//! Error types for the business logic layer.
//!
//! Services define their own `Driver` with the injected dependencies and implement each
//! operation as a method, for example:
//!
//! ```rust
//! use schools_core::clocks::Clock;
//! use schools_core::db::Db;
//! use std::sync::Arc;
//!
//! #[derive(Clone)]
//! pub struct Driver {
//!     /// Where schools are persisted.
//!     db: Arc<dyn Db + Send + Sync>,
//!
//!     /// Source of creation timestamps.
//!     clock: Arc<dyn Clock + Send + Sync>,
//! }
//! ```
//!
//! Operations take `self` by value.  Each one runs to completion on its own, opening and
//! committing its transaction if it needs one, and a caller that wants to issue two of them has to
//! clone the driver explicitly.

use crate::db::DbError;

/// Business logic errors.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DriverError {
    /// The database failed or returned data that cannot be trusted.
    #[error("{0}")]
    BackendError(String),

    /// The requested entity does not exist.
    #[error("{0}")]
    NotFound(String),
}

impl From<DbError> for DriverError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::BackendError(_) => DriverError::BackendError(e.to_string()),
            DbError::DataIntegrityError(_) => DriverError::BackendError(e.to_string()),
            DbError::NotFound => DriverError::NotFound(e.to_string()),
            DbError::Unavailable => DriverError::BackendError(e.to_string()),
        }
    }
}

/// Result type for this module.
pub type DriverResult<T> = Result<T, DriverError>;
