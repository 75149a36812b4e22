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

//! Shared building blocks for the schools service.
//!
//! The service crate is organized in layers, each one only talking to the one right below it:
//!
//! 1.  `model`: domain types that validate their contents when built, so that an invalid
//!     latitude or an empty school name cannot exist past the boundaries of the program.
//!
//! 1.  `db`: free functions that take an `Executor` and issue the queries, once per supported
//!     database system.  PostgreSQL backs production deployments and SQLite backs the tests.
//!
//! 1.  `driver`: the business logic, exposed as methods of a cloneable `Driver` that holds the
//!     injected database and clock.
//!
//! 1.  `rest`: the HTTP handlers, one file per API, assembled into an `axum::Router`.
//!
//! 1.  `main`: reads the configuration from the environment and starts serving.
//!
//! This crate provides the parts of those layers that are not specific to schools.  Every layer
//! has its own error type and `From` conversions between them, so errors bubble up with `?` until
//! the REST layer turns them into a status code and a JSON body.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

pub mod clocks;
pub mod db;
pub mod driver;
pub mod env;
pub mod model;
pub mod rest;
