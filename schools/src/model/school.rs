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

//! The `School` entity and its attributes.

use crate::model::Coordinates;
use derive_getters::Getters;
use schools_core::model::{ModelError, ModelResult};
use serde::de::Visitor;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Maximum length of the textual attributes of a school as specified in the schema.
pub(crate) const SCHOOLS_MAX_TEXT_LENGTH: usize = 255;

/// Identifier of a school as assigned by the database.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct SchoolId(i64);

impl SchoolId {
    /// Creates a new identifier from an untrusted `id`, making sure it is positive.
    pub fn new(id: i64) -> ModelResult<Self> {
        if id <= 0 {
            return Err(ModelError(format!("Invalid school id {}: must be positive", id)));
        }
        Ok(Self(id))
    }

    /// Returns the numeric value of the identifier.
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

/// Trims `s` and ensures the result is a valid textual attribute called `what`.
fn validate_text(s: String, what: &str) -> ModelResult<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ModelError(format!("{} is required", what)));
    }
    if trimmed.chars().count() > SCHOOLS_MAX_TEXT_LENGTH {
        return Err(ModelError(format!(
            "{} is too long (at most {} characters)",
            what, SCHOOLS_MAX_TEXT_LENGTH
        )));
    }
    Ok(trimmed.to_owned())
}

/// The name of a school, trimmed and never empty.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SchoolName(String);

impl SchoolName {
    /// Creates a new name from an untrusted string `s`, making sure it is valid.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        validate_text(s.into(), "School name").map(Self)
    }

    /// Returns a string view of the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The postal address of a school, trimmed and never empty.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Creates a new address from an untrusted string `s`, making sure it is valid.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        validate_text(s.into(), "Address").map(Self)
    }

    /// Returns a string view of the address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A deserialization visitor for the textual attributes of a school.
struct TextVisitor<T>(fn(String) -> ModelResult<T>);

impl<T> Visitor<'_> for TextVisitor<T> {
    type Value = T;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        (self.0)(v.to_owned()).map_err(|e| E::custom(e.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        (self.0)(v).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for SchoolName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_string(TextVisitor(SchoolName::new::<String>))
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_string(TextVisitor(Address::new::<String>))
    }
}

/// A registered school.
#[derive(Clone, Debug, Getters, PartialEq)]
pub struct School {
    /// Identifier assigned by the database on insertion.
    id: SchoolId,

    /// Name of the school.
    name: SchoolName,

    /// Postal address of the school.
    address: Address,

    /// Location of the school.
    coordinates: Coordinates,

    /// Time at which the school was registered.
    created_at: OffsetDateTime,
}

impl School {
    /// Creates a new school from its already-validated attributes.
    pub fn new(
        id: SchoolId,
        name: SchoolName,
        address: Address,
        coordinates: Coordinates,
        created_at: OffsetDateTime,
    ) -> Self {
        Self { id, name, address, coordinates, created_at }
    }
}

/// A school annotated with its distance to a reference point.
#[derive(Clone, Debug, Getters, PartialEq)]
pub struct NearbySchool {
    /// The school itself.
    school: School,

    /// Great-circle distance to the reference point, in kilometers.
    distance_km: f64,
}

impl NearbySchool {
    /// Creates a new annotated school.
    pub fn new(school: School, distance_km: f64) -> Self {
        Self { school, distance_km }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{Token, assert_de_tokens_error, assert_tokens};

    #[test]
    fn test_school_id() {
        assert_eq!(1, SchoolId::new(1).unwrap().as_i64());
        assert_eq!(i64::MAX, SchoolId::new(i64::MAX).unwrap().as_i64());
        assert!(SchoolId::new(0).is_err());
        assert!(SchoolId::new(-5).is_err());
    }

    #[test]
    fn test_school_name_ok() {
        assert_eq!("Alpha", SchoolName::new("Alpha").unwrap().as_str());
        assert_eq!("Alpha High", SchoolName::new("  Alpha High\t\n").unwrap().as_str());
    }

    #[test]
    fn test_school_name_errors() {
        assert_eq!(
            ModelError("School name is required".to_owned()),
            SchoolName::new("").unwrap_err()
        );
        assert_eq!(
            ModelError("School name is required".to_owned()),
            SchoolName::new(" \t ").unwrap_err()
        );

        let mut long_name = "x".repeat(SCHOOLS_MAX_TEXT_LENGTH);
        assert!(SchoolName::new(long_name.clone()).is_ok());
        assert!(SchoolName::new(format!("  {}  ", long_name)).is_ok());
        long_name.push('x');
        assert!(SchoolName::new(long_name).unwrap_err().0.contains("too long"));
    }

    #[test]
    fn test_text_length_counts_characters() {
        let name = "\u{00e9}".repeat(SCHOOLS_MAX_TEXT_LENGTH);
        assert!(name.len() > SCHOOLS_MAX_TEXT_LENGTH);
        assert!(Address::new(name).is_ok());
    }

    #[test]
    fn test_address_errors() {
        assert_eq!(ModelError("Address is required".to_owned()), Address::new("   ").unwrap_err());
        assert!(Address::new("a".repeat(256)).unwrap_err().0.starts_with("Address is too long"));
    }

    #[test]
    fn test_school_name_ser_de_ok() {
        assert_tokens(&SchoolName::new("Alpha").unwrap(), &[Token::String("Alpha")]);
        assert_tokens(&Address::new("1 Main St").unwrap(), &[Token::Str("1 Main St")]);
    }

    #[test]
    fn test_school_name_de_error() {
        assert_de_tokens_error::<SchoolName>(&[Token::String("  ")], "School name is required");
        assert_de_tokens_error::<Address>(
            &[Token::I64(5)],
            "invalid type: integer `5`, expected a string",
        );
    }
}
