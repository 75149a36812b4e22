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

//! Geographic coordinates and the distance between them.

use schools_core::model::{ModelError, ModelResult};
use serde::de::Visitor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mean radius of the Earth used for distance computations.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Generates a newtype over `f64` that only holds finite values within `[-$max, $max]`.
///
/// The generated type deserializes from either a number or a string containing a number.
macro_rules! bounded_degrees [
    ( $name:ident, $what:literal, $max:literal ) => {
        #[doc = concat!("A ", $what, " in degrees, guaranteed to be within [-", stringify!($max),
                        ", ", stringify!($max), "].")]
        #[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize)]
        #[serde(transparent)]
        pub struct $name(f64);

        impl $name {
            #[doc = concat!("Creates a new ", $what, " from an untrusted `value`.")]
            pub fn new(value: f64) -> ModelResult<Self> {
                if !value.is_finite() {
                    return Err(ModelError(format!(
                        concat!("Invalid ", $what, " {}: must be a finite number"),
                        value
                    )));
                }
                if !(-$max..=$max).contains(&value) {
                    return Err(ModelError(format!(
                        concat!("Invalid ", $what, " {}: must be between -{} and {}"),
                        value, $max, $max
                    )));
                }
                Ok(Self(value))
            }

            #[doc = concat!("Returns the ", $what, " in degrees.")]
            pub fn as_f64(self) -> f64 {
                self.0
            }
        }

        impl FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> ModelResult<Self> {
                match s.trim().parse::<f64>() {
                    Ok(value) => Self::new(value),
                    Err(e) => {
                        Err(ModelError(format!(concat!("Invalid ", $what, " '{}': {}"), s, e)))
                    }
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                deserializer.deserialize_any(DegreesVisitor::<$name>::new($what))
            }
        }

        impl TryFrom<f64> for $name {
            type Error = ModelError;

            fn try_from(value: f64) -> ModelResult<Self> {
                Self::new(value)
            }
        }
    }
];

bounded_degrees!(Latitude, "latitude", 90.0);
bounded_degrees!(Longitude, "longitude", 180.0);

/// A deserialization visitor for the bounded degree types.
struct DegreesVisitor<T> {
    /// Name of the quantity being parsed, for error messages.
    what: &'static str,

    /// Marker for the type being built.
    _type: std::marker::PhantomData<T>,
}

impl<T> DegreesVisitor<T> {
    /// Creates a new visitor for a quantity called `what`.
    fn new(what: &'static str) -> Self {
        Self { what, _type: std::marker::PhantomData }
    }
}

impl<T> Visitor<'_> for DegreesVisitor<T>
where
    T: TryFrom<f64, Error = ModelError> + FromStr<Err = ModelError>,
{
    type Value = T;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a {} as a number or a numeric string", self.what)
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        T::try_from(v).map_err(|e| E::custom(e.to_string()))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        self.visit_f64(v as f64)
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        self.visit_f64(v as f64)
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        T::from_str(v).map_err(|e| E::custom(e.to_string()))
    }
}

/// A validated point on the surface of the Earth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    /// North-south position.
    latitude: Latitude,

    /// East-west position.
    longitude: Longitude,
}

impl Coordinates {
    /// Creates a new point from already-validated components.
    pub fn new(latitude: Latitude, longitude: Longitude) -> Self {
        Self { latitude, longitude }
    }

    /// Creates a new point from untrusted raw degrees.
    pub fn from_degrees(latitude: f64, longitude: f64) -> ModelResult<Self> {
        Ok(Self::new(Latitude::new(latitude)?, Longitude::new(longitude)?))
    }

    /// Returns the latitude of the point.
    pub fn latitude(&self) -> Latitude {
        self.latitude
    }

    /// Returns the longitude of the point.
    pub fn longitude(&self) -> Longitude {
        self.longitude
    }

    /// Computes the great-circle distance in kilometers between this point and `other`.
    ///
    /// Uses the spherical law of cosines.  The cosine of the central angle is clamped to [-1, 1]
    /// so that rounding errors on (nearly) identical or antipodal points cannot produce NaN.
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        let lat1 = self.latitude.as_f64().to_radians();
        let lat2 = other.latitude.as_f64().to_radians();
        let delta_lng =
            other.longitude.as_f64().to_radians() - self.longitude.as_f64().to_radians();

        let cos_angle = lat1.cos() * lat2.cos() * delta_lng.cos() + lat1.sin() * lat2.sin();
        EARTH_RADIUS_KM * cos_angle.clamp(-1.0, 1.0).acos()
    }
}
