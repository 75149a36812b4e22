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

//! Sources of the current time.
//!
//! Clocks hand out the timestamps that services record as creation times, so they are limited
//! to the microsecond resolution that PostgreSQL `TIMESTAMPTZ` columns can hold.  Any finer
//! detail would be lost on the first database round trip and values read back would no longer
//! compare equal to the ones that were written.

use time::OffsetDateTime;

/// Generic definition of a clock.
pub trait Clock {
    /// Returns the current UTC time.
    fn now_utc(&self) -> OffsetDateTime;
}

/// Drops the sub-microsecond part of `ts`.
pub fn truncate_to_micros(ts: OffsetDateTime) -> OffsetDateTime {
    ts.replace_microsecond(ts.microsecond())
        .expect("microseconds come from a valid timestamp so they must be in range")
}

/// Clock implementation that uses the system clock.
#[derive(Clone, Default)]
pub struct SystemClock {}

impl Clock for SystemClock {
    fn now_utc(&self) -> OffsetDateTime {
        truncate_to_micros(OffsetDateTime::now_utc())
    }
}

/// Test utilities.
#[cfg(any(test, feature = "testutils"))]
pub mod testutils {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Ensures that `ts` has no sub-microsecond part.
    fn check_micros(ts: OffsetDateTime) -> OffsetDateTime {
        assert_eq!(ts, truncate_to_micros(ts), "Sub-microsecond precision not supported");
        ts
    }

    /// A clock that returns a preconfigured instant and that can be modified at will.
    pub struct SettableClock {
        /// Instant returned by `now_utc`.
        now: Mutex<OffsetDateTime>,
    }

    impl SettableClock {
        /// Creates a new clock that returns `now` until reconfigured with `set`.
        pub fn new(now: OffsetDateTime) -> Self {
            Self { now: Mutex::new(check_micros(now)) }
        }

        /// Sets the new value of `now` that the clock returns.
        pub fn set(&self, now: OffsetDateTime) {
            let now = check_micros(now);
            *self.now.lock().unwrap() = now;
        }

        /// Advances the current time by `delta`.
        pub fn advance(&self, delta: Duration) {
            assert!(delta.subsec_nanos() % 1000 == 0, "Sub-microsecond precision not supported");
            *self.now.lock().unwrap() += delta;
        }
    }

    impl Clock for SettableClock {
        fn now_utc(&self) -> OffsetDateTime {
            *self.now.lock().unwrap()
        }
    }

}
