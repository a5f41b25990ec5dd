// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Access to environment-provided settings.
//!
//! Everything that reads configuration from the process environment goes through the
//! [`Environment`] trait so that tests can substitute a [`MapEnvironment`].

use std::str::FromStr;

mod map;

pub mod env_const;

pub use map::MapEnvironment;

pub trait Environment: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Get a value, treating an empty string the same as an absent variable.
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key).filter(|value| !value.trim().is_empty())
    }

    fn get_parsed<T>(&self, key: &'static str) -> Result<Option<T>, EnvError>
    where
        Self: Sized,
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_non_empty(key) {
            Some(value) => value
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|e| EnvError::InvalidValue {
                    key,
                    value,
                    message: e.to_string(),
                }),
            None => Ok(None),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("Invalid value for {key}: {value} ({message})")]
    InvalidValue {
        key: &'static str,
        value: String,
        message: String,
    },
}

pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}
