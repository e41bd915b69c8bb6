use derive_more::{AsRef, Display};
use serde::Serialize;

use crate::GymError;

const MIN_LENGTH: usize = 3;

/// Full name of a member or guest: letters and spaces only, surrounding whitespace removed.
#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Name(String);

impl Name {
    pub fn new(value: &str) -> Result<Self, NameError> {
        let value = value.trim();
        let length = value.chars().count();

        match length {
            0 => Err(NameError::Empty),
            1..MIN_LENGTH => Err(NameError::TooShort(length)),
            _ => match value
                .chars()
                .find(|c| !c.is_alphabetic() && !c.is_whitespace())
            {
                Some(c) => Err(NameError::InvalidCharacter(c)),
                None => Ok(Name(value.to_string())),
            },
        }
    }

    /// Case-insensitive substring match.
    #[must_use]
    pub fn contains(&self, fragment: &str) -> bool {
        self.0.to_lowercase().contains(&fragment.to_lowercase())
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("must not be empty")]
    Empty,
    #[error("must have at least 3 characters, got {0}")]
    TooShort(usize),
    #[error("must contain only letters and spaces, found '{0}'")]
    InvalidCharacter(char),
}

impl From<NameError> for GymError {
    fn from(value: NameError) -> Self {
        GymError::invalid_data("name", value.to_string())
    }
}
