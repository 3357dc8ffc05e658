//! Card type attributes (grade, genre) and issuance validation.
//!
//! Grades and genres are stored as upper-case TEXT columns guarded by CHECK
//! constraints; these enums are the typed view of the same value sets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length of a card name, in characters.
pub const MAX_NAME_LEN: usize = 30;

/// Maximum length of a card description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Maximum number of units a single card type may be issued with.
pub const MAX_TOTAL_ISSUED: i32 = 100;

/// Rarity grade of a card type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Grade {
    Common,
    Rare,
    SuperRare,
    Legendary,
}

impl Grade {
    pub const ALL: [Grade; 4] = [
        Grade::Common,
        Grade::Rare,
        Grade::SuperRare,
        Grade::Legendary,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::Common => "COMMON",
            Grade::Rare => "RARE",
            Grade::SuperRare => "SUPER_RARE",
            Grade::Legendary => "LEGENDARY",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grade::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Invalid grade '{s}'")))
    }
}

/// Genre of a card type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Genre {
    Kpop,
    Actor,
    Esports,
    Kbo,
    Animation,
}

impl Genre {
    pub const ALL: [Genre; 5] = [
        Genre::Kpop,
        Genre::Actor,
        Genre::Esports,
        Genre::Kbo,
        Genre::Animation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Genre::Kpop => "KPOP",
            Genre::Actor => "ACTOR",
            Genre::Esports => "ESPORTS",
            Genre::Kbo => "KBO",
            Genre::Animation => "ANIMATION",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Invalid genre '{s}'")))
    }
}

/// Validate the user-supplied fields of a new card type.
pub fn validate_new_card(
    name: &str,
    description: Option<&str>,
    price: i64,
    total_issued: i32,
) -> Result<(), CoreError> {
    let name_len = name.trim().chars().count();
    if name_len == 0 || name_len > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Card name must be 1 to {MAX_NAME_LEN} characters"
        )));
    }
    if let Some(desc) = description {
        if desc.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(CoreError::Validation(format!(
                "Description must be at most {MAX_DESCRIPTION_LEN} characters"
            )));
        }
    }
    validate_price(price)?;
    if !(1..=MAX_TOTAL_ISSUED).contains(&total_issued) {
        return Err(CoreError::Validation(format!(
            "Total count must be between 1 and {MAX_TOTAL_ISSUED}"
        )));
    }
    Ok(())
}

/// Prices are whole points and never negative.
pub fn validate_price(price: i64) -> Result<(), CoreError> {
    if price < 0 {
        return Err(CoreError::InvalidData("Price must not be negative".into()));
    }
    Ok(())
}
