//! IMDb identifiers: a two-letter prefix followed by digits.
//!
//! Only the digits are stored; the prefix is re-attached on display and
//! serialization so `nm0000138` round-trips through JSON unchanged.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

use crate::error::CastrankError;

lazy_static! {
    /// Anything shaped like an identifier, whatever the prefix
    static ref IDENTIFIER_SHAPE: Regex = Regex::new(r"^[A-Za-z]{2}\d+$").unwrap();
}

pub const PERSON_PREFIX: &str = "nm";
pub const TITLE_PREFIX: &str = "tt";

const TITLE_URL_BASE: &str = "https://www.imdb.com/title/";

/// True when `raw` looks like an identifier (`xx12345`), not a free-text name.
pub fn looks_like_identifier(raw: &str) -> bool {
    IDENTIFIER_SHAPE.is_match(raw.trim())
}

fn digits_after<'a>(raw: &'a str, prefix: &str) -> Option<&'a str> {
    let digits = raw.strip_prefix(prefix)?;
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Some(digits)
    } else {
        None
    }
}

macro_rules! imdb_id {
    ($(#[$meta:meta])* $name:ident, $prefix:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse the prefixed form, e.g. `nm0000138`.
            pub fn parse(raw: &str) -> Result<Self, CastrankError> {
                digits_after(raw.trim(), $prefix)
                    .map(|digits| Self(digits.to_string()))
                    .ok_or_else(|| CastrankError::InvalidIdentifier(raw.trim().to_string()))
            }

            /// Build from the bare digits a provider hands back.
            pub fn from_digits(digits: &str) -> Result<Self, CastrankError> {
                Self::parse(&format!("{}{}", $prefix, digits.trim()))
            }

            /// Identifier without its prefix, as most provider lookups expect it
            pub fn digits(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = CastrankError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.to_string()
            }
        }
    };
}

imdb_id!(
    /// Person identifier (`nm` prefix)
    PersonId,
    PERSON_PREFIX
);

imdb_id!(
    /// Title identifier (`tt` prefix)
    TitleId,
    TITLE_PREFIX
);

impl TitleId {
    /// Canonical public page for the title
    pub fn imdb_url(&self) -> String {
        format!("{}{}/", TITLE_URL_BASE, self)
    }
}
