//! Provider-assigned price identifiers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PriceId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceIdError {
    /// The input string is empty.
    #[error("price id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("price id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character Stripe never issues in identifiers.
    #[error("price id contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Identifier of a sellable price (e.g. `price_1Hh1JdLkdIwHu7ix`).
///
/// The same identifier is used to render the catalog, key cart entries and
/// build checkout line items. The provider looks the amount up from it, so
/// it is the only price reference that ever leaves the storefront.
///
/// ## Constraints
///
/// - Length: 1-255 characters
/// - ASCII letters, digits and `_` only
///
/// ## Examples
///
/// ```
/// use price_cart_core::PriceId;
///
/// assert!(PriceId::parse("price_1Hh1JdLkdIwHu7ix").is_ok());
/// assert!(PriceId::parse("").is_err());
/// assert!(PriceId::parse("price 1").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PriceId(String);

impl PriceId {
    /// Maximum length of a price identifier.
    pub const MAX_LENGTH: usize = 255;

    /// Parse a `PriceId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 255 characters,
    /// or contains anything other than ASCII alphanumerics and `_`.
    pub fn parse(s: &str) -> Result<Self, PriceIdError> {
        if s.is_empty() {
            return Err(PriceIdError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(PriceIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
            return Err(PriceIdError::InvalidCharacter(c));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `PriceId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PriceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PriceId {
    type Err = PriceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PriceId {
    type Error = PriceIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PriceId> for String {
    fn from(id: PriceId) -> Self {
        id.0
    }
}

impl AsRef<str> for PriceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
