/// Errors that can occur when creating validated identity types.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The input was empty or contained only whitespace
    #[error("Identity document cannot be empty")]
    Empty,
    /// The input exceeded the maximum accepted length
    #[error("Identity document exceeds {} characters", MAX_IDENTITY_LEN)]
    TooLong,
    /// The input contained characters outside the accepted set
    #[error("Identity document may only contain ASCII letters and digits")]
    InvalidCharacter,
}

/// Maximum accepted length for a national identity document number.
pub const MAX_IDENTITY_LEN: usize = 16;

/// A national identity document number (DNI or equivalent).
///
/// This type wraps a `String` and guarantees a trimmed, non-empty value of
/// bounded length made up of ASCII letters and digits. It deliberately does not
/// encode any country-specific check-digit rules; those belong to the issuing
/// registry, not to this system.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    /// Creates a new `Identity` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace before
    /// validation.
    ///
    /// # Arguments
    ///
    /// * `input` - Any type that can be converted to a string reference
    ///
    /// # Returns
    ///
    /// Returns `Ok(Identity)` if the trimmed input is non-empty, within the
    /// length bound, and contains only ASCII letters and digits; otherwise the
    /// matching `IdentityError` variant.
    pub fn new(input: impl AsRef<str>) -> Result<Self, IdentityError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdentityError::Empty);
        }
        if trimmed.len() > MAX_IDENTITY_LEN {
            return Err(IdentityError::TooLong);
        }
        if !trimmed.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(IdentityError::InvalidCharacter);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Identity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Identity::new(s)
    }
}

impl serde::Serialize for Identity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Identity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Identity::new(&s).map_err(serde::de::Error::custom)
    }
}
