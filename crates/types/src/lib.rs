//! Validated primitive types shared across the tracker crates.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The trimmed input exceeded the allowed number of characters
    #[error("Text cannot exceed {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Arguments
    ///
    /// * `input` - Any string-like value to validate.
    ///
    /// # Returns
    ///
    /// A `NonEmptyText` holding the trimmed input.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the input is empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Creates a new `NonEmptyText` that is at most `max` characters long after trimming.
    ///
    /// # Arguments
    ///
    /// * `input` - Any string-like value to validate.
    /// * `max` - The largest allowed length, counted in characters rather than bytes.
    ///
    /// # Returns
    ///
    /// A `NonEmptyText` holding the trimmed input.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` for blank input, or `TextError::TooLong` when the trimmed
    /// input has more than `max` characters.
    pub fn with_max_len(input: impl AsRef<str>, max: usize) -> Result<Self, TextError> {
        let text = Self::new(input)?;
        let actual = text.0.chars().count();
        if actual > max {
            return Err(TextError::TooLong { max, actual });
        }
        Ok(text)
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_whitespace() {
        let text = NonEmptyText::new("  Pune  ").expect("should accept padded text");
        assert_eq!(text.as_str(), "Pune");
    }

    #[test]
    fn test_new_rejects_blank_input() {
        assert_eq!(NonEmptyText::new("   "), Err(TextError::Empty));
        assert_eq!(NonEmptyText::new(""), Err(TextError::Empty));
    }

    #[test]
    fn test_with_max_len_counts_characters_not_bytes() {
        // Four characters, twelve bytes.
        let text = NonEmptyText::with_max_len("पुणे", 4).expect("should fit in four characters");
        assert_eq!(text.as_str(), "पुणे");

        let err = NonEmptyText::with_max_len("Mumbai", 3).expect_err("should be too long");
        assert_eq!(err, TextError::TooLong { max: 3, actual: 6 });
    }

    #[test]
    fn test_deserialize_rejects_empty_string() {
        let err = serde_json::from_str::<NonEmptyText>("\"  \"");
        assert!(err.is_err(), "blank JSON string should not deserialize");

        let ok: NonEmptyText = serde_json::from_str("\"Kerala\"").expect("should deserialize");
        assert_eq!(ok.to_string(), "Kerala");
    }
}
