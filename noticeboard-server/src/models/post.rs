//! Post title validation
//!
//! Titles are trimmed before anything else looks at them; a post with an
//! empty or whitespace-only title never reaches the database.

use super::ValidationError;

/// Maximum title length, matching the VARCHAR(255) column.
const MAX_TITLE_LEN: usize = 255;

/// Validated, trimmed post title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTitle(String);

impl PostTitle {
    /// Create a post title, trimming surrounding whitespace.
    ///
    /// # Rules
    /// - Must be non-empty after trimming
    /// - Max 255 characters
    ///
    /// # Example
    /// ```
    /// use noticeboard_server::models::PostTitle;
    ///
    /// assert_eq!(PostTitle::new("  hello  ").unwrap().as_str(), "hello");
    /// assert!(PostTitle::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "Title" });
        }

        if trimmed.len() > MAX_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "Title",
                max: MAX_TITLE_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Get the title as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for PostTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_whitespace() {
        let title = PostTitle::new("  my first post \n").unwrap();
        assert_eq!(title.as_str(), "my first post");
    }

    #[test]
    fn rejects_empty() {
        let err = PostTitle::new("").unwrap_err();
        assert!(matches!(err, ValidationError::Empty { .. }));
    }

    #[test]
    fn rejects_whitespace_only() {
        let err = PostTitle::new("   ").unwrap_err();
        assert!(matches!(err, ValidationError::Empty { .. }));
        let err = PostTitle::new("\t\n").unwrap_err();
        assert!(matches!(err, ValidationError::Empty { .. }));
    }

    #[test]
    fn max_length() {
        let title_255 = "a".repeat(255);
        assert!(PostTitle::new(&title_255).is_ok());

        let title_256 = "a".repeat(256);
        let err = PostTitle::new(&title_256).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 255, .. }));
    }

    #[test]
    fn length_checked_after_trim() {
        let padded = format!("  {}  ", "a".repeat(255));
        assert!(PostTitle::new(&padded).is_ok());
    }
}
