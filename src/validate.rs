//! Form input validation.
//!
//! Pure and synchronous — called before any mutation is dispatched. A
//! failed check blocks the gateway call entirely; errors are field-scoped
//! so the form can render them inline under the offending input.

pub const TITLE_MAX: usize = 200;
pub const DESCRIPTION_MAX: usize = 1000;

pub const ERR_TITLE_REQUIRED: &str = "Title is required";
pub const ERR_TITLE_TOO_LONG: &str = "Title must be less than 200 characters";
pub const ERR_DESCRIPTION_TOO_LONG: &str = "Description must be less than 1000 characters";

/// Per-field error messages. `None` means the field passed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub title: Option<&'static str>,
    pub description: Option<&'static str>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

/// Validated, normalized form values ready for the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidInput {
    pub title: String,
    /// Empty-after-trim collapses to `None`.
    pub description: Option<String>,
}

/// Check a title/description pair against the form rules:
/// title trimmed, required, at most 200 chars; description trimmed,
/// optional, at most 1000 chars.
pub fn validate(title: &str, description: &str) -> Result<ValidInput, FieldErrors> {
    let title = title.trim();
    let description = description.trim();

    let mut errors = FieldErrors::default();
    if title.is_empty() {
        errors.title = Some(ERR_TITLE_REQUIRED);
    } else if title.chars().count() > TITLE_MAX {
        errors.title = Some(ERR_TITLE_TOO_LONG);
    }
    if description.chars().count() > DESCRIPTION_MAX {
        errors.description = Some(ERR_DESCRIPTION_TOO_LONG);
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidInput {
        title: title.to_owned(),
        description: if description.is_empty() {
            None
        } else {
            Some(description.to_owned())
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_title_is_required() {
        let err = validate("", "").unwrap_err();
        assert_eq!(err.title, Some(ERR_TITLE_REQUIRED));
        assert!(err.description.is_none());
    }

    #[test]
    fn whitespace_title_is_required() {
        let err = validate("   ", "").unwrap_err();
        assert_eq!(err.title, Some(ERR_TITLE_REQUIRED));
    }

    #[test]
    fn title_of_201_chars_rejected() {
        let title = "x".repeat(201);
        let err = validate(&title, "").unwrap_err();
        assert_eq!(err.title, Some(ERR_TITLE_TOO_LONG));
    }

    #[test]
    fn title_of_200_chars_accepted() {
        let title = "x".repeat(200);
        assert!(validate(&title, "").is_ok());
    }

    #[test]
    fn description_of_1001_chars_rejected() {
        let description = "d".repeat(1001);
        let err = validate("ok", &description).unwrap_err();
        assert_eq!(err.description, Some(ERR_DESCRIPTION_TOO_LONG));
        assert!(err.title.is_none());
    }

    #[test]
    fn both_fields_can_fail_at_once() {
        let err = validate("", &"d".repeat(1001)).unwrap_err();
        assert_eq!(err.title, Some(ERR_TITLE_REQUIRED));
        assert_eq!(err.description, Some(ERR_DESCRIPTION_TOO_LONG));
    }

    #[test]
    fn trims_and_normalizes() {
        let input = validate("  Buy milk  ", "   ").unwrap();
        assert_eq!(input.title, "Buy milk");
        assert!(input.description.is_none());

        let input = validate("Buy milk", "  from the corner shop ").unwrap();
        assert_eq!(input.description.as_deref(), Some("from the corner shop"));
    }

    // Limits are measured in characters, not bytes.
    #[test]
    fn multibyte_title_counts_chars() {
        let title = "ß".repeat(200);
        assert!(validate(&title, "").is_ok());
    }
}
