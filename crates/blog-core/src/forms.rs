//! Reader-submitted forms and their structural validation.
//!
//! Every form is trimmed before it is validated, so whitespace-only input
//! counts as missing.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::error::FieldErrors;

/// Comment submission on a post's detail page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CommentForm {
    #[validate(length(min = 1, max = 80, message = "Name is required and may not exceed 80 characters."))]
    pub name: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub body: String,
}

impl CommentForm {
    pub fn cleaned(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            body: self.body.trim().to_string(),
        }
    }
}

/// Recommend-by-email form. Missing fields deserialize as empty and are
/// reported by validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct EmailPostForm {
    #[validate(length(min = 1, max = 25, message = "Name is required and may not exceed 25 characters."))]
    pub name: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub to: String,
    pub comments: String,
}

impl EmailPostForm {
    pub fn cleaned(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            to: self.to.trim().to_string(),
            comments: self.comments.trim().to_string(),
        }
    }
}

/// Trim, validate, and hand back the cleaned form or its field errors.
pub fn clean<F, C>(form: F, cleaner: C) -> Result<F, FieldErrors>
where
    F: Validate,
    C: FnOnce(F) -> F,
{
    let form = cleaner(form);
    match form.validate() {
        Ok(()) => Ok(form),
        Err(errors) => Err(field_errors(&errors)),
    }
}

/// Flatten validator output into field name -> messages.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid value ({})", e.code),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(name: &str, email: &str, body: &str) -> CommentForm {
        CommentForm {
            name: name.into(),
            email: email.into(),
            body: body.into(),
        }
    }

    #[test]
    fn valid_comment_is_trimmed() {
        let form = clean(comment("  Ann ", " ann@example.com ", " Nice "), CommentForm::cleaned)
            .unwrap();
        assert_eq!(form.name, "Ann");
        assert_eq!(form.email, "ann@example.com");
        assert_eq!(form.body, "Nice");
    }

    #[test]
    fn invalid_email_is_reported_on_its_field() {
        let errors = clean(comment("Ann", "not-an-email", "Nice"), CommentForm::cleaned)
            .unwrap_err();
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["email"]);
        assert_eq!(errors["email"], vec!["Enter a valid email address.".to_string()]);
    }

    #[test]
    fn blank_body_and_long_name_are_rejected() {
        let errors = clean(comment(&"x".repeat(81), "ann@example.com", "   "), CommentForm::cleaned)
            .unwrap_err();
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("body"));
    }

    #[test]
    fn name_of_exactly_eighty_chars_is_accepted() {
        assert!(clean(comment(&"x".repeat(80), "ann@example.com", "ok"), CommentForm::cleaned).is_ok());
    }

    #[test]
    fn share_form_comments_are_optional() {
        let form = EmailPostForm {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            to: "bob@example.com".into(),
            comments: String::new(),
        };
        assert!(clean(form, EmailPostForm::cleaned).is_ok());
    }

    #[test]
    fn share_form_requires_valid_recipient() {
        let form = EmailPostForm {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            to: "bob".into(),
            comments: String::new(),
        };
        let errors = clean(form, EmailPostForm::cleaned).unwrap_err();
        assert!(errors.contains_key("to"));
    }
}
