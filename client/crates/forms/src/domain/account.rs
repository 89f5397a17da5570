//! Account Form Validator
//!
//! Login and registration share one form: login only needs a well-formed
//! email and a password, registration also enforces the password policy and
//! a display name.

use kernel::FieldErrors;

use super::rules::{validate_email, validate_name, validate_password};
use super::{FormValues, field};

/// Which account form is being validated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountFormMode {
    #[default]
    Login,
    Register,
}

/// Fields: `email`, `password`, and `name` when registering
pub fn validate_form(values: &FormValues, mode: AccountFormMode) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let email = field(values, "email");
    if email.is_empty() {
        errors.insert_first("email", "Email is required");
    } else if !validate_email(email) {
        errors.insert_first("email", "Email is not valid");
    }

    // Read as stored. Values that came through `FormController` are already
    // sanitized, so a typed `<` arrives as `&lt;`.
    let password = values.get("password").map_or("", String::as_str);
    if password.is_empty() {
        errors.insert_first("password", "Password is required");
    } else if mode == AccountFormMode::Register {
        if let Some(rule) = validate_password(password).first() {
            errors.insert_first("password", rule.to_string());
        }
    }

    if mode == AccountFormMode::Register {
        if let Some(rule) = validate_name(field(values, "name")) {
            errors.insert_first("name", rule.to_string());
        }
    }

    errors
}

/// Login-mode shorthand, usable directly as a controller validator
pub fn validate_login(values: &FormValues) -> FieldErrors {
    validate_form(values, AccountFormMode::Login)
}

/// Register-mode shorthand
pub fn validate_registration(values: &FormValues) -> FieldErrors {
    validate_form(values, AccountFormMode::Register)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> FormValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_login_requires_email_and_password() {
        let errors = validate_login(&values(&[]));
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));
        assert!(!errors.contains("name"));
    }

    #[test]
    fn test_login_does_not_apply_password_policy() {
        let errors = validate_login(&values(&[("email", "a@b.com"), ("password", "x")]));
        assert!(errors.is_valid());
    }

    #[test]
    fn test_login_rejects_bad_email() {
        let errors = validate_login(&values(&[("email", "nope"), ("password", "x")]));
        assert_eq!(errors.get("email"), Some("Email is not valid"));
    }

    #[test]
    fn test_register_reports_first_password_rule() {
        let errors = validate_registration(&values(&[
            ("email", "a@b.com"),
            ("password", "abcdefgh"),
            ("name", "Ana"),
        ]));
        assert_eq!(
            errors.get("password"),
            Some("Password must contain at least one uppercase letter")
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_register_requires_name() {
        let errors = validate_registration(&values(&[
            ("email", "a@b.com"),
            ("password", "Abcdef1!"),
        ]));
        assert_eq!(errors.get("name"), Some("Name is required"));

        let errors = validate_registration(&values(&[
            ("email", "a@b.com"),
            ("password", "Abcdef1!"),
            ("name", "A"),
        ]));
        assert_eq!(errors.get("name"), Some("Name must be at least 2 characters"));
    }

    #[test]
    fn test_register_valid() {
        let errors = validate_registration(&values(&[
            ("email", "ana@tienda.es"),
            ("password", "Abcdef1!"),
            ("name", "Ana"),
        ]));
        assert!(errors.is_valid());
    }
}
