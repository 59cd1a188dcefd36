//! Request body parsing and field-level checks for customer endpoints.
//!
//! The repository only vouches for the national id checksum; everything about
//! the shape of name, email and phone is enforced here before it is called.

use std::borrow::Cow;

use clientes_core::domain::customer::{CustomerChanges, CustomerDraft, CustomerId};
use clientes_core::errors::ApplicationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

const PHONE_MIN_DIGITS: usize = 7;
const PHONE_MAX_DIGITS: usize = 15;

/// Reporting order for field problems.
const FIELD_ORDER: [&str; 4] = ["name", "email", "phone", "national_id"];

/// Digit groups optionally separated by one space, dot or dash, an optional
/// leading `+`, area codes in balanced parentheses, and an `x`/`ext` suffix.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?P<number>\+?(?:\([0-9]{1,4}\)|[0-9]+)(?:[ .-]?(?:\([0-9]{1,4}\)|[0-9]+))*)(?:\s*(?:x|ext\.?)\s*[0-9]{1,6})?$",
    )
    .expect("valid phone regex")
});

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    pub id: Option<u64>,
    #[validate(
        required(message = "name is required"),
        length(max = 100, message = "name must be at most 100 characters")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "email is required"),
        email(message = "email is not a valid address"),
        custom(function = "dotted_domain")
    )]
    pub email: Option<String>,
    #[validate(custom(function = "phone_number"))]
    pub phone: Option<String>,
    #[validate(required(message = "nationalId is required"))]
    pub national_id: Option<String>,
    pub active: Option<bool>,
}

struct CheckedFields {
    name: String,
    email: String,
    phone: Option<String>,
    national_id: String,
}

impl CustomerPayload {
    pub fn into_draft(self) -> Result<CustomerDraft, ApplicationError> {
        let active = self.active.unwrap_or(true);
        let fields = self.check_fields()?;
        Ok(CustomerDraft {
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            national_id: fields.national_id,
            active,
        })
    }

    /// A body without `id` takes the id from the path.
    pub fn into_changes(self, path_id: CustomerId) -> Result<CustomerChanges, ApplicationError> {
        if let Some(body_id) = self.id.map(CustomerId) {
            if body_id != path_id {
                return Err(ApplicationError::IdMismatch { path: path_id, payload: body_id });
            }
        }

        let fields = self.check_fields()?;
        Ok(CustomerChanges {
            id: path_id,
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            national_id: fields.national_id,
        })
    }

    /// Name and email are trimmed; blank strings count as missing. The national
    /// id is left untouched so the checksum sees exactly what was sent.
    fn normalized(self) -> Self {
        let trimmed = |value: Option<String>| {
            value.map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
        };
        Self {
            name: trimmed(self.name),
            email: trimmed(self.email),
            phone: trimmed(self.phone),
            national_id: self.national_id.filter(|value| !value.is_empty()),
            ..self
        }
    }

    fn check_fields(self) -> Result<CheckedFields, ApplicationError> {
        let payload = self.normalized();
        payload.validate().map_err(|errors| ApplicationError::InvalidPayload(describe(&errors)))?;

        match (payload.name, payload.email, payload.national_id) {
            (Some(name), Some(email), Some(national_id)) => {
                Ok(CheckedFields { name, email, phone: payload.phone, national_id })
            }
            _ => Err(ApplicationError::InvalidPayload(
                "name, email and nationalId are required".to_string(),
            )),
        }
    }
}

fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| {
        FIELD_ORDER.iter().position(|known| *known == &**field).unwrap_or(FIELD_ORDER.len())
    });

    fields
        .into_iter()
        .flat_map(|(field, problems)| {
            problems.iter().map(move |problem| match &problem.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid ({})", problem.code),
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn dotted_domain(email: &str) -> Result<(), ValidationError> {
    let dotted = email.rsplit_once('@').is_some_and(|(_, domain)| {
        domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
    });
    if dotted {
        Ok(())
    } else {
        Err(ValidationError::new("email_domain")
            .with_message(Cow::Borrowed("email domain must contain a dot")))
    }
}

fn phone_number(phone: &str) -> Result<(), ValidationError> {
    if is_valid_phone(phone) {
        Ok(())
    } else {
        Err(ValidationError::new("phone")
            .with_message(Cow::Borrowed("phone is not a valid phone number")))
    }
}

/// Accepts international or local numbers with common separators and an
/// optional `x`/`ext` extension, e.g. `+55 (11) 91234-5678 ext 12`.
pub fn is_valid_phone(value: &str) -> bool {
    let Some(number) = PHONE_RE.captures(value).and_then(|captures| captures.name("number"))
    else {
        return false;
    };

    let digit_count = number.as_str().chars().filter(char::is_ascii_digit).count();
    (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digit_count)
}
