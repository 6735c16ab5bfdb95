//! Studio: an organisation that sponsors dancers for competition entry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::approval::Approval;
use crate::contact;
use crate::error::{EodsaError, ValidationError};
use crate::id::{StudioId, random_digits};
use crate::time::{Timestamp, now};

/// Registration number assigned at creation (`S` followed by 6 digits).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationNumber(String);

impl RegistrationNumber {
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("S{}", random_digits(6)))
    }

    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistrationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered dance studio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Studio {
    pub id: StudioId,
    pub registration_number: RegistrationNumber,
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    #[serde(skip)]
    pub password_hash: String,
    #[serde(flatten)]
    pub approval: Approval,
    pub created_at: Timestamp,
}

impl Studio {
    #[must_use]
    pub fn builder() -> StudioBuilder {
        StudioBuilder::default()
    }

    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.approval.is_approved()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::Validation`] when a required field is blank or
    /// the email is malformed.
    pub fn validate(&self) -> Result<(), EodsaError> {
        contact::required("studio name", &self.name)?;
        contact::required("contact person", &self.contact_person)?;
        contact::required("phone", &self.phone)?;
        contact::email("email", &self.email)?;
        if self.password_hash.is_empty() {
            return Err(ValidationError::EmptyField { field: "password" }.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for a [`Studio`] registration.
///
/// Studios are approved at creation; an admin may later reject them.
#[derive(Debug, Default)]
pub struct StudioBuilder {
    name: Option<String>,
    contact_person: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    password_hash: Option<String>,
}

impl StudioBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn contact_person(mut self, contact_person: impl Into<String>) -> Self {
        self.contact_person = Some(contact_person.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn address(mut self, address: Option<String>) -> Self {
        self.address = address;
        self
    }

    #[must_use]
    pub fn password_hash(mut self, password_hash: impl Into<String>) -> Self {
        self.password_hash = Some(password_hash.into());
        self
    }

    /// Consume the builder, validate, and return a [`Studio`].
    ///
    /// # Errors
    ///
    /// See [`Studio::validate`].
    pub fn build(self) -> Result<Studio, EodsaError> {
        let created_at = now();
        let studio = Studio {
            id: StudioId::new(),
            registration_number: RegistrationNumber::generate(),
            name: self.name.unwrap_or_default().trim().to_string(),
            contact_person: self.contact_person.unwrap_or_default().trim().to_string(),
            email: contact::email("email", &self.email.unwrap_or_default())?,
            phone: self.phone.unwrap_or_default().trim().to_string(),
            address: contact::optional(self.address),
            password_hash: self.password_hash.unwrap_or_default(),
            approval: Approval::auto_approved(created_at),
            created_at,
        };
        studio.validate()?;
        Ok(studio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> StudioBuilder {
        Studio::builder()
            .name("Rhythm House")
            .contact_person("Ayanda")
            .email("Info@RhythmHouse.co.za")
            .phone("0110000000")
            .password_hash("$argon2id$stub")
    }

    #[test]
    fn should_auto_approve_new_studio() {
        let studio = valid().build().unwrap();
        assert!(studio.is_approved());
        assert_eq!(studio.email, "info@rhythmhouse.co.za");
        assert!(studio.registration_number.as_str().starts_with('S'));
    }

    #[test]
    fn should_reject_missing_contact_person() {
        let result = valid().contact_person(" ").build();
        assert!(matches!(
            result,
            Err(EodsaError::Validation(ValidationError::EmptyField {
                field: "contact person"
            }))
        ));
    }

    #[test]
    fn should_never_serialize_password_hash() {
        let studio = valid().build().unwrap();
        let json = serde_json::to_string(&studio).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("registrationNumber"));
    }
}
