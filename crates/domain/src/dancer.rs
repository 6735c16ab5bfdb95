//! Dancer: an individually registered competitor.
//!
//! Dancers are created by self-registration, start [`Pending`], and only an
//! admin decision moves them to approved or rejected. Only approved dancers
//! may enter competitions or apply to studios.
//!
//! [`Pending`]: crate::approval::ApprovalStatus::Pending

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::approval::Approval;
use crate::contact;
use crate::error::{EodsaError, ValidationError};
use crate::id::{DancerId, random_digits};
use crate::time::{Timestamp, age_on, now, today};

/// Dancers younger than this must register with guardian details.
pub const ADULT_AGE: u32 = 18;

/// Stable public identifier issued to a dancer (`E` followed by 7 digits).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EodsaId(String);

impl EodsaId {
    /// Draw a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("E{}", random_digits(7)))
    }

    /// Wrap a stored or user-supplied identifier, normalising case.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EodsaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Contact details of the adult responsible for a minor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guardian {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// A registered dancer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dancer {
    pub id: DancerId,
    pub eodsa_id: EodsaId,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub national_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub guardian: Option<Guardian>,
    #[serde(flatten)]
    pub approval: Approval,
    pub created_at: Timestamp,
}

impl Dancer {
    /// Create a builder for a new registration.
    #[must_use]
    pub fn builder() -> DancerBuilder {
        DancerBuilder::default()
    }

    /// Age in full years on the given date.
    #[must_use]
    pub fn age_on(&self, on: NaiveDate) -> u32 {
        age_on(self.date_of_birth, on)
    }

    /// Age in full years today.
    #[must_use]
    pub fn age(&self) -> u32 {
        self.age_on(today())
    }

    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.approval.is_approved()
    }

    /// Check registration invariants as of `on`.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::Validation`] when a required field is blank,
    /// the national id is not 13 digits, the birth date lies after `on`, an
    /// email is malformed, or a minor has no complete guardian record.
    pub fn validate_on(&self, on: NaiveDate) -> Result<(), EodsaError> {
        contact::required("name", &self.name)?;
        if self.national_id.len() != 13 || !self.national_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidNationalId.into());
        }
        if self.date_of_birth > on {
            return Err(ValidationError::DateOfBirthInFuture.into());
        }
        if let Some(email) = &self.email {
            contact::email("email", email)?;
        }
        if self.age_on(on) < ADULT_AGE {
            let guardian = self
                .guardian
                .as_ref()
                .ok_or(ValidationError::GuardianRequired)?;
            if guardian.name.trim().is_empty() || guardian.phone.trim().is_empty() {
                return Err(ValidationError::GuardianRequired.into());
            }
            contact::email("guardian email", &guardian.email)?;
        }
        Ok(())
    }
}

/// Step-by-step builder for a [`Dancer`] registration.
#[derive(Debug, Default)]
pub struct DancerBuilder {
    name: Option<String>,
    date_of_birth: Option<NaiveDate>,
    national_id: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    guardian_name: Option<String>,
    guardian_email: Option<String>,
    guardian_phone: Option<String>,
}

impl DancerBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn date_of_birth(mut self, date_of_birth: NaiveDate) -> Self {
        self.date_of_birth = Some(date_of_birth);
        self
    }

    #[must_use]
    pub fn national_id(mut self, national_id: impl Into<String>) -> Self {
        self.national_id = Some(national_id.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    #[must_use]
    pub fn phone(mut self, phone: Option<String>) -> Self {
        self.phone = phone;
        self
    }

    /// Guardian fields arrive separately on the wire; any of them may be blank.
    #[must_use]
    pub fn guardian(
        mut self,
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
    ) -> Self {
        self.guardian_name = name;
        self.guardian_email = email;
        self.guardian_phone = phone;
        self
    }

    /// Consume the builder and validate against today's date.
    ///
    /// # Errors
    ///
    /// See [`Dancer::validate_on`].
    pub fn build(self) -> Result<Dancer, EodsaError> {
        self.build_on(today())
    }

    /// Consume the builder and validate against a fixed date.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] when the birth date is
    /// missing, plus everything [`Dancer::validate_on`] reports.
    pub fn build_on(self, on: NaiveDate) -> Result<Dancer, EodsaError> {
        let date_of_birth = self.date_of_birth.ok_or(ValidationError::EmptyField {
            field: "date of birth",
        })?;
        let email = contact::optional(self.email)
            .map(|e| contact::email("email", &e))
            .transpose()?;

        let guardian_name = contact::optional(self.guardian_name);
        let guardian_email = contact::optional(self.guardian_email);
        let guardian_phone = contact::optional(self.guardian_phone);
        let guardian = match (guardian_name, guardian_email, guardian_phone) {
            (None, None, None) => None,
            (name, email, phone) => Some(Guardian {
                name: name.unwrap_or_default(),
                email: email
                    .map(|e| contact::email("guardian email", &e))
                    .transpose()?
                    .unwrap_or_default(),
                phone: phone.unwrap_or_default(),
            }),
        };

        let dancer = Dancer {
            id: DancerId::new(),
            eodsa_id: EodsaId::generate(),
            name: self.name.unwrap_or_default().trim().to_string(),
            date_of_birth,
            national_id: self.national_id.unwrap_or_default().trim().to_string(),
            email,
            phone: contact::optional(self.phone),
            guardian,
            approval: Approval::pending(),
            created_at: now(),
        };
        dancer.validate_on(on)?;
        Ok(dancer)
    }
}
