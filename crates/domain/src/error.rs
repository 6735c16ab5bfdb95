//! Common error types used across the workspace.
//!
//! Each failure family is its own typed enum, folded into [`EodsaError`]
//! through `#[from]`. Adapters map the families onto transport concerns
//! (HTTP status codes) without inspecting message strings.

use crate::performance::PerformanceType;

/// Top-level error returned by domain validation and application services.
#[derive(Debug, thiserror::Error)]
pub enum EodsaError {
    /// Missing or malformed input, out-of-range values, broken invariants.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Credential or session mismatch.
    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    /// Caller is known but not allowed to perform the operation.
    #[error(transparent)]
    Forbidden(#[from] ForbiddenError),

    /// Referenced record does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Uniqueness rule violated.
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// Per-client registration quota exhausted.
    #[error("too many registrations from this address, try again later")]
    RateLimited,

    /// The persistence layer failed unexpectedly.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// An outbound collaborator (captcha, mail relay) failed unexpectedly.
    #[error("gateway error")]
    Gateway(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Input rejected before any mutation happens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("{field} is not a valid email address")]
    InvalidEmail { field: &'static str },

    #[error("national id must be exactly 13 digits")]
    InvalidNationalId,

    #[error("date of birth cannot be in the future")]
    DateOfBirthInFuture,

    #[error("guardian name, email and phone are required for dancers under 18")]
    GuardianRequired,

    #[error("reCAPTCHA token is required")]
    MissingCaptcha,

    #[error("reCAPTCHA verification failed")]
    CaptchaRejected,

    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("invalid {kind} id: {value}")]
    InvalidId { kind: &'static str, value: String },

    #[error("unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("a rejection reason is required")]
    RejectionReasonRequired,

    #[error("cannot move {entity} from {from} to {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error("registration deadline must be before the event date")]
    DeadlineNotBeforeEvent,

    #[error("entry fee cannot be negative")]
    NegativeFee,

    #[error("entry fee cannot exceed {max}")]
    FeeTooLarge { max: rust_decimal::Decimal },

    #[error("entry fee overflows for {participants} participants")]
    FeeOverflow { participants: usize },

    #[error("registration for this event is closed")]
    RegistrationClosed,

    #[error("this event accepts {expected} entries, not {actual}")]
    PerformanceTypeMismatch {
        expected: PerformanceType,
        actual: PerformanceType,
    },

    #[error("{performance_type} requires between {min} and {max} participants, got {actual}")]
    ParticipantCount {
        performance_type: PerformanceType,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("participant {0} is listed more than once")]
    DuplicateParticipant(String),

    #[error("participant {0} is neither a registered dancer nor on the contestant roster")]
    UnknownParticipant(String),

    #[error("item duration must be between 1 and {max} seconds")]
    InvalidDuration { max: u32 },

    #[error("item number must be a positive integer")]
    InvalidItemNumber,

    #[error("{criterion} score must be between 1 and 10, got {value}")]
    ScoreOutOfRange { criterion: &'static str, value: i64 },

    #[error("password reset token is invalid or expired")]
    InvalidResetToken,
}

/// Credential or session failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid session token")]
    InvalidToken,

    #[error("session token expired")]
    ExpiredToken,
}

/// Operations refused to a known caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForbiddenError {
    #[error("dancer {name} has not been approved")]
    DancerNotApproved { name: String },

    #[error("studio {name} has not been approved")]
    StudioNotApproved { name: String },

    #[error("{entity} does not belong to the caller")]
    NotOwner { entity: &'static str },

    #[error("{role} access required")]
    RoleRequired { role: &'static str },
}

/// A referenced record does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// A uniqueness rule was violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConflictError {
    #[error("a {entity} with this {field} already exists")]
    Duplicate {
        entity: &'static str,
        field: &'static str,
    },

    #[error("you have already applied to this studio")]
    AlreadyApplied,

    #[error("item number {number} is already assigned in this event")]
    ItemNumberTaken { number: u32 },
}

impl EodsaError {
    /// Wrap an unexpected persistence failure.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Box::new(err))
    }

    /// Wrap an unexpected outbound-service failure.
    pub fn gateway(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Gateway(Box::new(err))
    }

    /// Whether this is a duplicate on the given `entity`/`field` pair.
    #[must_use]
    pub fn is_duplicate(&self, entity: &str, field: &str) -> bool {
        matches!(
            self,
            Self::Conflict(ConflictError::Duplicate { entity: e, field: f })
                if *e == entity && *f == field
        )
    }
}
