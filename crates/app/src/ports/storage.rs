//! Storage port: repository traits for persistence.
//!
//! Uniqueness rules (national id, emails, registration numbers, open
//! applications, item numbers, one score per judge and entry) are enforced by
//! the store. Implementations report violations as
//! [`ConflictError`](eodsa_domain::error::ConflictError) so services can tell
//! them apart from genuine storage failures.

use std::future::Future;

use eodsa_domain::application::{ApplicationStatus, StudioApplication};
use eodsa_domain::approval::ApprovalStatus;
use eodsa_domain::contestant::Contestant;
use eodsa_domain::credential::PasswordReset;
use eodsa_domain::dancer::{Dancer, EodsaId};
use eodsa_domain::entry::{EventEntry, Submitter};
use eodsa_domain::error::EodsaError;
use eodsa_domain::event::Event;
use eodsa_domain::id::{
    ApplicationId, ContestantId, DancerId, EntryId, EventId, JudgeId, StudioId,
};
use eodsa_domain::judge::Judge;
use eodsa_domain::score::Score;
use eodsa_domain::studio::Studio;
use eodsa_domain::time::Timestamp;

/// Repository for [`Dancer`]s.
pub trait DancerRepository {
    /// Persist a new dancer.
    ///
    /// Fails with a duplicate conflict on `national id`, `email` or
    /// `eodsa id`.
    fn create(&self, dancer: Dancer) -> impl Future<Output = Result<Dancer, EodsaError>> + Send;

    fn get_by_id(
        &self,
        id: DancerId,
    ) -> impl Future<Output = Result<Option<Dancer>, EodsaError>> + Send;

    fn get_by_eodsa_id(
        &self,
        eodsa_id: &EodsaId,
    ) -> impl Future<Output = Result<Option<Dancer>, EodsaError>> + Send;

    /// List dancers, optionally narrowed to one approval status, oldest first.
    fn list(
        &self,
        status: Option<ApprovalStatus>,
    ) -> impl Future<Output = Result<Vec<Dancer>, EodsaError>> + Send;

    /// Persist approval changes on an existing dancer.
    fn update(&self, dancer: Dancer) -> impl Future<Output = Result<Dancer, EodsaError>> + Send;
}

/// Repository for [`Studio`]s.
pub trait StudioRepository {
    /// Persist a new studio.
    ///
    /// Fails with a duplicate conflict on `email` or `registration number`.
    fn create(&self, studio: Studio) -> impl Future<Output = Result<Studio, EodsaError>> + Send;

    fn get_by_id(
        &self,
        id: StudioId,
    ) -> impl Future<Output = Result<Option<Studio>, EodsaError>> + Send;

    fn get_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<Studio>, EodsaError>> + Send;

    fn list(
        &self,
        status: Option<ApprovalStatus>,
    ) -> impl Future<Output = Result<Vec<Studio>, EodsaError>> + Send;

    /// Persist approval and password changes on an existing studio.
    fn update(&self, studio: Studio) -> impl Future<Output = Result<Studio, EodsaError>> + Send;
}

/// Repository for [`StudioApplication`]s.
pub trait ApplicationRepository {
    /// Persist a new application.
    ///
    /// Fails with [`ConflictError::AlreadyApplied`](eodsa_domain::error::ConflictError::AlreadyApplied)
    /// when an open application exists for the same pair.
    fn create(
        &self,
        application: StudioApplication,
    ) -> impl Future<Output = Result<StudioApplication, EodsaError>> + Send;

    fn get_by_id(
        &self,
        id: ApplicationId,
    ) -> impl Future<Output = Result<Option<StudioApplication>, EodsaError>> + Send;

    /// The pending or accepted application for this pair, if any.
    fn find_open(
        &self,
        dancer_id: DancerId,
        studio_id: StudioId,
    ) -> impl Future<Output = Result<Option<StudioApplication>, EodsaError>> + Send;

    /// Applications addressed to a studio, newest first.
    fn list_for_studio(
        &self,
        studio_id: StudioId,
        status: Option<ApplicationStatus>,
    ) -> impl Future<Output = Result<Vec<StudioApplication>, EodsaError>> + Send;

    /// Applications made by a dancer, newest first.
    fn list_for_dancer(
        &self,
        dancer_id: DancerId,
    ) -> impl Future<Output = Result<Vec<StudioApplication>, EodsaError>> + Send;

    fn update(
        &self,
        application: StudioApplication,
    ) -> impl Future<Output = Result<StudioApplication, EodsaError>> + Send;
}

/// Repository for [`Event`]s.
pub trait EventRepository {
    fn create(&self, event: Event) -> impl Future<Output = Result<Event, EodsaError>> + Send;

    fn get_by_id(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<Option<Event>, EodsaError>> + Send;

    /// All events ordered by event date.
    fn list(&self) -> impl Future<Output = Result<Vec<Event>, EodsaError>> + Send;

    fn update(&self, event: Event) -> impl Future<Output = Result<Event, EodsaError>> + Send;
}

/// Repository for [`EventEntry`]s.
pub trait EntryRepository {
    fn create(
        &self,
        entry: EventEntry,
    ) -> impl Future<Output = Result<EventEntry, EodsaError>> + Send;

    fn get_by_id(
        &self,
        id: EntryId,
    ) -> impl Future<Output = Result<Option<EventEntry>, EodsaError>> + Send;

    /// Entries of one event, in submission order.
    fn list_for_event(
        &self,
        event_id: EventId,
    ) -> impl Future<Output = Result<Vec<EventEntry>, EodsaError>> + Send;

    /// Entries submitted by `submitter`, newest first.
    fn list_for_submitter(
        &self,
        submitter: Submitter,
    ) -> impl Future<Output = Result<Vec<EventEntry>, EodsaError>> + Send;

    /// The entry holding `item_number` within `event_id`, if any.
    fn find_by_item_number(
        &self,
        event_id: EventId,
        item_number: u32,
    ) -> impl Future<Output = Result<Option<EventEntry>, EodsaError>> + Send;

    /// Persist admin changes (item number, approval, payment status).
    ///
    /// Fails with a duplicate conflict on `item number`.
    fn update(
        &self,
        entry: EventEntry,
    ) -> impl Future<Output = Result<EventEntry, EodsaError>> + Send;
}

/// Repository for legacy [`Contestant`]s.
pub trait ContestantRepository {
    fn create(
        &self,
        contestant: Contestant,
    ) -> impl Future<Output = Result<Contestant, EodsaError>> + Send;

    fn get_by_id(
        &self,
        id: ContestantId,
    ) -> impl Future<Output = Result<Option<Contestant>, EodsaError>> + Send;
}

/// Repository for [`Judge`]s (including admins).
pub trait JudgeRepository {
    /// Persist a new judge. Fails with a duplicate conflict on `email`.
    fn create(&self, judge: Judge) -> impl Future<Output = Result<Judge, EodsaError>> + Send;

    fn get_by_id(
        &self,
        id: JudgeId,
    ) -> impl Future<Output = Result<Option<Judge>, EodsaError>> + Send;

    fn get_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<Judge>, EodsaError>> + Send;

    fn update(&self, judge: Judge) -> impl Future<Output = Result<Judge, EodsaError>> + Send;
}

/// Repository for [`Score`]s, unique per (judge, entry).
pub trait ScoreRepository {
    /// Persist a new score. Fails with a duplicate conflict on `judge and entry`.
    fn create(&self, score: Score) -> impl Future<Output = Result<Score, EodsaError>> + Send;

    fn find(
        &self,
        judge_id: JudgeId,
        entry_id: EntryId,
    ) -> impl Future<Output = Result<Option<Score>, EodsaError>> + Send;

    /// Overwrite marks and comments of an existing score, keyed by its id.
    fn update(&self, score: Score) -> impl Future<Output = Result<Score, EodsaError>> + Send;

    fn list_for_entry(
        &self,
        entry_id: EntryId,
    ) -> impl Future<Output = Result<Vec<Score>, EodsaError>> + Send;

    fn list_all(&self) -> impl Future<Output = Result<Vec<Score>, EodsaError>> + Send;
}

/// Repository for single-use [`PasswordReset`] tokens.
pub trait PasswordResetRepository {
    fn create(
        &self,
        reset: PasswordReset,
    ) -> impl Future<Output = Result<PasswordReset, EodsaError>> + Send;

    fn get(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<PasswordReset>, EodsaError>> + Send;

    /// Claim an unused token. Returns `false` when it was already used or
    /// does not exist, so only one caller can ever redeem it.
    fn mark_used(
        &self,
        token: &str,
        at: Timestamp,
    ) -> impl Future<Output = Result<bool, EodsaError>> + Send;
}
