//! Entry service: eligibility checks and admin handling of competition entries.
//!
//! Submission runs every check before anything is written:
//!
//! 1. the event exists, is open for registration and matches the requested
//!    performance type;
//! 2. the submitter exists and, for dancers and studios, is approved;
//! 3. each participant resolves to an approved dancer, or (for legacy
//!    contestant submissions) to a roster member;
//! 4. no participant is listed twice, whichever id form names them;
//! 5. the participant count fits the performance type;
//! 6. item details are well formed.
//!
//! The entry is then priced, stored unapproved and unpaid, and a
//! confirmation email goes out on a best-effort basis. Studio affiliation is
//! not required: independent dancers may enter.

use eodsa_domain::contestant::Contestant;
use eodsa_domain::dancer::{Dancer, EodsaId};
use eodsa_domain::entry::{
    EventEntry, ItemDetails, PaymentStatus, Submitter, parse_item_number,
};
use eodsa_domain::error::{ConflictError, EodsaError, ForbiddenError, NotFoundError, ValidationError};
use eodsa_domain::event::Event;
use eodsa_domain::id::{DancerId, EntryId, EventId};
use eodsa_domain::performance::PerformanceType;
use eodsa_domain::time::today;

use crate::ports::{
    Backend, ContestantRepository, DancerRepository, Email, EntryRepository, EventRepository,
    Ports, StudioRepository,
};
use crate::services::notify;

/// A competition entry as submitted.
#[derive(Debug, Clone)]
pub struct EntrySubmission {
    pub event_id: EventId,
    /// Defaults to the event's own type when absent.
    pub performance_type: Option<PerformanceType>,
    /// Dancer ids, EODSA ids or legacy roster ids, in performance order.
    pub participant_ids: Vec<String>,
    pub item: ItemDetails,
}

pub struct EntryService<B: Backend> {
    events: B::Events,
    entries: B::Entries,
    dancers: B::Dancers,
    studios: B::Studios,
    contestants: B::Contestants,
    mailer: B::Mailer,
}

impl<B: Backend> EntryService<B> {
    pub fn new(ports: &Ports<B>) -> Self {
        Self {
            events: ports.events.clone(),
            entries: ports.entries.clone(),
            dancers: ports.dancers.clone(),
            studios: ports.studios.clone(),
            contestants: ports.contestants.clone(),
            mailer: ports.mailer.clone(),
        }
    }

    /// Validate and record a competition entry.
    ///
    /// # Errors
    ///
    /// - [`EodsaError::NotFound`] for an unknown event or submitter
    /// - [`EodsaError::Validation`] for a closed event, a performance-type
    ///   mismatch, repeated or unknown participants, a bad participant count
    ///   or bad item details
    /// - [`EodsaError::Forbidden`] naming the first unapproved dancer (or an
    ///   unapproved submitting studio)
    pub async fn submit(
        &self,
        submitter: Submitter,
        submission: EntrySubmission,
    ) -> Result<EventEntry, EodsaError> {
        let event = self.open_event(&submission).await?;
        let (contact, roster) = self.check_submitter(submitter).await?;

        let mut participant_ids: Vec<String> = Vec::with_capacity(submission.participant_ids.len());
        for raw in &submission.participant_ids {
            let participant = raw.trim();
            let canonical = match self.resolve_dancer(participant).await? {
                Some(dancer) if !dancer.is_approved() => {
                    return Err(ForbiddenError::DancerNotApproved { name: dancer.name }.into());
                }
                Some(dancer) => dancer.id.to_string(),
                None if roster
                    .as_ref()
                    .is_some_and(|c| c.has_on_roster(participant)) =>
                {
                    participant.to_string()
                }
                None => {
                    return Err(
                        ValidationError::UnknownParticipant(participant.to_string()).into(),
                    );
                }
            };
            if participant_ids.contains(&canonical) {
                return Err(ValidationError::DuplicateParticipant(participant.to_string()).into());
            }
            participant_ids.push(canonical);
        }

        let entry = EventEntry::new(&event, submitter, participant_ids, submission.item)?;
        let entry = self.entries.create(entry).await?;
        tracing::info!(
            entry_id = %entry.id,
            event_id = %event.id,
            submitter = submitter.kind(),
            participants = entry.participant_ids.len(),
            fee = %entry.calculated_fee,
            "entry submitted"
        );

        if let Some(to) = contact {
            notify(
                &self.mailer,
                Email {
                    to,
                    subject: format!("Entry received: {}", event.name),
                    body: format!(
                        "Your entry \"{}\" for {} on {} was received. Fee due: R{}.",
                        entry.item.item_name, event.name, event.event_date, entry.calculated_fee
                    ),
                },
            )
            .await;
        }
        Ok(entry)
    }

    /// Register a legacy contestant whose roster can be entered by an admin.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn register_contestant(
        &self,
        contestant: Contestant,
    ) -> Result<Contestant, EodsaError> {
        let contestant = self.contestants.create(contestant).await?;
        tracing::info!(contestant_id = %contestant.id, roster = contestant.roster.len(), "contestant registered");
        Ok(contestant)
    }

    /// Look up an entry by id.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::NotFound`] when no entry with `id` exists.
    pub async fn get_entry(&self, id: EntryId) -> Result<EventEntry, EodsaError> {
        self.entries.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Entry",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Entries submitted by `submitter`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_for_submitter(
        &self,
        submitter: Submitter,
    ) -> Result<Vec<EventEntry>, EodsaError> {
        self.entries.list_for_submitter(submitter).await
    }

    /// Entries of one event.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::NotFound`] when the event does not exist.
    pub async fn list_for_event(&self, event_id: EventId) -> Result<Vec<EventEntry>, EodsaError> {
        self.get_event(event_id).await?;
        self.entries.list_for_event(event_id).await
    }

    /// Give an entry its running-order number within its event.
    ///
    /// Assigning the number an entry already holds succeeds unchanged.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidItemNumber`] unless positive
    /// - [`EodsaError::NotFound`] for an unknown entry
    /// - [`ConflictError::ItemNumberTaken`] when another entry of the same
    ///   event holds the number
    pub async fn assign_item_number(
        &self,
        entry_id: EntryId,
        raw: i64,
    ) -> Result<EventEntry, EodsaError> {
        let number = parse_item_number(raw)?;
        let mut entry = self.get_entry(entry_id).await?;
        if entry.item_number == Some(number) {
            return Ok(entry);
        }
        if let Some(holder) = self
            .entries
            .find_by_item_number(entry.event_id, number)
            .await?
            && holder.id != entry.id
        {
            return Err(ConflictError::ItemNumberTaken { number }.into());
        }
        entry.item_number = Some(number);
        let entry = self.entries.update(entry).await.map_err(|err| {
            if err.is_duplicate("entry", "item number") {
                ConflictError::ItemNumberTaken { number }.into()
            } else {
                err
            }
        })?;
        tracing::info!(%entry_id, item_number = number, "item number assigned");
        Ok(entry)
    }

    /// Mark an entry approved for the programme.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::NotFound`] for an unknown entry.
    pub async fn approve_entry(&self, entry_id: EntryId) -> Result<EventEntry, EodsaError> {
        let mut entry = self.get_entry(entry_id).await?;
        entry.approved = true;
        let entry = self.entries.update(entry).await?;
        tracing::info!(%entry_id, "entry approved");
        Ok(entry)
    }

    /// Record the payment state of an entry. No money moves.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::NotFound`] for an unknown entry.
    pub async fn set_payment_status(
        &self,
        entry_id: EntryId,
        status: PaymentStatus,
    ) -> Result<EventEntry, EodsaError> {
        let mut entry = self.get_entry(entry_id).await?;
        entry.payment_status = status;
        let entry = self.entries.update(entry).await?;
        tracing::info!(%entry_id, payment_status = %status, "payment status recorded");
        Ok(entry)
    }

    async fn get_event(&self, id: EventId) -> Result<Event, EodsaError> {
        self.events.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Event",
                id: id.to_string(),
            }
            .into()
        })
    }

    async fn open_event(&self, submission: &EntrySubmission) -> Result<Event, EodsaError> {
        let event = self.get_event(submission.event_id).await?;
        if !event.accepts_entries_on(today()) {
            return Err(ValidationError::RegistrationClosed.into());
        }
        if let Some(requested) = submission.performance_type
            && requested != event.performance_type
        {
            return Err(ValidationError::PerformanceTypeMismatch {
                expected: event.performance_type,
                actual: requested,
            }
            .into());
        }
        Ok(event)
    }

    /// Confirm the submitter may enter; returns its contact email and, for
    /// legacy contestants, the roster to resolve participants against.
    async fn check_submitter(
        &self,
        submitter: Submitter,
    ) -> Result<(Option<String>, Option<Contestant>), EodsaError> {
        match submitter {
            Submitter::Dancer(id) => {
                let dancer = self.dancers.get_by_id(id).await?.ok_or_else(|| {
                    EodsaError::from(NotFoundError {
                        entity: "Dancer",
                        id: id.to_string(),
                    })
                })?;
                if !dancer.is_approved() {
                    return Err(ForbiddenError::DancerNotApproved { name: dancer.name }.into());
                }
                let contact = dancer
                    .email
                    .or_else(|| dancer.guardian.map(|g| g.email));
                Ok((contact, None))
            }
            Submitter::Studio(id) => {
                let studio = self.studios.get_by_id(id).await?.ok_or_else(|| {
                    EodsaError::from(NotFoundError {
                        entity: "Studio",
                        id: id.to_string(),
                    })
                })?;
                if !studio.is_approved() {
                    return Err(ForbiddenError::StudioNotApproved { name: studio.name }.into());
                }
                Ok((Some(studio.email), None))
            }
            Submitter::Contestant(id) => {
                let contestant = self.contestants.get_by_id(id).await?.ok_or_else(|| {
                    EodsaError::from(NotFoundError {
                        entity: "Contestant",
                        id: id.to_string(),
                    })
                })?;
                Ok((contestant.email.clone(), Some(contestant)))
            }
        }
    }

    /// Resolve a participant reference (dancer UUID or EODSA id) to a dancer.
    async fn resolve_dancer(&self, participant: &str) -> Result<Option<Dancer>, EodsaError> {
        if let Ok(id) = DancerId::parse(participant) {
            return self.dancers.get_by_id(id).await;
        }
        if participant.starts_with(['E', 'e']) {
            return self
                .dancers
                .get_by_eodsa_id(&EodsaId::from_raw(participant))
                .await;
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{TestBackend, ports, seed_dancer, seed_event, seed_studio};
    use eodsa_domain::contestant::RosterDancer;
    use eodsa_domain::event::EventStatus;
    use eodsa_domain::performance::{ItemStyle, MasteryLevel};
    use rust_decimal::Decimal;

    type Fixture = (EntryService<TestBackend>, Ports<TestBackend>);

    fn setup() -> Fixture {
        let ports = ports();
        (EntryService::new(&ports), ports)
    }

    fn item() -> ItemDetails {
        ItemDetails {
            item_name: "Firebird".to_string(),
            choreographer: "N. Dlamini".to_string(),
            mastery: MasteryLevel::Intermediate,
            item_style: ItemStyle::Contemporary,
            duration_seconds: 150,
        }
    }

    fn submission(event: &Event, participants: Vec<String>) -> EntrySubmission {
        EntrySubmission {
            event_id: event.id,
            performance_type: Some(event.performance_type),
            participant_ids: participants,
            item: item(),
        }
    }

    async fn approved_ids(ports: &Ports<TestBackend>, from: u32, count: u32) -> Vec<String> {
        let mut ids = Vec::new();
        for seed in from..from + count {
            ids.push(seed_dancer(ports, seed, true).await.id.to_string());
        }
        ids
    }

    #[tokio::test]
    async fn should_record_solo_entry_unapproved_and_unpaid() {
        let (svc, ports) = setup();
        let event = seed_event(&ports, PerformanceType::Solo).await;
        let dancer = seed_dancer(&ports, 1, true).await;

        let entry = svc
            .submit(
                Submitter::Dancer(dancer.id),
                submission(&event, vec![dancer.id.to_string()]),
            )
            .await
            .unwrap();

        assert!(!entry.approved);
        assert_eq!(entry.payment_status, PaymentStatus::Pending);
        assert_eq!(entry.calculated_fee, Decimal::new(15000, 2));
        assert_eq!(ports.mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn should_forbid_unapproved_participant_and_name_them() {
        let (svc, ports) = setup();
        let event = seed_event(&ports, PerformanceType::Duet).await;
        let studio = seed_studio(&ports, 1).await;
        let ok = seed_dancer(&ports, 1, true).await;
        let pending = seed_dancer(&ports, 2, false).await;

        let result = svc
            .submit(
                Submitter::Studio(studio.id),
                submission(&event, vec![ok.id.to_string(), pending.id.to_string()]),
            )
            .await;

        match result {
            Err(EodsaError::Forbidden(ForbiddenError::DancerNotApproved { name })) => {
                assert_eq!(name, "Dancer 2");
            }
            other => panic!("expected forbidden, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn should_enforce_participant_limits_at_boundaries() {
        let (svc, ports) = setup();
        let studio = seed_studio(&ports, 1).await;
        let dancers = approved_ids(&ports, 100, 31).await;

        let cases = [
            (PerformanceType::Solo, 1, true),
            (PerformanceType::Solo, 2, false),
            (PerformanceType::Duet, 2, true),
            (PerformanceType::Duet, 1, false),
            (PerformanceType::Trio, 3, true),
            (PerformanceType::Trio, 4, false),
            (PerformanceType::Group, 4, true),
            (PerformanceType::Group, 3, false),
            (PerformanceType::Group, 30, true),
            (PerformanceType::Group, 31, false),
        ];
        for (kind, count, ok) in cases {
            let event = seed_event(&ports, kind).await;
            let result = svc
                .submit(
                    Submitter::Studio(studio.id),
                    submission(&event, dancers[..count].to_vec()),
                )
                .await;
            if ok {
                assert!(result.is_ok(), "{kind} with {count} should pass");
            } else {
                assert!(
                    matches!(
                        result,
                        Err(EodsaError::Validation(ValidationError::ParticipantCount { .. }))
                    ),
                    "{kind} with {count} should fail"
                );
            }
        }
    }

    #[tokio::test]
    async fn should_price_per_participant() {
        let (svc, ports) = setup();
        let studio = seed_studio(&ports, 1).await;
        let event = seed_event(&ports, PerformanceType::Trio).await;
        let dancers = approved_ids(&ports, 10, 3).await;

        let entry = svc
            .submit(Submitter::Studio(studio.id), submission(&event, dancers))
            .await
            .unwrap();
        assert_eq!(entry.calculated_fee, Decimal::new(45000, 2));
    }

    #[tokio::test]
    async fn should_reject_duplicate_participants() {
        let (svc, ports) = setup();
        let studio = seed_studio(&ports, 1).await;
        let event = seed_event(&ports, PerformanceType::Duet).await;
        let dancer = seed_dancer(&ports, 1, true).await;

        let result = svc
            .submit(
                Submitter::Studio(studio.id),
                submission(&event, vec![dancer.id.to_string(), dancer.id.to_string()]),
            )
            .await;
        assert!(matches!(
            result,
            Err(EodsaError::Validation(ValidationError::DuplicateParticipant(_)))
        ));
    }

    #[tokio::test]
    async fn should_resolve_participants_by_eodsa_id() {
        let (svc, ports) = setup();
        let event = seed_event(&ports, PerformanceType::Solo).await;
        let dancer = seed_dancer(&ports, 1, true).await;

        let entry = svc
            .submit(
                Submitter::Dancer(dancer.id),
                submission(&event, vec![dancer.eodsa_id.to_string()]),
            )
            .await
            .unwrap();
        assert_eq!(entry.participant_ids, vec![dancer.id.to_string()]);
    }

    #[tokio::test]
    async fn should_reject_same_dancer_named_by_different_id_forms() {
        let (svc, ports) = setup();
        let studio = seed_studio(&ports, 1).await;
        let event = seed_event(&ports, PerformanceType::Duet).await;
        let dancer = seed_dancer(&ports, 1, true).await;
        let eodsa_id = dancer.eodsa_id.to_string();

        for ids in [
            vec![dancer.id.to_string(), eodsa_id.clone()],
            vec![eodsa_id.clone(), eodsa_id.to_lowercase()],
            vec![eodsa_id.clone(), format!(" {eodsa_id} ")],
        ] {
            let result = svc
                .submit(Submitter::Studio(studio.id), submission(&event, ids.clone()))
                .await;
            assert!(
                matches!(
                    result,
                    Err(EodsaError::Validation(ValidationError::DuplicateParticipant(_)))
                ),
                "{ids:?} should be rejected as a duplicate"
            );
        }
        assert!(svc.list_for_event(event.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_fall_back_to_contestant_roster() {
        let (svc, ports) = setup();
        let event = seed_event(&ports, PerformanceType::Duet).await;
        let contestant = svc
            .register_contestant(
                Contestant::new(
                    "Legacy Academy",
                    None,
                    vec![
                        RosterDancer {
                            id: "R-1".to_string(),
                            name: "Zola".to_string(),
                            date_of_birth: None,
                        },
                        RosterDancer {
                            id: "R-2".to_string(),
                            name: "Kea".to_string(),
                            date_of_birth: None,
                        },
                    ],
                )
                .unwrap(),
            )
            .await
            .unwrap();
        let submitter = Submitter::Contestant(contestant.id);

        let ok = svc
            .submit(submitter, submission(&event, vec!["R-1".into(), "R-2".into()]))
            .await;
        assert!(ok.is_ok());

        let unknown = svc
            .submit(submitter, submission(&event, vec!["R-1".into(), "R-9".into()]))
            .await;
        assert!(matches!(
            unknown,
            Err(EodsaError::Validation(ValidationError::UnknownParticipant(id))) if id == "R-9"
        ));
    }

    #[tokio::test]
    async fn should_reject_unknown_participant_without_roster() {
        let (svc, ports) = setup();
        let event = seed_event(&ports, PerformanceType::Solo).await;
        let studio = seed_studio(&ports, 1).await;

        let result = svc
            .submit(
                Submitter::Studio(studio.id),
                submission(&event, vec![DancerId::new().to_string()]),
            )
            .await;
        assert!(matches!(
            result,
            Err(EodsaError::Validation(ValidationError::UnknownParticipant(_)))
        ));
    }

    #[tokio::test]
    async fn should_refuse_closed_event_and_type_mismatch() {
        let (svc, ports) = setup();
        let dancer = seed_dancer(&ports, 1, true).await;
        let mut event = seed_event(&ports, PerformanceType::Solo).await;

        let mut mismatched = submission(&event, vec![dancer.id.to_string()]);
        mismatched.performance_type = Some(PerformanceType::Duet);
        assert!(matches!(
            svc.submit(Submitter::Dancer(dancer.id), mismatched).await,
            Err(EodsaError::Validation(ValidationError::PerformanceTypeMismatch { .. }))
        ));

        event.status = EventStatus::RegistrationClosed;
        ports.events.update(event.clone()).await.unwrap();
        assert!(matches!(
            svc.submit(
                Submitter::Dancer(dancer.id),
                submission(&event, vec![dancer.id.to_string()])
            )
            .await,
            Err(EodsaError::Validation(ValidationError::RegistrationClosed))
        ));
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_event() {
        let (svc, ports) = setup();
        let dancer = seed_dancer(&ports, 1, true).await;
        let result = svc
            .submit(
                Submitter::Dancer(dancer.id),
                EntrySubmission {
                    event_id: EventId::new(),
                    performance_type: None,
                    participant_ids: vec![dancer.id.to_string()],
                    item: item(),
                },
            )
            .await;
        assert!(matches!(result, Err(EodsaError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_keep_entry_when_mail_fails() {
        let mut ports = ports();
        ports.mailer.failing = true;
        let svc = EntryService::new(&ports);
        let event = seed_event(&ports, PerformanceType::Solo).await;
        let dancer = seed_dancer(&ports, 1, true).await;

        let entry = svc
            .submit(
                Submitter::Dancer(dancer.id),
                submission(&event, vec![dancer.id.to_string()]),
            )
            .await;
        assert!(entry.is_ok());
    }

    #[tokio::test]
    async fn should_guard_item_numbers_per_event() {
        let (svc, ports) = setup();
        let studio = seed_studio(&ports, 1).await;
        let first_event = seed_event(&ports, PerformanceType::Solo).await;
        let second_event = seed_event(&ports, PerformanceType::Solo).await;
        let dancers = approved_ids(&ports, 1, 3).await;
        let submitter = Submitter::Studio(studio.id);

        let a = svc
            .submit(submitter, submission(&first_event, vec![dancers[0].clone()]))
            .await
            .unwrap();
        let b = svc
            .submit(submitter, submission(&first_event, vec![dancers[1].clone()]))
            .await
            .unwrap();
        let c = svc
            .submit(submitter, submission(&second_event, vec![dancers[2].clone()]))
            .await
            .unwrap();

        svc.assign_item_number(a.id, 7).await.unwrap();
        assert_eq!(
            svc.assign_item_number(a.id, 7).await.unwrap().item_number,
            Some(7)
        );
        assert!(matches!(
            svc.assign_item_number(b.id, 7).await,
            Err(EodsaError::Conflict(ConflictError::ItemNumberTaken { number: 7 }))
        ));
        assert!(svc.assign_item_number(c.id, 7).await.is_ok());
        assert!(matches!(
            svc.assign_item_number(b.id, 0).await,
            Err(EodsaError::Validation(ValidationError::InvalidItemNumber))
        ));
    }

    #[tokio::test]
    async fn should_approve_and_record_payment() {
        let (svc, ports) = setup();
        let event = seed_event(&ports, PerformanceType::Solo).await;
        let dancer = seed_dancer(&ports, 1, true).await;
        let entry = svc
            .submit(
                Submitter::Dancer(dancer.id),
                submission(&event, vec![dancer.id.to_string()]),
            )
            .await
            .unwrap();

        svc.approve_entry(entry.id).await.unwrap();
        let paid = svc
            .set_payment_status(entry.id, PaymentStatus::Paid)
            .await
            .unwrap();

        assert!(paid.approved);
        assert_eq!(paid.payment_status, PaymentStatus::Paid);
        assert_eq!(svc.list_for_event(event.id).await.unwrap().len(), 1);
        assert_eq!(
            svc.list_for_submitter(Submitter::Dancer(dancer.id))
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
