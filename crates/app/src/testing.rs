//! In-memory port implementations shared by the service tests.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};

use chrono::{Duration, NaiveDate};
use eodsa_domain::application::{ApplicationStatus, StudioApplication};
use eodsa_domain::approval::ApprovalStatus;
use eodsa_domain::contestant::Contestant;
use eodsa_domain::credential::PasswordReset;
use eodsa_domain::dancer::{Dancer, EodsaId};
use eodsa_domain::entry::{EventEntry, Submitter};
use eodsa_domain::error::{AuthError, ConflictError, EodsaError};
use eodsa_domain::event::Event;
use eodsa_domain::id::{
    ApplicationId, ContestantId, DancerId, EntryId, EventId, JudgeId, ScoreId, StudioId,
};
use eodsa_domain::judge::Judge;
use eodsa_domain::performance::PerformanceType;
use eodsa_domain::score::Score;
use eodsa_domain::session::Principal;
use eodsa_domain::studio::Studio;
use eodsa_domain::time::{Timestamp, today};
use rust_decimal::Decimal;

use crate::ports::{
    ApplicationRepository, Backend, CaptchaVerifier, ContestantRepository, DancerRepository,
    Email, EntryRepository, EventRepository, JudgeRepository, Mailer, PasswordHasher,
    PasswordResetRepository, Ports, RateLimiter, ScoreRepository, SessionTokens,
    StudioRepository,
};
use crate::rate_limit::SlidingWindowLimiter;

type Table<K, V> = Arc<Mutex<HashMap<K, V>>>;

fn duplicate(entity: &'static str, field: &'static str) -> EodsaError {
    ConflictError::Duplicate { entity, field }.into()
}

#[derive(Clone, Default)]
pub struct InMemoryDancers(Table<DancerId, Dancer>);

impl DancerRepository for InMemoryDancers {
    async fn create(&self, dancer: Dancer) -> Result<Dancer, EodsaError> {
        let mut store = self.0.lock().unwrap();
        for other in store.values() {
            if other.national_id == dancer.national_id {
                return Err(duplicate("dancer", "national id"));
            }
            if other.email.is_some() && other.email == dancer.email {
                return Err(duplicate("dancer", "email"));
            }
            if other.eodsa_id == dancer.eodsa_id {
                return Err(duplicate("dancer", "eodsa id"));
            }
        }
        store.insert(dancer.id, dancer.clone());
        Ok(dancer)
    }

    async fn get_by_id(&self, id: DancerId) -> Result<Option<Dancer>, EodsaError> {
        Ok(self.0.lock().unwrap().get(&id).cloned())
    }

    async fn get_by_eodsa_id(&self, eodsa_id: &EodsaId) -> Result<Option<Dancer>, EodsaError> {
        let store = self.0.lock().unwrap();
        Ok(store.values().find(|d| &d.eodsa_id == eodsa_id).cloned())
    }

    async fn list(&self, status: Option<ApprovalStatus>) -> Result<Vec<Dancer>, EodsaError> {
        let store = self.0.lock().unwrap();
        let mut out: Vec<Dancer> = store
            .values()
            .filter(|d| status.is_none_or(|s| d.approval.status == s))
            .cloned()
            .collect();
        out.sort_by_key(|d| d.created_at);
        Ok(out)
    }

    async fn update(&self, dancer: Dancer) -> Result<Dancer, EodsaError> {
        self.0.lock().unwrap().insert(dancer.id, dancer.clone());
        Ok(dancer)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStudios(Table<StudioId, Studio>);

impl StudioRepository for InMemoryStudios {
    async fn create(&self, studio: Studio) -> Result<Studio, EodsaError> {
        let mut store = self.0.lock().unwrap();
        for other in store.values() {
            if other.email == studio.email {
                return Err(duplicate("studio", "email"));
            }
            if other.registration_number == studio.registration_number {
                return Err(duplicate("studio", "registration number"));
            }
        }
        store.insert(studio.id, studio.clone());
        Ok(studio)
    }

    async fn get_by_id(&self, id: StudioId) -> Result<Option<Studio>, EodsaError> {
        Ok(self.0.lock().unwrap().get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Studio>, EodsaError> {
        let store = self.0.lock().unwrap();
        Ok(store.values().find(|s| s.email == email).cloned())
    }

    async fn list(&self, status: Option<ApprovalStatus>) -> Result<Vec<Studio>, EodsaError> {
        let store = self.0.lock().unwrap();
        Ok(store
            .values()
            .filter(|s| status.is_none_or(|st| s.approval.status == st))
            .cloned()
            .collect())
    }

    async fn update(&self, studio: Studio) -> Result<Studio, EodsaError> {
        self.0.lock().unwrap().insert(studio.id, studio.clone());
        Ok(studio)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryApplications(Table<ApplicationId, StudioApplication>);

impl ApplicationRepository for InMemoryApplications {
    async fn create(&self, application: StudioApplication) -> Result<StudioApplication, EodsaError> {
        let mut store = self.0.lock().unwrap();
        let open = store.values().any(|a| {
            a.dancer_id == application.dancer_id
                && a.studio_id == application.studio_id
                && a.status.is_open()
        });
        if open {
            return Err(ConflictError::AlreadyApplied.into());
        }
        store.insert(application.id, application.clone());
        Ok(application)
    }

    async fn get_by_id(&self, id: ApplicationId) -> Result<Option<StudioApplication>, EodsaError> {
        Ok(self.0.lock().unwrap().get(&id).cloned())
    }

    async fn find_open(
        &self,
        dancer_id: DancerId,
        studio_id: StudioId,
    ) -> Result<Option<StudioApplication>, EodsaError> {
        let store = self.0.lock().unwrap();
        Ok(store
            .values()
            .find(|a| a.dancer_id == dancer_id && a.studio_id == studio_id && a.status.is_open())
            .cloned())
    }

    async fn list_for_studio(
        &self,
        studio_id: StudioId,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<StudioApplication>, EodsaError> {
        let store = self.0.lock().unwrap();
        Ok(store
            .values()
            .filter(|a| a.studio_id == studio_id && status.is_none_or(|s| a.status == s))
            .cloned()
            .collect())
    }

    async fn list_for_dancer(
        &self,
        dancer_id: DancerId,
    ) -> Result<Vec<StudioApplication>, EodsaError> {
        let store = self.0.lock().unwrap();
        Ok(store
            .values()
            .filter(|a| a.dancer_id == dancer_id)
            .cloned()
            .collect())
    }

    async fn update(&self, application: StudioApplication) -> Result<StudioApplication, EodsaError> {
        self.0
            .lock()
            .unwrap()
            .insert(application.id, application.clone());
        Ok(application)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryEvents(Table<EventId, Event>);

impl EventRepository for InMemoryEvents {
    async fn create(&self, event: Event) -> Result<Event, EodsaError> {
        self.0.lock().unwrap().insert(event.id, event.clone());
        Ok(event)
    }

    async fn get_by_id(&self, id: EventId) -> Result<Option<Event>, EodsaError> {
        Ok(self.0.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Event>, EodsaError> {
        let mut out: Vec<Event> = self.0.lock().unwrap().values().cloned().collect();
        out.sort_by_key(|e| e.event_date);
        Ok(out)
    }

    async fn update(&self, event: Event) -> Result<Event, EodsaError> {
        self.0.lock().unwrap().insert(event.id, event.clone());
        Ok(event)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryEntries(Table<EntryId, EventEntry>);

impl EntryRepository for InMemoryEntries {
    async fn create(&self, entry: EventEntry) -> Result<EventEntry, EodsaError> {
        self.0.lock().unwrap().insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn get_by_id(&self, id: EntryId) -> Result<Option<EventEntry>, EodsaError> {
        Ok(self.0.lock().unwrap().get(&id).cloned())
    }

    async fn list_for_event(&self, event_id: EventId) -> Result<Vec<EventEntry>, EodsaError> {
        let store = self.0.lock().unwrap();
        Ok(store
            .values()
            .filter(|e| e.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn list_for_submitter(&self, submitter: Submitter) -> Result<Vec<EventEntry>, EodsaError> {
        let store = self.0.lock().unwrap();
        Ok(store
            .values()
            .filter(|e| e.submitter == submitter)
            .cloned()
            .collect())
    }

    async fn find_by_item_number(
        &self,
        event_id: EventId,
        item_number: u32,
    ) -> Result<Option<EventEntry>, EodsaError> {
        let store = self.0.lock().unwrap();
        Ok(store
            .values()
            .find(|e| e.event_id == event_id && e.item_number == Some(item_number))
            .cloned())
    }

    async fn update(&self, entry: EventEntry) -> Result<EventEntry, EodsaError> {
        let mut store = self.0.lock().unwrap();
        let taken = entry.item_number.is_some()
            && store.values().any(|e| {
                e.id != entry.id && e.event_id == entry.event_id && e.item_number == entry.item_number
            });
        if taken {
            return Err(duplicate("entry", "item number"));
        }
        store.insert(entry.id, entry.clone());
        Ok(entry)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryContestants(Table<ContestantId, Contestant>);

impl ContestantRepository for InMemoryContestants {
    async fn create(&self, contestant: Contestant) -> Result<Contestant, EodsaError> {
        self.0
            .lock()
            .unwrap()
            .insert(contestant.id, contestant.clone());
        Ok(contestant)
    }

    async fn get_by_id(&self, id: ContestantId) -> Result<Option<Contestant>, EodsaError> {
        Ok(self.0.lock().unwrap().get(&id).cloned())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryJudges(Table<JudgeId, Judge>);

impl JudgeRepository for InMemoryJudges {
    async fn create(&self, judge: Judge) -> Result<Judge, EodsaError> {
        let mut store = self.0.lock().unwrap();
        if store.values().any(|j| j.email == judge.email) {
            return Err(duplicate("judge", "email"));
        }
        store.insert(judge.id, judge.clone());
        Ok(judge)
    }

    async fn get_by_id(&self, id: JudgeId) -> Result<Option<Judge>, EodsaError> {
        Ok(self.0.lock().unwrap().get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Judge>, EodsaError> {
        let store = self.0.lock().unwrap();
        Ok(store.values().find(|j| j.email == email).cloned())
    }

    async fn update(&self, judge: Judge) -> Result<Judge, EodsaError> {
        self.0.lock().unwrap().insert(judge.id, judge.clone());
        Ok(judge)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryScores(Table<ScoreId, Score>);

impl ScoreRepository for InMemoryScores {
    async fn create(&self, score: Score) -> Result<Score, EodsaError> {
        let mut store = self.0.lock().unwrap();
        if store
            .values()
            .any(|s| s.judge_id == score.judge_id && s.entry_id == score.entry_id)
        {
            return Err(duplicate("score", "judge and entry"));
        }
        store.insert(score.id, score.clone());
        Ok(score)
    }

    async fn find(&self, judge_id: JudgeId, entry_id: EntryId) -> Result<Option<Score>, EodsaError> {
        let store = self.0.lock().unwrap();
        Ok(store
            .values()
            .find(|s| s.judge_id == judge_id && s.entry_id == entry_id)
            .cloned())
    }

    async fn update(&self, score: Score) -> Result<Score, EodsaError> {
        self.0.lock().unwrap().insert(score.id, score.clone());
        Ok(score)
    }

    async fn list_for_entry(&self, entry_id: EntryId) -> Result<Vec<Score>, EodsaError> {
        let store = self.0.lock().unwrap();
        Ok(store
            .values()
            .filter(|s| s.entry_id == entry_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Score>, EodsaError> {
        Ok(self.0.lock().unwrap().values().cloned().collect())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryResets(Table<String, PasswordReset>);

impl PasswordResetRepository for InMemoryResets {
    async fn create(&self, reset: PasswordReset) -> Result<PasswordReset, EodsaError> {
        self.0
            .lock()
            .unwrap()
            .insert(reset.token.clone(), reset.clone());
        Ok(reset)
    }

    async fn get(&self, token: &str) -> Result<Option<PasswordReset>, EodsaError> {
        Ok(self.0.lock().unwrap().get(token).cloned())
    }

    async fn mark_used(&self, token: &str, at: Timestamp) -> Result<bool, EodsaError> {
        match self.0.lock().unwrap().get_mut(token) {
            Some(reset) if reset.used_at.is_none() => {
                reset.used_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Records every email; fails every send when `failing` is set.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    pub sent: Arc<Mutex<Vec<Email>>>,
    pub failing: bool,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().unwrap().clone()
    }
}

impl Mailer for RecordingMailer {
    async fn send(&self, email: Email) -> Result<(), EodsaError> {
        if self.failing {
            return Err(EodsaError::gateway(std::io::Error::other("relay down")));
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// Accepts any token except `"bad"`; `"down"` simulates an outage.
#[derive(Clone, Default)]
pub struct StubCaptcha;

impl CaptchaVerifier for StubCaptcha {
    async fn verify(&self, token: &str, _remote_ip: Option<IpAddr>) -> Result<bool, EodsaError> {
        match token {
            "down" => Err(EodsaError::gateway(std::io::Error::other("captcha down"))),
            "bad" => Ok(false),
            _ => Ok(true),
        }
    }
}

#[derive(Clone, Default)]
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, EodsaError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        hash.strip_prefix("plain:") == Some(password)
    }
}

/// Opaque counter tokens mapped to principals.
#[derive(Clone, Default)]
pub struct TableTokens(Table<String, Principal>);

impl SessionTokens for TableTokens {
    fn issue(&self, principal: Principal) -> Result<String, EodsaError> {
        let mut store = self.0.lock().unwrap();
        let token = format!("token-{}", store.len() + 1);
        store.insert(token.clone(), principal);
        Ok(token)
    }

    fn verify(&self, token: &str) -> Result<Principal, EodsaError> {
        self.0
            .lock()
            .unwrap()
            .get(token)
            .copied()
            .ok_or_else(|| AuthError::InvalidToken.into())
    }
}

pub struct TestBackend;

impl Backend for TestBackend {
    type Dancers = InMemoryDancers;
    type Studios = InMemoryStudios;
    type Applications = InMemoryApplications;
    type Events = InMemoryEvents;
    type Entries = InMemoryEntries;
    type Contestants = InMemoryContestants;
    type Judges = InMemoryJudges;
    type Scores = InMemoryScores;
    type Resets = InMemoryResets;
    type Mailer = RecordingMailer;
    type Captcha = StubCaptcha;
    type Hasher = PlainHasher;
    type Tokens = TableTokens;
    type Limiter = SlidingWindowLimiter;
}

pub fn ports() -> Ports<TestBackend> {
    Ports {
        dancers: InMemoryDancers::default(),
        studios: InMemoryStudios::default(),
        applications: InMemoryApplications::default(),
        events: InMemoryEvents::default(),
        entries: InMemoryEntries::default(),
        contestants: InMemoryContestants::default(),
        judges: InMemoryJudges::default(),
        scores: InMemoryScores::default(),
        resets: InMemoryResets::default(),
        mailer: RecordingMailer::default(),
        captcha: StubCaptcha,
        hasher: PlainHasher,
        tokens: TableTokens::default(),
        limiter: SlidingWindowLimiter::for_registrations(),
    }
}

// Fixtures

pub fn adult_birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1995, 4, 12).unwrap()
}

pub fn child_birth_date() -> NaiveDate {
    today() - Duration::days(365 * 10 + 3)
}

/// Thirteen-digit national id derived from `seed`.
pub fn national_id(seed: u32) -> String {
    format!("{:013}", 9_501_010_000_000_u64 + u64::from(seed))
}

pub async fn seed_dancer(ports: &Ports<TestBackend>, seed: u32, approved: bool) -> Dancer {
    let mut dancer = Dancer::builder()
        .name(format!("Dancer {seed}"))
        .date_of_birth(adult_birth_date())
        .national_id(national_id(seed))
        .email(Some(format!("dancer{seed}@example.com")))
        .build()
        .unwrap();
    if approved {
        dancer.approval.decide(
            eodsa_domain::approval::Decision::Approve,
            JudgeId::new(),
            eodsa_domain::time::now(),
        );
    }
    ports.dancers.create(dancer).await.unwrap()
}

pub async fn seed_studio(ports: &Ports<TestBackend>, seed: u32) -> Studio {
    let studio = Studio::builder()
        .name(format!("Studio {seed}"))
        .contact_person("Owner")
        .email(format!("studio{seed}@example.com"))
        .phone("0210000000")
        .password_hash("plain:secret-pass")
        .build()
        .unwrap();
    ports.studios.create(studio).await.unwrap()
}

pub async fn seed_event(ports: &Ports<TestBackend>, kind: PerformanceType) -> Event {
    let event = Event::builder()
        .name(format!("Regionals {kind}"))
        .region("Gauteng")
        .age_category("Open")
        .performance_type(kind)
        .event_date(today() + Duration::days(60))
        .registration_deadline(today() + Duration::days(30))
        .venue("Civic Theatre")
        .entry_fee(Decimal::new(15000, 2))
        .created_by(JudgeId::new())
        .build()
        .unwrap();
    ports.events.create(event).await.unwrap()
}
