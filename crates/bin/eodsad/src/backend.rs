//! The production [`Backend`]: `SQLite` repositories, Argon2 and HMAC
//! credentials, and gateways chosen from configuration.

use anyhow::Context;
use chrono::Duration;

use eodsa_adapter_crypto::{Argon2Hasher, HmacSessionTokens};
use eodsa_adapter_gateways::{CaptchaGateway, MailGateway};
use eodsa_adapter_storage_sqlite_sqlx::{
    Database, SqliteApplicationRepository, SqliteContestantRepository, SqliteDancerRepository,
    SqliteEntryRepository, SqliteEventRepository, SqliteJudgeRepository,
    SqlitePasswordResetRepository, SqliteScoreRepository, SqliteStudioRepository,
};
use eodsa_app::ports::{Backend, Ports};
use eodsa_app::rate_limit::SlidingWindowLimiter;

use crate::config::Config;

pub struct Production;

impl Backend for Production {
    type Dancers = SqliteDancerRepository;
    type Studios = SqliteStudioRepository;
    type Applications = SqliteApplicationRepository;
    type Events = SqliteEventRepository;
    type Entries = SqliteEntryRepository;
    type Contestants = SqliteContestantRepository;
    type Judges = SqliteJudgeRepository;
    type Scores = SqliteScoreRepository;
    type Resets = SqlitePasswordResetRepository;
    type Mailer = MailGateway;
    type Captcha = CaptchaGateway;
    type Hasher = Argon2Hasher;
    type Tokens = HmacSessionTokens;
    type Limiter = SlidingWindowLimiter;
}

/// Wire every port over `db` according to `config`.
pub fn ports(db: &Database, config: &Config) -> anyhow::Result<Ports<Production>> {
    let pool = db.pool();
    let tokens = HmacSessionTokens::new(
        config.auth.session_secret.as_bytes(),
        Duration::minutes(config.auth.session_ttl_minutes),
    )
    .context("failed to initialise session tokens")?;
    let captcha = CaptchaGateway::from_secret(config.recaptcha.secret.clone())
        .context("failed to build reCAPTCHA client")?;
    let mailer =
        MailGateway::from_endpoint(config.mail.endpoint.clone(), config.mail.api_key.clone())
            .context("failed to build mail relay client")?;
    if matches!(mailer, MailGateway::Log(_)) {
        tracing::warn!("no mail relay configured, emails will only be logged");
    }

    Ok(Ports {
        dancers: SqliteDancerRepository::new(pool.clone()),
        studios: SqliteStudioRepository::new(pool.clone()),
        applications: SqliteApplicationRepository::new(pool.clone()),
        events: SqliteEventRepository::new(pool.clone()),
        entries: SqliteEntryRepository::new(pool.clone()),
        contestants: SqliteContestantRepository::new(pool.clone()),
        judges: SqliteJudgeRepository::new(pool.clone()),
        scores: SqliteScoreRepository::new(pool.clone()),
        resets: SqlitePasswordResetRepository::new(pool.clone()),
        mailer,
        captcha,
        hasher: Argon2Hasher::new(),
        tokens,
        limiter: SlidingWindowLimiter::for_registrations(),
    })
}
