//! Fixtures shared by the repository tests.

use chrono::{Duration, NaiveDate};
use eodsa_domain::dancer::Dancer;
use eodsa_domain::event::Event;
use eodsa_domain::id::JudgeId;
use eodsa_domain::performance::PerformanceType;
use eodsa_domain::studio::Studio;
use eodsa_domain::time::today;
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use crate::pool::Config;

pub async fn memory_pool() -> SqlitePool {
    let db = Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .unwrap();
    db.pool().clone()
}

pub fn dancer(seed: u32) -> Dancer {
    Dancer::builder()
        .name(format!("Dancer {seed}"))
        .date_of_birth(NaiveDate::from_ymd_opt(1998, 2, 14).unwrap())
        .national_id(format!("{:013}", 9_802_140_000_000_u64 + u64::from(seed)))
        .email(Some(format!("dancer{seed}@example.com")))
        .build()
        .unwrap()
}

pub fn studio(seed: u32) -> Studio {
    Studio::builder()
        .name(format!("Studio {seed}"))
        .contact_person("Owner")
        .email(format!("studio{seed}@example.com"))
        .phone("0210000000")
        .password_hash("$argon2id$stub")
        .build()
        .unwrap()
}

pub fn event(kind: PerformanceType) -> Event {
    Event::builder()
        .name(format!("Nationals {kind}"))
        .region("Gauteng")
        .age_category("Open")
        .performance_type(kind)
        .event_date(today() + Duration::days(60))
        .registration_deadline(today() + Duration::days(30))
        .venue("Civic Theatre")
        .entry_fee(Decimal::new(12050, 2))
        .created_by(JudgeId::new())
        .build()
        .unwrap()
}
