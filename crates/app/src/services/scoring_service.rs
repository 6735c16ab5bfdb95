//! Scoring service: judge score upserts and ranking tables.

use std::collections::HashMap;

use eodsa_domain::error::{EodsaError, NotFoundError};
use eodsa_domain::event::{Event, EventFilter};
use eodsa_domain::id::{EntryId, JudgeId};
use eodsa_domain::ranking::{Ranking, rank};
use eodsa_domain::score::{Marks, Score};
use eodsa_domain::time::now;

use crate::ports::{Backend, EntryRepository, EventRepository, Ports, ScoreRepository};

pub struct ScoringService<B: Backend> {
    scores: B::Scores,
    entries: B::Entries,
    events: B::Events,
}

impl<B: Backend> ScoringService<B> {
    pub fn new(ports: &Ports<B>) -> Self {
        Self {
            scores: ports.scores.clone(),
            entries: ports.entries.clone(),
            events: ports.events.clone(),
        }
    }

    /// Record `judge_id`'s marks for an entry, replacing any earlier marks
    /// from the same judge while keeping the score's identity.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::NotFound`] when the entry does not exist.
    pub async fn submit_score(
        &self,
        judge_id: JudgeId,
        entry_id: EntryId,
        marks: Marks,
        comments: Option<String>,
    ) -> Result<Score, EodsaError> {
        if self.entries.get_by_id(entry_id).await?.is_none() {
            return Err(NotFoundError {
                entity: "Entry",
                id: entry_id.to_string(),
            }
            .into());
        }

        if let Some(existing) = self.scores.find(judge_id, entry_id).await? {
            return self.revise(existing, marks, comments).await;
        }
        match self
            .scores
            .create(Score::new(judge_id, entry_id, marks, comments.clone()))
            .await
        {
            Ok(score) => {
                tracing::info!(%judge_id, %entry_id, total = score.marks.total(), "score recorded");
                Ok(score)
            }
            // A concurrent submission by the same judge won the insert.
            Err(err) if err.is_duplicate("score", "judge and entry") => {
                let existing = self.scores.find(judge_id, entry_id).await?.ok_or(err)?;
                self.revise(existing, marks, comments).await
            }
            Err(err) => Err(err),
        }
    }

    /// Every judge's score for one entry.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn scores_for_entry(&self, entry_id: EntryId) -> Result<Vec<Score>, EodsaError> {
        self.scores.list_for_entry(entry_id).await
    }

    /// Ranking table across every event matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repositories.
    pub async fn rankings(&self, filter: &EventFilter) -> Result<Vec<Ranking>, EodsaError> {
        let events: Vec<Event> = self
            .events
            .list()
            .await?
            .into_iter()
            .filter(|event| filter.matches(event))
            .collect();
        let mut entries = Vec::new();
        for event in &events {
            entries.extend(self.entries.list_for_event(event.id).await?);
        }
        let by_id: HashMap<_, &Event> = events.iter().map(|e| (e.id, e)).collect();
        let pairs: Vec<_> = entries
            .iter()
            .filter_map(|entry| by_id.get(&entry.event_id).map(|event| (*event, entry)))
            .collect();

        let scores = self.scores.list_all().await?;
        Ok(rank(&pairs, &scores))
    }

    async fn revise(
        &self,
        mut score: Score,
        marks: Marks,
        comments: Option<String>,
    ) -> Result<Score, EodsaError> {
        score.revise(marks, comments, now());
        let score = self.scores.update(score).await?;
        tracing::info!(
            judge_id = %score.judge_id,
            entry_id = %score.entry_id,
            total = score.marks.total(),
            "score revised"
        );
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::EntrySubmission;
    use crate::services::entry_service::EntryService;
    use crate::testing::{TestBackend, ports, seed_dancer, seed_event};
    use eodsa_domain::entry::{EventEntry, ItemDetails, Submitter};
    use eodsa_domain::performance::{ItemStyle, MasteryLevel, PerformanceType};

    async fn entry(ports: &Ports<TestBackend>, event: &Event, seed: u32) -> EventEntry {
        let dancer = seed_dancer(ports, seed, true).await;
        EntryService::new(ports)
            .submit(
                Submitter::Dancer(dancer.id),
                EntrySubmission {
                    event_id: event.id,
                    performance_type: None,
                    participant_ids: vec![dancer.id.to_string()],
                    item: ItemDetails {
                        item_name: format!("Item {seed}"),
                        choreographer: "Self".to_string(),
                        mastery: MasteryLevel::Advanced,
                        item_style: ItemStyle::Ballet,
                        duration_seconds: 90,
                    },
                },
            )
            .await
            .unwrap()
    }

    fn marks(value: i64) -> Marks {
        Marks::new(value, value, value, value).unwrap()
    }

    #[tokio::test]
    async fn should_update_in_place_on_resubmission() {
        let ports = ports();
        let svc = ScoringService::new(&ports);
        let event = seed_event(&ports, PerformanceType::Solo).await;
        let entry = entry(&ports, &event, 1).await;
        let judge = JudgeId::new();

        let first = svc
            .submit_score(judge, entry.id, marks(6), None)
            .await
            .unwrap();
        let second = svc
            .submit_score(judge, entry.id, marks(8), Some("cleaner turns".to_string()))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        let stored = svc.scores_for_entry(entry.id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].marks.total(), 32);
        assert_eq!(stored[0].comments.as_deref(), Some("cleaner turns"));
    }

    #[tokio::test]
    async fn should_reject_score_for_unknown_entry() {
        let svc = ScoringService::new(&ports());
        let result = svc
            .submit_score(JudgeId::new(), EntryId::new(), marks(5), None)
            .await;
        assert!(matches!(result, Err(EodsaError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_rank_by_mean_total_within_filter() {
        let ports = ports();
        let svc = ScoringService::new(&ports);
        let solo = seed_event(&ports, PerformanceType::Solo).await;
        let low = entry(&ports, &solo, 1).await;
        let high = entry(&ports, &solo, 2).await;
        let unscored = entry(&ports, &solo, 3).await;
        let (a, b) = (JudgeId::new(), JudgeId::new());

        svc.submit_score(a, low.id, marks(5), None).await.unwrap();
        svc.submit_score(a, high.id, marks(9), None).await.unwrap();
        svc.submit_score(b, high.id, marks(7), None).await.unwrap();

        let table = svc.rankings(&EventFilter::default()).await.unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].entry_id, high.id);
        assert_eq!(table[0].judge_count, 2);
        assert_eq!(table[1].entry_id, low.id);
        assert!(table.iter().all(|r| r.entry_id != unscored.id));

        let groups_only = EventFilter {
            performance_type: Some(PerformanceType::Group),
            ..EventFilter::default()
        };
        assert!(svc.rankings(&groups_only).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_share_rank_for_equal_means() {
        let ports = ports();
        let svc = ScoringService::new(&ports);
        let event = seed_event(&ports, PerformanceType::Solo).await;
        let x = entry(&ports, &event, 1).await;
        let y = entry(&ports, &event, 2).await;
        let judge = JudgeId::new();

        svc.submit_score(judge, x.id, marks(7), None).await.unwrap();
        svc.submit_score(judge, y.id, marks(7), None).await.unwrap();

        let table = svc.rankings(&EventFilter::default()).await.unwrap();
        assert_eq!(table[0].rank, 1);
        assert_eq!(table[1].rank, 1);
        assert!(table[0].entry_id < table[1].entry_id);
    }
}
