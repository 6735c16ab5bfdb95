//! Ranking: deterministic aggregation of judge scores.
//!
//! Each score contributes its total (technique + artistry + presentation +
//! overall). An entry's aggregate is the arithmetic mean of those totals over
//! the judges who scored it. Entries are ordered by aggregate descending, then
//! by entry id ascending. Aggregates are compared exactly by
//! cross-multiplication, so equal means always tie. Tied entries share a rank
//! (standard competition ranking: 1, 2, 2, 4).

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entry::{EventEntry, Submitter};
use crate::event::Event;
use crate::id::{EntryId, EventId};
use crate::performance::PerformanceType;
use crate::score::Score;

/// One line of a ranking table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    pub rank: u32,
    pub entry_id: EntryId,
    pub event_id: EventId,
    pub event_name: String,
    pub region: String,
    pub age_category: String,
    pub performance_type: PerformanceType,
    pub item_name: String,
    pub item_number: Option<u32>,
    pub submitter: Submitter,
    pub judge_count: u32,
    pub total_points: u32,
    pub average_total: f64,
    pub average_overall: f64,
}

struct Tally {
    judges: u32,
    total: u32,
    overall: u32,
}

impl Tally {
    /// Compare means `self.total / self.judges` against `other`'s exactly.
    fn cmp_mean(&self, other: &Self) -> Ordering {
        let lhs = u64::from(self.total) * u64::from(other.judges);
        let rhs = u64::from(other.total) * u64::from(self.judges);
        lhs.cmp(&rhs)
    }
}

fn mean(sum: u32, count: u32) -> f64 {
    let raw = f64::from(sum) / f64::from(count);
    (raw * 100.0).round() / 100.0
}

/// Rank `entries` (each paired with its event) using `scores`.
///
/// Scores for entries not in `entries` are ignored, and entries with no
/// scores are left out of the result.
#[must_use]
pub fn rank(entries: &[(&Event, &EventEntry)], scores: &[Score]) -> Vec<Ranking> {
    let mut tallies: HashMap<EntryId, Tally> = HashMap::new();
    for score in scores {
        let tally = tallies.entry(score.entry_id).or_insert(Tally {
            judges: 0,
            total: 0,
            overall: 0,
        });
        tally.judges += 1;
        tally.total += score.marks.total();
        tally.overall += u32::from(score.marks.overall);
    }

    let mut scored: Vec<(&Event, &EventEntry, &Tally)> = entries
        .iter()
        .filter_map(|(event, entry)| tallies.get(&entry.id).map(|t| (*event, *entry, t)))
        .collect();

    scored.sort_by(|(_, a_entry, a), (_, b_entry, b)| {
        b.cmp_mean(a).then_with(|| a_entry.id.cmp(&b_entry.id))
    });

    let mut out: Vec<Ranking> = Vec::with_capacity(scored.len());
    let mut previous: Option<&Tally> = None;
    for (position, &(event, entry, tally)) in scored.iter().enumerate() {
        let rank = match (previous, out.last()) {
            (Some(prev), Some(last)) if prev.cmp_mean(tally) == Ordering::Equal => last.rank,
            _ => u32::try_from(position + 1).unwrap_or(u32::MAX),
        };
        out.push(Ranking {
            rank,
            entry_id: entry.id,
            event_id: event.id,
            event_name: event.name.clone(),
            region: event.region.clone(),
            age_category: event.age_category.clone(),
            performance_type: event.performance_type,
            item_name: entry.item.item_name.clone(),
            item_number: entry.item_number,
            submitter: entry.submitter,
            judge_count: tally.judges,
            total_points: tally.total,
            average_total: mean(tally.total, tally.judges),
            average_overall: mean(tally.overall, tally.judges),
        });
        previous = Some(tally);
    }
    out
}
