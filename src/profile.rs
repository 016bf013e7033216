use chrono::{NaiveDateTime, Local};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Timestamp layout of a stored record, e.g. `24-05-17T09:42`.
pub const PRACTICE_TIMESTAMP_FORMAT: &str = "%y-%m-%dT%H:%M";

/// Long-term mastery as seen by the scheduler. Implementations live outside a
/// session and outlive it.
pub trait PracticeTracker {
    fn has_been_practiced(&self, reference: &str) -> bool;
    fn record_practice(&mut self, reference: &str);
    fn practice_stats(&self, references: &[String]) -> PracticeStats;
}

/// Tier counts by cumulative practice days: >10, >3, >=1, none.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PracticeStats {
    pub platinum: usize,
    pub gold: usize,
    pub green: usize,
    pub grey: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeRecord {
    pub count: u32,
    pub last_practiced: Option<NaiveDateTime>,
}

fn record_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d+):(.+)$").expect("record pattern is valid"))
}

impl PracticeRecord {
    /// Parses `count:timestamp`. An unreadable timestamp still yields the count.
    pub fn parse(value: &str) -> Option<Self> {
        let caps = record_pattern().captures(value)?;
        let count = caps.get(1)?.as_str().parse::<u32>().ok()?;
        let last_practiced = caps
            .get(2)
            .and_then(|m| NaiveDateTime::parse_from_str(m.as_str(), PRACTICE_TIMESTAMP_FORMAT).ok());
        Some(PracticeRecord { count, last_practiced })
    }

    pub fn encode(count: u32, at: NaiveDateTime) -> String {
        format!("{}:{}", count, at.format(PRACTICE_TIMESTAMP_FORMAT))
    }

    fn practiced_on_same_day(&self, now: NaiveDateTime) -> bool {
        self.last_practiced
            .map_or(false, |last| last.date() == now.date())
    }
}

/// In-memory mastery store keyed by gloss ref, persisted by `profile_io`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PracticeStore {
    // Raw "count:timestamp" values, kept as-is so unknown layouts survive a round trip.
    pub records: BTreeMap<String, String>,
}

impl PracticeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Practicing again on the same calendar day only refreshes the timestamp;
    /// the first practice on a new day increments the count.
    pub fn record_practice_at(&mut self, reference: &str, now: NaiveDateTime) {
        let next = match self.records.get(reference).and_then(|v| PracticeRecord::parse(v)) {
            None => PracticeRecord::encode(1, now),
            Some(record) if record.practiced_on_same_day(now) => {
                PracticeRecord::encode(record.count, now)
            }
            Some(record) => PracticeRecord::encode(record.count.saturating_add(1), now),
        };
        self.records.insert(reference.to_string(), next);
    }

    pub fn practice_count(&self, reference: &str) -> u32 {
        self.records
            .get(reference)
            .and_then(|v| PracticeRecord::parse(v))
            .map_or(0, |r| r.count)
    }

    pub fn last_practiced(&self, reference: &str) -> Option<NaiveDateTime> {
        self.records
            .get(reference)
            .and_then(|v| PracticeRecord::parse(v))
            .and_then(|r| r.last_practiced)
    }

    pub fn was_practiced_on(&self, reference: &str, day: NaiveDateTime) -> bool {
        self.last_practiced(reference)
            .map_or(false, |last| last.date() == day.date())
    }

    pub fn was_practiced_today(&self, reference: &str) -> bool {
        self.was_practiced_on(reference, Local::now().naive_local())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PracticeTracker for PracticeStore {
    fn has_been_practiced(&self, reference: &str) -> bool {
        self.practice_count(reference) >= 1
    }

    fn record_practice(&mut self, reference: &str) {
        self.record_practice_at(reference, Local::now().naive_local());
    }

    fn practice_stats(&self, references: &[String]) -> PracticeStats {
        let mut stats = PracticeStats::default();
        for reference in references {
            match self.practice_count(reference) {
                c if c > 10 => stats.platinum += 1,
                c if c > 3 => stats.gold += 1,
                c if c >= 1 => stats.green += 1,
                _ => stats.grey += 1,
            }
        }
        stats
    }
}
