use chrono::NaiveDate;
use std::collections::{btree_map, BTreeMap, HashMap, HashSet};

use crate::record::LogRecord;

/// Distinct users seen on one URL within a day.
#[derive(Debug, Clone)]
pub struct UrlStat {
    pub url: String,
    pub visitors: HashSet<String>,
}

impl UrlStat {
    fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            visitors: HashSet::new(),
        }
    }

    pub fn unique_visitor_count(&self) -> usize {
        self.visitors.len()
    }
}

/// Distinct URLs one user visited within a day.
#[derive(Debug, Clone)]
pub struct UserStat {
    pub user_id: String,
    pub visited_urls: HashSet<String>,
}

impl UserStat {
    fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            visited_urls: HashSet::new(),
        }
    }

    pub fn unique_page_count(&self) -> usize {
        self.visited_urls.len()
    }
}

/// Everything tallied for a single event date.
#[derive(Debug, Clone)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub url_stats: HashMap<String, UrlStat>,
    pub user_stats: HashMap<String, UserStat>,
}

impl DailyStats {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            url_stats: HashMap::new(),
            user_stats: HashMap::new(),
        }
    }

    /// Record that `user_id` viewed `url`. Repeats are no-ops.
    pub fn tally_view(&mut self, url: &str, user_id: &str) {
        self.url_stats
            .entry(url.to_string())
            .or_insert_with(|| UrlStat::new(url))
            .visitors
            .insert(user_id.to_string());

        self.user_stats
            .entry(user_id.to_string())
            .or_insert_with(|| UserStat::new(user_id))
            .visited_urls
            .insert(url.to_string());
    }

    /// URLs by unique visitors, most first. Ties go to the lexically smaller url.
    pub fn ranked_urls(&self) -> Vec<&UrlStat> {
        let mut ranked: Vec<&UrlStat> = self.url_stats.values().collect();
        ranked.sort_unstable_by(|a, b| {
            b.unique_visitor_count()
                .cmp(&a.unique_visitor_count())
                .then_with(|| a.url.cmp(&b.url))
        });
        ranked
    }

    /// Users by unique pages viewed, most first. Ties go to the lexically smaller id.
    pub fn ranked_users(&self) -> Vec<&UserStat> {
        let mut ranked: Vec<&UserStat> = self.user_stats.values().collect();
        ranked.sort_unstable_by(|a, b| {
            b.unique_page_count()
                .cmp(&a.unique_page_count())
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        ranked
    }
}

/// Per-day statistics for one ingestion run, iterated in date order.
#[derive(Debug, Clone, Default)]
pub struct StatsByDay {
    days: BTreeMap<NaiveDate, DailyStats>,
}

impl StatsByDay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stats for `date`, created empty on first use.
    pub fn upsert(&mut self, date: NaiveDate) -> &mut DailyStats {
        self.days
            .entry(date)
            .or_insert_with(|| DailyStats::new(date))
    }

    pub fn tally(&mut self, record: &LogRecord) {
        self.upsert(record.event_date())
            .tally_view(&record.url, &record.user_id);
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyStats> {
        self.days.get(&date)
    }

    pub fn iter(&self) -> btree_map::Values<'_, NaiveDate, DailyStats> {
        self.days.values()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl<'a> IntoIterator for &'a StatsByDay {
    type Item = &'a DailyStats;
    type IntoIter = btree_map::Values<'a, NaiveDate, DailyStats>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
