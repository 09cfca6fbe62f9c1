use chrono::NaiveDate;
use serde::Serialize;

use crate::stats::DailyStats;
use crate::utils::{format_number, redact_user};

/// Output controls applied while building a report.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Keep at most this many URLs and users per day.
    pub top: Option<usize>,
    /// Mask user identifiers.
    pub redact: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub name: String,
    pub count: usize,
}

/// One day's ranked summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayReport {
    pub date: NaiveDate,
    pub urls: Vec<RankedEntry>,
    pub users: Vec<RankedEntry>,
}

impl DayReport {
    pub fn build(stats: &DailyStats, options: &ReportOptions) -> Self {
        let limit = options.top.unwrap_or(usize::MAX);

        let urls = stats
            .ranked_urls()
            .into_iter()
            .take(limit)
            .map(|stat| RankedEntry {
                name: stat.url.clone(),
                count: stat.unique_visitor_count(),
            })
            .collect();

        let users = stats
            .ranked_users()
            .into_iter()
            .take(limit)
            .map(|stat| RankedEntry {
                name: if options.redact {
                    redact_user(&stat.user_id)
                } else {
                    stat.user_id.clone()
                },
                count: stat.unique_page_count(),
            })
            .collect();

        Self {
            date: stats.date,
            urls,
            users,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(1 + self.urls.len() + self.users.len());
        lines.push(format!("Stats for {}:", self.date));
        for entry in &self.urls {
            lines.push(format!(
                "{}: {} unique visitors",
                entry.name,
                format_number(entry.count)
            ));
        }
        for entry in &self.users {
            lines.push(format!(
                "{}: {} unique page views",
                entry.name,
                format_number(entry.count)
            ));
        }
        lines
    }
}

/// Header line followed by every URL then every user, each ranked by count.
pub fn render(stats: &DailyStats) -> Vec<String> {
    render_with(stats, &ReportOptions::default())
}

pub fn render_with(stats: &DailyStats, options: &ReportOptions) -> Vec<String> {
    DayReport::build(stats, options).lines()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_day() -> DailyStats {
        let mut day = DailyStats::new(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        day.tally_view("/a", "u1");
        day.tally_view("/a", "u2");
        day.tally_view("/b", "u1");
        day
    }

    #[test]
    fn test_render_sample_day() {
        assert_eq!(
            render(&sample_day()),
            vec![
                "Stats for 2023-01-01:",
                "/a: 2 unique visitors",
                "/b: 1 unique visitors",
                "u1: 2 unique page views",
                "u2: 1 unique page views",
            ]
        );
    }

    #[test]
    fn test_render_is_non_increasing() {
        let mut day = DailyStats::new(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        for (url, user) in [
            ("/x", "a"),
            ("/y", "a"),
            ("/y", "b"),
            ("/z", "a"),
            ("/z", "b"),
            ("/z", "c"),
            ("/w", "d"),
        ] {
            day.tally_view(url, user);
        }

        let report = DayReport::build(&day, &ReportOptions::default());
        assert!(report.urls.windows(2).all(|w| w[0].count >= w[1].count));
        assert!(report.users.windows(2).all(|w| w[0].count >= w[1].count));
        assert_eq!(report.urls[0].name, "/z");
        assert_eq!(report.users[0].name, "a");
    }

    #[test]
    fn test_top_limits_each_section() {
        let options = ReportOptions {
            top: Some(1),
            redact: false,
        };
        let lines = render_with(&sample_day(), &options);
        assert_eq!(
            lines,
            vec![
                "Stats for 2023-01-01:",
                "/a: 2 unique visitors",
                "u1: 2 unique page views",
            ]
        );
    }

    #[test]
    fn test_redact_masks_users_only() {
        let options = ReportOptions {
            top: None,
            redact: true,
        };
        let report = DayReport::build(&sample_day(), &options);
        assert_eq!(report.urls[0].name, "/a");
        assert_eq!(report.users[0].name, "u*");
    }

    #[test]
    fn test_render_does_not_mutate() {
        let day = sample_day();
        let first = render(&day);
        assert_eq!(first, render(&day));
        assert_eq!(day.url_stats.len(), 2);
    }

    #[test]
    fn test_serializes_date_as_iso_string() {
        let report = DayReport::build(&sample_day(), &ReportOptions::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["date"], "2023-01-01");
        assert_eq!(json["urls"][0]["name"], "/a");
        assert_eq!(json["users"][1]["count"], 1);
    }
}
