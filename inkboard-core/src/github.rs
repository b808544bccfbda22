//! GitHub contribution grid.
//!
//! Fetches the contribution calendar over GraphQL, flattens it into a
//! chronological day sequence and projects a fixed 7x7 grid ending at the
//! current week's Saturday. Missing credentials or any upstream failure
//! fall back to a deterministic synthetic grid.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{InkboardError, InkboardResult};

const GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// 7 rows (Sun..Sat) by 7 weeks.
pub const GRID_DAYS: usize = 49;

const CONTRIBUTIONS_QUERY: &str = "\
query($userName:String!) {
  user(login: $userName) {
    contributionsCollection {
      contributionCalendar {
        weeks { contributionDays { contributionCount date } }
      }
    }
  }
}";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionDay {
    pub date: Option<NaiveDate>,
    pub count: u32,
    /// Intensity bucket 0..=3.
    pub level: u8,
    pub future: bool,
}

fn level_for(count: u32) -> u8 {
    match count {
        0 => 0,
        1..=5 => 1,
        6..=10 => 2,
        _ => 3,
    }
}

/// Days remaining in the current week after `today` (Sun=0..Sat=6 rows).
fn days_to_fill_week(today: NaiveDate) -> usize {
    6 - today.weekday().num_days_from_sunday() as usize
}

/// Project chronological (date, count) pairs onto the fixed grid: the most
/// recent `49 - remaining` days, then `remaining` future placeholders.
/// Short histories are left-padded with empty past days so the grid length
/// is always exactly `GRID_DAYS`.
pub fn build_grid(days: &[(NaiveDate, u32)], today: NaiveDate) -> Vec<ContributionDay> {
    let fill = days_to_fill_week(today);
    let needed = GRID_DAYS - fill;

    let mut grid = Vec::with_capacity(GRID_DAYS);

    if days.len() < needed {
        let missing = needed - days.len();
        let first_known = days
            .first()
            .map(|(date, _)| *date)
            .unwrap_or_else(|| today + Duration::days(1));
        for i in 0..missing {
            grid.push(ContributionDay {
                date: Some(first_known - Duration::days((missing - i) as i64)),
                count: 0,
                level: 0,
                future: false,
            });
        }
    }

    for (date, count) in days.iter().skip(days.len().saturating_sub(needed)) {
        grid.push(ContributionDay {
            date: Some(*date),
            count: *count,
            level: level_for(*count),
            future: false,
        });
    }

    for _ in 0..fill {
        grid.push(ContributionDay {
            date: None,
            count: 0,
            level: 0,
            future: true,
        });
    }

    grid
}

/// Deterministic synthetic grid used when GitHub is unavailable.
pub fn mock_grid(today: NaiveDate) -> Vec<ContributionDay> {
    let fill = days_to_fill_week(today);
    let needed = GRID_DAYS - fill;

    let days: Vec<(NaiveDate, u32)> = (0..needed)
        .map(|i| {
            let date = today - Duration::days((needed - 1 - i) as i64);
            let val = (i * 3 + i / 7) % 10;
            let count = match val {
                0..=2 => 0,
                3..=6 => 3,
                7..=8 => 8,
                _ => 12,
            };
            (date, count)
        })
        .collect();

    build_grid(&days, today)
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<GraphQlData>,
    #[serde(default)]
    errors: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct GraphQlData {
    user: Option<User>,
}

#[derive(Deserialize)]
struct User {
    #[serde(rename = "contributionsCollection")]
    contributions_collection: ContributionsCollection,
}

#[derive(Deserialize)]
struct ContributionsCollection {
    #[serde(rename = "contributionCalendar")]
    contribution_calendar: ContributionCalendar,
}

#[derive(Deserialize)]
struct ContributionCalendar {
    weeks: Vec<Week>,
}

#[derive(Deserialize)]
struct Week {
    #[serde(rename = "contributionDays")]
    contribution_days: Vec<CalendarDay>,
}

#[derive(Deserialize)]
struct CalendarDay {
    #[serde(rename = "contributionCount")]
    contribution_count: u32,
    date: NaiveDate,
}

async fn fetch_calendar_days(
    client: &reqwest::Client,
    username: &str,
    token: &str,
) -> InkboardResult<Vec<(NaiveDate, u32)>> {
    let body = serde_json::json!({
        "query": CONTRIBUTIONS_QUERY,
        "variables": { "userName": username },
    });

    let response: GraphQlResponse = client
        .post(GRAPHQL_URL)
        .bearer_auth(token)
        .json(&body)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
        .map_err(|e| InkboardError::Parse(e.to_string()))?;

    if let Some(errors) = response.errors {
        return Err(InkboardError::Fetch(format!("GitHub API errors: {errors}")));
    }

    let calendar = response
        .data
        .and_then(|d| d.user)
        .map(|u| u.contributions_collection.contribution_calendar)
        .ok_or_else(|| InkboardError::Fetch("GitHub response had no user".into()))?;

    Ok(calendar
        .weeks
        .into_iter()
        .flat_map(|w| w.contribution_days)
        .map(|d| (d.date, d.contribution_count))
        .collect())
}

/// The grid for `/api/github`: real data when credentials are configured
/// and the API cooperates, synthetic otherwise.
pub async fn contribution_grid(
    client: &reqwest::Client,
    username: Option<&str>,
    token: Option<&str>,
    today: NaiveDate,
) -> Vec<ContributionDay> {
    let (Some(username), Some(token)) = (username, token) else {
        println!("GitHub credentials missing, returning mock contribution data");
        return mock_grid(today);
    };

    match fetch_calendar_days(client, username, token).await {
        Ok(days) => build_grid(&days, today),
        Err(err) => {
            eprintln!("Error fetching GitHub contributions: {err}");
            mock_grid(today)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2026-03-10 is a Tuesday: 4 future slots in the Sun..Sat week.
    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn year_of_days(today: NaiveDate) -> Vec<(NaiveDate, u32)> {
        (0..365)
            .map(|i| (today - Duration::days(364 - i), (i % 13) as u32))
            .collect()
    }

    #[test]
    fn test_grid_is_exactly_49_days() {
        let grid = build_grid(&year_of_days(tuesday()), tuesday());
        assert_eq!(grid.len(), GRID_DAYS);
    }

    #[test]
    fn test_trailing_entries_are_future_level_zero() {
        let grid = build_grid(&year_of_days(tuesday()), tuesday());

        let future: Vec<&ContributionDay> = grid.iter().filter(|d| d.future).collect();
        assert_eq!(future.len(), 4);
        assert!(grid[45..].iter().all(|d| d.future && d.level == 0));
        assert!(grid[..45].iter().all(|d| !d.future));
    }

    #[test]
    fn test_last_real_entry_is_today() {
        let grid = build_grid(&year_of_days(tuesday()), tuesday());
        assert_eq!(grid[44].date, Some(tuesday()));
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(level_for(0), 0);
        assert_eq!(level_for(1), 1);
        assert_eq!(level_for(5), 1);
        assert_eq!(level_for(6), 2);
        assert_eq!(level_for(10), 2);
        assert_eq!(level_for(11), 3);
    }

    #[test]
    fn test_saturday_has_no_future_slots() {
        // 2026-03-14 is a Saturday: the grid is all past days.
        let saturday = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let grid = build_grid(&year_of_days(saturday), saturday);

        assert_eq!(grid.len(), GRID_DAYS);
        assert!(grid.iter().all(|d| !d.future));
    }

    #[test]
    fn test_short_history_is_left_padded_to_49() {
        let days = vec![(tuesday(), 4)];
        let grid = build_grid(&days, tuesday());

        assert_eq!(grid.len(), GRID_DAYS);
        assert_eq!(grid[44].count, 4);
        assert!(grid[..44].iter().all(|d| d.count == 0 && !d.future));
    }

    #[test]
    fn test_mock_grid_is_deterministic_and_complete() {
        let a = mock_grid(tuesday());
        let b = mock_grid(tuesday());

        assert_eq!(a.len(), GRID_DAYS);
        let levels_a: Vec<u8> = a.iter().map(|d| d.level).collect();
        let levels_b: Vec<u8> = b.iter().map(|d| d.level).collect();
        assert_eq!(levels_a, levels_b);
        assert!(a.iter().any(|d| d.level > 0));
    }
}
