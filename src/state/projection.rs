//! Filter and sort selections and the projection they derive

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::models::event::{Event, EventStatus};
use crate::utils::errors::VolunteerHubError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterOption {
    #[default]
    All,
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

impl FilterOption {
    /// Whether `event` belongs in this bucket at `now`.
    ///
    /// Cancelled events only ever match `All` and `Cancelled`. For the time
    /// buckets the event's window decides; if a date is missing or the window
    /// is inverted (end before start) the stored status is used instead.
    pub fn matches(&self, event: &Event, now: DateTime<Utc>) -> bool {
        let bucket = || {
            if event.status == EventStatus::Cancelled {
                return EventStatus::Cancelled;
            }
            match event.window() {
                Some((start, end)) => EventStatus::infer(start, end, now),
                None => event.status,
            }
        };

        match self {
            FilterOption::All => true,
            FilterOption::Upcoming => bucket() == EventStatus::Upcoming,
            FilterOption::Ongoing => bucket() == EventStatus::Ongoing,
            FilterOption::Completed => bucket() == EventStatus::Completed,
            FilterOption::Cancelled => event.status == EventStatus::Cancelled,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOption::All => "all",
            FilterOption::Upcoming => "upcoming",
            FilterOption::Ongoing => "ongoing",
            FilterOption::Completed => "completed",
            FilterOption::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for FilterOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOption {
    type Err = VolunteerHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FilterOption::All),
            "upcoming" => Ok(FilterOption::Upcoming),
            "ongoing" => Ok(FilterOption::Ongoing),
            "completed" => Ok(FilterOption::Completed),
            "cancelled" | "canceled" => Ok(FilterOption::Cancelled),
            other => Err(VolunteerHubError::InvalidInput(format!("Unknown filter: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    /// Newest start first
    #[default]
    Default,
    DateAsc,
    DateDesc,
    TitleAsc,
    TitleDesc,
    SeatsAsc,
    SeatsDesc,
}

impl SortOption {
    pub fn compare(&self, a: &Event, b: &Event) -> Ordering {
        match self {
            SortOption::Default | SortOption::DateDesc => by_start(a, b, true),
            SortOption::DateAsc => by_start(a, b, false),
            SortOption::TitleAsc => title_key(a).cmp(&title_key(b)),
            SortOption::TitleDesc => title_key(b).cmp(&title_key(a)),
            SortOption::SeatsAsc => a.seats_left().cmp(&b.seats_left()),
            SortOption::SeatsDesc => b.seats_left().cmp(&a.seats_left()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Default => "default",
            SortOption::DateAsc => "date-asc",
            SortOption::DateDesc => "date-desc",
            SortOption::TitleAsc => "title-asc",
            SortOption::TitleDesc => "title-desc",
            SortOption::SeatsAsc => "seats-asc",
            SortOption::SeatsDesc => "seats-desc",
        }
    }
}

/// Undated events go last in either direction
fn by_start(a: &Event, b: &Event, newest_first: bool) -> Ordering {
    match (a.start_time, b.start_time) {
        (Some(a), Some(b)) if newest_first => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn title_key(event: &Event) -> String {
    event.title.to_lowercase()
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = VolunteerHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(SortOption::Default),
            "date-asc" => Ok(SortOption::DateAsc),
            "date-desc" => Ok(SortOption::DateDesc),
            "title-asc" => Ok(SortOption::TitleAsc),
            "title-desc" => Ok(SortOption::TitleDesc),
            "seats-asc" | "volunteer-asc" => Ok(SortOption::SeatsAsc),
            "seats-desc" | "volunteer-desc" => Ok(SortOption::SeatsDesc),
            other => Err(VolunteerHubError::InvalidInput(format!("Unknown sort: {}", other))),
        }
    }
}

/// Filter then stably sort `events` against a single `now`
pub fn derive(events: &[Event], filter: FilterOption, sort: SortOption, now: DateTime<Utc>) -> Vec<Event> {
    let mut projection: Vec<Event> = events
        .iter()
        .filter(|event| filter.matches(event, now))
        .cloned()
        .collect();
    // slice::sort_by is stable: equal keys keep their filtered order
    projection.sort_by(|a, b| sort.compare(a, b));
    projection
}
