//! Event model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::utils::errors::VolunteerHubError;
use crate::utils::helpers::parse_datetime;

/// Lifecycle status of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventStatus {
    #[serde(rename = "upcoming", alias = "UPCOMING")]
    Upcoming,
    #[serde(
        rename = "ongoing",
        alias = "ONGOING",
        alias = "IN_PROGRESS",
        alias = "in_progress"
    )]
    Ongoing,
    #[serde(rename = "completed", alias = "COMPLETED")]
    Completed,
    #[serde(rename = "cancelled", alias = "CANCELLED")]
    Cancelled,
}

impl EventStatus {
    /// Status implied by an event's time window at `now`
    pub fn infer(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if start <= now && end >= now {
            EventStatus::Ongoing
        } else if end < now {
            EventStatus::Completed
        } else {
            EventStatus::Upcoming
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Ongoing => "ongoing",
            EventStatus::Completed => "completed",
            EventStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = VolunteerHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Ok(EventStatus::Upcoming),
            "ongoing" | "in_progress" | "in-progress" => Ok(EventStatus::Ongoing),
            "completed" => Ok(EventStatus::Completed),
            "cancelled" | "canceled" => Ok(EventStatus::Cancelled),
            other => Err(VolunteerHubError::InvalidInput(format!("Unknown event status: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(
        rename = "startDate",
        default,
        deserialize_with = "lenient_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(
        rename = "endDate",
        default,
        deserialize_with = "lenient_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(rename = "maxVolunteers", default, deserialize_with = "lenient_capacity")]
    pub capacity: u32,
    pub status: EventStatus,
    #[serde(rename = "registeredVolunteers", default)]
    pub registered_user_ids: Vec<String>,
    #[serde(rename = "skills", default)]
    pub required_skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Null, missing or unparseable dates read as `None` so one bad record
/// does not fail the whole list
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(raw)) => parse_datetime(&raw),
        _ => None,
    })
}

/// Numbers or numeric strings; anything else reads as zero seats
fn lenient_capacity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let capacity = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(raw)) => raw.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(capacity.map_or(0, |n| u32::try_from(n).unwrap_or(u32::MAX)))
}

impl Event {
    /// Start and end when both are known and in order
    pub fn window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) if start <= end => Some((start, end)),
            _ => None,
        }
    }

    /// Seats still open; negative when the server let the event overfill
    pub fn seats_left(&self) -> i64 {
        i64::from(self.capacity) - self.registered_user_ids.len() as i64
    }

    pub fn is_full(&self) -> bool {
        self.seats_left() <= 0
    }

    pub fn is_registered(&self, user_id: &str) -> bool {
        self.registered_user_ids.iter().any(|id| id == user_id)
    }

    /// Add a registration; returns false when the user was already present
    pub fn add_registration(&mut self, user_id: &str) -> bool {
        if self.is_registered(user_id) {
            return false;
        }
        self.registered_user_ids.push(user_id.to_string());
        true
    }

    pub fn remove_registration(&mut self, user_id: &str) {
        self.registered_user_ids.retain(|id| id != user_id);
    }
}

/// The create/edit form for an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(rename = "startDate")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "endDate")]
    pub end_time: DateTime<Utc>,
    #[serde(rename = "maxVolunteers")]
    pub capacity: u32,
    #[serde(rename = "skills")]
    pub required_skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
}

impl EventDraft {
    /// Blank create form: starts now, lasts an hour, ten volunteers
    pub fn blank(now: DateTime<Utc>) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            location: String::new(),
            start_time: now,
            end_time: now + Duration::hours(1),
            capacity: 10,
            required_skills: Vec::new(),
            image_url: None,
            status: None,
        }
    }

    /// Edit form prefilled from an existing event, including its status.
    /// Missing dates are filled the way a blank form would be.
    pub fn from_event(event: &Event, now: DateTime<Utc>) -> Self {
        let start_time = event.start_time.unwrap_or(now);
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            start_time,
            end_time: event.end_time.unwrap_or(start_time + Duration::hours(1)),
            capacity: event.capacity,
            required_skills: event.required_skills.clone(),
            image_url: event.image_url.clone(),
            status: Some(event.status),
        }
    }

    pub fn validate(&self) -> Result<(), VolunteerHubError> {
        if self.title.trim().is_empty() {
            return Err(VolunteerHubError::InvalidInput("Event title is required".to_string()));
        }
        if self.capacity == 0 {
            return Err(VolunteerHubError::InvalidInput(
                "Event capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Copy of the draft whose status is filled from its time window when absent
    pub fn with_inferred_status(&self, now: DateTime<Utc>) -> Self {
        let mut draft = self.clone();
        if draft.status.is_none() {
            draft.status = Some(EventStatus::infer(draft.start_time, draft.end_time, now));
        }
        draft
    }
}

/// Body of `PATCH /events/{id}/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: EventStatus,
}
