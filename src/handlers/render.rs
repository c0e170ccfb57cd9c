//! Text rendering for event cards and lists

use std::fmt::Write;

use crate::models::event::{Event, EventStatus};
use crate::models::user::UserProfile;
use crate::state::EventListViewModel;
use crate::utils::helpers::{format_date, format_time, truncate_text};

const DESCRIPTION_PREVIEW: usize = 160;

fn status_badge(status: EventStatus) -> &'static str {
    match status {
        EventStatus::Upcoming => "[UPCOMING]",
        EventStatus::Ongoing => "[ONGOING]",
        EventStatus::Completed => "[COMPLETED]",
        EventStatus::Cancelled => "[CANCELLED]",
    }
}

/// Render one event as a multi-line card
pub fn render_event_card(event: &Event, registered: bool) -> String {
    let mut card = String::new();
    let _ = writeln!(card, "{} {}  (id: {})", status_badge(event.status), event.title, event.id);
    match (event.start_time, event.end_time) {
        (Some(start), Some(end)) => {
            let _ = writeln!(card, "  {}, {} - {}", format_date(start), format_time(start), format_time(end));
        }
        (Some(start), None) => {
            let _ = writeln!(card, "  {}, {}", format_date(start), format_time(start));
        }
        (None, _) => {
            let _ = writeln!(card, "  Date to be announced");
        }
    }
    if !event.location.is_empty() {
        let _ = writeln!(card, "  Location: {}", event.location);
    }
    if !event.description.is_empty() {
        let _ = writeln!(card, "  {}", truncate_text(&event.description, DESCRIPTION_PREVIEW));
    }

    let seats = if event.is_full() {
        "Full".to_string()
    } else {
        format!("{} seats left", event.seats_left())
    };
    let _ = writeln!(
        card,
        "  Volunteers: {}/{} ({})",
        event.registered_user_ids.len(),
        event.capacity,
        seats
    );

    if !event.required_skills.is_empty() {
        let _ = writeln!(card, "  Skills: {}", event.required_skills.join(", "));
    }
    if registered {
        let _ = writeln!(card, "  Registered");
    }
    card
}

/// Render the current projection with its selections and any message
pub fn render_event_list(view: &EventListViewModel) -> String {
    let projection = view.projection();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Events ({} shown, filter: {}, sort: {})",
        projection.len(),
        view.filter(),
        view.sort()
    );

    if let Some(error) = view.error() {
        let _ = writeln!(out, "! {}", error);
    }
    if let Some(notice) = view.notice() {
        let _ = writeln!(out, "{}", notice);
    }

    if projection.is_empty() {
        let _ = writeln!(out, "No events found.");
        return out;
    }

    for event in &projection {
        let _ = writeln!(out);
        out.push_str(&render_event_card(event, view.is_registered(event)));
    }
    out
}

pub fn render_profile(profile: Option<&UserProfile>, authenticated: bool) -> String {
    match (profile, authenticated) {
        (Some(profile), _) => {
            let name = profile.name.as_deref().unwrap_or("(unnamed)");
            match &profile.email {
                Some(email) => format!("{} <{}> [{}] id: {}", name, email, profile.role, profile.id),
                None => format!("{} [{}] id: {}", name, profile.role, profile.id),
            }
        }
        (None, true) => "Signed in, profile unknown".to_string(),
        (None, false) => "Not signed in".to_string(),
    }
}
