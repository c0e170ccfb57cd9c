//! Command handlers
//!
//! Each subcommand is one user gesture routed into the session, the auth
//! service or the event list view-model. Handlers return the text to print.

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use tracing::debug;

use crate::handlers::render::{render_event_card, render_event_list, render_profile};
use crate::models::event::{EventDraft, EventStatus};
use crate::models::user::Role;
use crate::services::ServiceFactory;
use crate::state::{EventListViewModel, FilterOption, SortOption};
use crate::utils::errors::{VolunteerHubError, Result};
use crate::utils::helpers::{parse_datetime, parse_skills};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Start a local mock session without the server
    Bypass {
        #[arg(long, default_value = "admin")]
        role: Role,
    },
    /// Clear the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List events
    List {
        #[arg(long, default_value = "all")]
        filter: FilterOption,
        #[arg(long, default_value = "default")]
        sort: SortOption,
    },
    /// Create an event (admin only)
    Create(CreateArgs),
    /// Edit an event (admin only)
    Edit(EditArgs),
    /// Delete an event (admin only)
    Delete { id: String },
    /// Change an event's status (admin only)
    Status { id: String, status: EventStatus },
    /// Register for an event
    Register { id: String },
    /// Print the effective configuration
    Config,
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "")]
    pub location: String,
    /// Start time, RFC 3339 or YYYY-MM-DDTHH:MM local; defaults to now
    #[arg(long, value_parser = parse_timestamp)]
    pub start: Option<DateTime<Utc>>,
    /// End time; defaults to one hour after start
    #[arg(long, value_parser = parse_timestamp)]
    pub end: Option<DateTime<Utc>>,
    #[arg(long, default_value_t = 10)]
    pub capacity: u32,
    /// Comma separated skills
    #[arg(long, default_value = "")]
    pub skills: String,
    #[arg(long)]
    pub image_url: Option<String>,
    /// Explicit status; inferred from the dates when omitted
    #[arg(long)]
    pub status: Option<EventStatus>,
}

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long, value_parser = parse_timestamp)]
    pub start: Option<DateTime<Utc>>,
    #[arg(long, value_parser = parse_timestamp)]
    pub end: Option<DateTime<Utc>>,
    #[arg(long)]
    pub capacity: Option<u32>,
    #[arg(long)]
    pub skills: Option<String>,
    #[arg(long)]
    pub image_url: Option<String>,
    #[arg(long, conflicts_with = "infer_status")]
    pub status: Option<EventStatus>,
    /// Drop the current status and infer it from the dates
    #[arg(long)]
    pub infer_status: bool,
}

fn parse_timestamp(input: &str) -> std::result::Result<DateTime<Utc>, String> {
    parse_datetime(input).ok_or_else(|| format!("invalid date/time: {}", input))
}

fn require_admin(services: &ServiceFactory) -> Result<()> {
    if services.session.is_admin() {
        Ok(())
    } else {
        Err(VolunteerHubError::PermissionDenied(
            "Only administrators can manage events".to_string(),
        ))
    }
}

/// Execute one command and return what should be printed
pub async fn run(command: Command, services: &ServiceFactory) -> Result<String> {
    debug!(command = ?command_name(&command), "Running command");

    match command {
        Command::Login { email, password } => {
            let profile = services.auth_service.login(&email, &password).await?;
            Ok(format!("Logged in as {}", render_profile(Some(&profile), true)))
        }
        Command::Bypass { role } => {
            let profile = services.auth_service.bypass(role)?;
            Ok(format!("Bypass session: {}", render_profile(Some(&profile), true)))
        }
        Command::Logout => {
            services.auth_service.logout()?;
            Ok("Logged out".to_string())
        }
        Command::Whoami => {
            let profile = services
                .auth_service
                .resolve_current_user()
                .await?
                .or_else(|| services.session.current_user());
            Ok(render_profile(profile.as_ref(), services.session.is_authenticated()))
        }
        Command::List { filter, sort } => {
            let view = services.event_list();
            view.set_filter(filter);
            view.set_sort(sort);
            view.refresh().await?;
            Ok(render_event_list(&view))
        }
        Command::Create(args) => {
            require_admin(services)?;
            let view = services.event_list();
            view.create(create_draft(args)).await?;
            Ok(render_event_list(&view))
        }
        Command::Edit(args) => {
            require_admin(services)?;
            let view = services.event_list();
            view.refresh().await?;
            view.open_edit_form(&args.id)?;
            view.update_draft(|form| apply_edits(form, &args));
            view.submit_draft().await?;
            Ok(render_event_list(&view))
        }
        Command::Delete { id } => {
            require_admin(services)?;
            let view = services.event_list();
            view.refresh().await?;
            view.delete(&id).await?;
            Ok(render_event_list(&view))
        }
        Command::Status { id, status } => {
            require_admin(services)?;
            let view = services.event_list();
            view.set_status(&id, status).await?;
            Ok(render_event_list(&view))
        }
        Command::Register { id } => {
            let view = services.event_list();
            view.refresh().await?;
            view.register(&id).await?;
            render_single(&view, &id)
        }
        Command::Config => toml::to_string_pretty(services.settings())
            .map_err(|e| VolunteerHubError::Config(e.to_string())),
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Login { .. } => "login",
        Command::Bypass { .. } => "bypass",
        Command::Logout => "logout",
        Command::Whoami => "whoami",
        Command::List { .. } => "list",
        Command::Create(_) => "create",
        Command::Edit(_) => "edit",
        Command::Delete { .. } => "delete",
        Command::Status { .. } => "status",
        Command::Register { .. } => "register",
        Command::Config => "config",
    }
}

fn render_single(view: &EventListViewModel, event_id: &str) -> Result<String> {
    let event = view
        .events()
        .into_iter()
        .find(|event| event.id == event_id)
        .ok_or_else(|| VolunteerHubError::EventNotFound {
            event_id: event_id.to_string(),
        })?;

    let mut out = view.notice().map(|n| format!("{}\n", n)).unwrap_or_default();
    out.push_str(&render_event_card(&event, view.is_registered(&event)));
    Ok(out)
}

fn create_draft(args: CreateArgs) -> EventDraft {
    let mut draft = EventDraft::blank(args.start.unwrap_or_else(Utc::now));
    if let Some(end) = args.end {
        draft.end_time = end;
    }
    draft.title = args.title;
    draft.description = args.description;
    draft.location = args.location;
    draft.capacity = args.capacity;
    draft.required_skills = parse_skills(&args.skills);
    draft.image_url = args.image_url.filter(|url| !url.is_empty());
    draft.status = args.status;
    draft
}

fn apply_edits(form: &mut EventDraft, args: &EditArgs) {
    if let Some(title) = &args.title {
        form.title = title.clone();
    }
    if let Some(description) = &args.description {
        form.description = description.clone();
    }
    if let Some(location) = &args.location {
        form.location = location.clone();
    }
    if let Some(start) = args.start {
        form.start_time = start;
    }
    if let Some(end) = args.end {
        form.end_time = end;
    }
    if let Some(capacity) = args.capacity {
        form.capacity = capacity;
    }
    if let Some(skills) = &args.skills {
        form.required_skills = parse_skills(skills);
    }
    if let Some(image_url) = &args.image_url {
        form.image_url = Some(image_url.clone()).filter(|url| !url.is_empty());
    }
    if args.infer_status {
        form.status = None;
    } else if let Some(status) = args.status {
        form.status = Some(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn create_args() -> CreateArgs {
        CreateArgs {
            title: "Beach Cleanup".to_string(),
            description: String::new(),
            location: "North Beach".to_string(),
            start: Some(Utc.with_ymd_and_hms(2030, 5, 1, 8, 0, 0).unwrap()),
            end: None,
            capacity: 25,
            skills: "Outdoors, Lifting".to_string(),
            image_url: Some(String::new()),
            status: None,
        }
    }

    #[test]
    fn test_create_draft_defaults_end_to_one_hour() {
        let draft = create_draft(create_args());
        assert_eq!(draft.end_time - draft.start_time, Duration::hours(1));
        assert_eq!(draft.required_skills, vec!["Outdoors".to_string(), "Lifting".to_string()]);
        assert_eq!(draft.image_url, None);
        assert_eq!(draft.status, None);
    }

    #[test]
    fn test_apply_edits_can_clear_status() {
        let mut form = create_draft(create_args());
        form.status = Some(EventStatus::Upcoming);
        let args = EditArgs {
            id: "1".to_string(),
            title: Some("Beach Cleanup II".to_string()),
            description: None,
            location: None,
            start: None,
            end: None,
            capacity: Some(30),
            skills: None,
            image_url: None,
            status: None,
            infer_status: true,
        };
        apply_edits(&mut form, &args);
        assert_eq!(form.title, "Beach Cleanup II");
        assert_eq!(form.capacity, 30);
        assert_eq!(form.status, None);
        assert_eq!(form.location, "North Beach");
    }

    #[test]
    fn test_parse_timestamp_error() {
        assert!(parse_timestamp("yesterday-ish").is_err());
    }
}
