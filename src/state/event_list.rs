//! Event list view-model
//!
//! Owns the authoritative event collection as last observed from the server,
//! the filtered and sorted projection derived from it, and the open
//! create/edit form. Every operation takes `&self` so calls may overlap; each
//! result is applied under the state lock when its network call completes, so
//! the last completed mutation wins. The lock is never held across an await.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::api::EventRepository;
use crate::models::event::{Event, EventDraft, EventStatus};
use crate::utils::errors::{VolunteerHubError, Result};
use crate::utils::logging::log_event_action;
use super::projection::{self, FilterOption, SortOption};
use super::session::SessionStore;

/// What submitting the open form will do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftMode {
    Create,
    Edit { event_id: String },
}

/// The create/edit form currently open
#[derive(Debug, Clone, PartialEq)]
pub struct DraftState {
    pub mode: DraftMode,
    pub form: EventDraft,
}

#[derive(Debug, Default)]
struct ListState {
    authoritative: Vec<Event>,
    projection: Vec<Event>,
    filter: FilterOption,
    sort: SortOption,
    draft: Option<DraftState>,
    error: Option<String>,
    notice: Option<String>,
    in_flight: usize,
    unmounted: bool,
}

impl ListState {
    fn rederive(&mut self) {
        self.projection = projection::derive(&self.authoritative, self.filter, self.sort, Utc::now());
    }

    fn find_mut(&mut self, event_id: &str) -> Option<&mut Event> {
        self.authoritative.iter_mut().find(|event| event.id == event_id)
    }
}

pub struct EventListViewModel {
    events: EventRepository,
    session: Arc<SessionStore>,
    capacity_check: bool,
    state: Mutex<ListState>,
}

impl EventListViewModel {
    pub fn new(events: EventRepository, session: Arc<SessionStore>) -> Self {
        Self {
            events,
            session,
            capacity_check: false,
            state: Mutex::new(ListState::default()),
        }
    }

    /// Refuse registrations locally when an event shows no seats left
    pub fn with_capacity_check(mut self, enabled: bool) -> Self {
        self.capacity_check = enabled;
        self
    }

    fn lock(&self) -> MutexGuard<'_, ListState> {
        // state is rederived after every mutation, so a poisoned guard is still coherent
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` against live state and rederive the projection.
    /// Returns `None` once the view-model has been unmounted.
    fn apply<R>(&self, f: impl FnOnce(&mut ListState) -> R) -> Option<R> {
        let mut state = self.lock();
        if state.unmounted {
            debug!("Discarding result for unmounted event list");
            return None;
        }
        let result = f(&mut state);
        state.rederive();
        Some(result)
    }

    /// Record `error` as the message shown to the user and hand it back
    fn surface(&self, error: VolunteerHubError) -> VolunteerHubError {
        let message = error.user_message();
        warn!(error = %error, "Event list operation failed");
        self.apply(|state| {
            state.notice = None;
            state.error = Some(message);
        });
        error
    }

    fn begin(&self) {
        self.lock().in_flight += 1;
    }

    fn finish(&self) {
        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
    }

    // -- read side --

    /// Authoritative collection as last observed
    pub fn events(&self) -> Vec<Event> {
        self.lock().authoritative.clone()
    }

    /// Filtered and sorted view for rendering
    pub fn projection(&self) -> Vec<Event> {
        self.lock().projection.clone()
    }

    pub fn filter(&self) -> FilterOption {
        self.lock().filter
    }

    pub fn sort(&self) -> SortOption {
        self.lock().sort
    }

    pub fn draft(&self) -> Option<DraftState> {
        self.lock().draft.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn notice(&self) -> Option<String> {
        self.lock().notice.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().in_flight > 0
    }

    pub fn is_admin(&self) -> bool {
        self.session.is_admin()
    }

    /// Whether the signed-in user is registered for `event`
    pub fn is_registered(&self, event: &Event) -> bool {
        self.session
            .current_user_id()
            .map(|user_id| event.is_registered(&user_id))
            .unwrap_or(false)
    }

    pub fn dismiss_messages(&self) {
        self.apply(|state| {
            state.error = None;
            state.notice = None;
        });
    }

    /// Stop applying results; calls still in flight complete into nothing
    pub fn unmount(&self) {
        self.lock().unmounted = true;
    }

    // -- local selections --

    pub fn set_filter(&self, filter: FilterOption) {
        self.apply(|state| state.filter = filter);
    }

    pub fn set_sort(&self, sort: SortOption) {
        self.apply(|state| state.sort = sort);
    }

    // -- form --

    /// Open a blank create form
    pub fn open_create_form(&self) {
        let form = EventDraft::blank(Utc::now());
        self.apply(|state| {
            state.draft = Some(DraftState {
                mode: DraftMode::Create,
                form,
            })
        });
    }

    /// Open the edit form prefilled from the event
    pub fn open_edit_form(&self, event_id: &str) -> Result<()> {
        let opened = self.apply(|state| {
            let form = state.find_mut(event_id).map(|event| EventDraft::from_event(event, Utc::now()))?;
            state.draft = Some(DraftState {
                mode: DraftMode::Edit {
                    event_id: event_id.to_string(),
                },
                form,
            });
            Some(())
        });

        match opened {
            Some(Some(())) => Ok(()),
            _ => Err(VolunteerHubError::EventNotFound {
                event_id: event_id.to_string(),
            }),
        }
    }

    /// Edit the open form in place; no-op when no form is open
    pub fn update_draft(&self, edit: impl FnOnce(&mut EventDraft)) {
        self.apply(|state| {
            if let Some(draft) = state.draft.as_mut() {
                edit(&mut draft.form);
            }
        });
    }

    pub fn cancel_draft(&self) {
        self.apply(|state| state.draft = None);
    }

    /// Submit the open form as a create or an edit
    pub async fn submit_draft(&self) -> Result<()> {
        let draft = self
            .draft()
            .ok_or_else(|| VolunteerHubError::InvalidInput("No event form is open".to_string()))?;

        match draft.mode {
            DraftMode::Create => self.create(draft.form).await,
            DraftMode::Edit { event_id } => self.edit(&event_id, draft.form).await,
        }
    }

    // -- server round-trips --

    /// Replace the collection with the server's list. On failure the
    /// last-known-good collection is kept.
    pub async fn refresh(&self) -> Result<()> {
        self.begin();
        let result = self.events.list().await;
        self.finish();

        match result {
            Ok(events) => {
                debug!(count = events.len(), "Event list refreshed");
                self.apply(|state| {
                    state.authoritative = events;
                    state.error = None;
                });
                Ok(())
            }
            Err(e) => Err(self.surface(e.into())),
        }
    }

    /// Create an event from `draft`, inferring its status from the time
    /// window when none was chosen. On failure the draft stays open. Once the
    /// server accepts the event this returns `Ok`, even if the reload fails.
    pub async fn create(&self, draft: EventDraft) -> Result<()> {
        let mode = DraftMode::Create;
        if let Err(e) = draft.validate() {
            self.keep_draft(mode, draft);
            return Err(self.surface(e));
        }

        let submitted = draft.with_inferred_status(Utc::now());
        self.begin();
        let result = self.events.create(&submitted).await;
        self.finish();

        match result {
            Ok(created) => {
                log_event_action(&created.id, "create", self.session.current_user_id().as_deref(), None);
                self.apply(|state| {
                    state.draft = None;
                    state.notice = Some("Event created".to_string());
                });
                self.refresh_after_write().await;
                Ok(())
            }
            Err(e) => {
                self.keep_draft(mode, draft);
                Err(self.surface(e.into()))
            }
        }
    }

    /// Replace event `event_id` with `draft`. The status is inferred only when
    /// the draft leaves it unset. On failure the draft stays open. Once the
    /// server accepts the edit this returns `Ok`, even if the reload fails.
    pub async fn edit(&self, event_id: &str, draft: EventDraft) -> Result<()> {
        let mode = DraftMode::Edit {
            event_id: event_id.to_string(),
        };
        if let Err(e) = draft.validate() {
            self.keep_draft(mode, draft);
            return Err(self.surface(e));
        }

        let submitted = draft.with_inferred_status(Utc::now());
        self.begin();
        let result = self.events.update(event_id, &submitted).await;
        self.finish();

        match result {
            Ok(_) => {
                log_event_action(event_id, "edit", self.session.current_user_id().as_deref(), None);
                self.apply(|state| {
                    state.draft = None;
                    state.notice = Some("Event updated".to_string());
                });
                self.refresh_after_write().await;
                Ok(())
            }
            Err(e) => {
                self.keep_draft(mode, draft);
                Err(self.surface(e.into()))
            }
        }
    }

    /// Reload after a write the server already accepted. A failed reload is
    /// left in `error()` and the last-known-good list; the write still succeeded.
    async fn refresh_after_write(&self) {
        if let Err(e) = self.refresh().await {
            debug!(error = %e, "Reload after accepted write failed");
        }
    }

    fn keep_draft(&self, mode: DraftMode, form: EventDraft) {
        self.apply(|state| state.draft = Some(DraftState { mode, form }));
    }

    /// Delete an event and drop it locally; no refresh is needed
    pub async fn delete(&self, event_id: &str) -> Result<()> {
        self.begin();
        let result = self.events.remove(event_id).await;
        self.finish();

        match result {
            Ok(()) => {
                log_event_action(event_id, "delete", self.session.current_user_id().as_deref(), None);
                self.apply(|state| {
                    state.authoritative.retain(|event| event.id != event_id);
                    state.notice = Some("Event deleted".to_string());
                });
                Ok(())
            }
            Err(e) => Err(self.surface(e.into())),
        }
    }

    /// Change an event's status, then refresh
    pub async fn set_status(&self, event_id: &str, status: EventStatus) -> Result<()> {
        self.begin();
        let result = self.events.set_status(event_id, status).await;
        self.finish();

        match result {
            Ok(_) => {
                let details = format!("status={}", status);
                log_event_action(event_id, "set_status", self.session.current_user_id().as_deref(), Some(&details));
                self.refresh().await
            }
            Err(e) => Err(self.surface(e.into())),
        }
    }

    /// Register the signed-in user for an event.
    ///
    /// The user id is appended to the local copy before the request is sent
    /// and removed again if the server rejects the registration. An id that
    /// was already present is never appended twice, nor removed on rollback.
    pub async fn register(&self, event_id: &str) -> Result<()> {
        let user_id = self.session.current_user_id();

        let prepared = self.apply(|state| {
            let event = state.find_mut(event_id)?;
            if self.capacity_check && event.is_full() {
                return Some(Err(VolunteerHubError::InvalidInput("Event is full".to_string())));
            }
            let appended = match &user_id {
                Some(user_id) => event.add_registration(user_id),
                None => false,
            };
            Some(Ok(appended))
        });

        let appended = match prepared {
            None => {
                return Err(VolunteerHubError::InvalidInput("Event list is no longer active".to_string()))
            }
            Some(None) => {
                return Err(self.surface(VolunteerHubError::EventNotFound {
                    event_id: event_id.to_string(),
                }))
            }
            Some(Some(Err(e))) => return Err(self.surface(e)),
            Some(Some(Ok(appended))) => appended,
        };

        self.begin();
        let result = self.events.register(event_id).await;
        self.finish();

        match result {
            Ok(confirmed) => {
                info!(event_id = event_id, user_id = ?user_id, "Registered for event");
                log_event_action(event_id, "register", user_id.as_deref(), None);
                self.apply(|state| {
                    if let Some(event) = state.find_mut(event_id) {
                        match confirmed {
                            Some(server_copy) => *event = server_copy,
                            // a refresh may have landed meanwhile and dropped the optimistic id
                            None => {
                                if let Some(user_id) = &user_id {
                                    event.add_registration(user_id);
                                }
                            }
                        }
                    }
                    state.error = None;
                    state.notice = Some("Successfully registered for the event!".to_string());
                });
                Ok(())
            }
            Err(e) => {
                if appended {
                    if let Some(user_id) = &user_id {
                        self.apply(|state| {
                            if let Some(event) = state.find_mut(event_id) {
                                event.remove_registration(user_id);
                            }
                        });
                    }
                }
                Err(self.surface(e.into()))
            }
        }
    }
}
