//! Authentication service implementation
//!
//! This service handles logging in against the API, the explicit bypass
//! session used for demos, logging out, and resolving who the current user is
//! when only a credential is at hand.

use std::sync::Arc;

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::api::AuthRepository;
use crate::models::user::{Role, UserProfile};
use crate::state::SessionStore;
use crate::utils::errors::{ApiError, Operation, VolunteerHubError, Result};

pub const BYPASS_TOKEN: &str = "mock-jwt-token";
pub const BYPASS_USER_ID: &str = "mock-user-id";

/// Claims read from the bearer credential; signature is not checked
#[derive(Debug, Deserialize)]
struct CredentialClaims {
    #[serde(rename = "userId", default)]
    user_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    sub: Option<String>,
}

/// Authentication service for managing the signed-in session
#[derive(Clone)]
pub struct AuthService {
    auth: AuthRepository,
    session: Arc<SessionStore>,
    allow_bypass: bool,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(auth: AuthRepository, session: Arc<SessionStore>, allow_bypass: bool) -> Self {
        Self {
            auth,
            session,
            allow_bypass,
        }
    }

    /// Log in with email and password and store the resulting session
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile> {
        debug!(email = %email, "Logging in");

        let response = self.auth.login(email, password).await?;
        let profile = response.profile().ok_or_else(|| ApiError::Malformed {
            operation: Operation::Login,
            reason: "response carried no user id".to_string(),
        })?;

        self.session.set_session(&response.token, &profile)?;
        info!(user_id = %profile.id, role = %profile.role, "Logged in");
        Ok(profile)
    }

    /// Install a mock session without contacting the server
    pub fn bypass(&self, role: Role) -> Result<UserProfile> {
        if !self.allow_bypass {
            return Err(VolunteerHubError::PermissionDenied(
                "Login bypass is disabled".to_string(),
            ));
        }

        let (name, email) = match role {
            Role::Admin => ("Admin User", "admin@example.com"),
            _ => ("Volunteer User", "volunteer@example.com"),
        };
        let profile = UserProfile {
            id: BYPASS_USER_ID.to_string(),
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            role,
        };

        self.session.set_session(BYPASS_TOKEN, &profile)?;
        warn!(role = %role, "Bypass session installed");
        Ok(profile)
    }

    pub fn logout(&self) -> Result<()> {
        self.session.clear_session()
    }

    /// Work out the current user's id and cache it in the session.
    ///
    /// Asks `/users/me` first; if that fails the id is read from the
    /// credential's JWT payload. Returns `None` without a credential or when
    /// neither source yields an id.
    pub async fn resolve_current_user(&self) -> Result<Option<UserProfile>> {
        let credential = match self.session.credential() {
            Some(credential) => credential,
            None => {
                debug!("No credential, user not logged in");
                return Ok(None);
            }
        };

        match self.auth.current_user(&credential).await {
            Ok(mut profile) => {
                if let Some(cached) = self.session.current_user() {
                    profile.name = profile.name.or(cached.name);
                    profile.email = profile.email.or(cached.email);
                }
                self.session.set_profile(&profile)?;
                return Ok(Some(profile));
            }
            Err(e) => {
                debug!(error = %e, "Current user lookup failed, falling back to credential payload");
            }
        }

        let Some(user_id) = user_id_from_credential(&credential) else {
            return Ok(None);
        };

        let profile = match self.session.current_user() {
            Some(mut cached) => {
                cached.id = user_id;
                cached
            }
            None => UserProfile::new(user_id, Role::Volunteer),
        };
        self.session.set_profile(&profile)?;
        Ok(Some(profile))
    }
}

/// Read the user id out of a JWT without verifying its signature
pub fn user_id_from_credential(credential: &str) -> Option<String> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    match decode::<CredentialClaims>(credential, &DecodingKey::from_secret(&[]), &validation) {
        Ok(data) => {
            let claims = data.claims;
            claims.user_id.or(claims.id).or(claims.sub)
        }
        Err(e) => {
            debug!(error = %e, "Error decoding credential");
            None
        }
    }
}
