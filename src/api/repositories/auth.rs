//! Authentication endpoints

use reqwest::Method;

use crate::api::connection::{read_json, send, ApiConnection};
use crate::models::user::{LoginRequest, LoginResponse, UserProfile};
use crate::utils::errors::{ApiResult, Operation};

#[derive(Debug, Clone)]
pub struct AuthRepository {
    connection: ApiConnection,
}

impl AuthRepository {
    pub fn new(connection: ApiConnection) -> Self {
        Self { connection }
    }

    /// `POST /auth/login`
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let request = self
            .connection
            .request(Method::POST, "/auth/login")
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            });
        let response = send(request, Operation::Login).await?;
        read_json(response, Operation::Login).await
    }

    /// `GET /users/me` with the given credential
    pub async fn current_user(&self, credential: &str) -> ApiResult<UserProfile> {
        let request = self
            .connection
            .authorized(Method::GET, "/users/me", credential);
        let response = send(request, Operation::CurrentUser).await?;
        read_json(response, Operation::CurrentUser).await
    }
}
