//! User, role and login endpoints

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::PanelClient;
use crate::check::RecordSource;
use crate::error::ApiError;
use crate::forms::{AuthApi, UserStore};
use crate::model::{LoginRequest, LoginResponse, Role, UserDraft, UserRecord};

const USERS: &str = "/api/usuarios";
const ROLES: &str = "/api/roles";

impl PanelClient {
    /// Lists every user.
    pub async fn fetch_users(&self) -> Result<Vec<UserRecord>, ApiError> {
        self.request_json(Method::GET, USERS, None::<&()>).await
    }

    /// Lists every user as raw JSON objects.
    pub async fn fetch_user_records(&self) -> Result<Vec<Value>, ApiError> {
        self.request_json(Method::GET, USERS, None::<&()>).await
    }

    /// Lists the roles offered by the role selector.
    pub async fn fetch_roles(&self) -> Result<Vec<Role>, ApiError> {
        self.request_json(Method::GET, ROLES, None::<&()>).await
    }

    /// Creates a user.
    pub async fn create_user(&self, draft: &UserDraft) -> Result<(), ApiError> {
        self.request(Method::POST, &format!("{USERS}/registro"), Some(draft))
            .await?;
        Ok(())
    }

    /// Replaces the editable fields of user `id`.
    pub async fn update_user(&self, id: i64, draft: &UserDraft) -> Result<(), ApiError> {
        self.request(Method::PUT, &format!("{USERS}/{id}"), Some(draft))
            .await?;
        Ok(())
    }

    /// Exchanges credentials for a token.
    pub async fn login(&self, name: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest { name, password };
        self.request_json(Method::POST, &format!("{USERS}/login"), Some(&body))
            .await
    }
}

#[async_trait]
impl RecordSource for PanelClient {
    async fn fetch_all_records(&self) -> Result<Vec<Value>, ApiError> {
        self.fetch_user_records().await
    }
}

#[async_trait]
impl UserStore for PanelClient {
    async fn submit_create(&self, draft: &UserDraft) -> Result<(), ApiError> {
        self.create_user(draft).await
    }

    async fn submit_update(&self, id: i64, draft: &UserDraft) -> Result<(), ApiError> {
        self.update_user(id, draft).await
    }
}

#[async_trait]
impl AuthApi for PanelClient {
    async fn authenticate(&self, name: &str, password: &str) -> Result<String, ApiError> {
        Ok(self.login(name, password).await?.token)
    }

    async fn fetch_users_with_token(&self, token: &str) -> Result<Vec<UserRecord>, ApiError> {
        self.with_token(token).fetch_users().await
    }
}
