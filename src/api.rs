//! Entry point to the Engine Yard Cloud API.
//!
//! An `ApiClient` owns a `Session`: the endpoint, the HTTP transport, the
//! token store and the token in use. Records built from API responses hold
//! a clone of the same session so they can fetch related records later.
//! Sessions are reference counted and not thread safe; a client and every
//! record it produced belong to one call chain.

use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use std::{cell::RefCell, fmt, rc::Rc};
use tracing::{debug, info, trace, warn};
use url::Url;

use crate::{
    collection::{Match, SmartCollection},
    error::ApiError,
    memo::Memo,
    model::{decode_list, decode_one, App, Environment, Key, NewKey},
    token_store::TokenStore,
    transport::{HttpClient, HttpRequestConfig},
};

/// An email and password pair typed in by the user
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"********")
            .finish()
    }
}

/// Asks the user for credentials when no token is available
pub trait CredentialPrompt {
    fn credentials(&self, endpoint: &Url) -> Result<Credentials, ApiError>;
}

struct SessionInner {
    endpoint: Url,
    http: HttpClient,
    token_store: TokenStore,
    token: RefCell<Option<String>>,
    prompt: Option<Box<dyn CredentialPrompt>>,
}

/// Shared handle to an authenticated connection
#[derive(Clone)]
pub struct Session {
    inner: Rc<SessionInner>,
}

impl Session {
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    pub fn http(&self) -> &HttpClient {
        &self.inner.http
    }

    pub fn token_store(&self) -> &TokenStore {
        &self.inner.token_store
    }

    /// The token held in memory, without consulting the token store
    pub fn current_token(&self) -> Option<String> {
        self.inner.token.borrow().clone()
    }

    /// The token in memory, or else the one in the token store.
    ///
    /// Never prompts and never touches the network.
    pub fn resolved_token(&self) -> Option<String> {
        self.current_token().or_else(|| {
            self.inner
                .token_store
                .read(&self.inner.endpoint)
                .ok()
        })
    }

    /// Resolve the token to authenticate with.
    ///
    /// Tried in order: the token in memory, the token store, then the
    /// credential prompt followed by a token fetch. The result is kept in
    /// memory for the rest of the session.
    pub async fn token(&self) -> Result<String, ApiError> {
        if let Some(token) = self.current_token() {
            return Ok(token);
        }

        let token = match self.inner.token_store.read(&self.inner.endpoint) {
            Ok(token) => token,
            Err(not_found) => {
                let Some(prompt) = self.inner.prompt.as_ref() else {
                    return Err(not_found.into());
                };
                debug!("No stored token for {}, asking for credentials", self.endpoint());
                let credentials = prompt.credentials(&self.inner.endpoint)?;
                self.inner
                    .token_store
                    .fetch(
                        &self.inner.http,
                        &self.inner.endpoint,
                        &credentials.email,
                        &credentials.password,
                    )
                    .await?
            }
        };

        self.set_token(Some(token.clone()));
        Ok(token)
    }

    fn set_token(&self, token: Option<String>) {
        *self.inner.token.borrow_mut() = token;
    }

    /// Exchange credentials for a token, persist it and use it from now on
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let token = self
            .inner
            .token_store
            .fetch(&self.inner.http, &self.inner.endpoint, email, password)
            .await?;
        self.set_token(Some(token.clone()));
        info!("Authenticated with {}", self.endpoint());
        Ok(token)
    }

    /// Forget the token in memory and in the token store.
    /// Returns whether a stored token was removed.
    pub fn logout(&self) -> Result<bool, ApiError> {
        self.set_token(None);
        Ok(self.inner.token_store.delete(&self.inner.endpoint)?)
    }

    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        self.request(Method::PUT, path, body).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::DELETE, path, None).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let token = self.token().await?;
        match self.inner.http.request(method, path, body, Some(&token)).await {
            Err(ApiError::ClientError { status, .. }) if status == StatusCode::UNAUTHORIZED => {
                warn!("Token rejected by {}", self.endpoint());
                Err(ApiError::InvalidCredentials)
            }
            other => other,
        }
    }
}

/// Sessions are equal when they would authenticate with the same token
impl PartialEq for Session {
    fn eq(&self, other: &Self) -> bool {
        self.resolved_token() == other.resolved_token()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("token_store", &self.inner.token_store.path())
            .field("has_token", &self.inner.token.borrow().is_some())
            .field("has_prompt", &self.inner.prompt.is_some())
            .finish()
    }
}

pub struct ApiClientBuilder {
    endpoint: Url,
    token: Option<String>,
    token_store: Option<TokenStore>,
    prompt: Option<Box<dyn CredentialPrompt>>,
    http_config: Option<HttpRequestConfig>,
}

impl ApiClientBuilder {
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token_store(mut self, token_store: TokenStore) -> Self {
        self.token_store = Some(token_store);
        self
    }

    pub fn prompt(mut self, prompt: Box<dyn CredentialPrompt>) -> Self {
        self.prompt = Some(prompt);
        self
    }

    pub fn http_config(mut self, http_config: HttpRequestConfig) -> Self {
        self.http_config = Some(http_config);
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let http_config = self
            .http_config
            .unwrap_or_else(|| HttpRequestConfig::for_endpoint(&self.endpoint));
        let http = HttpClient::new(http_config)?;

        let token_store = match self.token_store {
            Some(token_store) => token_store,
            None => TokenStore::load_default()?,
        };
        trace!("Using token file {}", token_store.path().display());

        let session = Session {
            inner: Rc::new(SessionInner {
                endpoint: self.endpoint,
                http,
                token_store,
                token: RefCell::new(self.token),
                prompt: self.prompt,
            }),
        };

        Ok(ApiClient {
            session,
            keys: Memo::new(),
            apps: Memo::new(),
        })
    }
}

/// Client for one endpoint, memoizing the account-wide collections
#[derive(Debug)]
pub struct ApiClient {
    session: Session,
    keys: Memo<SmartCollection<Key>>,
    apps: Memo<SmartCollection<App>>,
}

impl ApiClient {
    pub fn builder(endpoint: Url) -> ApiClientBuilder {
        ApiClientBuilder {
            endpoint,
            token: None,
            token_store: None,
            prompt: None,
            http_config: None,
        }
    }

    /// Client using the default token store, with an optional token
    pub fn new(endpoint: Url, token: Option<String>) -> Result<ApiClient, ApiError> {
        let builder = ApiClient::builder(endpoint);
        match token {
            Some(token) => builder.token(token).build(),
            None => builder.build(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn endpoint(&self) -> &Url {
        self.session.endpoint()
    }

    pub async fn token(&self) -> Result<String, ApiError> {
        self.session.token().await
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<String, ApiError> {
        self.session.authenticate(email, password).await
    }

    pub fn logout(&self) -> Result<bool, ApiError> {
        self.invalidate_keys();
        self.invalidate_apps();
        self.session.logout()
    }

    /// Every keypair on the account, fetched once per client
    pub async fn keys(&self) -> Result<Rc<SmartCollection<Key>>, ApiError> {
        self.keys
            .get_or_fetch(|| async {
                let payload = self.session.get("/keypairs").await?;
                decode_list(&self.session, payload, "keypairs")
            })
            .await
    }

    /// Upload a public key. Clears the memoized `keys()`.
    pub async fn create_key(&self, new_key: &NewKey) -> Result<Key, ApiError> {
        debug!("Creating key {}", new_key.name);
        let payload = self
            .session
            .post("/keypairs", &json!({ "keypair": new_key }))
            .await?;
        self.invalidate_keys();
        decode_one(&self.session, payload, "keypair")
    }

    /// Every application on the account, fetched once per client
    pub async fn apps(&self) -> Result<Rc<SmartCollection<App>>, ApiError> {
        self.apps
            .get_or_fetch(|| async {
                let payload = self.session.get("/apps").await?;
                decode_list(&self.session, payload, "apps")
            })
            .await
    }

    /// Environments of every application, in application order
    pub async fn environments(&self) -> Result<SmartCollection<Environment>, ApiError> {
        let apps = self.apps().await?;
        Ok(apps
            .iter()
            .flat_map(|app| app.environments().iter().cloned())
            .collect())
    }

    /// The application whose repository is `uri`
    pub async fn app_for_repo(&self, uri: &str) -> Result<Match<App>, ApiError> {
        let apps = self.apps().await?;
        let mut candidates: Vec<&App> = apps.iter().filter(|app| app.has_repository(uri)).collect();

        Ok(match candidates.len() {
            0 => Match::NotFound,
            1 => Match::Found(candidates.remove(0).clone()),
            _ => Match::Ambiguous(
                candidates
                    .iter()
                    .filter_map(|app| app.name())
                    .map(str::to_string)
                    .collect(),
            ),
        })
    }

    pub fn invalidate_keys(&self) {
        self.keys.invalidate();
    }

    pub fn invalidate_apps(&self) {
        self.apps.invalidate();
    }
}

/// Clients are equal when they hold the same token, whatever the endpoint
impl PartialEq for ApiClient {
    fn eq(&self, other: &Self) -> bool {
        self.session == other.session
    }
}
