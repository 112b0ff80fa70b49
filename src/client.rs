//! QRZ.com XML API client implementation.

use crate::cache::CallsignCache;
use crate::error::{QrzError, Result};
use crate::types::{CallsignRecord, QrzResponse, SessionInfo};
use crate::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

/// Configuration for the QRZ client
#[derive(Debug, Clone)]
pub struct QrzClientConfig {
    /// Base URL for the QRZ XML API
    pub base_url: String,
    /// User agent string, also sent as the `agent` query parameter
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Cache time-to-live. `None` means cached records never expire.
    pub cache_ttl: Option<Duration>,
}

impl Default for QrzClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: 30,
            cache_ttl: None,
        }
    }
}

/// Internal session state
#[derive(Debug, Clone)]
struct SessionState {
    key: Option<String>,
    count: Option<u32>,
    sub_exp: Option<String>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            key: None,
            count: None,
            sub_exp: None,
        }
    }

    fn update_from_session_info(&mut self, session: &SessionInfo) {
        if let Some(key) = &session.key {
            self.key = Some(key.clone());
        }
        if let Some(count) = session.count {
            self.count = Some(count);
        }
        if let Some(sub_exp) = &session.sub_exp {
            self.sub_exp = Some(sub_exp.clone());
        }
    }

    fn has_valid_session(&self) -> bool {
        self.key.is_some()
    }

    fn clear(&mut self) {
        self.key = None;
        self.count = None;
        self.sub_exp = None;
    }
}

/// Client for the QRZ.com XML callsign lookup service.
///
/// Owns the session and the record cache; there is no process-wide state.
/// Lookups authenticate lazily on first use, and a session rejected by the
/// server triggers exactly one transparent re-authentication and retry.
pub struct QrzClient {
    /// HTTP client
    http_client: Client,
    /// QRZ account name
    username: String,
    /// QRZ XML data key or password
    password: String,
    /// Client configuration
    config: QrzClientConfig,
    /// Current session state
    session: Arc<RwLock<SessionState>>,
    /// Cached records, keyed by uppercased callsign
    cache: Arc<RwLock<CallsignCache>>,
}

impl QrzClient {
    /// Create a new QRZ client with default configuration
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        Self::with_config(username, password, QrzClientConfig::default())
    }

    /// Create a new QRZ client with custom configuration
    pub fn with_config(
        username: impl Into<String>,
        password: impl Into<String>,
        config: QrzClientConfig,
    ) -> Result<Self> {
        // reject a malformed base URL up front rather than on first lookup
        Url::parse(&config.base_url)?;

        let http_client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let cache = match config.cache_ttl {
            Some(ttl) => CallsignCache::with_ttl(ttl),
            None => CallsignCache::new(),
        };

        Ok(Self {
            http_client,
            username: username.into(),
            password: password.into(),
            config,
            session: Arc::new(RwLock::new(SessionState::new())),
            cache: Arc::new(RwLock::new(cache)),
        })
    }

    /// Perform initial authentication and establish a session.
    ///
    /// Lookups authenticate lazily, so calling this is optional; it is useful
    /// to validate credentials up front.
    pub async fn authenticate(&self) -> Result<()> {
        info!("Authenticating with QRZ.com");
        self.login().await?;
        Ok(())
    }

    /// Look up the station record for a callsign.
    ///
    /// The callsign is trimmed and uppercased before use, so `w6bsd` and
    /// `W6BSD` resolve to the same cache entry. A fresh cached record is
    /// returned without any network traffic. On a server-side session
    /// rejection the client re-authenticates once and retries; a second
    /// rejection surfaces as [`QrzError::Auth`]. Unknown callsigns surface
    /// as [`QrzError::NotFound`] and are never cached.
    pub async fn get_call(&self, callsign: &str) -> Result<CallsignRecord> {
        let callsign = callsign.trim().to_uppercase();
        if callsign.is_empty() {
            return Err(QrzError::invalid_input("Callsign cannot be empty"));
        }
        debug!("Looking up callsign: {}", callsign);

        if let Some(record) = self.cache.read().await.get(&callsign).cloned() {
            return Ok(record);
        }

        let response = match self
            .make_authenticated_request(&[("callsign", &callsign)])
            .await
        {
            Ok(resp) => resp,
            Err(QrzError::SessionExpired) => {
                warn!("Session rejected by server, re-authenticating and retrying");
                // Clear the old session first
                {
                    let mut session = self.session.write().await;
                    session.clear();
                }
                self.login().await?;
                self.make_authenticated_request(&[("callsign", &callsign)])
                    .await
                    .map_err(|err| {
                        if err.should_reauthenticate() {
                            QrzError::auth("session rejected again after re-authentication")
                        } else {
                            err
                        }
                    })?
            }
            Err(e) => return Err(e),
        };

        match response.callsign {
            Some(record) => {
                info!("Successfully looked up callsign: {}", record.call);
                self.cache.write().await.put(&callsign, record.clone());
                Ok(record)
            }
            None => match response.session.error_message() {
                Some(error) if error.to_lowercase().contains("not found") => {
                    Err(QrzError::not_found(callsign))
                }
                Some(error) => Err(QrzError::service(error)),
                None => Err(QrzError::service("No callsign data in response")),
            },
        }
    }

    /// Get current session information (lookup count, subscription expiry)
    pub async fn session_info(&self) -> (Option<u32>, Option<String>) {
        let session = self.session.read().await;
        (session.count, session.sub_exp.clone())
    }

    /// Check if currently authenticated
    pub async fn is_authenticated(&self) -> bool {
        let session = self.session.read().await;
        session.has_valid_session()
    }

    /// Force re-authentication (clears current session)
    pub async fn reauthenticate(&self) -> Result<()> {
        {
            let mut session = self.session.write().await;
            session.clear();
        }
        self.authenticate().await
    }

    /// Number of records currently cached
    pub async fn cache_len(&self) -> usize {
        self.cache.read().await.len()
    }

    /// Drop every cached record
    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
    }

    /// Drop the cached record for one callsign, returning whether one was present
    pub async fn expire_cached(&self, callsign: &str) -> bool {
        self.cache.write().await.remove(callsign)
    }

    /// Internal method to perform login
    async fn login(&self) -> Result<SessionInfo> {
        let params = [
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
            ("agent", &self.config.user_agent),
        ];

        debug!("Performing login to QRZ.com");
        let response = self.make_request(&params).await?;

        let session_info = response.session.clone();

        if let Some(error) = session_info.error_message() {
            let reason = error.to_lowercase();
            if reason.contains("password") || reason.contains("username") || reason.contains("invalid") {
                return Err(QrzError::auth(error));
            }
            return Err(QrzError::service(error));
        }

        if !session_info.has_valid_session() {
            return Err(QrzError::auth("no session key in login response"));
        }

        // Update our internal session state
        {
            let mut session = self.session.write().await;
            session.update_from_session_info(&session_info);
        }

        info!("Successfully authenticated with QRZ.com");
        Ok(session_info)
    }

    /// Make a request carrying the session key, authenticating first if no
    /// session is held
    async fn make_authenticated_request(&self, params: &[(&str, &str)]) -> Result<QrzResponse> {
        let session_key = {
            let session = self.session.read().await;
            session.key.clone()
        };

        let session_key = match session_key {
            Some(key) => key,
            None => {
                // Need to authenticate first
                self.login()
                    .await?
                    .key
                    .ok_or_else(|| QrzError::auth("no session key in login response"))?
            }
        };

        let mut all_params = vec![
            ("s", session_key.as_str()),
            ("agent", self.config.user_agent.as_str()),
        ];
        all_params.extend_from_slice(params);

        let response = self.make_request(&all_params).await?;

        // Update session info from response
        {
            let mut session = self.session.write().await;
            session.update_from_session_info(&response.session);
        }

        if let Some(error) = response.session.error_message() {
            let reason = error.to_lowercase();
            if reason.contains("session") || reason.contains("invalid key") {
                return Err(QrzError::SessionExpired);
            }
            // "not found" is surfaced by the caller with the callsign attached
            if !reason.contains("not found") {
                return Err(QrzError::service(error));
            }
        } else if !response.session.has_valid_session() {
            return Err(QrzError::SessionExpired);
        }

        Ok(response)
    }

    /// Make a raw HTTP GET request and parse the XML response
    async fn make_request(&self, params: &[(&str, &str)]) -> Result<QrzResponse> {
        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let full_url = if query_string.is_empty() {
            self.config.base_url.clone()
        } else {
            format!("{}?{}", self.config.base_url, query_string)
        };

        debug!("Making request to: {}", full_url);

        let response = self
            .http_client
            .get(&full_url)
            .send()
            .await?
            .error_for_status()?;

        let xml_content = response.text().await?;
        debug!("Received XML response: {}", xml_content);

        let parsed_response: QrzResponse = quick_xml::de::from_str(&xml_content).map_err(|e| {
            warn!("Failed to parse XML response: {}", e);
            warn!("Response content: {}", xml_content);
            e
        })?;

        Ok(parsed_response)
    }
}

// Helper for encoding query string values
mod urlencoding {
    pub fn encode(input: &str) -> String {
        url::form_urlencoded::byte_serialize(input.as_bytes()).collect()
    }
}
