//! Google sign-in: authorization code + PKCE over a loopback redirect.
//!
//! A login walks Idle → AwaitingRedirect → TokenReceived → UserInfoFetched,
//! dropping to Failed on any error, timeout or cancellation.

mod callback;
mod pkce;

use std::time::Duration;

use chrono::Utc;
use schedularr_core::config::AppConfig;
use schedularr_core::session::{Session, SessionStore};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use crate::client::{check_response, parse_response};
use crate::error::{GoogleError, GoogleResult};
use crate::types::{TokenResponse, UserInfo};

pub use callback::CALLBACK_PATH;
pub use pkce::PkceChallenge;

pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/calendar",
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/userinfo.profile",
];

pub const DEFAULT_LOGIN_TIMEOUT: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthEndpoints {
    pub authorization: String,
    pub token: String,
    pub userinfo: String,
    pub revoke: String,
}

impl OAuthEndpoints {
    pub fn google() -> Self {
        OAuthEndpoints {
            authorization: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token: "https://oauth2.googleapis.com/token".to_string(),
            userinfo: "https://www.googleapis.com/oauth2/v2/userinfo".to_string(),
            revoke: "https://oauth2.googleapis.com/revoke".to_string(),
        }
    }
}

impl Default for OAuthEndpoints {
    fn default() -> Self {
        Self::google()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Idle,
    AwaitingRedirect,
    TokenReceived,
    UserInfoFetched,
    Failed(String),
}

/// Token endpoint operations shared by login, refresh and logout.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    app: AppConfig,
    endpoints: OAuthEndpoints,
    http: reqwest::Client,
}

impl OAuthClient {
    pub fn new(app: AppConfig) -> Self {
        OAuthClient {
            app,
            endpoints: OAuthEndpoints::google(),
            http: reqwest::Client::new(),
        }
    }

    pub fn with_endpoints(mut self, endpoints: OAuthEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn login(&self) -> OAuthFlow<'_> {
        OAuthFlow {
            client: self,
            state: AuthState::Idle,
        }
    }

    /// Trade the refresh token for a new access token. Google usually omits
    /// the refresh token in the reply, in which case the old one is kept.
    pub async fn refresh(&self, session: &Session) -> GoogleResult<Session> {
        let refresh_token = session.refresh_token.as_deref().ok_or_else(|| {
            GoogleError::Auth(
                "Session expired and cannot be refreshed. Run `schedularr auth login` again."
                    .to_string(),
            )
        })?;

        let mut form = vec![
            ("client_id", self.app.client_id.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];
        if let Some(secret) = &self.app.client_secret {
            form.push(("client_secret", secret.as_str()));
        }

        let response = self.http.post(&self.endpoints.token).form(&form).send().await?;
        let tokens: TokenResponse = parse_response(response).await?;

        debug!(user = %session.user_email, "refreshed access token");

        Ok(Session {
            access_token: tokens.access_token,
            refresh_token: tokens
                .refresh_token
                .or_else(|| session.refresh_token.clone()),
            expires_at: expires_at(tokens.expires_in),
            ..session.clone()
        })
    }

    pub async fn revoke(&self, token: &str) -> GoogleResult<()> {
        let response = self
            .http
            .post(&self.endpoints.revoke)
            .form(&[("token", token)])
            .send()
            .await?;

        check_response(response).await
    }

    async fn exchange_code(&self, code: &str, pending: &PendingLogin) -> GoogleResult<TokenResponse> {
        let mut form = vec![
            ("client_id", self.app.client_id.as_str()),
            ("code", code),
            ("code_verifier", pending.pkce.verifier.as_str()),
            ("grant_type", "authorization_code"),
            ("redirect_uri", pending.redirect_uri.as_str()),
        ];
        if let Some(secret) = &self.app.client_secret {
            form.push(("client_secret", secret.as_str()));
        }

        let response = self.http.post(&self.endpoints.token).form(&form).send().await?;
        parse_response(response).await
    }

    async fn user_info(&self, access_token: &str) -> GoogleResult<UserInfo> {
        let response = self
            .http
            .get(&self.endpoints.userinfo)
            .bearer_auth(access_token)
            .send()
            .await?;

        parse_response(response).await
    }
}

/// A started login: the listener is bound and the consent URL is ready to
/// be opened.
#[derive(Debug)]
pub struct PendingLogin {
    listener: TcpListener,
    redirect_uri: String,
    authorization_url: String,
    pkce: PkceChallenge,
}

impl PendingLogin {
    pub fn authorization_url(&self) -> &str {
        &self.authorization_url
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn state(&self) -> &str {
        &self.pkce.state
    }
}

#[derive(Debug)]
pub struct OAuthFlow<'a> {
    client: &'a OAuthClient,
    state: AuthState,
}

impl OAuthFlow<'_> {
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub async fn start(&mut self) -> GoogleResult<PendingLogin> {
        match self.prepare().await {
            Ok(pending) => {
                self.state = AuthState::AwaitingRedirect;
                Ok(pending)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Wait for the redirect, then fetch tokens and the user's profile.
    /// Gives up after `timeout` or when `cancel` fires.
    pub async fn complete(
        &mut self,
        pending: PendingLogin,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> GoogleResult<Session> {
        if self.state != AuthState::AwaitingRedirect {
            return Err(self.fail(GoogleError::Auth("Sign-in was not started".to_string())));
        }

        match self.finish(&pending, timeout, &cancel).await {
            Ok(session) => {
                info!(user = %session.user_email, "signed in");
                Ok(session)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    async fn prepare(&self) -> GoogleResult<PendingLogin> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        let redirect_uri = format!("http://127.0.0.1:{}{}", port, CALLBACK_PATH);
        let pkce = PkceChallenge::generate();

        let mut url = Url::parse(&self.client.endpoints.authorization)?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client.app.client_id)
            .append_pair("redirect_uri", &redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &SCOPES.join(" "))
            .append_pair("state", &pkce.state)
            .append_pair("code_challenge", &pkce.challenge)
            .append_pair("code_challenge_method", pkce.method())
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent");

        debug!(%redirect_uri, "listening for OAuth redirect");

        Ok(PendingLogin {
            listener,
            redirect_uri,
            authorization_url: url.to_string(),
            pkce,
        })
    }

    async fn finish(
        &mut self,
        pending: &PendingLogin,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> GoogleResult<Session> {
        let params = tokio::select! {
            result = tokio::time::timeout(timeout, callback::wait_for_callback(&pending.listener)) => {
                result.map_err(|_| GoogleError::AuthTimeout(timeout))??
            }
            _ = cancel.cancelled() => return Err(GoogleError::AuthCancelled),
        };

        if let Some(error) = params.get("error") {
            return Err(GoogleError::Auth(format!("Google denied access: {}", error)));
        }

        let state = params
            .get("state")
            .ok_or_else(|| GoogleError::Auth("No state in callback".to_string()))?;
        if state != &pending.pkce.state {
            return Err(GoogleError::Auth(
                "OAuth state mismatch - possible CSRF attack".to_string(),
            ));
        }

        let code = params
            .get("code")
            .ok_or_else(|| GoogleError::Auth("No code in callback".to_string()))?;

        let tokens = self.client.exchange_code(code, pending).await?;
        self.state = AuthState::TokenReceived;

        let user = self.client.user_info(&tokens.access_token).await?;
        self.state = AuthState::UserInfoFetched;

        Ok(Session {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_at: expires_at(tokens.expires_in),
            user_email: user.email,
            user_name: user.name,
        })
    }

    fn fail(&mut self, error: GoogleError) -> GoogleError {
        warn!(%error, "sign-in failed");
        self.state = AuthState::Failed(error.to_string());
        error
    }
}

fn expires_at(expires_in: Option<i64>) -> Option<chrono::DateTime<Utc>> {
    expires_in.map(|secs| Utc::now() + chrono::Duration::seconds(secs))
}

/// Load the stored session, refreshing (and re-saving) it when the access
/// token has expired. `oauth` is only built when a refresh is needed.
pub async fn load_valid_session<F>(store: &SessionStore, oauth: F) -> GoogleResult<Session>
where
    F: FnOnce() -> GoogleResult<OAuthClient>,
{
    let session = store.load()?.ok_or(GoogleError::NotSignedIn)?;

    if !session.is_expired() {
        return Ok(session);
    }

    debug!("access token expired, refreshing");
    let refreshed = oauth()?.refresh(&session).await?;
    store.save(&refreshed)?;

    Ok(refreshed)
}
