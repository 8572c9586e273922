//! Client layer: session lifecycle, the autologin policy and SMS events.

mod autologin;
mod events;

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, error};
use url::Url;

use crate::domain::{
    AutoconnectMode, DateOrder, DeviceAction, FailoverMode, Message, MessageText, Password,
    PhoneNumber, SmsId, Snapshot, ValidationError,
};

use autologin::{Autologin, FetchStatus};
pub use events::{SmsListener, SmsWatcher};

/// Per-request and per-attempt timeout used unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<HttpResponse, BoxError>>;

    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
        Box::pin(async move {
            let response = self.client.get(url).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }

    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
        Box::pin(async move {
            let response = self.client.post(url).form(&params).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`ModemClient`].
pub enum ModemError {
    /// HTTP client / transport failure (connection refused, reset, etc).
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The device did not answer within the configured timeout.
    #[error("timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// No token could be obtained, no password is known, or the login post failed.
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// The status document is not valid JSON or lacks a required field.
    #[error("parse error: {0}")]
    Parse(#[source] BoxError),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The operation failed, the client logged in again, and it failed once more.
    #[error("{operation} failed after re-login: {source}")]
    Operation {
        operation: &'static str,
        #[source]
        source: Box<ModemError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Page fetched to obtain the session token.
pub enum LoginPage {
    /// `model.json`, token at `session.secToken`.
    #[default]
    ModelJson,
    /// `index.html`, token in a hidden `token` form field (older firmware).
    IndexHtml,
}

impl LoginPage {
    fn path(self) -> &'static str {
        match self {
            Self::ModelJson => crate::transport::STATUS_PATH,
            Self::IndexHtml => "index.html",
        }
    }
}

/// Mutable per-instance state. Always accessed under the client's lock.
#[derive(Debug)]
pub(crate) struct Session {
    password: Option<Password>,
    token: Option<String>,
    active: bool,
    watcher: SmsWatcher,
}

impl Session {
    fn new(password: Option<Password>) -> Self {
        Self {
            password,
            token: None,
            active: true,
            watcher: SmsWatcher::new(),
        }
    }
}

#[derive(Debug, Clone)]
/// Builder for [`ModemClient`].
pub struct ModemClientBuilder {
    host: String,
    password: Option<Password>,
    timeout: Duration,
    user_agent: Option<String>,
    login_page: LoginPage,
    date_order: Option<DateOrder>,
}

impl ModemClientBuilder {
    /// Create a builder for the modem at `host` (`192.168.5.1`, `modem.lan:8080`).
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            password: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            login_page: LoginPage::default(),
            date_order: None,
        }
    }

    /// Admin password used by [`ModemClient::login`] and automatic re-logins.
    pub fn password(mut self, password: Password) -> Self {
        self.password = Some(password);
        self
    }

    /// Timeout for each request and for each autologin attempt.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Page used to fetch the session token.
    pub fn login_page(mut self, login_page: LoginPage) -> Self {
        self.login_page = login_page;
        self
    }

    /// Force the date order of message timestamps instead of deriving it
    /// from the reported model.
    pub fn date_order(mut self, date_order: DateOrder) -> Self {
        self.date_order = Some(date_order);
        self
    }

    /// Build a [`ModemClient`].
    pub fn build(self) -> Result<ModemClient, ModemError> {
        let base_url = base_url(&self.host)?;

        // Timeouts are applied per call with `tokio::time::timeout`.
        let mut builder = reqwest::Client::builder().cookie_store(true);
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| ModemError::Transport(Box::new(err)))?;

        Ok(ModemClient {
            base_url,
            timeout: self.timeout,
            login_page: self.login_page,
            date_order: self.date_order,
            http: Arc::new(ReqwestTransport { client }),
            state: Mutex::new(Session::new(self.password)),
        })
    }
}

fn base_url(host: &str) -> Result<Url, ValidationError> {
    let invalid = || ValidationError::InvalidHost {
        input: host.to_owned(),
    };

    let trimmed = host.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field: "host" });
    }

    let url = Url::parse(&format!("http://{trimmed}/")).map_err(|_| invalid())?;
    if url.host_str().is_none() || url.path() != "/" || url.query().is_some() {
        return Err(invalid());
    }
    Ok(url)
}

/// Client for one Netgear LTE modem.
///
/// All operations on one instance are serialized: the session token, the
/// stored password and the SMS watermark live behind a single async lock.
/// Mutating operations return `Ok(Some(status))` with the HTTP status the
/// device answered with, or `Ok(None)` after [`ModemClient::logout`].
///
/// SMS listeners run inside [`ModemClient::information`] while that lock is
/// held; a listener that wants to act on the modem (reply, delete) must hand
/// the work to a spawned task.
pub struct ModemClient {
    base_url: Url,
    timeout: Duration,
    login_page: LoginPage,
    date_order: Option<DateOrder>,
    http: Arc<dyn HttpTransport>,
    state: Mutex<Session>,
}

impl ModemClient {
    /// Create a client for `host` with default settings.
    ///
    /// For more customization, use [`ModemClient::builder`].
    pub fn new(host: impl Into<String>) -> Result<Self, ModemError> {
        ModemClientBuilder::new(host).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(host: impl Into<String>) -> ModemClientBuilder {
        ModemClientBuilder::new(host)
    }

    /// Root URL of the device web interface.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Create a session with the modem.
    ///
    /// A given password replaces the stored one and is reused for automatic
    /// re-logins. The token fetch and login post are tried twice before
    /// failing with [`ModemError::Authentication`].
    pub async fn login(&self, password: Option<Password>) -> Result<(), ModemError> {
        let mut session = self.state.lock().await;
        if password.is_some() {
            session.password = password;
        }
        session.active = true;
        self.login_session(&mut session).await?;
        Ok(())
    }

    /// Drop the session token. Later operations are no-ops until the next
    /// [`ModemClient::login`].
    pub async fn logout(&self) {
        let mut session = self.state.lock().await;
        session.token = None;
        session.active = false;
        debug!("logged out");
    }

    /// Register a callback for messages that arrive after the first poll.
    pub async fn add_sms_listener<F>(&self, listener: F)
    where
        F: Fn(&Message) -> Result<(), Box<dyn StdError + Send + Sync>> + Send + Sync + 'static,
    {
        self.state.lock().await.watcher.add_listener(listener);
    }

    /// Highest message id seen by [`ModemClient::information`] so far.
    pub async fn max_sms_id(&self) -> Option<SmsId> {
        self.state.lock().await.watcher.max_sms_id()
    }

    /// Poll the status document.
    ///
    /// New messages (compared with earlier polls) are handed to the SMS
    /// listeners before the snapshot is returned.
    pub async fn information(&self) -> Result<Option<Snapshot>, ModemError> {
        let mut session = self.state.lock().await;
        let snapshot = Autologin::new(self.timeout)
            .run(self, &mut session, &FetchStatus)
            .await?;

        if let Some(snapshot) = snapshot.as_ref() {
            let fresh = session.watcher.observe(&snapshot.sms);
            debug!(messages = snapshot.sms.len(), fresh, "did read information");
        }
        Ok(snapshot)
    }

    /// Run one device action under the session, re-logging in once if needed.
    pub async fn perform(&self, action: DeviceAction) -> Result<Option<u16>, ModemError> {
        let mut session = self.state.lock().await;
        Autologin::new(self.timeout)
            .run(self, &mut session, &action)
            .await
    }

    /// Send an SMS.
    pub async fn send_sms(
        &self,
        phone: PhoneNumber,
        text: MessageText,
    ) -> Result<Option<u16>, ModemError> {
        debug!(
            "send to {} via {} len={}",
            phone.as_str(),
            self.base_url,
            text.as_str().len()
        );
        self.perform(DeviceAction::SendSms { phone, text }).await
    }

    /// Delete a message from the inbox.
    pub async fn delete_sms(&self, id: SmsId) -> Result<Option<u16>, ModemError> {
        self.perform(DeviceAction::DeleteSms(id)).await
    }

    pub async fn set_failover_mode(&self, mode: FailoverMode) -> Result<Option<u16>, ModemError> {
        self.perform(DeviceAction::SetFailoverMode(mode)).await
    }

    pub async fn set_autoconnect_mode(
        &self,
        mode: AutoconnectMode,
    ) -> Result<Option<u16>, ModemError> {
        self.perform(DeviceAction::SetAutoconnectMode(mode)).await
    }

    /// Dial LTE with the default profile.
    pub async fn connect_lte(&self) -> Result<Option<u16>, ModemError> {
        self.perform(DeviceAction::ConnectLte).await
    }

    pub async fn disconnect_lte(&self) -> Result<Option<u16>, ModemError> {
        self.perform(DeviceAction::DisconnectLte).await
    }

    pub async fn router_restart(&self) -> Result<Option<u16>, ModemError> {
        self.perform(DeviceAction::RouterRestart).await
    }

    /// Reset the device to factory settings. The password is reset too.
    pub async fn factory_reset(&self) -> Result<Option<u16>, ModemError> {
        self.perform(DeviceAction::FactoryReset).await
    }

    /// Log in with the stored password, trying the sequence twice.
    ///
    /// The device sometimes drops a login that follows another request too
    /// quickly, so one failure is not conclusive.
    async fn login_session(&self, session: &mut Session) -> Result<String, ModemError> {
        let password = session
            .password
            .clone()
            .ok_or_else(|| ModemError::Authentication {
                message: "no password configured".to_owned(),
            })?;

        let token = match self.login_once(&password).await {
            Ok(token) => token,
            Err(err) => {
                debug!("login attempt failed, trying again: {err}");
                self.login_once(&password).await?
            }
        };

        session.token = Some(token.clone());
        Ok(token)
    }

    async fn login_once(&self, password: &Password) -> Result<String, ModemError> {
        let could_not_login = |err: ModemError| ModemError::Authentication {
            message: format!("could not login: {err}"),
        };

        let page = self
            .get(self.login_page.path())
            .await
            .map_err(could_not_login)?;

        let token = crate::transport::extract_token(&page.body).map_err(|err| {
            error!("no token found during login");
            ModemError::Authentication {
                message: err.to_string(),
            }
        })?;
        debug!("got session token");

        let params = crate::transport::encode_login_form(password, &token);
        let response = self
            .post_form(crate::transport::CONFIG_PATH, params)
            .await
            .map_err(could_not_login)?;
        debug!("got cookie with status {}", response.status);

        Ok(token)
    }

    async fn post_action(&self, action: &DeviceAction, token: &str) -> Result<u16, ModemError> {
        let (path, params) = crate::transport::encode_action_form(action, token);
        let response = self.post_form(path, params).await?;
        debug!("{} with status {}", action.name(), response.status);
        Ok(response.status)
    }

    async fn fetch_status(&self) -> Result<Snapshot, ModemError> {
        let response = self.get(crate::transport::STATUS_PATH).await?;

        crate::transport::decode_status_json_response(&response.body, self.date_order).map_err(
            |err| {
                debug!("failed to read information: {err}");
                ModemError::Parse(Box::new(err))
            },
        )
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get(&self, path: &str) -> Result<HttpResponse, ModemError> {
        let url = self.endpoint(path);
        tokio::time::timeout(self.timeout, self.http.get(&url))
            .await
            .map_err(|_| ModemError::Timeout {
                timeout: self.timeout,
            })?
            .map_err(ModemError::Transport)
    }

    async fn post_form(
        &self,
        path: &str,
        params: Vec<(String, String)>,
    ) -> Result<HttpResponse, ModemError> {
        let url = self.endpoint(path);
        tokio::time::timeout(self.timeout, self.http.post_form(&url, params))
            .await
            .map_err(|_| ModemError::Timeout {
                timeout: self.timeout,
            })?
            .map_err(ModemError::Transport)
    }
}
