use crate::{
    ApiRequest, ApiResponse, CliClientResult, ClientError, ReqwestTransport, Transport,
    TransportRefresher,
};

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use log::{info, warn};
use pt_config::Config;
use pt_core::{
    Beneficiary, BeneficiaryEnrollResponse, CoreError, DateRange, LedgerRecord, LoginCredentials,
    LoginResponse, OtpRequest, OtpResponse, OtpVerifyRequest, PasswordResetRequest,
    PasswordResetVerifyRequest, Payment, PaymentForm, PaymentRequest, RegisterRequest,
    SignupResponse, build_enroll_request, parse_otp, parse_otp_number, validate_email,
    validate_password_confirmation,
};
use pt_session::{
    FileSessionStore, RefreshTrigger, SessionListener, SessionManager, SessionSettings,
    SessionStore, TokioClock,
};
use serde_json::Value;

pub const REFRESH_PATH: &str = "/auth/refresh";

const LOGIN_PATH: &str = "/auth/login";
const SIGNUP_PATH: &str = "/auth/signup";
const SIGNUP_SEND_OTP_PATH: &str = "/auth/signup/send-otp";
const SIGNUP_VERIFY_OTP_PATH: &str = "/auth/signup/verify-otp";
const LOGOUT_PATH: &str = "/auth/logout";
const PASSWORD_RESET_REQUEST_PATH: &str = "/auth/password-reset/request";
const PASSWORD_RESET_VERIFY_PATH: &str = "/auth/password-reset/verify";
const BENEFICIARY_LIST_PATH: &str = "/beneficiary/payer";
const BENEFICIARY_ENROLL_PATH: &str = "/beneficiary/enroll";
const LEDGERS_PATH: &str = "/ledgers";

/// HTTP client for the paytrack backend.
///
/// Every call goes through [`Client::execute`], which retries a request once
/// after refreshing the session when the backend answers 401.
pub struct Client {
    transport: Arc<dyn Transport>,
    session: SessionManager,
}

impl Client {
    pub fn new(transport: Arc<dyn Transport>, session: SessionManager) -> Self {
        Self { transport, session }
    }

    /// Wire a client from configuration: file-backed session store, reqwest
    /// transport seeded with the saved cookies, and a tokio clock.
    pub fn from_config(config: &Config, listener: Arc<dyn SessionListener>) -> CliClientResult<Self> {
        let store: Arc<dyn SessionStore> =
            Arc::new(FileSessionStore::new(config.session_file_path()?));
        let cookies = store.load()?.cookies;

        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(
            &config.api.base_url,
            config.api.request_timeout(),
            cookies.as_deref(),
        )?);

        let refresher = Arc::new(TransportRefresher::new(
            Arc::clone(&transport),
            Arc::clone(&store),
        ));

        let session = SessionManager::new(
            SessionSettings::from(&config.session),
            Arc::new(TokioClock::new()),
            refresher,
            store,
            listener,
        );

        Ok(Self::new(transport, session))
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Send a request, applying the 401 fallback while a session is active.
    ///
    /// A 401 from any path but the refresh endpoint triggers one refresh; on
    /// success the proactive timer is re-armed and the request replayed once.
    /// A failed refresh, or a 401 from the refresh endpoint itself, expires
    /// the session.
    pub async fn execute(&self, request: ApiRequest) -> CliClientResult<ApiResponse> {
        let response = self.transport.send(&request).await?;

        let response = if response.is_unauthorized() && self.session.is_active() {
            if request.path == REFRESH_PATH {
                warn!("Refresh endpoint returned 401, session expired");
                self.session.expire();
                return Err(ClientError::session_expired());
            }
            self.retry_after_refresh(&request).await?
        } else {
            response
        };

        self.persist_cookies();
        response.error_for_status()
    }

    async fn retry_after_refresh(&self, request: &ApiRequest) -> CliClientResult<ApiResponse> {
        info!(
            "{} {} returned 401, refreshing session",
            request.method, request.path
        );

        match self.session.refresh(RefreshTrigger::Unauthorized).await {
            Ok(()) => {
                self.session
                    .schedule(self.session.settings().refresh_interval);
                self.transport.send(request).await
            }
            Err(e) => {
                warn!("Refresh after 401 failed: {e}");
                self.session.expire();
                Err(ClientError::session_expired())
            }
        }
    }

    fn persist_cookies(&self) {
        if let Err(e) = self.session.persist_cookies(self.transport.cookie_header()) {
            warn!("Failed to save session cookies: {e}");
        }
    }

    // =========================================================================
    // Auth Operations
    // =========================================================================

    /// Log in and start the session
    pub async fn login(&self, email: &str, password: &str) -> CliClientResult<LoginResponse> {
        let email = email.trim();
        validate_email(email)?;
        if password.is_empty() {
            return Err(CoreError::validation("Please enter your password").into());
        }

        let body = LoginCredentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = ApiRequest::post(LOGIN_PATH).with_json(&body)?;
        let response: LoginResponse = self.execute(request).await?.json()?;

        if let Some(user) = &response.user {
            self.session.start_session(user.clone())?;
            self.persist_cookies();
        }

        Ok(response)
    }

    /// Send the signup verification code
    pub async fn send_signup_otp(&self, email: &str) -> CliClientResult<OtpResponse> {
        let email = email.trim();
        validate_email(email)?;

        let request = ApiRequest::post(SIGNUP_SEND_OTP_PATH).with_json(&OtpRequest {
            email: email.to_string(),
        })?;
        Ok(message_response(&self.execute(request).await?))
    }

    /// Verify the signup code
    pub async fn verify_signup_otp(&self, email: &str, otp: &str) -> CliClientResult<OtpResponse> {
        let email = email.trim();
        validate_email(email)?;
        let otp = parse_otp(otp)?;

        let request = ApiRequest::post(SIGNUP_VERIFY_OTP_PATH).with_json(&OtpVerifyRequest {
            email: email.to_string(),
            otp,
        })?;
        Ok(message_response(&self.execute(request).await?))
    }

    /// Create an account and start the session
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> CliClientResult<SignupResponse> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(CoreError::validation("Please enter your name").into());
        }
        validate_email(email)?;
        validate_password_confirmation(password, confirm_password)?;

        let body = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = ApiRequest::post(SIGNUP_PATH).with_json(&body)?;
        let response: SignupResponse = self.execute(request).await?.json()?;

        if let Some(user) = &response.user {
            self.session.start_session(user.clone())?;
            self.persist_cookies();
        }

        Ok(response)
    }

    /// Refresh the session on demand.
    ///
    /// Runs through the session manager like a timer refresh. On success the
    /// proactive timer is re-armed; if a live session cannot be refreshed it
    /// expires.
    pub async fn refresh(&self) -> CliClientResult<()> {
        match self.session.refresh(RefreshTrigger::Manual).await {
            Ok(()) => {
                if self.session.is_active() {
                    self.session
                        .schedule(self.session.settings().refresh_interval);
                }
                Ok(())
            }
            Err(e) if self.session.is_active() => {
                warn!("Manual refresh failed: {e}");
                self.session.expire();
                Err(ClientError::session_expired())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Log out. The local session is cleared even if the backend call fails.
    pub async fn logout(&self) -> CliClientResult<Value> {
        let result = self.execute(ApiRequest::post(LOGOUT_PATH)).await;
        self.session.end_session()?;

        Ok(result?.json_value())
    }

    /// Ask for a password reset code and remember the email for verification.
    ///
    /// A second request for the same email inside the resend cooldown is
    /// refused without contacting the backend.
    pub async fn request_password_reset(&self, email: &str) -> CliClientResult<OtpResponse> {
        let email = email.trim();
        validate_email(email)?;

        if let Some(wait) = self.session.reset_resend_wait(email)? {
            let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
            return Err(CoreError::validation(format!(
                "Please wait {secs}s before requesting another code"
            ))
            .into());
        }

        let request = ApiRequest::post(PASSWORD_RESET_REQUEST_PATH).with_json(&PasswordResetRequest {
            email: email.to_string(),
        })?;
        let response = self.execute(request).await?;
        self.session.remember_reset_email(email)?;

        Ok(message_response(&response))
    }

    /// Verify a password reset code.
    ///
    /// Without `email`, the one remembered by [`Client::request_password_reset`]
    /// is used.
    pub async fn verify_password_reset(
        &self,
        email: Option<&str>,
        otp: &str,
    ) -> CliClientResult<OtpResponse> {
        let email = match email.map(str::trim).filter(|e| !e.is_empty()) {
            Some(email) => email.to_string(),
            None => self.session.reset_email()?.ok_or_else(|| {
                CoreError::validation("No password reset in progress, request a code first")
            })?,
        };
        validate_email(&email)?;

        let otp = parse_otp_number(otp)?;

        let request = ApiRequest::post(PASSWORD_RESET_VERIFY_PATH)
            .with_json(&PasswordResetVerifyRequest { email, otp })?;
        let response = self.execute(request).await?;
        self.session.clear_reset_email()?;

        Ok(message_response(&response))
    }

    // =========================================================================
    // Beneficiary Operations
    // =========================================================================

    /// List the current user's beneficiaries
    pub async fn list_beneficiaries(&self) -> CliClientResult<Vec<Beneficiary>> {
        let user = self.session.require_user()?;
        let request = ApiRequest::get(BENEFICIARY_LIST_PATH).with_query("payerId", user.id);
        self.execute(request).await?.json()
    }

    /// Add a beneficiary
    pub async fn enroll_beneficiary(
        &self,
        payee_email: &str,
        payee_alias: &str,
    ) -> CliClientResult<BeneficiaryEnrollResponse> {
        let body = build_enroll_request(payee_email, payee_alias)?;
        let request = ApiRequest::post(BENEFICIARY_ENROLL_PATH).with_json(&body)?;
        let response = self.execute(request).await?;

        Ok(response
            .json()
            .unwrap_or_else(|_| BeneficiaryEnrollResponse {
                message: response.body.trim().to_string(),
                beneficiary: None,
            }))
    }

    // =========================================================================
    // Ledger Operations
    // =========================================================================

    /// Fetch payments, optionally bounded by date
    pub async fn fetch_ledgers(&self, range: &DateRange) -> CliClientResult<Vec<Payment>> {
        let request = range
            .query_params()
            .into_iter()
            .fold(ApiRequest::get(LEDGERS_PATH), |request, (key, value)| {
                request.with_query(key, value)
            });
        self.execute(request).await?.json()
    }

    /// Record a payment
    pub async fn create_ledger(&self, payment: &PaymentRequest) -> CliClientResult<LedgerRecord> {
        let request = ApiRequest::post(LEDGERS_PATH).with_json(payment)?;
        self.execute(request).await?.json()
    }

    /// Validate a payment form against one of the user's beneficiaries and
    /// record it.
    pub async fn send_payment<Tz: TimeZone>(
        &self,
        beneficiary_id: i64,
        form: PaymentForm,
        tz: &Tz,
        now: DateTime<Utc>,
    ) -> CliClientResult<LedgerRecord> {
        let user = self.session.require_user()?;
        let beneficiary = self
            .list_beneficiaries()
            .await?
            .into_iter()
            .find(|b| b.id == beneficiary_id)
            .ok_or_else(|| {
                CoreError::validation(format!("No beneficiary with id {beneficiary_id}"))
            })?;

        let request = form.into_request(&user, &beneficiary, tz, now)?;
        self.create_ledger(&request).await
    }
}

/// Responses of the OTP endpoints are JSON with a `message`, or plain text.
fn message_response(response: &ApiResponse) -> OtpResponse {
    response.json().unwrap_or_else(|_| OtpResponse {
        message: response.body.trim().to_string(),
    })
}
