//! The request gateway: the single chokepoint every backend operation
//! flows through.
//!
//! The gateway validates input locally, probes connectivity, attaches the
//! credential token, dispatches through the configured transport strategy
//! and normalizes every failure into the [`ApiError`] taxonomy.

mod validate;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use api_types::account::{Account, AccountNew};
use api_types::auth::{ChangePassword, Credentials, Identity, LoginResponse, RegisterRequest};
use api_types::category::Category;
use api_types::dashboard::DashboardSnapshot;
use api_types::transaction::{TransactionNew, TransactionView};
use api_types::user::{User, UserNew, UserUpdate};

use crate::config::AppConfig;
use crate::error::{ApiError, AppError, classify_backend_error, classify_transport};
use crate::session::SessionStore;
use crate::transport::{CallbackTransport, DirectTransport, Transport, TransportKind};

/// Operations that must stay unauthenticated: no token is ever merged into
/// their payload, even when a session exists.
const UNAUTHENTICATED_ACTIONS: &[&str] = &["admin-login", "login", "register"];

const OFFLINE_MESSAGE: &str = "No hay conexión a internet";

/// Local connectivity probe, checked before any network attempt.
pub trait ConnectivityProbe: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Default probe for environments without an offline signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl ConnectivityProbe for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}

pub struct Client {
    transport: Box<dyn Transport>,
    session: SessionStore,
    probe: Box<dyn ConnectivityProbe>,
}

impl Client {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let transport: Box<dyn Transport> = match config.transport {
            TransportKind::Direct => Box::new(DirectTransport::new(&config.base_url)?),
            TransportKind::Callback => Box::new(CallbackTransport::new(&config.base_url)?),
        };
        Ok(Self {
            transport,
            session: SessionStore::open(&config.session_path),
            probe: Box::new(AlwaysOnline),
        })
    }

    /// Assembles a gateway from explicit parts. Used by tests and by
    /// embedders that bring their own transport or offline signal.
    pub fn with_parts(
        transport: Box<dyn Transport>,
        probe: Box<dyn ConnectivityProbe>,
        session: SessionStore,
    ) -> Self {
        Self {
            transport,
            session,
            probe,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Dispatches one operation: offline probe, token merge, transport call,
    /// failure translation.
    async fn request(&self, action: &str, mut data: Value) -> Result<Value, ApiError> {
        if !self.probe.is_online() {
            return Err(ApiError::Connectivity(OFFLINE_MESSAGE.to_string()));
        }

        if !UNAUTHENTICATED_ACTIONS.contains(&action)
            && let Some(session) = self.session.current()
            && let Value::Object(map) = &mut data
        {
            map.insert("token".to_string(), Value::String(session.token));
        }

        tracing::debug!(action, "dispatching request");
        let envelope = self
            .transport
            .send(action, data)
            .await
            .map_err(classify_transport)?;

        if envelope.success {
            return Ok(envelope.data.unwrap_or(Value::Null));
        }

        let err = classify_backend_error(envelope.error.as_deref().unwrap_or_default());
        if err == ApiError::SessionExpired
            && let Err(clear_err) = self.session.clear()
        {
            tracing::warn!(%clear_err, "failed to clear rejected session");
        }
        tracing::warn!(action, kind = err.kind(), "backend rejected request");
        Err(err)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        action: &str,
        payload: &(impl Serialize + ?Sized),
    ) -> Result<T, ApiError> {
        let data = serde_json::to_value(payload)
            .map_err(|err| ApiError::Server(format!("payload no serializable: {err}")))?;
        let value = self.request(action, data).await?;
        serde_json::from_value(value)
            .map_err(|err| ApiError::Server(format!("Respuesta inválida del servidor: {err}")))
    }

    async fn call_unit(
        &self,
        action: &str,
        payload: &(impl Serialize + ?Sized),
    ) -> Result<(), ApiError> {
        let data = serde_json::to_value(payload)
            .map_err(|err| ApiError::Server(format!("payload no serializable: {err}")))?;
        self.request(action, data).await.map(|_| ())
    }

    async fn authenticate(
        &self,
        action: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, ApiError> {
        validate::require(
            !email.is_empty() && !password.is_empty(),
            "Email y contraseña son requeridos",
        )?;
        validate::email(email)?;

        let response: LoginResponse = self
            .call(
                action,
                &Credentials {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;

        let mut identity = response.user;
        identity.requires_password_change =
            identity.requires_password_change || response.requires_password_change;

        if let Err(err) = self.session.establish(response.token, identity.clone()) {
            tracing::warn!(%err, "session established in memory but not persisted");
        }
        Ok(identity)
    }

    /// Member login. Establishes the session on success.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, ApiError> {
        self.authenticate("login", email, password).await
    }

    /// Admin login. Establishes the session on success.
    pub async fn admin_login(&self, email: &str, password: &str) -> Result<Identity, ApiError> {
        self.authenticate("admin-login", email, password).await
    }

    /// Self-service registration. Does not establish a session; the caller
    /// logs in afterwards.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        validate::require(
            !name.is_empty() && !email.is_empty() && !password.is_empty(),
            "Todos los campos son requeridos",
        )?;
        validate::email(email)?;
        validate::min_password(password, "La contraseña debe tener al menos 6 caracteres")?;

        self.call_unit(
            "register",
            &RegisterRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            },
        )
        .await
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        validate::require(
            !current_password.is_empty() && !new_password.is_empty(),
            "Ambas contraseñas son requeridas",
        )?;
        validate::min_password(
            new_password,
            "La nueva contraseña debe tener al menos 6 caracteres",
        )?;

        self.call_unit(
            "change-admin-password",
            &ChangePassword {
                current_password: current_password.to_string(),
                new_password: new_password.to_string(),
            },
        )
        .await
    }

    pub async fn create_user(&self, user: &UserNew) -> Result<(), ApiError> {
        validate::require(
            !user.name.is_empty() && !user.email.is_empty() && !user.password.is_empty(),
            "Todos los campos son requeridos",
        )?;
        validate::email(&user.email)?;
        validate::min_password(
            &user.password,
            "La contraseña debe tener al menos 6 caracteres",
        )?;

        self.call_unit("create-user", user).await
    }

    pub async fn get_users(&self) -> Result<Vec<User>, ApiError> {
        self.call("get-users", &Value::Object(Default::default()))
            .await
    }

    pub async fn update_user(&self, user_id: &str, can_edit: bool) -> Result<(), ApiError> {
        validate::require(!user_id.is_empty(), "Todos los campos son requeridos")?;
        self.call_unit(
            "update-user",
            &UserUpdate {
                user_id: user_id.to_string(),
                can_edit,
            },
        )
        .await
    }

    pub async fn get_dashboard(&self) -> Result<DashboardSnapshot, ApiError> {
        self.call("get-dashboard", &Value::Object(Default::default()))
            .await
    }

    pub async fn save_transaction(&self, transaction: &TransactionNew) -> Result<(), ApiError> {
        validate::require(
            !transaction.account_id.is_empty(),
            "Tipo, cuenta y monto son requeridos",
        )?;
        validate::positive_amount(transaction.amount)?;

        self.call_unit("save-transaction", transaction).await
    }

    pub async fn get_transactions(&self) -> Result<Vec<TransactionView>, ApiError> {
        self.call("get-transactions", &Value::Object(Default::default()))
            .await
    }

    pub async fn save_account(&self, account: &AccountNew) -> Result<(), ApiError> {
        validate::require(
            !account.name.is_empty() && !account.currency.is_empty(),
            "Nombre, moneda y tipo son requeridos",
        )?;
        validate::finite_balance(account.initial_balance)?;

        self.call_unit("save-account", account).await
    }

    pub async fn get_accounts(&self) -> Result<Vec<Account>, ApiError> {
        self.call("get-accounts", &Value::Object(Default::default()))
            .await
    }

    pub async fn get_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.call("get-categories", &Value::Object(Default::default()))
            .await
    }
}
