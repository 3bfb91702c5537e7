use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod envelope {
    use super::*;
    use serde_json::Value;

    /// Request envelope every backend operation is wrapped in.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Request {
        pub action: String,
        pub data: Value,
    }

    /// Response envelope the backend answers with, on every route.
    ///
    /// The backend reports failures in-band: the HTTP status is usually 200
    /// and `success: false` carries the error message.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Envelope {
        pub success: bool,
        #[serde(default)]
        pub data: Option<Value>,
        #[serde(default)]
        pub error: Option<String>,
    }
}

pub mod auth {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Role {
        Admin,
        Member,
    }

    /// The authenticated identity, as returned by the login operations.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Identity {
        pub id: String,
        pub name: String,
        pub role: Role,
        #[serde(rename = "canEdit", default)]
        pub can_edit: bool,
        #[serde(rename = "requiresPasswordChange", default)]
        pub requires_password_change: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Credentials {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterRequest {
        pub name: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChangePassword {
        #[serde(rename = "currentPassword")]
        pub current_password: String,
        #[serde(rename = "newPassword")]
        pub new_password: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct LoginResponse {
        pub token: String,
        pub user: Identity,
        #[serde(rename = "requiresPasswordChange", default)]
        pub requires_password_change: bool,
    }
}

pub mod account {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum AccountKind {
        Asset,
        Liability,
    }

    /// An account as the backend reports it.
    ///
    /// `current_balance` is signed: liabilities and overdrawn assets are
    /// negative.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Account {
        pub id: String,
        pub name: String,
        /// ISO 4217 code.
        pub currency: String,
        #[serde(rename = "type")]
        pub kind: AccountKind,
        pub current_balance: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
        pub currency: String,
        #[serde(rename = "type")]
        pub kind: AccountKind,
        #[serde(rename = "initialBalance")]
        pub initial_balance: f64,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    /// A stored movement. `amount` is always positive; the sign is carried
    /// by `kind`.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: String,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        #[serde(rename = "accountId", default)]
        pub account_id: Option<String>,
        pub category: String,
        pub amount: f64,
        #[serde(default)]
        pub currency: Option<String>,
        #[serde(default)]
        pub description: Option<String>,
        pub date: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        #[serde(rename = "accountId")]
        pub account_id: String,
        pub category: String,
        pub amount: f64,
        #[serde(default)]
        pub description: Option<String>,
        pub date: NaiveDate,
    }
}

pub mod category {
    use super::*;
    use super::transaction::TransactionKind;

    /// A category is only a filter key for the entry forms; its identity is
    /// the `(name, kind)` pair.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Category {
        pub name: String,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
    }
}

pub mod user {
    use super::*;
    use super::auth::Role;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct User {
        pub id: String,
        pub name: String,
        pub email: String,
        pub role: Role,
        #[serde(rename = "canEdit", default)]
        pub can_edit: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub name: String,
        pub email: String,
        pub password: String,
        #[serde(rename = "canEdit", default)]
        pub can_edit: bool,
    }

    /// Body of the permission-toggle operation.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserUpdate {
        #[serde(rename = "userId")]
        pub user_id: String,
        #[serde(rename = "canEdit")]
        pub can_edit: bool,
    }
}

pub mod dashboard {
    use super::*;
    use super::account::Account;
    use super::category::Category;
    use super::transaction::TransactionView;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct Summary {
        #[serde(default)]
        pub total_balance: f64,
        #[serde(default)]
        pub monthly_income: f64,
        #[serde(default)]
        pub monthly_expenses: f64,
    }

    /// The aggregate that seeds the client cache. Always consumed wholesale;
    /// partial updates are never applied.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct DashboardSnapshot {
        #[serde(default)]
        pub summary: Summary,
        #[serde(default)]
        pub accounts: Vec<Account>,
        #[serde(rename = "recentTransactions", default)]
        pub recent_transactions: Vec<TransactionView>,
        #[serde(default)]
        pub categories: Vec<Category>,
    }
}
