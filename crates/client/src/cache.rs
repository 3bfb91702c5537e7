//! In-memory snapshot of the financial entities.
//!
//! The cache is a disposable projection of backend state: it is replaced
//! wholesale on every refresh and never patched in place, so it can be
//! discarded and rebuilt at any time at the cost of one round trip.

use api_types::account::Account;
use api_types::auth::Role;
use api_types::category::Category;
use api_types::dashboard::Summary;
use api_types::transaction::{TransactionKind, TransactionNew, TransactionView};
use api_types::user::{User, UserNew};

use crate::client::Client;
use crate::error::ApiError;

#[derive(Debug, Default)]
pub struct EntityCache {
    summary: Summary,
    accounts: Vec<Account>,
    recent_transactions: Vec<TransactionView>,
    categories: Vec<Category>,
    users: Vec<User>,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole snapshot from the dashboard aggregate.
    ///
    /// When the current identity is an admin, the user list is refreshed in
    /// the same pass. This is the only read path that populates the cache;
    /// the list pages call their dedicated operations directly.
    pub async fn refresh_all(&mut self, client: &Client) -> Result<(), ApiError> {
        let snapshot = client.get_dashboard().await?;
        self.summary = snapshot.summary;
        self.accounts = snapshot.accounts;
        self.recent_transactions = snapshot.recent_transactions;
        self.categories = snapshot.categories;

        let is_admin = client
            .session()
            .current()
            .is_some_and(|session| session.identity.role == Role::Admin);
        if is_admin {
            self.users = client.get_users().await?;
        }

        Ok(())
    }

    /// Categories usable for a transaction of the given kind.
    pub fn categories_for(&self, kind: TransactionKind) -> Vec<&Category> {
        self.categories
            .iter()
            .filter(|category| category.kind == kind)
            .collect()
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn recent_transactions(&self) -> &[TransactionView] {
        &self.recent_transactions
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Saves a movement, then refreshes the snapshot wholesale.
    pub async fn submit_transaction(
        &mut self,
        client: &Client,
        transaction: &TransactionNew,
    ) -> Result<(), ApiError> {
        client.save_transaction(transaction).await?;
        self.refresh_all(client).await
    }

    /// Creates an account, then refreshes the snapshot wholesale.
    pub async fn submit_account(
        &mut self,
        client: &Client,
        account: &api_types::account::AccountNew,
    ) -> Result<(), ApiError> {
        client.save_account(account).await?;
        self.refresh_all(client).await
    }

    /// Provisions a user, then refreshes the snapshot wholesale.
    pub async fn create_user(&mut self, client: &Client, user: &UserNew) -> Result<(), ApiError> {
        client.create_user(user).await?;
        self.refresh_all(client).await
    }

    /// Toggles a user's edit permission, then refreshes the snapshot
    /// wholesale.
    pub async fn set_user_can_edit(
        &mut self,
        client: &Client,
        user_id: &str,
        can_edit: bool,
    ) -> Result<(), ApiError> {
        client.update_user(user_id, can_edit).await?;
        self.refresh_all(client).await
    }
}
