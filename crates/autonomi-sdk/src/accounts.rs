//! Account and user operations.
//!
//! Accounts and user lists are returned as bare JSON, not wrapped in `data`.

use autonomi_core::{Account, AccountId, CreateUser, User, Validate};

use crate::client::Client;
use crate::error::Result;

impl Client {
    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is invalid or the request fails.
    pub async fn create_account(&self, payload: &Account) -> Result<Account> {
        payload.validate()?;
        self.post_json("/accounts", payload).await
    }

    /// List the accounts visible to the token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.get_json("/accounts").await
    }

    /// Delete an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_account(&self, account_id: AccountId) -> Result<()> {
        self.delete(&format!("/accounts/{account_id}")).await
    }

    /// Invite a user into the client's account.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is invalid or the request fails.
    pub async fn create_user(&self, payload: &CreateUser) -> Result<User> {
        payload.validate()?;
        self.post_data(&format!("{}/users", self.account_path()), payload)
            .await
    }

    /// List the users of `account_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    pub async fn list_users(&self, account_id: AccountId) -> Result<Vec<User>> {
        self.get_json(&format!("/accounts/{account_id}/users")).await
    }
}
