//! Mailbox management through the `Email` module.

use cpc_error::Result;

use super::AccountScope;
use crate::params::{Params, RenameTable, WireOptions};
use crate::response::ApiResponse;
use crate::server::Server;

pub const MODULE: &str = "Email";

pub const LIST_RENAMES: RenameTable = &[
    ("near_quota_only", "nearquotaonly"),
    ("skip_validation", "no_validate"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListAccountsOptions {
    /// Only accounts under this domain.
    pub domain: Option<String>,
    /// Regular expression the address must match.
    pub regex: Option<String>,
    /// Only accounts at 95% of their quota or above.
    pub near_quota_only: Option<bool>,
    pub skip_validation: Option<bool>,
    pub extra: Params,
}

impl WireOptions for ListAccountsOptions {
    const RENAMES: RenameTable = LIST_RENAMES;

    fn to_params(&self) -> Params {
        let mut params = self.extra.clone();
        params.insert_opt("domain", self.domain.as_ref());
        params.insert_opt("regex", self.regex.as_ref());
        params.insert_opt("near_quota_only", self.near_quota_only);
        params.insert_opt("skip_validation", self.skip_validation);
        params
    }
}

/// Options for `addpop`, `passwdpop`, `editquota` and `delpop`. Each call
/// uses the subset it understands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailboxOptions {
    pub domain: Option<String>,
    /// Local part of the address.
    pub email: Option<String>,
    pub password: Option<String>,
    /// Megabytes; `0` is unlimited.
    pub quota: Option<u32>,
    pub extra: Params,
}

impl WireOptions for MailboxOptions {
    const RENAMES: RenameTable = &[];

    fn to_params(&self) -> Params {
        let mut params = self.extra.clone();
        params.insert_opt("domain", self.domain.as_ref());
        params.insert_opt("email", self.email.as_ref());
        params.insert_opt("password", self.password.as_ref());
        params.insert_opt("quota", self.quota);
        params
    }
}

#[derive(Debug, Clone)]
pub struct Email {
    scope: AccountScope,
}

impl Email {
    pub fn new(server: Server, api_username: impl Into<String>) -> Self {
        Self {
            scope: AccountScope::new(server, api_username.into(), MODULE),
        }
    }

    /// Mailboxes with their disk usage.
    pub async fn list_accounts(&self, options: &ListAccountsOptions) -> Result<ApiResponse> {
        self.scope
            .perform("listpopswithdisk", options.to_wire())
            .await
    }

    pub async fn add_account(&self, options: &MailboxOptions) -> Result<ApiResponse> {
        self.scope.perform("addpop", options.to_wire()).await
    }

    pub async fn change_password(&self, options: &MailboxOptions) -> Result<ApiResponse> {
        self.scope.perform("passwdpop", options.to_wire()).await
    }

    pub async fn change_quota(&self, options: &MailboxOptions) -> Result<ApiResponse> {
        self.scope.perform("editquota", options.to_wire()).await
    }

    pub async fn remove_account(&self, options: &MailboxOptions) -> Result<ApiResponse> {
        self.scope.perform("delpop", options.to_wire()).await
    }
}
