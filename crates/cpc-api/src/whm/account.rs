//! Hosting account lifecycle: create, list, suspend, remove.

use cpc_error::Result;

use crate::params::{Params, RenameTable, WireOptions};
use crate::response::ApiResponse;
use crate::server::{ApiCall, Server};

pub const CREATE_RENAMES: RenameTable = &[
    ("contact_email", "contactemail"),
    ("has_shell", "hasshell"),
    ("max_ftp", "maxftp"),
    ("max_sql", "maxsql"),
    ("max_pop", "maxpop"),
    ("max_lists", "maxlst"),
    ("max_subdomains", "maxsub"),
    ("max_parked", "maxpark"),
    ("max_addons", "maxaddon"),
    ("bandwidth_limit", "bwlimit"),
    ("use_registered_nameservers", "useregns"),
];

pub const USER_RENAMES: RenameTable = &[("username", "user")];

pub const REMOVE_RENAMES: RenameTable = &[("username", "user"), ("keep_dns", "keepdns")];

pub const LIST_RENAMES: RenameTable = &[("search_type", "searchtype")];

/// Options for `createacct`. `username` and `domain` are required by the
/// server; the package limits fall back to the plan's values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateAccountOptions {
    pub username: Option<String>,
    pub domain: Option<String>,
    pub plan: Option<String>,
    pub password: Option<String>,
    pub contact_email: Option<String>,
    /// Disk quota in megabytes.
    pub quota: Option<u32>,
    pub has_shell: Option<bool>,
    /// Give the account a dedicated IP.
    pub ip: Option<bool>,
    pub cgi: Option<bool>,
    pub max_ftp: Option<String>,
    pub max_sql: Option<String>,
    pub max_pop: Option<String>,
    pub max_lists: Option<String>,
    pub max_subdomains: Option<String>,
    pub max_parked: Option<String>,
    pub max_addons: Option<String>,
    /// Megabytes per month, or `unlimited`.
    pub bandwidth_limit: Option<String>,
    pub use_registered_nameservers: Option<bool>,
    pub reseller: Option<bool>,
    pub extra: Params,
}

impl WireOptions for CreateAccountOptions {
    const RENAMES: RenameTable = CREATE_RENAMES;

    fn to_params(&self) -> Params {
        let mut params = self.extra.clone();
        params.insert_opt("username", self.username.as_ref());
        params.insert_opt("domain", self.domain.as_ref());
        params.insert_opt("plan", self.plan.as_ref());
        params.insert_opt("password", self.password.as_ref());
        params.insert_opt("contact_email", self.contact_email.as_ref());
        params.insert_opt("quota", self.quota);
        params.insert_opt("has_shell", self.has_shell);
        params.insert_opt("ip", self.ip.map(|dedicated| if dedicated { "y" } else { "n" }));
        params.insert_opt("cgi", self.cgi);
        params.insert_opt("max_ftp", self.max_ftp.as_ref());
        params.insert_opt("max_sql", self.max_sql.as_ref());
        params.insert_opt("max_pop", self.max_pop.as_ref());
        params.insert_opt("max_lists", self.max_lists.as_ref());
        params.insert_opt("max_subdomains", self.max_subdomains.as_ref());
        params.insert_opt("max_parked", self.max_parked.as_ref());
        params.insert_opt("max_addons", self.max_addons.as_ref());
        params.insert_opt("bandwidth_limit", self.bandwidth_limit.as_ref());
        params.insert_opt("use_registered_nameservers", self.use_registered_nameservers);
        params.insert_opt("reseller", self.reseller);
        params
    }
}

/// Options for calls that only name the account, plus an optional
/// suspension reason or new password.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountOptions {
    pub username: Option<String>,
    pub reason: Option<String>,
    pub password: Option<String>,
    pub extra: Params,
}

impl WireOptions for AccountOptions {
    const RENAMES: RenameTable = USER_RENAMES;

    fn to_params(&self) -> Params {
        let mut params = self.extra.clone();
        params.insert_opt("username", self.username.as_ref());
        params.insert_opt("reason", self.reason.as_ref());
        params.insert_opt("password", self.password.as_ref());
        params
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveAccountOptions {
    pub username: Option<String>,
    /// Leave the DNS zone in place.
    pub keep_dns: Option<bool>,
    pub extra: Params,
}

impl WireOptions for RemoveAccountOptions {
    const RENAMES: RenameTable = REMOVE_RENAMES;

    fn to_params(&self) -> Params {
        let mut params = self.extra.clone();
        params.insert_opt("username", self.username.as_ref());
        params.insert_opt("keep_dns", self.keep_dns);
        params
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListAccountsOptions {
    pub search: Option<String>,
    /// `domain`, `owner`, `user`, `ip` or `package`.
    pub search_type: Option<String>,
    pub extra: Params,
}

impl WireOptions for ListAccountsOptions {
    const RENAMES: RenameTable = LIST_RENAMES;

    fn to_params(&self) -> Params {
        let mut params = self.extra.clone();
        params.insert_opt("search", self.search.as_ref());
        params.insert_opt("search_type", self.search_type.as_ref());
        params
    }
}

#[derive(Debug, Clone)]
pub struct Account {
    server: Server,
}

impl Account {
    pub fn new(server: Server) -> Self {
        Self { server }
    }

    async fn perform(&self, function: &str, params: Params) -> Result<ApiResponse> {
        self.server.perform_request(ApiCall::whm(function, params)).await
    }

    pub async fn create(&self, options: &CreateAccountOptions) -> Result<ApiResponse> {
        self.perform("createacct", options.to_wire()).await
    }

    /// Terminates the account and deletes its files.
    pub async fn remove(&self, options: &RemoveAccountOptions) -> Result<ApiResponse> {
        self.perform("removeacct", options.to_wire()).await
    }

    pub async fn list(&self, options: &ListAccountsOptions) -> Result<ApiResponse> {
        self.perform("listaccts", options.to_wire()).await
    }

    pub async fn summary(&self, options: &AccountOptions) -> Result<ApiResponse> {
        self.perform("accountsummary", options.to_wire()).await
    }

    pub async fn suspend(&self, options: &AccountOptions) -> Result<ApiResponse> {
        self.perform("suspendacct", options.to_wire()).await
    }

    pub async fn unsuspend(&self, options: &AccountOptions) -> Result<ApiResponse> {
        self.perform("unsuspendacct", options.to_wire()).await
    }

    pub async fn change_password(&self, options: &AccountOptions) -> Result<ApiResponse> {
        self.perform("passwd", options.to_wire()).await
    }
}
