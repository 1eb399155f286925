//! Account-level cPanel services.
//!
//! These run API2 functions as a specific cPanel user, through the server's
//! `cpanel` wrapper function.

pub mod email;
pub mod file_manager;

pub use email::Email;
pub use file_manager::FileManager;

use cpc_error::Result;

use crate::params::Params;
use crate::response::ApiResponse;
use crate::server::{ApiCall, Server};

/// Server handle plus the account the calls run as.
#[derive(Debug, Clone)]
pub(crate) struct AccountScope {
    server: Server,
    api_username: String,
    module: &'static str,
}

impl AccountScope {
    pub(crate) fn new(server: Server, api_username: String, module: &'static str) -> Self {
        Self {
            server,
            api_username,
            module,
        }
    }

    pub(crate) fn call(&self, function: &str, params: Params) -> ApiCall {
        ApiCall::cpanel(self.module, self.api_username.as_str(), function, params)
    }

    pub(crate) async fn perform(&self, function: &str, params: Params) -> Result<ApiResponse> {
        self.server.perform_request(self.call(function, params)).await
    }
}
