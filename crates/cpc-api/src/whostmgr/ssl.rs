//! SSL host management.

use cpc_error::Result;

use crate::params::{Params, RenameTable, WireOptions};
use crate::response::ApiResponse;
use crate::server::{ApiCall, Server};

pub const REMOVE_RENAMES: RenameTable = &[("domain", "host")];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveSslOptions {
    /// Domain whose SSL host is deleted.
    pub domain: Option<String>,
    pub extra: Params,
}

impl WireOptions for RemoveSslOptions {
    const RENAMES: RenameTable = REMOVE_RENAMES;

    fn to_params(&self) -> Params {
        let mut params = self.extra.clone();
        params.insert_opt("domain", self.domain.as_ref());
        params
    }
}

#[derive(Debug, Clone)]
pub struct Ssl {
    server: Server,
}

impl Ssl {
    pub fn new(server: Server) -> Self {
        Self { server }
    }

    /// Deletes the SSL host for a domain. On success the message reads
    /// "You have successfully deleted the SSL host".
    pub async fn remove(&self, options: &RemoveSslOptions) -> Result<ApiResponse> {
        self.server
            .perform_request(ApiCall::whostmgr("realdelsslhost", options.to_wire()))
            .await
    }
}
