//! The shared request executor.
//!
//! Every service hands an [`ApiCall`] to [`Server::perform_request`]. The
//! server turns it into one HTTP request for its configured mode, sends it,
//! and normalizes the answer.

use std::fmt;
use std::sync::Arc;

use cpc_error::{PanelError, Result};
use tracing::{debug, warn};

use crate::config::{ApiMode, ServerConfig};
use crate::params::Params;
use crate::response::{self, ApiResponse};
use crate::transport::{HttpMethod, HttpRequest, ReqwestTransport, Transport};

pub const CPANEL_API_VERSION: &str = "2";
pub const WHM_API_VERSION: &str = "1";

/// Where a call is dispatched on the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Namespace {
    /// Host-level function, called directly.
    Whm,
    /// Account-level API2 function, wrapped through the `cpanel` function and
    /// run as `user`.
    Cpanel { module: String, user: String },
    /// Host-manager page under `/scripts2/`, only served in whostmgr mode.
    Whostmgr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCall {
    pub function: String,
    pub namespace: Namespace,
    /// Wire-named parameters.
    pub params: Params,
}

impl ApiCall {
    pub fn whm(function: impl Into<String>, params: Params) -> Self {
        Self {
            function: function.into(),
            namespace: Namespace::Whm,
            params,
        }
    }

    pub fn whostmgr(function: impl Into<String>, params: Params) -> Self {
        Self {
            function: function.into(),
            namespace: Namespace::Whostmgr,
            params,
        }
    }

    pub fn cpanel(
        module: impl Into<String>,
        user: impl Into<String>,
        function: impl Into<String>,
        params: Params,
    ) -> Self {
        Self {
            function: function.into(),
            namespace: Namespace::Cpanel {
                module: module.into(),
                user: user.into(),
            },
            params,
        }
    }
}

/// Connection to one WHM server. Cloning is cheap and clones share the
/// configuration and transport.
#[derive(Clone)]
pub struct Server {
    config: Arc<ServerConfig>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Server {
    /// Validates `config` and connects through a `reqwest` client built from it.
    pub fn new(config: ServerConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::from_config(&config)?;
        Ok(Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
        })
    }

    pub fn with_transport(config: ServerConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            transport,
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn mode(&self) -> ApiMode {
        self.config.mode
    }

    /// Builds the HTTP request for `call` without sending it.
    pub fn build_request(&self, call: &ApiCall) -> Result<HttpRequest> {
        let function = call.function.trim();
        if function.is_empty() {
            return Err(PanelError::configuration("function name is required"));
        }

        match (&call.namespace, self.config.mode) {
            (Namespace::Whostmgr, ApiMode::Standard) => {
                return Err(PanelError::configuration(format!(
                    "{} is a host-manager page and needs a server in whostmgr mode",
                    function
                )))
            }
            (Namespace::Whm | Namespace::Cpanel { .. }, ApiMode::Whostmgr) => {
                return Err(PanelError::configuration(format!(
                    "{} is a JSON API call and needs a server in standard mode",
                    function
                )))
            }
            _ => {}
        }

        let (path_function, mut pairs) = match &call.namespace {
            Namespace::Whm | Namespace::Whostmgr => (function.to_string(), Vec::new()),
            Namespace::Cpanel { module, user } => {
                if user.trim().is_empty() {
                    return Err(PanelError::configuration(
                        "cPanel account user is required for account-level calls",
                    ));
                }
                if module.trim().is_empty() {
                    return Err(PanelError::configuration("cPanel module is required"));
                }
                (
                    "cpanel".to_string(),
                    vec![
                        ("cpanel_jsonapi_user".to_string(), user.clone()),
                        ("cpanel_jsonapi_module".to_string(), module.clone()),
                        ("cpanel_jsonapi_func".to_string(), function.to_string()),
                        (
                            "cpanel_jsonapi_apiversion".to_string(),
                            CPANEL_API_VERSION.to_string(),
                        ),
                    ],
                )
            }
        };
        pairs.extend(call.params.to_pairs());

        let headers = self
            .config
            .auth_header()
            .map(|value| vec![("Authorization".to_string(), value)])
            .unwrap_or_default();

        let request = match call.namespace {
            Namespace::Whm | Namespace::Cpanel { .. } => {
                if call.namespace == Namespace::Whm {
                    pairs.insert(0, ("api.version".to_string(), WHM_API_VERSION.to_string()));
                }
                HttpRequest {
                    method: HttpMethod::Get,
                    url: format!("{}/json-api/{}", self.config.base_url(), path_function),
                    headers,
                    query: pairs,
                    form: Vec::new(),
                }
            }
            Namespace::Whostmgr => HttpRequest {
                method: HttpMethod::Post,
                url: format!("{}/scripts2/{}", self.config.base_url(), path_function),
                headers,
                query: Vec::new(),
                form: pairs,
            },
        };

        Ok(request)
    }

    /// Sends `call` and returns the normalized response. One request, no retry.
    pub async fn perform_request(&self, call: ApiCall) -> Result<ApiResponse> {
        let request = self.build_request(&call)?;
        let module = match &call.namespace {
            Namespace::Whm | Namespace::Whostmgr => None,
            Namespace::Cpanel { module, .. } => Some(module.as_str()),
        };
        debug!(
            function = %call.function,
            module = ?module,
            mode = %self.config.mode,
            host = %self.config.host,
            "dispatching panel API call"
        );

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(function = %call.function, error = %e, "panel API call failed to complete");
                return Err(e);
            }
        };

        let result = match call.namespace {
            Namespace::Whostmgr => response::from_whostmgr(&call.function, &response),
            Namespace::Whm | Namespace::Cpanel { .. } => {
                response::from_json(&call.function, &response)
            }
        };

        if let Err(e) = &result {
            warn!(function = %call.function, status = response.status, error = %e, "panel rejected API call");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use crate::transport::HttpResponse;
    use cpc_error::TransportErrorKind;
    use serde_json::json;

    fn config() -> ServerConfig {
        ServerConfig::builder("panel.example.com")
            .access_hash("HASH")
            .build()
    }

    #[test]
    fn standard_whm_request_shape() {
        let server = Server::with_transport(config(), MockTransport::arc()).expect("server");
        let call = ApiCall::whm("listaccts", Params::new().with("searchtype", "user"));
        let request = server.build_request(&call).expect("request");

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.url, "https://panel.example.com:2087/json-api/listaccts");
        assert_eq!(request.header("authorization"), Some("WHM root:HASH"));
        assert_eq!(request.query[0], ("api.version".to_string(), "1".to_string()));
        assert_eq!(request.param("searchtype"), Some("user"));
        assert!(request.form.is_empty());
    }

    #[test]
    fn standard_cpanel_request_is_wrapped() {
        let server = Server::with_transport(config(), MockTransport::arc()).expect("server");
        let call = ApiCall::cpanel("Fileman", "bob", "viewfile", Params::new().with("dir", "etc"));
        let request = server.build_request(&call).expect("request");

        assert_eq!(request.url, "https://panel.example.com:2087/json-api/cpanel");
        assert_eq!(request.param("cpanel_jsonapi_user"), Some("bob"));
        assert_eq!(request.param("cpanel_jsonapi_module"), Some("Fileman"));
        assert_eq!(request.param("cpanel_jsonapi_func"), Some("viewfile"));
        assert_eq!(request.param("cpanel_jsonapi_apiversion"), Some("2"));
        assert_eq!(request.param("dir"), Some("etc"));
        assert_eq!(request.param("api.version"), None);
    }

    #[test]
    fn whostmgr_request_posts_form() {
        let mut config = config();
        config.mode = ApiMode::Whostmgr;
        let server = Server::with_transport(config, MockTransport::arc()).expect("server");
        let call = ApiCall::whostmgr("realdelsslhost", Params::new().with("host", "example.com"));
        let request = server.build_request(&call).expect("request");

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "https://panel.example.com:2087/scripts2/realdelsslhost");
        assert!(request.query.is_empty());
        assert_eq!(request.form, vec![("host".to_string(), "example.com".to_string())]);
    }

    #[test]
    fn namespace_must_match_server_mode() {
        let mut config = config();
        config.mode = ApiMode::Whostmgr;
        let privileged = Server::with_transport(config, MockTransport::arc()).expect("server");
        for call in [
            ApiCall::whm("listaccts", Params::new()),
            ApiCall::cpanel("Fileman", "bob", "listfiles", Params::new()),
        ] {
            let err = privileged.build_request(&call).expect_err("json api on whostmgr");
            assert!(err.is_configuration());
        }

        let standard = Server::with_transport(self::config(), MockTransport::arc()).expect("server");
        let err = standard
            .build_request(&ApiCall::whostmgr("realdelsslhost", Params::new()))
            .expect_err("page on standard server");
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn mismatched_calls_never_reach_transport() {
        let transport = MockTransport::arc();
        transport.push_response(HttpResponse::new(200, "<html><body>Permission denied</body></html>"));
        let mut config = config();
        config.mode = ApiMode::Whostmgr;
        let server = Server::with_transport(config, transport.clone()).expect("server");

        let err = server
            .perform_request(ApiCall::whm("listaccts", Params::new()))
            .await
            .expect_err("listaccts on whostmgr server");
        assert!(err.is_configuration());
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn blank_function_or_user_is_configuration_error() {
        let server = Server::with_transport(config(), MockTransport::arc()).expect("server");
        let err = server
            .build_request(&ApiCall::whm("  ", Params::new()))
            .expect_err("blank function");
        assert!(err.is_configuration());

        let err = server
            .build_request(&ApiCall::cpanel("Fileman", "", "listfiles", Params::new()))
            .expect_err("blank user");
        assert!(err.is_configuration());
    }

    #[test]
    fn missing_host_fails_before_any_request() {
        let transport = MockTransport::arc();
        let config = ServerConfig::builder("").access_hash("HASH").build();
        let err = Server::with_transport(config, transport.clone()).expect_err("missing host");
        assert!(err.is_configuration());
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn perform_request_normalizes_success() {
        let transport = MockTransport::arc();
        transport.push_response(HttpResponse::new(
            200,
            json!({"metadata": {"result": 1, "reason": "OK"}, "data": {"zone": []}}).to_string(),
        ));
        let server = Server::with_transport(config(), transport.clone()).expect("server");

        let response = server
            .perform_request(ApiCall::whm("listzones", Params::new()))
            .await
            .expect("listzones");
        assert!(response.status);
        assert_eq!(response.message, "OK");
        assert_eq!(response.data, json!({"zone": []}));
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn transport_failure_is_not_remote() {
        let transport = MockTransport::arc();
        transport.push_error(PanelError::transport(
            TransportErrorKind::Connect,
            "connection refused",
        ));
        let server = Server::with_transport(config(), transport).expect("server");

        let err = server
            .perform_request(ApiCall::whm("listzones", Params::new()))
            .await
            .expect_err("transport failure");
        assert!(err.is_transport());
        assert!(!err.is_remote());
    }

    #[tokio::test]
    async fn clones_share_one_transport() {
        let transport = MockTransport::arc();
        for _ in 0..2 {
            transport.push_response(HttpResponse::new(
                200,
                json!({"metadata": {"result": 1}}).to_string(),
            ));
        }
        let server = Server::with_transport(config(), transport.clone()).expect("server");
        let copy = server.clone();

        let (a, b) = tokio::join!(
            server.perform_request(ApiCall::whm("version", Params::new())),
            copy.perform_request(ApiCall::whm("version", Params::new())),
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(transport.request_count(), 2);
    }
}
