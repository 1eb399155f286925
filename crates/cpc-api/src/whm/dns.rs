//! DNS zones and records hosted on the server.

use cpc_error::Result;

use crate::params::{Params, RenameTable, WireOptions};
use crate::response::ApiResponse;
use crate::server::{ApiCall, Server};

pub const ZONE_RENAMES: RenameTable = &[("owner", "trueowner")];

pub const RECORD_RENAMES: RenameTable = &[
    ("domain", "zone"),
    ("record_type", "type"),
    ("text", "txtdata"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneOptions {
    pub domain: Option<String>,
    /// Address for the zone's A records; only used by `adddns`.
    pub ip: Option<String>,
    /// Account that owns the zone; only used by `adddns`.
    pub owner: Option<String>,
    pub extra: Params,
}

impl WireOptions for ZoneOptions {
    const RENAMES: RenameTable = ZONE_RENAMES;

    fn to_params(&self) -> Params {
        let mut params = self.extra.clone();
        params.insert_opt("domain", self.domain.as_ref());
        params.insert_opt("ip", self.ip.as_ref());
        params.insert_opt("owner", self.owner.as_ref());
        params
    }
}

/// Options for `addzonerecord` and `removezonerecord`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordOptions {
    /// Zone the record belongs to.
    pub domain: Option<String>,
    pub name: Option<String>,
    pub class: Option<String>,
    pub ttl: Option<u32>,
    /// `A`, `CNAME`, `MX`, `TXT`, ...
    pub record_type: Option<String>,
    pub address: Option<String>,
    pub cname: Option<String>,
    pub exchange: Option<String>,
    pub preference: Option<u32>,
    /// TXT record contents.
    pub text: Option<String>,
    /// Zone file line number; required for `removezonerecord`.
    pub line: Option<u32>,
    pub extra: Params,
}

impl WireOptions for RecordOptions {
    const RENAMES: RenameTable = RECORD_RENAMES;

    fn to_params(&self) -> Params {
        let mut params = self.extra.clone();
        params.insert_opt("domain", self.domain.as_ref());
        params.insert_opt("name", self.name.as_ref());
        params.insert_opt("class", self.class.as_ref());
        params.insert_opt("ttl", self.ttl);
        params.insert_opt("record_type", self.record_type.as_ref());
        params.insert_opt("address", self.address.as_ref());
        params.insert_opt("cname", self.cname.as_ref());
        params.insert_opt("exchange", self.exchange.as_ref());
        params.insert_opt("preference", self.preference);
        params.insert_opt("text", self.text.as_ref());
        params.insert_opt("line", self.line);
        params
    }
}

#[derive(Debug, Clone)]
pub struct Dns {
    server: Server,
}

impl Dns {
    pub fn new(server: Server) -> Self {
        Self { server }
    }

    async fn perform(&self, function: &str, params: Params) -> Result<ApiResponse> {
        self.server.perform_request(ApiCall::whm(function, params)).await
    }

    pub async fn add_zone(&self, options: &ZoneOptions) -> Result<ApiResponse> {
        self.perform("adddns", options.to_wire()).await
    }

    pub async fn remove_zone(&self, options: &ZoneOptions) -> Result<ApiResponse> {
        self.perform("killdns", options.to_wire()).await
    }

    pub async fn list_zones(&self) -> Result<ApiResponse> {
        self.perform("listzones", Params::new()).await
    }

    /// Every record in a zone, with line numbers.
    pub async fn dump_zone(&self, options: &ZoneOptions) -> Result<ApiResponse> {
        self.perform("dumpzone", options.to_wire()).await
    }

    pub async fn add_record(&self, options: &RecordOptions) -> Result<ApiResponse> {
        self.perform("addzonerecord", options.to_wire()).await
    }

    pub async fn remove_record(&self, options: &RecordOptions) -> Result<ApiResponse> {
        self.perform("removezonerecord", options.to_wire()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::params::is_well_formed;
    use crate::testing::MockTransport;
    use crate::transport::HttpResponse;
    use serde_json::json;
    use std::sync::Arc;

    fn dns(transport: Arc<MockTransport>) -> Dns {
        let config = ServerConfig::builder("panel.example.com")
            .access_hash("HASH")
            .build();
        Dns::new(Server::with_transport(config, transport).expect("server"))
    }

    fn whm_ok(data: serde_json::Value) -> HttpResponse {
        HttpResponse::new(200, json!({"metadata": {"result": 1}, "data": data}).to_string())
    }

    #[test]
    fn tables_are_well_formed() {
        assert!(is_well_formed(ZONE_RENAMES));
        assert!(is_well_formed(RECORD_RENAMES));
    }

    #[tokio::test]
    async fn zone_calls() {
        let transport = MockTransport::arc();
        transport.push_response(whm_ok(json!({})));
        transport.push_response(whm_ok(json!({"zone": [{"domain": "example.com"}]})));
        transport.push_response(whm_ok(json!({"zone": [{"record": []}]})));
        transport.push_response(whm_ok(json!({})));
        let dns = dns(transport.clone());
        let zone = ZoneOptions {
            domain: Some("example.com".to_string()),
            ip: Some("192.0.2.10".to_string()),
            owner: Some("bob".to_string()),
            ..Default::default()
        };

        dns.add_zone(&zone).await.expect("adddns");
        let request = transport.last_request().expect("adddns sent");
        assert!(request.url.ends_with("/json-api/adddns"));
        assert_eq!(request.param("trueowner"), Some("bob"));
        assert_eq!(request.param("owner"), None);
        assert_eq!(request.param("ip"), Some("192.0.2.10"));

        let zones = dns.list_zones().await.expect("listzones");
        assert_eq!(zones.get("zone")[0]["domain"], "example.com");

        dns.dump_zone(&ZoneOptions {
            domain: Some("example.com".to_string()),
            ..Default::default()
        })
        .await
        .expect("dumpzone");
        assert!(transport
            .last_request()
            .expect("dumpzone sent")
            .url
            .ends_with("/json-api/dumpzone"));

        dns.remove_zone(&zone).await.expect("killdns");
        assert!(transport
            .last_request()
            .expect("killdns sent")
            .url
            .ends_with("/json-api/killdns"));
    }

    #[tokio::test]
    async fn record_calls_rename_zone_and_type() {
        let transport = MockTransport::arc();
        transport.push_response(whm_ok(json!({})));
        transport.push_response(whm_ok(json!({})));
        let dns = dns(transport.clone());

        dns.add_record(&RecordOptions {
            domain: Some("example.com".to_string()),
            name: Some("_dmarc".to_string()),
            record_type: Some("TXT".to_string()),
            text: Some("v=DMARC1; p=none".to_string()),
            ttl: Some(3600),
            ..Default::default()
        })
        .await
        .expect("addzonerecord");
        let request = transport.last_request().expect("addzonerecord sent");
        assert_eq!(request.param("zone"), Some("example.com"));
        assert_eq!(request.param("type"), Some("TXT"));
        assert_eq!(request.param("txtdata"), Some("v=DMARC1; p=none"));
        assert_eq!(request.param("ttl"), Some("3600"));
        assert_eq!(request.param("domain"), None);

        dns.remove_record(&RecordOptions {
            domain: Some("example.com".to_string()),
            line: Some(14),
            ..Default::default()
        })
        .await
        .expect("removezonerecord");
        let request = transport.last_request().expect("removezonerecord sent");
        assert!(request.url.ends_with("/json-api/removezonerecord"));
        assert_eq!(request.param("line"), Some("14"));
    }

    #[tokio::test]
    async fn whostmgr_server_rejects_zone_listing() {
        let transport = MockTransport::arc();
        let config = ServerConfig::builder("panel.example.com")
            .access_hash("HASH")
            .whostmgr(true)
            .build();
        let dns = Dns::new(Server::with_transport(config, transport.clone()).expect("server"));

        let err = dns.list_zones().await.expect_err("listzones on whostmgr server");
        assert!(err.is_configuration());
        assert_eq!(transport.request_count(), 0);
    }
}
