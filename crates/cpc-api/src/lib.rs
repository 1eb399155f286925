//! Client for the cPanel/WHM administrative API.
//!
//! A [`Server`] holds one validated [`ServerConfig`] and a [`Transport`].
//! Services are thin: each method renames its typed options into wire
//! parameters and hands an [`ApiCall`] to the server.
//!
//! ```no_run
//! use cpc_api::cpanel::file_manager::{FileManager, FileOperationOptions};
//! use cpc_api::{Server, ServerConfig};
//!
//! # async fn run() -> cpc_api::Result<()> {
//! let config = ServerConfig::builder("203.0.113.10").access_hash("HASH").build();
//! let files = FileManager::new(Server::new(config)?, "bob");
//! let response = files
//!     .operate(&FileOperationOptions {
//!         name: Some("copy".to_string()),
//!         source_files: Some("a.txt".to_string()),
//!         destination_files: Some("b.txt".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("{}", response.message);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod cpanel;
pub mod params;
pub mod response;
pub mod server;
pub mod transport;
pub mod whm;
pub mod whostmgr;

#[cfg(test)]
mod testing;

pub use config::{ApiMode, Credential, ServerConfig, ServerConfigBuilder};
pub use cpc_error::{PanelError, Result, TransportErrorKind};
pub use params::{ParamValue, Params, RenameTable, WireOptions};
pub use response::ApiResponse;
pub use server::{ApiCall, Namespace, Server};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport};
