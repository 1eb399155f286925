//! File functions of the `Fileman` module: listing directories, viewing
//! files, disk usage and bulk file operations.

use cpc_error::Result;

use super::AccountScope;
use crate::params::{Params, RenameTable, WireOptions};
use crate::response::ApiResponse;
use crate::server::{ApiCall, Server};

pub const MODULE: &str = "Fileman";

pub const LIST_RENAMES: RenameTable = &[
    ("directory", "dir"),
    ("list", "filelist"),
    ("path", "filepath"),
    ("need_mime", "needmime"),
    ("check_leaf", "checkleaf"),
    ("show_dot_files", "showdotfiles"),
];

pub const DIRECTORY_RENAMES: RenameTable = &[("directory", "dir")];

pub const OPERATE_RENAMES: RenameTable = &[
    ("name", "op"),
    ("decode_uri", "doubledecode"),
    ("source_files", "sourcefiles"),
    ("destination_files", "destfiles"),
];

/// Options for `listfiles`. Every field defaults to unset, which lists the
/// home directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilesOptions {
    /// Directory to browse; `/` is the home directory.
    pub directory: Option<String>,
    /// Only list the files named by `filepath-*` keys.
    pub list: Option<bool>,
    pub path: Option<String>,
    /// Add `mimename` and `mimetype` to each entry.
    pub need_mime: Option<bool>,
    /// Add `isleaf` to directories without subdirectories.
    pub check_leaf: Option<bool>,
    pub show_dot_files: Option<bool>,
    /// Pipe-separated filter of `dir`, `file` and `special`.
    pub types: Option<String>,
    /// Passed through unchanged, e.g. `filepath-A`.
    pub extra: Params,
}

impl WireOptions for ListFilesOptions {
    const RENAMES: RenameTable = LIST_RENAMES;

    fn to_params(&self) -> Params {
        let mut params = self.extra.clone();
        params.insert_opt("directory", self.directory.as_ref());
        params.insert_opt("list", self.list);
        params.insert_opt("path", self.path.as_ref());
        params.insert_opt("need_mime", self.need_mime);
        params.insert_opt("check_leaf", self.check_leaf);
        params.insert_opt("show_dot_files", self.show_dot_files);
        params.insert_opt("types", self.types.as_ref());
        params
    }
}

/// Options for `viewfile`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowFileOptions {
    /// Relative to the home directory, e.g. `public_html/files/`.
    pub directory: Option<String>,
    pub file: Option<String>,
    pub extra: Params,
}

impl WireOptions for ShowFileOptions {
    const RENAMES: RenameTable = DIRECTORY_RENAMES;

    fn to_params(&self) -> Params {
        let mut params = self.extra.clone();
        params.insert_opt("directory", self.directory.as_ref());
        params.insert_opt("file", self.file.as_ref());
        params
    }
}

/// Options for `statfiles`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatFilesOptions {
    pub directory: Option<String>,
    /// Pipe-separated, e.g. `file1|file2`.
    pub file: Option<String>,
    pub extra: Params,
}

impl WireOptions for StatFilesOptions {
    const RENAMES: RenameTable = DIRECTORY_RENAMES;

    fn to_params(&self) -> Params {
        let mut params = self.extra.clone();
        params.insert_opt("directory", self.directory.as_ref());
        params.insert_opt("file", self.file.as_ref());
        params
    }
}

/// Options for `fileop`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileOperationOptions {
    /// `copy`, `move`, `rename`, `chmod`, `extract`, `compress`, `link`,
    /// `unlink` or `trash`.
    pub name: Option<String>,
    /// Comma-separated, no spaces.
    pub source_files: Option<String>,
    /// Matched 1-to-1 with `source_files`; a single source goes to the first
    /// destination.
    pub destination_files: Option<String>,
    /// URI-decode the file lists before use.
    pub decode_uri: Option<bool>,
    /// Archive type for `compress`, octal mode for `chmod`.
    pub metadata: Option<String>,
    pub extra: Params,
}

impl WireOptions for FileOperationOptions {
    const RENAMES: RenameTable = OPERATE_RENAMES;

    fn to_params(&self) -> Params {
        let mut params = self.extra.clone();
        params.insert_opt("name", self.name.as_ref());
        params.insert_opt("source_files", self.source_files.as_ref());
        params.insert_opt("destination_files", self.destination_files.as_ref());
        params.insert_opt("decode_uri", self.decode_uri);
        params.insert_opt("metadata", self.metadata.as_ref());
        params
    }
}

#[derive(Debug, Clone)]
pub struct FileManager {
    scope: AccountScope,
}

impl FileManager {
    pub fn new(server: Server, api_username: impl Into<String>) -> Self {
        Self {
            scope: AccountScope::new(server, api_username.into(), MODULE),
        }
    }

    /// The call `operate` would send, without sending it.
    pub fn operate_call(&self, options: &FileOperationOptions) -> ApiCall {
        self.scope.call("fileop", options.to_wire())
    }

    /// List files and their attributes in a directory.
    pub async fn list(&self, options: &ListFilesOptions) -> Result<ApiResponse> {
        self.scope.perform("listfiles", options.to_wire()).await
    }

    /// View a file, including extras such as tarball contents.
    pub async fn show(&self, options: &ShowFileOptions) -> Result<ApiResponse> {
        self.scope.perform("viewfile", options.to_wire()).await
    }

    pub async fn stat(&self, options: &StatFilesOptions) -> Result<ApiResponse> {
        self.scope.perform("statfiles", options.to_wire()).await
    }

    /// Disk usage statistics for the account.
    pub async fn disk_usage(&self) -> Result<ApiResponse> {
        self.scope.perform("getdiskinfo", Params::new()).await
    }

    /// Copy, move, rename, chmod, extract, compress, link, unlink or trash
    /// files.
    pub async fn operate(&self, options: &FileOperationOptions) -> Result<ApiResponse> {
        self.scope
            .server
            .perform_request(self.operate_call(options))
            .await
    }
}
