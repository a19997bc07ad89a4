//! User files over `WebDAV`.

use std::any::Any;
use std::sync::Arc;

use nxc_core::constants::FILES_DAV_URL;
use nxc_dav::catalog;
use nxc_dav::dav::build::{PropfindOptions, build_propfind_body, build_propupdate_body};
use nxc_dav::dav::core::{Entity, FieldSelection, PropertyValues, QName};
use nxc_dav::dav::parse::first_property_text;
use nxc_dav::dav::parse::value::rfc1123_to_epoch;
use nxc_dav::schemas::COLLECTION;

use super::systemtags::{FileRef, SYSTEMTAGS_RELATION, SystemTagsRelation, TagRef};
use super::{bound, field_selection, property_values, remote_path, unknown_operation, user_path};
use crate::capability::{
    CapabilityDecl, CapabilityModule, EntityList, ObjectDecorator, OperationArgs, Outcome,
    Provider, WEBDAV_API,
};
use crate::error::{ClientError, ClientResult};
use crate::requester::{Depth, Requester};
use crate::response::{DataResponse, Response};

pub static WEBDAV: CapabilityDecl = WEBDAV_API.with_url("WebDav", FILES_DAV_URL);

pub static WEBDAV_MODULE: CapabilityModule = CapabilityModule::new(&WEBDAV, OPERATIONS, WebDav::provider);

const OPERATIONS: &[&str] = &[
    "list_folders",
    "download_file",
    "upload_file_contents",
    "create_folder",
    "assure_folder_exists",
    "assure_tree_exists",
    "delete_path",
    "move_path",
    "copy_path",
    "set_favorites",
    "list_favorites",
    "get_file_property",
    "fetch_files_with_filter",
];

/// Options of [`WebDav::list_folders`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub depth: Depth,
    /// Request every file property.
    pub all_properties: bool,
    /// Request these properties. Without fields or `all_properties` the
    /// request has no body and the server picks the properties.
    pub fields: FieldSelection,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            depth: Depth::One,
            all_properties: false,
            fields: FieldSelection::new(),
        }
    }
}

/// Contents of a downloaded file.
#[derive(Debug)]
pub struct Download {
    response: Response,
    last_modified: Option<i64>,
}

impl Download {
    #[must_use]
    pub fn response(&self) -> &Response {
        &self.response
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.response.raw_body()
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.response.into_body()
    }

    /// Modification time reported by the server, in epoch seconds.
    #[must_use]
    pub fn last_modified(&self) -> Option<i64> {
        self.last_modified
    }
}

/// Files and folders of the session user.
///
/// Paths are relative to the user's root.
#[derive(Debug, Clone)]
pub struct WebDav {
    requester: Arc<Requester>,
}

impl WebDav {
    #[must_use]
    pub fn new(requester: Arc<Requester>) -> Self {
        Self { requester }
    }

    fn provider(requester: Arc<Requester>) -> Box<dyn Provider> {
        Box::new(Self::new(requester))
    }

    fn path(&self, path: &str) -> String {
        user_path(self.requester.user(), path)
    }

    fn files(&self, response: Response) -> ClientResult<EntityList> {
        ObjectDecorator::new(catalog().file()).list(response, Some(self.requester.origin()))
    }

    /// Lists `path` and, depending on the depth, its content.
    ///
    /// ## Errors
    /// Returns a transport error, or a parse error for a malformed
    /// multistatus body.
    pub fn list_folders(&self, path: &str, options: &ListOptions) -> ClientResult<EntityList> {
        let catalog = catalog();
        let body = if options.all_properties || !options.fields.is_empty() {
            let propfind = PropfindOptions {
                use_all_schema_fields: options.all_properties,
                fields: options.fields.clone(),
                ..PropfindOptions::default()
            };
            Some(build_propfind_body(catalog.namespaces(), Some(catalog.file()), &propfind)?)
        } else {
            None
        };
        let response = self
            .requester
            .propfind(&self.path(path), body, Some(options.depth))?;
        self.files(response)
    }

    /// Downloads a file.
    ///
    /// ## Errors
    /// Returns `ClientError::InvalidArgument` if `path` does not exist or is
    /// a folder, or a transport error.
    pub fn download_file(&self, path: &str) -> ClientResult<Download> {
        let listing = self.list_folders(
            path,
            &ListOptions {
                depth: Depth::Zero,
                ..ListOptions::default()
            },
        )?;
        let file = listing
            .items()
            .first()
            .ok_or_else(|| ClientError::InvalidArgument(format!("{path} does not exist")))?;
        if File::new(file).is_dir() {
            return Err(ClientError::InvalidArgument(format!(
                "{path} is a collection, please specify a file path"
            )));
        }
        let last_modified = File::new(file).last_modified_epoch();
        let response = self.requester.download(&self.path(path))?;
        Ok(Download {
            response,
            last_modified,
        })
    }

    /// Uploads `contents` to `remote_path`, optionally setting its
    /// modification time.
    ///
    /// ## Errors
    /// Returns a transport error.
    pub fn upload_file_contents(
        &self,
        contents: Vec<u8>,
        remote_path: &str,
        timestamp: Option<i64>,
    ) -> ClientResult<Response> {
        self.requester
            .put_with_timestamp(&self.path(remote_path), Some(contents), timestamp)
    }

    /// ## Errors
    /// Returns a transport error.
    pub fn create_folder(&self, folder_path: &str) -> ClientResult<Response> {
        self.requester.make_collection(&self.path(folder_path))
    }

    /// Creates the folder unless it exists. A failed creation of an
    /// existing folder is not an error.
    ///
    /// ## Errors
    /// Returns a transport error.
    pub fn assure_folder_exists(&self, folder_path: &str) -> ClientResult<bool> {
        let response = self.create_folder(folder_path)?;
        tracing::debug!(folder_path, created = response.is_ok(), "Folder assured");
        Ok(true)
    }

    /// Creates every folder of `tree_path`, outermost first.
    ///
    /// ## Errors
    /// Returns a transport error.
    pub fn assure_tree_exists(&self, tree_path: &str) -> ClientResult<bool> {
        let mut assured = true;
        for folder in cumulative_paths(tree_path) {
            assured = self.assure_folder_exists(&folder)?;
        }
        Ok(assured)
    }

    /// Deletes a file or a folder with its content.
    ///
    /// ## Errors
    /// Returns a transport error.
    pub fn delete_path(&self, path: &str) -> ClientResult<Response> {
        self.requester.delete(&self.path(path))
    }

    /// ## Errors
    /// Returns a transport error.
    pub fn move_path(&self, path: &str, destination: &str, overwrite: bool) -> ClientResult<Response> {
        self.requester
            .move_to(&self.path(path), &self.path(destination), overwrite)
    }

    /// ## Errors
    /// Returns a transport error.
    pub fn copy_path(&self, path: &str, destination: &str, overwrite: bool) -> ClientResult<Response> {
        self.requester
            .copy_to(&self.path(path), &self.path(destination), overwrite)
    }

    /// Marks a file or folder as favorite.
    ///
    /// ## Errors
    /// Returns a transport error.
    pub fn set_favorites(&self, path: &str) -> ClientResult<Response> {
        let values = PropertyValues::new().with("oc", "favorite", 1);
        let body = build_propupdate_body(catalog().namespaces(), &values)?;
        self.requester.proppatch(&self.path(path), body)
    }

    /// Lists favorites below `path`. The report carries only the filter
    /// rule and leaves the returned properties to the server.
    ///
    /// ## Errors
    /// Returns a transport error, or a parse error for a malformed
    /// multistatus body.
    pub fn list_favorites(&self, path: &str) -> ClientResult<EntityList> {
        let options = PropfindOptions {
            use_all_schema_fields: false,
            ..PropfindOptions::filter(PropertyValues::new().with("oc", "favorite", 1))
        };
        let body = build_propfind_body(catalog().namespaces(), None, &options)?;
        let response = self.requester.report(&self.path(path), body)?;
        self.files(response)
    }

    /// Lists files below `path` matching every rule.
    ///
    /// ## Errors
    /// Returns a transport error, or a parse error for a malformed
    /// multistatus body.
    pub fn fetch_files_with_filter(&self, path: &str, rules: PropertyValues) -> ClientResult<EntityList> {
        let catalog = catalog();
        let body = build_propfind_body(
            catalog.namespaces(),
            Some(catalog.file()),
            &PropfindOptions::filter(rules),
        )?;
        let response = self.requester.report(&self.path(path), body)?;
        self.files(response)
    }

    /// Reads one property of a file. `field` is `prefix:name` or a name in
    /// the `oc` namespace.
    ///
    /// ## Errors
    /// Returns `ClientError::InvalidArgument` for an unknown prefix, a
    /// transport error, or a parse error for a malformed body.
    pub fn get_file_property(&self, path: &str, field: &str) -> ClientResult<DataResponse<String>> {
        let (prefix, local) = field.split_once(':').unwrap_or(("oc", field));
        let namespaces = catalog().namespaces();
        let namespace = namespaces
            .namespace(prefix)
            .ok_or_else(|| ClientError::InvalidArgument(format!("unknown namespace prefix {prefix:?}")))?;
        let propfind = PropfindOptions {
            fields: FieldSelection::new().with(prefix, local),
            ..PropfindOptions::default()
        };
        let body = build_propfind_body(namespaces, None, &propfind)?;
        let response = self
            .requester
            .propfind(&self.path(path), Some(body), Some(Depth::Zero))?;
        if !response.is_ok() {
            return Ok(DataResponse::new(response, None));
        }
        let property = QName::new(namespace.clone(), local.to_owned());
        let value = first_property_text(response.raw_body(), &property)?;
        Ok(DataResponse::new(response, value))
    }
}

/// `a/b/c` → `a`, `a/b`, `a/b/c`. A leading `/` is kept.
fn cumulative_paths(tree_path: &str) -> Vec<String> {
    let mut current = if tree_path.starts_with('/') { "/".to_owned() } else { String::new() };
    let mut paths = Vec::new();
    for segment in tree_path.split('/').filter(|s| !s.is_empty() && *s != ".") {
        if !current.is_empty() && !current.ends_with('/') {
            current.push('/');
        }
        current.push_str(segment);
        paths.push(current.clone());
    }
    paths
}

fn list_options(args: &OperationArgs) -> ClientResult<ListOptions> {
    let fields = match args.opt_str_list("fields")? {
        Some(names) => field_selection(catalog().file(), &names)?,
        None => FieldSelection::new(),
    };
    let depth = match args.opt_i64("depth")? {
        Some(level) => Depth::from_level(u64::try_from(level).map_err(|err| {
            ClientError::InvalidArgument(format!("depth {level}: {err}"))
        })?),
        None => Depth::One,
    };
    Ok(ListOptions {
        depth,
        all_properties: args.bool_or("all_properties", false)?,
        fields,
    })
}

impl Provider for WebDav {
    fn call(&self, operation: &str, args: &OperationArgs) -> ClientResult<Outcome> {
        let path = || args.opt_str("path").map(Option::unwrap_or_default);
        let outcome = match operation {
            "list_folders" => self.list_folders(path()?, &list_options(args)?)?.into(),
            "download_file" => Outcome::Response(self.download_file(args.str("path")?)?.response),
            "upload_file_contents" => self
                .upload_file_contents(
                    args.bytes()?.to_vec(),
                    args.str("remote_path")?,
                    args.opt_i64("timestamp")?,
                )?
                .into(),
            "create_folder" => self.create_folder(args.str("folder_path")?)?.into(),
            "assure_folder_exists" => Outcome::Flag(self.assure_folder_exists(args.str("folder_path")?)?),
            "assure_tree_exists" => Outcome::Flag(self.assure_tree_exists(args.str("tree_path")?)?),
            "delete_path" => self.delete_path(args.str("path")?)?.into(),
            "move_path" | "copy_path" => {
                let source = args.str("path")?;
                let destination = args.str("destination_path")?;
                let overwrite = args.bool_or("overwrite", false)?;
                if operation == "move_path" {
                    self.move_path(source, destination, overwrite)?.into()
                } else {
                    self.copy_path(source, destination, overwrite)?.into()
                }
            }
            "set_favorites" => self.set_favorites(args.str("path")?)?.into(),
            "list_favorites" => self.list_favorites(path()?)?.into(),
            "get_file_property" => self
                .get_file_property(args.str("path")?, args.str("field")?)?
                .into(),
            "fetch_files_with_filter" => {
                let rules = args
                    .opt_object("filter_rules")
                    .map(property_values)
                    .transpose()?
                    .unwrap_or_default();
                self.fetch_files_with_filter(path()?, rules)?.into()
            }
            other => return Err(unknown_operation(&self.requester, other)),
        };
        Ok(outcome)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// File or folder view over a decoded entity.
#[derive(Debug, Clone, Copy)]
pub struct File<'a> {
    entity: &'a Entity,
}

impl<'a> File<'a> {
    #[must_use]
    pub fn new(entity: &'a Entity) -> Self {
        Self { entity }
    }

    #[must_use]
    pub fn entity(&self) -> &'a Entity {
        self.entity
    }

    /// True unless a resource type is set. Needs `resource_type` loaded.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.entity
            .get("resource_type")
            .is_none_or(serde_json::Value::is_null)
    }

    /// Needs `resource_type` loaded.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.entity.get_str("resource_type") == Some(COLLECTION)
    }

    #[must_use]
    pub fn last_modified_epoch(&self) -> Option<i64> {
        self.entity
            .get_str("last_modified")
            .and_then(rfc1123_to_epoch)
    }

    /// Path relative to the user's root.
    ///
    /// ## Errors
    /// Returns `ClientError::Detached` if the session is gone, or
    /// `ClientError::InvalidArgument` if the href is outside the user's
    /// files.
    pub fn remote_path(&self) -> ClientResult<String> {
        let requester = bound(self.entity, &WEBDAV)?;
        remote_path(self.entity, &requester)
    }

    fn file_ref(&self) -> ClientResult<OwnedFileRef> {
        match super::entity_id(self.entity, "file_id") {
            Some(id) => Ok(OwnedFileRef::Id(id)),
            None => self.remote_path().map(OwnedFileRef::Path),
        }
    }

    fn relations(&self) -> ClientResult<SystemTagsRelation> {
        Ok(SystemTagsRelation::new(bound(self.entity, &SYSTEMTAGS_RELATION)?))
    }

    /// Tags assigned to this file.
    ///
    /// ## Errors
    /// Returns `ClientError::Detached` if the session is gone, or the error
    /// of the underlying request.
    pub fn tags(&self) -> ClientResult<EntityList> {
        self.relations()?
            .fetch_systemtags_relation(self.file_ref()?.borrowed())
    }

    /// Assigns a tag, creating it when given by an unknown name.
    ///
    /// ## Errors
    /// Returns `ClientError::Detached` if the session is gone, or the error
    /// of the underlying request.
    pub fn add_tag(&self, tag: TagRef<'_>) -> ClientResult<bool> {
        let response = self
            .relations()?
            .add_systemtags_relation(self.file_ref()?.borrowed(), tag)?;
        Ok(response.is_ok())
    }

    /// Unassigns a tag.
    ///
    /// ## Errors
    /// Returns `ClientError::Detached` if the session is gone,
    /// `ClientError::InvalidArgument` if the tag does not exist, or the
    /// error of the underlying request.
    pub fn remove_tag(&self, tag: TagRef<'_>) -> ClientResult<bool> {
        let response = self
            .relations()?
            .remove_systemtags_relation(self.file_ref()?.borrowed(), tag)?;
        Ok(response.is_ok())
    }
}

enum OwnedFileRef {
    Id(i64),
    Path(String),
}

impl OwnedFileRef {
    fn borrowed(&self) -> FileRef<'_> {
        match self {
            Self::Id(id) => FileRef::Id(*id),
            Self::Path(path) => FileRef::Path(path),
        }
    }
}
