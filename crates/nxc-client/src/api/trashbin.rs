//! Trash bin of the session user.

use std::any::Any;
use std::sync::Arc;

use nxc_core::constants::TRASHBIN_DAV_URL;
use nxc_dav::catalog;
use nxc_dav::dav::build::{PropfindOptions, build_propfind_body};
use nxc_dav::dav::core::{Entity, FieldSelection};

use super::{bound, field_selection, remote_path, unknown_operation, user_path};
use crate::capability::{
    CapabilityDecl, CapabilityModule, EntityList, ObjectDecorator, OperationArgs, Outcome,
    Provider, WEBDAV_API,
};
use crate::error::ClientResult;
use crate::requester::Requester;
use crate::response::Response;

pub static TRASHBIN: CapabilityDecl = WEBDAV_API.with_url("WebDavTrash", TRASHBIN_DAV_URL);

pub static TRASHBIN_MODULE: CapabilityModule = CapabilityModule::new(&TRASHBIN, OPERATIONS, WebDavTrash::provider);

const TRASH: &str = "trash";
const RESTORE: &str = "restore";

const OPERATIONS: &[&str] = &[
    "list_trashbin_files",
    "delete_trashbin_file",
    "restore_trashbin_file",
    "empty_trashbin",
];

#[derive(Debug, Clone)]
pub struct WebDavTrash {
    requester: Arc<Requester>,
}

impl WebDavTrash {
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

    /// Lists the trash bin. The first entry is the trash bin itself.
    ///
    /// ## Errors
    /// Returns a transport error, or a parse error for a malformed
    /// multistatus body.
    pub fn list_trashbin_files(&self, all_properties: bool, fields: FieldSelection) -> ClientResult<EntityList> {
        let catalog = catalog();
        let propfind = PropfindOptions {
            use_all_schema_fields: all_properties,
            fields,
            ..PropfindOptions::default()
        };
        let body = build_propfind_body(catalog.namespaces(), Some(catalog.trash_file()), &propfind)?;
        let response = self.requester.propfind(&self.path(TRASH), Some(body), None)?;
        ObjectDecorator::new(catalog.trash_file()).list(response, Some(self.requester.origin()))
    }

    /// Deletes an entry for good. `path` is relative to the user's trash
    /// root, as in `trash/report.pdf.d1658293943`.
    ///
    /// ## Errors
    /// Returns a transport error.
    pub fn delete_trashbin_file(&self, path: &str) -> ClientResult<Response> {
        self.requester.delete(&self.path(path))
    }

    /// Moves an entry back to its original location.
    ///
    /// ## Errors
    /// Returns a transport error.
    pub fn restore_trashbin_file(&self, path: &str) -> ClientResult<Response> {
        self.requester
            .move_to(&self.path(path), &self.path(RESTORE), false)
    }

    /// ## Errors
    /// Returns a transport error.
    pub fn empty_trashbin(&self) -> ClientResult<Response> {
        self.requester.delete(&self.path(TRASH))
    }
}

impl Provider for WebDavTrash {
    fn call(&self, operation: &str, args: &OperationArgs) -> ClientResult<Outcome> {
        let outcome = match operation {
            "list_trashbin_files" => {
                let fields = match args.opt_str_list("fields")? {
                    Some(names) => field_selection(catalog().trash_file(), &names)?,
                    None => FieldSelection::new(),
                };
                self.list_trashbin_files(args.bool_or("all_properties", false)?, fields)?
                    .into()
            }
            "delete_trashbin_file" => self.delete_trashbin_file(args.str("path")?)?.into(),
            "restore_trashbin_file" => self.restore_trashbin_file(args.str("path")?)?.into(),
            "empty_trashbin" => self.empty_trashbin()?.into(),
            other => return Err(unknown_operation(&self.requester, other)),
        };
        Ok(outcome)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Trash bin entry view over a decoded entity.
#[derive(Debug, Clone, Copy)]
pub struct TrashFile<'a> {
    entity: &'a Entity,
}

impl<'a> TrashFile<'a> {
    #[must_use]
    pub fn new(entity: &'a Entity) -> Self {
        Self { entity }
    }

    #[must_use]
    pub fn entity(&self) -> &'a Entity {
        self.entity
    }

    #[must_use]
    pub fn original_location(&self) -> Option<&'a str> {
        self.entity.get_str("trashbin_original_location")
    }

    fn trash(&self) -> ClientResult<(WebDavTrash, String)> {
        let requester = bound(self.entity, &TRASHBIN)?;
        let path = remote_path(self.entity, &requester)?;
        Ok((WebDavTrash::new(requester), path))
    }

    /// Restores the entry. Returns whether the server accepted it.
    ///
    /// ## Errors
    /// Returns `ClientError::Detached` if the session is gone, or the error
    /// of the underlying request.
    pub fn restore(&self) -> ClientResult<bool> {
        let (trash, path) = self.trash()?;
        Ok(trash.restore_trashbin_file(&path)?.is_ok())
    }

    /// Deletes the entry for good. Returns whether the server accepted it.
    ///
    /// ## Errors
    /// Returns `ClientError::Detached` if the session is gone, or the error
    /// of the underlying request.
    pub fn delete(&self) -> ClientResult<bool> {
        let (trash, path) = self.trash()?;
        Ok(trash.delete_trashbin_file(&path)?.is_ok())
    }
}
