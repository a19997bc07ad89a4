//! Collaborative system tags and their assignment to files.

use std::any::Any;
use std::sync::Arc;

use nxc_core::constants::{SYSTEMTAGS_DAV_URL, SYSTEMTAGS_RELATIONS_DAV_URL};
use nxc_dav::catalog;
use nxc_dav::dav::build::{PropfindOptions, build_propfind_body};
use nxc_dav::dav::core::{Entity, FieldSelection, PropertyValues};
use serde_json::{Map, Value};

use super::webdav::{WEBDAV, WebDav};
use super::{bound, entity_id, unknown_operation};
use crate::capability::{
    CapabilityDecl, CapabilityModule, EntityList, EntityOne, ObjectDecorator, OperationArgs,
    Outcome, Provider, WEBDAV_API,
};
use crate::error::{ClientError, ClientResult};
use crate::requester::Requester;
use crate::response::{DataResponse, Response};

pub static SYSTEMTAGS: CapabilityDecl = WEBDAV_API.with_url("SystemTags", SYSTEMTAGS_DAV_URL);

pub static SYSTEMTAGS_RELATION: CapabilityDecl =
    WEBDAV_API.with_url("SystemTagsRelation", SYSTEMTAGS_RELATIONS_DAV_URL);

pub static SYSTEMTAGS_MODULE: CapabilityModule =
    CapabilityModule::new(&SYSTEMTAGS, TAG_OPERATIONS, SystemTags::provider);

pub static SYSTEMTAGS_RELATION_MODULE: CapabilityModule =
    CapabilityModule::new(&SYSTEMTAGS_RELATION, RELATION_OPERATIONS, SystemTagsRelation::provider);

const TAG_OPERATIONS: &[&str] = &[
    "fetch_systemtag",
    "fetch_systemtags",
    "create_systemtag",
    "delete_systemtag",
];

const RELATION_OPERATIONS: &[&str] = &[
    "fetch_systemtags_relation",
    "add_systemtags_relation",
    "remove_systemtags_relation",
];

/// A file, by id or by path below the user's root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRef<'a> {
    Id(i64),
    Path(&'a str),
}

/// A tag, by id or by display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRef<'a> {
    Id(i64),
    Name(&'a str),
}

impl<'a> FileRef<'a> {
    fn from_args(args: &'a OperationArgs) -> ClientResult<Self> {
        if let Some(id) = args.opt_i64("file_id")? {
            return Ok(Self::Id(id));
        }
        match args.opt_str("path")? {
            Some(path) if !path.is_empty() => Ok(Self::Path(path)),
            _ => Err(ClientError::InvalidArgument(
                "insufficient information about the file".to_owned(),
            )),
        }
    }
}

impl<'a> TagRef<'a> {
    fn from_args(args: &'a OperationArgs) -> ClientResult<Self> {
        if let Some(id) = args.opt_i64("tag_id")? {
            return Ok(Self::Id(id));
        }
        match args.opt_str("tag_name")? {
            Some(name) if !name.is_empty() => Ok(Self::Name(name)),
            _ => Err(ClientError::InvalidArgument(
                "insufficient information about the tag".to_owned(),
            )),
        }
    }
}

fn tag_payload(name: &str) -> Value {
    let mut overrides = Map::new();
    overrides.insert("display_name".to_owned(), Value::from(name));
    Value::Object(catalog().tag().default_values(&overrides))
}

/// Server-wide system tags.
#[derive(Debug, Clone)]
pub struct SystemTags {
    requester: Arc<Requester>,
}

impl SystemTags {
    #[must_use]
    pub fn new(requester: Arc<Requester>) -> Self {
        Self { requester }
    }

    fn provider(requester: Arc<Requester>) -> Box<dyn Provider> {
        Box::new(Self::new(requester))
    }

    /// Looks a tag up by display name.
    ///
    /// `fields` are `oc` property names to fetch besides `display-name`;
    /// every tag property when empty.
    ///
    /// ## Errors
    /// Returns a transport error, or a parse error for a malformed
    /// multistatus body.
    pub fn fetch_systemtag(&self, name: &str, fields: &[&str]) -> ClientResult<EntityOne> {
        let catalog = catalog();
        let mut selection = FieldSelection::new().with("oc", "display-name");
        if fields.is_empty() {
            for descriptor in catalog.tag().descriptors() {
                selection.push(descriptor.prefix(), descriptor.xml_name());
            }
        } else {
            for field in fields {
                selection.push("oc", field);
            }
        }
        let propfind = PropfindOptions {
            fields: selection,
            ..PropfindOptions::default()
        };
        let body = build_propfind_body(catalog.namespaces(), Some(catalog.tag()), &propfind)?;
        let response = self.requester.propfind("", Some(body), None)?;

        let named = |tag: &Entity| tag.get_str("display_name") == Some(name);
        ObjectDecorator::new(catalog.tag())
            .skip_first()
            .init_missing()
            .filter(&named)
            .one(response, Some(self.requester.origin()))
    }

    /// Lists every tag.
    ///
    /// ## Errors
    /// Returns a transport error, or a parse error for a malformed
    /// multistatus body.
    pub fn fetch_systemtags(&self) -> ClientResult<EntityList> {
        let catalog = catalog();
        let body = build_propfind_body(
            catalog.namespaces(),
            Some(catalog.tag()),
            &PropfindOptions::all_fields(),
        )?;
        let response = self.requester.propfind("", Some(body), None)?;
        ObjectDecorator::new(catalog.tag())
            .skip_first()
            .list(response, Some(self.requester.origin()))
    }

    /// Creates a tag. On success the data is the new tag's id, read from
    /// the `Content-Location` header.
    ///
    /// ## Errors
    /// Returns a transport error.
    pub fn create_systemtag(&self, name: &str) -> ClientResult<DataResponse<i64>> {
        let response = self.requester.post_json("", &tag_payload(name))?;
        let id = if response.is_ok() {
            response
                .content_location()
                .and_then(|location| location.trim_end_matches('/').rsplit('/').next())
                .and_then(|id| id.parse().ok())
        } else {
            None
        };
        if response.is_ok() && id.is_none() {
            tracing::warn!(name, location = ?response.content_location(), "Created tag without readable id");
        }
        Ok(DataResponse::new(response, id))
    }

    /// Deletes a tag.
    ///
    /// ## Errors
    /// Returns `ClientError::InvalidArgument` if no tag has the given name,
    /// or a transport error.
    pub fn delete_systemtag(&self, tag: TagRef<'_>) -> ClientResult<Response> {
        let id = match tag {
            TagRef::Id(id) => id,
            TagRef::Name(name) => self.tag_id(name)?.ok_or_else(|| {
                ClientError::InvalidArgument(format!("no tag named {name:?}"))
            })?,
        };
        self.requester.delete(&id.to_string())
    }

    /// Id of the tag named `name`, if it exists.
    ///
    /// ## Errors
    /// Returns a transport error, or a parse error for a malformed
    /// multistatus body.
    pub fn tag_id(&self, name: &str) -> ClientResult<Option<i64>> {
        let found = self.fetch_systemtag(name, &["id"])?;
        Ok(found.item().and_then(|tag| entity_id(tag, "id")))
    }
}

impl Provider for SystemTags {
    fn call(&self, operation: &str, args: &OperationArgs) -> ClientResult<Outcome> {
        match operation {
            "fetch_systemtag" => {
                let fields = args.opt_str_list("fields")?.unwrap_or_default();
                let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
                Ok(self.fetch_systemtag(args.str("name")?, &fields)?.into())
            }
            "fetch_systemtags" => Ok(self.fetch_systemtags()?.into()),
            "create_systemtag" => Ok(self.create_systemtag(args.str("name")?)?.into()),
            "delete_systemtag" => {
                let tag = match args.opt_str("name")? {
                    Some(name) => TagRef::Name(name),
                    None => TagRef::from_args(args)?,
                };
                Ok(self.delete_systemtag(tag)?.into())
            }
            other => Err(unknown_operation(&self.requester, other)),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Tags assigned to files.
#[derive(Debug, Clone)]
pub struct SystemTagsRelation {
    requester: Arc<Requester>,
}

impl SystemTagsRelation {
    #[must_use]
    pub fn new(requester: Arc<Requester>) -> Self {
        Self { requester }
    }

    fn provider(requester: Arc<Requester>) -> Box<dyn Provider> {
        Box::new(Self::new(requester))
    }

    fn file_id(&self, file: FileRef<'_>) -> ClientResult<i64> {
        let id = match file {
            FileRef::Id(id) => Some(id),
            FileRef::Path(path) => {
                let property = WebDav::new(self.requester.sibling(&WEBDAV))
                    .get_file_property(path, "fileid")?;
                property.data().and_then(|id| id.trim().parse().ok())
            }
        };
        id.ok_or_else(|| ClientError::InvalidArgument(format!("no file found for {file:?}")))
    }

    fn tag_id(&self, tag: TagRef<'_>) -> ClientResult<Option<i64>> {
        match tag {
            TagRef::Id(id) => Ok(Some(id)),
            TagRef::Name(name) => SystemTags::new(self.requester.sibling(&SYSTEMTAGS)).tag_id(name),
        }
    }

    /// Tags assigned to a file.
    ///
    /// ## Errors
    /// Returns `ClientError::InvalidArgument` if the file cannot be
    /// resolved, a transport error, or a parse error for a malformed
    /// multistatus body.
    pub fn fetch_systemtags_relation(&self, file: FileRef<'_>) -> ClientResult<EntityList> {
        let file_id = self.file_id(file)?;
        let catalog = catalog();
        let body = build_propfind_body(
            catalog.namespaces(),
            Some(catalog.tag()),
            &PropfindOptions::all_fields(),
        )?;
        let response = self
            .requester
            .propfind(&file_id.to_string(), Some(body), None)?;
        ObjectDecorator::new(catalog.tag())
            .skip_first()
            .list(response, Some(self.requester.origin()))
    }

    /// Unassigns a tag from a file.
    ///
    /// ## Errors
    /// Returns `ClientError::InvalidArgument` if the file or the tag cannot
    /// be resolved, or a transport error.
    pub fn remove_systemtags_relation(&self, file: FileRef<'_>, tag: TagRef<'_>) -> ClientResult<Response> {
        let file_id = self.file_id(file)?;
        let tag_id = self
            .tag_id(tag)?
            .ok_or_else(|| ClientError::InvalidArgument(format!("no tag found for {tag:?}")))?;
        self.requester.delete(&format!("{file_id}/{tag_id}"))
    }

    /// Assigns a tag to a file. A tag given by an unknown name is created
    /// and assigned in one request.
    ///
    /// ## Errors
    /// Returns `ClientError::InvalidArgument` if the file cannot be
    /// resolved, or a transport error.
    pub fn add_systemtags_relation(&self, file: FileRef<'_>, tag: TagRef<'_>) -> ClientResult<Response> {
        let file_id = self.file_id(file)?;
        let name = match tag {
            TagRef::Id(tag_id) => return self.requester.put(&format!("{file_id}/{tag_id}"), None),
            TagRef::Name(name) => name,
        };
        if let Some(tag_id) = self.tag_id(tag)? {
            return self.requester.put(&format!("{file_id}/{tag_id}"), None);
        }
        tracing::debug!(file_id, name, "Creating tag while assigning it");
        self.requester
            .post_json(&file_id.to_string(), &tag_payload(name))
    }
}

impl Provider for SystemTagsRelation {
    fn call(&self, operation: &str, args: &OperationArgs) -> ClientResult<Outcome> {
        match operation {
            "fetch_systemtags_relation" => {
                Ok(self.fetch_systemtags_relation(FileRef::from_args(args)?)?.into())
            }
            "add_systemtags_relation" => Ok(self
                .add_systemtags_relation(FileRef::from_args(args)?, TagRef::from_args(args)?)?
                .into()),
            "remove_systemtags_relation" => Ok(self
                .remove_systemtags_relation(FileRef::from_args(args)?, TagRef::from_args(args)?)?
                .into()),
            other => Err(unknown_operation(&self.requester, other)),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// System tag view over a decoded entity.
#[derive(Debug, Clone, Copy)]
pub struct Tag<'a> {
    entity: &'a Entity,
}

impl<'a> Tag<'a> {
    #[must_use]
    pub fn new(entity: &'a Entity) -> Self {
        Self { entity }
    }

    #[must_use]
    pub fn entity(&self) -> &'a Entity {
        self.entity
    }

    #[must_use]
    pub fn id(&self) -> Option<i64> {
        entity_id(self.entity, "id")
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&'a str> {
        self.entity.get_str("display_name")
    }

    fn required_id(&self) -> ClientResult<i64> {
        self.id()
            .ok_or_else(|| ClientError::InvalidArgument(format!("tag {} has no id", self.entity.href())))
    }

    /// Files below `path` carrying this tag.
    ///
    /// ## Errors
    /// Returns `ClientError::Detached` if the session is gone,
    /// `ClientError::InvalidArgument` if the tag has no id, or the error of
    /// the underlying request.
    pub fn related_files(&self, path: &str) -> ClientResult<EntityList> {
        let rules = PropertyValues::new().with("oc", "systemtag", self.required_id()?);
        WebDav::new(bound(self.entity, &WEBDAV)?).fetch_files_with_filter(path, rules)
    }

    /// Deletes this tag. Returns whether the server accepted it.
    ///
    /// ## Errors
    /// Returns `ClientError::Detached` if the session is gone,
    /// `ClientError::InvalidArgument` if the tag has no id, or a transport
    /// error.
    pub fn delete(&self) -> ClientResult<bool> {
        let id = self.required_id()?;
        let response = SystemTags::new(bound(self.entity, &SYSTEMTAGS)?).delete_systemtag(TagRef::Id(id))?;
        Ok(response.is_ok())
    }
}
