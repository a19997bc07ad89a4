//! Decoding of multistatus responses into entities.

use nxc_dav::dav::core::{Entity, EntitySchema, Origin};
use nxc_dav::dav::parse::{EntityFilter, MultistatusOptions, parse_multistatus};
use serde_json::{Map, Value};

use crate::error::ClientResult;
use crate::response::Response;

/// Turns a response into entities of one schema.
///
/// Entities are only decoded when the response succeeded; a failed response
/// yields an empty payload and no error.
#[derive(Clone, Copy)]
pub struct ObjectDecorator<'a> {
    schema: &'a EntitySchema,
    skip_first: bool,
    init_missing: bool,
    filter: Option<EntityFilter<'a>>,
}

impl<'a> ObjectDecorator<'a> {
    #[must_use]
    pub fn new(schema: &'a EntitySchema) -> Self {
        Self {
            schema,
            skip_first: false,
            init_missing: false,
            filter: None,
        }
    }

    /// Drops the first decoded entry, which describes the queried container
    /// itself.
    #[must_use]
    pub fn skip_first(mut self) -> Self {
        self.skip_first = true;
        self
    }

    /// Gives every schema attribute its default before decoding.
    #[must_use]
    pub fn init_missing(mut self) -> Self {
        self.init_missing = true;
        self
    }

    /// Keeps only entities accepted by `filter`. Applied after `skip_first`.
    #[must_use]
    pub fn filter(mut self, filter: EntityFilter<'a>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Decodes all entities.
    ///
    /// ## Errors
    /// Returns a parse error if a successful response carries a body that is
    /// not a valid multistatus document.
    pub fn list(&self, response: Response, origin: Option<Origin>) -> ClientResult<EntityList> {
        let items = self.decode(&response, origin)?;
        Ok(EntityList { response, items })
    }

    /// Decodes the first entity, if any.
    ///
    /// ## Errors
    /// Returns a parse error if a successful response carries a body that is
    /// not a valid multistatus document.
    pub fn one(&self, response: Response, origin: Option<Origin>) -> ClientResult<EntityOne> {
        let mut items = self.decode(&response, origin)?;
        if items.len() > 1 {
            tracing::debug!(count = items.len(), kind = self.schema.kind(), "Keeping first of several matches");
        }
        items.truncate(1);
        Ok(EntityOne {
            response,
            item: items.pop(),
        })
    }

    fn decode(&self, response: &Response, origin: Option<Origin>) -> ClientResult<Vec<Entity>> {
        if !response.is_ok() {
            return Ok(Vec::new());
        }
        let options = MultistatusOptions {
            init_missing_to_default: self.init_missing,
            filter: None,
            origin,
        };
        let mut items = parse_multistatus(response.raw_body(), self.schema, &options)?;
        if self.skip_first && !items.is_empty() {
            items.remove(0);
        }
        if let Some(keep) = self.filter {
            items.retain(keep);
        }
        Ok(items)
    }
}

impl std::fmt::Debug for ObjectDecorator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectDecorator")
            .field("kind", &self.schema.kind())
            .field("skip_first", &self.skip_first)
            .field("init_missing", &self.init_missing)
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

/// A response together with the entities decoded from it.
#[derive(Debug)]
pub struct EntityList {
    response: Response,
    items: Vec<Entity>,
}

impl EntityList {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.response.is_ok()
    }

    #[must_use]
    pub fn response(&self) -> &Response {
        &self.response
    }

    #[must_use]
    pub fn items(&self) -> &[Entity] {
        &self.items
    }

    #[must_use]
    pub fn into_items(self) -> Vec<Entity> {
        self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entities as JSON objects.
    #[must_use]
    pub fn as_dicts(&self) -> Vec<Map<String, Value>> {
        self.items.iter().map(Entity::as_dict).collect()
    }
}

/// A response together with at most one decoded entity.
#[derive(Debug)]
pub struct EntityOne {
    response: Response,
    item: Option<Entity>,
}

impl EntityOne {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.response.is_ok()
    }

    #[must_use]
    pub fn response(&self) -> &Response {
        &self.response
    }

    #[must_use]
    pub fn item(&self) -> Option<&Entity> {
        self.item.as_ref()
    }

    #[must_use]
    pub fn into_item(self) -> Option<Entity> {
        self.item
    }
}
