//! Dynamic operation arguments and results.

use serde_json::{Map, Value};

use super::decorator::{EntityList, EntityOne};
use crate::error::{ClientError, ClientResult};
use crate::response::{DataResponse, Response};

/// Named arguments of a dynamically dispatched operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationArgs {
    values: Map<String, Value>,
    bytes: Option<Vec<u8>>,
}

impl OperationArgs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a named argument.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.values.insert(name.to_owned(), value.into());
        self
    }

    /// Sets the binary payload (file contents).
    #[must_use]
    pub fn with_bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.bytes = Some(bytes.into());
        self
    }

    fn present(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|value| !value.is_null())
    }

    /// Required string argument.
    ///
    /// ## Errors
    /// Returns `ClientError::InvalidArgument` if missing or not a string.
    pub fn str(&self, name: &str) -> ClientResult<&str> {
        self.opt_str(name)?
            .ok_or_else(|| ClientError::InvalidArgument(format!("missing argument {name:?}")))
    }

    /// Optional string argument.
    ///
    /// ## Errors
    /// Returns `ClientError::InvalidArgument` if present but not a string.
    pub fn opt_str(&self, name: &str) -> ClientResult<Option<&str>> {
        self.present(name)
            .map(|value| {
                value.as_str().ok_or_else(|| {
                    ClientError::InvalidArgument(format!("argument {name:?} must be a string"))
                })
            })
            .transpose()
    }

    /// Optional integer argument. Numeric strings are accepted.
    ///
    /// ## Errors
    /// Returns `ClientError::InvalidArgument` if present but not an integer.
    pub fn opt_i64(&self, name: &str) -> ClientResult<Option<i64>> {
        self.present(name)
            .map(|value| {
                value
                    .as_i64()
                    .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
                    .ok_or_else(|| {
                        ClientError::InvalidArgument(format!("argument {name:?} must be an integer"))
                    })
            })
            .transpose()
    }

    /// Boolean argument with a default.
    ///
    /// ## Errors
    /// Returns `ClientError::InvalidArgument` if present but not a boolean.
    pub fn bool_or(&self, name: &str, default: bool) -> ClientResult<bool> {
        self.present(name).map_or(Ok(default), |value| {
            value.as_bool().ok_or_else(|| {
                ClientError::InvalidArgument(format!("argument {name:?} must be a boolean"))
            })
        })
    }

    /// Optional list of strings.
    ///
    /// ## Errors
    /// Returns `ClientError::InvalidArgument` if present but not a list of
    /// strings.
    pub fn opt_str_list(&self, name: &str) -> ClientResult<Option<Vec<String>>> {
        let invalid =
            || ClientError::InvalidArgument(format!("argument {name:?} must be a list of strings"));
        self.present(name)
            .map(|value| {
                value
                    .as_array()
                    .ok_or_else(invalid)?
                    .iter()
                    .map(|item| item.as_str().map(str::to_owned).ok_or_else(invalid))
                    .collect()
            })
            .transpose()
    }

    /// Optional JSON object.
    #[must_use]
    pub fn opt_object(&self, name: &str) -> Option<&Map<String, Value>> {
        self.present(name).and_then(Value::as_object)
    }

    /// Binary payload.
    ///
    /// ## Errors
    /// Returns `ClientError::InvalidArgument` if none was set.
    pub fn bytes(&self) -> ClientResult<&[u8]> {
        self.bytes
            .as_deref()
            .ok_or_else(|| ClientError::InvalidArgument("missing file contents".to_owned()))
    }
}

/// Result of a dynamically dispatched operation.
#[derive(Debug)]
pub enum Outcome {
    /// Undecorated server response.
    Response(Response),
    /// Response decoded into a list of entities.
    List(EntityList),
    /// Response decoded into at most one entity.
    One(EntityOne),
    /// Response plus a value extracted from it (`null` when it failed).
    Data(Response, Value),
    /// Aggregated success flag of a multi-request operation.
    Flag(bool),
}

impl Outcome {
    /// Whether the operation succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        match self {
            Self::Response(response) => response.is_ok(),
            Self::List(list) => list.is_ok(),
            Self::One(one) => one.is_ok(),
            Self::Data(response, _) => response.is_ok(),
            Self::Flag(flag) => *flag,
        }
    }

    /// The underlying response, if any.
    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Response(response) => Some(response),
            Self::List(list) => Some(list.response()),
            Self::One(one) => Some(one.response()),
            Self::Data(response, _) => Some(response),
            Self::Flag(_) => None,
        }
    }

    /// Unwraps a plain response.
    ///
    /// ## Errors
    /// Returns `ClientError::InvalidArgument` for other variants.
    pub fn into_response(self) -> ClientResult<Response> {
        match self {
            Self::Response(response) => Ok(response),
            other => Err(mismatch("a response", &other)),
        }
    }

    /// Unwraps an entity list.
    ///
    /// ## Errors
    /// Returns `ClientError::InvalidArgument` for other variants.
    pub fn into_list(self) -> ClientResult<EntityList> {
        match self {
            Self::List(list) => Ok(list),
            other => Err(mismatch("an entity list", &other)),
        }
    }

    /// The extracted value of a [`Outcome::Data`] result.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Data(_, data) => Some(data),
            _ => None,
        }
    }

    /// Unwraps a single-entity result.
    ///
    /// ## Errors
    /// Returns `ClientError::InvalidArgument` for other variants.
    pub fn into_one(self) -> ClientResult<EntityOne> {
        match self {
            Self::One(one) => Ok(one),
            other => Err(mismatch("a single entity", &other)),
        }
    }
}

fn mismatch(expected: &str, found: &Outcome) -> ClientError {
    let found = match found {
        Outcome::Response(_) => "a response",
        Outcome::List(_) => "an entity list",
        Outcome::One(_) => "a single entity",
        Outcome::Data(..) => "a value",
        Outcome::Flag(_) => "a flag",
    };
    ClientError::InvalidArgument(format!("expected {expected}, operation returned {found}"))
}

impl From<Response> for Outcome {
    fn from(response: Response) -> Self {
        Self::Response(response)
    }
}

impl<T: Into<Value>> From<DataResponse<T>> for Outcome {
    fn from(result: DataResponse<T>) -> Self {
        let (response, data) = result.into_parts();
        Self::Data(response, data.map_or(Value::Null, Into::into))
    }
}

impl From<EntityList> for Outcome {
    fn from(list: EntityList) -> Self {
        Self::List(list)
    }
}

impl From<EntityOne> for Outcome {
    fn from(one: EntityOne) -> Self {
        Self::One(one)
    }
}
