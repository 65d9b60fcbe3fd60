//! Bulk requests.
//!
//! A bulk request submits an ordered list of operations as one atomic unit:
//! `PATCH <prefix>/bulk` with body `{"operations": [...]}`. The response is
//! either a single `{"errors": [...]}` document, or `{"operations": [...]}`
//! with one result document per submitted operation, in submission order.
//!
//! Each submitted entry has the shape of a single call:
//!
//! ```json
//! {
//!   "op": "update",
//!   "ref": { "type": "notes", "id": "12" },
//!   "params": { "fields[notes]": "title", "filter[tag]": ["a", "b"] },
//!   "data": { "type": "notes", "id": "12", "attributes": { "title": "New" } }
//! }
//! ```
//!
//! `params` holds the composed query pairs; keys repeated by the composer
//! become arrays. `params` and `data` are omitted when empty.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::document::{Document, DocumentError, ErrorDocument};
use crate::provider::{Operation, ProviderError};
use crate::query::{compose, PaginationComposer};

/// One submitted operation bound to its positional result.
#[derive(Clone, Debug, PartialEq)]
pub struct BulkEntry<P = ()> {
    /// The submitted operation.
    pub operation: Operation<P>,
    /// The result document returned at the same position.
    pub result: Document<Value>,
}

impl<P> BulkEntry<P> {
    /// Decodes the result's primary data into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Malformed`] if `data` does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<Document<T>, DocumentError> {
        self.result.clone().decode()
    }
}

/// The outcome of a bulk request.
///
/// Either every operation has a result, or the request failed as a whole.
#[derive(Clone, Debug, PartialEq)]
pub enum BulkResponse<P = ()> {
    /// Results in submission order.
    Operations(Vec<BulkEntry<P>>),
    /// The request was rejected as a whole.
    Errors(ErrorDocument),
}

impl<P> BulkResponse<P> {
    /// Returns `true` if the request was rejected as a whole.
    #[must_use]
    pub const fn is_errors(&self) -> bool {
        matches!(self, Self::Errors(_))
    }

    /// Returns the entries, empty when the request was rejected.
    #[must_use]
    pub fn entries(&self) -> &[BulkEntry<P>] {
        match self {
            Self::Operations(entries) => entries,
            Self::Errors(_) => &[],
        }
    }

    /// Converts into a `Result`, with the rejection on the `Err` side.
    ///
    /// # Errors
    ///
    /// Returns the [`ErrorDocument`] if the request was rejected.
    pub fn into_result(self) -> Result<Vec<BulkEntry<P>>, ErrorDocument> {
        match self {
            Self::Operations(entries) => Ok(entries),
            Self::Errors(errors) => Err(errors),
        }
    }
}

/// Builds the `{"operations": [...]}` request body.
pub(crate) fn bulk_body<C>(
    operations: &[Operation<C::Page>],
    composer: &C,
) -> Result<Value, serde_json::Error>
where
    C: PaginationComposer + ?Sized,
{
    let entries = operations
        .iter()
        .map(|operation| bulk_entry(operation, composer))
        .collect::<Result<Vec<_>, _>>()?;

    let mut body = Map::new();
    body.insert("operations".to_string(), Value::Array(entries));
    Ok(Value::Object(body))
}

fn bulk_entry<C>(operation: &Operation<C::Page>, composer: &C) -> Result<Value, serde_json::Error>
where
    C: PaginationComposer + ?Sized,
{
    let mut entry = Map::new();
    entry.insert(
        "op".to_string(),
        Value::String(operation.kind().action().to_string()),
    );
    entry.insert("ref".to_string(), serde_json::to_value(operation.target())?);

    let pairs = compose(operation.params(), composer);
    if !pairs.is_empty() {
        entry.insert("params".to_string(), Value::Object(params_object(pairs)));
    }

    if let Some(data) = operation.data() {
        entry.insert("data".to_string(), serde_json::to_value(data)?);
    }

    Ok(Value::Object(entry))
}

fn params_object(pairs: Vec<(String, String)>) -> Map<String, Value> {
    let mut params = Map::new();
    for (key, value) in pairs {
        let value = Value::String(value);
        match params.get_mut(&key) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                params.insert(key, value);
            }
        }
    }
    params
}

/// Binds a bulk response body to the submitted operations by position.
pub(crate) fn bind_results<P>(
    operations: Vec<Operation<P>>,
    body: Value,
) -> Result<BulkResponse<P>, ProviderError> {
    let Value::Object(mut map) = body else {
        return Err(DocumentError::MissingOperations.into());
    };

    if map.contains_key("errors") {
        let errors: ErrorDocument =
            serde_json::from_value(Value::Object(map)).map_err(DocumentError::from)?;
        return Ok(BulkResponse::Errors(errors));
    }

    let Some(Value::Array(results)) = map.remove("operations") else {
        return Err(DocumentError::MissingOperations.into());
    };

    if results.len() != operations.len() {
        tracing::warn!(
            "Bulk response has {} results for {} operations",
            results.len(),
            operations.len()
        );
        return Err(ProviderError::BulkLengthMismatch {
            expected: operations.len(),
            actual: results.len(),
        });
    }

    let entries = operations
        .into_iter()
        .zip(results)
        .map(|(operation, result)| {
            Ok(BulkEntry {
                operation,
                result: Document::from_value(result)?,
            })
        })
        .collect::<Result<Vec<_>, DocumentError>>()?;

    Ok(BulkResponse::Operations(entries))
}
