use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::entities::catalog::{ColumnSpec, ResourceKind};
use crate::usecase::ports::api::{ApiError, Mutation, ResourceApi};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CreateError {
    #[error("Fill in at least one field.")]
    Empty,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl CreateError {
    pub fn user_message(&self) -> String {
        match self {
            CreateError::Empty => self.to_string(),
            CreateError::Api(err) => err.user_message(),
        }
    }
}

/// Draft values for a new record, keyed by column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CreateDraft {
    values: BTreeMap<&'static str, String>,
}

impl CreateDraft {
    pub fn fields(kind: ResourceKind) -> impl Iterator<Item = &'static ColumnSpec> {
        let columns: &'static [ColumnSpec] = kind.endpoint().columns;
        columns.iter().filter(|column| column.editable)
    }

    pub fn set(&mut self, key: &'static str, value: String) {
        self.values.insert(key, value);
    }

    pub fn value(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("")
    }

    /// Blank inputs are left out of the request body.
    pub fn body(&self) -> Map<String, Value> {
        self.values
            .iter()
            .filter_map(|(key, value)| {
                let value = value.trim();
                (!value.is_empty()).then(|| (key.to_string(), Value::String(value.to_string())))
            })
            .collect()
    }

    pub async fn submit(
        &self,
        api: &dyn ResourceApi,
        kind: ResourceKind,
    ) -> Result<String, CreateError> {
        let body = self.body();
        if body.is_empty() {
            return Err(CreateError::Empty);
        }
        let path = kind.endpoint().path;
        match api.send(Mutation::Post, path, Some(Value::Object(body))).await {
            Ok(_) => {
                info!(path, "record created");
                Ok(success_message(kind))
            }
            Err(err) => {
                warn!(path, error = %err, "create failed");
                Err(err.into())
            }
        }
    }
}

pub fn success_message(kind: ResourceKind) -> String {
    format!("{} created successfully.", kind.singular())
}
