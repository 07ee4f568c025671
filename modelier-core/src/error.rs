use thiserror::Error;

/// Failures raised while declaring models or resolving which schema owns them.
///
/// These travel inside [`crate::Error`]; use `error.downcast_ref::<SchemaError>()` to tell
/// them apart from connection failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// No registered schema owns the model.
    #[error("Can't find a schema that owns the model `{model}`")]
    NotRegistered { model: String },

    /// The schema has no model with this name.
    #[error("The schema does not define a model named `{model}`")]
    UnknownModel { model: String },

    /// Two models with the same name in one schema.
    #[error("The model `{model}` is already registered in this schema")]
    DuplicateModel { model: String },

    /// Attributes and relationships share one namespace.
    #[error("The model `{model}` declares `{name}` more than once")]
    DuplicateName { model: String, name: String },

    /// A declaration that is not a scalar type, a model reference or a list of one.
    #[error("Cannot classify `{model}.{attribute}`: {reason}")]
    Classification {
        model: String,
        attribute: String,
        reason: String,
    },

    #[error("The model `{model}` has no relationship named `{name}`")]
    UnknownRelationship { model: String, name: String },

    /// Has-many navigation needs the owner's `id`.
    #[error("The `{model}` record has no id to look up `{name}` with, save it first")]
    UnsavedRecord { model: String, name: String },

    #[error("The schema registry was dropped")]
    RegistryDropped,

    #[error("Invalid schema configuration: {0}")]
    Config(String),
}
