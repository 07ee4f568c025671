use crate::{Connection, Model, ModelDef, Value};
use std::sync::Arc;

/// The model a relationship points at.
///
/// Either the registered descriptor itself, or just its name when the target is declared
/// later (mutual or self references).
#[derive(Debug, Clone)]
pub enum ModelTarget {
    Model(Arc<ModelDef>),
    Named(String),
}

impl ModelTarget {
    pub fn name(&self) -> &str {
        match self {
            ModelTarget::Model(model) => model.name(),
            ModelTarget::Named(name) => name,
        }
    }

    /// Type of the target's primary key, known only when the descriptor is at hand.
    pub fn primary_key_type(&self) -> Option<&Value> {
        match self {
            ModelTarget::Model(model) => Some(&model.primary_key().value),
            ModelTarget::Named(..) => None,
        }
    }
}

impl From<&str> for ModelTarget {
    fn from(value: &str) -> Self {
        ModelTarget::Named(value.into())
    }
}

impl From<String> for ModelTarget {
    fn from(value: String) -> Self {
        ModelTarget::Named(value)
    }
}

impl From<Arc<ModelDef>> for ModelTarget {
    fn from(value: Arc<ModelDef>) -> Self {
        ModelTarget::Model(value)
    }
}

impl From<&Arc<ModelDef>> for ModelTarget {
    fn from(value: &Arc<ModelDef>) -> Self {
        ModelTarget::Model(value.clone())
    }
}

impl<C: Connection> From<&Model<C>> for ModelTarget {
    fn from(value: &Model<C>) -> Self {
        ModelTarget::Model(value.descriptor().clone())
    }
}

/// How a caller declares one attribute of a model.
#[derive(Debug, Clone)]
pub enum AttributeSpec {
    /// A plain attribute of the given type (an empty [`Value`]).
    Scalar(Value),
    /// Stores `<name>Id` referencing the target's primary key.
    BelongsTo(ModelTarget),
    /// The target stores `<owner>Id`; nothing is stored on this side.
    HasMany(ModelTarget),
}

impl AttributeSpec {
    pub fn text() -> Self {
        AttributeSpec::Scalar(Value::Varchar(None))
    }
    pub fn number() -> Self {
        AttributeSpec::Scalar(Value::Float64(None))
    }
    pub fn integer() -> Self {
        AttributeSpec::Scalar(Value::Int64(None))
    }
    pub fn boolean() -> Self {
        AttributeSpec::Scalar(Value::Boolean(None))
    }
    pub fn belongs_to(target: impl Into<ModelTarget>) -> Self {
        AttributeSpec::BelongsTo(target.into())
    }
    pub fn has_many(target: impl Into<ModelTarget>) -> Self {
        AttributeSpec::HasMany(target.into())
    }
}

impl From<Value> for AttributeSpec {
    fn from(value: Value) -> Self {
        AttributeSpec::Scalar(value)
    }
}
