use crate::{Relationship, Value};

/// Name of the implicit primary key every model carries.
pub const PRIMARY_KEY: &str = "id";

/// Declaration of one model attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDef {
    /// Attribute name.
    pub name: String,
    /// Empty `Value` describing the attribute type.
    pub value: Value,
}

impl AttributeDef {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Registered metadata of a model: name, table, attributes and relationships.
///
/// Built by [`crate::Schema::create`] and frozen afterwards: there are accessors only. The
/// first attribute is always the primary key.
#[derive(Debug)]
pub struct ModelDef {
    pub(crate) name: String,
    pub(crate) table: String,
    pub(crate) attributes: Vec<AttributeDef>,
    pub(crate) relationships: Vec<Relationship>,
}

impl ModelDef {
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Storage collection name, the lower-cased plural of the model name.
    pub fn table(&self) -> &str {
        &self.table
    }
    pub fn attributes(&self) -> &[AttributeDef] {
        &self.attributes
    }
    pub fn attribute(&self, name: &str) -> Option<&AttributeDef> {
        self.attributes.iter().find(|v| v.name == name)
    }
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|v| v.name.as_str())
    }
    pub fn primary_key(&self) -> &AttributeDef {
        &self.attributes[0]
    }
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }
    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|v| v.name == name)
    }
}
