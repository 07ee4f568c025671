use crate::PRIMARY_KEY;
use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind {
    /// The owning model stores the foreign key.
    BelongsTo,
    /// The target model stores the foreign key back to the owning model.
    HasMany,
}

impl Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RelationshipKind::BelongsTo => "belongs-to",
            RelationshipKind::HasMany => "has-many",
        })
    }
}

/// Association between two models, resolved when the owning model is declared.
///
/// The keys are derived only from the relationship name, the owning model name and the
/// direction:
/// - belongs-to `author` on `Post` targets `User` through `Post.authorId`;
/// - has-many `posts` on `User` targets `Post` through `Post.userId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub kind: RelationshipKind,
    /// Relationship name as declared on the owning model.
    pub name: String,
    /// Owning model name.
    pub model: String,
    /// Target model name.
    pub target: String,
    pub primary_key: String,
    pub foreign_key: String,
}

impl Relationship {
    pub fn belongs_to(model: &str, name: &str, target: &str) -> Self {
        Self {
            kind: RelationshipKind::BelongsTo,
            name: name.into(),
            model: model.into(),
            target: target.into(),
            primary_key: PRIMARY_KEY.into(),
            foreign_key: format!("{name}Id"),
        }
    }

    pub fn has_many(model: &str, name: &str, target: &str) -> Self {
        Self {
            kind: RelationshipKind::HasMany,
            name: name.into(),
            model: model.into(),
            target: target.into(),
            primary_key: PRIMARY_KEY.into(),
            foreign_key: format!("{}Id", model.to_lowercase()),
        }
    }

    pub fn is_belongs_to(&self) -> bool {
        self.kind == RelationshipKind::BelongsTo
    }

    pub fn is_has_many(&self) -> bool {
        self.kind == RelationshipKind::HasMany
    }
}

impl Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} {} {} ({})",
            self.model, self.name, self.kind, self.target, self.foreign_key
        )
    }
}
