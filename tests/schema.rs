mod resource {
    pub mod fake;
}

#[cfg(test)]
mod tests {
    use crate::resource::fake::{Call, FakeConnection, registry};
    use modelier::{
        AttributeDef, AttributeSpec, Registry, RelationshipKind, SchemaConfig,
        SchemaError, Value,
    };
    use std::sync::Arc;

    fn schema_error(error: &modelier::Error) -> Option<&SchemaError> {
        error.downcast_ref::<SchemaError>()
    }

    #[test]
    fn create_model() {
        let (_registry, schema) = registry();
        let user = schema
            .create(
                "User",
                [
                    ("username", AttributeSpec::text()),
                    ("karma", AttributeSpec::integer()),
                    ("score", AttributeSpec::number()),
                    ("admin", AttributeSpec::boolean()),
                ],
            )
            .unwrap();
        assert_eq!(user.name(), "User");
        assert_eq!(user.table_name(), "users");
        assert_eq!(
            user.attributes(),
            [
                AttributeDef::new("id", Value::Varchar(None)),
                AttributeDef::new("username", Value::Varchar(None)),
                AttributeDef::new("karma", Value::Int64(None)),
                AttributeDef::new("score", Value::Float64(None)),
                AttributeDef::new("admin", Value::Boolean(None)),
            ]
        );
        assert_eq!(schema.models().len(), 1);
        assert_eq!(schema.model("User").unwrap(), user);
        assert!(Arc::ptr_eq(&user.schema().unwrap(), &schema));
    }

    #[test]
    fn table_names() {
        let (_registry, schema) = registry();
        let names = ["Category", "Address", "Box", "Day", "BlogPost"]
            .into_iter()
            .map(|name| {
                schema
                    .create(name, Vec::<(&str, AttributeSpec)>::new())
                    .unwrap()
                    .table_name()
                    .to_string()
            })
            .collect::<Vec<_>>();
        assert_eq!(names, ["categories", "addresses", "boxes", "days", "blogposts"]);
    }

    #[test]
    fn typed_scalar_values() {
        let (_registry, schema) = registry();
        let model = schema
            .create(
                "Reading",
                [
                    ("label", AttributeSpec::from(Value::Varchar(Some("x".into())))),
                    ("value", Value::Float64(Some(1.5)).into()),
                ],
            )
            .unwrap();
        assert_eq!(model.attributes()[1].value, Value::Varchar(None));
        assert_eq!(model.attributes()[2].value, Value::Float64(None));
    }

    #[test]
    fn relationships() {
        let (_registry, schema) = registry();
        let user = schema
            .create(
                "User",
                [
                    ("username", AttributeSpec::text()),
                    ("posts", AttributeSpec::has_many("Post")),
                ],
            )
            .unwrap();
        let post = schema
            .create(
                "Post",
                [
                    ("title", AttributeSpec::text()),
                    ("author", AttributeSpec::belongs_to(&user)),
                ],
            )
            .unwrap();
        assert_eq!(
            user.attributes()
                .iter()
                .map(|v| v.name.as_str())
                .collect::<Vec<_>>(),
            ["id", "username"]
        );
        assert_eq!(
            post.attributes()
                .iter()
                .map(|v| v.name.as_str())
                .collect::<Vec<_>>(),
            ["id", "title", "authorId"]
        );
        let posts = &user.relationships()[0];
        assert_eq!(posts.kind, RelationshipKind::HasMany);
        assert_eq!(posts.to_string(), "User.posts has-many Post (userId)");
        let author = &post.relationships()[0];
        assert!(author.is_belongs_to());
        assert_eq!(author.primary_key, "id");
        assert_eq!(author.to_string(), "Post.author belongs-to User (authorId)");
    }

    #[test]
    fn foreign_key_types() {
        let (registry, _schema) = registry();
        let numeric = registry
            .schema_with_config(FakeConnection::users(), SchemaConfig::numeric_ids())
            .unwrap();
        let user = numeric.create("User", [("name", AttributeSpec::text())]).unwrap();
        assert_eq!(user.descriptor().primary_key().value, Value::Int64(None));
        let text = registry.schema(FakeConnection::users()).unwrap();
        let post = text
            .create(
                "Post",
                [
                    ("user", AttributeSpec::belongs_to(&user)),
                    ("editor", AttributeSpec::belongs_to("Editor")),
                ],
            )
            .unwrap();
        assert_eq!(
            post.descriptor().attribute("userId").unwrap().value,
            Value::Int64(None)
        );
        assert_eq!(
            post.descriptor().attribute("editorId").unwrap().value,
            Value::Varchar(None)
        );
    }

    #[test]
    fn rejected_declarations() {
        let (_registry, schema) = registry();
        let cases: Vec<(Vec<(&str, AttributeSpec)>, SchemaError)> = vec![
            (
                vec![("id", AttributeSpec::text())],
                SchemaError::DuplicateName {
                    model: "Broken".into(),
                    name: "id".into(),
                },
            ),
            (
                vec![
                    ("owner", AttributeSpec::has_many("User")),
                    ("owner", AttributeSpec::text()),
                ],
                SchemaError::DuplicateName {
                    model: "Broken".into(),
                    name: "owner".into(),
                },
            ),
            (
                vec![
                    ("ownerId", AttributeSpec::text()),
                    ("owner", AttributeSpec::belongs_to("User")),
                ],
                SchemaError::DuplicateName {
                    model: "Broken".into(),
                    name: "ownerId".into(),
                },
            ),
            (
                vec![("nothing", AttributeSpec::Scalar(Value::Null))],
                SchemaError::Classification {
                    model: "Broken".into(),
                    attribute: "nothing".into(),
                    reason: "null is not a scalar type".into(),
                },
            ),
            (
                vec![("", AttributeSpec::text())],
                SchemaError::Classification {
                    model: "Broken".into(),
                    attribute: "".into(),
                    reason: "the attribute has no name".into(),
                },
            ),
            (
                vec![("owner", AttributeSpec::belongs_to(""))],
                SchemaError::Classification {
                    model: "Broken".into(),
                    attribute: "owner".into(),
                    reason: "the target model has no name".into(),
                },
            ),
        ];
        for (attributes, expected) in cases {
            let error = schema.create("Broken", attributes).unwrap_err();
            assert_eq!(schema_error(&error), Some(&expected));
        }
        assert!(schema.models().is_empty());
        assert!(schema.create("", [("a", AttributeSpec::text())]).is_err());
        schema.create("Broken", [("a", AttributeSpec::text())]).unwrap();
        let error = schema.create("Broken", [("b", AttributeSpec::text())]).unwrap_err();
        assert_eq!(
            schema_error(&error),
            Some(&SchemaError::DuplicateModel {
                model: "Broken".into()
            })
        );
        assert_eq!(schema.models().len(), 1);
    }

    #[test]
    fn invalid_config() {
        let registry = Registry::<FakeConnection>::new();
        let error = registry
            .schema_with_config(
                FakeConnection::users(),
                SchemaConfig {
                    primary_key: Value::Boolean(None),
                },
            )
            .unwrap_err();
        assert!(matches!(schema_error(&error), Some(SchemaError::Config(..))));
        assert!(registry.is_empty());
        let schema = registry
            .schema_with_config(
                FakeConnection::users(),
                SchemaConfig {
                    primary_key: Value::Int64(Some(5)),
                },
            )
            .unwrap();
        assert_eq!(schema.config().primary_key, Value::Int64(None));
    }

    #[tokio::test]
    async fn connect_from_url() {
        let registry = Registry::<FakeConnection>::new();
        let schema = registry.connect("fake://users").await.unwrap();
        assert_eq!(registry.len(), 1);
        assert!(schema.connection().calls().is_empty());
        assert!(registry.connect("other://users").await.is_err());
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn models_resolve_their_own_schema() {
        let registry = Registry::<FakeConnection>::new();
        let first = registry.schema(FakeConnection::users()).unwrap();
        let second = registry.schema(FakeConnection::users()).unwrap();
        let a = first.create("User", [("name", AttributeSpec::text())]).unwrap();
        let b = second.create("User", [("name", AttributeSpec::text())]).unwrap();
        assert_ne!(a, b);
        a.count().await.unwrap();
        a.count().await.unwrap();
        b.count().await.unwrap();
        assert_eq!(first.connection().calls().len(), 2);
        assert_eq!(second.connection().calls().len(), 1);

        let other = Registry::<FakeConnection>::new();
        let third = other.schema(FakeConnection::users()).unwrap();
        let c = third.create("User", [("name", AttributeSpec::text())]).unwrap();
        c.all().await.unwrap();
        assert!(matches!(
            third.connection().calls().as_slice(),
            [Call::Select { .. }]
        ));
        assert_eq!(first.connection().calls().len(), 2);
        assert!(!registry.ptr_eq(&other));
        assert!(registry.ptr_eq(a.registry()));
    }

    #[tokio::test]
    async fn unregistered_schema() {
        let (registry, schema) = registry();
        let user = schema.create("User", [("name", AttributeSpec::text())]).unwrap();
        let query = user.filter([("name", "user-1")]);
        registry.clear();
        assert!(registry.is_empty());
        let expected = SchemaError::NotRegistered {
            model: "User".into(),
        };
        assert_eq!(
            schema_error(&query.all().await.unwrap_err()),
            Some(&expected)
        );
        assert_eq!(
            schema_error(&user.count().await.unwrap_err()),
            Some(&expected)
        );
        assert_eq!(schema_error(&user.schema().unwrap_err()), Some(&expected));
        assert!(schema.connection().calls().is_empty());
    }

    #[test]
    fn dropped_registry() {
        let schema = {
            let registry = Registry::<FakeConnection>::new();
            registry.schema(FakeConnection::users()).unwrap()
        };
        let error = schema.create("User", [("name", AttributeSpec::text())]).unwrap_err();
        assert_eq!(schema_error(&error), Some(&SchemaError::RegistryDropped));
    }
}
