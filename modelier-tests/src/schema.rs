use modelier::{AttributeSpec, Connection, PRIMARY_KEY, Registry, SchemaError, Value, fields};
use std::sync::LazyLock;
use tokio::sync::Mutex;

static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub async fn schema<C: Connection>(url: &str) {
    let _lock = MUTEX.lock().await;
    let registry = Registry::<C>::new();
    let schema = registry
        .connect(url)
        .await
        .expect("Could not open the connection");
    assert_eq!(registry.len(), 1);

    // Declaration
    let user = schema
        .create(
            "User",
            [
                ("username", AttributeSpec::text()),
                ("admin", AttributeSpec::boolean()),
                ("karma", AttributeSpec::integer()),
            ],
        )
        .expect("Failed to create the User model");
    assert_eq!(user.name(), "User");
    assert_eq!(user.table_name(), "users");
    assert_eq!(
        user.attributes()
            .iter()
            .map(|v| v.name.as_str())
            .collect::<Vec<_>>(),
        [PRIMARY_KEY, "username", "admin", "karma"]
    );
    assert_eq!(user.descriptor().primary_key().value, Value::Varchar(None));
    assert!(user.relationships().is_empty());
    let category = schema
        .create("Category", [("label", AttributeSpec::text())])
        .expect("Failed to create the Category model");
    assert_eq!(category.table_name(), "categories");

    // Lookup
    let owner = user.schema().expect("The User model should have a schema");
    assert!(std::sync::Arc::ptr_eq(&owner, &schema));
    assert_eq!(
        schema.model("User").expect("Failed to look User up"),
        user
    );
    let error = schema.model("Nobody").unwrap_err();
    assert_eq!(
        error.downcast_ref::<SchemaError>(),
        Some(&SchemaError::UnknownModel {
            model: "Nobody".into()
        })
    );

    // Rejected declarations leave the schema unchanged
    let error = schema
        .create("User", [("nickname", AttributeSpec::text())])
        .unwrap_err();
    assert!(matches!(
        error.downcast_ref::<SchemaError>(),
        Some(SchemaError::DuplicateModel { .. })
    ));
    let error = schema
        .create(
            "Broken",
            [
                ("owner", AttributeSpec::belongs_to(&user)),
                ("ownerId", AttributeSpec::text()),
            ],
        )
        .unwrap_err();
    assert!(matches!(
        error.downcast_ref::<SchemaError>(),
        Some(SchemaError::DuplicateName { name, .. }) if name == "ownerId"
    ));
    let error = schema
        .create("Broken", [("nothing", AttributeSpec::Scalar(Value::Null))])
        .unwrap_err();
    assert!(matches!(
        error.downcast_ref::<SchemaError>(),
        Some(SchemaError::Classification { attribute, .. }) if attribute == "nothing"
    ));
    assert_eq!(schema.models().len(), 2);

    // Models work only while their schema is registered
    user.delete().await.expect("Failed to clear the users");
    user.create(fields! { "username" => "nikolay", "admin" => true })
        .await
        .expect("Failed to create a user");
    assert_eq!(user.count().await.expect("Failed to count the users"), 1);
    assert!(registry.remove(&schema));
    let error = user.count().await.unwrap_err();
    assert_eq!(
        error.downcast_ref::<SchemaError>(),
        Some(&SchemaError::NotRegistered {
            model: "User".into()
        })
    );
    assert!(registry.is_empty());
}
