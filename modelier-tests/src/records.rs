use modelier::{AttributeSpec, Connection, Registry, Result, Value, fields};
use std::sync::LazyLock;
use tokio::sync::Mutex;

static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub async fn records<C: Connection>(url: &str) -> Result<()> {
    let _lock = MUTEX.lock().await;
    let registry = Registry::<C>::new();
    let schema = registry.connect(url).await?;

    // Setup
    let user = schema.create(
        "User",
        [
            ("username", AttributeSpec::text()),
            ("admin", AttributeSpec::boolean()),
            ("score", AttributeSpec::number()),
        ],
    )?;
    user.delete().await?;

    // Unsaved records
    let mut record = user.build(fields! {
        "username" => "nikolay",
        "admin" => false,
        "nickname" => "nick",
    });
    assert!(!record.is_saved());
    assert_eq!(record.id(), None);
    assert_eq!(
        record.attributes(),
        fields! { "username" => "nikolay", "admin" => false }
    );
    assert_eq!(record.get_as::<String>("nickname")?.as_deref(), Some("nick"));
    record.set("id", "");
    assert!(!record.is_saved());
    record.remove("id");

    // Insert
    record.save().await?;
    assert!(record.is_saved());
    let id = record.get_as::<String>("id")?.expect("The record should have an id");
    assert_eq!(user.count().await?, 1);
    let stored = user.find(id.clone()).await?.expect("Failed to find the record");
    assert_eq!(stored.get_as::<String>("username")?.as_deref(), Some("nikolay"));
    assert_eq!(stored.get("nickname"), None);
    assert!(stored.get("score").is_none());

    // Update through save
    record.set("admin", true).set("score", 4.5_f64);
    record.save().await?;
    assert_eq!(user.count().await?, 1);
    let stored = user.find(id.clone()).await?.expect("Failed to find the record");
    assert_eq!(stored.get_as::<bool>("admin")?, Some(true));
    assert_eq!(stored.get_as::<f64>("score")?, Some(4.5));
    assert_eq!(stored.get_as::<String>("id")?.as_deref(), Some(id.as_str()));

    // Update merges the parameters into the attributes
    record.update(fields! { "username" => "blah" }).await?;
    assert_eq!(record.get_as::<String>("username")?.as_deref(), Some("blah"));
    assert_eq!(record.get_as::<bool>("admin")?, Some(true));
    let stored = user.find(id.clone()).await?.expect("Failed to find the record");
    assert_eq!(stored.attributes(), record.attributes());

    // Replacing the attributes drops the declared ones that are missing
    let mut copy = stored.clone();
    copy.set_attributes(fields! { "id" => id.clone(), "username" => "other" });
    assert_eq!(copy.get("admin"), None);
    assert_eq!(copy.get("username"), Some(&Value::from("other")));
    assert_ne!(copy, stored);

    // Create returns the stored record
    let created = user
        .create(fields! { "username" => "second", "admin" => false })
        .await?;
    assert!(created.is_saved());
    assert_ne!(created.id(), record.id());
    assert_eq!(user.count().await?, 2);

    // Delete keeps the instance
    record.delete().await?;
    assert!(user.find(id).await?.is_none());
    assert_eq!(record.get_as::<String>("username")?.as_deref(), Some("blah"));
    assert_eq!(user.count().await?, 1);
    Ok(())
}
