use modelier::{AttributeSpec, Connection, Order, Record, Registry, Result, fields};
use std::sync::LazyLock;
use tokio::sync::Mutex;

static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

fn usernames<C: Connection>(records: &[Record<C>]) -> Vec<String> {
    records
        .iter()
        .map(|v| v.get("username").map(ToString::to_string).unwrap_or_default())
        .collect()
}

pub async fn queries<C: Connection>(url: &str) -> Result<()> {
    let _lock = MUTEX.lock().await;
    let registry = Registry::<C>::new();
    let schema = registry.connect(url).await?;

    // Setup
    let user = schema.create(
        "User",
        [
            ("username", AttributeSpec::text()),
            ("admin", AttributeSpec::boolean()),
            ("karma", AttributeSpec::integer()),
        ],
    )?;
    user.delete().await?;
    let created = user
        .create_many([
            fields! { "username" => "alice", "admin" => true, "karma" => 10_i64 },
            fields! { "username" => "bob", "admin" => false, "karma" => 30_i64 },
            fields! { "username" => "carol", "admin" => true, "karma" => 20_i64 },
        ])
        .await?;
    assert_eq!(created.len(), 3);
    assert!(created.iter().all(Record::is_saved));

    // Builders never touch the receiver
    let admins = user.filter(fields! { "admin" => true });
    let alice = admins.filter(fields! { "username" => "alice" });
    assert_eq!(admins.params().conditions, fields! { "admin" => true });
    assert_eq!(
        alice.params().conditions,
        fields! { "admin" => true, "username" => "alice" }
    );
    assert_eq!(
        admins.filter(fields! { "admin" => false }).params().conditions,
        fields! { "admin" => false }
    );
    let ordered = user.order_by("admin", Order::Asc).order_by("karma", Order::Desc);
    assert_eq!(
        ordered.params().order_by,
        [("admin".to_string(), Order::Asc), ("karma".to_string(), Order::Desc)]
    );
    assert_eq!(ordered.limit(5).limit(1).params().limit, Some(1));
    assert_eq!(ordered.params().limit, None);

    // Count
    assert_eq!(user.count().await?, 3);
    assert_eq!(admins.count().await?, 2);
    assert_eq!(alice.count().await?, 1);
    assert_eq!(admins.limit(1).count().await?, 2);

    // Select
    let by_karma = user.order_by("karma", Order::Desc);
    assert_eq!(usernames(&by_karma.all().await?), ["bob", "carol", "alice"]);
    assert_eq!(
        usernames(
            &user
                .order_by("admin", Order::Asc)
                .order_by("karma", Order::Asc)
                .all()
                .await?
        ),
        ["bob", "alice", "carol"]
    );
    assert_eq!(
        usernames(&by_karma.offset(1).limit(1).all().await?),
        ["carol"]
    );
    assert_eq!(usernames(&admins.group_by("admin").all().await?).len(), 1);
    assert_eq!(usernames(&user.group_by("admin").all().await?).len(), 2);

    // First and last
    let first = by_karma.first().await?.expect("Failed to find the first user");
    assert_eq!(first.get_as::<String>("username")?.as_deref(), Some("bob"));
    let last = by_karma.last().await?.expect("Failed to find the last user");
    assert_eq!(last.get_as::<String>("username")?.as_deref(), Some("alice"));
    let nobody = user.filter(fields! { "username" => "nobody" });
    assert!(nobody.first().await?.is_none());
    assert!(nobody.last().await?.is_none());
    assert!(nobody.all().await?.is_empty());

    // Find
    let id = first.get_as::<String>("id")?.expect("The user should have an id");
    let found = user.find(id).await?.expect("Failed to find the user by id");
    assert_eq!(found, first);
    assert!(user.find("does-not-exist".to_string()).await?.is_none());

    // Update and delete
    let affected = user
        .filter(fields! { "admin" => false })
        .update(fields! { "karma" => 0_i64 })
        .await?;
    assert_eq!(affected.rows_affected, 1);
    assert_eq!(user.filter(fields! { "karma" => 0_i64 }).count().await?, 1);
    let affected = admins.delete().await?;
    assert_eq!(affected.rows_affected, 2);
    assert_eq!(usernames(&user.all().await?), ["bob"]);
    assert_eq!(user.delete().await?.rows_affected, 1);
    assert_eq!(user.count().await?, 0);
    Ok(())
}
