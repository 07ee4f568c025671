use modelier::{
    AttributeSpec, Connection, Order, Registry, RelationshipKind, Result, SchemaError, Value,
    fields,
};
use std::sync::LazyLock;
use tokio::sync::Mutex;

static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub async fn relationships<C: Connection>(url: &str) -> Result<()> {
    let _lock = MUTEX.lock().await;
    let registry = Registry::<C>::new();
    let schema = registry.connect(url).await?;

    // Setup
    let user = schema.create(
        "User",
        [
            ("username", AttributeSpec::text()),
            ("posts", AttributeSpec::has_many("Post")),
        ],
    )?;
    let post = schema.create(
        "Post",
        [
            ("title", AttributeSpec::text()),
            ("user", AttributeSpec::belongs_to(&user)),
            ("comments", AttributeSpec::has_many("Comment")),
        ],
    )?;
    let comment = schema.create(
        "Comment",
        [
            ("body", AttributeSpec::text()),
            ("post", AttributeSpec::belongs_to("Post")),
        ],
    )?;
    for model in [&comment, &post, &user] {
        model.delete().await?;
    }

    // Declarations
    let posts = &user.relationships()[0];
    assert_eq!(posts.kind, RelationshipKind::HasMany);
    assert_eq!(posts.target, "Post");
    assert_eq!(posts.foreign_key, "userId");
    assert!(!user.descriptor().has_attribute("posts"));
    let author = post
        .descriptor()
        .relationship("user")
        .expect("Post should belong to User");
    assert_eq!(author.kind, RelationshipKind::BelongsTo);
    assert_eq!(author.foreign_key, "userId");
    assert_eq!(
        post.descriptor()
            .attribute("userId")
            .map(|v| v.value.clone()),
        Some(Value::Varchar(None))
    );
    assert!(!post.descriptor().has_attribute("user"));
    assert_eq!(
        comment.descriptor().relationship("post").map(|v| v.to_string()),
        Some("Comment.post belongs-to Post (postId)".to_string())
    );

    // Data
    let alice = user.create(fields! { "username" => "alice" }).await?;
    let bob = user.create(fields! { "username" => "bob" }).await?;
    let alice_id = alice.id().cloned().unwrap_or_default();
    let bob_id = bob.id().cloned().unwrap_or_default();
    post.create_many([
        fields! { "title" => "b-side", "userId" => alice_id.clone() },
        fields! { "title" => "a-side", "userId" => alice_id.clone() },
        fields! { "title" => "solo", "userId" => bob_id.clone() },
    ])
    .await?;
    let orphan = post.create(fields! { "title" => "orphan" }).await?;

    // Has many
    let alice_posts = alice.related("posts")?;
    assert_eq!(alice_posts.params().conditions, fields! { "userId" => alice_id.clone() });
    assert_eq!(alice_posts.count().await?, 2);
    let titles = alice_posts
        .order_by("title", Order::Asc)
        .all()
        .await?
        .iter()
        .map(|v| v.get_as::<String>("title"))
        .collect::<Result<Vec<_>>>()?;
    assert_eq!(titles, [Some("a-side".to_string()), Some("b-side".to_string())]);
    assert_eq!(bob.related("posts")?.count().await?, 1);

    // Belongs to
    let solo = post
        .filter(fields! { "title" => "solo" })
        .first()
        .await?
        .expect("Failed to find the post");
    let owner = solo
        .related("user")?
        .first()
        .await?
        .expect("The post should have an owner");
    assert_eq!(owner, bob);
    assert!(orphan.related("user")?.first().await?.is_none());

    // Unsaved owners have no posts, orphans included
    let nobody = user.build(fields! { "username" => "nobody" });
    let error = nobody.related("posts").unwrap_err();
    assert!(matches!(
        error.downcast_ref::<SchemaError>(),
        Some(SchemaError::UnsavedRecord { .. })
    ));
    assert_eq!(
        post.filter(fields! { "userId" => Value::Null }).count().await?,
        0
    );

    // Forward references resolve at call time
    let solo_id = solo.id().cloned().unwrap_or_default();
    comment
        .create_many([
            fields! { "body" => "first", "postId" => solo_id.clone() },
            fields! { "body" => "second", "postId" => solo_id.clone() },
        ])
        .await?;
    assert_eq!(solo.related("comments")?.count().await?, 2);
    assert_eq!(orphan.related("comments")?.count().await?, 0);
    let parent = comment
        .first()
        .await?
        .expect("Failed to find a comment")
        .related("post")?
        .first()
        .await?
        .expect("The comment should have a post");
    assert_eq!(parent, solo);

    // Unknown relationships
    let error = alice.related("friends").unwrap_err();
    assert_eq!(
        error.downcast_ref::<SchemaError>(),
        Some(&SchemaError::UnknownRelationship {
            model: "User".into(),
            name: "friends".into()
        })
    );
    Ok(())
}
