use futures::future::try_join_all;
use modelier::{AttributeSpec, Connection, Order, Registry, Result, fields};
use std::{collections::HashSet, sync::LazyLock};
use tokio::sync::Mutex;

static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub async fn concurrency<C: Connection>(url: &str) -> Result<()> {
    let _lock = MUTEX.lock().await;
    let registry = Registry::<C>::new();
    let schema = registry.connect(url).await?;

    // Setup
    let counter = schema.create(
        "Counter",
        [
            ("label", AttributeSpec::text()),
            ("value", AttributeSpec::integer()),
        ],
    )?;
    counter.delete().await?;

    // Inserts issued together get distinct ids
    let created = try_join_all((0..10_i64).map(|i| {
        counter.create(fields! { "label" => format!("counter-{i}"), "value" => i })
    }))
    .await?;
    let ids = created
        .iter()
        .filter_map(|v| v.id().map(ToString::to_string))
        .collect::<HashSet<_>>();
    assert_eq!(ids.len(), 10);
    assert_eq!(counter.count().await?, 10);

    // Independent queries
    let third = counter.filter(fields! { "value" => 3_i64 });
    let ascending = counter.order_by("value", Order::Asc);
    let (count, last, three) =
        futures::try_join!(counter.count(), ascending.last(), third.first())?;
    assert_eq!(count, 10);
    assert_eq!(last.and_then(|v| v.get_as::<i64>("value").ok().flatten()), Some(9));
    assert_eq!(
        three
            .expect("Failed to find the third counter")
            .get_as::<String>("label")?
            .as_deref(),
        Some("counter-3")
    );

    // Saves on distinct records
    let mut records = ascending.all().await?;
    for record in records.iter_mut() {
        let value = record.get_as::<i64>("value")?.unwrap_or_default();
        record.set("value", value * 10);
    }
    try_join_all(records.iter_mut().map(|v| v.save())).await?;
    let values = counter
        .order_by("value", Order::Desc)
        .limit(3)
        .all()
        .await?
        .iter()
        .map(|v| v.get_as::<i64>("value"))
        .collect::<Result<Vec<_>>>()?;
    assert_eq!(values, [Some(90), Some(80), Some(70)]);

    // Concurrent deletes each remove their own row
    let queries = [0_i64, 10, 20]
        .into_iter()
        .map(|v| counter.filter(fields! { "value" => v }))
        .collect::<Vec<_>>();
    let removed = try_join_all(queries.iter().map(|v| v.delete())).await?;
    assert!(removed.iter().all(|v| v.rows_affected == 1));
    assert_eq!(counter.count().await?, 7);
    Ok(())
}
