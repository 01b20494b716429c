use anyhow::{Context, Result};
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::{Client, Collection};
use serde::Deserialize;
use tracing::info;

const DB_NAME: &str = "restaurants_app";

pub async fn connect() -> Result<Client> {
    dotenv::dotenv().ok();
    let url = std::env::var("MONGODB_URL")
        .context("MONGODB_URL must be set (environment or .env)")?;
    info!("Connecting to MongoDB...");
    let client = Client::with_uri_str(&url)
        .await
        .context("failed to connect to MongoDB")?;
    Ok(client)
}

pub fn restaurants(client: &Client, collection: &str) -> Collection<Restaurant> {
    client.database(DB_NAME).collection(collection)
}

/// A restaurant document. Fields beyond these exist on the documents but
/// are irrelevant here and left untouched by the `$set` updates.
#[derive(Debug, Clone, Deserialize)]
pub struct Restaurant {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(rename = "priceRange", default)]
    pub price_range: Option<String>,
}

/// Full-collection snapshot. The dataset is small; no pagination.
pub async fn fetch_all(coll: &Collection<Restaurant>) -> Result<Vec<Restaurant>> {
    let cursor = coll
        .find(doc! {}, None)
        .await
        .context("failed to query restaurants")?;
    let records: Vec<Restaurant> = cursor
        .try_collect()
        .await
        .context("failed to read restaurant cursor")?;
    Ok(records)
}

/// One staged `priceRange` write, keyed by document id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedUpdate {
    pub id: ObjectId,
    pub price_range: String,
}

/// Apply all staged updates in a single transaction: either every
/// `priceRange` lands or none do.
pub async fn commit_updates(
    client: &Client,
    coll: &Collection<Restaurant>,
    updates: &[StagedUpdate],
) -> Result<()> {
    let mut session = client
        .start_session(None)
        .await
        .context("failed to start session")?;
    session
        .start_transaction(None)
        .await
        .context("failed to start transaction")?;

    for update in updates {
        let staged = coll
            .update_one_with_session(
                doc! { "_id": update.id },
                doc! { "$set": { "priceRange": update.price_range.clone() } },
                None,
                &mut session,
            )
            .await;
        if let Err(e) = staged {
            session.abort_transaction().await.ok();
            return Err(e).context("failed to stage price range update");
        }
    }

    session
        .commit_transaction()
        .await
        .context("failed to commit price range batch")?;
    Ok(())
}

// ── Stats ──

pub struct Stats {
    pub total: u64,
    pub labelled: u64,
    pub unlabelled: u64,
}

pub async fn get_stats(coll: &Collection<Restaurant>) -> Result<Stats> {
    let total = coll.count_documents(doc! {}, None).await?;
    let labelled = coll
        .count_documents(doc! { "priceRange": { "$exists": true } }, None)
        .await?;
    Ok(Stats {
        total,
        labelled,
        unlabelled: total - labelled,
    })
}

// ── Seeding ──

/// Insert sample restaurants (some deliberately missing a rating) so the
/// backfill can be exercised against a local database.
pub async fn seed_samples(client: &Client, collection: &str) -> Result<usize> {
    let coll = client.database(DB_NAME).collection::<Document>(collection);

    let samples: &[(&str, Option<f64>)] = &[
        ("The Gilded Fork", Some(4.8)),
        ("Harbour Lights", Some(4.6)),
        ("Santoro's", Some(4.3)),
        ("The Copper Kettle", Some(4.1)),
        ("Banh Mi Corner", Some(3.9)),
        ("Rosie's Diner", Some(3.6)),
        ("The Greasy Spoon", Some(3.2)),
        ("Chip Inn", Some(2.8)),
        ("Midnight Kebab", None),
    ];

    let documents: Vec<Document> = samples
        .iter()
        .map(|(name, rating)| {
            let mut d = doc! { "name": *name };
            if let Some(r) = rating {
                d.insert("rating", *r);
            }
            d
        })
        .collect();

    let result = coll
        .insert_many(documents, None)
        .await
        .context("failed to seed restaurants")?;
    Ok(result.inserted_ids.len())
}
