use anyhow::Result;
use mongodb::{Client, Collection};
use rand::Rng;
use tracing::info;

use crate::db::{self, Restaurant, StagedUpdate};
use crate::price;

/// Rating assumed when a document has no rating (or a zero one, which the
/// original data treated as unset).
const DEFAULT_RATING: f64 = 3.5;

pub struct BackfillPlan {
    pub updates: Vec<StagedUpdate>,
    pub skipped: usize,
}

/// Decide what to write, without touching the database: skip documents
/// that already carry a priceRange, draw a label for the rest.
pub fn plan(records: &[Restaurant], rng: &mut impl Rng) -> BackfillPlan {
    let mut updates = Vec::new();
    let mut skipped = 0;

    for record in records {
        let name = record.name.as_deref().unwrap_or("<unnamed>");

        if let Some(existing) = &record.price_range {
            println!("  skip  {} - already has price range: {}", name, existing);
            skipped += 1;
            continue;
        }

        let rating = match record.rating {
            Some(r) if r != 0.0 => r,
            _ => DEFAULT_RATING,
        };
        let label = price::assign(rating, rng);
        println!(
            "  write {} - adding price range: {} (rating: {:.1})",
            name, label, rating
        );
        updates.push(StagedUpdate {
            id: record.id,
            price_range: label.symbol().to_string(),
        });
    }

    BackfillPlan { updates, skipped }
}

/// Fetch the whole collection, plan, commit one batch, report.
pub async fn run(client: &Client, coll: &Collection<Restaurant>, dry_run: bool) -> Result<()> {
    println!("Fetching all restaurants...");
    let records = db::fetch_all(coll).await?;
    println!("Found {} restaurants", records.len());
    println!("Adding price ranges...\n");

    let staged = plan(&records, &mut rand::thread_rng());
    if staged.skipped > 0 {
        info!("{} restaurants already labelled", staged.skipped);
    }

    if dry_run {
        println!(
            "\nDry run: {} updates staged, nothing written.",
            staged.updates.len()
        );
        return Ok(());
    }
    if staged.updates.is_empty() {
        println!("\nNothing to update.");
        return Ok(());
    }

    db::commit_updates(client, coll, &staged.updates).await?;
    println!(
        "\nSuccessfully updated {} restaurants with price ranges!",
        staged.updates.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(name: &str, rating: Option<f64>, price_range: Option<&str>) -> Restaurant {
        Restaurant {
            id: ObjectId::new(),
            name: Some(name.to_string()),
            rating,
            price_range: price_range.map(str::to_string),
        }
    }

    #[test]
    fn three_record_scenario() {
        // A gets a top-bucket label, B is already labelled, C falls back
        // to the default rating (3.5 → average bucket).
        let records = vec![
            record("A", Some(4.8), None),
            record("B", Some(3.9), Some("£")),
            record("C", None, None),
        ];
        let staged = plan(&records, &mut StdRng::seed_from_u64(1));

        assert_eq!(staged.skipped, 1);
        assert_eq!(staged.updates.len(), 2);

        assert_eq!(staged.updates[0].id, records[0].id);
        assert!(["££", "£££", "££££"].contains(&staged.updates[0].price_range.as_str()));

        assert_eq!(staged.updates[1].id, records[2].id);
        assert!(["£", "££", "£££"].contains(&staged.updates[1].price_range.as_str()));
    }

    #[test]
    fn second_run_is_a_no_op() {
        let mut records = vec![
            record("A", Some(4.8), None),
            record("B", Some(2.1), None),
        ];
        let first = plan(&records, &mut StdRng::seed_from_u64(2));
        assert_eq!(first.updates.len(), 2);

        // Apply the staged writes, then plan again.
        for (r, u) in records.iter_mut().zip(&first.updates) {
            r.price_range = Some(u.price_range.clone());
        }
        let second = plan(&records, &mut StdRng::seed_from_u64(3));
        assert!(second.updates.is_empty());
        assert_eq!(second.skipped, 2);
    }

    #[test]
    fn missing_rating_equals_default() {
        let absent = plan(&[record("X", None, None)], &mut StdRng::seed_from_u64(9));
        let explicit = plan(
            &[record("X", Some(3.5), None)],
            &mut StdRng::seed_from_u64(9),
        );
        assert_eq!(
            absent.updates[0].price_range,
            explicit.updates[0].price_range
        );
    }

    #[test]
    fn zero_rating_equals_default() {
        let zero = plan(&[record("X", Some(0.0), None)], &mut StdRng::seed_from_u64(9));
        let explicit = plan(
            &[record("X", Some(3.5), None)],
            &mut StdRng::seed_from_u64(9),
        );
        assert_eq!(zero.updates[0].price_range, explicit.updates[0].price_range);
    }

    #[test]
    fn empty_collection() {
        let staged = plan(&[], &mut StdRng::seed_from_u64(0));
        assert!(staged.updates.is_empty());
        assert_eq!(staged.skipped, 0);
    }
}
