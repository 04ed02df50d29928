// Seed helpers: collection and index setup plus optional sample templates.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use mongodb::{
    Collection, Database,
    bson::{DateTime, doc, oid::ObjectId},
};
use serde::de::DeserializeOwned;
use std::{env, fs, time::SystemTime};

use crate::models::{RecurringTemplate, SeedTemplate, TemplateStatus, Transaction};

use super::transactions::bson_midnight;

pub(super) async fn ensure_collections(db: &Database) -> Result<()> {
    let existing = db.list_collection_names().await?;
    if !existing.iter().any(|name| name == "recurring_templates") {
        db.create_collection("recurring_templates").await?;
    }
    if !existing.iter().any(|name| name == "transactions") {
        db.create_collection("transactions").await?;
    }
    // Index backing the duplicate-occurrence lookup
    let tx_coll = db.collection::<Transaction>("transactions");
    tx_coll
        .create_index(
            mongodb::IndexModel::builder()
                .keys(doc! { "recurring_template_id": 1, "date": 1 })
                .options(
                    mongodb::options::IndexOptions::builder()
                        .name("template_date".to_string())
                        .build(),
                )
                .build(),
        )
        .await
        .ok();
    Ok(())
}

fn load_json_array<T: DeserializeOwned>(env_key: &str, default_path: &str) -> Result<Vec<T>> {
    let path = env::var(env_key).unwrap_or_else(|_| default_path.to_string());
    if let Ok(contents) = fs::read_to_string(&path) {
        let parsed = serde_json::from_str::<Vec<T>>(&contents)?;
        Ok(parsed)
    } else {
        Ok(Vec::new())
    }
}

/// Seeds demo templates into a fresh database; a missing seed file means no
/// seeds, not an error.
pub(super) async fn seed_sample_templates(db: &Database) -> Result<()> {
    let coll = db.collection::<RecurringTemplate>("recurring_templates");
    if !is_collection_empty(&coll).await? {
        return Ok(());
    }

    let seeds: Vec<SeedTemplate> = load_json_array("TEMPLATES_FILE", "./data/templates.json")?;
    if seeds.is_empty() {
        return Ok(());
    }

    let user_id = ObjectId::new();
    for seed in seeds {
        let anchor = parse_seed_date(&seed.anchor_date)
            .with_context(|| format!("bad anchor_date in seed template {}", seed.name))?;
        let next_run = match seed.next_run_date.as_deref() {
            Some(value) => parse_seed_date(value)
                .with_context(|| format!("bad next_run_date in seed template {}", seed.name))?,
            None => anchor,
        };

        coll.insert_one(RecurringTemplate {
            id: None,
            user_id: user_id.clone(),
            name: seed.name,
            category: seed.category,
            payment_method: seed.payment_method,
            amount: seed.amount,
            kind: seed.kind,
            frequency: Some(seed.frequency),
            anchor_date: bson_midnight(anchor),
            next_run_date: Some(bson_midnight(next_run)),
            status: Some(TemplateStatus::Active.as_str().to_string()),
            is_active: None,
            created_at: Some(DateTime::from_system_time(SystemTime::now())),
            updated_at: None,
        })
        .await?;
    }
    Ok(())
}

fn parse_seed_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(Into::into)
}

async fn is_collection_empty<T: Send + Sync>(coll: &Collection<T>) -> Result<bool> {
    let count = coll.estimated_document_count().await?;
    Ok(count == 0)
}
