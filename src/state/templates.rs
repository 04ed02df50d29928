// Template store access: listing, creation, and next-run claims.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use futures::stream::TryStreamExt;
use mongodb::bson::{DateTime, doc, oid::ObjectId};
use std::time::SystemTime;

use crate::models::{Frequency, RecurringTemplate, TemplateStatus, TransactionKind};

use super::{AppState, transactions::bson_midnight};

/// Lists the templates eligible for materialization, normalizing the legacy
/// `is_active` flag into the status enum at the read boundary.
pub async fn list_active_templates(
    state: &AppState,
    user_id: &ObjectId,
) -> Result<Vec<RecurringTemplate>> {
    let mut cursor = state.templates.find(doc! { "user_id": user_id }).await?;
    let mut items = Vec::new();
    while let Some(template) = cursor.try_next().await? {
        if template.effective_status() == TemplateStatus::Active {
            items.push(template);
        }
    }
    Ok(items)
}

pub async fn get_template_by_id(
    state: &AppState,
    id: &ObjectId,
) -> Result<Option<RecurringTemplate>> {
    state
        .templates
        .find_one(doc! { "_id": id })
        .await
        .map_err(Into::into)
}

/// Every user owning at least one template, for the batch entry point.
pub async fn list_template_user_ids(state: &AppState) -> Result<Vec<ObjectId>> {
    let values = state.templates.distinct("user_id", doc! {}).await?;
    Ok(values.into_iter().filter_map(|v| v.as_object_id()).collect())
}

pub async fn create_template(
    state: &AppState,
    user_id: &ObjectId,
    name: &str,
    category: &str,
    payment_method: &str,
    amount: f64,
    kind: TransactionKind,
    frequency: Frequency,
    anchor_date: NaiveDate,
    next_run_date: NaiveDate,
    status: TemplateStatus,
) -> Result<ObjectId> {
    let res = state
        .templates
        .insert_one(RecurringTemplate {
            id: None,
            user_id: user_id.clone(),
            name: name.to_string(),
            category: category.to_string(),
            payment_method: payment_method.to_string(),
            amount,
            kind,
            frequency: Some(frequency.as_str().to_string()),
            anchor_date: bson_midnight(anchor_date),
            next_run_date: Some(bson_midnight(next_run_date)),
            status: Some(status.as_str().to_string()),
            is_active: None,
            created_at: Some(DateTime::from_system_time(SystemTime::now())),
            updated_at: None,
        })
        .await?;
    res.inserted_id
        .as_object_id()
        .context("template insert missing _id")
}

/// Atomically advances `next_run_date` from `expected` to `new_date`,
/// claiming the due occurrence. Returns false when another invocation
/// already moved the pointer.
pub async fn claim_next_run_date(
    state: &AppState,
    template_id: &ObjectId,
    expected: DateTime,
    new_date: DateTime,
) -> Result<bool> {
    let res = state
        .templates
        .update_one(
            doc! { "_id": template_id, "next_run_date": expected },
            doc! { "$set": {
                "next_run_date": new_date,
                "updated_at": DateTime::from_system_time(SystemTime::now()),
            } },
        )
        .await?;
    Ok(res.modified_count == 1)
}

/// Reverse of [`claim_next_run_date`]: restores the pointer after a failed
/// transaction write so the occurrence stays due.
pub async fn release_next_run_claim(
    state: &AppState,
    template_id: &ObjectId,
    claimed: DateTime,
    previous: DateTime,
) -> Result<()> {
    state
        .templates
        .update_one(
            doc! { "_id": template_id, "next_run_date": claimed },
            doc! { "$set": {
                "next_run_date": previous,
                "updated_at": DateTime::from_system_time(SystemTime::now()),
            } },
        )
        .await?;
    Ok(())
}
