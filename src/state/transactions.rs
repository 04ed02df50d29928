// Transaction store access: creation and duplicate-occurrence lookups.

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveTime};
use futures::stream::TryStreamExt;
use mongodb::bson::{DateTime, doc, oid::ObjectId};
use std::time::SystemTime;

use crate::models::{Transaction, TransactionKind};

use super::AppState;

/// Midnight UTC of a calendar date, the canonical form of stored `date`
/// fields.
pub fn bson_midnight(date: NaiveDate) -> DateTime {
    DateTime::from_chrono(date.and_time(NaiveTime::MIN).and_utc())
}

fn day_bounds(date: NaiveDate) -> (DateTime, DateTime) {
    (bson_midnight(date), bson_midnight(date + Duration::days(1)))
}

/// True when the template already produced a transaction on this calendar
/// day, whatever time-of-day the row carries. Backed by the `template_date`
/// index.
pub async fn transaction_exists_for(
    state: &AppState,
    user_id: &ObjectId,
    template_id: &ObjectId,
    date: NaiveDate,
) -> Result<bool> {
    let (start, end) = day_bounds(date);
    let found = state
        .transactions
        .find_one(doc! {
            "user_id": user_id,
            "recurring_template_id": template_id,
            "date": { "$gte": start, "$lt": end },
        })
        .await?;
    Ok(found.is_some())
}

pub async fn create_transaction(
    state: &AppState,
    user_id: &ObjectId,
    date: NaiveDate,
    description: &str,
    kind: TransactionKind,
    category: &str,
    payment_method: &str,
    amount: f64,
    recurring_template_id: Option<ObjectId>,
    note: Option<String>,
) -> Result<ObjectId> {
    let res = state
        .transactions
        .insert_one(Transaction {
            id: None,
            user_id: user_id.clone(),
            date: bson_midnight(date),
            description: description.to_string(),
            kind,
            category: category.to_string(),
            payment_method: payment_method.to_string(),
            amount,
            recurring_template_id,
            note,
            created_at: Some(DateTime::from_system_time(SystemTime::now())),
            updated_at: None,
        })
        .await?;
    res.inserted_id
        .as_object_id()
        .context("transaction insert missing _id")
}

pub async fn list_transactions(state: &AppState, user_id: &ObjectId) -> Result<Vec<Transaction>> {
    let mut cursor = state.transactions.find(doc! { "user_id": user_id }).await?;
    let mut items = Vec::new();
    while let Some(transaction) = cursor.try_next().await? {
        items.push(transaction);
    }
    Ok(items)
}
