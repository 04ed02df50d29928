// state module: AppState, initialization, and re-exports of submodules.

use anyhow::Result;
use mongodb::{Client, Collection};
use std::env;

use crate::models::{RecurringTemplate, Transaction};

mod seed;
mod templates;
mod transactions;

pub use templates::*;
pub use transactions::*;

#[derive(Clone)]
pub struct AppState {
    pub templates: Collection<RecurringTemplate>,
    pub transactions: Collection<Transaction>,
}

pub async fn init_state() -> Result<AppState> {
    let uri = env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let db_name = env::var("MONGODB_DB").unwrap_or_else(|_| "autopost".to_string());

    let client = Client::with_uri_str(uri).await?;
    let db = client.database(&db_name);

    seed::ensure_collections(&db).await?;
    seed::seed_sample_templates(&db).await?;

    Ok(AppState {
        templates: db.collection::<RecurringTemplate>("recurring_templates"),
        transactions: db.collection::<Transaction>("transactions"),
    })
}
