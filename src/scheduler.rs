// scheduler.rs
// One materialization pass: due-template selection behind the posting
// cutover, idempotent transaction creation, and next-run advancement.

use anyhow::{Context, Result};
use chrono::{DateTime as ChronoDateTime, FixedOffset, NaiveDate, Offset, Timelike, Utc};
use mongodb::bson::oid::ObjectId;

use crate::{
    models::RecurringTemplate,
    recurrence::next_due,
    state::{
        AppState, bson_midnight, claim_next_run_date, create_transaction, list_active_templates,
        release_next_run_claim, transaction_exists_for,
    },
};

/// The ledger's reference timezone (IST); due days and the cutover are
/// evaluated against it.
pub const POSTING_UTC_OFFSET_MINUTES: i32 = 330;
/// Hour of the posting day before which due occurrences are held back.
pub const POSTING_CUTOVER_HOUR: u32 = 4;

const AUTO_NOTE: &str = "auto-generated";

/// Time source, injectable so batch runs are testable at fixed instants.
pub trait Clock: Send + Sync {
    fn now(&self) -> ChronoDateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> ChronoDateTime<Utc> {
        Utc::now()
    }
}

/// Aggregated outcome counters for one batch pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    pub created: u64,
    pub skipped: u64,
    pub errors: u64,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MaterializeOutcome {
    Created(ObjectId),
    SkippedDuplicate,
}

fn posting_now(clock: &dyn Clock) -> ChronoDateTime<FixedOffset> {
    let offset =
        FixedOffset::east_opt(POSTING_UTC_OFFSET_MINUTES * 60).unwrap_or_else(|| Utc.fix());
    clock.now().with_timezone(&offset)
}

fn is_past_cutover(local_now: &ChronoDateTime<FixedOffset>) -> bool {
    local_now.hour() >= POSTING_CUTOVER_HOUR
}

/// Materializes one due occurrence: duplicate check, atomic claim of the
/// next-run pointer, then the ledger write.
///
/// The claim keeps overlapping batch invocations from posting the same
/// occurrence twice; the duplicate check catches transactions that outlived
/// a failed pointer update in earlier data.
pub async fn materialize_template(
    state: &AppState,
    user_id: &ObjectId,
    template: &RecurringTemplate,
    due_date: NaiveDate,
) -> Result<MaterializeOutcome> {
    let template_id = template.id.as_ref().context("template missing _id")?;
    let current_next_run = template
        .next_run_date
        .context("template missing next_run_date")?;

    if transaction_exists_for(state, user_id, template_id, due_date).await? {
        return Ok(MaterializeOutcome::SkippedDuplicate);
    }

    // The recurrence reference is the occurrence being posted, never "now";
    // that keeps the anchor chain exact across late or repeated runs.
    let anchor = template.anchor_date.to_chrono().date_naive();
    let new_next_run = next_due(anchor, template.effective_frequency(), due_date);
    let claimed_value = bson_midnight(new_next_run);

    if !claim_next_run_date(state, template_id, current_next_run, claimed_value).await? {
        // another invocation got here first
        return Ok(MaterializeOutcome::SkippedDuplicate);
    }

    match create_transaction(
        state,
        user_id,
        due_date,
        &template.name,
        template.kind,
        &template.category,
        &template.payment_method,
        template.amount,
        Some(template_id.clone()),
        Some(AUTO_NOTE.to_string()),
    )
    .await
    {
        Ok(transaction_id) => Ok(MaterializeOutcome::Created(transaction_id)),
        Err(err) => {
            // put the pointer back so the occurrence stays due next pass
            let _ =
                release_next_run_claim(state, template_id, claimed_value, current_next_run).await;
            Err(err)
        }
    }
}

/// Runs one batch pass for a user: loads active templates, posts every due
/// occurrence past the cutover, and aggregates per-item outcomes.
///
/// A failure to list templates aborts the pass; per-template failures are
/// counted and the loop continues, since templates are independent.
pub async fn run_batch(
    state: &AppState,
    user_id: &ObjectId,
    clock: &dyn Clock,
) -> Result<BatchStats> {
    let templates = list_active_templates(state, user_id).await?;

    let local_now = posting_now(clock);
    let today = local_now.date_naive();
    let past_cutover = is_past_cutover(&local_now);

    let mut stats = BatchStats::default();
    for template in templates {
        let Some(next_run) = template.next_run_date else {
            stats.skipped += 1;
            continue;
        };
        let due_date = next_run.to_chrono().date_naive();
        if due_date > today || !past_cutover {
            stats.skipped += 1;
            continue;
        }

        match materialize_template(state, user_id, &template, due_date).await {
            Ok(MaterializeOutcome::Created(_)) => stats.created += 1,
            Ok(MaterializeOutcome::SkippedDuplicate) => stats.skipped += 1,
            Err(err) => {
                eprintln!(
                    "recurring template '{}' failed to materialize: {err:?}",
                    template.name
                );
                stats.errors += 1;
            }
        }
    }

    Ok(stats)
}
