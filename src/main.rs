// main.rs
// Batch entry point: an external scheduler (cron or similar) runs this
// binary; it performs one materialization pass per template owner, prints
// aggregated stats, and exits.

use dotenvy::dotenv;

use autopost::{
    scheduler::{BatchStats, SystemClock, run_batch},
    state::{init_state, list_template_user_ids},
};

#[tokio::main]
async fn main() {
    dotenv().ok();

    let state = init_state()
        .await
        .expect("failed to initialize MongoDB state");

    let user_ids = list_template_user_ids(&state)
        .await
        .expect("failed to list template owners");

    let clock = SystemClock;
    let mut totals = BatchStats::default();
    for user_id in user_ids {
        match run_batch(&state, &user_id, &clock).await {
            Ok(stats) => {
                println!(
                    "user {}: created {} skipped {} errors {}",
                    user_id.to_hex(),
                    stats.created,
                    stats.skipped,
                    stats.errors
                );
                totals.created += stats.created;
                totals.skipped += stats.skipped;
                totals.errors += stats.errors;
            }
            Err(err) => {
                eprintln!("user {}: batch aborted: {err:?}", user_id.to_hex());
                totals.errors += 1;
            }
        }
    }

    println!(
        "batch done: created {} skipped {} errors {}",
        totals.created, totals.skipped, totals.errors
    );
}
