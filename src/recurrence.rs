// recurrence.rs
// Pure next-due-date arithmetic for recurring templates.

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::Frequency;

/// Computes the next due date strictly after `reference` for a template
/// anchored at `anchor`.
///
/// Monthly cadence is a fixed 30-day interval counted from the anchor, not
/// "same day next calendar month": periods stay aligned to the anchor no
/// matter how late a run happens, at the cost of drifting through the
/// calendar over a year. Downstream data depends on that cadence, so it must
/// not be "corrected" to calendar months.
pub fn next_due(anchor: NaiveDate, frequency: Frequency, reference: NaiveDate) -> NaiveDate {
    match frequency {
        Frequency::Daily => reference + Duration::days(1),
        Frequency::Weekly => reference + Duration::days(7),
        Frequency::Monthly => next_monthly(anchor, reference),
        Frequency::Yearly => next_yearly(anchor, reference),
    }
}

fn next_monthly(anchor: NaiveDate, reference: NaiveDate) -> NaiveDate {
    let elapsed = (reference - anchor).num_days();
    let periods = elapsed.div_euclid(30);
    let mut candidate = anchor + Duration::days((periods + 1) * 30);
    if candidate <= reference {
        // same-day repeat or clock skew: move to the following period
        candidate = candidate + Duration::days(30);
    }
    candidate
}

fn next_yearly(anchor: NaiveDate, reference: NaiveDate) -> NaiveDate {
    let candidate = anchor_day_in_year(anchor, reference.year());
    if candidate <= reference {
        anchor_day_in_year(anchor, reference.year() + 1)
    } else {
        candidate
    }
}

// Feb 29 anchors clamp to the last day of February outside leap years.
fn anchor_day_in_year(anchor: NaiveDate, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, anchor.month(), anchor.day()).unwrap_or_else(|| {
        let next_month = if anchor.month() == 12 { 1 } else { anchor.month() + 1 };
        let next_year = if anchor.month() == 12 { year + 1 } else { year };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .unwrap()
            .pred_opt()
            .unwrap()
    })
}
