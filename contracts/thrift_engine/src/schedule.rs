use crate::storage::{PayoutFrequency, SECONDS_PER_DAY};

/// Payout date for a rotation position
///
/// Formula: scheduled_date = cycle_start_date + (position - 1) × period
///
/// Weekly and biweekly periods are fixed day counts. Monthly adds calendar
/// months to the start date, keeping the time of day and clamping the day to
/// the end of shorter months (Jan 31 → Feb 29 → Mar 31, always measured from
/// the start date so clamping never accumulates).
///
/// Example (monthly, start 2024-01-01):
/// - position 1: 2024-01-01
/// - position 2: 2024-02-01
/// - position 3: 2024-03-01
pub fn scheduled_date(cycle_start_date: u64, frequency: PayoutFrequency, position: u32) -> Option<u64> {
    let index = position.checked_sub(1)? as u64;
    match frequency {
        PayoutFrequency::Weekly => add_days(cycle_start_date, index.checked_mul(7)?),
        PayoutFrequency::Biweekly => add_days(cycle_start_date, index.checked_mul(14)?),
        PayoutFrequency::Monthly => add_months(cycle_start_date, index),
    }
}

fn add_days(timestamp: u64, days: u64) -> Option<u64> {
    timestamp.checked_add(days.checked_mul(SECONDS_PER_DAY)?)
}

fn add_months(timestamp: u64, months: u64) -> Option<u64> {
    let days = timestamp / SECONDS_PER_DAY;
    let time_of_day = timestamp % SECONDS_PER_DAY;
    let (year, month, day) = civil_from_days(days);

    let month_index = year
        .checked_mul(12)?
        .checked_add(month as u64 - 1)?
        .checked_add(months)?;
    let new_year = month_index / 12;
    let new_month = (month_index % 12) as u32 + 1;
    let new_day = day.min(days_in_month(new_year, new_month));

    days_from_civil(new_year, new_month, new_day)
        .checked_mul(SECONDS_PER_DAY)?
        .checked_add(time_of_day)
}

fn is_leap_year(year: u64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u64, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

// Proleptic Gregorian conversions over days since 1970-01-01. Eras are
// 400-year blocks starting on March 1st so the leap day falls last.
const DAYS_TO_EPOCH: u64 = 719_468;
const DAYS_PER_ERA: u64 = 146_097;

fn days_from_civil(year: u64, month: u32, day: u32) -> u64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year / 400;
    let year_of_era = year - era * 400;
    let shifted_month = (month as u64 + 9) % 12;
    let day_of_year = (153 * shifted_month + 2) / 5 + day as u64 - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * DAYS_PER_ERA + day_of_era - DAYS_TO_EPOCH
}

fn civil_from_days(days: u64) -> (u64, u32, u32) {
    let z = days + DAYS_TO_EPOCH;
    let era = z / DAYS_PER_ERA;
    let day_of_era = z - era * DAYS_PER_ERA;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let shifted_month = (5 * day_of_year + 2) / 153;
    let day = (day_of_year - (153 * shifted_month + 2) / 5 + 1) as u32;
    let month = if shifted_month < 10 {
        (shifted_month + 3) as u32
    } else {
        (shifted_month - 9) as u32
    };
    let year = year_of_era + era * 400;
    (if month <= 2 { year + 1 } else { year }, month, day)
}
