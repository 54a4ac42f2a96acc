//! Pull-based aggregation over the task table. Every call recomputes from
//! the persisted rows; nothing here is cached or materialized.
//!
//! Workload sums stay in half-day units except where a field is explicitly
//! documented as days; conversion for display happens in the output layer.

use rusqlite::{params, Connection};
use serde::Serialize;

use crate::error::WeekloadError;

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyTotal {
    pub resource_id: i64,
    pub total_workload: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyKpis {
    pub total_estimated: f64,
    pub total_actual: f64,
    pub variance: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnualClientRow {
    pub client_id: i64,
    pub month: i64,
    pub total_workload: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnualResourceRow {
    pub resource_id: i64,
    pub month: i64,
    pub total_workload: i64,
    pub total_estimated: i64,
}

/// Sum of workload (half-day units) per resource for one week. Resources
/// with no tasks that week are absent; callers default to 0.
pub fn weekly_totals(
    conn: &Connection,
    week_number: u32,
    year: i32,
) -> Result<Vec<WeeklyTotal>, WeekloadError> {
    let mut stmt = conn.prepare(
        "SELECT resource_id, COALESCE(SUM(workload), 0)
         FROM tasks
         WHERE week_number = ?1 AND year = ?2
         GROUP BY resource_id
         ORDER BY resource_id ASC",
    )?;
    let totals = stmt
        .query_map(params![week_number, year], |row| {
            Ok(WeeklyTotal {
                resource_id: row.get(0)?,
                total_workload: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(totals)
}

/// Estimated vs. actual days for one week. Estimates are stored in days;
/// actuals are summed half-days converted here. Positive variance means
/// more time was logged than estimated.
pub fn weekly_kpis(
    conn: &Connection,
    week_number: u32,
    year: i32,
) -> Result<WeeklyKpis, WeekloadError> {
    let (estimated, workload): (i64, i64) = conn.query_row(
        "SELECT COALESCE(SUM(estimated_days), 0), COALESCE(SUM(workload), 0)
         FROM tasks
         WHERE week_number = ?1 AND year = ?2",
        params![week_number, year],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    let total_estimated = estimated as f64;
    let total_actual = workload as f64 / 2.0;
    Ok(WeeklyKpis {
        total_estimated,
        total_actual,
        variance: total_actual - total_estimated,
    })
}

// Month bucketing is week_number / 4.33 + 0.9999, truncated. A deliberate
// heuristic, not a calendar lookup: weeks 48-52 can land on month 13,
// which the display layer drops.
const MONTH_BUCKET: &str = "CAST(week_number / 4.33 + 0.9999 AS INTEGER)";

pub fn annual_by_client(
    conn: &Connection,
    year: i32,
) -> Result<Vec<AnnualClientRow>, WeekloadError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT client_id, {MONTH_BUCKET} AS month, COALESCE(SUM(workload), 0)
         FROM tasks
         WHERE year = ?1
         GROUP BY client_id, month
         ORDER BY client_id ASC, month ASC"
    ))?;
    let rows = stmt
        .query_map(params![year], |row| {
            Ok(AnnualClientRow {
                client_id: row.get(0)?,
                month: row.get(1)?,
                total_workload: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn annual_by_resource(
    conn: &Connection,
    year: i32,
) -> Result<Vec<AnnualResourceRow>, WeekloadError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT resource_id, {MONTH_BUCKET} AS month, COALESCE(SUM(workload), 0),
                COALESCE(SUM(estimated_days), 0)
         FROM tasks
         WHERE year = ?1
         GROUP BY resource_id, month
         ORDER BY resource_id ASC, month ASC"
    ))?;
    let rows = stmt
        .query_map(params![year], |row| {
            Ok(AnnualResourceRow {
                resource_id: row.get(0)?,
                month: row.get(1)?,
                total_workload: row.get(2)?,
                total_estimated: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
