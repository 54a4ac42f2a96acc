use serde_json::{json, Value};

use crate::db::report_repo::{AnnualClientRow, AnnualResourceRow, WeeklyKpis, WeeklyTotal};
use crate::error::WeekloadError;
use crate::models::{Client, Resource, Task};

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &WeekloadError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

pub fn task_json(t: &Task) -> Value {
    json!({
        "id": t.id,
        "name": t.name,
        "notes": t.notes,
        "resource_id": t.resource_id,
        "client_id": t.client_id,
        "deadline": t.deadline.map(|d| d.to_string()),
        "workload": t.workload,
        "workload_days": t.workload_days(),
        "estimated_days": t.estimated_days,
        "task_type": t.task_type.as_str(),
        "is_completed": t.is_completed,
        "is_archived": t.is_archived,
        "week_number": t.week_number,
        "year": t.year,
        "created_at": t.created_at,
        "updated_at": t.updated_at
    })
}

pub fn resource_json(r: &Resource) -> Value {
    json!({
        "id": r.id,
        "name": r.name,
        "color": r.color,
        "photo_url": r.photo_url,
        "show_on_dashboard": r.show_on_dashboard,
        "created_at": r.created_at
    })
}

pub fn client_json(c: &Client) -> Value {
    json!({
        "id": c.id,
        "name": c.name,
        "color": c.color,
        "is_active": c.is_active,
        "created_at": c.created_at
    })
}

pub fn weekly_total_json(t: &WeeklyTotal) -> Value {
    json!({
        "resource_id": t.resource_id,
        "total_workload": t.total_workload,
        "total_days": t.total_workload as f64 / 2.0
    })
}

pub fn kpis_json(k: &WeeklyKpis) -> Value {
    json!({
        "total_estimated": k.total_estimated,
        "total_actual": k.total_actual,
        "variance": k.variance
    })
}

pub fn annual_client_row_json(r: &AnnualClientRow) -> Value {
    json!({
        "client_id": r.client_id,
        "month": r.month,
        "total_workload": r.total_workload,
        "total_days": r.total_workload as f64 / 2.0
    })
}

pub fn annual_resource_row_json(r: &AnnualResourceRow) -> Value {
    json!({
        "resource_id": r.resource_id,
        "month": r.month,
        "total_workload": r.total_workload,
        "total_days": r.total_workload as f64 / 2.0,
        "total_estimated": r.total_estimated
    })
}
