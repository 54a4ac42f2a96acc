use std::collections::HashMap;

use crate::db::report_repo::{AnnualClientRow, AnnualResourceRow, WeeklyKpis, WeeklyTotal};
use crate::models::{Client, Resource, Task};
use crate::week;

pub fn print_task(t: &Task) {
    println!("Task: {} ({})", t.name, t.id);
    if let Some(ref notes) = t.notes {
        println!("  Notes: {notes}");
    }
    println!("  Resource: {}  Client: {}", t.resource_id, t.client_id);
    println!(
        "  Week: {}/{}  Type: {}",
        week::format_week(t.week_number),
        t.year,
        t.task_type.as_str()
    );
    println!(
        "  Workload: {} half-days ({:.1}d)  Estimated: {}d",
        t.workload,
        t.workload_days(),
        t.estimated_days
    );
    if let Some(deadline) = t.deadline {
        println!("  Deadline: {deadline}");
    }
    println!(
        "  Completed: {}  Archived: {}",
        t.is_completed, t.is_archived
    );
}

pub fn print_task_list(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    for t in tasks {
        let mark = if t.is_completed { "x" } else { " " };
        println!(
            "  [{mark}] #{} {} r{} c{} {:.1}d/{}d",
            t.id, t.name, t.resource_id, t.client_id, t.workload_days(), t.estimated_days
        );
    }
}

pub fn print_resource_list(resources: &[Resource]) {
    if resources.is_empty() {
        println!("No resources found.");
        return;
    }
    for r in resources {
        let hidden = if r.show_on_dashboard { "" } else { " (hidden)" };
        println!("  #{} {} {}{hidden}", r.id, r.name, r.color);
    }
}

pub fn print_client_list(clients: &[Client]) {
    if clients.is_empty() {
        println!("No clients found.");
        return;
    }
    for c in clients {
        let inactive = if c.is_active { "" } else { " (inactive)" };
        println!("  #{} {} {}{inactive}", c.id, c.name, c.color);
    }
}

/// Per-resource totals for one week, in days. Only dashboard resources are
/// listed; resources without tasks show 0.0.
pub fn print_weekly_totals(week_number: u32, year: i32, resources: &[Resource], totals: &[WeeklyTotal]) {
    println!("Totals for {}/{year}:", week::format_week(week_number));
    let by_resource: HashMap<i64, i64> = totals
        .iter()
        .map(|t| (t.resource_id, t.total_workload))
        .collect();
    for r in resources.iter().filter(|r| r.show_on_dashboard) {
        let units = by_resource.get(&r.id).copied().unwrap_or(0);
        println!("  {}: {:.1}d", r.name, units as f64 / 2.0);
    }
}

pub fn print_kpis(week_number: u32, year: i32, kpis: &WeeklyKpis) {
    println!("KPIs for {}/{year}:", week::format_week(week_number));
    println!("  Estimated: {:.1}d", kpis.total_estimated);
    println!("  Actual:    {:.1}d", kpis.total_actual);
    println!("  Variance:  {:+.1}d", kpis.variance);
}

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Annual matrix per client, months across, days in the cells. Rows with a
/// month outside 1..=12 (the week 48-52 heuristic overflow) are dropped.
pub fn print_annual_by_client(year: i32, clients: &[Client], rows: &[AnnualClientRow], show_all: bool) {
    let mut by_client: HashMap<i64, [f64; 12]> = HashMap::new();
    for row in rows {
        if (1..=12).contains(&row.month) {
            let months = by_client.entry(row.client_id).or_insert([0.0; 12]);
            months[(row.month - 1) as usize] += row.total_workload as f64 / 2.0;
        }
    }

    println!("Annual workload by client, {year} (days):");
    println!("  {:<20} {}", "Client", MONTHS.join("   "));
    let mut monthly_totals = [0.0f64; 12];
    for client in clients {
        let months = by_client.get(&client.id).copied().unwrap_or([0.0; 12]);
        let total: f64 = months.iter().sum();
        if !show_all && total == 0.0 {
            continue;
        }
        for (i, value) in months.iter().enumerate() {
            monthly_totals[i] += value;
        }
        let cells: Vec<String> = months.iter().map(|v| format!("{v:>5.1}")).collect();
        println!("  {:<20} {}", client.name, cells.join(" "));
    }
    let cells: Vec<String> = monthly_totals.iter().map(|v| format!("{v:>5.1}")).collect();
    println!("  {:<20} {}", "TOTAL", cells.join(" "));
}

/// Annual real-vs-estimated per resource, dashboard resources only.
pub fn print_annual_by_resource(year: i32, resources: &[Resource], rows: &[AnnualResourceRow]) {
    let mut real: HashMap<i64, [f64; 12]> = HashMap::new();
    let mut estimated: HashMap<i64, [f64; 12]> = HashMap::new();
    for row in rows {
        if (1..=12).contains(&row.month) {
            let idx = (row.month - 1) as usize;
            real.entry(row.resource_id).or_insert([0.0; 12])[idx] +=
                row.total_workload as f64 / 2.0;
            estimated.entry(row.resource_id).or_insert([0.0; 12])[idx] +=
                row.total_estimated as f64;
        }
    }

    println!("Annual workload by resource, {year} (days):");
    println!("  {:<20} {}", "Resource", MONTHS.join("   "));
    for resource in resources.iter().filter(|r| r.show_on_dashboard) {
        let real_months = real.get(&resource.id).copied().unwrap_or([0.0; 12]);
        let est_months = estimated.get(&resource.id).copied().unwrap_or([0.0; 12]);
        let real_cells: Vec<String> = real_months.iter().map(|v| format!("{v:>5.1}")).collect();
        let est_cells: Vec<String> = est_months.iter().map(|v| format!("{v:>5.1}")).collect();
        println!("  {:<20} {}", resource.name, real_cells.join(" "));
        println!("  {:<20} {}", "  (estimated)", est_cells.join(" "));
    }
}
