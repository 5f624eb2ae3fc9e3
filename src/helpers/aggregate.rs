use std::collections::HashMap;
use tracing::{debug, info};

use crate::models::time_entry::{EmployeeSummary, TimeEntry};

/// Sums entry durations per employee name and orders the result by total
/// hours, highest first.
///
/// Soft-deleted entries and entries without a name are skipped. Names are
/// matched exactly. Employees with equal totals keep the order in which their
/// name was first seen.
pub fn aggregate(entries: &[TimeEntry]) -> Vec<EmployeeSummary> {
    let mut summaries: Vec<EmployeeSummary> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut skipped = 0;

    for entry in entries {
        let name = match entry.employee_name.as_deref() {
            Some(name) if entry.is_reportable() => name,
            _ => {
                skipped += 1;
                continue;
            }
        };

        let hours = entry.duration_hours();
        match positions.get(name) {
            Some(&index) => summaries[index].total_hours += hours,
            None => {
                positions.insert(name, summaries.len());
                summaries.push(EmployeeSummary {
                    name: name.to_string(),
                    total_hours: hours,
                });
            }
        }
    }

    // sort_by is stable, ties stay in first-seen order
    summaries.sort_by(|a, b| b.total_hours.total_cmp(&a.total_hours));

    debug!("Skipped {} deleted or unnamed entries", skipped);
    info!(
        "Aggregated {} entries into {} employee summaries",
        entries.len() - skipped,
        summaries.len()
    );

    summaries
}
