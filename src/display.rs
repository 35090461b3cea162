use std::fs::File;
use std::io::Write;

use chrono::{Duration, NaiveDate};

use crate::schedule::WeekSchedule;
use crate::slot::Slot;

/// Formats the assignee list of one slot: comma-joined names,
/// or a dash placeholder when nobody was placed.
pub fn format_slot_line(schedule: &WeekSchedule, slot: &Slot) -> String {
    let names: Vec<&str> = schedule
        .assignees(slot)
        .iter()
        .map(|assignment| assignment.name.as_str())
        .collect();
    if names.is_empty() {
        "---".to_string()
    } else {
        names.join(", ")
    }
}

/// Prints the weekly schedule: one section per day with its date,
/// one line per period.
pub fn print_week_schedule(schedule: &WeekSchedule, calendar: &[Slot], week_start: NaiveDate) {
    let mut current_day = None;
    for slot in calendar {
        if current_day != Some(slot.day) {
            let day_date = week_start + Duration::days(slot.day as i64);
            println!("\n{} ({})", slot.day_name(), day_date.format("%Y-%m-%d"));
            current_day = Some(slot.day);
        }
        println!("- {}: {}", slot.period_name(), format_slot_line(schedule, slot));
    }
}

/// Writes the weekly schedule to a file in the same day/period layout.
pub fn write_schedule_to_file(
    schedule: &WeekSchedule,
    calendar: &[Slot],
    week_start: NaiveDate,
    filename: &str,
) -> std::io::Result<()> {
    let mut file = File::create(filename)?;
    writeln!(file, "** Weekly Schedule **")?;

    let mut current_day = None;
    for slot in calendar {
        if current_day != Some(slot.day) {
            let day_date = week_start + Duration::days(slot.day as i64);
            writeln!(file, "\n{} ({})", slot.day_name(), day_date.format("%Y-%m-%d"))?;
            current_day = Some(slot.day);
        }
        writeln!(
            file,
            "- {}: {}",
            slot.period_name(),
            format_slot_line(schedule, slot)
        )?;
    }

    Ok(())
}
