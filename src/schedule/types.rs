use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::slot::Slot;

/// One student placed on one shift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftAssignment {
    pub student_id: u32,
    pub name: String,
}

/// The assignment table for one allocation run: every calendar slot maps to
/// the students placed on it, in assignment order.
#[derive(Debug, Clone, Default)]
pub struct WeekSchedule {
    pub assignments: HashMap<Slot, Vec<ShiftAssignment>>,
}

impl WeekSchedule {
    /// Assignees of one slot; empty for slots the table does not know.
    pub fn assignees(&self, slot: &Slot) -> &[ShiftAssignment] {
        self.assignments
            .get(slot)
            .map(|assigned| assigned.as_slice())
            .unwrap_or(&[])
    }

    /// Total shifts one student received across the whole week.
    pub fn load_of(&self, student_id: u32) -> usize {
        self.assignments
            .values()
            .flatten()
            .filter(|assignment| assignment.student_id == student_id)
            .count()
    }

    /// Total assignments across all slots.
    pub fn total_assignments(&self) -> usize {
        self.assignments.values().map(|assigned| assigned.len()).sum()
    }
}
