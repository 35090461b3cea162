use serde::{Deserialize, Serialize};

use crate::slot::Slot;

/// A registered student and the shifts they declared themselves available for.
///
/// The numeric id is assigned by the roster store and is the identity used
/// everywhere: load counters and assignment lists key on it, so two students
/// who happen to share a display name never share a weekly cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: u32,
    pub name: String,
    pub availability: Vec<Slot>,
}

impl Student {
    pub fn is_available(&self, slot: &Slot) -> bool {
        self.availability.contains(slot)
    }
}
