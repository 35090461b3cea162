use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Result, RosterError};
use crate::slot::Slot;
use crate::student::Student;

use super::types::{ShiftAssignment, WeekSchedule};

/// Capacity rules for one allocation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorConfig {
    /// Most shifts any one student may receive in a week.
    pub max_per_week: u32,
    /// Most students placed on any one shift.
    pub vacancies_per_shift: usize,
}

impl Default for AllocatorConfig {
    fn default() -> AllocatorConfig {
        AllocatorConfig {
            max_per_week: 3,
            vacancies_per_shift: 4,
        }
    }
}

impl AllocatorConfig {
    /// Rejects non-positive caps before any computation runs.
    pub fn validate(&self) -> Result<()> {
        if self.max_per_week == 0 {
            return Err(RosterError::InvalidConfig(
                "max_per_week must be positive".to_string(),
            ));
        }
        if self.vacancies_per_shift == 0 {
            return Err(RosterError::InvalidConfig(
                "vacancies_per_shift must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builds the weekly assignment table.
///
/// Slots are processed in calendar order. For each slot the candidates are
/// the students whose availability contains the slot and whose load is still
/// under `max_per_week`; a uniformly shuffled prefix of them fills the
/// vacancies. The shuffle is the only fairness mechanism: over repeated runs
/// it keeps early-registered students from monopolizing popular shifts.
///
/// Every calendar slot appears in the returned table, with an empty list
/// when no candidate was left for it. An empty roster yields an all-empty
/// table; the only error is an invalid configuration, surfaced before any
/// slot is touched.
pub fn allocate<R: Rng>(
    students: &[Student],
    calendar: &[Slot],
    config: &AllocatorConfig,
    rng: &mut R,
) -> Result<WeekSchedule> {
    config.validate()?;

    let mut assignments: HashMap<Slot, Vec<ShiftAssignment>> = HashMap::new();
    let mut load: HashMap<u32, u32> = HashMap::new();

    for slot in calendar {
        let mut candidates: Vec<&Student> = students
            .iter()
            .filter(|student| {
                student.is_available(slot)
                    && load.get(&student.id).copied().unwrap_or(0) < config.max_per_week
            })
            .collect();
        candidates.shuffle(rng);

        let mut assigned = Vec::new();
        for student in candidates.into_iter().take(config.vacancies_per_shift) {
            assigned.push(ShiftAssignment {
                student_id: student.id,
                name: student.name.clone(),
            });
            *load.entry(student.id).or_insert(0) += 1;
        }
        assignments.insert(*slot, assigned);
    }

    Ok(WeekSchedule { assignments })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::week_calendar;
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    fn student(id: u32, name: &str, tokens: &[&str]) -> Student {
        Student {
            id,
            name: name.to_string(),
            availability: tokens
                .iter()
                .map(|t| Slot::parse_token(t).unwrap())
                .collect(),
        }
    }

    fn everywhere() -> Vec<&'static str> {
        vec![
            "0-0", "0-1", "0-2", "1-0", "1-1", "1-2", "2-0", "2-1", "2-2", "3-0", "3-1", "3-2",
            "4-0", "4-1", "4-2", "5-0", "6-0", "6-1", "6-2",
        ]
    }

    #[test]
    fn zero_max_per_week_is_rejected() {
        let config = AllocatorConfig {
            max_per_week: 0,
            ..AllocatorConfig::default()
        };
        let mut rng = ChaChaRng::seed_from_u64(0);
        let err = allocate(&[], &week_calendar(), &config, &mut rng).unwrap_err();
        assert!(matches!(err, RosterError::InvalidConfig(_)));
    }

    #[test]
    fn zero_vacancies_is_rejected() {
        let config = AllocatorConfig {
            vacancies_per_shift: 0,
            ..AllocatorConfig::default()
        };
        let mut rng = ChaChaRng::seed_from_u64(0);
        assert!(allocate(&[], &week_calendar(), &config, &mut rng).is_err());
    }

    #[test]
    fn empty_roster_yields_all_empty_slots() {
        let calendar = week_calendar();
        let mut rng = ChaChaRng::seed_from_u64(1);
        let schedule =
            allocate(&[], &calendar, &AllocatorConfig::default(), &mut rng).unwrap();

        assert_eq!(schedule.assignments.len(), calendar.len());
        for slot in &calendar {
            assert!(schedule.assignees(slot).is_empty());
        }
    }

    #[test]
    fn one_student_available_everywhere_gets_exactly_max_per_week() {
        let students = vec![student(1, "Ana", &everywhere())];
        let calendar = week_calendar();
        let mut rng = ChaChaRng::seed_from_u64(2);
        let schedule =
            allocate(&students, &calendar, &AllocatorConfig::default(), &mut rng).unwrap();

        assert_eq!(schedule.load_of(1), 3);
        assert_eq!(schedule.total_assignments(), 3);
    }

    #[test]
    fn five_students_for_one_slot_fill_four_vacancies() {
        let students: Vec<Student> = (1..=5)
            .map(|id| student(id, &format!("Student {}", id), &["0-0"]))
            .collect();
        let calendar = week_calendar();
        let mut rng = ChaChaRng::seed_from_u64(3);
        let schedule =
            allocate(&students, &calendar, &AllocatorConfig::default(), &mut rng).unwrap();

        let first_slot = Slot::parse_token("0-0").unwrap();
        assert_eq!(schedule.assignees(&first_slot).len(), 4);
        assert_eq!(schedule.total_assignments(), 4);

        let left_out: Vec<u32> = (1..=5)
            .filter(|id| schedule.load_of(*id) == 0)
            .collect();
        assert_eq!(left_out.len(), 1);
    }

    #[test]
    fn short_day_student_is_eligible_exactly_once() {
        let students = vec![student(1, "Ana", &["5-0"])];
        let calendar = week_calendar();
        let mut rng = ChaChaRng::seed_from_u64(4);
        let schedule =
            allocate(&students, &calendar, &AllocatorConfig::default(), &mut rng).unwrap();

        let saturday_morning = Slot::parse_token("5-0").unwrap();
        assert_eq!(schedule.assignees(&saturday_morning).len(), 1);
        assert_eq!(schedule.load_of(1), 1);
    }

    #[test]
    fn same_seed_reproduces_the_same_table() {
        let students: Vec<Student> = (1..=8)
            .map(|id| student(id, &format!("Student {}", id), &everywhere()))
            .collect();
        let calendar = week_calendar();
        let config = AllocatorConfig::default();

        let mut rng_a = ChaChaRng::seed_from_u64(42);
        let mut rng_b = ChaChaRng::seed_from_u64(42);
        let first = allocate(&students, &calendar, &config, &mut rng_a).unwrap();
        let second = allocate(&students, &calendar, &config, &mut rng_b).unwrap();

        for slot in &calendar {
            let ids_first: Vec<u32> =
                first.assignees(slot).iter().map(|a| a.student_id).collect();
            let ids_second: Vec<u32> =
                second.assignees(slot).iter().map(|a| a.student_id).collect();
            assert_eq!(ids_first, ids_second);
        }
    }

    #[test]
    fn duplicate_ids_accumulate_on_one_counter() {
        // Two input rows with the same id count as one entity for the cap.
        let students = vec![
            student(7, "Ana", &everywhere()),
            student(7, "Ana", &everywhere()),
        ];
        let calendar = week_calendar();
        let mut rng = ChaChaRng::seed_from_u64(5);
        let schedule =
            allocate(&students, &calendar, &AllocatorConfig::default(), &mut rng).unwrap();

        assert!(schedule.load_of(7) <= 3);
    }
}
