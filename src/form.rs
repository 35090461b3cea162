use std::collections::HashSet;

use serde::Deserialize;

use crate::slot::Slot;

/// Registration or edit request from the frontend checkbox grid.
/// Availability arrives as "day-period" tokens, one per checked box.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationRequest {
    pub name: String,
    pub availability: Vec<String>,
}

/// Validates a registration and parses its availability tokens into slots.
///
/// Returns the trimmed name and the deduplicated, sorted slot set, or a
/// user-facing message when the request is rejected. Nothing invalid gets
/// past this point into the store or the allocator.
pub fn validate_registration(req: &RegistrationRequest) -> Result<(String, Vec<Slot>), String> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err("Student name is required".to_string());
    }

    if req.availability.is_empty() {
        return Err("At least one availability slot is required".to_string());
    }

    let mut seen = HashSet::new();
    for token in &req.availability {
        let slot = Slot::parse_token(token)
            .map_err(|_| format!("Invalid availability slot: {}", token))?;
        seen.insert(slot);
    }

    let mut slots: Vec<Slot> = seen.into_iter().collect();
    slots.sort();

    Ok((name.to_string(), slots))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, availability: &[&str]) -> RegistrationRequest {
        RegistrationRequest {
            name: name.to_string(),
            availability: availability.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn accepts_a_valid_registration() {
        let (name, slots) = validate_registration(&request("Ana", &["2-1", "0-0"])).unwrap();
        assert_eq!(name, "Ana");
        assert_eq!(
            slots,
            vec![Slot { day: 0, period: 0 }, Slot { day: 2, period: 1 }]
        );
    }

    #[test]
    fn rejects_blank_name() {
        let err = validate_registration(&request("   ", &["0-0"])).unwrap_err();
        assert_eq!(err, "Student name is required");
    }

    #[test]
    fn rejects_empty_availability() {
        let err = validate_registration(&request("Ana", &[])).unwrap_err();
        assert_eq!(err, "At least one availability slot is required");
    }

    #[test]
    fn rejects_malformed_tokens() {
        let err = validate_registration(&request("Ana", &["0-0", "nope"])).unwrap_err();
        assert_eq!(err, "Invalid availability slot: nope");
    }

    #[test]
    fn rejects_short_day_afternoon() {
        assert!(validate_registration(&request("Ana", &["5-1"])).is_err());
        assert!(validate_registration(&request("Ana", &["5-0"])).is_ok());
    }

    #[test]
    fn deduplicates_repeated_tokens() {
        let (_, slots) = validate_registration(&request("Ana", &["1-1", "1-1"])).unwrap();
        assert_eq!(slots.len(), 1);
    }
}
