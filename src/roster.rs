use std::path::{Path, PathBuf};

use csv::{Reader, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};
use crate::slot::{decode_availability, encode_availability, Slot};
use crate::student::Student;

/// One row of the roster file. Availability is stored in its serialized
/// ";"-joined "day-period" token form.
#[derive(Debug, Serialize, Deserialize)]
struct StudentRecord {
    id: u32,
    name: String,
    availability: String,
}

/// CSV-backed student store.
///
/// Each operation opens the file, acts and closes it again; no handle is
/// held between calls, so two stores pointed at the same path see each
/// other's writes.
#[derive(Debug, Clone)]
pub struct RosterStore {
    path: PathBuf,
}

impl RosterStore {
    pub fn new<P: AsRef<Path>>(path: P) -> RosterStore {
        RosterStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every registered student. A missing file is an empty roster.
    pub fn load(&self) -> Result<Vec<Student>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = Reader::from_path(&self.path)?;
        let mut students = Vec::new();
        for record in reader.deserialize() {
            let record: StudentRecord = record?;
            let availability = decode_availability(&record.availability)?;
            students.push(Student {
                id: record.id,
                name: record.name,
                availability,
            });
        }
        Ok(students)
    }

    /// Registers a new student, assigning the next free id.
    pub fn add(&self, name: &str, availability: Vec<Slot>) -> Result<Student> {
        let mut students = self.load()?;
        let id = students.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let student = Student {
            id,
            name: name.to_string(),
            availability,
        };
        students.push(student.clone());
        self.save_all(&students)?;
        Ok(student)
    }

    /// Replaces the name and availability of an existing student.
    pub fn update(&self, id: u32, name: &str, availability: Vec<Slot>) -> Result<Student> {
        let mut students = self.load()?;
        let updated = match students.iter_mut().find(|s| s.id == id) {
            Some(student) => {
                student.name = name.to_string();
                student.availability = availability;
                student.clone()
            }
            None => return Err(RosterError::StudentNotFound(id)),
        };
        self.save_all(&students)?;
        Ok(updated)
    }

    /// Removes a student by id.
    pub fn remove(&self, id: u32) -> Result<()> {
        let mut students = self.load()?;
        let before = students.len();
        students.retain(|s| s.id != id);
        if students.len() == before {
            return Err(RosterError::StudentNotFound(id));
        }
        self.save_all(&students)
    }

    fn save_all(&self, students: &[Student]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = WriterBuilder::new().from_path(&self.path)?;
        for student in students {
            writer.serialize(StudentRecord {
                id: student.id,
                name: student.name.clone(),
                availability: encode_availability(&student.availability),
            })?;
        }
        writer.flush()?;
        Ok(())
    }
}
