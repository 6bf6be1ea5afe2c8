//! Student records and the in-memory roster
//!
//! The roster is rebuilt wholesale on every CSV import and mutated in place
//! (a single field) when a photo is saved. It is never persisted.

pub mod csv_import;
pub mod search;

pub use csv_import::{parse_roster_csv, ImportSummary, ParsedRoster};
pub use search::filter_students;

use serde::{Deserialize, Serialize};

/// A single roster entry
///
/// `id` is the student's matrícula. Identity is `id`, but duplicates are
/// neither merged nor rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    /// Server-relative path of the saved photo, empty until one is saved
    #[serde(default)]
    pub photo_url: String,
}

impl Student {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            photo_url: String::new(),
        }
    }

    pub fn has_photo(&self) -> bool {
        !self.photo_url.is_empty()
    }
}

/// In-memory roster store
#[derive(Debug, Clone, Default)]
pub struct Roster {
    students: Vec<Student>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole roster, returning the new length
    ///
    /// There is no incremental merge: photo references on the previous
    /// roster are dropped along with it.
    pub fn replace(&mut self, students: Vec<Student>) -> usize {
        self.students = students;
        self.students.len()
    }

    /// All records in import order
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// First record with the given id
    pub fn get(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Records whose name or id contains `term` (case-insensitive)
    pub fn filter(&self, term: &str) -> Vec<Student> {
        filter_students(&self.students, term)
    }

    /// Set the photo reference on every record with the given id
    ///
    /// Returns the number of records updated (0 when the id is not on the
    /// roster, more than 1 when the import contained duplicate ids).
    pub fn set_photo_url(&mut self, id: &str, photo_url: &str) -> usize {
        let mut updated = 0;
        for student in self.students.iter_mut().filter(|s| s.id == id) {
            student.photo_url = photo_url.to_string();
            updated += 1;
        }
        updated
    }

    /// Number of records that already have a photo
    pub fn photographed(&self) -> usize {
        self.students.iter().filter(|s| s.has_photo()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Roster {
        let mut roster = Roster::new();
        roster.replace(vec![
            Student::new("1001", "Ana Souza"),
            Student::new("1002", "Bruno Lima"),
            Student::new("1001", "Ana Souza (dup)"),
        ]);
        roster
    }

    #[test]
    fn test_replace_discards_previous_roster() {
        let mut roster = sample();
        roster.set_photo_url("1002", "/photos/1002_Bruno Lima.jpg");

        let len = roster.replace(vec![Student::new("2001", "Carla")]);

        assert_eq!(len, 1);
        assert_eq!(roster.students()[0].id, "2001");
        assert!(roster.get("1002").is_none());
        assert_eq!(roster.photographed(), 0);
    }

    #[test]
    fn test_set_photo_url_updates_every_duplicate() {
        let mut roster = sample();

        let updated = roster.set_photo_url("1001", "/photos/1001_Ana Souza.jpg");

        assert_eq!(updated, 2);
        assert!(roster
            .students()
            .iter()
            .filter(|s| s.id == "1001")
            .all(|s| s.photo_url == "/photos/1001_Ana Souza.jpg"));
        assert!(!roster.get("1002").unwrap().has_photo());
    }

    #[test]
    fn test_set_photo_url_unknown_id() {
        let mut roster = sample();
        assert_eq!(roster.set_photo_url("9999", "/photos/x.jpg"), 0);
        assert_eq!(roster.photographed(), 0);
    }

    #[test]
    fn test_student_serializes_camel_case() {
        let student = Student::new("7", "Davi");
        let json = serde_json::to_value(&student).unwrap();
        assert_eq!(json["id"], "7");
        assert_eq!(json["name"], "Davi");
        assert_eq!(json["photoUrl"], "");
    }
}
