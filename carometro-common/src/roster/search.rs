//! Case-insensitive roster search

use super::Student;

/// Keep records whose name or id contains `term`, ignoring case
///
/// An empty term returns every record. The term is not trimmed, so a lone
/// space matches names containing a space. Order is preserved.
pub fn filter_students(students: &[Student], term: &str) -> Vec<Student> {
    if term.is_empty() {
        return students.to_vec();
    }

    let needle = term.to_lowercase();
    students
        .iter()
        .filter(|s| {
            s.name.to_lowercase().contains(&needle) || s.id.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}
