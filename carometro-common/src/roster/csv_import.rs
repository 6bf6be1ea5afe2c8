//! CSV roster import
//!
//! Accepts `id,name` or `id;name` lines with an optional header row. Import
//! never fails: lines that cannot be read as a record are skipped and counted.

use serde::Serialize;

use super::Student;

/// Header values recognised in the id column (compared lower-cased)
const HEADER_IDS: [&str; 2] = ["matricula", "id"];

/// Counters describing what an import did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Records created
    pub imported: usize,
    /// Lines recognised as a header row
    pub headers_skipped: usize,
    /// Non-empty lines with fewer than two fields
    pub malformed_lines: usize,
}

/// Result of parsing an uploaded CSV
#[derive(Debug, Clone, Default)]
pub struct ParsedRoster {
    pub students: Vec<Student>,
    pub summary: ImportSummary,
}

/// Parse uploaded CSV text into roster records
///
/// Per line:
/// 1. Trim (a leading BOM and trailing `\r` go with it); skip if empty
/// 2. Split on `,`; if that gives fewer than two fields, split on `;`
/// 3. Fewer than two fields → malformed, skipped
/// 4. First field is the id, second the name, both trimmed; extra fields ignored
/// 5. Id equal to `matricula` or `id` (any case) → header, skipped
pub fn parse_roster_csv(text: &str) -> ParsedRoster {
    let mut parsed = ParsedRoster::default();

    for line in text.split('\n') {
        let line = trim_field(line);
        if line.is_empty() {
            continue;
        }

        let mut parts: Vec<&str> = line.split(',').collect();
        if parts.len() < 2 {
            parts = line.split(';').collect();
        }
        if parts.len() < 2 {
            parsed.summary.malformed_lines += 1;
            continue;
        }

        let id = trim_field(parts[0]);
        let name = trim_field(parts[1]);

        if is_header(id) {
            parsed.summary.headers_skipped += 1;
            continue;
        }

        parsed.students.push(Student::new(id, name));
    }

    parsed.summary.imported = parsed.students.len();
    parsed
}

fn is_header(id: &str) -> bool {
    let lower = id.to_lowercase();
    HEADER_IDS.contains(&lower.as_str())
}

// str::trim does not treat U+FEFF as whitespace; spreadsheet exports often
// start with one.
fn trim_field(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}
