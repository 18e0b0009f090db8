//! Tabular import and export.
//!
//! Two entry points: `parse_csv` for files exported by this tool (fixed
//! column order, header skipped), and `parse_sheet` for arbitrary
//! spreadsheet-shaped tables where headers cannot be trusted and every
//! column's role is guessed from its cell values.

use crate::duration::parse_duration_secs;
use crate::models::Task;

pub const CSV_MIME: &str = "text/csv";

pub fn export_filename(dataset_name: &str) -> String {
    format!("{dataset_name}.csv")
}

// Category and equipment words the column guesser recognizes. Matching is
// lowercase and per comma-separated segment, so multi-tag cells still vote.
const CATEGORY_VOCAB: [&str; 12] = [
    "outdoor", "chores", "exercise", "cooking", "errands", "social", "study",
    "hygiene", "creative", "admin", "cleaning", "gardening",
];

const EQUIPMENT_VOCAB: [&str; 14] = [
    "leash", "gloves", "timer", "mop", "bucket", "vacuum", "sponge",
    "notebook", "headphones", "mat", "rope", "brush", "bicycle", "apron",
];

/// One of the six Task fields a table column can be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Number,
    Task,
    Duration,
    Equipment,
    Kinks,
    Intensity,
}

// Tie-break order for the greedy assignment: earlier roles win equal scores.
const ROLES: [ColumnRole; 6] = [
    ColumnRole::Number,
    ColumnRole::Task,
    ColumnRole::Duration,
    ColumnRole::Equipment,
    ColumnRole::Kinks,
    ColumnRole::Intensity,
];

/// Which table column (by index) feeds each Task field. A role left `None`
/// never scored above zero, which is a valid outcome, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub number: Option<usize>,
    pub task: Option<usize>,
    pub duration: Option<usize>,
    pub equipment: Option<usize>,
    pub kinks: Option<usize>,
    pub intensity: Option<usize>,
}

impl ColumnMap {
    fn set(&mut self, role: ColumnRole, column: usize) {
        match role {
            ColumnRole::Number => self.number = Some(column),
            ColumnRole::Task => self.task = Some(column),
            ColumnRole::Duration => self.duration = Some(column),
            ColumnRole::Equipment => self.equipment = Some(column),
            ColumnRole::Kinks => self.kinks = Some(column),
            ColumnRole::Intensity => self.intensity = Some(column),
        }
    }
}

/// A header row plus data rows, all cells as text. Rows shorter than the
/// header are padded with empty cells at read time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Guesses what one cell says about its column, checked most-specific first.
fn guess_cell(cell: &str) -> Option<ColumnRole> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    if cell.parse::<f64>().is_ok() {
        return Some(ColumnRole::Number);
    }
    if cell.len() < 20 && parse_duration_secs(cell).is_some() {
        return Some(ColumnRole::Duration);
    }
    let lower = cell.to_lowercase();
    if matches!(lower.as_str(), "easy" | "medium" | "hard") {
        return Some(ColumnRole::Intensity);
    }

    let segments: Vec<&str> = cell.split(',').collect();
    let words: usize = segments
        .iter()
        .map(|s| s.trim().split_whitespace().count())
        .sum();
    // Prose runs long per segment; tag lists stay at a word or two.
    if words as f64 / segments.len() as f64 > 3.0 {
        return Some(ColumnRole::Task);
    }

    let tagged = |vocab: &[&str]| {
        segments
            .iter()
            .any(|s| vocab.contains(&s.trim().to_lowercase().as_str()))
    };
    if tagged(&CATEGORY_VOCAB) {
        return Some(ColumnRole::Kinks);
    }
    if tagged(&EQUIPMENT_VOCAB) {
        return Some(ColumnRole::Equipment);
    }
    None
}

/// Scores every column against every role and assigns greedily: the highest
/// remaining (column, role) score wins, both are retired, repeat. Stops as
/// soon as no pair scores above zero, so unconvincing columns stay unmapped.
pub fn guess_columns(table: &SheetTable) -> ColumnMap {
    let cols = table.columns.len();
    let mut scores = vec![[0usize; ROLES.len()]; cols];
    for row in &table.rows {
        for (c, cell) in row.iter().enumerate().take(cols) {
            if let Some(role) = guess_cell(cell) {
                scores[c][role as usize] += 1;
            }
        }
    }

    let mut map = ColumnMap::default();
    let mut col_taken = vec![false; cols];
    let mut role_taken = [false; ROLES.len()];
    loop {
        let mut best: Option<(usize, usize, usize)> = None;
        for (c, col_scores) in scores.iter().enumerate() {
            if col_taken[c] {
                continue;
            }
            for (r, &score) in col_scores.iter().enumerate() {
                if role_taken[r] || score == 0 {
                    continue;
                }
                if best.map_or(true, |(_, _, top)| score > top) {
                    best = Some((c, r, score));
                }
            }
        }
        let Some((c, r, _)) = best else { break };
        col_taken[c] = true;
        role_taken[r] = true;
        map.set(ROLES[r], c);
    }
    map
}

fn split_tags(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn cell<'a>(row: &'a [String], idx: Option<usize>) -> &'a str {
    idx.and_then(|i| row.get(i)).map_or("", |s| s.as_str())
}

fn row_to_task(row: &[String], map: &ColumnMap) -> Task {
    let number = cell(row, map.number)
        .trim()
        .parse::<f64>()
        .map(|n| n.trunc() as i64)
        .unwrap_or(0);
    let duration = cell(row, map.duration).trim();
    Task {
        number,
        task: cell(row, map.task).trim().to_string(),
        duration: (!duration.is_empty()).then(|| duration.to_string()),
        intensity: cell(row, map.intensity).trim().to_lowercase(),
        equipment: split_tags(cell(row, map.equipment)),
        kinks: split_tags(cell(row, map.kinks)),
    }
}

fn row_is_blank(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

/// Converts an untrusted table into tasks via heuristic column mapping.
pub fn parse_sheet(table: &SheetTable) -> Vec<Task> {
    let map = guess_columns(table);
    table
        .rows
        .iter()
        .filter(|row| !row_is_blank(row))
        .map(|row| row_to_task(row, &map))
        .collect()
}

/// Parses a delimited export back into tasks. The first six named header
/// cells give the column positions, consumed in the fixed order number,
/// task, duration, equipment, kinks, intensity — the names themselves are
/// otherwise ignored, and columns under an empty header name are skipped.
/// A malformed number degrades to 0 rather than dropping the row.
pub fn parse_csv(content: &str) -> Vec<Task> {
    let rows = parse_rows(content);
    if rows.len() < 2 {
        return Vec::new();
    }
    let named: Vec<usize> = rows[0]
        .iter()
        .enumerate()
        .filter(|(_, name)| !name.trim().is_empty())
        .map(|(i, _)| i)
        .take(6)
        .collect();
    let col = |field: usize| named.get(field).copied();
    let map = ColumnMap {
        number: col(0),
        task: col(1),
        duration: col(2),
        equipment: col(3),
        kinks: col(4),
        intensity: col(5),
    };
    rows[1..]
        .iter()
        .filter(|row| !row_is_blank(row))
        .map(|row| row_to_task(row, &map))
        .collect()
}

// Quote-aware row splitter. Doubled quotes inside a quoted field collapse to
// one; CR before LF is dropped; a trailing row without a newline still counts.
fn parse_rows(content: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
            continue;
        }
        match ch {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(ch),
        }
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Renders tasks in the positional export layout `parse_csv` reads back.
pub fn to_csv(tasks: &[Task]) -> String {
    let mut out = String::from("number,task,duration,equipment,kinks,intensity\n");
    for task in tasks {
        let fields = [
            task.number.to_string(),
            escape_field(&task.task),
            escape_field(task.duration.as_deref().unwrap_or("")),
            escape_field(&task.equipment.join(",")),
            escape_field(&task.kinks.join(",")),
            escape_field(&task.intensity),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}
