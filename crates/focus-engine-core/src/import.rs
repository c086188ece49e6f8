//! Bulk plan import from CSV.
//!
//! Expected columns: `day, subject, topic, estimated_minutes`. Header names
//! are trimmed, lower-cased and have inner whitespace replaced by `_`, so
//! `Estimated Minutes` is accepted. The `day` column is a grouping label,
//! not a date: the n-th distinct label (first-seen order) becomes a Day
//! dated `today + n`.
//!
//! The whole file is validated before anything is built. A single bad row
//! rejects the import.

use chrono::{Duration, NaiveDate};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use std::io::Read;
use std::path::Path;

use crate::error::ImportError;
use crate::model::{Day, Subject, Task};

pub const REQUIRED_COLUMNS: [&str; 4] = ["day", "subject", "topic", "estimated_minutes"];

/// Validated days and tasks ready to be appended to the store.
#[derive(Debug, Clone)]
pub struct ImportPlan {
    pub days: Vec<Day>,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub days_added: usize,
    pub tasks_added: usize,
}

impl ImportPlan {
    pub fn summary(&self) -> ImportSummary {
        ImportSummary {
            days_added: self.days.len(),
            tasks_added: self.tasks.len(),
        }
    }
}

fn normalize_header(h: &str) -> String {
    h.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

struct Row {
    day: String,
    subject: String,
    topic: String,
    minutes: u32,
}

/// Read a `.csv` file from disk and build the import plan.
pub fn read_plan_file(path: &Path, today: NaiveDate) -> Result<ImportPlan, ImportError> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(ImportError::NotCsv(path.to_path_buf()));
    }
    let file = std::fs::File::open(path).map_err(|e| ImportError::Parse(e.into()))?;
    read_plan(file, today)
}

/// Parse and validate CSV input, then group it into days and tasks.
pub fn read_plan<R: Read>(input: R, today: NaiveDate) -> Result<ImportPlan, ImportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input);

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
    let records: Vec<StringRecord> = reader.records().collect::<Result<_, _>>()?;
    let records: Vec<StringRecord> = records
        .into_iter()
        .filter(|r| r.iter().any(|f| !f.is_empty()))
        .collect();
    if records.is_empty() {
        return Err(ImportError::Empty);
    }

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns(missing));
    }
    let index = |col: &str| headers.iter().position(|h| h == col).unwrap_or_default();
    let (day_i, subject_i, topic_i, minutes_i) = (
        index("day"),
        index("subject"),
        index("topic"),
        index("estimated_minutes"),
    );

    let mut rows = Vec::with_capacity(records.len());
    let mut errors = Vec::new();
    for (idx, record) in records.iter().enumerate() {
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(idx as u64 + 2);
        let field = |i: usize| record.get(i).unwrap_or("").trim().to_string();
        let (day, subject, topic) = (field(day_i), field(subject_i), field(topic_i));

        if day.is_empty() || subject.is_empty() || topic.is_empty() {
            errors.push(format!("Row {line}: Missing required field"));
        }
        let minutes = match field(minutes_i).parse::<i64>() {
            Ok(m) if m > 0 => u32::try_from(m).ok(),
            _ => None,
        };
        match minutes {
            Some(minutes) => rows.push(Row {
                day,
                subject,
                topic,
                minutes,
            }),
            None => errors.push(format!("Row {line}: Invalid estimated_minutes")),
        }
    }
    if !errors.is_empty() {
        return Err(ImportError::InvalidRows(errors));
    }

    // Group by day label, keeping first-seen order.
    let mut groups: Vec<(String, Vec<Row>)> = Vec::new();
    for row in rows {
        match groups.iter_mut().find(|(key, _)| *key == row.day) {
            Some((_, members)) => members.push(row),
            None => groups.push((row.day.clone(), vec![row])),
        }
    }

    let mut days = Vec::with_capacity(groups.len());
    let mut tasks = Vec::new();
    for (offset, (label, members)) in groups.into_iter().enumerate() {
        let day = Day::new(label, Some(today + Duration::days(offset as i64)));
        for row in members {
            tasks.push(Task::new(
                day.id.clone(),
                Subject::new(row.subject),
                row.topic,
                row.minutes,
            ));
        }
        days.push(day);
    }
    Ok(ImportPlan { days, tasks })
}
