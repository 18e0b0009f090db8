//! Remote sheet sync.
//!
//! Datasets can link a published Google Sheet; rows are fetched through a
//! public read proxy keyed by the sheet id and fed to the heuristic parser.
//! Fetch failures never poison local state: the remote side just reads as
//! empty and the failure is logged.

use log::warn;
use regex::Regex;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::import::{parse_sheet, SheetTable};
use crate::models::{Dataset, RemoteStatus, Task};

const SHEET_PROXY_API: &str = "https://api.fureweb.com/spreadsheets";
const SHEET_LINK_PATTERN: &str = r"https://docs\.google\.com/spreadsheets/d/([a-zA-Z0-9-_]+)";

#[derive(Debug, Clone)]
pub enum SyncError {
    Link(String),
    Request(String),
}

impl SyncError {
    pub fn message(&self) -> String {
        match self {
            SyncError::Link(msg) => msg.clone(),
            SyncError::Request(msg) => msg.clone(),
        }
    }
}

/// Pulls the sheet id out of a stored sharing link.
pub fn extract_sheet_id(link: &str) -> Option<String> {
    let pattern = Regex::new(SHEET_LINK_PATTERN).ok()?;
    pattern
        .captures(link)
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
}

#[derive(Debug, Deserialize)]
struct SheetResponse {
    #[serde(default)]
    data: Vec<serde_json::Map<String, Value>>,
}

// Row objects arrive with heterogeneous cell values; everything becomes text
// before the column guesser sees it. Column order follows first appearance.
fn rows_to_table(rows: &[serde_json::Map<String, Value>]) -> SheetTable {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }

    let table_rows = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|col| match row.get(col) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::Bool(b)) => b.to_string(),
                    _ => String::new(),
                })
                .collect()
        })
        .collect();

    SheetTable {
        columns,
        rows: table_rows,
    }
}

/// Fetches and parses every task from the sheet behind `link`.
pub fn fetch_tasks(client: &Client, link: &str) -> Result<Vec<Task>, SyncError> {
    let sheet_id = extract_sheet_id(link)
        .ok_or_else(|| SyncError::Link(format!("not a spreadsheet link: {link}")))?;

    let resp = client
        .get(format!("{SHEET_PROXY_API}/{sheet_id}"))
        .send()
        .map_err(|e| SyncError::Request(e.to_string()))?;

    if !resp.status().is_success() {
        return Err(SyncError::Request(format!(
            "Sheet fetch failed: HTTP {}",
            resp.status()
        )));
    }

    let body: SheetResponse = resp
        .json()
        .map_err(|e| SyncError::Request(e.to_string()))?;
    Ok(parse_sheet(&rows_to_table(&body.data)))
}

/// The remote side of a dataset as last observed.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteSnapshot {
    pub status: RemoteStatus,
    pub tasks: Vec<Task>,
}

impl RemoteSnapshot {
    pub fn pending() -> Self {
        Self {
            status: RemoteStatus::Pending,
            tasks: Vec::new(),
        }
    }
}

/// Fetches the remote side, downgrading any failure to an empty snapshot.
pub fn fetch_snapshot(client: &Client, link: &str) -> RemoteSnapshot {
    match fetch_tasks(client, link) {
        Ok(tasks) => RemoteSnapshot {
            status: RemoteStatus::Success,
            tasks,
        },
        Err(e) => {
            warn!("remote sheet fetch failed: {}", e.message());
            RemoteSnapshot {
                status: RemoteStatus::Failed,
                tasks: Vec::new(),
            }
        }
    }
}

/// Builds the first-run dataset from the configured community sheet.
pub fn bootstrap_dataset(client: &Client, config: &Config) -> Result<Dataset, SyncError> {
    let link = &config.sync.bootstrap_sheet_link;
    let tasks = fetch_tasks(client, link)?;
    let mut dataset = Dataset::new(1, config.sync.bootstrap_name.clone());
    dataset.google_sheets_link = Some(link.clone());
    dataset.tasks = tasks;
    Ok(dataset)
}
