//! Durable dataset state.
//!
//! Two files under the data dir: `datasets.json` (every dataset with its
//! tasks) and `active_dataset.json` (the selected id, or null). Every
//! mutating operation writes both back out, so the on-disk state is never
//! more than one call behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::models::{Dataset, Task};

const DATASETS_FILE: &str = "datasets.json";
const ACTIVE_FILE: &str = "active_dataset.json";

pub struct Store {
    data_dir: PathBuf,
    datasets: Vec<Dataset>,
    active_dataset: Option<i64>,
    needs_bootstrap: bool,
}

impl Store {
    /// Reads persisted state from `data_dir`. A missing datasets file means
    /// first run: the store starts empty and flags itself for bootstrap.
    pub fn load(data_dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(data_dir)?;

        let datasets_path = data_dir.join(DATASETS_FILE);
        let (datasets, needs_bootstrap) = if datasets_path.exists() {
            let content = fs::read_to_string(&datasets_path)?;
            (serde_json::from_str(&content).map_err(invalid_data)?, false)
        } else {
            (Vec::new(), true)
        };

        let active_path = data_dir.join(ACTIVE_FILE);
        let active_dataset = if active_path.exists() {
            let content = fs::read_to_string(&active_path)?;
            serde_json::from_str(&content).map_err(invalid_data)?
        } else {
            None
        };

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            datasets,
            active_dataset,
            needs_bootstrap,
        })
    }

    pub fn needs_bootstrap(&self) -> bool {
        self.needs_bootstrap
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    pub fn active_dataset(&self) -> Option<i64> {
        self.active_dataset
    }

    pub fn dataset(&self, id: i64) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.id == id)
    }

    pub fn active_tasks(&self) -> &[Task] {
        self.active_dataset
            .and_then(|id| self.dataset(id))
            .map_or(&[], |d| d.tasks.as_slice())
    }

    /// Installs the first dataset fetched over the network on first run.
    pub fn bootstrap(&mut self, dataset: Dataset) -> io::Result<()> {
        let id = dataset.id;
        self.datasets.push(dataset);
        self.active_dataset = Some(id);
        self.needs_bootstrap = false;
        self.save()
    }

    /// Creates an empty dataset with the next free id and a placeholder name.
    pub fn add_dataset(&mut self) -> io::Result<i64> {
        let id = self.next_id();
        self.datasets.push(Dataset::new(id, format!("Dataset {id}")));
        self.save()?;
        Ok(id)
    }

    /// Deep-copies a dataset under a new id. The copy starts unlinked from
    /// any remote sheet so edits to it never try to sync back.
    pub fn fork_dataset(&mut self, id: i64) -> io::Result<Option<i64>> {
        let Some(source) = self.dataset(id) else {
            return Ok(None);
        };
        let new_id = self.next_id();
        let mut copy = source.clone();
        copy.id = new_id;
        copy.name = format!("Clone of: {}", source.name);
        copy.google_sheets_link = None;
        self.datasets.push(copy);
        self.save()?;
        Ok(Some(new_id))
    }

    /// Removes a dataset. If it was active, selection falls back to the
    /// first remaining dataset, or to nothing.
    pub fn delete_dataset(&mut self, id: i64) -> io::Result<()> {
        self.datasets.retain(|d| d.id != id);
        if self.active_dataset == Some(id) {
            self.active_dataset = self.datasets.first().map(|d| d.id);
        }
        self.save()
    }

    pub fn set_active(&mut self, id: Option<i64>) -> io::Result<()> {
        self.active_dataset = match id {
            Some(id) if self.dataset(id).is_some() => Some(id),
            _ => None,
        };
        self.save()
    }

    pub fn rename_dataset(&mut self, id: i64, name: &str) -> io::Result<()> {
        if let Some(dataset) = self.dataset_mut(id) {
            dataset.name = name.to_string();
        }
        self.save()
    }

    pub fn set_sheet_link(&mut self, id: i64, link: Option<String>) -> io::Result<()> {
        if let Some(dataset) = self.dataset_mut(id) {
            dataset.google_sheets_link = link;
        }
        self.save()
    }

    /// Replaces the task with the same number in the active dataset, or
    /// appends it if the number is new.
    pub fn upsert_task(&mut self, task: Task) -> io::Result<()> {
        if let Some(id) = self.active_dataset {
            if let Some(dataset) = self.datasets.iter_mut().find(|d| d.id == id) {
                match dataset.tasks.iter_mut().find(|t| t.number == task.number) {
                    Some(existing) => *existing = task,
                    None => dataset.tasks.push(task),
                }
            }
        }
        self.save()
    }

    /// Appends remote-only tasks to the active dataset. Numbers already
    /// present locally are left untouched, conflicts included.
    pub fn pull_unseen(&mut self, unseen: &[Task]) -> io::Result<()> {
        if let Some(id) = self.active_dataset {
            if let Some(dataset) = self.datasets.iter_mut().find(|d| d.id == id) {
                for task in unseen {
                    if !dataset.tasks.iter().any(|t| t.number == task.number) {
                        dataset.tasks.push(task.clone());
                    }
                }
            }
        }
        self.save()
    }

    fn dataset_mut(&mut self, id: i64) -> Option<&mut Dataset> {
        self.datasets.iter_mut().find(|d| d.id == id)
    }

    fn next_id(&self) -> i64 {
        self.datasets.iter().map(|d| d.id).max().unwrap_or(0) + 1
    }

    fn save(&self) -> io::Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        let datasets = serde_json::to_string_pretty(&self.datasets).map_err(invalid_data)?;
        fs::write(self.data_dir.join(DATASETS_FILE), datasets)?;
        let active = serde_json::to_string_pretty(&self.active_dataset).map_err(invalid_data)?;
        fs::write(self.data_dir.join(ACTIVE_FILE), active)
    }
}

fn invalid_data(err: serde_json::Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .subsec_nanos();
        std::env::temp_dir().join(format!("taskdeck-test-{}-{}", std::process::id(), nanos))
    }

    fn task(number: i64, text: &str) -> Task {
        let mut t = Task::new(number);
        t.task = text.to_string();
        t
    }

    #[test]
    fn first_load_is_empty_and_flags_bootstrap() {
        let dir = temp_dir();
        let store = Store::load(&dir).unwrap();
        assert!(store.needs_bootstrap());
        assert!(store.datasets().is_empty());
        assert_eq!(store.active_dataset(), None);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn state_survives_a_reload() {
        let dir = temp_dir();
        {
            let mut store = Store::load(&dir).unwrap();
            let id = store.add_dataset().unwrap();
            store.set_active(Some(id)).unwrap();
            store.upsert_task(task(1, "Wash dishes")).unwrap();
        }
        let store = Store::load(&dir).unwrap();
        assert!(!store.needs_bootstrap());
        assert_eq!(store.datasets().len(), 1);
        assert_eq!(store.active_tasks(), &[task(1, "Wash dishes")]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn ids_are_monotonic_and_fork_copies_without_the_link() {
        let dir = temp_dir();
        let mut store = Store::load(&dir).unwrap();
        let first = store.add_dataset().unwrap();
        store.set_active(Some(first)).unwrap();
        store.upsert_task(task(1, "Sweep")).unwrap();
        store
            .set_sheet_link(first, Some("https://docs.google.com/spreadsheets/d/abc".to_string()))
            .unwrap();

        let forked = store.fork_dataset(first).unwrap().unwrap();
        assert_eq!(forked, first + 1);
        let copy = store.dataset(forked).unwrap();
        assert_eq!(copy.name, "Clone of: Dataset 1");
        assert_eq!(copy.tasks, vec![task(1, "Sweep")]);
        assert_eq!(copy.google_sheets_link, None);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn deleting_the_active_dataset_falls_back_to_the_first_remaining() {
        let dir = temp_dir();
        let mut store = Store::load(&dir).unwrap();
        let a = store.add_dataset().unwrap();
        let b = store.add_dataset().unwrap();
        store.set_active(Some(b)).unwrap();

        store.delete_dataset(b).unwrap();
        assert_eq!(store.active_dataset(), Some(a));
        store.delete_dataset(a).unwrap();
        assert_eq!(store.active_dataset(), None);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn upsert_replaces_by_number() {
        let dir = temp_dir();
        let mut store = Store::load(&dir).unwrap();
        let id = store.add_dataset().unwrap();
        store.set_active(Some(id)).unwrap();
        store.upsert_task(task(1, "before")).unwrap();
        store.upsert_task(task(1, "after")).unwrap();
        assert_eq!(store.active_tasks(), &[task(1, "after")]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn pull_unseen_never_overwrites_local_tasks() {
        let dir = temp_dir();
        let mut store = Store::load(&dir).unwrap();
        let id = store.add_dataset().unwrap();
        store.set_active(Some(id)).unwrap();
        store.upsert_task(task(1, "local edit")).unwrap();

        store
            .pull_unseen(&[task(1, "remote version"), task(2, "brand new")])
            .unwrap();
        assert_eq!(
            store.active_tasks(),
            &[task(1, "local edit"), task(2, "brand new")]
        );
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn setting_a_missing_active_id_clears_the_selection() {
        let dir = temp_dir();
        let mut store = Store::load(&dir).unwrap();
        store.set_active(Some(42)).unwrap();
        assert_eq!(store.active_dataset(), None);
        fs::remove_dir_all(&dir).unwrap();
    }
}
