//! Undo/redo history for task mutations.
//!
//! A bounded linear stack of recorded deltas with a cursor. Entries at or
//! below the cursor are undoable; entries above it are redoable. Recording
//! a new action discards the redo branch. History is process-local and
//! dropped when the board session ends.
//!
//! Replays go through [`TaskMutator`], so the log is agnostic of whether
//! the store is the live database or a test double. While a replay is in
//! flight the log is in the `Restoring` state: `record` calls are
//! suppressed (a restore must not record itself) and nested undo/redo is
//! rejected. The cursor only moves when the replayed mutation succeeds, so
//! a failed undo leaves the same entry on offer.

use chrono::Utc;

use crate::error::WeekloadError;
use crate::models::{Task, TaskInput, TaskPatch};

pub const MAX_HISTORY: usize = 50;

/// Mutation surface the log replays against.
pub trait TaskMutator {
    fn create_task(&mut self, input: &TaskInput) -> Result<Task, WeekloadError>;
    fn update_task(&mut self, id: i64, patch: &TaskPatch) -> Result<(), WeekloadError>;
    fn delete_task(&mut self, id: i64) -> Result<(), WeekloadError>;
}

impl TaskMutator for rusqlite::Connection {
    fn create_task(&mut self, input: &TaskInput) -> Result<Task, WeekloadError> {
        crate::db::task_repo::create_task(self, input)
    }

    fn update_task(&mut self, id: i64, patch: &TaskPatch) -> Result<(), WeekloadError> {
        crate::db::task_repo::update_task(self, id, patch)
    }

    fn delete_task(&mut self, id: i64) -> Result<(), WeekloadError> {
        crate::db::task_repo::delete_task(self, id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Create,
    Update,
    Delete,
}

/// One recorded mutation, carrying the snapshots needed to replay it in
/// either direction.
#[derive(Debug, Clone)]
pub struct Action {
    pub kind: ActionKind,
    pub task_id: Option<i64>,
    pub previous: Option<Task>,
    pub new: Option<Task>,
    pub timestamp_ms: i64,
}

impl Action {
    pub fn created(task: &Task) -> Self {
        Self {
            kind: ActionKind::Create,
            task_id: Some(task.id),
            previous: None,
            new: Some(task.clone()),
            timestamp_ms: Utc::now().timestamp_millis(),
        }
    }

    pub fn updated(before: &Task, after: &Task) -> Self {
        Self {
            kind: ActionKind::Update,
            task_id: Some(before.id),
            previous: Some(before.clone()),
            new: Some(after.clone()),
            timestamp_ms: Utc::now().timestamp_millis(),
        }
    }

    pub fn deleted(task: &Task) -> Self {
        Self {
            kind: ActionKind::Delete,
            task_id: Some(task.id),
            previous: Some(task.clone()),
            new: None,
            timestamp_ms: Utc::now().timestamp_millis(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogState {
    Idle,
    Restoring,
}

#[derive(Debug)]
pub struct ActionLog {
    history: Vec<Action>,
    cursor: isize,
    state: LogState,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionLog {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            cursor: -1,
            state: LogState::Idle,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.cursor >= 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.history.len() as isize - 1
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Append an action. Anything above the cursor is discarded first, and
    /// the oldest entry is evicted once capacity is reached. Suppressed
    /// while a restore is in flight.
    pub fn record(&mut self, action: Action) {
        if self.state == LogState::Restoring {
            return;
        }
        self.history.truncate((self.cursor + 1) as usize);
        self.history.push(action);
        self.cursor += 1;
        if self.history.len() > MAX_HISTORY {
            self.history.remove(0);
            self.cursor = MAX_HISTORY as isize - 1;
        }
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.cursor = -1;
        self.state = LogState::Idle;
    }

    /// Revert the entry at the cursor. Returns `Ok(false)` when there is
    /// nothing to undo. The cursor is decremented only after the inverse
    /// mutation succeeds.
    pub fn undo(&mut self, store: &mut dyn TaskMutator) -> Result<bool, WeekloadError> {
        if self.state == LogState::Restoring {
            return Err(WeekloadError::validation("A restore is already in flight"));
        }
        if !self.can_undo() {
            return Ok(false);
        }

        let action = self.history[self.cursor as usize].clone();
        self.state = LogState::Restoring;
        let result = Self::apply_inverse(&action, store);
        self.state = LogState::Idle;
        result?;
        self.cursor -= 1;
        Ok(true)
    }

    /// Replay the entry just above the cursor. Returns `Ok(false)` when
    /// there is nothing to redo. The cursor is incremented only after the
    /// forward mutation succeeds.
    pub fn redo(&mut self, store: &mut dyn TaskMutator) -> Result<bool, WeekloadError> {
        if self.state == LogState::Restoring {
            return Err(WeekloadError::validation("A restore is already in flight"));
        }
        if !self.can_redo() {
            return Ok(false);
        }

        let action = self.history[(self.cursor + 1) as usize].clone();
        self.state = LogState::Restoring;
        let result = Self::apply_forward(&action, store);
        self.state = LogState::Idle;
        result?;
        self.cursor += 1;
        Ok(true)
    }

    fn apply_inverse(action: &Action, store: &mut dyn TaskMutator) -> Result<(), WeekloadError> {
        match action.kind {
            // Undo create: remove the task that was made.
            ActionKind::Create => match action.task_id {
                Some(id) => store.delete_task(id),
                None => Ok(()),
            },
            // Undo delete: recreate from the snapshot. The store assigns a
            // fresh id; the restored task has a new identity.
            ActionKind::Delete => match action.previous {
                Some(ref snapshot) => store
                    .create_task(&TaskInput::from_task(snapshot))
                    .map(|_| ()),
                None => Ok(()),
            },
            // Undo update: put the previous field values back verbatim.
            ActionKind::Update => match (action.task_id, &action.previous) {
                (Some(id), Some(snapshot)) => store.update_task(id, &TaskPatch::from_task(snapshot)),
                _ => Ok(()),
            },
        }
    }

    fn apply_forward(action: &Action, store: &mut dyn TaskMutator) -> Result<(), WeekloadError> {
        match action.kind {
            ActionKind::Create => match action.new {
                Some(ref snapshot) => store
                    .create_task(&TaskInput::from_task(snapshot))
                    .map(|_| ()),
                None => Ok(()),
            },
            ActionKind::Delete => match action.task_id {
                Some(id) => store.delete_task(id),
                None => Ok(()),
            },
            ActionKind::Update => match (action.task_id, &action.new) {
                (Some(id), Some(snapshot)) => store.update_task(id, &TaskPatch::from_task(snapshot)),
                _ => Ok(()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskType;

    fn snapshot(id: i64, name: &str, workload: i64) -> Task {
        Task {
            id,
            name: name.to_string(),
            notes: None,
            resource_id: 1,
            client_id: 1,
            deadline: None,
            workload,
            estimated_days: 0,
            task_type: TaskType::Oneshot,
            is_completed: false,
            is_archived: false,
            week_number: 10,
            year: 2025,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    /// Records the calls the log issues; can be armed to fail.
    #[derive(Default)]
    struct MockStore {
        calls: Vec<String>,
        fail_next: bool,
        next_id: i64,
    }

    impl TaskMutator for MockStore {
        fn create_task(&mut self, input: &TaskInput) -> Result<Task, WeekloadError> {
            if self.fail_next {
                self.fail_next = false;
                return Err(WeekloadError::store_unavailable("mock"));
            }
            self.next_id += 1;
            self.calls.push(format!("create {}", input.name));
            Ok(snapshot(self.next_id + 1000, &input.name, input.workload))
        }

        fn update_task(&mut self, id: i64, patch: &TaskPatch) -> Result<(), WeekloadError> {
            if self.fail_next {
                self.fail_next = false;
                return Err(WeekloadError::store_unavailable("mock"));
            }
            self.calls
                .push(format!("update {id} workload={:?}", patch.workload));
            Ok(())
        }

        fn delete_task(&mut self, id: i64) -> Result<(), WeekloadError> {
            if self.fail_next {
                self.fail_next = false;
                return Err(WeekloadError::store_unavailable("mock"));
            }
            self.calls.push(format!("delete {id}"));
            Ok(())
        }
    }

    #[test]
    fn empty_log_has_nothing_to_do() {
        let mut log = ActionLog::new();
        let mut store = MockStore::default();
        assert!(!log.can_undo());
        assert!(!log.can_redo());
        assert!(!log.undo(&mut store).unwrap());
        assert!(!log.redo(&mut store).unwrap());
        assert!(store.calls.is_empty());
    }

    #[test]
    fn undo_of_create_issues_delete() {
        let mut log = ActionLog::new();
        let mut store = MockStore::default();
        log.record(Action::created(&snapshot(42, "new task", 0)));

        assert!(log.undo(&mut store).unwrap());
        assert_eq!(store.calls, vec!["delete 42"]);
        assert!(!log.can_undo());
        assert!(log.can_redo());
    }

    #[test]
    fn redo_of_create_reissues_the_input() {
        let mut log = ActionLog::new();
        let mut store = MockStore::default();
        log.record(Action::created(&snapshot(42, "new task", 0)));

        log.undo(&mut store).unwrap();
        assert!(log.redo(&mut store).unwrap());
        // The recreate goes through create, yielding a new identity.
        assert_eq!(store.calls, vec!["delete 42", "create new task"]);
        assert!(log.can_undo());
        assert!(!log.can_redo());
    }

    #[test]
    fn undo_of_delete_recreates_from_snapshot() {
        let mut log = ActionLog::new();
        let mut store = MockStore::default();
        log.record(Action::deleted(&snapshot(7, "gone", 4)));

        assert!(log.undo(&mut store).unwrap());
        assert_eq!(store.calls, vec!["create gone"]);
    }

    #[test]
    fn undo_of_update_restores_previous_fields() {
        let mut log = ActionLog::new();
        let mut store = MockStore::default();
        let before = snapshot(5, "task", 2);
        let mut after = before.clone();
        after.workload = 3;
        log.record(Action::updated(&before, &after));

        assert!(log.undo(&mut store).unwrap());
        assert_eq!(store.calls, vec!["update 5 workload=Some(2)"]);

        assert!(log.redo(&mut store).unwrap());
        assert_eq!(store.calls[1], "update 5 workload=Some(3)");
    }

    #[test]
    fn recording_after_undo_discards_redo_branch() {
        let mut log = ActionLog::new();
        let mut store = MockStore::default();
        log.record(Action::created(&snapshot(1, "a", 0)));
        log.record(Action::created(&snapshot(2, "b", 0)));
        log.record(Action::created(&snapshot(3, "c", 0)));

        log.undo(&mut store).unwrap();
        log.undo(&mut store).unwrap();
        log.record(Action::created(&snapshot(4, "d", 0)));

        assert_eq!(log.len(), 2);
        assert!(!log.can_redo());
        // Undoing now reverts D, then A.
        log.undo(&mut store).unwrap();
        log.undo(&mut store).unwrap();
        assert_eq!(store.calls, vec!["delete 3", "delete 2", "delete 4", "delete 1"]);
    }

    #[test]
    fn capacity_evicts_oldest_and_clamps_cursor() {
        let mut log = ActionLog::new();
        for i in 0..(MAX_HISTORY as i64 + 1) {
            log.record(Action::created(&snapshot(i, &format!("t{i}"), 0)));
        }
        assert_eq!(log.len(), MAX_HISTORY);

        // Undo all the way: the oldest entry (id 0) was evicted.
        let mut store = MockStore::default();
        let mut undone = 0;
        while log.undo(&mut store).unwrap() {
            undone += 1;
        }
        assert_eq!(undone, MAX_HISTORY);
        assert_eq!(store.calls.first().map(String::as_str), Some("delete 50"));
        assert_eq!(store.calls.last().map(String::as_str), Some("delete 1"));
    }

    #[test]
    fn failed_undo_keeps_the_cursor_in_place() {
        let mut log = ActionLog::new();
        let mut store = MockStore::default();
        log.record(Action::created(&snapshot(1, "a", 0)));

        store.fail_next = true;
        assert!(log.undo(&mut store).is_err());
        // Same entry is still on offer, and the log is usable again.
        assert!(log.can_undo());
        assert!(log.undo(&mut store).unwrap());
        assert_eq!(store.calls, vec!["delete 1"]);
    }

    #[test]
    fn failed_redo_keeps_the_cursor_in_place() {
        let mut log = ActionLog::new();
        let mut store = MockStore::default();
        log.record(Action::created(&snapshot(1, "a", 0)));
        log.undo(&mut store).unwrap();

        store.fail_next = true;
        assert!(log.redo(&mut store).is_err());
        assert!(log.can_redo());
        assert!(log.redo(&mut store).unwrap());
    }

    #[test]
    fn record_during_restore_is_suppressed() {
        let mut log = ActionLog::new();
        log.record(Action::created(&snapshot(1, "a", 0)));
        log.state = LogState::Restoring;
        log.record(Action::created(&snapshot(2, "b", 0)));
        assert_eq!(log.len(), 1);
    }
}
