//! # Task Table
//!
//! Fixed-capacity, order-preserving storage for task records.
//!
//! Occupied slots always form the prefix `[0, len)`. Insertion appends;
//! removal shifts every later record one slot left, so the relative order
//! of the survivors, and with it the dispatch order, never changes. Both
//! explicit removal and one-shot retirement go through [`TaskTable::remove_at`].
//!
//! Lookups are linear scans. With `MAX_TASKS` in the single digits that is
//! cheaper than any index structure.

use crate::config::MAX_TASKS;
use crate::error::{SchedError, SchedResult};
use crate::task::{Task, TaskFn, TaskId};

pub struct TaskTable {
    slots: [Task; MAX_TASKS],
    len: usize,
}

impl TaskTable {
    pub const fn new() -> Self {
        Self {
            slots: [Task::VACANT; MAX_TASKS],
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == MAX_TASKS
    }

    /// Append a task, returning its slot index.
    pub fn insert(&mut self, task: Task) -> SchedResult<usize> {
        if self.is_full() {
            return Err(SchedError::CapacityExceeded);
        }
        let index = self.len;
        self.slots[index] = task;
        self.len += 1;
        Ok(index)
    }

    /// Slot index of the task with this handle.
    pub fn find(&self, id: TaskId) -> Option<usize> {
        self.occupied().iter().position(|task| task.id == id)
    }

    /// Slot index of the first task running `callback`.
    pub fn find_by_callback(&self, callback: TaskFn) -> Option<usize> {
        self.occupied().iter().position(|task| task.runs(callback))
    }

    /// Remove the record at `index`, shifting the tail left by one.
    ///
    /// Out-of-range indices are ignored.
    pub fn remove_at(&mut self, index: usize) -> Option<Task> {
        if index >= self.len {
            return None;
        }
        let removed = self.slots[index];
        self.slots.copy_within(index + 1..self.len, index);
        self.len -= 1;
        self.slots[self.len] = Task::VACANT;
        Some(removed)
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.occupied().get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Task> {
        self.slots[..self.len].get_mut(index)
    }

    /// Mutable access by handle.
    pub fn by_id_mut(&mut self, id: TaskId) -> SchedResult<&mut Task> {
        let index = self.find(id).ok_or(SchedError::NotFound)?;
        Ok(&mut self.slots[index])
    }

    /// Occupied slots in dispatch order.
    #[inline]
    pub fn occupied(&self) -> &[Task] {
        &self.slots[..self.len]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.occupied().iter()
    }

    pub fn clear(&mut self) {
        self.slots = [Task::VACANT; MAX_TASKS];
        self.len = 0;
    }
}

impl Default for TaskTable {
    fn default() -> Self {
        Self::new()
    }
}
