//! # Dispatch Pass
//!
//! The per-tick pass in two halves. [`DueSet::collect`] records, in slot
//! order, the handles of every task due at `now`; it runs once, under the
//! same lock that advanced the counter. The scheduler then calls [`fire`]
//! for each recorded handle, with the table locked, and runs the returned
//! callback after releasing the lock.
//!
//! Tasks are looked up by handle, never by slot, so table changes made
//! between two firings (by a callback or by the foreground) cannot skip a
//! due task or make one fire twice. Tasks added during the pass are not in
//! the set and wait for the next tick.
//!
//! The bookkeeping for a due task is applied before its callback runs:
//! recurring tasks get `next_due = now + interval`, one-shot tasks are
//! removed from the table.

use log::trace;

use crate::config::MAX_TASKS;
use crate::table::TaskTable;
use crate::task::{TaskFn, TaskId, TaskStatus};
use crate::time::Tick;

/// Handles due at the start of a pass, in slot order.
#[derive(Debug, Clone, Copy)]
pub struct DueSet {
    ids: [TaskId; MAX_TASKS],
    len: usize,
}

impl DueSet {
    /// Record every task in `table` that is due at `now`.
    pub fn collect(table: &TaskTable, now: Tick) -> Self {
        let mut set = Self {
            ids: [TaskId::from_raw(0); MAX_TASKS],
            len: 0,
        };
        for task in table.iter().filter(|task| task.is_due(now)) {
            set.ids[set.len] = task.id;
            set.len += 1;
        }
        set
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
    pub fn ids(&self) -> &[TaskId] {
        &self.ids[..self.len]
    }
}

/// Re-check task `id` at tick `now` and apply its bookkeeping if still due,
/// returning the callback to run.
///
/// Returns `None` when the task has been removed, paused or rescheduled
/// since the pass began.
pub fn fire(table: &mut TaskTable, id: TaskId, now: Tick) -> Option<TaskFn> {
    let index = table.find(id)?;
    let task = table.get_mut(index)?;
    if !task.is_due(now) {
        trace!("tick {}: task {} no longer due", now, id.raw());
        return None;
    }

    let callback = task.callback;
    if task.status == TaskStatus::OneShot {
        table.remove_at(index);
        trace!("tick {}: one-shot task {} retired", now, id.raw());
    } else {
        task.reschedule(now);
    }

    Some(callback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Task, TaskMode};
    use core::sync::atomic::{AtomicU32, Ordering};

    static HITS: AtomicU32 = AtomicU32::new(0);

    fn work() {
        HITS.fetch_add(1, Ordering::Relaxed);
    }

    fn id(raw: u32) -> TaskId {
        TaskId::from_raw(raw)
    }

    fn table_with(modes: &[(u32, TaskMode)]) -> TaskTable {
        let mut table = TaskTable::new();
        for (i, &(interval, mode)) in modes.iter().enumerate() {
            table
                .insert(Task::new(id(i as u32 + 1), work, interval, mode, 0))
                .unwrap();
        }
        table
    }

    /// Run a full pass without invoking callbacks; returns fired ids.
    fn pass(table: &mut TaskTable, now: Tick) -> std::vec::Vec<u32> {
        let due = DueSet::collect(table, now);
        due.ids()
            .iter()
            .filter(|&&id| fire(table, id, now).is_some())
            .map(|id| id.raw())
            .collect()
    }

    #[test]
    fn test_empty_table_has_nothing_due() {
        let table = TaskTable::new();
        assert!(DueSet::collect(&table, 1).is_empty());
    }

    #[test]
    fn test_recurring_task_rescheduled() {
        let mut table = table_with(&[(10, TaskMode::SCHEDULED)]);
        assert!(DueSet::collect(&table, 9).is_empty());
        assert!(fire(&mut table, id(1), 10).is_some());
        assert_eq!(table.get(0).unwrap().next_due, 20);
    }

    #[test]
    fn test_paused_task_not_collected() {
        let table = table_with(&[(1, TaskMode::PAUSED), (1, TaskMode::SCHEDULED)]);
        assert_eq!(DueSet::collect(&table, 100).ids(), [id(2)]);
    }

    #[test]
    fn test_adjacent_one_shots_all_fire_in_one_pass() {
        let mut table = table_with(&[
            (5, TaskMode::ONE_SHOT),
            (5, TaskMode::ONE_SHOT),
            (5, TaskMode::SCHEDULED),
            (5, TaskMode::ONE_SHOT),
        ]);
        assert_eq!(pass(&mut table, 5), [1, 2, 3, 4]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0).unwrap().id.raw(), 3);
        assert_eq!(table.get(0).unwrap().next_due, 10);
    }

    #[test]
    fn test_dispatch_in_slot_order() {
        let mut table = table_with(&[
            (3, TaskMode::SCHEDULED),
            (2, TaskMode::SCHEDULED),
            (3, TaskMode::SCHEDULED),
        ]);
        assert_eq!(pass(&mut table, 2), [2]);
        assert_eq!(pass(&mut table, 3), [1, 3]);
        assert_eq!(pass(&mut table, 4), [2]);
    }

    #[test]
    fn test_removal_mid_pass_does_not_skip_later_task() {
        let mut table = table_with(&[(5, TaskMode::SCHEDULED), (5, TaskMode::ONE_SHOT)]);
        let due = DueSet::collect(&table, 5);
        assert_eq!(due.len(), 2);

        assert!(fire(&mut table, id(1), 5).is_some());
        // Task 1 removes itself from inside its callback.
        let slot = table.find(id(1)).unwrap();
        table.remove_at(slot);

        assert!(fire(&mut table, id(2), 5).is_some());
        assert!(table.is_empty());
    }

    #[test]
    fn test_removed_or_paused_task_is_not_fired() {
        let mut table = table_with(&[(5, TaskMode::SCHEDULED), (5, TaskMode::SCHEDULED)]);
        let due = DueSet::collect(&table, 5);
        assert_eq!(due.ids(), [id(1), id(2)]);

        table.remove_at(0);
        table.get_mut(0).unwrap().status = TaskStatus::Paused;

        assert!(fire(&mut table, id(1), 5).is_none());
        assert!(fire(&mut table, id(2), 5).is_none());
    }

    #[test]
    fn test_task_added_after_collect_waits_for_next_tick() {
        let mut table = table_with(&[(5, TaskMode::SCHEDULED)]);
        let due = DueSet::collect(&table, 5);
        table
            .insert(Task::new(id(9), work, 10, TaskMode::ONE_SHOT_IMMEDIATE, 5))
            .unwrap();

        assert_eq!(due.ids(), [id(1)]);
        assert!(fire(&mut table, id(1), 5).is_some());
        assert_eq!(pass(&mut table, 6), [9]);
    }
}
