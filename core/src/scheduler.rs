//! The Task Scheduler: a cooperative, single-worker task system with
//! single-shot, delayed, and periodic named tasks.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

type TaskFn = Box<dyn FnMut() + Send>;

/// A cooperative handle to a scheduled task, cloneable and cheap to hold
/// inside the task's own closure. `is_shutdown()` must be observed by a
/// long-running task at its next cooperative checkpoint; `set_period`
/// adjusts a periodic task's cadence without resubmitting it.
#[derive(Clone)]
pub struct TaskHandle {
    shutdown: Arc<AtomicBool>,
    period_ms: Arc<AtomicU64>,
}

impl TaskHandle {
    /// True once [`Scheduler::shutdown`] has been called, or this specific
    /// task has been replaced/canceled.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Adjust a periodic task's period at runtime. Has no effect on
    /// single-shot or delayed tasks, which never re-run.
    pub fn set_period(&self, period_ms: u64) {
        self.period_ms.store(period_ms, Ordering::SeqCst);
    }

    /// Mark this task cancelled. It will not re-run; a task already
    /// executing observes `is_shutdown() == true` on its next checkpoint.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

enum Kind {
    SingleShot,
    Periodic,
}

struct Task {
    id: u64,
    name: Option<String>,
    due_ms: i64,
    kind: Kind,
    handle: TaskHandle,
    run: Arc<Mutex<TaskFn>>,
}

struct Due {
    due_ms: i64,
    id: u64,
}

impl PartialEq for Due {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.id == other.id
    }
}
impl Eq for Due {}
impl PartialOrd for Due {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Due {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.due_ms.cmp(&other.due_ms).then(self.id.cmp(&other.id))
    }
}

struct SchedulerState {
    tasks: HashMap<u64, Task>,
    order: BinaryHeap<Reverse<Due>>,
    by_name: HashMap<String, u64>,
    next_id: u64,
}

/// The named single-shot / delayed / periodic task system the engine's
/// `optionx` binary uses to drive `EventBus::process` and `Engine::tick`.
/// Submitting a task under a name that is already scheduled replaces the
/// prior task.
pub struct Scheduler {
    state: Mutex<SchedulerState>,
    shutdown: Arc<AtomicBool>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// An empty scheduler with no tasks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SchedulerState {
                tasks: HashMap::new(),
                order: BinaryHeap::new(),
                by_name: HashMap::new(),
                next_id: 1,
            }),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Submit a task to run once, as soon as `process` observes `now_ms >=
    /// due_ms`.
    pub fn submit_single_shot(
        &self,
        name: Option<&str>,
        now_ms: i64,
        run: impl FnMut() + Send + 'static,
    ) -> TaskHandle {
        self.submit(name, now_ms, Kind::SingleShot, 0, run)
    }

    /// Submit a task to run once after `delay_ms`.
    pub fn submit_delayed(
        &self,
        name: Option<&str>,
        now_ms: i64,
        delay_ms: u64,
        run: impl FnMut() + Send + 'static,
    ) -> TaskHandle {
        self.submit(
            name,
            now_ms.saturating_add(i64_from_u64(delay_ms)),
            Kind::SingleShot,
            0,
            run,
        )
    }

    /// Submit a task to run every `period_ms`, starting at `now_ms + period_ms`.
    pub fn submit_periodic(
        &self,
        name: Option<&str>,
        now_ms: i64,
        period_ms: u64,
        run: impl FnMut() + Send + 'static,
    ) -> TaskHandle {
        self.submit(
            name,
            now_ms.saturating_add(i64_from_u64(period_ms)),
            Kind::Periodic,
            period_ms,
            run,
        )
    }

    fn submit(
        &self,
        name: Option<&str>,
        due_ms: i64,
        kind: Kind,
        period_ms: u64,
        run: impl FnMut() + Send + 'static,
    ) -> TaskHandle {
        let handle = TaskHandle {
            shutdown: Arc::new(AtomicBool::new(false)),
            period_ms: Arc::new(AtomicU64::new(period_ms)),
        };
        let mut state = self.lock();

        if let Some(name) = name {
            if let Some(existing_id) = state.by_name.remove(name) {
                if let Some(existing) = state.tasks.remove(&existing_id) {
                    existing.handle.shutdown();
                }
            }
        }

        let id = state.next_id;
        state.next_id = state.next_id.saturating_add(1);
        state.order.push(Reverse(Due { due_ms, id }));
        if let Some(name) = name {
            state.by_name.insert(name.to_string(), id);
        }
        state.tasks.insert(
            id,
            Task {
                id,
                name: name.map(ToString::to_string),
                due_ms,
                kind,
                handle: handle.clone(),
                run: Arc::new(Mutex::new(Box::new(run))),
            },
        );
        handle
    }

    /// Run every task whose due time has arrived, in due-time order.
    /// Panics inside a task's closure are caught and logged so one task's
    /// bug cannot stall the scheduler's worker; the offending task is not
    /// re-scheduled.
    pub fn process(&self, now_ms: i64) {
        if self.shutdown.load(Ordering::SeqCst) {
            return;
        }
        loop {
            let due_id = {
                let mut state = self.lock();
                match state.order.peek() {
                    Some(Reverse(due)) if due.due_ms <= now_ms => {
                        state.order.pop();
                        Some(due.id)
                    }
                    _ => None,
                }
            };
            let Some(id) = due_id else { break };
            self.run_due_task(id, now_ms);
        }
    }

    fn run_due_task(&self, id: u64, now_ms: i64) {
        let (handle, kind, period_ms, name) = {
            let state = self.lock();
            let Some(task) = state.tasks.get(&id) else {
                return;
            };
            (
                task.handle.clone(),
                matches!(task.kind, Kind::Periodic),
                task.handle.period_ms.load(Ordering::SeqCst),
                task.name.clone(),
            )
        };

        if handle.is_shutdown() {
            self.remove_task(id, name.as_deref());
            return;
        }

        let run = {
            let state = self.lock();
            let Some(task) = state.tasks.get(&id) else {
                return;
            };
            Arc::clone(&task.run)
        };
        let ran = {
            let mut run = match run.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            catch_unwind(AssertUnwindSafe(|| (run)())).is_ok()
        };

        if !ran {
            tracing::error!(task_id = id, task_name = ?name, "scheduled task panicked; dropping it");
        }

        if kind && !handle.is_shutdown() {
            let mut state = self.lock();
            if let Some(task) = state.tasks.get_mut(&id) {
                task.due_ms = now_ms.saturating_add(i64_from_u64(period_ms));
                let due_ms = task.due_ms;
                state.order.push(Reverse(Due { due_ms, id }));
            }
        } else {
            self.remove_task(id, name.as_deref());
        }
    }

    fn remove_task(&self, id: u64, name: Option<&str>) {
        let mut state = self.lock();
        state.tasks.remove(&id);
        if let Some(name) = name {
            if state.by_name.get(name) == Some(&id) {
                state.by_name.remove(name);
            }
        }
    }

    /// Mark every scheduled task cancelled and drain the queue. Subsequent
    /// `process` calls are no-ops.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        let mut state = self.lock();
        for task in state.tasks.values() {
            task.handle.shutdown();
        }
        state.tasks.clear();
        state.order.clear();
        state.by_name.clear();
    }

    /// Spawn a dedicated worker thread that calls `process` every
    /// `tick_interval` until [`Scheduler::shutdown`] is called. A caller
    /// that wants to drive the scheduler itself can just call
    /// [`Scheduler::process`] directly; the scheduler does not know or
    /// care which mode is in use.
    pub fn run_owned_worker(
        self: &Arc<Self>,
        tick_interval: Duration,
        now_ms: impl Fn() -> i64 + Send + 'static,
    ) -> JoinHandle<()> {
        let scheduler = Arc::clone(self);
        std::thread::spawn(move || loop {
            if scheduler.shutdown.load(Ordering::SeqCst) {
                break;
            }
            scheduler.process(now_ms());
            std::thread::sleep(tick_interval);
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SchedulerState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn i64_from_u64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn single_shot_runs_once_when_due() {
        let scheduler = Scheduler::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        scheduler.submit_single_shot(None, 0, move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });
        scheduler.process(0);
        scheduler.process(1_000);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn delayed_task_does_not_run_before_its_due_time() {
        let scheduler = Scheduler::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        scheduler.submit_delayed(None, 0, 500, move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });
        scheduler.process(100);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        scheduler.process(500);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn periodic_task_reruns_until_shut_down() {
        let scheduler = Scheduler::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        let handle = scheduler.submit_periodic(None, 0, 100, move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });
        scheduler.process(100);
        scheduler.process(200);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        handle.shutdown();
        scheduler.process(300);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn resubmitting_a_named_task_replaces_the_prior_one() {
        let scheduler = Scheduler::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_clone = Arc::clone(&calls);
        scheduler.submit_single_shot(Some("heartbeat"), 0, move || {
            calls_clone.fetch_add(10, Ordering::SeqCst);
        });
        let calls_clone = Arc::clone(&calls);
        scheduler.submit_single_shot(Some("heartbeat"), 0, move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        scheduler.process(0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn scheduler_shutdown_makes_subsequent_process_calls_no_ops() {
        let scheduler = Scheduler::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        scheduler.submit_single_shot(None, 0, move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });
        scheduler.shutdown();
        scheduler.process(0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn a_panicking_task_does_not_prevent_other_tasks_from_running() {
        let scheduler = Scheduler::new();
        let calls = Arc::new(AtomicUsize::new(0));

        scheduler.submit_single_shot(None, 0, || panic!("boom"));
        let calls_clone = Arc::clone(&calls);
        scheduler.submit_single_shot(None, 0, move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        scheduler.process(0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
