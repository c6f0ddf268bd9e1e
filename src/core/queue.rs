//! # Declaration queue.
//!
//! Accumulates tasks in declaration order and serializes group bodies.
//!
//! ## Architecture
//! ```text
//! suite.test(..)  ──► slots.push(Task)
//! suite.group(..) ──► slots.push(Group { members })      (position reserved now)
//!                 └─► tail = tail.then(body(GroupScope)) (body runs later, in call order)
//!
//! settle()        ──► await tail until empty
//! take_tasks()    ──► [Task, GroupStart, members.., GroupEnd, Task, ..]
//! ```
//!
//! ## Rules
//! - A group's position is fixed when `group` is called, so its members land
//!   between its brackets no matter when the body declares them.
//! - Bodies run one after another in `group` call order: each unit of work is
//!   chained after the previous `tail`.
//! - The tail lock is never held across an `.await`.
//! - `take_tasks` closes every member buffer it drains; later pushes are
//!   rejected by the scope that owns the buffer.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;

use crate::tasks::Task;

/// Buffer a group body declares into.
pub(crate) type Members = Arc<Mutex<MemberBuffer>>;

/// Tasks declared by one group body.
#[derive(Default)]
pub(crate) struct MemberBuffer {
    tasks: Vec<Task>,
    closed: bool,
}

impl MemberBuffer {
    pub(crate) fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// True once the group has been drained.
    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self) -> Vec<Task> {
        self.closed = true;
        std::mem::take(&mut self.tasks)
    }
}

/// A position in declaration order.
enum Slot {
    Task(Task),
    Group { description: String, members: Members },
}

/// Ordered task list plus the single-slot chain of pending group bodies.
#[derive(Default)]
pub(crate) struct TaskQueue {
    slots: Mutex<Vec<Slot>>,
    tail: Mutex<Option<BoxFuture<'static, ()>>>,
}

impl TaskQueue {
    pub(crate) fn push(&self, task: Task) {
        self.slots.lock().push(Slot::Task(task));
    }

    /// Reserves a group position and returns the buffer its body fills.
    pub(crate) fn reserve_group(&self, description: String) -> Members {
        let members: Members = Arc::default();
        self.slots.lock().push(Slot::Group {
            description,
            members: Arc::clone(&members),
        });
        members
    }

    /// Appends `unit` after the last enqueued unit of work.
    pub(crate) fn chain(&self, unit: BoxFuture<'static, ()>) {
        let mut tail = self.tail.lock();
        let prev = tail.take();
        *tail = Some(
            async move {
                if let Some(prev) = prev {
                    prev.await;
                }
                unit.await;
            }
            .boxed(),
        );
    }

    /// Runs every chained unit of work to completion.
    pub(crate) async fn settle(&self) {
        loop {
            let next = self.tail.lock().take();
            match next {
                Some(unit) => unit.await,
                None => break,
            }
        }
    }

    /// Takes the declared tasks, flattening groups into bracketed regions.
    ///
    /// Call after [`settle`](Self::settle); the queue is empty afterwards.
    pub(crate) fn take_tasks(&self) -> Vec<Task> {
        let slots = std::mem::take(&mut *self.slots.lock());
        let mut out = Vec::with_capacity(slots.len());
        for slot in slots {
            match slot {
                Slot::Task(task) => out.push(task),
                Slot::Group {
                    description,
                    members,
                } => {
                    out.push(Task::GroupStart { description });
                    out.append(&mut members.lock().close());
                    out.push(Task::GroupEnd);
                }
            }
        }
        out
    }

    /// Number of declared slots (a group counts once).
    pub(crate) fn len(&self) -> usize {
        self.slots.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn info(message: &str) -> Task {
        Task::Info {
            message: message.to_string(),
            location: None,
        }
    }

    fn labels(tasks: &[Task]) -> Vec<String> {
        tasks
            .iter()
            .map(|t| match t {
                Task::Info { message, .. } => message.clone(),
                Task::GroupStart { description } => format!("<{description}>"),
                Task::GroupEnd => "</>".to_string(),
                Task::Test(spec) => spec.description().to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_async_bodies_land_in_call_order() {
        let queue = TaskQueue::default();

        queue.push(info("first"));
        let slow = queue.reserve_group("slow".into());
        queue.chain(
            async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                slow.lock().push(info("slow-1"));
                slow.lock().push(info("slow-2"));
            }
            .boxed(),
        );
        let fast = queue.reserve_group("fast".into());
        queue.chain(
            async move {
                fast.lock().push(info("fast-1"));
            }
            .boxed(),
        );
        queue.push(info("last"));
        assert_eq!(queue.len(), 4);

        queue.settle().await;
        let tasks = queue.take_tasks();
        assert_eq!(
            labels(&tasks),
            vec!["first", "<slow>", "slow-1", "slow-2", "</>", "<fast>", "fast-1", "</>", "last"]
        );
        assert_eq!(queue.len(), 0);
    }

    #[tokio::test]
    async fn test_bodies_run_sequentially() {
        let queue = TaskQueue::default();
        let log: Arc<Mutex<Vec<&'static str>>> = Arc::default();

        for (name, delay) in [("a", 30u64), ("b", 0), ("c", 10)] {
            let log = Arc::clone(&log);
            queue.chain(
                async move {
                    log.lock().push(name);
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    log.lock().push(name);
                }
                .boxed(),
            );
        }
        queue.settle().await;
        assert_eq!(*log.lock(), vec!["a", "a", "b", "b", "c", "c"]);
    }

    #[tokio::test]
    async fn test_take_tasks_closes_member_buffers() {
        let queue = TaskQueue::default();
        let members = queue.reserve_group("g".into());
        members.lock().push(info("inside"));
        assert!(!members.lock().is_closed());

        queue.settle().await;
        assert_eq!(labels(&queue.take_tasks()), vec!["<g>", "inside", "</>"]);
        assert!(members.lock().is_closed());
        assert!(queue.take_tasks().is_empty());
    }
}
