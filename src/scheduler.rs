use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::mem;
use std::time::Duration;

use crate::game::Burst;

/// Callbacks the game arms on the scheduler. Every task is fire-once and
/// rearms itself when it runs.
#[derive(Clone, Debug, PartialEq)]
pub enum Task {
    Tick,
    Render,
    Burst(Burst),
}

struct Timer {
    at: Duration,
    seq: u64,
    task: Task,
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
    }
}

impl Eq for Timer {}

impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        other.at.cmp(&self.at) // Min-heap on deadline
            .then_with(|| other.seq.cmp(&self.seq)) // FIFO for equal deadlines
    }
}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Single-threaded timer and next-paint queue over a virtual clock.
///
/// The clock only moves when the host calls [`Scheduler::due_timers`], so
/// the same sequence of calls always produces the same schedule.
pub struct Scheduler {
    now: Duration,
    seq: u64,
    timers: BinaryHeap<Timer>,
    frame: Vec<Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler { now: Duration::ZERO, seq: 0, timers: BinaryHeap::new(), frame: vec![] }
    }

    /// Runs `task` once, `delay` after the current clock.
    pub fn after(&mut self, delay: Duration, task: Task) {
        self.seq += 1;
        self.timers.push(Timer { at: self.now + delay, seq: self.seq, task });
    }

    /// Runs `task` once before the next paint.
    pub fn next_frame(&mut self, task: Task) {
        self.frame.push(task);
    }

    /// Moves the clock to `now` and pops every timer that is due, earliest first.
    pub fn due_timers(&mut self, now: Duration) -> Vec<Task> {
        self.now = self.now.max(now);

        let mut due = vec![];
        while let Some(timer) = self.timers.peek() {
            if timer.at > self.now {
                break;
            }
            if let Some(timer) = self.timers.pop() {
                due.push(timer.task);
            }
        }
        due
    }

    /// Drains the tasks registered for the coming paint. Tasks registered
    /// while these run wait for the paint after.
    pub fn take_frame(&mut self) -> Vec<Task> {
        mem::take(&mut self.frame)
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.peek().map(|timer| timer.at)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn pending_frame(&self) -> usize {
        self.frame.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fires_timers_in_deadline_order() {
        let mut scheduler = Scheduler::new();
        scheduler.after(ms(30), Task::Render);
        scheduler.after(ms(10), Task::Tick);

        assert_eq!(scheduler.next_deadline(), Some(ms(10)));
        assert!(scheduler.due_timers(ms(5)).is_empty());
        assert_eq!(scheduler.due_timers(ms(10)), vec![Task::Tick]);
        assert_eq!(scheduler.due_timers(ms(100)), vec![Task::Render]);
        assert_eq!(scheduler.pending_timers(), 0);
    }

    #[test]
    fn equal_deadlines_fire_in_arming_order() {
        let mut scheduler = Scheduler::new();
        scheduler.after(ms(10), Task::Render);
        scheduler.after(ms(10), Task::Tick);
        assert_eq!(scheduler.due_timers(ms(10)), vec![Task::Render, Task::Tick]);
    }

    #[test]
    fn delays_are_relative_to_the_latest_clock() {
        let mut scheduler = Scheduler::new();
        scheduler.due_timers(ms(50));
        scheduler.after(ms(10), Task::Tick);
        assert_eq!(scheduler.next_deadline(), Some(ms(60)));

        // The clock never runs backwards
        scheduler.due_timers(ms(20));
        scheduler.after(ms(5), Task::Render);
        assert_eq!(scheduler.next_deadline(), Some(ms(55)));
    }

    #[test]
    fn frame_tasks_rearmed_during_a_frame_wait_for_the_next() {
        let mut scheduler = Scheduler::new();
        scheduler.next_frame(Task::Render);

        let frame = scheduler.take_frame();
        assert_eq!(frame, vec![Task::Render]);
        scheduler.next_frame(Task::Render);

        assert_eq!(scheduler.pending_frame(), 1);
        assert_eq!(scheduler.take_frame(), vec![Task::Render]);
        assert!(scheduler.take_frame().is_empty());
    }
}
