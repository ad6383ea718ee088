use std::time::Duration;

use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::trace;

/// Shortest interval period; shorter periods, zero included, are raised to it.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Handle to a scheduled callback. Dropping it leaves the callback scheduled.
#[derive(Debug)]
pub struct TimerHandle {
    task: Option<JoinHandle<()>>,
}

impl TimerHandle {
    pub fn from_task(task: JoinHandle<()>) -> Self {
        Self { task: Some(task) }
    }

    /// A handle that is not backed by anything, for timers that track
    /// callbacks themselves.
    pub fn detached() -> Self {
        Self { task: None }
    }

    pub fn cancel(&self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

pub trait OneShotTimer {
    fn set_timeout(&self, callback: Box<dyn FnOnce() + Send>, delay: Duration) -> TimerHandle;
}

pub trait RepeatingTimer {
    fn set_interval(&self, callback: Box<dyn FnMut() + Send>, period: Duration) -> TimerHandle;
}

/// Timers running on the current tokio runtime; scheduling outside of a
/// runtime panics.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioTimer;

impl OneShotTimer for TokioTimer {
    fn set_timeout(&self, callback: Box<dyn FnOnce() + Send>, delay: Duration) -> TimerHandle {
        TimerHandle::from_task(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            trace!(?delay, "timeout fired");
            callback();
        }))
    }
}

impl RepeatingTimer for TokioTimer {
    fn set_interval(
        &self,
        mut callback: Box<dyn FnMut() + Send>,
        period: Duration,
    ) -> TimerHandle {
        let period = period.max(MIN_PERIOD);
        TimerHandle::from_task(tokio::spawn(async move {
            // first tick after one full period, never immediately
            let mut ticks = tokio::time::interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                ticks.tick().await;
                trace!(?period, "interval fired");
                callback();
            }
        }))
    }
}

pub fn do_stuff_by_timeout<T, F>(timer: &T, callback: F, delay: Duration) -> TimerHandle
where
    T: OneShotTimer + ?Sized,
    F: FnOnce() + Send + 'static,
{
    timer.set_timeout(Box::new(callback), delay)
}

pub fn do_stuff_by_interval<T, F>(timer: &T, callback: F, period: Duration) -> TimerHandle
where
    T: RepeatingTimer + ?Sized,
    F: FnMut() + Send + 'static,
{
    timer.set_interval(Box::new(callback), period)
}
