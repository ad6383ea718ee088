use std::{future::Future, time::Duration};

use tokio::{sync::Mutex, time::Instant};
use tracing::debug;

/// Spaces calls at least `interval` apart. Callers that arrive early wait out
/// the rest of the interval, in arrival order.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last_started: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_started: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn run<F, Fut, T>(&self, call: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        if !self.interval.is_zero() {
            let mut last_started = self.last_started.lock().await;
            if let Some(previous) = *last_started {
                let ready_at = previous + self.interval;
                if ready_at > Instant::now() {
                    debug!(wait = ?(ready_at - Instant::now()), "throttled");
                    tokio::time::sleep_until(ready_at).await;
                }
            }
            *last_started = Some(Instant::now());
        }
        call().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_call_runs_immediately() {
        let throttle = Throttle::new(Duration::from_millis(5000));
        let start = Instant::now();
        assert_eq!(throttle.run(|| async { 1 }).await, 1);
        assert_eq!(Instant::now(), start);
    }

    #[tokio::test(start_paused = true)]
    async fn spaces_consecutive_calls() {
        let throttle = Throttle::new(Duration::from_millis(5000));
        let start = Instant::now();
        throttle.run(|| async {}).await;

        tokio::time::sleep(Duration::from_millis(1000)).await;
        let started = throttle.run(|| async { Instant::now() }).await;
        assert_eq!(started - start, Duration::from_millis(5000));

        // a late caller is not delayed
        tokio::time::sleep(Duration::from_millis(6000)).await;
        let before = Instant::now();
        let started = throttle.run(|| async { Instant::now() }).await;
        assert_eq!(started, before);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_queue_up() {
        let throttle = Arc::new(Throttle::new(Duration::from_millis(100)));
        let start = Instant::now();
        let tasks: Vec<_> = (0..3)
            .map(|_| {
                let throttle = throttle.clone();
                tokio::spawn(async move { throttle.run(|| async { Instant::now() }).await })
            })
            .collect();

        let mut offsets = Vec::new();
        for task in tasks {
            offsets.push(task.await.unwrap() - start);
        }
        offsets.sort();
        assert_eq!(
            offsets,
            [0, 100, 200].map(Duration::from_millis).to_vec()
        );
    }

    #[tokio::test]
    async fn zero_interval_is_pass_through() {
        let throttle = Throttle::new(Duration::ZERO);
        for i in 0..5 {
            assert_eq!(throttle.run(|| async move { i }).await, i);
        }
    }
}
