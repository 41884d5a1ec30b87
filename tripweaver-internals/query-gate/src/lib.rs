//! Tripweaver Query Gate
//! Copyright (c) 2026 The Tripweaver Authors
//! Licensed and distributed under either of
//!   * MIT license (license terms at the root of the package or at http://opensource.org/licenses/MIT).
//!   * Apache v2 license (license terms at the root of the package or at http://www.apache.org/licenses/LICENSE-2.0).
//! at your option. This file may not be copied, modified, or distributed except according to those terms.

//! tripweaver-internals/query-gate
//! A concurrency gate for outbound provider calls, with exponential backoff
//! and jitter on retry. The itinerary engine fans out one future per travel
//! category; all of them funnel their HTTP calls through a shared gate so a
//! burst of categories never exceeds the provider's request allowance.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::time;

/// Error surfaced when a gated call cannot be completed.
#[derive(Debug, Error)]
pub enum QueryGateError {
    #[error("retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: anyhow::Error,
    },
    #[error("gate is closed")]
    GateClosed,
}

/// Tunables for a [`QueryGate`].
#[derive(Clone, Debug)]
pub struct GatePolicy {
    /// Max in-flight calls through the gate.
    pub max_concurrent: usize,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Ceiling for the backoff delay.
    pub max_delay: Duration,
    /// Fraction of the delay added as random jitter (0.0 disables jitter).
    pub jitter_factor: f64,
    /// Retries after the initial attempt. 0 means fail on first error.
    pub max_retries: u32,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
            jitter_factor: 0.5,
            max_retries: 3,
        }
    }
}

/// A shared gate bounding concurrent calls to an external service.
///
/// # Examples
///
/// ```ignore
/// let gate = QueryGate::with_concurrency_limit(4);
/// let body = gate.run(|| async { fetch(&url).await }).await?;
/// ```
#[derive(Clone, Debug)]
pub struct QueryGate {
    permits: Arc<Semaphore>,
    policy: GatePolicy,
}

impl Default for QueryGate {
    fn default() -> Self {
        Self::new(GatePolicy::default())
    }
}

impl QueryGate {
    pub fn new(policy: GatePolicy) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(policy.max_concurrent.max(1))),
            policy,
        }
    }

    /// Gate with the given concurrency limit and default retry policy.
    pub fn with_concurrency_limit(max_concurrent: usize) -> Self {
        Self::new(GatePolicy {
            max_concurrent,
            ..Default::default()
        })
    }

    /// Gate with no retries: one attempt, bounded concurrency only.
    pub fn single_attempt(max_concurrent: usize) -> Self {
        Self::new(GatePolicy {
            max_concurrent,
            max_retries: 0,
            ..Default::default()
        })
    }

    /// Run `f` under the gate, retrying with exponential backoff + jitter.
    ///
    /// The permit is held across retries so a flapping upstream does not
    /// multiply in-flight load.
    pub async fn run<T, F, Fut>(&self, mut f: F) -> Result<T, QueryGateError>
    where
        F: FnMut() -> Fut + Send,
        Fut: std::future::Future<Output = Result<T, anyhow::Error>> + Send,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| QueryGateError::GateClosed)?;

        let mut attempts = 0;
        let mut delay = self.policy.initial_delay;

        loop {
            match f().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempts += 1;
                    if attempts > self.policy.max_retries {
                        return Err(QueryGateError::RetriesExhausted {
                            attempts,
                            source: e,
                        });
                    }
                    time::sleep(self.jittered(delay)).await;
                    delay = std::cmp::min(delay * 2, self.policy.max_delay);
                }
            }
        }
    }

    fn jittered(&self, delay: Duration) -> Duration {
        if self.policy.jitter_factor <= 0.0 {
            return delay;
        }
        let jitter_ms = (delay.as_millis() as f64 * self.policy.jitter_factor) as u64;
        let rand_jitter = rand::thread_rng().gen_range(0..=jitter_ms);
        Duration::from_millis(delay.as_millis() as u64 + rand_jitter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

    #[tokio::test]
    async fn succeeds_first_try() {
        let gate = QueryGate::with_concurrency_limit(2);
        let out = gate.run(|| async { Ok::<_, anyhow::Error>(7) }).await;
        assert_eq!(out.unwrap(), 7);
    }

    #[tokio::test]
    async fn retries_until_success() {
        let gate = QueryGate::new(GatePolicy {
            initial_delay: Duration::from_millis(1),
            jitter_factor: 0.0,
            ..Default::default()
        });
        let calls = AtomicU32::new(0);
        let out = gate
            .run(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        anyhow::bail!("transient")
                    }
                    Ok(n)
                }
            })
            .await;
        assert_eq!(out.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausts_retries() {
        let gate = QueryGate::new(GatePolicy {
            initial_delay: Duration::from_millis(1),
            jitter_factor: 0.0,
            max_retries: 2,
            ..Default::default()
        });
        let out: Result<(), _> = gate.run(|| async { anyhow::bail!("always down") }).await;
        match out {
            Err(QueryGateError::RetriesExhausted { attempts, .. }) => assert_eq!(attempts, 3),
            other => panic!("expected RetriesExhausted, got {:?}", other.is_ok()),
        }
    }

    #[tokio::test]
    async fn single_attempt_does_not_retry() {
        let gate = QueryGate::single_attempt(1);
        let calls = AtomicU32::new(0);
        let out: Result<(), _> = gate
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { anyhow::bail!("down") }
            })
            .await;
        assert!(out.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn bounds_concurrency() {
        let gate = QueryGate::single_attempt(2);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let gate = gate.clone();
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            tasks.push(tokio::spawn(async move {
                gate.run(|| {
                    let in_flight = Arc::clone(&in_flight);
                    let peak = Arc::clone(&peak);
                    async move {
                        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        time::sleep(Duration::from_millis(10)).await;
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                        Ok::<_, anyhow::Error>(())
                    }
                })
                .await
            }));
        }
        for t in tasks {
            t.await.unwrap().unwrap();
        }
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }
}
