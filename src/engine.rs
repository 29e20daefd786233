use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use crate::probe::ProbeOutcome;
use crate::session::SessionContext;
use crate::sink::ResultSink;

#[derive(Debug, Default)]
struct Tallies {
    hits: AtomicUsize,
    misses: AtomicUsize,
    suppressed: AtomicUsize,
    errors: AtomicUsize,
    skipped: AtomicUsize,
}

/// Aggregate probe counts for one dispatcher run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub hits: usize,
    pub misses: usize,
    pub suppressed: usize,
    pub errors: usize,
    pub skipped: usize,
}

/// Bounded-concurrency scheduler: one task per candidate, at most
/// `concurrency` probes in flight, cooperative cancellation via the
/// session context. Mode differences live entirely in the probe closure.
pub struct Dispatcher {
    semaphore: Arc<Semaphore>,
    tallies: Arc<Tallies>,
}

impl Dispatcher {
    pub fn new(concurrency: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
            tallies: Arc::new(Tallies::default()),
        }
    }

    /// Drain every candidate through `probe_fn`. Each task checks the
    /// cancellation flag before probing: once the flag is set no new
    /// probe starts, but probes already issued run to completion and
    /// their hits still land in the sink. Returns after all submitted
    /// tasks have completed or been skipped.
    pub async fn run<F, Fut>(
        &self,
        candidates: Vec<String>,
        ctx: Arc<SessionContext>,
        sink: Arc<ResultSink>,
        probe_fn: F,
    ) where
        F: Fn(String) -> Fut + Clone + Send + 'static,
        Fut: Future<Output = ProbeOutcome> + Send + 'static,
    {
        let mut tasks = FuturesUnordered::new();

        for candidate in candidates {
            let permit = self.semaphore.clone().acquire_owned().await.unwrap();
            let ctx = ctx.clone();
            let sink = sink.clone();
            let tallies = self.tallies.clone();
            let probe_fn = probe_fn.clone();

            tasks.push(tokio::spawn(async move {
                if ctx.is_cancelled() {
                    tallies.skipped.fetch_add(1, Ordering::Relaxed);
                    drop(permit);
                    return;
                }
                let outcome = probe_fn(candidate).await;
                match &outcome {
                    ProbeOutcome::Hit(_) => tallies.hits.fetch_add(1, Ordering::Relaxed),
                    ProbeOutcome::Miss => tallies.misses.fetch_add(1, Ordering::Relaxed),
                    ProbeOutcome::Suppressed => {
                        tallies.suppressed.fetch_add(1, Ordering::Relaxed)
                    }
                    ProbeOutcome::Error(_) => tallies.errors.fetch_add(1, Ordering::Relaxed),
                };
                sink.record(outcome);
                drop(permit); // release the worker slot
            }));
        }

        while let Some(joined) = tasks.next().await {
            if joined.is_err() {
                self.tallies.errors.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn stats(&self) -> DispatchStats {
        DispatchStats {
            hits: self.tallies.hits.load(Ordering::Relaxed),
            misses: self.tallies.misses.load(Ordering::Relaxed),
            suppressed: self.tallies.suppressed.load(Ordering::Relaxed),
            errors: self.tallies.errors.load(Ordering::Relaxed),
            skipped: self.tallies.skipped.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::Hit;
    use crate::session::Mode;

    fn fixtures(mode: Mode) -> (Arc<SessionContext>, Arc<ResultSink>) {
        (
            Arc::new(SessionContext::new(mode, None, None)),
            Arc::new(ResultSink::new(mode)),
        )
    }

    fn candidates(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("word-{i}")).collect()
    }

    #[tokio::test]
    async fn every_candidate_is_probed_once() {
        let (ctx, sink) = fixtures(Mode::Dir);
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(8);

        let counted = calls.clone();
        dispatcher
            .run(candidates(100), ctx, sink.clone(), move |word| {
                let counted = counted.clone();
                async move {
                    counted.fetch_add(1, Ordering::Relaxed);
                    ProbeOutcome::Hit(Hit::http(word, 200, 0))
                }
            })
            .await;

        assert_eq!(calls.load(Ordering::Relaxed), 100);
        assert_eq!(sink.len(), 100);
        assert_eq!(dispatcher.stats().hits, 100);
    }

    #[tokio::test]
    async fn outcome_tallies_are_kept() {
        let (ctx, sink) = fixtures(Mode::Dir);
        let dispatcher = Dispatcher::new(4);

        dispatcher
            .run(candidates(40), ctx, sink.clone(), move |word| async move {
                let n: usize = word.trim_start_matches("word-").parse().unwrap();
                match n % 4 {
                    0 => ProbeOutcome::Hit(Hit::http(word, 200, 1)),
                    1 => ProbeOutcome::Miss,
                    2 => ProbeOutcome::Suppressed,
                    _ => ProbeOutcome::Error(crate::probe::ProbeErrorKind::Timeout),
                }
            })
            .await;

        let stats = dispatcher.stats();
        assert_eq!(stats.hits, 10);
        assert_eq!(stats.misses, 10);
        assert_eq!(stats.suppressed, 10);
        assert_eq!(stats.errors, 10);
        assert_eq!(sink.len(), 10);
    }

    #[tokio::test]
    async fn cancelled_context_skips_every_task() {
        let (ctx, sink) = fixtures(Mode::Dir);
        ctx.cancel();
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::new(4);

        let counted = calls.clone();
        dispatcher
            .run(candidates(50), ctx, sink.clone(), move |word| {
                let counted = counted.clone();
                async move {
                    counted.fetch_add(1, Ordering::Relaxed);
                    ProbeOutcome::Hit(Hit::http(word, 200, 0))
                }
            })
            .await;

        assert_eq!(calls.load(Ordering::Relaxed), 0);
        assert!(sink.is_empty());
        assert_eq!(dispatcher.stats().skipped, 50);
    }

    #[tokio::test]
    async fn cancellation_mid_run_suppresses_future_starts() {
        let (ctx, sink) = fixtures(Mode::Dir);
        let dispatcher = Dispatcher::new(1);

        // The first probe flips the flag; with a single worker slot every
        // later task observes it before starting.
        let cancel_from = ctx.clone();
        dispatcher
            .run(candidates(20), ctx, sink.clone(), move |word| {
                let cancel_from = cancel_from.clone();
                async move {
                    cancel_from.cancel();
                    ProbeOutcome::Hit(Hit::http(word, 200, 0))
                }
            })
            .await;

        let stats = dispatcher.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.skipped, 19);
        // The in-flight probe's hit still lands in the snapshot.
        assert_eq!(sink.snapshot().len(), 1);
    }
}
