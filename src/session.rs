use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use ahash::AHashSet;
use hickory_resolver::TokioAsyncResolver;
use reqwest::Client;

use crate::baseline;
use crate::engine::{DispatchStats, Dispatcher};
use crate::output;
use crate::probe::{self, PROBE_TIMEOUT};
use crate::sink::ResultSink;
use crate::target::TargetDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Dir,
    Sub,
    Fuzz,
    FuzzAny,
    Vhost,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Dir => "dir",
            Mode::Sub => "sub",
            Mode::Fuzz => "fuzz",
            Mode::FuzzAny => "fuzzany",
            Mode::Vhost => "vhost",
        }
    }
}

/// Run state shared with the dispatcher and every probe closure. Apart
/// from the cancellation flag, everything here is immutable once the
/// session has been prepared.
#[derive(Debug)]
pub struct SessionContext {
    pub mode: Mode,
    pub started: Instant,
    pub wildcard_ips: Option<AHashSet<Ipv4Addr>>,
    pub vhost_baseline: Option<usize>,
    cancelled: AtomicBool,
}

impl SessionContext {
    pub fn new(
        mode: Mode,
        wildcard_ips: Option<AHashSet<Ipv4Addr>>,
        vhost_baseline: Option<usize>,
    ) -> Self {
        Self {
            mode,
            started: Instant::now(),
            wildcard_ips,
            vhost_baseline,
            cancelled: AtomicBool::new(false),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Completed,
    Interrupted,
}

/// What the run produced, for the summary and the exit decision.
#[derive(Debug, Clone, Copy)]
pub struct SessionReport {
    pub state: SessionState,
    pub stats: DispatchStats,
    pub paths: usize,
    pub subdomains: usize,
    pub vhosts: usize,
    pub elapsed: Duration,
}

enum Transport {
    Http(Client),
    Dns(Arc<TokioAsyncResolver>),
}

/// Owns the run lifecycle: baseline detection, dispatcher construction,
/// the single result log, and persistence flushes.
pub struct Session {
    descriptor: TargetDescriptor,
    ctx: Arc<SessionContext>,
    sink: Arc<ResultSink>,
    transport: Transport,
    threads: usize,
    output: Option<PathBuf>,
    state: SessionState,
}

impl Session {
    /// Build the transport for the chosen mode and run its baseline
    /// probe. Baselines run exactly once, before any enumeration, so
    /// every probe of the run sees the same suppression set.
    pub async fn prepare(
        descriptor: TargetDescriptor,
        threads: usize,
        output: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let mode = descriptor.mode();
        let (transport, wildcard_ips, vhost_baseline) = match &descriptor {
            TargetDescriptor::Subdomain { base_domain } => {
                let resolver = Arc::new(probe::dns::build_resolver(PROBE_TIMEOUT));
                let wildcard = baseline::detect_dns_wildcard(&resolver, base_domain).await;
                (Transport::Dns(resolver), wildcard, None)
            }
            TargetDescriptor::Vhost { ip, base_domain } => {
                let client = probe::http::build_vhost_client(PROBE_TIMEOUT)?;
                let size = baseline::detect_vhost_baseline(&client, ip, base_domain).await;
                (Transport::Http(client), None, size)
            }
            _ => (
                Transport::Http(probe::http::build_client(PROBE_TIMEOUT)?),
                None,
                None,
            ),
        };

        Ok(Self {
            descriptor,
            ctx: Arc::new(SessionContext::new(mode, wildcard_ips, vhost_baseline)),
            sink: Arc::new(ResultSink::new(mode)),
            transport,
            threads: threads.max(1),
            output,
            state: SessionState::Idle,
        })
    }

    pub fn context(&self) -> Arc<SessionContext> {
        self.ctx.clone()
    }

    pub fn descriptor(&self) -> &TargetDescriptor {
        &self.descriptor
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Fan the wordlist out through the dispatcher and drain it. Returns
    /// once every task has completed or been skipped; the state records
    /// whether the run finished on its own or was cut short.
    pub async fn run(&mut self, words: Vec<String>) -> SessionReport {
        let candidates = self.descriptor.expand(&words);
        tracing::debug!(
            mode = self.ctx.mode.as_str(),
            words = words.len(),
            tasks = candidates.len(),
            threads = self.threads,
            "starting enumeration"
        );

        self.state = SessionState::Running;
        let dispatcher = Dispatcher::new(self.threads);

        match &self.transport {
            Transport::Http(client) => {
                if let TargetDescriptor::Vhost { ip, .. } = &self.descriptor {
                    let client = client.clone();
                    let ip = ip.clone();
                    dispatcher
                        .run(candidates, self.ctx.clone(), self.sink.clone(), move |vhost| {
                            let client = client.clone();
                            let ip = ip.clone();
                            async move { probe::http::probe_vhost(&client, &ip, vhost).await }
                        })
                        .await;
                } else {
                    let client = client.clone();
                    dispatcher
                        .run(candidates, self.ctx.clone(), self.sink.clone(), move |url| {
                            let client = client.clone();
                            async move { probe::http::probe_url(&client, url).await }
                        })
                        .await;
                }
            }
            Transport::Dns(resolver) => {
                let resolver = resolver.clone();
                let ctx = self.ctx.clone();
                dispatcher
                    .run(candidates, self.ctx.clone(), self.sink.clone(), move |fqdn| {
                        let resolver = resolver.clone();
                        let ctx = ctx.clone();
                        async move {
                            probe::dns::probe_subdomain(&resolver, fqdn, ctx.wildcard_ips.as_ref())
                                .await
                        }
                    })
                    .await;
            }
        }

        self.state = if self.ctx.is_cancelled() {
            SessionState::Interrupted
        } else {
            SessionState::Completed
        };

        let stats = dispatcher.stats();
        tracing::info!(
            hits = stats.hits,
            misses = stats.misses,
            suppressed = stats.suppressed,
            errors = stats.errors,
            skipped = stats.skipped,
            "probe tally"
        );

        let found = self.sink.len();
        let (paths, subdomains, vhosts) = match self.ctx.mode {
            Mode::Dir | Mode::Fuzz | Mode::FuzzAny => (found, 0, 0),
            Mode::Sub => (0, found, 0),
            Mode::Vhost => (0, 0, found),
        };
        SessionReport {
            state: self.state,
            stats,
            paths,
            subdomains,
            vhosts,
            elapsed: self.ctx.elapsed(),
        }
    }

    /// Best-effort persistence. A failed write is reported once and
    /// never aborts the run.
    pub fn flush(&self, partial: bool) {
        let Some(path) = &self.output else {
            return;
        };
        match output::write_results(path, self.sink.mode(), &self.sink.snapshot()) {
            Ok(()) => {
                if partial {
                    println!("[+] Partial results saved to {}", path.display());
                } else {
                    println!("[+] Results saved to {}", path.display());
                }
            }
            Err(err) => {
                if partial {
                    println!("[-] Error saving partial results: {err}");
                } else {
                    println!("[-] Error saving results: {err}");
                }
            }
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Copy of the hits recorded so far.
    pub fn results(&self) -> Vec<crate::probe::Hit> {
        self.sink.snapshot()
    }
}
