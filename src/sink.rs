use parking_lot::Mutex;

use crate::probe::{Hit, ProbeOutcome};
use crate::session::Mode;

/// Thread-safe accumulator for hits. The only writer to the result log;
/// misses, suppressed outcomes and errors never reach it.
pub struct ResultSink {
    mode: Mode,
    log: Mutex<Vec<Hit>>,
}

impl ResultSink {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Append a hit to the log; every other outcome is a no-op. The
    /// found-line and the append come from this one place so concurrent
    /// probes can't interleave either.
    pub fn record(&self, outcome: ProbeOutcome) {
        if let ProbeOutcome::Hit(hit) = outcome {
            match self.mode {
                Mode::Sub => println!("[+] Found: {}", hit.identifier),
                _ => println!("[+] Found: {} (Status: {})", hit.identifier, hit.status),
            }
            self.log.lock().push(hit);
        }
    }

    /// Point-in-time copy of the log, safe to call while probes are
    /// still completing.
    pub fn snapshot(&self) -> Vec<Hit> {
        self.log.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.log.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.lock().is_empty()
    }
}
