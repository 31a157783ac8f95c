use std::collections::HashMap;

use more_asserts::assert_ge;

use crate::error::Error;
use crate::types::ThreadId;

/// Which credit an operation concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Reader,
    Writer,
}

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    reader: u32,
    writer: u32,
}

impl Counters {
    fn is_empty(&self) -> bool {
        self.reader == 0 && self.writer == 0
    }

    fn get(&self, role: Role) -> u32 {
        match role {
            Role::Reader => self.reader,
            Role::Writer => self.writer,
        }
    }

    fn get_mut(&mut self, role: Role) -> &mut u32 {
        match role {
            Role::Reader => &mut self.reader,
            Role::Writer => &mut self.writer,
        }
    }
}

/// Per-thread reader/writer credit table. Every operation here assumes the
/// caller already holds the `Gate`'s mutex; the ledger itself carries no
/// lock of its own (see `gate.rs`).
#[derive(Debug, Default)]
pub(crate) struct AccessLedger {
    threads: HashMap<ThreadId, Counters>,
}

impl AccessLedger {
    pub(crate) fn new() -> Self {
        AccessLedger {
            threads: HashMap::new(),
        }
    }

    /// Create a zero-initialized entry for `t` if one doesn't already exist.
    pub(crate) fn ensure(&mut self, t: ThreadId) {
        self.threads.entry(t).or_insert_with(Counters::default);
    }

    /// Add `delta` (`+1` or `-1`) to `t`'s credit for `role`.
    pub(crate) fn adjust(&mut self, t: ThreadId, role: Role, delta: i32) -> Result<(), Error> {
        assert_ge!(delta.abs(), 1);
        let entry = match self.threads.get_mut(&t) {
            Some(entry) => entry,
            None if delta < 0 => return Err(Error::LedgerInvariant),
            None => self.threads.entry(t).or_insert_with(Counters::default),
        };

        let current = entry.get(role) as i64;
        let next = current + delta as i64;
        if next < 0 {
            return Err(Error::LedgerInvariant);
        }
        *entry.get_mut(role) = next as u32;

        if entry.is_empty() {
            self.threads.remove(&t);
        }
        Ok(())
    }

    /// Sum of `role`'s credit across every thread.
    pub(crate) fn sum(&self, role: Role) -> u32 {
        self.threads.values().map(|c| c.get(role)).sum()
    }

    /// True iff some thread other than `self_t` holds a nonzero `role` credit.
    pub(crate) fn has_other(&self, role: Role, self_t: ThreadId) -> bool {
        self.threads
            .iter()
            .any(|(&t, c)| t != self_t && c.get(role) > 0)
    }

    /// True iff some thread other than `self_t` holds any nonzero credit.
    pub(crate) fn has_other_any(&self, self_t: ThreadId) -> bool {
        self.threads
            .iter()
            .any(|(&t, c)| t != self_t && !c.is_empty())
    }

    pub(crate) fn reader_count(&self, t: ThreadId) -> u32 {
        self.threads.get(&t).map_or(0, |c| c.reader)
    }

    pub(crate) fn writer_count(&self, t: ThreadId) -> u32 {
        self.threads.get(&t).map_or(0, |c| c.writer)
    }
}
