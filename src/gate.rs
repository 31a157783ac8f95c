use crate::ledger::AccessLedger;
use crate::types::{wait_while, Condvar, Mutex};

/// Condition-variable-backed admission control.
///
/// `Gate` owns the single mutex that both guards the `AccessLedger` and
/// serializes every admission/release against it, so "check predicate" and
/// "debit credit" always happen as one atomic step from the perspective of
/// every other thread (no thread can slip in between the two).
pub(crate) struct Gate {
    ledger: Mutex<AccessLedger>,
    condvar: Condvar,
}

impl Gate {
    pub(crate) fn new() -> Self {
        Gate {
            ledger: Mutex::new(AccessLedger::new()),
            condvar: Condvar::new(),
        }
    }

    /// Block the calling thread until `predicate(ledger)` holds, then run
    /// `debit` while still holding the lock, and return whatever `debit`
    /// returns. Spurious wakeups are handled by re-checking `predicate`.
    pub(crate) fn await_and_admit<P, D, R>(&self, predicate: P, debit: D) -> R
    where
        P: Fn(&AccessLedger) -> bool,
        D: FnOnce(&mut AccessLedger) -> R,
    {
        let guard = self.ledger.lock().unwrap();
        let mut guard = wait_while(&self.condvar, guard, |ledger| !predicate(ledger));
        debit(&mut guard)
    }

    /// Run `credit` under the lock, then wake every waiter.
    pub(crate) fn release_and_notify<C, R>(&self, credit: C) -> R
    where
        C: FnOnce(&mut AccessLedger) -> R,
    {
        let mut guard = self.ledger.lock().unwrap();
        let result = credit(&mut guard);
        drop(guard);
        self.condvar.notify_all();
        result
    }

    /// Run a read-only closure under the lock without waiting on anything.
    /// Used for `reader_count_self`/`writer_count_self` and the momentary
    /// `SafeSequence::read` path.
    pub(crate) fn with_ledger<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&AccessLedger) -> R,
    {
        let guard = self.ledger.lock().unwrap();
        f(&guard)
    }
}
