use std::cell::UnsafeCell;

use crate::cursor::UnsafeCursor;
use crate::error::Error;
use crate::gate::Gate;
use crate::handle::{Handle, Role};
use crate::ledger::Role as LedgerRole;
use crate::trace::{NoopSink, TraceSink};
use crate::types::thread;

/// A fixed-size sequence of `T` whose reader/writer `Handle`s are the unit
/// of concurrency control: many readers may be admitted at once, XOR a
/// single writer, enforced by an internal condition-variable-backed gate
/// rather than by the type system.
///
/// `SafeSequence` owns the element buffer, the access ledger, and the gate
/// exclusively; `Handle`s hold only a borrowed reference back to it, so the
/// borrow checker refuses to let a `SafeSequence` be dropped while any
/// `Handle` into it is still alive.
pub struct SafeSequence<T> {
    size: usize,
    data: UnsafeCell<Box<[T]>>,
    gate: Gate,
    trace: Box<dyn TraceSink>,
}

// SAFETY: all access to `data` is mediated by `gate`, which enforces the
// many-readers-XOR-one-writer invariant before any `Handle` is handed out.
// `Sync` additionally requires `T: Sync`: concurrent reader `Handle`s on
// distinct threads each hand out a `&T` via `deref_read`, so sharing `&T`
// across threads is exactly what this bound must answer for (the same
// reasoning `std::sync::RwLock<T>` uses).
unsafe impl<T: Send + Sync> Sync for SafeSequence<T> {}
unsafe impl<T: Send> Send for SafeSequence<T> {}

impl<T: Default + Clone> SafeSequence<T> {
    /// Create a sequence of `size` default-initialized elements. Fails with
    /// [`Error::InvalidSize`] if `size == 0`.
    pub fn new(size: usize) -> Result<Self, Error> {
        Self::with_trace(size, NoopSink)
    }

    /// Like [`SafeSequence::new`], but with a custom [`TraceSink`] for
    /// diagnostic events instead of the no-op default.
    pub fn with_trace<S: TraceSink + 'static>(size: usize, trace: S) -> Result<Self, Error> {
        if size == 0 {
            return Err(Error::InvalidSize);
        }
        let data = vec![T::default(); size].into_boxed_slice();
        Ok(SafeSequence {
            size,
            data: UnsafeCell::new(data),
            gate: Gate::new(),
            trace: Box::new(trace),
        })
    }
}

impl<T> SafeSequence<T> {
    pub fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn gate(&self) -> &Gate {
        &self.gate
    }

    pub(crate) fn trace(&self) -> &dyn TraceSink {
        self.trace.as_ref()
    }

    /// # Safety
    /// The caller must ensure `index < self.size` and must hold whatever
    /// external synchronization (a `Handle`'s credit, or the gate's mutex
    /// via `read`) the aliasing invariant requires before dereferencing the
    /// returned pointer.
    pub(crate) unsafe fn element_ptr(&self, index: usize) -> *mut T {
        (*self.data.get()).as_mut_ptr().add(index)
    }

    /// Bounds-checked random read that requires no credit: it takes the
    /// gate's mutex just long enough to clone the element out, so it can
    /// never race with a writer's mutation (which also holds the mutex
    /// while it is live — see `Handle::deref_write`, which bypasses the
    /// mutex but is excluded from running concurrently with any other
    /// accessor by admission).
    pub fn read(&self, index: usize) -> Result<T, Error>
    where
        T: Clone,
    {
        if index >= self.size {
            return Err(Error::OutOfBounds {
                index,
                len: self.size,
            });
        }
        Ok(self
            .gate
            .with_ledger(|_ledger| unsafe { (*self.element_ptr(index)).clone() }))
    }

    /// Acquire a reader-role handle at `offset`. Blocks until no other
    /// thread holds a writer credit.
    pub fn reader_at(&self, offset: usize) -> Result<Handle<'_, T>, Error> {
        if offset > self.size {
            return Err(Error::OutOfBounds {
                index: offset,
                len: self.size,
            });
        }
        let owner = thread::current().id();
        self.gate.await_and_admit(
            |ledger| !ledger.has_other(LedgerRole::Writer, owner),
            |ledger| -> Result<(), Error> {
                ledger.ensure(owner);
                ledger.adjust(owner, LedgerRole::Reader, 1)
            },
        )?;
        self.trace.event(owner, "reader admitted");
        Ok(Handle::new(self, offset, Role::Read, owner))
    }

    /// Acquire a writer-role handle at `offset`. Blocks until every other
    /// thread's credits are zero. A writer also counts as a reader on its
    /// own thread, so the same thread may still call `reader_at` while
    /// holding this handle without deadlocking on itself.
    ///
    /// Fails immediately with [`Error::DuplicateWriter`] if the calling
    /// thread already holds a writer handle: admitting a second one would
    /// hand out two live `&mut T` references to the same element from the
    /// same thread, which is unsound regardless of what any other thread is
    /// doing, so this is rejected rather than queued behind the gate.
    pub fn writer_at(&self, offset: usize) -> Result<Handle<'_, T>, Error> {
        if offset > self.size {
            return Err(Error::OutOfBounds {
                index: offset,
                len: self.size,
            });
        }
        let owner = thread::current().id();
        if self.gate.with_ledger(|ledger| ledger.writer_count(owner) > 0) {
            return Err(Error::DuplicateWriter);
        }
        self.gate.await_and_admit(
            |ledger| !ledger.has_other_any(owner),
            |ledger| -> Result<(), Error> {
                ledger.ensure(owner);
                ledger.adjust(owner, LedgerRole::Reader, 1)?;
                ledger.adjust(owner, LedgerRole::Writer, 1)
            },
        )?;
        self.trace.event(owner, "writer admitted");
        Ok(Handle::new(self, offset, Role::ReadWrite, owner))
    }

    pub fn begin_read(&self) -> Handle<'_, T> {
        self.reader_at(0).expect("offset 0 is always in bounds")
    }

    pub fn end_read(&self) -> Handle<'_, T> {
        self.reader_at(self.size)
            .expect("offset == size is always in bounds")
    }

    pub fn begin_write(&self) -> Handle<'_, T> {
        self.writer_at(0).expect("offset 0 is always in bounds")
    }

    pub fn end_write(&self) -> Handle<'_, T> {
        self.writer_at(self.size)
            .expect("offset == size is always in bounds")
    }

    /// An unsynchronized cursor pair for A/B testing against `Handle`.
    pub fn unsafe_begin(&self) -> UnsafeCursor<'_, T> {
        UnsafeCursor::new(self, 0)
    }

    pub fn unsafe_end(&self) -> UnsafeCursor<'_, T> {
        UnsafeCursor::new(self, self.size)
    }

    /// Reader credit held by the calling thread right now.
    pub fn reader_count_self(&self) -> u32 {
        let t = thread::current().id();
        self.gate.with_ledger(|ledger| ledger.reader_count(t))
    }

    /// Writer credit held by the calling thread right now.
    pub fn writer_count_self(&self) -> u32 {
        let t = thread::current().id();
        self.gate.with_ledger(|ledger| ledger.writer_count(t))
    }
}
