use crate::error::Error;
use crate::ledger::Role as LedgerRole;
use crate::sequence::SafeSequence;
use crate::types::{thread, ThreadId};

/// Which kind of access a `Handle` was admitted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Read-only. Admitted so long as no other thread holds a writer.
    Read,
    /// Read and write. Admitted only when no other thread holds any credit.
    /// A writer also carries a reader credit on its own thread, which is
    /// why a thread already holding a writer may still acquire a reader
    /// without blocking on itself (see `SafeSequence::reader_at`).
    ReadWrite,
}

/// A live, credited cursor into a [`SafeSequence`].
///
/// Constructed only by [`SafeSequence::reader_at`] / [`SafeSequence::writer_at`]
/// (and the `begin_*`/`end_*` convenience wrappers). Dropping a `Handle`
/// releases its credit and wakes any thread blocked on admission. There is
/// no postfix-increment equivalent exposed: only prefix-style `advance`,
/// since a postfix `next` would require cloning the handle (and thus
/// debiting another credit) for every step.
pub struct Handle<'seq, T> {
    seq: &'seq SafeSequence<T>,
    cursor: usize,
    role: Role,
    owner: ThreadId,
}

impl<'seq, T> Handle<'seq, T> {
    pub(crate) fn new(seq: &'seq SafeSequence<T>, cursor: usize, role: Role, owner: ThreadId) -> Self {
        Handle {
            seq,
            cursor,
            role,
            owner,
        }
    }

    /// The handle's role (`Read` or `ReadWrite`).
    pub fn role(&self) -> Role {
        self.role
    }

    /// Current offset into the sequence, in `0..=size`.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Move the cursor one element forward. Valid so long as the resulting
    /// position is `<= size` (i.e. advancing onto the one-past-the-end
    /// position is fine; advancing past that fails).
    pub fn advance(&mut self) -> Result<(), Error> {
        let len = self.seq.size();
        if self.cursor >= len {
            return Err(Error::OutOfBounds {
                index: self.cursor + 1,
                len,
            });
        }
        self.cursor += 1;
        Ok(())
    }

    /// Read the element at the current position.
    pub fn deref_read(&self) -> Result<&T, Error> {
        let len = self.seq.size();
        if self.cursor >= len {
            return Err(Error::OutOfBounds {
                index: self.cursor,
                len,
            });
        }
        // SAFETY: the handle's admission guarantees no other thread holds a
        // conflicting credit for as long as `self` is alive, and `cursor`
        // was just bounds-checked against `len`.
        Ok(unsafe { &*self.seq.element_ptr(self.cursor) })
    }

    /// Mutably access the element at the current position. Only valid on a
    /// `ReadWrite`-role handle.
    pub fn deref_write(&mut self) -> Result<&mut T, Error> {
        if self.role != Role::ReadWrite {
            return Err(Error::RoleViolation);
        }
        let len = self.seq.size();
        if self.cursor >= len {
            return Err(Error::OutOfBounds {
                index: self.cursor,
                len,
            });
        }
        // SAFETY: `ReadWrite` admission guarantees this is the sole
        // accessor of the buffer (besides itself, as a reader) for as long
        // as `self` is alive.
        Ok(unsafe { &mut *self.seq.element_ptr(self.cursor) })
    }

    /// Difference in cursor position between two handles into the same
    /// sequence.
    pub fn distance(&self, other: &Self) -> isize {
        self.cursor as isize - other.cursor as isize
    }

    /// Debit one more credit for the same role, on the same thread that
    /// owns `self`. Does not re-check the admission predicate against other
    /// threads: the credit is already compatible with the aliasing
    /// invariant because it is the same role, on a thread already admitted.
    ///
    /// Fails with [`Error::CrossThreadCopy`] if called from a thread other
    /// than the handle's owner, and with [`Error::DuplicateWriter`] on a
    /// `ReadWrite`-role handle: a second live writer handle on the same
    /// thread would let two callers get a `&mut T` to the same element at
    /// once, which is unsound no matter whose thread it is.
    pub fn try_clone(&self) -> Result<Handle<'seq, T>, Error> {
        let caller = thread::current().id();
        if caller != self.owner {
            return Err(Error::CrossThreadCopy);
        }
        if self.role == Role::ReadWrite {
            return Err(Error::DuplicateWriter);
        }
        let owner = self.owner;
        let role = self.role;
        self.seq.gate().await_and_admit(
            |_ledger| true,
            |ledger| -> Result<(), Error> { ledger.adjust(owner, LedgerRole::Reader, 1) },
        )?;
        self.seq.trace().event(owner, "handle cloned");
        Ok(Handle {
            seq: self.seq,
            cursor: self.cursor,
            role,
            owner,
        })
    }
}

impl<'seq, T> PartialEq for Handle<'seq, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.seq, other.seq) && self.cursor == other.cursor
    }
}

impl<'seq, T> Eq for Handle<'seq, T> {}

impl<'seq, T> std::fmt::Debug for Handle<'seq, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle")
            .field("cursor", &self.cursor)
            .field("role", &self.role)
            .field("owner", &self.owner)
            .finish()
    }
}

impl<'seq, T> Drop for Handle<'seq, T> {
    fn drop(&mut self) {
        // Credit is released against `self.owner`, not the thread executing
        // this drop. A handle dropped on a different thread than it was
        // created on is documented as caller misuse for the purposes of the
        // reader/writer admission reasoning, but it cannot corrupt the
        // ledger: every mutation goes through the Gate's mutex regardless of
        // which thread calls in (see DESIGN.md).
        let owner = self.owner;
        let role = self.role;
        let result = self.seq.gate().release_and_notify(|ledger| {
            ledger.adjust(owner, LedgerRole::Reader, -1)?;
            if role == Role::ReadWrite {
                ledger.adjust(owner, LedgerRole::Writer, -1)?;
            }
            Ok::<(), Error>(())
        });
        if let Err(err) = result {
            // A bug in the library itself, not a caller mistake: the ledger
            // should never be able to reach this state from the public API.
            panic!("safe_sequence: ledger invariant violated releasing handle credit: {:?}", err);
        }
        self.seq.trace().event(owner, "handle dropped");
    }
}
