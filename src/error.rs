use std::fmt;

/// Errors raised by the synchronization core.
///
/// All of these are programmer errors: a caller violating the role/thread
/// discipline the crate enforces, or (for `LedgerInvariant`) a detected
/// corruption of the internal ledger that should never happen if the crate
/// itself is correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// `Handle::deref_write` called on a reader-role handle.
    RoleViolation,
    /// `Handle::advance` moved past `end`, or `SafeSequence::read` was given
    /// an out-of-range index.
    OutOfBounds { index: usize, len: usize },
    /// `Handle::try_clone` called from a thread other than the handle's
    /// owning thread.
    CrossThreadCopy,
    /// The ledger would have gone negative, or a decrement targeted a
    /// thread with no entry. Indicates prior corruption.
    LedgerInvariant,
    /// `SafeSequence::new` was given a size of zero.
    InvalidSize,
    /// `SafeSequence::writer_at` or `Handle::try_clone` was asked to mint a
    /// second writer-role credit for a thread that already holds one.
    /// Admitting it would hand out two live `&mut T` references to the same
    /// element from the same thread, which no predicate re-check can make
    /// sound, so it is rejected outright rather than blocked.
    DuplicateWriter,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::RoleViolation => {
                write!(f, "deref_write called on a reader-role handle")
            }
            Error::OutOfBounds { index, len } => {
                write!(f, "index {} out of bounds for length {}", index, len)
            }
            Error::CrossThreadCopy => {
                write!(f, "handle cloned from a thread other than its owner")
            }
            Error::LedgerInvariant => {
                write!(f, "access ledger invariant violated")
            }
            Error::InvalidSize => write!(f, "sequence size must be greater than zero"),
            Error::DuplicateWriter => {
                write!(f, "thread already holds a writer handle for this sequence")
            }
        }
    }
}

impl std::error::Error for Error {}
