//! A fixed-size sequence whose iterators are the unit of concurrency
//! control.
//!
//! [`SafeSequence<T>`] hands out short-lived [`Handle`]s: each is either a
//! reader or a writer, and for as long as any `Handle` is outstanding the
//! sequence guarantees many-readers-XOR-one-writer access to the underlying
//! buffer. Acquiring a `Handle` blocks the calling thread until that
//! invariant can be re-established; there is no timeout and no fairness
//! guarantee beyond wake-all-and-race (see the crate's DESIGN.md for the
//! reasoning).
//!
//! The hard part, and therefore the bulk of this crate, is the
//! synchronization engine that couples three things:
//! 1. [`SafeSequence`] — owns the buffer, a per-thread access ledger, and a
//!    condition-variable-backed gate; it is the factory for `Handle`s.
//! 2. The gate and ledger (internal) — block a thread until its requested
//!    role is admissible, then atomically debit a per-thread credit.
//! 3. [`Handle`] — an RAII credit owner: debited on construction, credited
//!    back on drop, so a handle cannot be forgotten, double-counted, or
//!    leaked across clones.
//!
//! ```
//! use safe_sequence::SafeSequence;
//!
//! let seq = SafeSequence::<char>::new(4).unwrap();
//! std::thread::scope(|scope| {
//!     scope.spawn(|| {
//!         let mut w = seq.begin_write();
//!         for _ in 0..4 {
//!             *w.deref_write().unwrap() = '1';
//!             let _ = w.advance();
//!         }
//!     });
//! });
//!
//! let r = seq.begin_read();
//! assert_eq!(*r.deref_read().unwrap(), '1');
//! ```
//!
//! [`UnsafeCursor`] is provided purely as an A/B baseline: it walks the same
//! buffer with no synchronization at all, so tests can demonstrate the torn
//! reads that `Handle`'s admission protocol exists to prevent.

mod cursor;
mod error;
mod gate;
mod handle;
mod ledger;
mod sequence;
mod trace;
mod types;

pub use cursor::UnsafeCursor;
pub use error::Error;
pub use handle::{Handle, Role};
pub use sequence::SafeSequence;
pub use trace::{NoopSink, TraceSink};
