//! Illustrative external client, not part of the crate's public API or test
//! suite. Mirrors the original `producer_consumer_v2.cpp` demo: several
//! reader threads traverse the sequence concurrently with a writer, using
//! both `Handle` (safe) and `UnsafeCursor` (racy) so the difference is
//! visible on stdout.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use safe_sequence::SafeSequence;

fn main() {
    let seq = Arc::new(SafeSequence::<char>::new(16).unwrap());
    let stop = Arc::new(AtomicBool::new(false));

    thread::scope(|scope| {
        for id in 0..4 {
            let seq = Arc::clone(&seq);
            let stop = Arc::clone(&stop);
            scope.spawn(move || {
                let mut torn = 0u32;
                while !stop.load(Ordering::Relaxed) {
                    let mut r = seq.begin_read();
                    let first = *r.deref_read().unwrap();
                    for _ in 1..seq.size() {
                        r.advance().unwrap();
                        if *r.deref_read().unwrap() != first {
                            torn += 1;
                        }
                    }
                }
                println!("safe reader {id}: torn traversals = {torn}");
            });
        }

        let writer_seq = Arc::clone(&seq);
        let writer_stop = Arc::clone(&stop);
        scope.spawn(move || {
            for round in 0..20u8 {
                let ch = (b'a' + (round % 26)) as char;
                let mut w = writer_seq.begin_write();
                for i in 0..writer_seq.size() {
                    if i > 0 {
                        w.advance().unwrap();
                    }
                    *w.deref_write().unwrap() = ch;
                }
                thread::sleep(Duration::from_millis(2));
            }
            writer_stop.store(true, Ordering::Relaxed);
        });
    });

    println!("now repeating the race with UnsafeCursor (expect torn traversals > 0)");
    let seq = Arc::new(SafeSequence::<char>::new(16).unwrap());
    let stop = Arc::new(AtomicBool::new(false));
    thread::scope(|scope| {
        let seq_r = Arc::clone(&seq);
        let stop_r = Arc::clone(&stop);
        scope.spawn(move || {
            let mut torn = 0u32;
            while !stop_r.load(Ordering::Relaxed) {
                let mut cursor = seq_r.unsafe_begin();
                let first = unsafe { *cursor.deref() };
                for _ in 1..seq_r.size() {
                    cursor.advance();
                    if unsafe { *cursor.deref() } != first {
                        torn += 1;
                    }
                }
            }
            println!("unsafe reader: torn traversals = {torn}");
        });

        let writer_seq = Arc::clone(&seq);
        let writer_stop = Arc::clone(&stop);
        scope.spawn(move || {
            for round in 0..20u8 {
                let ch = (b'a' + (round % 26)) as char;
                let mut w = writer_seq.begin_write();
                for i in 0..writer_seq.size() {
                    if i > 0 {
                        w.advance().unwrap();
                    }
                    *w.deref_write().unwrap() = ch;
                }
                thread::sleep(Duration::from_millis(2));
            }
            writer_stop.store(true, Ordering::Relaxed);
        });
    });
}
