//! Illustrative external client, not part of the crate's public API or test
//! suite. Mirrors the original `producer_consumer.cpp` demo: one producer
//! writer thread fills the sequence, a consumer reader thread prints it
//! back out once the writer is done.

use std::thread;

use safe_sequence::SafeSequence;

fn main() {
    let seq = SafeSequence::<i32>::new(8).unwrap();

    thread::scope(|scope| {
        scope.spawn(|| {
            let mut w = seq.begin_write();
            for i in 0..8 {
                if i > 0 {
                    w.advance().unwrap();
                }
                *w.deref_write().unwrap() = i as i32;
            }
            println!("producer: filled {} elements", seq.size());
        });
    });

    let mut r = seq.begin_read();
    print!("consumer:");
    for i in 0..8 {
        if i > 0 {
            r.advance().unwrap();
        }
        print!(" {}", r.deref_read().unwrap());
    }
    println!();
}
