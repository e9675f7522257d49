//! Lock-free atomic floating point storage

use std::sync::atomic::{AtomicU64, Ordering};

/// An `f64` which can be shared between threads without a lock.
///
/// The value is stored as its IEEE-754 bit pattern in an `AtomicU64`, so
/// loads and stores can never observe a torn value.
#[derive(Debug, Default)]
pub struct AtomicF64 {
    bits: AtomicU64,
}

impl AtomicF64 {
    pub fn new(value: f64) -> Self {
        Self {
            bits: AtomicU64::new(value.to_bits()),
        }
    }

    pub fn load(&self, order: Ordering) -> f64 {
        f64::from_bits(self.bits.load(order))
    }

    pub fn store(&self, value: f64, order: Ordering) {
        self.bits.store(value.to_bits(), order)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_store_load() {
        let a = AtomicF64::new(1.25);
        assert_eq!(a.load(Ordering::Acquire), 1.25);
        a.store(-3.5, Ordering::Release);
        assert_eq!(a.load(Ordering::Acquire), -3.5);
    }

    #[test]
    fn test_no_torn_reads() {
        let a = Arc::new(AtomicF64::new(0.0));
        let writer = {
            let a = a.clone();
            thread::spawn(move || {
                for i in 0..10_000 {
                    let v = if i % 2 == 0 { 1.0e300 } else { -2.0e-300 };
                    a.store(v, Ordering::Release);
                }
            })
        };

        for _ in 0..10_000 {
            let v = a.load(Ordering::Acquire);
            assert!(v == 0.0 || v == 1.0e300 || v == -2.0e-300);
        }

        writer.join().unwrap();
    }
}
