//! Process-wide monotonic ULID source.

use std::sync::Mutex;

use ulid::{Generator, Ulid};

static GENERATOR: Mutex<Generator> = Mutex::new(Generator::new());

/// Returns a fresh ULID that sorts after every ULID previously returned by
/// this process.
///
/// Within one millisecond the random tail is incremented. If that tail
/// overflows, a plain time-ordered ULID is returned instead.
pub fn next_ulid() -> Ulid {
    // The generator only holds the previous value, so a poisoned lock still
    // guards valid state.
    let mut generator = match GENERATOR.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    generator.generate().unwrap_or_else(|_| Ulid::new())
}
