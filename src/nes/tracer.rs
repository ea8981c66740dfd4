use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::sync::Mutex;

pub mod macros;
pub mod traceable;
pub use traceable::Traceable;

const DEFAULT_CAPACITY: usize = 5_000_000;

/// Global tracer; the macros only feed it with the `tracing` feature on
pub static TRACER: Lazy<Mutex<Tracer>> = Lazy::new(|| Mutex::new(Tracer::new(DEFAULT_CAPACITY)));

/// Bounded history of emulator events, oldest dropped first
pub struct Tracer {
    history: VecDeque<String>,
    capacity: usize,
}

impl Tracer {
    pub fn new(capacity: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
        }
    }

    pub fn write(&mut self, msg: String) {
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(msg);
    }

    pub fn print(&self) {
        for (i, line) in self.history.iter().enumerate() {
            println!("{:06}: {}", i, line);
        }
    }

    pub fn log<T: Traceable + ?Sized>(&mut self, thing: &T) {
        if let Some(trace) = thing.trace() {
            self.write(trace);
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}
