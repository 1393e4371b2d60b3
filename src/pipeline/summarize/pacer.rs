//! Request pacing between completion calls.
//!
//! Waits go through a trait so tests can observe delays without
//! sleeping.

use std::sync::Mutex;
use std::time::Duration;

pub trait Pacer {
    fn pause(&self, duration: Duration);
}

/// Production pacer: blocks the current thread.
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Records requested pauses instead of sleeping. For tests.
#[derive(Default)]
pub struct RecordingPacer {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingPacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().expect("pauses lock").clone()
    }
}

impl Pacer for RecordingPacer {
    fn pause(&self, duration: Duration) {
        self.pauses.lock().expect("pauses lock").push(duration);
    }
}
