//! Pacing between directory descents
//!
//! Listing a large tree issues one request per directory. The builder pauses
//! through a `Throttle` before every descent so the remote service is not
//! flooded; tests use `NoDelay`.

use std::fmt::Debug;
use std::thread;
use std::time::Duration;

use log::trace;

/// Default pause between directory descents.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Strategy invoked before each directory descent.
pub trait Throttle: Debug {
    fn pause(&self);
}

/// Sleep for a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay(pub Duration);

impl Default for FixedDelay {
    fn default() -> Self {
        Self(DEFAULT_DELAY)
    }
}

impl Throttle for FixedDelay {
    fn pause(&self) {
        trace!("throttling for {:?}", self.0);
        thread::sleep(self.0);
    }
}

/// Never pause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoDelay;

impl Throttle for NoDelay {
    fn pause(&self) {}
}

/// Pick a throttle for a configured delay; zero disables pausing.
pub fn throttle_for(delay: Duration) -> Box<dyn Throttle> {
    if delay.is_zero() {
        Box::new(NoDelay)
    } else {
        Box::new(FixedDelay(delay))
    }
}
