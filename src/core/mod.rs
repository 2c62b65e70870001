pub mod clock;
pub mod store;
pub mod timer;
pub mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{MemoryStore, SessionStore};
pub use timer::{TimerHandle, TimerKind, TimerSet};
pub use tracker::{TrackerSettings, TrackerView, WorkSessionTracker};
