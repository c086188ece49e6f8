mod engine;

pub use engine::{ActiveSession, FinishedSession, SessionEnd, SessionTimer, TimerState};
