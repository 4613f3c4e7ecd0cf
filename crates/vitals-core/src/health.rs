//! Liveness / readiness state machine.
//!
//! ```text
//! Starting --mark_ready--> Ready --begin_shutdown--> Draining --finalize_shutdown--> Stopped
//!     |                    ^   |                        ^
//!     |      mark_ready    |   | mark_not_ready         |
//!     +--> NotReady -------+<--+                        |
//!              +------------- begin_shutdown -----------+
//! ```
//!
//! The phase lives in a single `AtomicU8` so probe reads never block.
//! Transitions are serialized by a mutex that also guards the not-ready
//! reason, so readers observe transitions in the order they were issued.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use parking_lot::Mutex;

use crate::error::{Result, VitalsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    /// Alive, not yet serving.
    Starting = 0,
    /// Alive and serving.
    Ready = 1,
    /// Alive, a dependency check failed after startup.
    NotReady = 2,
    /// Alive, refusing new traffic while in-flight work completes.
    Draining = 3,
    /// Shut down.
    Stopped = 4,
}

impl Phase {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Phase::Starting,
            1 => Phase::Ready,
            2 => Phase::NotReady,
            3 => Phase::Draining,
            _ => Phase::Stopped,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Starting => "starting",
            Phase::Ready => "ready",
            Phase::NotReady => "not_ready",
            Phase::Draining => "draining",
            Phase::Stopped => "stopped",
        }
    }

    pub fn is_alive(self) -> bool {
        self != Phase::Stopped
    }

    pub fn is_ready(self) -> bool {
        self == Phase::Ready
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase plus the recorded not-ready reason, read together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthSnapshot {
    pub phase: Phase,
    pub reason: Option<String>,
}

pub struct HealthState {
    phase: AtomicU8,
    reason: Mutex<Option<String>>,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthState {
    /// Constructed alive and not ready.
    pub fn new() -> Self {
        Self {
            phase: AtomicU8::new(Phase::Starting as u8),
            reason: Mutex::new(None),
        }
    }

    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::SeqCst))
    }

    pub fn is_alive(&self) -> bool {
        self.phase().is_alive()
    }

    pub fn is_ready(&self) -> bool {
        self.phase().is_ready()
    }

    pub fn snapshot(&self) -> HealthSnapshot {
        let reason = self.reason.lock();
        HealthSnapshot {
            phase: self.phase(),
            reason: reason.clone(),
        }
    }

    /// Starting|NotReady -> Ready. No-op when already Ready.
    pub fn mark_ready(&self) -> Result<()> {
        let mut reason = self.reason.lock();
        match self.phase() {
            Phase::Ready => Ok(()),
            Phase::Starting | Phase::NotReady => {
                *reason = None;
                self.store(Phase::Ready);
                Ok(())
            }
            from => Err(VitalsError::InvalidTransition {
                from,
                to: Phase::Ready,
            }),
        }
    }

    /// Starting|Ready|NotReady -> NotReady, recording `why`.
    pub fn mark_not_ready(&self, why: impl Into<String>) -> Result<()> {
        let mut reason = self.reason.lock();
        match self.phase() {
            Phase::Starting | Phase::Ready | Phase::NotReady => {
                *reason = Some(why.into());
                self.store(Phase::NotReady);
                Ok(())
            }
            from => Err(VitalsError::InvalidTransition {
                from,
                to: Phase::NotReady,
            }),
        }
    }

    /// Any alive phase -> Draining. Irreversible; no-op when already Draining.
    pub fn begin_shutdown(&self) -> Result<()> {
        let mut reason = self.reason.lock();
        match self.phase() {
            Phase::Draining => Ok(()),
            Phase::Starting | Phase::Ready | Phase::NotReady => {
                *reason = Some("shutting down".to_string());
                self.store(Phase::Draining);
                Ok(())
            }
            from @ Phase::Stopped => Err(VitalsError::InvalidTransition {
                from,
                to: Phase::Draining,
            }),
        }
    }

    /// Draining -> Stopped. No-op when already Stopped.
    pub fn finalize_shutdown(&self) -> Result<()> {
        let _reason = self.reason.lock();
        match self.phase() {
            Phase::Stopped => Ok(()),
            Phase::Draining => {
                self.store(Phase::Stopped);
                Ok(())
            }
            from => Err(VitalsError::InvalidTransition {
                from,
                to: Phase::Stopped,
            }),
        }
    }

    fn store(&self, phase: Phase) {
        self.phase.store(phase as u8, Ordering::SeqCst);
    }
}
