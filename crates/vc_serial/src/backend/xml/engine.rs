use std::sync::{Mutex, PoisonError};
use std::thread::{self, ThreadId};

use thiserror::Error;
use tracing::info;

// -----------------------------------------------------------------------------
// XmlEngineError

/// Misuse of the XML engine lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XmlEngineError {
    /// An XML serializer was created, or the engine shut down, before
    /// [`startup`].
    #[error("the XML engine has not been started")]
    NotStarted,
    /// [`startup`] was called a second time.
    #[error("the XML engine is already started")]
    AlreadyStarted,
    /// The engine was used after [`shutdown`].
    #[error("the XML engine has already been shut down")]
    AlreadyShutDown,
    /// [`shutdown`] was called while serializers were still alive.
    #[error("the XML engine still has {0} live instance(s)")]
    InstancesAlive(usize),
    /// [`shutdown`] was called from a thread other than the one that started
    /// the engine.
    #[error("the XML engine must be shut down by the thread that started it")]
    WrongThread,
}

// -----------------------------------------------------------------------------
// Engine state

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    ShutDown,
}

struct EngineState {
    phase: Phase,
    live: usize,
    owner: Option<ThreadId>,
}

static ENGINE: Mutex<EngineState> = Mutex::new(EngineState {
    phase: Phase::Idle,
    live: 0,
    owner: None,
});

fn with_engine<R>(f: impl FnOnce(&mut EngineState) -> R) -> R {
    f(&mut ENGINE.lock().unwrap_or_else(PoisonError::into_inner))
}

/// Starts the process-wide XML engine.
///
/// Must be called once, before the first
/// [`XmlSerializer::new`](super::XmlSerializer::new). The calling thread
/// becomes the owner that has to call [`shutdown`].
pub fn startup() -> Result<(), XmlEngineError> {
    with_engine(|engine| match engine.phase {
        Phase::Idle => {
            let owner = thread::current().id();
            engine.phase = Phase::Running;
            engine.owner = Some(owner);
            info!(?owner, "xml engine started");
            Ok(())
        }
        Phase::Running => Err(XmlEngineError::AlreadyStarted),
        Phase::ShutDown => Err(XmlEngineError::AlreadyShutDown),
    })
}

/// Stops the XML engine.
///
/// Must be called once, from the thread that called [`startup`], after every
/// XML serializer has been dropped.
pub fn shutdown() -> Result<(), XmlEngineError> {
    with_engine(|engine| match engine.phase {
        Phase::Idle => Err(XmlEngineError::NotStarted),
        Phase::ShutDown => Err(XmlEngineError::AlreadyShutDown),
        Phase::Running if engine.owner != Some(thread::current().id()) => {
            Err(XmlEngineError::WrongThread)
        }
        Phase::Running if engine.live > 0 => Err(XmlEngineError::InstancesAlive(engine.live)),
        Phase::Running => {
            engine.phase = Phase::ShutDown;
            info!("xml engine shut down");
            Ok(())
        }
    })
}

/// Returns `true` between [`startup`] and [`shutdown`].
pub fn is_running() -> bool {
    with_engine(|engine| engine.phase == Phase::Running)
}

/// Number of XML serializers currently alive.
pub fn live_instances() -> usize {
    with_engine(|engine| engine.live)
}

// -----------------------------------------------------------------------------
// EngineLease

/// Held by every XML serializer; releases its count on drop.
#[derive(Debug)]
pub(crate) struct EngineLease(());

impl EngineLease {
    pub(crate) fn acquire() -> Result<Self, XmlEngineError> {
        with_engine(|engine| match engine.phase {
            Phase::Idle => Err(XmlEngineError::NotStarted),
            Phase::ShutDown => Err(XmlEngineError::AlreadyShutDown),
            Phase::Running => {
                engine.live += 1;
                Ok(Self(()))
            }
        })
    }
}

impl Drop for EngineLease {
    fn drop(&mut self) {
        with_engine(|engine| engine.live = engine.live.saturating_sub(1));
    }
}
