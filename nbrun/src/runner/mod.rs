//! The notebook execution controller.
//!
//! [`Runner::run`] drives one sequential pass over a notebook: load, walk
//! cells in order, delegate code cells to the engine, and write the notebook
//! back to the same path. A stop tag halts the walk before the tagged cell
//! executes and is absorbed as a normal outcome. Persistence is
//! unconditional: the halt path, the completion path, and the engine-failure
//! path all write the notebook back before `run` returns.

use crate::engine::{CellEngine, CellExecutionError, RunContext};
use crate::errors::NbrunError;
use crate::events::{EventSink, NoOpEventSink, RunEvent};
use crate::hooks::{CellHook, Halt, HookChain, StopTagHook};
use crate::notebook::Notebook;
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

/// Lifecycle states of a run.
///
/// `Loaded → Running → {Halted | Completed} → Persisted`. Both execution
/// outcomes converge on `Persisted`, which is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// The notebook has been read; execution has not started.
    Loaded,
    /// Cells are being offered to the engine.
    Running,
    /// A stop tag ended the walk early.
    Halted,
    /// Every cell was offered to the engine.
    Completed,
    /// The notebook has been written back.
    Persisted,
}

impl RunState {
    /// Returns true if the state ends the run.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Persisted)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded => write!(f, "loaded"),
            Self::Running => write!(f, "running"),
            Self::Halted => write!(f, "halted"),
            Self::Completed => write!(f, "completed"),
            Self::Persisted => write!(f, "persisted"),
        }
    }
}

/// Summary of one finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Unique id of this run.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Number of code cells the engine executed.
    pub executed: usize,
    /// The halt signal, if a stop tag ended the walk early.
    pub halt: Option<Halt>,
    /// Final lifecycle state. Always [`RunState::Persisted`] for a report
    /// returned from [`Runner::run`].
    pub state: RunState,
    /// Wall-clock duration of the whole run in milliseconds.
    pub duration_ms: f64,
}

impl RunReport {
    /// Returns true if the run ended at a stop tag.
    #[must_use]
    pub fn halted(&self) -> bool {
        self.halt.is_some()
    }
}

/// Outcome of the execution phase, before persistence.
enum WalkOutcome {
    Completed { executed: usize },
    Halted { executed: usize, halt: Halt },
    Failed { error: CellExecutionError },
}

/// Sequential notebook execution controller.
pub struct Runner {
    engine: Arc<dyn CellEngine>,
    hooks: HookChain,
    sink: Arc<dyn EventSink>,
    ctx: RunContext,
}

impl Runner {
    /// Creates a runner around an engine.
    ///
    /// The stop-tag hook is installed by default; additional hooks can be
    /// layered with [`with_hook`](Self::with_hook).
    #[must_use]
    pub fn new(engine: Arc<dyn CellEngine>) -> Self {
        let mut hooks = HookChain::new();
        hooks.add(Arc::new(StopTagHook::default()));
        Self {
            engine,
            hooks,
            sink: Arc::new(NoOpEventSink),
            ctx: RunContext::default(),
        }
    }

    /// Sets the run context handed to the engine.
    #[must_use]
    pub fn with_context(mut self, ctx: RunContext) -> Self {
        self.ctx = ctx;
        self
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Adds a pre-dispatch hook.
    #[must_use]
    pub fn with_hook(mut self, hook: Arc<dyn CellHook>) -> Self {
        self.hooks.add(hook);
        self
    }

    /// Runs the notebook at `path` and writes it back to the same path.
    ///
    /// A stop tag is absorbed here: the run reports a halt through the
    /// event sink and the returned [`RunReport`], never an error. An
    /// engine-intrinsic cell failure propagates, but only after the
    /// notebook (with results accumulated so far) has been written back.
    /// Read failures propagate immediately; there is nothing to persist yet.
    pub async fn run(&self, path: impl AsRef<Path>) -> Result<RunReport, NbrunError> {
        let path = path.as_ref();
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let start = Instant::now();

        let mut notebook = Notebook::read(path)?;
        let mut state = RunState::Loaded;
        debug!(%run_id, %state, cells = notebook.len(), "notebook loaded");

        self.sink.emit(&RunEvent::RunStarted {
            path: path.to_path_buf(),
            cell_count: notebook.len(),
        });

        state = RunState::Running;
        debug!(%run_id, %state, "executing cells");
        let outcome = self.walk(&mut notebook).await;
        match &outcome {
            WalkOutcome::Halted { halt, .. } => {
                state = RunState::Halted;
                warn!(
                    %run_id, %state,
                    index = halt.cell_index,
                    reason = %halt.reason,
                    "run halted"
                );
            }
            WalkOutcome::Completed { .. } => {
                state = RunState::Completed;
                debug!(%run_id, %state, "execution phase ended");
            }
            WalkOutcome::Failed { error } => {
                debug!(%run_id, index = error.cell_index, "execution phase ended by cell failure");
            }
        }

        // Persistence is unconditional from here on.
        let saved = notebook.write(path);
        if saved.is_ok() {
            self.sink.emit(&RunEvent::NotebookSaved {
                path: path.to_path_buf(),
            });
        }

        match outcome {
            WalkOutcome::Failed { error } => {
                if let Err(save_error) = saved {
                    warn!(%run_id, error = %save_error, "notebook save failed after cell failure");
                }
                Err(error.into())
            }
            WalkOutcome::Halted { executed, halt } => {
                saved?;
                state = RunState::Persisted;
                debug!(%run_id, %state, "run finished");
                Ok(RunReport {
                    run_id,
                    started_at,
                    executed,
                    halt: Some(halt),
                    state,
                    duration_ms: start.elapsed().as_secs_f64() * 1000.0,
                })
            }
            WalkOutcome::Completed { executed } => {
                saved?;
                state = RunState::Persisted;
                debug!(%run_id, %state, "run finished");
                Ok(RunReport {
                    run_id,
                    started_at,
                    executed,
                    halt: None,
                    state,
                    duration_ms: start.elapsed().as_secs_f64() * 1000.0,
                })
            }
        }
    }

    /// Offers cells to the engine one at a time, in document order.
    ///
    /// Hooks are consulted before every cell, code or not; a halt means the
    /// current cell and everything after it never execute.
    async fn walk(&self, notebook: &mut Notebook) -> WalkOutcome {
        let mut executed = 0;

        for (index, cell) in notebook.cells.iter_mut().enumerate() {
            if let Some(halt) = self.hooks.before_dispatch(cell, index).await {
                self.sink.emit(&RunEvent::RunHalted {
                    index: halt.cell_index,
                    reason: halt.reason.clone(),
                });
                return WalkOutcome::Halted { executed, halt };
            }

            if !cell.is_code() {
                continue;
            }

            self.sink.emit(&RunEvent::CellStarted { index });
            let cell_start = Instant::now();

            match self.engine.execute_cell(cell, index, &self.ctx).await {
                Ok(()) => {
                    executed += 1;
                    self.sink.emit(&RunEvent::CellCompleted {
                        index,
                        duration_ms: cell_start.elapsed().as_secs_f64() * 1000.0,
                    });
                }
                Err(error) => {
                    self.sink.emit(&RunEvent::CellFailed {
                        index,
                        message: error.message.clone(),
                    });
                    return WalkOutcome::Failed { error };
                }
            }
        }

        self.sink.emit(&RunEvent::RunCompleted { executed });
        WalkOutcome::Completed { executed }
    }
}
