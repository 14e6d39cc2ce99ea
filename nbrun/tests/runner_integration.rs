//! End-to-end runner scenarios over real notebook files.

use nbrun::events::CollectingEventSink;
use nbrun::hooks::STOP_TAG;
use nbrun::notebook::{Cell, Notebook};
use nbrun::runner::Runner;
use nbrun::testing::{write_notebook, RecordingEngine, TaggingEngine};
use pretty_assertions::assert_eq;
use std::sync::Arc;

/// One code cell runs, the stop-tagged cell and everything after it never do,
/// and the notebook is saved with only the first cell's output populated.
#[tokio::test]
async fn stop_tag_mid_notebook() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_notebook(
        dir.path(),
        vec![
            Cell::code("print('a')"),
            Cell::code("print('b')").with_tag(STOP_TAG),
            Cell::code("print('c')"),
        ],
    );

    let engine = Arc::new(RecordingEngine::new());
    let runner = Runner::new(engine.clone());
    let report = runner.run(&path).await.unwrap();

    assert!(report.halted());
    assert_eq!(report.executed, 1);
    assert_eq!(engine.executed_indices(), vec![0]);

    let saved = Notebook::read(&path).unwrap();
    assert!(!saved.cells[0].outputs.is_empty());
    assert!(saved.cells[1].outputs.is_empty());
    assert!(saved.cells[2].outputs.is_empty());
    // The tag is still there for the next run.
    assert!(saved.cells[1].has_tag(STOP_TAG));
}

/// With no tags, every cell executes in order and every output slot is
/// populated in the saved notebook.
#[tokio::test]
async fn untagged_notebook_runs_to_completion() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_notebook(
        dir.path(),
        vec![Cell::code("print('a')"), Cell::code("print('b')")],
    );

    let engine = Arc::new(RecordingEngine::new());
    let runner = Runner::new(engine.clone());
    let report = runner.run(&path).await.unwrap();

    assert!(!report.halted());
    assert_eq!(report.executed, 2);
    assert_eq!(engine.executed_indices(), vec![0, 1]);

    let saved = Notebook::read(&path).unwrap();
    assert!(saved.cells.iter().all(|c| !c.outputs.is_empty()));
    assert_eq!(saved.cells[0].execution_count, Some(1));
    assert_eq!(saved.cells[1].execution_count, Some(2));
}

/// A stop tag appearing on a cell only after that cell has been dispatched
/// never halts the run: the tag check happens strictly before dispatch, so
/// an engine that tags every cell it executes still runs the whole notebook.
#[tokio::test]
async fn tag_added_after_dispatch_does_not_halt() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_notebook(
        dir.path(),
        vec![
            Cell::code("print('a')"),
            Cell::code("print('b')"),
            Cell::code("print('c')"),
        ],
    );

    let engine = Arc::new(TaggingEngine::new(STOP_TAG));
    let runner = Runner::new(engine.clone());
    let report = runner.run(&path).await.unwrap();

    assert!(!report.halted());
    assert_eq!(report.executed, 3);
    assert_eq!(engine.executed_indices(), vec![0, 1, 2]);

    // The tags the engine added are persisted with the results.
    let saved = Notebook::read(&path).unwrap();
    assert!(saved.cells.iter().all(|c| c.has_tag(STOP_TAG)));
    assert!(saved.cells.iter().all(|c| !c.outputs.is_empty()));
}

/// An empty notebook completes with zero executions and is still saved.
#[tokio::test]
async fn empty_notebook_completes() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_notebook(dir.path(), vec![]);

    let runner = Runner::new(Arc::new(RecordingEngine::new()));
    let report = runner.run(&path).await.unwrap();

    assert!(!report.halted());
    assert_eq!(report.executed, 0);

    let saved = Notebook::read(&path).unwrap();
    assert!(saved.is_empty());
}

/// A stop tag on the very first cell halts with zero executions; the
/// notebook is still written back and the tagged cell's output slot stays
/// empty.
#[tokio::test]
async fn stop_tag_on_first_cell() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_notebook(
        dir.path(),
        vec![Cell::code("print('never')").with_tag(STOP_TAG)],
    );

    let sink = Arc::new(CollectingEventSink::new());
    let engine = Arc::new(RecordingEngine::new());
    let runner = Runner::new(engine.clone()).with_sink(sink.clone());
    let report = runner.run(&path).await.unwrap();

    assert!(report.halted());
    assert_eq!(report.executed, 0);
    assert_eq!(report.halt.as_ref().unwrap().cell_index, 0);
    assert!(engine.executed_indices().is_empty());
    assert!(sink.started_cells().is_empty());

    let saved = Notebook::read(&path).unwrap();
    assert!(saved.cells[0].outputs.is_empty());
    assert_eq!(saved.cells[0].execution_count, None);
}
