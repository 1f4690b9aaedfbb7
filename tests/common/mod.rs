//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use slint_mindmap::{ExportRecord, KeyValueStore, MindMapError, RemoteSink, Result};
use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Remote sink that records every posted snapshot.
///
/// Clones share the recorded snapshots.
#[derive(Default, Clone)]
pub struct RecordingRemote {
    pub saved: Arc<Mutex<Vec<ExportRecord>>>,
    pub fail: Arc<AtomicBool>,
}

impl RecordingRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent saves fail with a 500.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.saved.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<ExportRecord> {
        self.saved.lock().unwrap().last().cloned()
    }
}

impl RemoteSink for RecordingRemote {
    fn save(&self, record: &ExportRecord) -> Result<()> {
        self.saved.lock().unwrap().push(record.clone());
        if self.fail.load(Ordering::SeqCst) {
            Err(MindMapError::RemoteRejected { status: 500 })
        } else {
            Ok(())
        }
    }
}

/// Store that holds nothing and refuses every write.
///
/// Clones share the write counter.
#[derive(Default, Clone)]
pub struct FailingStore {
    pub writes: Rc<Cell<usize>>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_attempts(&self) -> usize {
        self.writes.get()
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        self.writes.set(self.writes.get() + 1);
        Err(MindMapError::Io(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "storage is read-only",
        )))
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}
