//! Remote save endpoint.
//!
//! Remote saves are snapshots: every explicit save posts the whole
//! [`ExportRecord`]. They run on a background thread so editing never waits
//! for the network, and overlapping saves are not ordered (last write wins on
//! the server). Local storage stays the source of truth; a failed remote save
//! is only logged and shown on the save indicator.

use crate::error::{MindMapError, Result};
use crate::persist::ExportRecord;
use log::{debug, error};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Destination for explicit saves.
pub trait RemoteSink: Send + Sync {
    fn save(&self, record: &ExportRecord) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct SaveResponse {
    #[serde(default)]
    success: bool,
}

/// Posts the export record as JSON and expects `{"success": true}` back.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: Client,
    endpoint: String,
}

impl HttpRemote {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RemoteSink for HttpRemote {
    fn save(&self, record: &ExportRecord) -> Result<()> {
        let response = self.client.post(&self.endpoint).json(record).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(MindMapError::RemoteRejected {
                status: status.as_u16(),
            });
        }
        let body: SaveResponse = response.json()?;
        if !body.success {
            return Err(MindMapError::RemoteRejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

/// Runs remote saves off the editing thread and collects their results.
pub struct RemoteSaver {
    sink: Arc<dyn RemoteSink>,
    tx: Sender<Result<()>>,
    rx: Receiver<Result<()>>,
    in_flight: usize,
}

impl RemoteSaver {
    pub fn new(sink: Arc<dyn RemoteSink>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            sink,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Start a save of `record` in the background.
    pub fn submit(&mut self, record: ExportRecord) -> Result<()> {
        let sink = Arc::clone(&self.sink);
        let tx = self.tx.clone();
        thread::Builder::new()
            .name("mindmap-remote-save".into())
            .spawn(move || {
                let result = sink.save(&record);
                // receiver gone means the canvas was dropped; nothing left to report to
                let _ = tx.send(result);
            })
            .map_err(|e| {
                error!("could not start remote save: {}", e);
                MindMapError::Io(e)
            })?;
        self.in_flight += 1;
        debug!("remote save submitted ({} in flight)", self.in_flight);
        Ok(())
    }

    /// Collect results of finished saves without blocking.
    pub fn poll(&mut self) -> Vec<Result<()>> {
        let results: Vec<Result<()>> = self.rx.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(results.len());
        results
    }

    /// Block until every submitted save finished or `timeout` elapsed.
    pub fn wait(&mut self, timeout: Duration) -> Vec<Result<()>> {
        let deadline = Instant::now() + timeout;
        let mut results = Vec::new();
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(result) => {
                    self.in_flight -= 1;
                    results.push(result);
                }
                Err(_) => break,
            }
        }
        results
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        saved: Mutex<Vec<ExportRecord>>,
        fail: bool,
    }

    impl RemoteSink for Recording {
        fn save(&self, record: &ExportRecord) -> Result<()> {
            self.saved.lock().unwrap().push(record.clone());
            if self.fail {
                Err(MindMapError::RemoteRejected { status: 500 })
            } else {
                Ok(())
            }
        }
    }

    fn empty_record() -> ExportRecord {
        ExportRecord {
            nodes: vec![],
            connections: vec![],
        }
    }

    #[test]
    fn test_submit_and_wait() {
        let sink = Arc::new(Recording::default());
        let mut saver = RemoteSaver::new(sink.clone());

        saver.submit(empty_record()).unwrap();
        saver.submit(empty_record()).unwrap();
        let results = saver.wait(Duration::from_secs(5));

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(saver.in_flight(), 0);
        assert_eq!(sink.saved.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_failure_is_reported() {
        let sink = Arc::new(Recording {
            fail: true,
            ..Default::default()
        });
        let mut saver = RemoteSaver::new(sink);
        saver.submit(empty_record()).unwrap();

        let results = saver.wait(Duration::from_secs(5));
        assert!(matches!(
            results.as_slice(),
            [Err(MindMapError::RemoteRejected { status: 500 })]
        ));
    }

    #[test]
    fn test_poll_without_submissions() {
        let mut saver = RemoteSaver::new(Arc::new(Recording::default()));
        assert!(saver.poll().is_empty());
        assert!(saver.wait(Duration::from_millis(10)).is_empty());
    }

    #[test]
    fn test_http_remote_unreachable_endpoint_errors() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let remote = HttpRemote::new(format!("http://{}/save", addr)).unwrap();
        let result = remote.save(&empty_record());
        assert!(matches!(result, Err(MindMapError::Http(_))));
    }
}
