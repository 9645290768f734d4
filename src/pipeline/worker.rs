//! Isolated archive extraction
//!
//! Extraction runs on its own named thread and reports back over a one-shot
//! channel. A panic inside the codec drops the sender without a message; the
//! orchestrator turns that into [`WorkerError::Panicked`] instead of
//! unwinding itself. There is no timeout: a hung codec hangs the run.

use std::any::Any;
use std::path::PathBuf;
use std::thread;

use crossbeam_channel::bounded;
use log::debug;
use thiserror::Error;

use crate::codec::{ArchiveCodec, CodecError};

/// Errors reported by the extraction worker
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker thread could not be started
    #[error("failed to spawn extraction thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// A leftover extraction directory could not be removed
    #[error("failed to clear stale extraction directory {}: {source}", path.display())]
    StaleDestination {
        /// Extraction directory
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The codec returned an error
    #[error("{0}")]
    Codec(#[source] CodecError),

    /// The codec panicked
    #[error("extraction worker panicked: {0}")]
    Panicked(String),
}

/// Extract `archive` into `dest` on a dedicated thread and wait for the result
pub fn extract_isolated<C>(codec: C, archive: PathBuf, dest: PathBuf) -> Result<(), WorkerError>
where
    C: ArchiveCodec + Send + 'static,
{
    let (done_tx, done_rx) = bounded::<Result<(), CodecError>>(1);

    let handle = thread::Builder::new()
        .name("asar-extract".to_string())
        .spawn(move || {
            debug!("worker extracting {}", archive.display());
            let result = codec.extract(&archive, &dest);
            // Receiver only disappears if the orchestrator is gone
            let _ = done_tx.send(result);
        })
        .map_err(WorkerError::Spawn)?;

    match done_rx.recv() {
        Ok(result) => {
            let _ = handle.join();
            result.map_err(WorkerError::Codec)
        }
        Err(_) => {
            let reason = match handle.join() {
                Err(payload) => panic_message(payload.as_ref()),
                Ok(()) => "worker exited without reporting".to_string(),
            };
            Err(WorkerError::Panicked(reason))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
