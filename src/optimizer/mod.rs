//! Safety copies of the archive before it is rewritten
//!
//! ## Key Types
//!
//! - `BackupManager` - copies `app.asar` to `app.asar.bak`, replacing any older backup
//! - `BackupError` - failures while replacing or writing the backup

pub mod backup;

pub use backup::{BackupError, BackupManager, BACKUP_SUFFIX};
