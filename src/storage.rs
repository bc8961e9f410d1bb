//! Cursor persistence.
//!
//! The cursor is the single piece of durable state: the most recently
//! confirmed data period, stored as a small JSON record. Saves go through
//! a write-new-then-rename so an interrupted run cannot leave a torn file
//! behind. A failed save is fatal for the run — re-alerting on the same
//! period next time beats silently losing it.

use std::path::Path;
use tracing::{debug, info};

use crate::types::{Cursor, MonitorError};

/// Load the cursor, falling back to the default on a missing file.
///
/// A file that exists but cannot be read or parsed is an error, not a
/// silent default: resetting the cursor would re-alert on every known
/// period.
pub fn load_cursor(path: &str) -> Result<Cursor, MonitorError> {
    if !Path::new(path).exists() {
        info!(path, "No cursor file found, starting from default");
        return Ok(Cursor::default());
    }

    let json = std::fs::read_to_string(path)
        .map_err(|e| MonitorError::CursorRead { path: path.to_string(), source: e })?;

    let cursor: Cursor = serde_json::from_str(&json)
        .map_err(|e| MonitorError::CursorCorrupt { path: path.to_string(), source: e })?;

    info!(path, last_known = %cursor.period(), "Cursor loaded");
    Ok(cursor)
}

/// Atomically replace the cursor file with the given value.
pub fn save_cursor(path: &str, cursor: &Cursor) -> Result<(), MonitorError> {
    let json = serde_json::to_string_pretty(cursor).map_err(MonitorError::CursorEncode)?;

    let tmp = format!("{path}.tmp");
    std::fs::write(&tmp, &json)
        .map_err(|e| MonitorError::CursorWrite { path: tmp.clone(), source: e })?;
    std::fs::rename(&tmp, path)
        .map_err(|e| MonitorError::CursorWrite { path: path.to_string(), source: e })?;

    debug!(path, cursor = %cursor.period(), "Cursor saved");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Period;

    fn temp_path() -> String {
        let mut p = std::env::temp_dir();
        p.push(format!("sofipo_watch_cursor_{}.json", uuid::Uuid::new_v4()));
        p.to_string_lossy().to_string()
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path();
        let cursor = Cursor { last_year: 2026, last_month: 2 };

        save_cursor(&path, &cursor).unwrap();
        let loaded = load_cursor(&path).unwrap();
        assert_eq!(loaded, cursor);
        assert_eq!(loaded.period(), Period::new(2026, 2));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_returns_default() {
        let loaded = load_cursor("/tmp/sofipo_watch_no_such_cursor.json").unwrap();
        assert_eq!(loaded, Cursor::default());
    }

    #[test]
    fn test_load_corrupt_is_error() {
        let path = temp_path();
        std::fs::write(&path, "{not json").unwrap();

        let err = load_cursor(&path).unwrap_err();
        assert!(matches!(err, MonitorError::CursorCorrupt { .. }), "got: {err}");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_replaces_prior_value() {
        let path = temp_path();
        save_cursor(&path, &Cursor { last_year: 2026, last_month: 1 }).unwrap();
        save_cursor(&path, &Cursor { last_year: 2026, last_month: 3 }).unwrap();

        let loaded = load_cursor(&path).unwrap();
        assert_eq!(loaded.period(), Period::new(2026, 3));
        // The temp file from the rename dance must not linger.
        assert!(!Path::new(&format!("{path}.tmp")).exists());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_to_unwritable_path_is_error() {
        let err = save_cursor("/nonexistent-dir/cursor.json", &Cursor::default());
        assert!(matches!(err, Err(MonitorError::CursorWrite { .. })));
    }
}
