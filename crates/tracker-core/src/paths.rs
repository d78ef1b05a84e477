use crate::error::{Result, TrackerError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const TRACKER_DIR: &str = ".tracker";
pub const CONFIG_FILE: &str = ".tracker/config.yaml";
pub const SESSION_FILE: &str = ".tracker/session.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn tracker_dir(root: &Path) -> PathBuf {
    root.join(TRACKER_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn session_path(root: &Path) -> PathBuf {
    root.join(SESSION_FILE)
}

// ---------------------------------------------------------------------------
// Requirement id validation
// ---------------------------------------------------------------------------

static REQ_ID_RE: OnceLock<Regex> = OnceLock::new();

fn req_id_re() -> &'static Regex {
    REQ_ID_RE.get_or_init(|| Regex::new(r"^REQ-[A-Z0-9]{3,12}$").expect("static pattern"))
}

pub fn validate_requirement_id(id: &str) -> Result<()> {
    if !req_id_re().is_match(id) {
        return Err(TrackerError::InvalidRequirementId(id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_requirement_ids() {
        for id in ["REQ-AB12CD", "REQ-123", "REQ-O2C2025"] {
            validate_requirement_id(id).unwrap_or_else(|_| panic!("expected valid: {id}"));
        }
    }

    #[test]
    fn invalid_requirement_ids() {
        for id in ["", "REQ-", "req-abc123", "REQ-ab12", "TASK-123456", "REQ-12 34"] {
            assert!(validate_requirement_id(id).is_err(), "expected invalid: {id}");
        }
    }

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/proj/.tracker/config.yaml")
        );
        assert_eq!(
            session_path(root),
            PathBuf::from("/tmp/proj/.tracker/session.yaml")
        );
    }
}
