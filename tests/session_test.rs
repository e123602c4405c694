// Session Store Tests
// Tests for the persisted active node and onboarding flag

use portchain::session::SessionStore;
use tempfile::TempDir;

// ============================================================================
// ACTIVE NODE
// ============================================================================

#[test]
fn test_no_active_node_is_a_valid_state() {
    let temp_dir = TempDir::new().unwrap();
    let store = SessionStore::open(temp_dir.path()).unwrap();

    assert_eq!(store.active_node().unwrap(), None);
}

#[test]
fn test_selecting_a_node_overwrites_the_previous_one() {
    let temp_dir = TempDir::new().unwrap();
    let store = SessionStore::open(temp_dir.path()).unwrap();

    store.set_active_node("http://localhost:5001").unwrap();
    store.set_active_node("http://localhost:5002").unwrap();

    assert_eq!(
        store.active_node().unwrap(),
        Some("http://localhost:5002".to_string())
    );
}

#[test]
fn test_active_node_survives_restart() {
    let temp_dir = TempDir::new().unwrap();

    {
        let store = SessionStore::open(temp_dir.path()).unwrap();
        store.set_active_node("http://localhost:5001").unwrap();
    }

    let store = SessionStore::open(temp_dir.path()).unwrap();
    assert_eq!(
        store.active_node().unwrap(),
        Some("http://localhost:5001".to_string())
    );
}

// ============================================================================
// ONBOARDING FLAG
// ============================================================================

#[test]
fn test_help_flag_is_set_once_and_survives_restart() {
    let temp_dir = TempDir::new().unwrap();

    {
        let store = SessionStore::open(temp_dir.path()).unwrap();
        assert!(!store.help_shown().unwrap());
        store.mark_help_shown().unwrap();
        assert!(store.help_shown().unwrap());
    }

    let store = SessionStore::open(temp_dir.path()).unwrap();
    assert!(store.help_shown().unwrap());
}
