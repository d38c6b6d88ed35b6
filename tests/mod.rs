//! Integration tests for jellytv
//!
//! Tests are organized by component:
//! - facade_test: media client against a mocked Jellyfin server
//! - layout_test: responsive tile grid geometry
//! - app_test: navigation, sign-in and focus flows
//! - ui_test: rendering through the ratatui TestBackend
//! - cli_test: argument parsing and command handlers

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
