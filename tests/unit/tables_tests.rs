/*!
 * Tests for the table registry
 */

use brailleflow::tables::{DEFAULT_TABLE, TABLE_GROUPS, all_tables, find_table, resolve_table_key};

/// Test that the default table is registered
#[test]
fn test_defaultTable_shouldBeRegistered() {
    assert!(find_table(DEFAULT_TABLE).is_some());
}

/// Test that every group has at least one table
#[test]
fn test_tableGroups_shouldNotBeEmpty() {
    assert!(!TABLE_GROUPS.is_empty());
    assert!(TABLE_GROUPS.iter().all(|group| !group.tables.is_empty()));
    assert!(all_tables().count() >= TABLE_GROUPS.len());
}

/// Test key resolution with and without extensions
#[test]
fn test_resolveTableKey_shouldCompleteKnownKeys() {
    assert_eq!(resolve_table_key("en-ueb-g2"), "en-ueb-g2.ctb");
    assert_eq!(resolve_table_key("en-ueb-g2.ctb"), "en-ueb-g2.ctb");
    assert_eq!(resolve_table_key("my-table.utb"), "my-table.utb");
}
