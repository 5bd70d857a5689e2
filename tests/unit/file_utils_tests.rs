/*!
 * Tests for file utility functions
 */

use brailleflow::file_utils::FileManager;

use crate::common;

/// Test reading a file that starts with a byte order mark
#[test]
fn test_readToString_withBom_shouldStripIt() {
    let dir = common::create_temp_dir().expect("temp dir");
    let path = common::create_test_file(dir.path(), "input.txt", "\u{FEFF}Hello").expect("file");

    assert_eq!(FileManager::read_to_string(&path).expect("readable"), "Hello");
}

/// Test reading a missing file
#[test]
fn test_readToString_withMissingFile_shouldFail() {
    let dir = common::create_temp_dir().expect("temp dir");
    assert!(FileManager::read_to_string(dir.path().join("nope.txt")).is_err());
}

/// Test writing bytes into a directory that does not exist yet
#[test]
fn test_writeBytes_withMissingParent_shouldCreateIt() {
    let dir = common::create_temp_dir().expect("temp dir");
    let path = dir.path().join("out").join("doc.brf");

    FileManager::write_bytes(&path, b"AB\r\n\x0CCD\r\n").expect("writable");

    assert!(FileManager::file_exists(&path));
    assert!(FileManager::dir_exists(dir.path().join("out")));
    assert_eq!(std::fs::read(&path).expect("readable"), b"AB\r\n\x0CCD\r\n");
}
