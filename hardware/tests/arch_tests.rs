//! Tests for the architectural register file.

use apex_sim::core::arch::RegisterFile;

/// Tests that registers start zero and available.
#[test]
fn test_register_file_initial_state() {
    let regs = RegisterFile::new(16);
    assert_eq!(regs.len(), 16);
    for i in 0..16 {
        assert_eq!(regs.read(i), 0);
        assert!(regs.is_available(i));
    }
}

/// Tests that a pending register keeps its committed value until writeback.
#[test]
fn test_register_pending_then_commit() {
    let mut regs = RegisterFile::new(16);
    regs.commit(3, 11);
    regs.mark_pending(3);
    assert!(!regs.is_available(3));
    assert_eq!(regs.read(3), 11);

    regs.commit(3, 42);
    assert!(regs.is_available(3));
    assert_eq!(regs.read(3), 42);
}

/// Tests that one commit releases a register reserved twice.
#[test]
fn test_register_single_availability_bit() {
    let mut regs = RegisterFile::new(4);
    regs.mark_pending(1);
    regs.mark_pending(1);
    regs.commit(1, 5);
    assert!(regs.is_available(1));
}

/// Tests that register 0 is an ordinary register.
#[test]
fn test_register_zero_is_writable() {
    let mut regs = RegisterFile::new(4);
    regs.commit(0, -9);
    assert_eq!(regs.read(0), -9);
}

/// Tests the bulk accessors.
#[test]
fn test_register_file_views() {
    let mut regs = RegisterFile::new(3);
    regs.commit(2, 7);
    regs.mark_pending(1);
    assert_eq!(regs.values(), &[0, 0, 7]);
    assert_eq!(regs.availability(), &[true, false, true]);
}
