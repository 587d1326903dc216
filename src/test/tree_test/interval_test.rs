use super::*;

// Test valid construction and getters
#[test]
fn test_new_valid() {
    let interval = Interval::new(2, 7).unwrap();
    assert_eq!(interval.get_from(), 2);
    assert_eq!(interval.get_to(), 7);
    assert_eq!(interval.get_length(), 5);
}

// Test that empty and inverted ranges are rejected
#[test]
fn test_new_rejects_degenerate_ranges() {
    assert!(matches!(
        Interval::new(3, 3),
        Err(ModelError::InputValidationError(_))
    ));
    assert!(matches!(
        Interval::new(5, 2),
        Err(ModelError::InputValidationError(_))
    ));
}

// Test half-open containment semantics
#[test]
fn test_contains() {
    let interval = Interval::new(2, 5).unwrap();
    assert!(!interval.contains(1));
    assert!(interval.contains(2));
    assert!(interval.contains(4));
    assert!(!interval.contains(5));
}

// Test the minimal single-element interval
#[test]
fn test_single_element() {
    let interval = Interval::new(0, 1).unwrap();
    assert_eq!(interval.get_length(), 1);
    assert!(interval.contains(0));
    assert!(!interval.contains(1));
}
