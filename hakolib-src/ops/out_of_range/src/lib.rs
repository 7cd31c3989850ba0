use std::{error::Error, fmt};

/// Checked element access missed: the index or key has no element.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OutOfRange;

impl fmt::Display for OutOfRange {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str("position out of range")
    }
}

impl Error for OutOfRange {}

#[test]
fn display() {
    assert_eq!(OutOfRange.to_string(), "position out of range");
    let boxed: Box<dyn Error> = Box::new(OutOfRange);
    assert_eq!(boxed.to_string(), "position out of range");
}
