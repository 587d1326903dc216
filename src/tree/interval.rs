use super::*;

/// An immutable half-open index range `[from, to)` with precomputed length.
///
/// Intervals address contiguous slices of an ordered-index array during split
/// search without copying. Construction fails when `from >= to`, so every
/// interval covers at least one element.
///
/// # Fields
///
/// - `from` - Inclusive start index
/// - `to` - Exclusive end index
/// - `length` - Precomputed `to - from`
///
/// # Example
/// ```rust
/// use grove::tree::Interval;
///
/// let interval = Interval::new(2, 7).unwrap();
/// assert_eq!(interval.get_length(), 5);
/// assert!(Interval::new(3, 3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    from: usize,
    to: usize,
    length: usize,
}

impl Interval {
    /// Creates an interval covering `[from, to)`.
    ///
    /// # Parameters
    ///
    /// - `from` - Inclusive start index
    /// - `to` - Exclusive end index
    ///
    /// # Returns
    ///
    /// * `Result<Interval, ModelError>` - The interval, or an `InputValidationError` when `from >= to`
    pub fn new(from: usize, to: usize) -> Result<Self, ModelError> {
        if from >= to {
            return Err(ModelError::InputValidationError(format!(
                "Interval start must be smaller than end, got [{}, {})",
                from, to
            )));
        }

        Ok(Self {
            from,
            to,
            length: to - from,
        })
    }

    // Getters
    get_field!(get_from, from, usize);
    get_field!(get_to, to, usize);
    get_field!(get_length, length, usize);

    /// Checks whether the given index lies within `[from, to)`.
    ///
    /// # Parameters
    ///
    /// * `index` - The index to test
    ///
    /// # Returns
    ///
    /// * `bool` - `true` if the index is inside the interval
    pub fn contains(&self, index: usize) -> bool {
        index >= self.from && index < self.to
    }
}
