use super::Classification;

/// Event emitted by the classifier.
#[derive(Debug)]
pub enum Event<'a> {
    /// A test point was classified.
    Classified {
        /// Position of the point in the input.
        index: usize,
        classification: &'a Classification,
    },
}
