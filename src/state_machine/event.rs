//! Events that drive the request lifecycle

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // Student events
    StudentSubmit { text: String },

    // Backend events
    TutorAnswered { answer: String },
    TutorFailed { message: String },
}
