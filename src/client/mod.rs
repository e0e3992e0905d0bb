//! Backend client module.
//!
//! Talks to the question service over two JSON endpoints.

mod backend;

pub use backend::{HttpBackend, QuizBackend};
