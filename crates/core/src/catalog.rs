//! Closed catalogs the evaluation and filter UIs select from.
//!
//! The pipeline never validates filters against these — they exist so
//! evaluation submission and filter pickers offer a fixed set of values.

/// Subjects students can evaluate and filter by.
pub const SUBJECTS: &[&str] = &[
    "Software Engineering",
    "Calculus 1",
    "Physics 3",
    "Algorithms",
    "Ethics",
];

/// Instructors students can evaluate and filter by.
pub const INSTRUCTORS: &[&str] = &[
    "Robson Correia",
    "Ana Paula",
    "Carlos Silva",
    "Fernanda Lima",
];

/// Academic terms.
pub const TERMS: &[&str] = &["2024.1", "2024.2", "2025.1"];
