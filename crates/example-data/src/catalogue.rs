//! Built-in course catalogue and review phrasing.
//!
//! Entries satisfy the backend's course rules: names of 2 to 100
//! characters, upper-case alphanumeric codes of 2 to 20 characters, and
//! credits between 1 and 10.

/// One catalogue course. Instructors are generated per dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogueEntry {
    /// Unique course name.
    pub name: &'static str,
    /// Unique course code.
    pub code: &'static str,
    /// Short course description.
    pub description: &'static str,
    /// Credit weighting.
    pub credits: u8,
}

/// Courses available to every seed, in a fixed order.
pub const COURSE_CATALOGUE: &[CatalogueEntry] = &[
    CatalogueEntry {
        name: "Computer Science Fundamentals",
        code: "CS101",
        description: "Introduction to programming concepts, algorithms, and data structures.",
        credits: 3,
    },
    CatalogueEntry {
        name: "Data Structures and Algorithms",
        code: "CS201",
        description: "Advanced data structures, algorithm design and analysis.",
        credits: 4,
    },
    CatalogueEntry {
        name: "Web Development",
        code: "CS301",
        description: "Full-stack web development using modern technologies.",
        credits: 3,
    },
    CatalogueEntry {
        name: "Database Management Systems",
        code: "CS401",
        description: "Relational databases, SQL, and database design principles.",
        credits: 3,
    },
    CatalogueEntry {
        name: "Software Engineering",
        code: "CS501",
        description: "Software development lifecycle and team project practice.",
        credits: 4,
    },
    CatalogueEntry {
        name: "Operating Systems",
        code: "CS310",
        description: "Processes, scheduling, memory management and file systems.",
        credits: 4,
    },
    CatalogueEntry {
        name: "Computer Networks",
        code: "CS320",
        description: "Layered protocols, routing, transport and network programming.",
        credits: 3,
    },
    CatalogueEntry {
        name: "Discrete Mathematics",
        code: "MA150",
        description: "Logic, sets, combinatorics and graph theory for computing.",
        credits: 3,
    },
    CatalogueEntry {
        name: "Linear Algebra",
        code: "MA210",
        description: "Vector spaces, matrices, eigenvalues and their applications.",
        credits: 3,
    },
    CatalogueEntry {
        name: "Technical Writing",
        code: "EN205",
        description: "Clear documentation, reports and proposals for engineers.",
        credits: 2,
    },
];

/// Review messages indexed by `rating - 1`; every one is at least ten
/// characters long.
pub(crate) const REVIEW_MESSAGES: [&[&str]; 5] = [
    &[
        "The pacing was hard to follow and feedback on assignments arrived too late.",
        "Lectures rarely matched the assessments, so preparing was frustrating.",
    ],
    &[
        "Some useful material, but the workload felt unbalanced across the term.",
        "Labs were helpful, though the lectures were often disorganised.",
    ],
    &[
        "A solid course overall, but more practical examples would help.",
        "The concepts are important but the sessions were a bit dry.",
    ],
    &[
        "Good introduction to the subject with fair and well structured assignments.",
        "The instructor made complex topics understandable. Great course overall.",
    ],
    &[
        "Excellent course! Concepts were explained clearly and the projects were rewarding.",
        "Amazing course, I learned a lot and the labs were genuinely fun.",
    ],
];
