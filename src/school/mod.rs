//! # School Collaborators
//!
//! Interfaces to the school directory, the auditor assignment relation and
//! the academic calendar, with in-memory and calendar-based defaults.

mod calendar;
mod directory;

pub use calendar::{AcademicYearOracle, CalendarWorkingYear, FixedWorkingYear};
pub use directory::{
    AuditorAssignments, MemorySchoolDirectory, School, SchoolAssignmentOracle, SchoolLookup,
};
