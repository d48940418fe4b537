//! Application-level commands.
//!
//! Commands are sent on the app channel by screens, dialogs and modal
//! callbacks. The [`App`](crate::app::App) drains the channel after every
//! event, so nothing that runs inside a modal ever mutates the modal stack
//! while it is being iterated.

use crate::model::Student;

/// Deferred state transition requested by a UI element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // === Lifecycle ===
    /// Quit the application
    Quit,
    /// Suspend the application (Ctrl+Z)
    Suspend,
    /// Open the keybinding reference overlay
    DisplayHelp,

    // === Roster ===
    /// Open the edit form for the student with this email
    EditStudent(String),
    /// Insert a student, or replace the one whose email was `original`
    SaveStudent {
        original: Option<String>,
        student: Student,
    },
    /// Delete the student with this email
    DeleteStudent(String),
    /// Flip the active flag of the student with this email
    ToggleActive(String),
    /// The details modal of the student with this email was closed
    DetailsClosed(String),

    // === Feedback ===
    /// Show a transient message in the footer
    Status(String),
}
