use std::fmt;
use std::fs;
use std::path::Path;

use color_eyre::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A student enrolled at the academy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub name: String,
    /// Unique per roster, used as the student's identity
    pub email: String,
    pub instrument: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub roll_number: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
}

const fn default_active() -> bool {
    true
}

impl Student {
    pub const fn status_label(&self) -> &'static str {
        if self.active { "Active" } else { "Inactive" }
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    students: Vec<Student>,
}

/// Read a roster from a TOML file made of `[[students]]` tables.
pub fn load_roster(path: &Path) -> Result<Vec<Student>> {
    let content = fs::read_to_string(path)?;
    let roster: RosterFile = toml::from_str(&content)?;
    debug!(?path, count = roster.students.len(), "Loaded roster");
    Ok(roster.students)
}

/// Roster shown when no roster file is given.
pub fn sample_roster() -> Vec<Student> {
    let student = |name: &str, email: &str, instrument: &str, active: bool, classes: &[&str]| Student {
        name: name.to_string(),
        email: email.to_string(),
        instrument: instrument.to_string(),
        active,
        roll_number: None,
        classes: classes.iter().map(ToString::to_string).collect(),
    };

    vec![
        student("Ada Okafor", "ada.okafor@academy.test", "Piano", true, &["Piano Foundations", "Theory I"]),
        student("Bruno Lindqvist", "bruno.l@academy.test", "Guitar", true, &["Rock Guitar"]),
        student("Chen Wei", "chen.wei@academy.test", "Violin", false, &["Strings Ensemble"]),
        student("Dara Murphy", "dara.murphy@academy.test", "Drums", true, &["Rhythm Lab"]),
        student("Elif Yildiz", "elif.y@academy.test", "Vocals", true, &["Choir", "Theory I"]),
        student("Farah Haddad", "farah.h@academy.test", "Cello", true, &["Strings Ensemble"]),
        student("Gabriel Costa", "gabriel.costa@academy.test", "Saxophone", false, &[]),
        student("Hana Sato", "hana.sato@academy.test", "Piano", true, &["Piano Repertoire"]),
        student("Ivan Petrov", "ivan.p@academy.test", "Bass", true, &["Rhythm Lab"]),
        student("Julia Novak", "julia.novak@academy.test", "Flute", true, &["Wind Ensemble", "Theory II"]),
        student("Kwame Mensah", "kwame.m@academy.test", "Trumpet", true, &["Wind Ensemble"]),
        student("Lucia Romero", "lucia.romero@academy.test", "Guitar", false, &["Classical Guitar"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_file_defaults() {
        let path = std::env::temp_dir().join(format!("academy-roster-{}.toml", std::process::id()));
        fs::write(
            &path,
            r#"
[[students]]
name = "Mira"
email = "mira@academy.test"
instrument = "Harp"

[[students]]
name = "Otto"
email = "otto@academy.test"
instrument = "Tuba"
active = false
roll_number = "A-17"
classes = ["Brass"]
"#,
        )
        .unwrap();

        let students = load_roster(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(students.len(), 2);
        assert!(students[0].active);
        assert!(students[0].classes.is_empty());
        assert!(!students[1].active);
        assert_eq!(students[1].roll_number.as_deref(), Some("A-17"));
    }

    #[test]
    fn test_missing_roster_is_an_error() {
        assert!(load_roster(Path::new("/nonexistent/roster.toml")).is_err());
    }

    #[test]
    fn test_sample_roster_emails_are_unique() {
        let roster = sample_roster();
        let mut emails: Vec<_> = roster.iter().map(|s| s.email.as_str()).collect();
        emails.sort_unstable();
        emails.dedup();
        assert_eq!(emails.len(), roster.len());
    }
}
