pub mod analyse;
pub mod doctor;
pub mod export;
pub mod habits;
pub mod menu;

use anyhow::Result;
use habitrack::config::HabitrackConfig;
use habitrack::habit::ValidationError;
use rusqlite::Connection;
use std::io::{BufRead, Write};

/// Open the configured database.
pub fn open(config: &HabitrackConfig) -> Result<Connection> {
    habitrack::db::open_database(config.resolved_db_path())
}

/// Ask for a typed confirmation. Returns `true` only if the user typed `YES`.
pub fn confirm(input: &mut dyn BufRead, out: &mut dyn Write, prompt: &str) -> Result<bool> {
    write!(out, "{prompt} Type YES to confirm: ")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim() == "YES")
}

/// Print a [`ValidationError`] as a user message; pass every other error through.
pub fn report_validation(out: &mut dyn Write, result: Result<()>) -> Result<()> {
    match result {
        Err(err) => match err.downcast_ref::<ValidationError>() {
            Some(validation) => {
                writeln!(out, "{validation}")?;
                Ok(())
            }
            None => Err(err),
        },
        ok => ok,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn confirm_requires_exact_yes() {
        let mut out = Vec::new();
        assert!(confirm(&mut Cursor::new("YES\n"), &mut out, "Delete?").unwrap());
        assert!(!confirm(&mut Cursor::new("yes\n"), &mut out, "Delete?").unwrap());
        assert!(!confirm(&mut Cursor::new(""), &mut out, "Delete?").unwrap());
    }

    #[test]
    fn validation_errors_become_messages() {
        let mut out = Vec::new();
        report_validation(&mut out, Err(ValidationError::EmptyName.into())).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "habit name must not be empty\n");

        let mut out = Vec::new();
        assert!(report_validation(&mut out, Err(anyhow::anyhow!("disk on fire"))).is_err());
    }
}
