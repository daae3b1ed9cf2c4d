//! Interactive menu front end.
//!
//! An explicit state machine over [`Screen`]; every handler returns the next
//! screen. End of input on any prompt exits cleanly.

use anyhow::Result;
use rusqlite::Connection;
use std::io::{BufRead, Write};

use super::analyse::{analyse, AnalyseQuery};
use super::{habits, report_validation};
use habitrack::habit::store;
use habitrack::habit::timestamp::{self, parse_timestamp};
use habitrack::habit::Cadence;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Main,
    Analyse,
    Exit,
}

/// Result of asking the user to pick a stored habit.
enum Pick {
    Habit(String),
    NoHabits,
    EndOfInput,
}

impl Pick {
    /// Screen to fall back to when no habit was picked.
    fn fallback(&self) -> Screen {
        match self {
            Pick::NoHabits => Screen::Main,
            _ => Screen::Exit,
        }
    }
}

const MAIN_CHOICES: &[&str] = &[
    "Add habit",
    "Check off habit",
    "Edit habit",
    "Analyse habits",
    "Delete habit",
    "Exit",
];

const ANALYSE_CHOICES: &[&str] = &[
    "Show all habits",
    "Show all at least once checked off habits",
    "Show all habits by periodicity",
    "Show all at least once checked off habits by periodicity",
    "Show longest streak for daily habits",
    "Show longest streak for weekly habits",
    "Show longest streak for a specific habit",
    "Back to main menu",
];

pub struct Menu<'c, R, W> {
    conn: &'c mut Connection,
    input: R,
    out: W,
}

impl<'c, R: BufRead, W: Write> Menu<'c, R, W> {
    pub fn new(conn: &'c mut Connection, input: R, out: W) -> Self {
        Self { conn, input, out }
    }

    pub fn run(mut self) -> Result<()> {
        writeln!(self.out, "Welcome to habitrack!")?;

        let mut screen = Screen::Main;
        while screen != Screen::Exit {
            screen = match screen {
                Screen::Main => self.main_menu()?,
                Screen::Analyse => self.analyse_menu()?,
                Screen::Exit => Screen::Exit,
            };
        }

        writeln!(self.out, "See you next time!")?;
        Ok(())
    }

    fn main_menu(&mut self) -> Result<Screen> {
        let Some(choice) = self.choose("What do you want to do?", MAIN_CHOICES)? else {
            return Ok(Screen::Exit);
        };
        match choice {
            0 => self.add_habit(),
            1 => self.checkoff_habit(),
            2 => self.edit_habit(),
            3 => Ok(Screen::Analyse),
            4 => self.delete_habit(),
            _ => Ok(Screen::Exit),
        }
    }

    fn add_habit(&mut self) -> Result<Screen> {
        let Some(name) = self.ask("Please enter the name of your habit:")? else {
            return Ok(Screen::Exit);
        };
        let Some(description) = self.ask("If you want to, you can add a description:")? else {
            return Ok(Screen::Exit);
        };
        let Some(cadence) = self.choose_cadence("Please choose the frequency of your habit.")? else {
            return Ok(Screen::Exit);
        };

        let result = habits::add(self.conn, &mut self.out, &name, &description, cadence);
        report_validation(&mut self.out, result)?;
        Ok(Screen::Main)
    }

    fn checkoff_habit(&mut self) -> Result<Screen> {
        let name = match self.pick_habit("check off")? {
            Pick::Habit(name) => name,
            other => return Ok(other.fallback()),
        };

        let at = loop {
            let Some(raw) =
                self.ask("Checkoff date (YYYY-MM-DD or YYYY-MM-DD HH:MM:SS), empty for now:")?
            else {
                return Ok(Screen::Exit);
            };
            if raw.is_empty() {
                break timestamp::now();
            }
            match parse_timestamp(&raw) {
                Ok(at) => break at,
                Err(err) => writeln!(self.out, "{err}. Please try again.")?,
            }
        };

        habits::checkoff(self.conn, &mut self.out, &name, at)?;
        Ok(Screen::Main)
    }

    fn edit_habit(&mut self) -> Result<Screen> {
        let name = match self.pick_habit("edit")? {
            Pick::Habit(name) => name,
            other => return Ok(other.fallback()),
        };
        let Some(new_name) = self.ask("New name (empty keeps the current one):")? else {
            return Ok(Screen::Exit);
        };
        let Some(new_description) = self.ask("New description (empty keeps the current one):")?
        else {
            return Ok(Screen::Exit);
        };

        let new_name = Some(new_name.as_str()).filter(|s| !s.is_empty());
        let new_description = Some(new_description.as_str()).filter(|s| !s.is_empty());
        let result = habits::edit(self.conn, &mut self.out, &name, new_name, new_description);
        report_validation(&mut self.out, result)?;
        Ok(Screen::Main)
    }

    fn delete_habit(&mut self) -> Result<Screen> {
        let name = match self.pick_habit("delete")? {
            Pick::Habit(name) => name,
            other => return Ok(other.fallback()),
        };
        let Some(answer) = self.ask(&format!(
            "Delete '{name}' and all of its checkoffs? Type YES to confirm:"
        ))?
        else {
            return Ok(Screen::Exit);
        };

        if answer == "YES" {
            habits::delete(self.conn, &mut self.out, &name)?;
        } else {
            writeln!(self.out, "Nothing was deleted.")?;
        }
        Ok(Screen::Main)
    }

    fn analyse_menu(&mut self) -> Result<Screen> {
        let Some(choice) = self.choose("What do you want to analyse?", ANALYSE_CHOICES)? else {
            return Ok(Screen::Exit);
        };

        let query = match choice {
            0 => AnalyseQuery::All,
            1 => AnalyseQuery::CheckedOff,
            2 | 3 => {
                let Some(cadence) = self.choose_cadence("Please choose a periodicity to filter by.")?
                else {
                    return Ok(Screen::Exit);
                };
                if choice == 2 {
                    AnalyseQuery::Cadence { cadence }
                } else {
                    AnalyseQuery::CheckedOffCadence { cadence }
                }
            }
            4 => AnalyseQuery::Longest { cadence: Cadence::Daily },
            5 => AnalyseQuery::Longest { cadence: Cadence::Weekly },
            6 => match self.pick_habit("analyse")? {
                Pick::Habit(name) => AnalyseQuery::Habit { name },
                other => return Ok(other.fallback()),
            },
            _ => return Ok(Screen::Main),
        };

        analyse(self.conn, &mut self.out, &query, false)?;
        Ok(Screen::Main)
    }

    // ── Prompt helpers ───────────────────────────────────────────────────────

    /// Print `prompt` and read one trimmed line. `None` at end of input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{prompt} ")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Numbered single choice. Re-asks until a valid number is entered.
    fn choose(&mut self, title: &str, choices: &[&str]) -> Result<Option<usize>> {
        loop {
            writeln!(self.out, "{title}")?;
            for (i, choice) in choices.iter().enumerate() {
                writeln!(self.out, "  {}. {choice}", i + 1)?;
            }
            let Some(answer) = self.ask(">")? else {
                return Ok(None);
            };
            match answer.parse::<usize>() {
                Ok(n) if (1..=choices.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => writeln!(self.out, "Please enter a number between 1 and {}.", choices.len())?,
            }
        }
    }

    fn choose_cadence(&mut self, title: &str) -> Result<Option<Cadence>> {
        let labels: Vec<&str> = Cadence::ALL.iter().map(|c| c.as_str()).collect();
        Ok(self.choose(title, &labels)?.map(|i| Cadence::ALL[i]))
    }

    /// Let the user pick one stored habit by number.
    fn pick_habit(&mut self, verb: &str) -> Result<Pick> {
        let names: Vec<String> = store::load_habits(self.conn)?
            .iter()
            .map(|h| h.name().to_string())
            .collect();

        if names.is_empty() {
            writeln!(self.out, "Sorry, there are no habits to {verb}.")?;
            return Ok(Pick::NoHabits);
        }

        let labels: Vec<&str> = names.iter().map(String::as_str).collect();
        let choice = self.choose(&format!("Which habit do you want to {verb}?"), &labels)?;
        Ok(match choice {
            Some(i) => Pick::Habit(names[i].clone()),
            None => Pick::EndOfInput,
        })
    }
}
