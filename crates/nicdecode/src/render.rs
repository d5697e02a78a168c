//! Terminal rendering for the shell screens and `check` reports.

use std::fmt::Write as _;
use std::io;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::nic::{self, NicError, NicRecord};
use crate::shell::{App, Form, Screen, BACK_COMMAND, QUIT_COMMAND};

/// Output format for one-shot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Labelled blocks, one per NIC
    #[default]
    Plain,
    /// Aligned table, one row per NIC
    Table,
    /// JSON array
    Json,
}

/// One argument to `check` and what it decoded to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// The argument as given.
    pub input: String,
    /// Decoding result.
    pub result: std::result::Result<NicRecord, NicError>,
}

impl CheckOutcome {
    /// Decode `input`.
    #[must_use]
    pub fn decode(input: &str) -> Self {
        Self {
            input: input.to_string(),
            result: nic::parse(input),
        }
    }

    /// Whether the input decoded successfully.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

const LANDING_TITLE: &str = "Check NIC Details";
const LANDING_SUBTITLE: &str = "Verify Sri Lankan National Identity Card Information";
const VERIFICATION_TITLE: &str = "NIC Verification";
const VERIFICATION_SUBTITLE: &str = "Enter your National Identity Card number below";
const FORMAT_HINT: &str = "Format: XXXXXXXXXV (old) or XXXXXXXXXXXX (new)";

/// Prompt written after every screen.
const PROMPT: &str = "> ";

/// Renders screens and reports as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    show_icons: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Renderer {
    /// Create a renderer, with or without emoji icons.
    #[must_use]
    pub fn new(show_icons: bool) -> Self {
        Self { show_icons }
    }

    fn icon(&self, icon: &str) -> String {
        if self.show_icons {
            format!("{icon} ")
        } else {
            String::new()
        }
    }

    /// The landing screen.
    #[must_use]
    pub fn landing(&self) -> String {
        format!(
            "{LANDING_TITLE}\n{LANDING_SUBTITLE}\n\n{}Click to Start (press Enter, or {QUIT_COMMAND} to exit)\n",
            self.icon("👆"),
        )
    }

    /// The verification screen for the given form state.
    #[must_use]
    pub fn verification(&self, form: &Form) -> String {
        let mut out = format!(
            "{VERIFICATION_TITLE}\n{VERIFICATION_SUBTITLE}\n\n{}{FORMAT_HINT}\n",
            self.icon("💡"),
        );

        if let Some(err) = form.error() {
            let _ = writeln!(out, "\n{}{err}", self.icon("⚠️"));
        }

        if form.is_loading() {
            out.push_str("\nVerifying...\n");
        } else if form.shows_results() {
            out.push('\n');
            for card in form.result_cards() {
                let _ = writeln!(
                    out,
                    "{}{:<14} {}",
                    self.icon(card.icon),
                    format!("{}:", card.label),
                    card.value
                );
            }
        }

        let _ = writeln!(
            out,
            "\nEnter a NIC number ({BACK_COMMAND} to close, {QUIT_COMMAND} to exit)"
        );
        out
    }

    /// Whichever screen `app` is showing.
    #[must_use]
    pub fn screen(&self, app: &App) -> String {
        match app.screen() {
            Screen::Landing => self.landing(),
            Screen::Verification => self.verification(app.form()),
        }
    }

    /// Write a rendered screen followed by the input prompt, and flush.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if writing to `out` fails.
    pub fn present<W: io::Write>(&self, out: &mut W, screen: &str) -> Result<()> {
        writeln!(out, "{screen}")?;
        write!(out, "{PROMPT}")?;
        out.flush()?;
        Ok(())
    }

    /// A report of `check` outcomes in the requested format.
    ///
    /// `explain` adds the encoded format, year and day-of-year to plain and
    /// table output; JSON always carries them.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn report(
        &self,
        outcomes: &[CheckOutcome],
        format: OutputFormat,
        explain: bool,
    ) -> Result<String> {
        match format {
            OutputFormat::Plain => Ok(Self::plain(outcomes, explain)),
            OutputFormat::Table => Ok(Self::table(outcomes, explain)),
            OutputFormat::Json => Self::json(outcomes),
        }
    }

    fn plain(outcomes: &[CheckOutcome], explain: bool) -> String {
        let blocks: Vec<String> = outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(record) => {
                    let mut block = format!(
                        "NIC Number:    {}\nDate of Birth: {}\nGender:        {}",
                        outcome.input,
                        record.date_of_birth_display(),
                        record.gender
                    );
                    if explain {
                        let _ = write!(
                            block,
                            "\nFormat:        {}\nEncoded year:  {}\nDay of year:   {}",
                            record.format, record.year, record.day_of_year
                        );
                    }
                    block
                }
                Err(err) => format!("NIC Number:    {}\nError:         {err}", outcome.input),
            })
            .collect();
        blocks.join("\n\n")
    }

    fn table(outcomes: &[CheckOutcome], explain: bool) -> String {
        let mut header = vec!["NIC", "DATE OF BIRTH", "GENDER"];
        if explain {
            header.extend(["FORMAT", "YEAR", "DAY"]);
        }

        let rows: Vec<Vec<String>> = outcomes
            .iter()
            .map(|outcome| {
                let mut row = vec![outcome.input.clone()];
                match &outcome.result {
                    Ok(record) => {
                        row.push(record.date_of_birth_display());
                        row.push(record.gender.to_string());
                        if explain {
                            row.push(record.format.to_string());
                            row.push(record.year.to_string());
                            row.push(record.day_of_year.to_string());
                        }
                    }
                    Err(err) => row.push(err.to_string()),
                }
                row
            })
            .collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for row in &rows {
            // Error rows have a single message cell after the NIC; let it overflow.
            if row.len() == header.len() {
                for (width, cell) in widths.iter_mut().zip(row) {
                    *width = (*width).max(cell.chars().count());
                }
            } else if let Some(nic) = row.first() {
                widths[0] = widths[0].max(nic.chars().count());
            }
        }

        let format_row = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let header: Vec<String> = header.into_iter().map(str::to_string).collect();
        let mut lines = vec![format_row(header.as_slice())];
        lines.extend(rows.iter().map(|row| format_row(row.as_slice())));
        lines.join("\n")
    }

    fn json(outcomes: &[CheckOutcome]) -> Result<String> {
        let entries: Vec<serde_json::Value> = outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(record) => serde_json::json!({
                    "input": outcome.input,
                    "record": record,
                }),
                Err(err) => serde_json::json!({
                    "input": outcome.input,
                    "error": err.to_string(),
                }),
            })
            .collect();
        Ok(serde_json::to_string_pretty(&entries)?)
    }
}
