//! Menu-driven prompt
//!
//! Asks for one command, collects its arguments and prints the result.
//! Blank dates fall back to the end of 2021, the period the sample ledger covers.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Result;
use tally_core::{Greeting, MarketData, ReportSink};

use super::{cmd_category_report, cmd_main_page, cmd_phones, open_ledger};

/// Reference timestamp used when the main page date is left blank
pub const DEFAULT_REPORT_DATE: &str = "2021-12-31 00:00:00";
/// Reference day used when the category report date is left blank
pub const DEFAULT_CATEGORY_DATE: &str = "31.12.2021";

/// Everything the prompt needs to run a command
pub struct Session<'a> {
    pub ledger_path: &'a Path,
    pub settings_path: &'a Path,
    pub market: &'a dyn MarketData,
    pub sink: Option<&'a dyn ReportSink>,
}

enum MenuChoice {
    MainPage,
    Phones,
    Report,
}

impl MenuChoice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "1" | "main_page" => Some(Self::MainPage),
            "2" | "filtered_by_phone" => Some(Self::Phones),
            "3" | "report" => Some(Self::Report),
            _ => None,
        }
    }
}

/// Print `prompt` and read one trimmed line; EOF reads as blank
fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> Result<String> {
    write!(out, "{}", prompt)?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

/// Print a failed command the way the prompt reports it
fn report_failure<W: Write>(out: &mut W, err: &anyhow::Error, expected: &str) -> Result<()> {
    match err.downcast_ref::<tally_core::Error>() {
        Some(tally_core::Error::InvalidDateFormat { .. }) => {
            writeln!(out, "Error: invalid date format. Use {}.", expected)?
        }
        _ => writeln!(out, "Error: {:#}", err)?,
    }
    Ok(())
}

/// Run one round of the prompt
pub async fn cmd_interactive<R: BufRead, W: Write>(
    session: &Session<'_>,
    mut input: R,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "{}!", Greeting::now())?;
    writeln!(out, "Available commands:")?;
    writeln!(out, "  1 - main_page")?;
    writeln!(out, "  2 - filtered_by_phone")?;
    writeln!(out, "  3 - report")?;

    let choice = ask(&mut input, out, "Enter a number or command name: ")?;
    let Some(choice) = MenuChoice::parse(&choice) else {
        writeln!(out, "Error: unknown command. Enter 1, 2 or 3.")?;
        return Ok(());
    };

    match choice {
        MenuChoice::MainPage => {
            let date = ask(
                &mut input,
                out,
                &format!("Date (YYYY-MM-DD HH:MM:SS) [{}]: ", DEFAULT_REPORT_DATE),
            )?;
            let date = or_default(date, DEFAULT_REPORT_DATE);

            let result = match open_ledger(session.ledger_path) {
                Ok(ledger) => {
                    cmd_main_page(
                        &ledger,
                        Some(&date),
                        session.settings_path,
                        session.market,
                        session.sink,
                        out,
                    )
                    .await
                }
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                report_failure(out, &e, "YYYY-MM-DD HH:MM:SS")?;
            }
        }
        MenuChoice::Phones => {
            let result = open_ledger(session.ledger_path)
                .and_then(|ledger| cmd_phones(&ledger, session.sink, out));
            if let Err(e) = result {
                report_failure(out, &e, "")?;
            }
        }
        MenuChoice::Report => {
            let category = ask(&mut input, out, "Category: ")?;
            let date = ask(
                &mut input,
                out,
                &format!("Date (DD.MM.YYYY) [{}]: ", DEFAULT_CATEGORY_DATE),
            )?;
            let date = or_default(date, DEFAULT_CATEGORY_DATE);

            let result = open_ledger(session.ledger_path).and_then(|ledger| {
                cmd_category_report(&ledger, &category, Some(&date), session.sink, out)
            });
            if let Err(e) = result {
                report_failure(out, &e, "DD.MM.YYYY")?;
            }
        }
    }

    Ok(())
}
