//! `guide` — interactive walk of the three-step wizard.
//!
//! Reads numbered choices from stdin. `b` steps back, `q` quits. Progress
//! is never saved; only the user-type greeting comes from the preference
//! store.

use std::io::{BufRead, Write};

use crate::catalog::Catalog;
use crate::cli::args::GuideArgs;
use crate::config::PrefsSettings;
use crate::error::WaterSafeError;
use crate::prefs::PreferenceStore;
use crate::wizard::{StepView, Wizard};

/// Runs the interactive wizard until the user quits or stdin closes.
///
/// # Errors
///
/// Returns a catalog error if the dataset fails to load, or an I/O error if
/// stdin/stdout fail.
pub fn run(args: &GuideArgs) -> Result<(), WaterSafeError> {
    let catalog = match args.catalog.as_deref() {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::embedded()?,
    };

    let prefs_path = PrefsSettings {
        path: args.prefs.clone(),
    }
    .resolve_path();
    let store = PreferenceStore::at(prefs_path);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    interact(&catalog, store.load(), stdin.lock(), stdout.lock())
}

/// The wizard loop, split from `run` so tests can drive it with in-memory
/// streams.
fn interact<R: BufRead, W: Write>(
    catalog: &Catalog,
    user_type: Option<crate::prefs::UserType>,
    mut input: R,
    mut output: W,
) -> Result<(), WaterSafeError> {
    match user_type {
        Some(user_type) => writeln!(output, "Welcome back ({})!", user_type.label())?,
        None => writeln!(output, "Welcome to the WaterSafe health guide!")?,
    }

    let mut wizard = Wizard::new(catalog);

    loop {
        render(&wizard, &mut output)?;
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(()); // stdin closed
        }
        let choice = line.trim();

        match choice {
            "q" | "quit" => return Ok(()),
            "b" | "back" => wizard.back(),
            "" => {}
            _ => {
                let Ok(number) = choice.parse::<usize>() else {
                    writeln!(output, "enter a number, 'b' for back, or 'q' to quit")?;
                    continue;
                };
                apply_choice(&mut wizard, number, &mut output)?;
            }
        }
    }
}

fn apply_choice<W: Write>(
    wizard: &mut Wizard<'_>,
    number: usize,
    output: &mut W,
) -> Result<(), WaterSafeError> {
    match wizard.view() {
        StepView::Categories { categories } => {
            if let Some(&category) = number.checked_sub(1).and_then(|i| categories.get(i)) {
                wizard.select_category(category);
            } else {
                writeln!(output, "no such category")?;
            }
        }
        StepView::Conditions { conditions, .. } => {
            if let Some(condition) = number.checked_sub(1).and_then(|i| conditions.get(i)) {
                let name = condition.name.clone();
                wizard.select_condition(&name)?;
            } else {
                writeln!(output, "no such condition")?;
            }
        }
        StepView::Details { .. } => {
            writeln!(output, "'b' to pick another condition, 'q' to quit")?;
        }
    }
    Ok(())
}

fn render<W: Write>(wizard: &Wizard<'_>, output: &mut W) -> Result<(), WaterSafeError> {
    match wizard.view() {
        StepView::Categories { categories } => {
            writeln!(output, "\nStep 1/3 — Choose a Health Category")?;
            for (index, category) in categories.iter().enumerate() {
                writeln!(output, "  {}. {}", index + 1, category.label())?;
            }
        }
        StepView::Conditions {
            category,
            conditions,
        } => {
            writeln!(output, "\nStep 2/3 — Select a Condition ({})", category.label())?;
            for (index, condition) in conditions.iter().enumerate() {
                writeln!(
                    output,
                    "  {}. {} {} [{}]",
                    index + 1,
                    condition.icon,
                    condition.name,
                    condition.severity
                )?;
            }
        }
        StepView::Details { condition } => {
            writeln!(
                output,
                "\nStep 3/3 — {} {} [{}]",
                condition.icon, condition.name, condition.severity
            )?;
            writeln!(output, "{}\n", condition.description)?;
            for (title, list) in [
                ("Causes", &condition.causes),
                ("Symptoms", &condition.symptoms),
                ("Treatment & Remedies", &condition.remedies),
                ("Prevention", &condition.prevention),
            ] {
                writeln!(output, "{title}:")?;
                for entry in list {
                    writeln!(output, "  - {entry}")?;
                }
            }
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
