//! `prefs` — manage the stored user-type preference.

use crate::cli::args::{PrefsCommand, PrefsSubcommand};
use crate::config::PrefsSettings;
use crate::error::WaterSafeError;
use crate::prefs::PreferenceStore;

/// Shows, sets, or resets the preference file.
///
/// # Errors
///
/// Returns a preference store error if the file cannot be written or
/// removed.
pub fn run(cmd: &PrefsCommand) -> Result<(), WaterSafeError> {
    let path = PrefsSettings {
        path: cmd.path.clone(),
    }
    .resolve_path();
    let mut store = PreferenceStore::at(path);

    match cmd.subcommand {
        PrefsSubcommand::Show => match store.load() {
            Some(user_type) => println!("{user_type} ({})", user_type.label()),
            None => println!("not set"),
        },
        PrefsSubcommand::Set { user_type } => {
            store.save(user_type)?;
            println!("saved: {user_type}");
        }
        PrefsSubcommand::Reset => {
            store.clear()?;
            println!("cleared");
        }
    }
    Ok(())
}
