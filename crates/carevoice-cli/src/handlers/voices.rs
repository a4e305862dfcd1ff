//! Voices command handler.

use carevoice_core::VoiceSettings;

use crate::bootstrap::bootstrap;
use crate::error::CliError;
use crate::presentation::print_separator;

/// Execute the voices command.
pub fn execute(settings: VoiceSettings) -> Result<(), CliError> {
    let locale = settings.locale.clone();
    let ctx = bootstrap(settings)?;

    let voices = ctx.session.voices();
    let preferred = ctx.session.preferred_voice();

    println!("{:<2} {:<24} {:<8} Default", "", "Voice", "Locale");
    print_separator(44);
    for voice in &voices {
        let marker = if preferred.as_ref() == Some(voice) { "*" } else { "" };
        let default = if voice.is_default { "yes" } else { "" };
        println!("{marker:<2} {:<24} {:<8} {default}", voice.name, voice.locale);
    }
    println!();
    match preferred {
        Some(voice) => println!("Locale {locale} uses {}.", voice.name),
        None => println!("No voice matches locale {locale}; the engine default is used."),
    }
    Ok(())
}
