use dialoguer::{
    MultiSelect,
    console::{Style, style},
    theme::ColorfulTheme,
};
use multimod_core::errors::{MultimodError, Result};
use std::io;

pub const SUCCESS_PREFIX: &str = "✔";
pub const WARNING_PREFIX: &str = "⚠";
pub const HINT_PREFIX: &str = "💡";
const EMPTY_SELECTION_PLACEHOLDER: &str = "(none)";

pub fn log_success_value(label: &str, value: &str) {
    let theme = success_output_theme();
    let line = format!(
        "{} {}{} {}",
        theme.success_prefix.clone(),
        theme.prompt_style.apply_to(label),
        theme.success_suffix.clone(),
        theme.values_style.apply_to(value),
    );
    println!("{line}");
}

pub fn log_success_list(label: &str, items: &[String]) {
    let theme = success_output_theme();
    let display = if items.is_empty() {
        EMPTY_SELECTION_PLACEHOLDER.to_string()
    } else {
        items.join(", ")
    };
    let line = format!(
        "{} {}{} {}",
        theme.success_prefix.clone(),
        theme.prompt_style.apply_to(label),
        theme.success_suffix.clone(),
        theme.values_style.apply_to(display.as_str()),
    );
    println!("{line}");
}

pub fn log_warning(message: &str) {
    let mut theme = prompt_theme();
    theme.error_prefix = style(WARNING_PREFIX.to_string()).for_stderr().yellow();
    theme.error_style = Style::new().for_stderr().yellow();

    let line = format!(
        "{} {}",
        theme.error_prefix.clone(),
        theme.error_style.apply_to(message)
    );
    eprintln!("{line}");
}

/// Prints a follow-up suggestion to stderr.
pub fn log_hint(message: &str) {
    let prefix = style(HINT_PREFIX.to_string()).for_stderr().yellow();
    let message_style = Style::new().for_stderr().yellow();

    let line = format!("{} {}", prefix, message_style.apply_to(message));
    eprintln!("{line}");
}

pub fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("🧭".to_string()).cyan(),
        prompt_style: Style::new().for_stderr(),
        success_prefix: style(SUCCESS_PREFIX.to_string()).for_stderr(),
        success_suffix: style(":".to_string()).for_stderr(),
        values_style: Style::new().for_stderr(),
        ..ColorfulTheme::default()
    }
}

fn success_output_theme() -> ColorfulTheme {
    let mut theme = prompt_theme();
    theme.success_prefix = theme.success_prefix.clone().for_stdout();
    theme.success_suffix = theme.success_suffix.clone().for_stdout();
    theme.prompt_style = theme.prompt_style.clone().for_stdout();
    theme.values_style = theme.values_style.clone().for_stdout();
    theme
}

/// Ask the user to pick one or more module sets.
pub fn select_module_sets(available: &[String], prompt: &str) -> Result<Vec<String>> {
    if available.is_empty() {
        return Err(MultimodError::Config(
            "The versioning file declares no module sets.".into(),
        ));
    }

    let theme = prompt_theme();

    loop {
        let selections = MultiSelect::with_theme(&theme)
            .with_prompt(prompt)
            .items(available)
            .report(false)
            .interact()
            .map_err(prompt_io_error)?;

        if selections.is_empty() {
            log_warning("Select at least one module set to continue.");
            continue;
        }

        let selected = selections
            .into_iter()
            .map(|index| available[index].clone())
            .collect::<Vec<_>>();
        log_success_list("Module sets", &selected);
        return Ok(selected);
    }
}

pub fn prompt_io_error(error: dialoguer::Error) -> io::Error {
    match error {
        dialoguer::Error::IO(err) => err,
    }
}
