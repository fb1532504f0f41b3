pub mod banner;
pub mod progress;
pub mod tui;

use crossterm::style::Stylize;

/// Prints the welcome banner and applies the academy theme for all
/// subsequent inquire prompts. Call once at startup, after tracing init.
pub fn init_ui() {
    banner::print_welcome();
    tui::apply_theme();
}

/// Green confirmation line.
pub fn success(msg: &str) {
    println!("{} {}", "[ok]".green().bold(), msg);
}

/// Red failure line. Validation and transport errors both land here.
pub fn failure(msg: &str) {
    println!("{} {}", "[error]".red().bold(), msg);
}

/// Cyan informational line.
pub fn notice(msg: &str) {
    println!("{} {}", "[info]".cyan(), msg);
}
