//! Printing to the real console

use colored::Colorize;

/// Print the header and the captured `output` of a failed validation to `stdout`
///
/// Everything goes through `print!` so the echo stays together with other captured test output.
pub fn print_echo(file_name: &str, output: &[u8]) {
    println!(
        "{}{}",
        "Test Result compared for the output file:".yellow().bold(),
        file_name.bold()
    );
    print!("{}", echo_body(output));
}

/// The captured `output` followed by a single newline
fn echo_body(output: &[u8]) -> String {
    format!("{}\n", String::from_utf8_lossy(output))
}
