//! Terminal output with colors
//!
//! Data goes to stdout uncolored; diagnostics go to stderr. `colored`
//! honors NO_COLOR and CLICOLOR_FORCE.

use std::fmt::Display;

use colored::Colorize;

pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

pub fn success(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Labelled value, e.g. `matches: 3,7`
pub fn action(label: &str, msg: &(impl Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Column header for tabular listings (cyan bold)
pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// One root of the chart listing: rank, id, name.
pub fn root_row(rank: u32, id: &(impl Display + ?Sized), name: &str) {
    println!("{:>5}  {:>6}  {}", rank.to_string().dimmed(), id, name);
}

/// Plain data line
pub fn info(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}
