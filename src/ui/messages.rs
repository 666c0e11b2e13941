//! Coloured one-line status output for the terminal.

use std::fmt;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

const FG_BLUE: &str = "\x1b[34m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_RED: &str = "\x1b[31m";
const BG_YELLOW: &str = "\x1b[43;30m";

const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

pub fn info<T: fmt::Display>(msg: T) {
    println!("{FG_BLUE}{BOLD}{ICON_INFO} {RESET}{msg}");
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{FG_GREEN}{BOLD}{ICON_OK} {RESET}{msg}");
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{FG_YELLOW}{BOLD}{ICON_WARN} {RESET}{msg}");
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{FG_RED}{BOLD}{ICON_ERR} {RESET}{msg}");
}

/// Text of the notice shown while the roster shows its last good snapshot.
pub fn stale_notice(reason: &str) -> String {
    format!("Данные могут быть устаревшими: связь с хранилищем потеряна ({reason}). Показана последняя полученная версия.")
}

/// Highlighted "data may be stale" line above roster output.
pub fn stale_banner(reason: &str) {
    println!("{BG_YELLOW}{BOLD} {ICON_WARN} {} {RESET}", stale_notice(reason));
}

/// Title line of the interactive roster.
pub fn roster_title(email: &str, drivers: usize) {
    println!("{FG_BLUE}{BOLD}driverdesk roster{RESET} | {email} | drivers: {drivers}");
}
