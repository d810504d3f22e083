//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use serde::Serialize;

use crate::auth::models::{Account, AccountRole};
use crate::client::{Notice, NoticeKind, View};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Print a notice with the matching style
pub fn notice(notice: &Notice) {
    match notice.kind {
        NoticeKind::Success => success(&notice.text),
        NoticeKind::Warning => warn(&notice.text),
        NoticeKind::Error => error(&notice.text),
    }
}

/// Print a rendered client view
pub fn print_view(view: &View) {
    match view {
        View::Login { .. } => info("Login page"),
        View::Dashboard { user, .. } => info(&format!(
            "Dashboard: {} <{}> ({}, {})",
            user.name, user.email, user.role, user.course
        )),
    }
    if let Some(n) = view.notice() {
        notice(n);
    }
}

/// Account fields that are safe to print
#[derive(Debug, Serialize)]
pub struct AccountSummary {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub role: AccountRole,
    pub course: String,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            role: account.role,
            course: account.course.clone(),
        }
    }
}

/// Print a table of accounts, never their passwords
pub fn print_account_table(accounts: &[Account]) {
    if accounts.is_empty() {
        info("No accounts configured");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(Color::Cyan),
            Cell::new("Name").fg(Color::Cyan),
            Cell::new("Email").fg(Color::Cyan),
            Cell::new("Role").fg(Color::Cyan),
            Cell::new("Course").fg(Color::Cyan),
        ]);

    for account in accounts {
        let role_color = match account.role {
            AccountRole::Aluno => Color::Green,
            AccountRole::Professor => Color::Yellow,
        };

        table.add_row(vec![
            Cell::new(account.id),
            Cell::new(&account.name),
            Cell::new(&account.email),
            Cell::new(account.role).fg(role_color),
            Cell::new(&account.course),
        ]);
    }

    println!("{table}");
}
