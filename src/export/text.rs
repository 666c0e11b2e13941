//! Plain-text driver sheet: the single-record export consumed downstream.
//! The layout below is a fixed contract; do not reorder or relabel.

use crate::models::DriverRecord;

pub const NOT_SPECIFIED: &str = "Не указано";
pub const NO_PHONE: &str = "Нет телефона";
pub const FILE_SUFFIX: &str = "_details.txt";

/// A rendered export ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub contents: String,
}

fn or_placeholder<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => placeholder,
    }
}

pub fn file_name(record: &DriverRecord) -> String {
    format!("{}{FILE_SUFFIX}", record.name_slug())
}

/// Labelled `(label, value)` pairs shared by the export and the detail view.
pub fn detail_fields(record: &DriverRecord) -> Vec<(&'static str, String)> {
    let contact = record.emergency_contact.as_ref();
    let contact_name = or_placeholder(contact.map(|c| c.name.as_str()), NOT_SPECIFIED);
    let contact_phone = or_placeholder(contact.map(|c| c.phone.as_str()), NO_PHONE);

    vec![
        ("Имя и фамилия", record.full_name.clone()),
        ("Адрес", record.address.clone()),
        ("Телефон", record.phone_number.clone()),
        ("PESEL", record.pesel.clone()),
        (
            "Дети",
            or_placeholder(record.children_info.as_deref(), NOT_SPECIFIED).to_string(),
        ),
        (
            "Образование",
            or_placeholder(record.education.as_deref(), NOT_SPECIFIED).to_string(),
        ),
        (
            "Банковский счёт",
            or_placeholder(Some(record.bank_account.as_str()), NOT_SPECIFIED).to_string(),
        ),
        (
            "Экстренный контакт",
            format!("{contact_name} ({contact_phone})"),
        ),
    ]
}

pub fn render_details(record: &DriverRecord) -> String {
    let mut out = String::from("Информация о водителе:\n\n");
    for (label, value) in detail_fields(record) {
        out.push_str(label);
        out.push_str(": ");
        out.push_str(&value);
        out.push('\n');
    }
    out
}

pub fn export_record(record: &DriverRecord) -> ExportedFile {
    ExportedFile {
        file_name: file_name(record),
        contents: render_details(record),
    }
}
