//! Driver questionnaire: field rules and submission.

use crate::errors::{AppError, AppResult, FieldError};
use crate::models::{DriverId, DriverRecord, EmergencyContact};
use crate::store::RecordStore;
use regex::Regex;
use std::sync::LazyLock;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s\-]+$").expect("valid regex"));
static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\s,\.]+$").expect("valid regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("valid regex"));
static PESEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{11}$").expect("valid regex"));
static BANK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{20}$").expect("valid regex"));
static DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid regex"));

pub const MAX_EXPERIENCE_YEARS: u8 = 35;

/// Raw questionnaire input, exactly as typed.
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub full_name: String,
    pub address: String,
    pub phone_number: String,
    pub pesel: String,
    pub children_info: Option<String>,
    pub education: Option<String>,
    pub bank_account: String,
    pub experience: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
}

/// Required field matching `re`.
fn check(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: &str,
    re: &Regex,
    required_msg: &str,
    pattern_msg: &str,
) {
    if value.is_empty() {
        errors.push(FieldError::new(field, required_msg));
    } else if !re.is_match(value) {
        errors.push(FieldError::new(field, pattern_msg));
    }
}

fn optional_text(v: &Option<String>) -> Option<String> {
    v.as_ref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.to_string())
}

impl SubmissionForm {
    /// Apply every field rule. All violations are reported, not just the first.
    pub fn validate(&self) -> Result<DriverRecord, Vec<FieldError>> {
        let mut errors = Vec::new();

        check(
            &mut errors,
            "fullName",
            &self.full_name,
            &NAME_RE,
            "Поле \"Имя и фамилия\" обязательно для заполнения.",
            "Имя и фамилия могут содержать только латинские буквы и пробелы.",
        );
        check(
            &mut errors,
            "address",
            &self.address,
            &ADDRESS_RE,
            "Поле \"Адрес\" обязательно для заполнения.",
            "Адрес может содержать только латинские буквы, цифры, пробелы, запятые и точки.",
        );
        check(
            &mut errors,
            "phoneNumber",
            &self.phone_number,
            &PHONE_RE,
            "Номер телефона обязателен.",
            "Номер телефона должен быть в правильном формате (например, +79991234567).",
        );
        check(
            &mut errors,
            "pesel",
            &self.pesel,
            &PESEL_RE,
            "Поле \"PESEL\" обязательно для заполнения.",
            "PESEL должен состоять из 11 цифр.",
        );
        check(
            &mut errors,
            "bankAccount",
            &self.bank_account,
            &BANK_RE,
            "Поле \"Номер банковского счёта\" обязательно для заполнения.",
            "Номер банковского счёта должен состоять из 20 цифр.",
        );

        let experience = self.validate_experience(&mut errors);

        check(
            &mut errors,
            "emergencyContactName",
            &self.emergency_contact_name,
            &NAME_RE,
            "Поле \"Имя экстренного контакта\" обязательно для заполнения.",
            "Имя экстренного контакта может содержать только латинские буквы и пробелы.",
        );
        check(
            &mut errors,
            "emergencyContactPhone",
            &self.emergency_contact_phone,
            &PHONE_RE,
            "Телефон экстренного контакта обязателен.",
            "Телефон экстренного контакта должен быть в правильном формате.",
        );

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(DriverRecord {
            full_name: self.full_name.clone(),
            address: self.address.clone(),
            phone_number: self.phone_number.clone(),
            pesel: self.pesel.clone(),
            children_info: optional_text(&self.children_info),
            education: optional_text(&self.education),
            bank_account: self.bank_account.clone(),
            experience: experience.unwrap_or_default(),
            emergency_contact: Some(EmergencyContact {
                name: self.emergency_contact_name.clone(),
                phone: self.emergency_contact_phone.clone(),
            }),
        })
    }

    fn validate_experience(&self, errors: &mut Vec<FieldError>) -> Option<u8> {
        let raw = self.experience.as_str();
        if raw.is_empty() {
            errors.push(FieldError::new(
                "experience",
                "Поле \"Опыт работы\" обязательно для заполнения.",
            ));
            return None;
        }
        if !DIGITS_RE.is_match(raw) {
            errors.push(FieldError::new(
                "experience",
                "Опыт работы должен быть числовым значением.",
            ));
            return None;
        }
        // digits only, so a parse failure can only mean "too large"
        match raw.parse::<u32>() {
            Ok(years) if years <= u32::from(MAX_EXPERIENCE_YEARS) => u8::try_from(years).ok(),
            _ => {
                errors.push(FieldError::new(
                    "experience",
                    "Опыт работы должен быть от 0 до 35 лет.",
                ));
                None
            }
        }
    }
}

pub struct SubmitLogic;

impl SubmitLogic {
    /// Validate and store one questionnaire under a freshly generated id.
    pub fn apply(store: &impl RecordStore, form: &SubmissionForm) -> AppResult<DriverId> {
        let record = form.validate().map_err(AppError::Validation)?;
        let id = DriverId::generate();
        store.write(&id, &record)?;
        log::info!("questionnaire stored as {id}");
        Ok(id)
    }
}
