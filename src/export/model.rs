use crate::models::Driver;
use serde::Serialize;

/// Flat row for tabular (CSV / JSON) roster exports.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DriverExport {
    pub id: String,
    pub full_name: String,
    pub address: String,
    pub phone_number: String,
    pub pesel: String,
    pub children_info: String,
    pub education: String,
    pub bank_account: String,
    pub experience: u8,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
}

impl From<&Driver> for DriverExport {
    fn from(d: &Driver) -> Self {
        let r = &d.record;
        let contact = r.emergency_contact.clone().unwrap_or_default();
        Self {
            id: d.id.to_string(),
            full_name: r.full_name.clone(),
            address: r.address.clone(),
            phone_number: r.phone_number.clone(),
            pesel: r.pesel.clone(),
            children_info: r.children_info.clone().unwrap_or_default(),
            education: r.education.clone().unwrap_or_default(),
            bank_account: r.bank_account.clone(),
            experience: r.experience,
            emergency_contact_name: contact.name,
            emergency_contact_phone: contact.phone,
        }
    }
}

pub(crate) fn to_rows(drivers: &[Driver]) -> Vec<DriverExport> {
    drivers.iter().map(DriverExport::from).collect()
}
