use crate::cli::parser::{Commands, SubmitArgs};
use crate::config::Config;
use crate::core::{SubmissionForm, SubmitLogic};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;

use super::open_store;

impl From<&SubmitArgs> for SubmissionForm {
    fn from(a: &SubmitArgs) -> Self {
        Self {
            full_name: a.full_name.clone(),
            address: a.address.clone(),
            phone_number: a.phone.clone(),
            pesel: a.pesel.clone(),
            children_info: a.children.clone(),
            education: a.education.clone(),
            bank_account: a.bank_account.clone(),
            experience: a.experience.clone(),
            emergency_contact_name: a.emergency_name.clone(),
            emergency_contact_phone: a.emergency_phone.clone(),
        }
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Submit(args) = cmd {
        let form = SubmissionForm::from(args);

        // field errors are reported before the database is touched
        form.validate().map_err(AppError::Validation)?;

        let store = open_store(cfg)?;
        let id = SubmitLogic::apply(&store, &form)?;
        success(format!("Анкета успешно отправлена! (id {id})"));
    }
    Ok(())
}
