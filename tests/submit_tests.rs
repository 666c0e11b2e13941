use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{TestHome, form_args};

#[test]
fn test_submit_valid_form_without_login() {
    let home = TestHome::new();

    home.dd()
        .arg("submit")
        .args(form_args("Jan Kowalski"))
        .assert()
        .success()
        .stdout(contains("Анкета успешно отправлена!"));

    let drivers = home.drivers();
    assert_eq!(drivers.len(), 1);
    assert_eq!(drivers[0].record.full_name, "Jan Kowalski");
    assert_eq!(drivers[0].record.experience, 7);
    assert_eq!(drivers[0].record.children_info, None);
}

#[test]
fn test_submit_empty_form_reports_every_field() {
    let home = TestHome::new();

    home.dd()
        .arg("submit")
        .assert()
        .failure()
        .stderr(
            contains("Поле \"Имя и фамилия\" обязательно для заполнения.")
                .and(contains("Поле \"PESEL\" обязательно для заполнения."))
                .and(contains("Поле \"Опыт работы\" обязательно для заполнения."))
                .and(contains("Телефон экстренного контакта обязателен.")),
        );

    assert!(home.drivers().is_empty());
}

#[test]
fn test_submit_rejects_out_of_range_experience() {
    let home = TestHome::new();
    let mut args = form_args("Jan Kowalski");
    let pos = args.iter().position(|a| a == "--experience").unwrap();
    args[pos + 1] = "36".into();

    home.dd()
        .arg("submit")
        .args(&args)
        .assert()
        .failure()
        .stderr(contains("Опыт работы должен быть от 0 до 35 лет."));

    assert!(home.drivers().is_empty());
}

#[test]
fn test_same_name_twice_keeps_both() {
    let home = TestHome::new();
    home.submit("Jan Kowalski");
    home.submit("Jan Kowalski");

    let drivers = home.drivers();
    assert_eq!(drivers.len(), 2);
    assert_ne!(drivers[0].id, drivers[1].id);
}
