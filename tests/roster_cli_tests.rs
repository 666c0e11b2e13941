use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::TestHome;

#[test]
fn test_list_and_search() {
    let home = TestHome::signed_in();
    home.submit("John Smith");
    home.submit("Anna Nowak");

    home.dd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("John Smith").and(contains("Anna Nowak")));

    home.dd()
        .args(["list", "--search", "SMITH"])
        .assert()
        .success()
        .stdout(contains("John Smith").and(contains("Anna Nowak").not()));

    home.dd()
        .args(["list", "--search", "zzz"])
        .assert()
        .success()
        .stdout(contains("No drivers match 'zzz'."));
}

#[test]
fn test_show_prints_details() {
    let home = TestHome::signed_in();
    home.submit("Jan Kowalski");
    let id = home.id_of("Jan Kowalski");

    home.dd()
        .args(["show", &id])
        .assert()
        .success()
        .stdout(
            contains("90010112345")
                .and(contains("Не указано"))
                .and(contains("Anna Kowalska (48987654321)")),
        );

    home.dd()
        .args(["show", "no-such-id"])
        .assert()
        .failure()
        .stderr(contains("Driver not found"));
}

#[test]
fn test_del_removes_only_named_drivers() {
    let home = TestHome::signed_in();
    home.submit("John Smith");
    home.submit("Anna Nowak");
    let id = home.id_of("John Smith");

    home.dd()
        .args(["del", &id, "--yes"])
        .assert()
        .success()
        .stdout(contains("Удалено 1 из 1"));

    let left = home.drivers();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].record.full_name, "Anna Nowak");
}

#[test]
fn test_del_unknown_id_fails() {
    let home = TestHome::signed_in();
    home.submit("John Smith");

    home.dd()
        .args(["del", "ghost", "--yes"])
        .assert()
        .failure()
        .stderr(contains("Driver not found"));

    assert_eq!(home.drivers().len(), 1);
}

#[test]
fn test_export_txt_sheet() {
    let home = TestHome::signed_in();
    home.submit("Jan Kowalski");
    let id = home.id_of("Jan Kowalski");
    let out = home.path().join("sheets");

    home.dd()
        .args(["export", &id, "--dir", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Экспортировано 1 из 1"));

    let content = fs::read_to_string(out.join("Jan_Kowalski_details.txt")).unwrap();
    assert_eq!(
        content,
        "Информация о водителе:\n\n\
         Имя и фамилия: Jan Kowalski\n\
         Адрес: Main St. 5, Lublin\n\
         Телефон: +48123456789\n\
         PESEL: 90010112345\n\
         Дети: Не указано\n\
         Образование: Driver since 2010\n\
         Банковский счёт: 12345678901234567890\n\
         Экстренный контакт: Anna Kowalska (48987654321)\n"
    );
}

#[test]
fn test_export_all_with_search_to_default_dir() {
    let home = TestHome::signed_in();
    home.submit("John Smith");
    home.submit("Jane Smithson");
    home.submit("Anna Nowak");

    home.dd()
        .args(["export", "--all", "--search", "smith"])
        .assert()
        .success()
        .stdout(contains("Экспортировано 2 из 2"));

    let exports = home.path().join("exports");
    assert!(exports.join("John_Smith_details.txt").exists());
    assert!(exports.join("Jane_Smithson_details.txt").exists());
    assert!(!exports.join("Anna_Nowak_details.txt").exists());
}

#[test]
fn test_export_csv_and_json_tables() {
    let home = TestHome::signed_in();
    home.submit("John Smith");
    home.submit("Anna Nowak");

    let csv = home.path().join("roster.csv");
    home.dd()
        .args(["export", "--all", "--format", "csv", "--file", csv.to_str().unwrap()])
        .assert()
        .success();
    let content = fs::read_to_string(&csv).unwrap();
    assert!(content.starts_with("id,full_name,"));
    assert!(content.contains("John Smith"));
    assert!(content.contains("Anna Nowak"));

    let json = home.path().join("roster.json");
    home.dd()
        .args(["export", "--all", "--format", "json", "--file", json.to_str().unwrap()])
        .assert()
        .success();
    let rows: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 2);
}

#[test]
fn test_export_needs_ids_or_all() {
    let home = TestHome::signed_in();

    home.dd()
        .arg("export")
        .assert()
        .failure()
        .stderr(contains("pass driver ids or --all"));
}

#[test]
fn test_roster_session_scripted() {
    let home = TestHome::signed_in();
    home.submit("John Smith");
    home.submit("Anna Nowak");

    home.dd()
        .arg("roster")
        .write_stdin("search nowak\nall\nexport-selected\nquit\n")
        .assert()
        .success()
        .stdout(contains("1 selected").and(contains("Экспортировано 1 из 1")));

    assert!(home.path().join("exports").join("Anna_Nowak_details.txt").exists());
}
