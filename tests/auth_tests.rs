use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{OPERATOR, PASSWORD, TestHome};

#[test]
fn test_roster_commands_require_login() {
    let home = TestHome::new();

    for args in [vec!["list"], vec!["show", "x"], vec!["del", "x", "--yes"]] {
        home.dd()
            .args(&args)
            .assert()
            .failure()
            .stderr(contains("Not signed in"));
    }
}

#[test]
fn test_login_validates_locally() {
    let home = TestHome::new();

    home.dd()
        .args(["login", "--email", "not-an-email", "--password", "Ab1"])
        .assert()
        .failure()
        .stderr(
            contains("Введите корректный email.")
                .and(contains("Пароль должен быть не менее 6 символов.")),
        );
}

#[test]
fn test_login_wrong_password_is_rejected() {
    let home = TestHome::new();
    home.dd()
        .args(["user", "add", "--email", OPERATOR, "--password", PASSWORD])
        .assert()
        .success();

    home.dd()
        .args(["login", "--email", OPERATOR, "--password", "Secret2"])
        .assert()
        .failure()
        .stderr(contains("Ошибка входа"));

    home.dd().arg("whoami").assert().failure();
}

#[test]
fn test_login_whoami_logout() {
    let home = TestHome::signed_in();

    home.dd()
        .arg("whoami")
        .assert()
        .success()
        .stdout(contains(OPERATOR));

    home.dd()
        .arg("logout")
        .assert()
        .success()
        .stdout(contains("Signed out."));

    home.dd()
        .arg("list")
        .assert()
        .failure()
        .stderr(contains("Not signed in"));
}

#[test]
fn test_user_add_rejects_weak_password() {
    let home = TestHome::new();

    home.dd()
        .args(["user", "add", "--email", OPERATOR, "--password", "secret1"])
        .assert()
        .failure()
        .stderr(contains("заглавную букву"));

    home.dd()
        .args(["user", "list"])
        .assert()
        .success()
        .stdout(contains("No users"));
}

#[test]
fn test_user_email_is_case_insensitive() {
    let home = TestHome::new();
    home.dd()
        .args(["user", "add", "--email", "Op@Example.com", "--password", PASSWORD])
        .assert()
        .success();

    home.dd()
        .args(["login", "--email", OPERATOR, "--password", PASSWORD])
        .assert()
        .success();
}
