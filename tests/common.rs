#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use driverdesk::models::Driver;
use driverdesk::store::SqliteStore;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

pub const OPERATOR: &str = "op@example.com";
pub const PASSWORD: &str = "Secret1";

/// An isolated driverdesk home: config, database, session and exports
/// all live in one temp directory that is removed on drop.
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        let home = Self {
            dir: tempfile::tempdir().expect("create temp home"),
        };
        home.dd().arg("init").assert().success();
        home
    }

    /// Home with one operator account, already signed in.
    pub fn signed_in() -> Self {
        let home = Self::new();
        home.dd()
            .args(["user", "add", "--email", OPERATOR, "--password", PASSWORD])
            .assert()
            .success();
        home.dd()
            .args(["login", "--email", OPERATOR, "--password", PASSWORD])
            .assert()
            .success();
        home
    }

    pub fn dd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("driverdesk");
        cmd.env("DRIVERDESK_HOME", self.dir.path());
        cmd.env_remove("RUST_LOG");
        cmd
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn db(&self) -> PathBuf {
        self.dir.path().join("driverdesk.sqlite")
    }

    pub fn submit(&self, full_name: &str) {
        self.dd()
            .arg("submit")
            .args(form_args(full_name))
            .assert()
            .success();
    }

    /// Current collection, read straight from the database.
    pub fn drivers(&self) -> Vec<Driver> {
        SqliteStore::open(self.db(), Duration::from_millis(50))
            .and_then(|s| s.snapshot())
            .expect("read drivers")
    }

    pub fn id_of(&self, full_name: &str) -> String {
        self.drivers()
            .into_iter()
            .find(|d| d.record.full_name == full_name)
            .map(|d| d.id.to_string())
            .expect("driver present")
    }
}

/// Command-line arguments of a valid questionnaire.
pub fn form_args(full_name: &str) -> Vec<String> {
    [
        "--full-name",
        full_name,
        "--address",
        "Main St. 5, Lublin",
        "--phone",
        "+48123456789",
        "--pesel",
        "90010112345",
        "--education",
        "Driver since 2010",
        "--bank-account",
        "12345678901234567890",
        "--experience",
        "7",
        "--emergency-name",
        "Anna Kowalska",
        "--emergency-phone",
        "48987654321",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
