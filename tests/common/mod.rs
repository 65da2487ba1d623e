#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn digihub_binary() -> &'static str {
    env!("CARGO_BIN_EXE_digihub")
}

/// Helper struct to run digihub commands against an isolated root directory
pub struct HubTest {
    pub temp_dir: TempDir,
}

impl HubTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        HubTest { temp_dir }
    }

    /// The directory digihub treats as its root
    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join(".digihub")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(digihub_binary());
        cmd.current_dir(self.temp_dir.path())
            .env("DIGIHUB_ROOT", self.root())
            .env_remove("DIGIHUB_ENDPOINT")
            .env_remove("DIGIHUB_ADMIN_ID")
            .env_remove("DIGIHUB_ADMIN_PW")
            .env_remove("DIGIHUB_LOG");
        cmd
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command()
            .args(args)
            .output()
            .expect("Failed to execute digihub command")
    }

    /// Run with extra environment variables
    pub fn run_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> Output {
        let mut cmd = self.command();
        for (key, value) in env {
            cmd.env(key, value);
        }
        cmd.args(args)
            .output()
            .expect("Failed to execute digihub command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    /// Run a successful command with `--json` and parse its output
    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let mut args = args.to_vec();
        args.push("--json");
        let stdout = self.run_success(&args);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("Invalid JSON from {args:?}: {e}\n{stdout}"))
    }

    pub fn write_file(&self, name: &str, content: &str) {
        let root = self.root();
        fs::create_dir_all(&root).expect("Failed to create root directory");
        fs::write(root.join(name), content).expect("Failed to write file");
    }

    pub fn read_file(&self, name: &str) -> Option<String> {
        fs::read_to_string(self.root().join(name)).ok()
    }

    pub fn file_exists(&self, name: &str) -> bool {
        self.root().join(name).exists()
    }

    pub fn write_config(&self, content: &str) {
        self.write_file("config.yaml", content);
    }

    /// Start with an admin session already stored
    pub fn login_as_admin(&self) {
        self.write_file("session.json", r#"{"tier":"admin"}"#);
    }
}
