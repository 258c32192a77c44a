//! Test environment builder for isolated campaign-deploy testing.
//!
//! Provides `TestEnv` - a temp project holding the deployable tree plus a
//! `deploy.toml`, and helpers to run the CLI from its root.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Override variables read by the config loader; cleared for every run.
const OVERRIDE_VARS: &[&str] = &[
    "CAMPAIGN_DEPLOY_HOMOLOG_HOST",
    "CAMPAIGN_DEPLOY_HOMOLOG_USER",
    "CAMPAIGN_DEPLOY_HOMOLOG_SSH_KEY",
    "CAMPAIGN_DEPLOY_HOMOLOG_REMOTE_DIR",
    "CAMPAIGN_DEPLOY_PRODUCTION_HOST",
    "CAMPAIGN_DEPLOY_PRODUCTION_USER",
    "CAMPAIGN_DEPLOY_PRODUCTION_SSH_KEY",
    "CAMPAIGN_DEPLOY_PRODUCTION_REMOTE_DIR",
];

/// Result of running a campaign-deploy CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse stdout as NDJSON
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| {
                serde_json::from_str(l).unwrap_or_else(|e| panic!("not JSON: {} ({})", l, e))
            })
            .collect()
    }
}

/// Isolated project directory.
pub struct TestEnv {
    pub project_root: TempDir,
    bin: PathBuf,
}

impl TestEnv {
    /// Project tree with every required artifact, no config.
    pub fn new() -> Self {
        let env = Self {
            project_root: tempfile::tempdir().expect("Failed to create temp dir"),
            bin: PathBuf::from(env!("CARGO_BIN_EXE_campaign-deploy")),
        };
        env.write_project_file("app/main.py", "app = FastAPI()\n");
        env.write_project_file("app/static/logo.png", "png");
        env.write_project_file("migrations/env.py", "# alembic env\n");
        env.write_project_file("migrations/versions/0001_initial.py", "revision = '0001'\n");
        env.write_project_file("scripts/check_database.py", "# probe\n");
        env.write_project_file("scripts/seed_data.py", "# seed\n");
        env.write_project_file("requirements.txt", "fastapi\n");
        env.write_project_file("Dockerfile", "FROM python:3.12-slim\n");
        env.write_project_file("docker-compose.yml", "services: {}\n");
        env.write_project_file("alembic.ini", "[alembic]\n");
        env.write_project_file(".env.homolog", "DATABASE_URL=postgres://hml\n");
        env.write_project_file(".env.production", "DATABASE_URL=postgres://prd\n");
        env.write_project_file("static/uploads/campaign.jpg", "jpg");
        env
    }

    /// Project tree plus `deploy.toml` with `config`.
    pub fn with_config(config: &str) -> Self {
        let env = Self::new();
        env.write_project_file("deploy.toml", config);
        env
    }

    /// Get path relative to project root
    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    /// Write a file to the project directory
    pub fn write_project_file(&self, relative_path: &str, content: &str) {
        let full_path = self.project_path(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directories");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
    }

    /// Run the CLI from the project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_from(self.project_root.path(), args)
    }

    /// Run the CLI from a specific directory
    pub fn run_from(&self, cwd: &Path, args: &[&str]) -> TestResult {
        let mut cmd = Command::new(&self.bin);
        cmd.current_dir(cwd).args(args).env("NO_COLOR", "1");
        for var in OVERRIDE_VARS {
            cmd.env_remove(var);
        }

        let output = cmd.output().expect("Failed to execute campaign-deploy");
        output_to_result(output)
    }
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}
