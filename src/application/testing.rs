//! In-memory fakes for the application ports.
//!
//! `RemoteState` interprets the command lines the stages issue well enough
//! to act as a docker host with a database, volumes and containers.

use std::collections::{BTreeSet, VecDeque};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use crate::config::Config;
use crate::domain::entities::{EnvironmentProfile, REQUIRED_PATHS};
use crate::domain::ports::{
    CommandOutput, DeployEvent, DeployEventSink, LocalRunner, LockError, LockGuard, PlannedFile,
    PushReport, PushRequest, RemoteConnector, RemoteShell, RunLock, ShellError, TransferError,
    TransferStrategy,
};
use crate::domain::value_objects::{Environment, ProbeReport};

pub const REMOTE_DIR: &str = "/opt/campaigns";

#[derive(Debug, Default)]
pub struct RemoteState {
    pub unreachable: bool,
    /// Probe report printed by the database probe; `None` makes the probe
    /// script missing from the image
    pub database: Option<ProbeReport>,
    /// Print the report as status markers instead of JSON
    pub status_markers: bool,
    pub volumes: BTreeSet<String>,
    pub containers: BTreeSet<String>,
    /// Remote paths that exist for `test -f` / `test -d`
    pub paths: BTreeSet<String>,
    /// Backup directory names returned by `ls -1`
    pub backups: Vec<String>,
    /// Status codes answered by the health endpoint, then `default_health`
    pub health: VecDeque<String>,
    pub default_health: String,
    /// Commands containing any of these fragments exit 1
    pub fail_on: Vec<String>,
    /// Commands containing any of these fragments lose the connection
    pub drop_on: Vec<String>,
    pub lock_holder: Option<String>,
    pub commands: Vec<String>,
    pub inputs: Vec<(String, Vec<u8>)>,
}

impl RemoteState {
    /// A deployed host whose database is at `revision`.
    pub fn deployed(revision: &str) -> Self {
        let mut state = Self::fresh();
        state.database = Some(ProbeReport {
            connected: true,
            history_table: true,
            current_revision: Some(revision.to_string()),
            head_revision: Some(revision.to_string()),
            ..Default::default()
        });
        state.paths.insert(format!("{}/.env", REMOTE_DIR));
        state.paths.insert(format!("{}/static", REMOTE_DIR));
        state.volumes.insert("campaigns_logs".to_string());
        state.volumes.insert("campaigns_redis_data".to_string());
        state.containers.insert("campaigns-api".to_string());
        state.containers.insert("campaigns-redis".to_string());
        state
    }

    /// A host that has never been deployed to, with an empty database.
    pub fn fresh() -> Self {
        Self {
            database: Some(ProbeReport {
                connected: true,
                history_table: false,
                head_revision: Some("0002_campaigns".to_string()),
                ..Default::default()
            }),
            default_health: "200".to_string(),
            ..Default::default()
        }
    }

    fn fails(&self, command: &str) -> bool {
        self.fail_on.iter().any(|f| command.contains(f.as_str()))
    }

    fn interpret(&mut self, command: &str) -> CommandOutput {
        if self.fails(command) {
            return CommandOutput::failure(1, format!("injected failure: {}", command));
        }

        if command.contains(".deploy-lock") {
            return self.lock_command(command);
        }
        if command.contains("check_database.py") {
            return match &self.database {
                Some(report) => {
                    let stdout = if self.status_markers {
                        markers(report)
                    } else {
                        let json = serde_json::to_string(report).unwrap_or_default();
                        format!("INFO probing\n{}\n", json)
                    };
                    let code = if report.connected { 0 } else { 1 };
                    CommandOutput {
                        code: Some(code),
                        stdout,
                        stderr: String::new(),
                    }
                }
                None => CommandOutput::failure(
                    2,
                    "python: can't open file '/app/scripts/check_database.py': [Errno 2] No such file or directory",
                ),
            };
        }
        if command.contains("alembic upgrade head") {
            if let Some(db) = self.database.as_mut() {
                db.history_table = true;
                db.current_revision = db.head_revision.clone();
                db.pending.clear();
            }
            return CommandOutput::success("");
        }
        if command.contains("curl") {
            let status = self
                .health
                .pop_front()
                .unwrap_or_else(|| self.default_health.clone());
            return CommandOutput::success(status);
        }
        if command.contains("volume inspect") {
            let name = quoted_after(command, "volume inspect").unwrap_or_default();
            return exists(self.volumes.contains(&name));
        }
        if command.contains("volume create") {
            if let Some(name) = quoted_after(command, "volume create") {
                self.volumes.insert(name);
            }
            return CommandOutput::success("");
        }
        if command.contains("container inspect") {
            let name = quoted_after(command, "container inspect").unwrap_or_default();
            return exists(self.containers.contains(&name));
        }
        if command.contains("docker rm ") {
            if let Some(name) = quoted_after(command, "docker rm") {
                self.containers.remove(&name);
            }
            return CommandOutput::success("");
        }
        if command.contains("run -d") {
            if let Some(name) = quoted_after(command, "--name") {
                self.containers.insert(name);
            }
            return CommandOutput::success("");
        }
        if let Some(path) = command
            .strip_prefix("test -f ")
            .or_else(|| command.strip_prefix("test -d "))
        {
            return exists(self.paths.contains(&unquote(path)));
        }
        if command.contains("; then find ") {
            let root = quoted_after(command, "cd").unwrap_or_default();
            let dir = quoted_after(command, "find").unwrap_or_default();
            let prefix = format!("{}/{}/", root, dir);
            let listing: Vec<&str> = self
                .paths
                .iter()
                .filter(|p| p.starts_with(&prefix))
                .map(|p| &p[root.len() + 1..])
                .collect();
            return CommandOutput::success(listing.join("\n"));
        }
        if let Some(index) = command.find("&& rm -f -- ") {
            let root = quoted_after(command, "cd").unwrap_or_default();
            for rel in quoted_words(&command[index + "&& rm -f -- ".len()..]) {
                self.paths.remove(&format!("{}/{}", root, rel));
            }
            return CommandOutput::success("");
        }
        if command.starts_with("ls -1 ") {
            return CommandOutput::success(self.backups.join("\n"));
        }
        if command.starts_with("du -sh ") {
            return CommandOutput::success("4.0M\t/opt/campaigns/backups/x");
        }
        if let Some(path) = command.strip_prefix("rm -rf ") {
            let path = unquote(path);
            let name = path.rsplit('/').next().unwrap_or_default().to_string();
            self.backups.retain(|b| *b != name);
            return CommandOutput::success("");
        }
        CommandOutput::success("")
    }

    fn lock_command(&mut self, command: &str) -> CommandOutput {
        if command.starts_with("cat ") {
            return CommandOutput::success(self.lock_holder.clone().unwrap_or_default());
        }
        if command.starts_with("rm -rf ") {
            self.lock_holder = None;
            return CommandOutput::success("");
        }
        if self.lock_holder.is_some() {
            return CommandOutput::failure(73, "");
        }
        self.lock_holder = Some("this run".to_string());
        CommandOutput::success("")
    }
}

/// `report` as `scripts/check_database.py` prints it
fn markers(report: &ProbeReport) -> String {
    let current = report.current_revision.as_deref().unwrap_or("None");
    let mut out = String::from("🔍 Verificando estado do banco de dados...\n");
    if !report.connected {
        let error = report.error.as_deref().unwrap_or("connection refused");
        out.push_str(&format!("❌ Erro ao conectar no banco: {}\n❌ BANCO_NAO_EXISTE\n", error));
    } else if !report.history_table {
        out.push_str("🆕 PRIMEIRA_INSTALACAO\n");
    } else if report.pending.is_empty() {
        out.push_str(&format!("✅ BANCO_ATUALIZADO\n📍 Revisão atual: {}\n", current));
    } else {
        out.push_str(&format!(
            "🔄 MIGRACOES_PENDENTES\n📍 Revisão atual: {}\n📋 Migrações pendentes: {}\n",
            current,
            report.pending.len()
        ));
        for rev in report.pending.iter().rev() {
            out.push_str(&format!("   - {}\n", rev));
        }
    }
    out
}

fn exists(found: bool) -> CommandOutput {
    if found {
        CommandOutput::success("")
    } else {
        CommandOutput::failure(1, "")
    }
}

fn unquote(s: &str) -> String {
    s.trim().trim_matches('\'').to_string()
}

/// First single-quoted word after `marker`.
fn quoted_after(command: &str, marker: &str) -> Option<String> {
    let rest = &command[command.find(marker)? + marker.len()..];
    let rest = rest.trim_start().strip_prefix('\'')?;
    let end = rest.find('\'')?;
    Some(rest[..end].to_string())
}

/// Every single-quoted word in `rest`.
fn quoted_words(rest: &str) -> Vec<String> {
    rest.split_whitespace().map(unquote).collect()
}

#[derive(Clone)]
pub struct FakeShell {
    state: Arc<Mutex<RemoteState>>,
}

impl RemoteShell for FakeShell {
    fn target(&self) -> String {
        "deploy@10.0.0.5".to_string()
    }

    fn run(&self, command: &str) -> Result<CommandOutput, ShellError> {
        let mut state = self.state.lock().unwrap();
        state.commands.push(command.to_string());
        let dropped = state.drop_on.iter().any(|f| command.contains(f.as_str()));
        if state.unreachable || dropped {
            return Err(ShellError::Connection {
                target: self.target(),
                message: "Connection timed out".to_string(),
            });
        }
        Ok(state.interpret(command))
    }

    fn run_with_input(&self, command: &str, input: &[u8]) -> Result<CommandOutput, ShellError> {
        let mut state = self.state.lock().unwrap();
        state.commands.push(command.to_string());
        state.inputs.push((command.to_string(), input.to_vec()));
        if state.fails(command) {
            return Ok(CommandOutput::failure(1, "injected failure"));
        }
        Ok(CommandOutput::success(""))
    }
}

#[derive(Clone)]
pub struct FakeConnector {
    pub state: Arc<Mutex<RemoteState>>,
    pub connects: Arc<AtomicUsize>,
}

impl FakeConnector {
    pub fn new(state: RemoteState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            connects: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn commands(&self) -> Vec<String> {
        self.state.lock().unwrap().commands.clone()
    }

    pub fn remote(&self) -> std::sync::MutexGuard<'_, RemoteState> {
        self.state.lock().unwrap()
    }
}

impl RemoteConnector for FakeConnector {
    fn connect(&self, _profile: &EnvironmentProfile) -> Box<dyn RemoteShell> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Box::new(FakeShell {
            state: self.state.clone(),
        })
    }
}

/// Records what would be pushed, applying the shared exclusion gate.
#[derive(Clone, Default)]
pub struct RecordingTransfer {
    pub pushed: Arc<Mutex<Vec<PlannedFile>>>,
    pub unavailable: bool,
    pub fail: bool,
    /// Fail only requests whose files come from under this source path
    pub fail_under: Option<PathBuf>,
}

impl RecordingTransfer {
    pub fn pushed(&self) -> Vec<PlannedFile> {
        self.pushed.lock().unwrap().clone()
    }
}

impl TransferStrategy for RecordingTransfer {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn is_available(&self) -> bool {
        !self.unavailable
    }

    fn push(&self, request: &PushRequest<'_>) -> Result<PushReport, TransferError> {
        let failing = self.fail_under.as_ref().is_some_and(|prefix| {
            request.files.iter().any(|f| f.source.starts_with(prefix))
        });
        if self.fail || failing {
            return Err(TransferError::CommandFailed("connection reset".to_string()));
        }
        let (admitted, refused) = request.admitted();
        let mut pushed = self.pushed.lock().unwrap();
        pushed.extend(admitted.iter().map(|f| (*f).clone()));
        Ok(PushReport {
            pushed: admitted.iter().map(|f| f.destination.clone()).collect(),
            refused,
        })
    }
}

struct FakeGuard;

impl LockGuard for FakeGuard {}

#[derive(Default)]
pub struct FakeRunLock {
    pub held_by: Option<String>,
}

impl RunLock for FakeRunLock {
    fn acquire(&self, _environment: Environment) -> Result<Box<dyn LockGuard>, LockError> {
        match &self.held_by {
            Some(holder) => Err(LockError::Held {
                holder: holder.clone(),
            }),
            None => Ok(Box::new(FakeGuard)),
        }
    }
}

#[derive(Clone, Default)]
pub struct RecordingRunner {
    pub code: i32,
    pub calls: Arc<Mutex<Vec<(String, PathBuf)>>>,
}

impl RecordingRunner {
    pub fn calls(&self) -> Vec<(String, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

impl LocalRunner for RecordingRunner {
    fn run(&self, command: &str, cwd: &Path) -> io::Result<i32> {
        self.calls
            .lock()
            .unwrap()
            .push((command.to_string(), cwd.to_path_buf()));
        Ok(self.code)
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<DeployEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<DeployEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl DeployEventSink for RecordingSink {
    fn on_event(&self, event: DeployEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// A checkout with every required artifact, env files for both remote
/// environments, a `static/` tree and an ssh key.
pub fn project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    for path in REQUIRED_PATHS {
        let full = root.join(path);
        if path.contains('.') || *path == "Dockerfile" {
            fs::write(full, format!("# {}\n", path)).unwrap();
        } else {
            fs::create_dir_all(full).unwrap();
        }
    }
    fs::write(root.join("app/main.py"), "app = FastAPI()\n").unwrap();
    fs::create_dir_all(root.join("migrations/versions")).unwrap();
    fs::write(root.join("migrations/versions/0001_initial.py"), "rev\n").unwrap();
    fs::write(root.join("scripts/check_database.py"), "# probe\n").unwrap();
    fs::write(root.join("scripts/seed_data.py"), "# seed\n").unwrap();
    fs::write(root.join(".env.homolog"), "DATABASE_URL=postgres://h\n").unwrap();
    fs::write(root.join(".env.production"), "DATABASE_URL=postgres://p\n").unwrap();
    fs::create_dir_all(root.join("static/uploads")).unwrap();
    fs::write(root.join("static/uploads/foo.jpg"), "jpg").unwrap();
    fs::create_dir_all(root.join("keys")).unwrap();
    fs::write(root.join("keys/id_ed25519"), "KEY").unwrap();
    dir
}

/// Both remote environments pointed at the fake host with instant health
/// polling.
pub fn config() -> Config {
    let mut config = Config::default();
    config.deploy.settle_secs = 0;
    config.deploy.health_interval_secs = 0;
    for env in [Environment::Homolog, Environment::Production] {
        let section = config.environment_mut(env);
        section.host = Some("10.0.0.5".to_string());
        section.user = Some("deploy".to_string());
        section.ssh_key = Some(PathBuf::from("keys/id_ed25519"));
        section.remote_dir = Some(REMOTE_DIR.to_string());
    }
    config.development.run_command = "docker compose up --build".to_string();
    config
}
