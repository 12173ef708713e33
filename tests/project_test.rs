use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use create_astro_exe::{
    cli::Args,
    error::{Error, Result},
    parser::Answers,
    project::{locate_bundled_template, run, template_candidates, Context, Outcome, PackageManager},
    prompt::{DefaultsPrompter, Prompter, Validator},
    runner::{CommandOutput, CommandRunner},
};
use tempfile::TempDir;

#[derive(Default)]
struct RecordingRunner {
    calls: RefCell<Vec<(String, Option<PathBuf>)>>,
    fail_on: Option<&'static str>,
}

impl RecordingRunner {
    fn commands(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(command, _)| command.clone()).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &str, working_dir: Option<&Path>) -> Result<CommandOutput> {
        self.calls.borrow_mut().push((command.to_string(), working_dir.map(Path::to_path_buf)));
        if self.fail_on == Some(command) {
            return Err(Error::CommandError {
                command: command.to_string(),
                message: "exit status: 1".to_string(),
            });
        }
        Ok(CommandOutput::default())
    }
}

enum Reply {
    Text(&'static str),
    Yes(bool),
    Pick(usize),
}

/// Replays scripted replies and records every prompt it was asked.
struct ScriptedPrompter {
    replies: RefCell<VecDeque<Reply>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    fn new(replies: Vec<Reply>) -> Self {
        Self { replies: RefCell::new(replies.into()), asked: RefCell::new(Vec::new()) }
    }

    fn next(&self, prompt: &str) -> Reply {
        self.asked.borrow_mut().push(prompt.to_string());
        let reply = self.replies.borrow_mut().pop_front();
        reply.unwrap_or_else(|| panic!("unexpected prompt: {prompt}"))
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&self, prompt: &str, _default: &str, _validate: Option<Validator>) -> Result<String> {
        match self.next(prompt) {
            Reply::Text(text) => Ok(text.to_string()),
            _ => panic!("expected a text reply for {prompt}"),
        }
    }

    fn confirm(&self, prompt: &str, _default: bool) -> Result<bool> {
        match self.next(prompt) {
            Reply::Yes(answer) => Ok(answer),
            _ => panic!("expected a yes/no reply for {prompt}"),
        }
    }

    fn select(&self, prompt: &str, _items: &[&str], _default: usize) -> Result<usize> {
        match self.next(prompt) {
            Reply::Pick(index) => Ok(index),
            _ => panic!("expected a selection for {prompt}"),
        }
    }
}

fn template() -> TempDir {
    let template = TempDir::new().unwrap();
    fs::write(template.path().join("package.json.template"), r#"{"name": "{{packageName}}"}"#)
        .unwrap();
    fs::write(template.path().join("README.md.template"), "# {{projectName}} by {{author}}")
        .unwrap();
    template
}

fn context(working_dir: &Path) -> Context {
    Context {
        working_dir: working_dir.to_path_buf(),
        template_dir: working_dir.join("no-bundled-template"),
        default_author: "Git User".to_string(),
    }
}

fn args(template: &Path, project_name: Option<&str>) -> Args {
    Args {
        project_name: project_name.map(str::to_string),
        template: Some(template.to_path_buf()),
        ..Args::default()
    }
}

#[test]
fn test_interactive_flow() {
    let template = template();
    let work = TempDir::new().unwrap();
    let runner = RecordingRunner::default();
    let prompter = ScriptedPrompter::new(vec![
        Reply::Text("Demo_App"),
        Reply::Text("A demo"),
        Reply::Text("Ada"),
        Reply::Yes(true),
        Reply::Pick(2),
        Reply::Yes(true),
    ]);

    let outcome = run(
        &args(template.path(), None),
        &Answers::default(),
        &context(work.path()),
        &prompter,
        &runner,
    )
    .unwrap();

    let target_dir = work.path().join("Demo_App");
    match outcome {
        Outcome::Created { target_dir: created, config } => {
            assert_eq!(created, target_dir);
            assert_eq!(config.package_manager, Some(PackageManager::Pnpm));
            assert!(config.init_git);
        }
        Outcome::Cancelled => panic!("Expected the project to be created"),
    }

    assert_eq!(
        prompter.asked.borrow().as_slice(),
        [
            "What is your project name?",
            "Project description:",
            "Author name:",
            "Install dependencies?",
            "Choose a package manager:",
            "Initialize git repository?",
        ]
    );
    assert_eq!(
        fs::read_to_string(target_dir.join("package.json")).unwrap(),
        r#"{"name": "demo-app"}"#
    );
    assert_eq!(fs::read_to_string(target_dir.join("README.md")).unwrap(), "# Demo_App by Ada");
    assert_eq!(
        *runner.calls.borrow(),
        vec![
            ("pnpm install".to_string(), Some(target_dir.clone())),
            ("git init".to_string(), Some(target_dir)),
        ]
    );
}

#[test]
fn test_git_init_runs_only_git_init() {
    let template = template();
    let work = TempDir::new().unwrap();
    let runner = RecordingRunner::default();
    let mut args = args(template.path(), Some("demo"));
    args.no_install = true;

    run(&args, &Answers::default(), &context(work.path()), &DefaultsPrompter, &runner).unwrap();

    let commands = runner.commands();
    assert_eq!(commands, vec!["git init".to_string()]);
    assert!(!commands.iter().any(|command| command.starts_with("git add")));
    assert!(!commands.iter().any(|command| command.starts_with("git commit")));
}

#[test]
fn test_no_git_runs_no_git_commands() {
    let template = template();
    let work = TempDir::new().unwrap();
    let runner = RecordingRunner::default();
    let mut args = args(template.path(), Some("demo"));
    args.no_git = true;
    args.package_manager = Some(PackageManager::Yarn);

    run(&args, &Answers::default(), &context(work.path()), &DefaultsPrompter, &runner).unwrap();

    assert_eq!(runner.commands(), vec!["yarn".to_string()]);
}

#[test]
fn test_defaults() {
    let template = template();
    let work = TempDir::new().unwrap();
    let runner = RecordingRunner::default();

    let outcome = run(
        &args(template.path(), None),
        &Answers::default(),
        &context(work.path()),
        &DefaultsPrompter,
        &runner,
    )
    .unwrap();

    let Outcome::Created { config, .. } = outcome else {
        panic!("Expected the project to be created");
    };
    assert_eq!(config.project_name, "my-astro-app");
    assert_eq!(config.description, "my-astro-app - Astro application");
    assert_eq!(config.author, "Git User");
    assert_eq!(config.package_manager, Some(PackageManager::Npm));
    assert_eq!(runner.commands(), vec!["npm install".to_string(), "git init".to_string()]);
}

#[test]
fn test_preloaded_answers_skip_prompts() {
    let template = template();
    let work = TempDir::new().unwrap();
    let runner = RecordingRunner::default();
    let prompter = ScriptedPrompter::new(Vec::new());
    let answers = Answers {
        project_name: Some("preloaded".to_string()),
        description: Some(String::new()),
        author: Some("Ada".to_string()),
        install_deps: Some(true),
        package_manager: Some(PackageManager::Bun),
        init_git: Some(false),
    };

    run(&args(template.path(), None), &answers, &context(work.path()), &prompter, &runner)
        .unwrap();

    assert!(prompter.asked.borrow().is_empty());
    assert_eq!(runner.commands(), vec!["bun install".to_string()]);
    assert_eq!(
        fs::read_to_string(work.path().join("preloaded/README.md")).unwrap(),
        "# preloaded by Ada"
    );
}

#[test]
fn test_invalid_project_name() {
    let template = template();
    let work = TempDir::new().unwrap();
    let runner = RecordingRunner::default();

    let result = run(
        &args(template.path(), Some("bad name")),
        &Answers::default(),
        &context(work.path()),
        &DefaultsPrompter,
        &runner,
    );

    assert!(matches!(result, Err(Error::ValidationError(_))));
    assert!(!work.path().join("bad name").exists());
    assert!(runner.commands().is_empty());
}

#[test]
fn test_existing_directory_declined() {
    let template = template();
    let work = TempDir::new().unwrap();
    fs::create_dir(work.path().join("demo")).unwrap();
    let runner = RecordingRunner::default();
    let prompter = ScriptedPrompter::new(vec![Reply::Yes(false)]);

    let outcome = run(
        &args(template.path(), Some("demo")),
        &Answers::default(),
        &context(work.path()),
        &prompter,
        &runner,
    )
    .unwrap();

    assert_eq!(outcome, Outcome::Cancelled);
    assert!(prompter.asked.borrow()[0].contains("already exists. Overwrite?"));
    assert!(!work.path().join("demo/README.md").exists());
    assert!(runner.commands().is_empty());
}

#[test]
fn test_existing_directory_forced() {
    let template = template();
    let work = TempDir::new().unwrap();
    fs::create_dir(work.path().join("demo")).unwrap();
    fs::write(work.path().join("demo/README.md"), "old").unwrap();
    let runner = RecordingRunner::default();
    let mut args = args(template.path(), Some("demo"));
    args.force = true;
    args.no_install = true;
    args.no_git = true;

    run(&args, &Answers::default(), &context(work.path()), &DefaultsPrompter, &runner).unwrap();

    assert_eq!(
        fs::read_to_string(work.path().join("demo/README.md")).unwrap(),
        "# demo by Git User"
    );
}

#[test]
fn test_install_failure_keeps_materialized_files() {
    let template = template();
    let work = TempDir::new().unwrap();
    let runner = RecordingRunner { fail_on: Some("npm install"), ..RecordingRunner::default() };

    let result = run(
        &args(template.path(), Some("demo")),
        &Answers::default(),
        &context(work.path()),
        &DefaultsPrompter,
        &runner,
    );

    assert!(matches!(result, Err(Error::CommandError { .. })));
    assert!(work.path().join("demo/package.json").is_file());
    assert_eq!(runner.commands(), vec!["npm install".to_string()]);
}

#[test]
fn test_missing_template() {
    let work = TempDir::new().unwrap();
    let runner = RecordingRunner::default();

    let result = run(
        &args(&work.path().join("no-template"), Some("demo")),
        &Answers::default(),
        &context(work.path()),
        &DefaultsPrompter,
        &runner,
    );

    assert!(matches!(result, Err(Error::TemplateNotFound { .. })));
    assert!(runner.commands().is_empty());
}

#[test]
fn test_preloaded_project_name_beats_positional() {
    let template = template();
    let work = TempDir::new().unwrap();
    let runner = RecordingRunner::default();
    let answers = Answers { project_name: Some("from-answers".to_string()), ..Answers::default() };

    let outcome = run(
        &args(template.path(), Some("from-args")),
        &answers,
        &context(work.path()),
        &DefaultsPrompter,
        &runner,
    )
    .unwrap();

    let Outcome::Created { config, target_dir } = outcome else { panic!("expected a project") };
    assert_eq!(config.project_name, "from-answers");
    assert_eq!(target_dir, work.path().join("from-answers"));
    assert!(!work.path().join("from-args").exists());
}

#[test]
fn test_bundled_template_used_without_flag() {
    let template = template();
    let work = TempDir::new().unwrap();
    let runner = RecordingRunner::default();
    let context = Context { template_dir: template.path().to_path_buf(), ..context(work.path()) };
    let args = Args { project_name: Some("bundled".to_string()), ..Args::default() };

    run(&args, &Answers::default(), &context, &DefaultsPrompter, &runner).unwrap();

    assert_eq!(
        fs::read_to_string(work.path().join("bundled/README.md")).unwrap(),
        "# bundled by Git User"
    );
}

#[test]
fn test_template_candidates() {
    let exe = Path::new("/opt/tool/bin/create-astro-exe");
    assert_eq!(
        template_candidates(exe),
        vec![
            PathBuf::from("/opt/tool/bin/template"),
            PathBuf::from("/opt/tool/template"),
            PathBuf::from("/opt/tool/share/create-astro-exe/template"),
        ]
    );
}

#[test]
fn test_locate_bundled_template_next_to_executable() {
    let install = TempDir::new().unwrap();
    let exe = install.path().join("bin").join("create-astro-exe");
    let shared = install.path().join("share/create-astro-exe/template");
    fs::create_dir_all(&shared).unwrap();

    assert_eq!(locate_bundled_template(Some(&exe)), shared);

    let beside = install.path().join("bin/template");
    fs::create_dir_all(&beside).unwrap();
    assert_eq!(locate_bundled_template(Some(&exe)), beside);
}

#[test]
fn test_locate_bundled_template_falls_back_to_source_tree() {
    let install = TempDir::new().unwrap();
    let exe = install.path().join("bin").join("create-astro-exe");

    let located = locate_bundled_template(Some(&exe));
    assert_eq!(located, Path::new(env!("CARGO_MANIFEST_DIR")).join("template"));
    assert!(located.join("package.json.template").is_file());
    assert_eq!(locate_bundled_template(None), located);
}
