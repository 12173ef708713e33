//! Project creation flow.
//! Collects the project configuration, materializes the template into the
//! project directory, then installs dependencies and initializes git as
//! requested. The working directory is passed in through [`Context`].

use clap::ValueEnum;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Args;
use crate::config::get_rules;
use crate::constants::{
    DEFAULT_PROJECT_NAME, MAX_PROJECT_NAME_LEN, SOURCE_TEMPLATE_DIR, TEMPLATE_DIR_NAME,
};
use crate::error::{Error, Result};
use crate::parser::Answers;
use crate::processor::materialize;
use crate::prompt::Prompter;
use crate::runner::CommandRunner;
use crate::template::Variables;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

impl PackageManager {
    pub const ALL: [PackageManager; 4] =
        [PackageManager::Npm, PackageManager::Yarn, PackageManager::Pnpm, PackageManager::Bun];

    pub fn name(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Bun => "bun",
        }
    }

    pub fn install_command(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm install",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm install",
            PackageManager::Bun => "bun install",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything the flow needs to know about the project being created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub project_name: String,
    pub description: String,
    pub author: String,
    /// `Some` when dependencies should be installed.
    pub package_manager: Option<PackageManager>,
    pub init_git: bool,
}

/// Ambient state threaded through the flow instead of read from the process.
#[derive(Debug, Clone)]
pub struct Context {
    pub working_dir: PathBuf,
    /// Bundled template, used unless `--template` is given.
    pub template_dir: PathBuf,
    /// Offered as the default author.
    pub default_author: String,
}

/// Result of a run.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Created { target_dir: PathBuf, config: ProjectConfig },
    /// The user declined to write into an existing directory.
    Cancelled,
}

/// Places an installed executable looks for the bundled template:
/// `<bin>/template`, `<prefix>/template`, `<prefix>/share/create-astro-exe/template`.
pub fn template_candidates(exe: &Path) -> Vec<PathBuf> {
    let Some(bin_dir) = exe.parent() else {
        return Vec::new();
    };
    let mut candidates = vec![bin_dir.join(TEMPLATE_DIR_NAME)];
    if let Some(prefix) = bin_dir.parent() {
        candidates.push(prefix.join(TEMPLATE_DIR_NAME));
        candidates.push(prefix.join("share").join(env!("CARGO_PKG_NAME")).join(TEMPLATE_DIR_NAME));
    }
    candidates
}

/// Finds the bundled template relative to the executable, falling back to the
/// source tree. When nothing exists the first install location is returned so
/// the error names where the template was expected.
pub fn locate_bundled_template(exe: Option<&Path>) -> PathBuf {
    let candidates = exe.map(template_candidates).unwrap_or_default();
    let source_dir = PathBuf::from(SOURCE_TEMPLATE_DIR);

    if let Some(found) = candidates.iter().find(|candidate| candidate.is_dir()) {
        return found.clone();
    }
    if source_dir.is_dir() {
        return source_dir;
    }
    warn!("Bundled template not found next to the executable");
    candidates.into_iter().next().unwrap_or(source_dir)
}

/// Checks a project name: required, `[A-Za-z0-9_-]` only, at most 50 characters.
pub fn validate_project_name(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("Project name is required".to_string());
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(
            "Project name can only contain letters, numbers, hyphens, and underscores".to_string()
        );
    }
    if name.chars().count() > MAX_PROJECT_NAME_LEN {
        return Err(format!("Project name must be between 1 and {MAX_PROJECT_NAME_LEN} characters"));
    }
    Ok(())
}

/// Turns a project name into an npm-friendly package name.
pub fn format_package_name(name: &str) -> String {
    let mut formatted = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '-' };
        if c == '-' && formatted.ends_with('-') {
            continue;
        }
        formatted.push(c);
    }
    formatted.trim_matches('-').to_string()
}

pub fn check_directory_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().is_dir()
}

/// Reads `user.name` from the global git configuration.
pub fn default_author() -> String {
    match git2::Config::open_default().and_then(|config| config.get_string("user.name")) {
        Ok(name) => name.trim().to_string(),
        Err(e) => {
            warn!("Could not read git user.name: {}", e.message());
            String::new()
        }
    }
}

/// The variable mapping handed to the materializer.
pub fn build_variables(config: &ProjectConfig) -> Variables {
    let mut variables = Variables::new();
    variables.insert("projectName".to_string(), config.project_name.clone());
    variables.insert("description".to_string(), config.description.clone());
    variables.insert("author".to_string(), config.author.clone());
    variables.insert("packageName".to_string(), format_package_name(&config.project_name));
    variables
}

fn resolve_project_name(args: &Args, answers: &Answers, prompt: &dyn Prompter) -> Result<String> {
    let name = match answers.project_name.as_ref().or(args.project_name.as_ref()) {
        Some(name) => name.clone(),
        None => prompt.input(
            "What is your project name?",
            DEFAULT_PROJECT_NAME,
            Some(validate_project_name),
        )?,
    };
    validate_project_name(&name).map_err(Error::ValidationError)?;
    Ok(name)
}

/// Collects the remaining configuration. Preloaded answers win over flags,
/// flags win over prompts. The project name follows the same order.
pub fn prompt_config(
    project_name: &str,
    args: &Args,
    answers: &Answers,
    context: &Context,
    prompt: &dyn Prompter,
) -> Result<ProjectConfig> {
    let description = match answers.description.as_ref().or(args.description.as_ref()) {
        Some(description) => description.clone(),
        None => prompt.input(
            "Project description:",
            &format!("{project_name} - Astro application"),
            None,
        )?,
    };

    let author = match answers.author.as_ref().or(args.author.as_ref()) {
        Some(author) => author.clone(),
        None => prompt.input("Author name:", &context.default_author, None)?,
    };

    let install_deps = match answers.install_deps {
        Some(install) => install,
        None if args.no_install => false,
        None => prompt.confirm("Install dependencies?", true)?,
    };

    let package_manager = if install_deps {
        let package_manager = match answers.package_manager.or(args.package_manager) {
            Some(package_manager) => package_manager,
            None => {
                let names = PackageManager::ALL.map(PackageManager::name);
                let index = prompt.select("Choose a package manager:", &names, 0)?;
                PackageManager::ALL.get(index).copied().unwrap_or_default()
            }
        };
        Some(package_manager)
    } else {
        None
    };

    let init_git = match answers.init_git {
        Some(init_git) => init_git,
        None if args.no_git => false,
        None => prompt.confirm("Initialize git repository?", true)?,
    };

    Ok(ProjectConfig {
        project_name: project_name.to_string(),
        description,
        author,
        package_manager,
        init_git,
    })
}

fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn setup_project(
    template_dir: &Path,
    target_dir: &Path,
    config: &ProjectConfig,
    runner: &dyn CommandRunner,
    spinner: &ProgressBar,
) -> Result<()> {
    let rules = get_rules(template_dir)?;

    spinner.set_message("Copying template files...");
    materialize(template_dir, target_dir, &build_variables(config), &rules)?;

    if let Some(package_manager) = config.package_manager {
        spinner.set_message("Installing dependencies...");
        info!("Installing dependencies with {}", package_manager);
        runner.run(package_manager.install_command(), Some(target_dir))?;
    }

    if config.init_git {
        spinner.set_message("Initializing git repository...");
        runner.run("git init", Some(target_dir))?;
    }
    Ok(())
}

/// Materializes the template, then runs the install and `git init` as configured.
pub fn create_project(
    template_dir: &Path,
    target_dir: &Path,
    config: &ProjectConfig,
    runner: &dyn CommandRunner,
) -> Result<()> {
    let spinner = spinner();
    spinner.set_message("Creating project...");

    let result = setup_project(template_dir, target_dir, config, runner, &spinner);
    match &result {
        Ok(()) => spinner.finish_with_message(format!(
            "{} Project created successfully!",
            style("✔").green()
        )),
        Err(_) => spinner.abandon_with_message(format!(
            "{} Failed to create project",
            style("✖").red()
        )),
    }
    result
}

/// Runs the whole flow: name, overwrite check, configuration, creation.
pub fn run(
    args: &Args,
    answers: &Answers,
    context: &Context,
    prompt: &dyn Prompter,
    runner: &dyn CommandRunner,
) -> Result<Outcome> {
    let project_name = resolve_project_name(args, answers, prompt)?;
    let target_dir = context.working_dir.join(&project_name);

    if check_directory_exists(&target_dir) && !args.force {
        let overwrite = prompt.confirm(
            &format!("Directory {} already exists. Overwrite?", style(&project_name).cyan()),
            false,
        )?;
        if !overwrite {
            return Ok(Outcome::Cancelled);
        }
    }

    let config = prompt_config(&project_name, args, answers, context, prompt)?;
    let template_dir = args.template.as_deref().unwrap_or(&context.template_dir);
    create_project(template_dir, &target_dir, &config, runner)?;

    Ok(Outcome::Created { target_dir, config })
}

/// Next steps shown after a successful run.
pub fn completion_message(project_name: &str, package_manager: Option<PackageManager>) -> String {
    let run_dev = match package_manager {
        Some(package_manager) => format!("  {package_manager} run dev"),
        None => "  npm/yarn/pnpm/bun run dev".to_string(),
    };
    format!(
        "\n{}\n\nNext steps:\n{}\n{}\n\nHappy coding! 🎉\n",
        style("✨ Project created successfully!").green(),
        style(format!("  cd {project_name}")).cyan(),
        style(run_dev).cyan(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_project_name() {
        assert!(validate_project_name("my-astro_app2").is_ok());
        assert_eq!(validate_project_name("").unwrap_err(), "Project name is required");
        assert!(validate_project_name("my app").unwrap_err().contains("can only contain"));
        assert!(validate_project_name("été").is_err());
        assert!(validate_project_name(&"a".repeat(50)).is_ok());
        assert!(validate_project_name(&"a".repeat(51)).unwrap_err().contains("between 1 and 50"));
    }

    #[test]
    fn test_format_package_name() {
        assert_eq!(format_package_name("My_Astro App"), "my-astro-app");
        assert_eq!(format_package_name("--Demo--"), "demo");
        assert_eq!(format_package_name("a__b..c"), "a-b-c");
        assert_eq!(format_package_name("site2024"), "site2024");
    }

    #[test]
    fn test_install_commands() {
        assert_eq!(PackageManager::Npm.install_command(), "npm install");
        assert_eq!(PackageManager::Yarn.install_command(), "yarn");
        assert_eq!(PackageManager::Pnpm.install_command(), "pnpm install");
        assert_eq!(PackageManager::Bun.install_command(), "bun install");
    }

    #[test]
    fn test_completion_message() {
        console::set_colors_enabled(false);
        let message = completion_message("demo", Some(PackageManager::Pnpm));
        assert!(message.contains("  cd demo"));
        assert!(message.contains("  pnpm run dev"));

        let message = completion_message("demo", None);
        assert!(message.contains("npm/yarn/pnpm/bun run dev"));
    }
}
