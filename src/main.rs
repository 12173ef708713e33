//! create-astro-exe entry point.
//! Parses arguments, sets up logging and hands over to the project flow.

use console::style;
use create_astro_exe::{
    cli::{get_args, Args},
    error::{default_error_handler, Result},
    parser::get_answers_from,
    project::{
        completion_message, default_author, locate_bundled_template, run as run_project, Context,
        Outcome,
    },
    prompt::{DefaultsPrompter, DialoguerPrompter, Prompter},
    runner::SystemRunner,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Off
        })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

fn run(args: Args) -> Result<()> {
    println!("{}", style("🚀 Create Astro Exe").cyan());
    println!("{}\n", style("Creating a new Astro application...").dim());

    let exe = std::env::current_exe().ok();
    let context = Context {
        working_dir: std::env::current_dir()?,
        template_dir: locate_bundled_template(exe.as_deref()),
        default_author: default_author(),
    };
    let answers = get_answers_from(args.stdin)?;

    let prompt: Box<dyn Prompter> = if args.yes || args.stdin {
        Box::new(DefaultsPrompter)
    } else {
        Box::new(DialoguerPrompter::new())
    };

    match run_project(&args, &answers, &context, &*prompt, &SystemRunner)? {
        Outcome::Created { config, .. } => {
            print!("{}", completion_message(&config.project_name, config.package_manager));
        }
        Outcome::Cancelled => println!("{}", style("Operation cancelled.").yellow()),
    }
    Ok(())
}
