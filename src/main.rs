use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;
mod output;
mod tty;

use commands::{config, detect, generate, migrate, plan};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "repackage")]
#[command(version = VERSION)]
#[command(about = "Migrate a React Native Android project to a new package id")]
struct Cli {
    /// Runs the interactive migration when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the package id currently declared by the project
    Detect(detect::DetectArgs),
    /// Derive a package id from a project name
    Generate(generate::GenerateArgs),
    /// Preview a migration without changing anything
    Plan(plan::PlanArgs),
    /// Migrate the project to a new package id
    Migrate(migrate::MigrateArgs),
    /// Manage repackage configuration
    Config(config::ConfigArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let global = GlobalArgs {
        defaults: repackage::defaults::load_defaults(),
    };

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Migrate(migrate::MigrateArgs::default()));

    match command {
        Commands::Migrate(args) if migrate::is_interactive(&args) => {
            if !tty::is_stdin_tty() {
                tty::status("stdin is not a terminal; answers are read from piped input");
            }
            let exit_code = migrate::run_interactive(args, &global);
            std::process::ExitCode::from(exit_code_to_u8(exit_code))
        }
        command => {
            let (json_result, exit_code) = commands::run_json(command, &global);
            if let Err(err) = output::print_json_result(json_result) {
                eprintln!("{}", err);
                return std::process::ExitCode::from(1);
            }
            std::process::ExitCode::from(exit_code_to_u8(exit_code))
        }
    }
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
