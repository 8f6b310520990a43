use clap::{CommandFactory, Parser, Subcommand};
use rounds_core::Config;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "rounds", version, about = "Rounds boxing round timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the countdown for a preset
    Run(commands::run::RunArgs),
    /// Preset management
    Preset {
        #[command(subcommand)]
        action: commands::preset::PresetAction,
    },
    /// App settings (active preset, theme, keep screen on)
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    logging::init(&config.log.filter);

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args, &config),
        Commands::Preset { action } => commands::preset::run(action, &config),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "rounds", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
