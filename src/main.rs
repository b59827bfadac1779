use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use formstate_rs::form::script::ScriptLoader;
use formstate_rs::{AbstractControlState, ControlState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output format for the resulting state tree
    #[arg(
        short,
        long,
        value_enum,
        env = "FORMSTATE_FORMAT",
        default_value = "json",
        global = true
    )]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the initial state tree for a value
    Init {
        /// Id of the root control
        #[arg(short, long)]
        id: String,

        /// Path to a JSON or YAML file holding the value
        #[arg(short, long)]
        value: String,
    },
    /// Replay a script of actions and print the final state
    Replay {
        /// Path to the script file
        #[arg(short, long)]
        script: String,

        /// Only print the control with this id
        #[arg(short, long)]
        control: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let loader = ScriptLoader::new();

    let state = match args.command {
        Commands::Init { id, value } => {
            let initial = loader
                .load_value(&value)
                .with_context(|| format!("Failed to load value from {}", value))?;
            ControlState::from_value(id, initial)
        }
        Commands::Replay { script, control } => {
            let definition = loader
                .load_script(&script)
                .with_context(|| format!("Failed to load script {}", script))?;
            log::info!(
                "Replaying {} actions against '{}'",
                definition.actions.len(),
                definition.form.id
            );
            let state = definition
                .run()
                .with_context(|| format!("Replay of {} failed", script))?;

            match control {
                Some(id) => state
                    .find(&id)
                    .cloned()
                    .with_context(|| format!("No control '{}' in the final state", id))?,
                None => state,
            }
        }
    };

    log::info!(
        "Control '{}' is {}",
        state.id(),
        if state.is_valid() { "valid" } else { "invalid" }
    );

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&state)?,
        OutputFormat::Yaml => serde_yaml::to_string(&state)?,
    };
    println!("{}", output);

    Ok(())
}
