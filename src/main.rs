use clap::Parser;
use triage::cli::{
    handle_completions, handle_config_init, handle_index_build, handle_score, Cli, Commands,
    ConfigCommands, IndexCommands,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => triage::cli::serve::run_serve(args).await,
        Commands::Score(args) => handle_score(&args).map(|output| println!("{}", output)),
        Commands::Index(index_cmd) => match index_cmd {
            IndexCommands::Build(args) => {
                handle_index_build(&args).await.map(|output| println!("{}", output))
            }
        },
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => {
                handle_config_init(&args).map(|output| println!("{}", output))
            }
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
