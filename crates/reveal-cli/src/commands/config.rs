use clap::Subcommand;
use reveal_core::config::RevealConfig;
use reveal_core::Winner;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file path
    Path,
    /// Set the reveal outcome ("menina"/"girl" or "menino"/"boy")
    SetWinner { winner: String },
    /// Reset config to defaults
    Reset,
}

fn parse_winner(s: &str) -> Option<Winner> {
    match s.to_ascii_lowercase().as_str() {
        "menina" | "girl" => Some(Winner::Girl),
        "menino" | "boy" => Some(Winner::Boy),
        _ => None,
    }
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = RevealConfig::load()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", RevealConfig::path()?.display());
        }
        ConfigAction::SetWinner { winner } => {
            let Some(winner) = parse_winner(&winner) else {
                eprintln!("unknown winner: {winner}");
                std::process::exit(1);
            };
            let mut config = RevealConfig::load()?;
            config.winner = winner;
            config.save()?;
            println!("winner set to {}", winner.label());
        }
        ConfigAction::Reset => {
            let config = RevealConfig::default();
            config.save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
