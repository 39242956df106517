use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "esports-arena backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Create the database schema, dropping any existing tables
    Init,
    /// Grant admin privileges to a registered profile
    Promote {
        /// Username of the profile to promote
        #[arg(short, long)]
        username: String,
    },
    /// Follow live tournament changes from a running server
    Watch {
        /// Base URL of the server
        #[arg(short, long, default_value = "http://127.0.0.1:3000")]
        server: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cli = Cli::parse_from(["esports_arena", "serve"]);
        assert_eq!(cli.command, Command::Serve { port: 3000 });

        let cli = Cli::parse_from(["esports_arena", "promote", "--username", "boss"]);
        assert_eq!(cli.command, Command::Promote { username: "boss".to_string() });

        let cli = Cli::parse_from(["esports_arena", "watch"]);
        assert_eq!(cli.command, Command::Watch { server: "http://127.0.0.1:3000".to_string() });
    }
}
