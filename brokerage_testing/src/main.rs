use std::net::IpAddr;

use brokerage_testing::{cms, smtp};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Cms { host, port } => cms::start_server(host, port).await?,
        Command::Smtp {
            host,
            port,
            behavior,
        } => smtp::start_server(host, port, behavior).await?,
        Command::Completion { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                env!("CARGO_BIN_NAME"),
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the cms testing server
    Cms {
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,
        #[arg(long, default_value = "8001")]
        port: u16,
    },
    /// Start the smtp testing server
    Smtp {
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,
        #[arg(long, default_value = "2525")]
        port: u16,
        /// How to react to delivery attempts
        #[arg(long, value_enum, default_value_t)]
        behavior: smtp::SmtpBehavior,
    },
    /// Generate shell completions
    Completion {
        /// The shell to generate completions for
        #[clap(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli() {
        Cli::command().debug_assert();
    }
}
