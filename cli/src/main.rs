mod commands;
mod records;
mod terminal;

use commands::{CommandLine, Commands, audit, probe};
use terminal::print::{self, Rule};
use terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose)?;
    print::rule(Rule::Title, commands.quiet);

    let result = match commands.command {
        Commands::Audit(args) => {
            print::rule(Rule::Section("preparing site audit"), commands.quiet);
            audit::audit(args, commands.quiet).await
        }
        Commands::Probe(args) => {
            print::rule(Rule::Section("probing addresses"), commands.quiet);
            probe::probe(args, commands.quiet).await
        }
    };

    print::rule(Rule::Closing, commands.quiet);
    result
}
