//! craftplan CLI — recipe expansion and bill-of-materials planning.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "craftplan",
    version,
    about = "Recipe expansion and bill-of-materials planning — tiered catalogues, cycle-safe breakdown trees"
)]
struct Cli {
    #[command(subcommand)]
    command: craftplan::cli::Commands,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = craftplan::cli::dispatch(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
