use clap::Parser;

use git_flow::cli::{self, Cli};
use git_flow::{logging, ui};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = cli::run(cli) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
