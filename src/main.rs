use chebpe::Cli;
use clap::Parser;
use log::info;

fn main() {
    env_logger::init();
    info!("ChebPE starting up");
    let cli = Cli::parse();
    let result = cli.run();
    if let Err(err) = result {
        eprintln!("ERROR: {err:#}");
        std::process::exit(1);
    }
}
