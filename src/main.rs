use clap::Parser;
use log::LevelFilter;

use majority_runoff::Decision;

mod args;
mod election;

fn main() {
    let args = args::Args::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    match election::run_election(args.config, args.input, args.out) {
        Ok(result) if !result.has_contest() => {
            println!("no valid votes: there is no winner and no runoff");
        }
        Ok(result) => match result.decision {
            Decision::Winner(name) => println!("winner: {}", name),
            Decision::Runoff(first, second) => println!("runoff: {} vs {}", first, second),
        },
        Err(e) => {
            eprintln!("An error occured {}", e);
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("caused by: {}", cause);
                source = cause.source();
            }
            std::process::exit(1);
        }
    }
}
