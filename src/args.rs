use clap::Parser;

/// Counts the ballots of a single-seat election: a candidate with more than half of the
/// valid votes wins, otherwise the two best-placed candidates go to a runoff.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the election (contestName, sourcePath, outputPath).
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, optional) The CSV file containing the ballots. The first line is a banner, the
    /// second line the header. Setting this option overrides the sourcePath of the --config file.
    /// Without any source, a small built-in sample of ballots is counted.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the election will be written in JSON
    /// format to the given location. Setting this option overrides the outputPath of the --config file.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// If passed as an argument, will turn on verbose logging.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
