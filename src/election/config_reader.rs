use crate::election::*;

use serde::{Deserialize, Serialize};

/// The options recognized in an election configuration file.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElectionConfig {
    #[serde(rename = "contestName")]
    pub contest_name: Option<String>,
    /// The ballot file. When absent, the built-in sample ballots are used.
    #[serde(rename = "sourcePath")]
    pub source_path: Option<String>,
    /// Where to write the JSON summary: a file path or `stdout`.
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

impl ElectionConfig {
    pub fn with_source(source_path: Option<String>) -> ElectionConfig {
        ElectionConfig {
            source_path,
            ..ElectionConfig::default()
        }
    }

    pub fn source(&self) -> BallotSource {
        match &self.source_path {
            Some(p) => BallotSource::Csv(PathBuf::from(p)),
            None => BallotSource::Sample,
        }
    }
}

/// Reads a configuration file. A relative `sourcePath` is resolved against
/// the directory of the configuration file.
pub fn read_config(path: &str) -> ElectionResult<ElectionConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read content: {:?}", contents);
    let mut config: ElectionConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;

    if let Some(source) = config.source_path.clone() {
        if Path::new(&source).is_relative() {
            let root_p = Path::new(path)
                .parent()
                .context(MissingParentDirSnafu { path })?;
            config.source_path = Some(root_p.join(&source).display().to_string());
        }
    }
    Ok(config)
}
