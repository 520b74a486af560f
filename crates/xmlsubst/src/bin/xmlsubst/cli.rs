//! xmlsubst cli interface

use clap::{Parser, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Change the work directory
    ///
    /// Can be specified multiple times. Note that all
    /// paths on the way to the final path must exist.
    ///
    /// This is equivalent to running { cd <directory>; xmlsubst ... }
    #[clap(short = 'C', long = "directory")]
    pub directory: Vec<PathBuf>,

    #[clap(flatten)]
    pub input: InputArgs,

    /// Section below <configuration> whose <add> nodes are substituted
    ///
    /// Can be specified multiple times, e.g. `--section appSettings --section connectionStrings`
    #[clap(short = 's', long = "section", default_value = "appSettings")]
    pub sections: Vec<String>,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug)]
pub struct InputArgs {
    /// Glob pattern selecting files to rewrite
    pub patterns: Vec<String>,

    /// Newline separated list of glob patterns
    ///
    /// Blank lines are ignored.
    #[clap(short = 'f', long = "files", env = "INPUT_FILES")]
    pub files: Option<String>,
}

impl InputArgs {
    pub fn all_patterns(&self) -> Vec<String> {
        let mut patterns = self.patterns.clone();
        if let Some(files) = &self.files {
            patterns.extend(xmlsubst::resolver::split_patterns(files));
        }
        patterns
    }
}

#[derive(Parser, Debug)]
pub struct OutputArgs {
    /// Print a summary of the run to stdout
    #[arg(short = 'S', long = "summary", default_value_t)]
    pub summary: SummaryFormat,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum SummaryFormat {
    #[default]
    None,
    Json,
    Yaml,
}

impl std::fmt::Display for SummaryFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryFormat::None => f.write_str("none"),
            SummaryFormat::Json => f.write_str("json"),
            SummaryFormat::Yaml => f.write_str("yaml"),
        }
    }
}
