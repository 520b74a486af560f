mod cli;

use xmlsubst::environment::EnvironmentMap;
use xmlsubst::run::Summary;

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("XMLSUBST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    if let Err(e) = substitute(cli) {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

pub fn substitute(cli: cli::Cli) -> anyhow::Result<()> {
    let patterns = cli.input.all_patterns();

    let environment = EnvironmentMap::from_process();
    tracing::debug!(variables = environment.len(), "environment loaded");

    let options = xmlsubst::run::Options::new(patterns, cli.sections);
    let summary = xmlsubst::run::run(&options, &environment)?;

    output(&cli.output, &summary)?;
    Ok(())
}

fn output(output: &cli::OutputArgs, summary: &Summary) -> anyhow::Result<()> {
    match output.summary {
        cli::SummaryFormat::None => {}
        cli::SummaryFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), summary)?,
        cli::SummaryFormat::Json => {
            serde_json::to_writer_pretty(std::io::stdout(), summary)?;
            println!();
        }
    };

    Ok(())
}
