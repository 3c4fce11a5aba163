use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rulesmith::{artifact_file_name, compile, ArtifactKind, RuleDoc, RulesmithError};

#[derive(Debug, Parser)]
#[command(name = "rulesmith", version, about = "Compile rule IR documents into Drools artifacts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compile a JSON rule document into a DRL or GDST artifact.
    Compile {
        /// Path to the input JSON document.
        input: PathBuf,
        /// Output file, or a directory to name the artifact after the rule.
        output: PathBuf,
        /// Force the artifact format instead of inferring it.
        #[arg(long = "type", value_enum)]
        kind: Option<KindArg>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Drl,
    Gdst,
}

impl From<KindArg> for ArtifactKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Drl => ArtifactKind::Drl,
            KindArg::Gdst => ArtifactKind::Gdst,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), RulesmithError> {
    match cli.command {
        Command::Compile {
            input,
            output,
            kind,
        } => {
            let text = fs::read_to_string(&input)?;
            let doc: RuleDoc = serde_json::from_str(&text)?;
            let (kind, artifact) = compile(&doc, kind.map(ArtifactKind::from))?;
            let path = if output.is_dir() {
                output.join(artifact_file_name(&doc, kind))
            } else {
                output
            };
            fs::write(&path, artifact)?;
            info!(path = %path.display(), format = %kind, "wrote artifact");
            Ok(())
        }
    }
}
