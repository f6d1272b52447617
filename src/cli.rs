use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Multi-source catalog harvester
#[derive(Parser)]
#[command(name = "catalog-harvester", version)]
#[command(about = "Collect catalog listings into one table and publish rows from it", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Walk both catalogs and write the consolidated CSV
    Harvest {
        /// Config file (TOML or JSON); defaults to the per-user config
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// CSV output path; overrides `pipeline.output_path`
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not walk the server-rendered catalog
        #[arg(long)]
        skip_static: bool,

        /// Do not walk the browser-rendered catalog
        #[arg(long)]
        skip_browser: bool,
    },
    /// Publish one row of a harvested CSV
    Post {
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// CSV input path; overrides `publishing.input_path`
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Zero-based row to publish
        #[arg(long, conflicts_with = "random")]
        row: Option<usize>,

        /// Publish a random row
        #[arg(long)]
        random: bool,
    },
    /// Write the default configuration to a file
    InitConfig {
        /// Target file; defaults to the per-user config location
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn row_and_random_conflict() {
        let parsed = Cli::try_parse_from(["catalog-harvester", "post", "--row", "2", "--random"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn harvest_flags_parse() {
        let cli = Cli::try_parse_from([
            "catalog-harvester",
            "harvest",
            "--output",
            "books.csv",
            "--skip-browser",
        ])
        .unwrap();
        match cli.command {
            Commands::Harvest {
                output,
                skip_static,
                skip_browser,
                ..
            } => {
                assert_eq!(output, Some(PathBuf::from("books.csv")));
                assert!(!skip_static);
                assert!(skip_browser);
            }
            _ => panic!("expected harvest"),
        }
    }
}
