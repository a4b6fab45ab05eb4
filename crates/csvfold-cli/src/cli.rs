use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "csvfold",
    about = "csvfold — merge CSV files into one JSON collection",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge CSV sources into one JSON array
    Merge(MergeArgs),
    /// Show a previously written result
    Show(ShowArgs),
}

/// Options shared by every command. Flags override the config file.
#[derive(Args, Default)]
pub struct OptionsArgs {
    /// TOML or JSON options file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub input_dir: Option<PathBuf>,
    /// Match key; repeat or comma-separate for several
    #[arg(short = 'k', long = "key", value_delimiter = ',')]
    pub keys: Vec<String>,
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Output file name without the .json extension
    #[arg(short = 'o', long)]
    pub output_name: Option<String>,
    #[arg(long)]
    pub encoding: Option<String>,
}

#[derive(Args)]
pub struct MergeArgs {
    #[command(flatten)]
    pub options: OptionsArgs,
    /// Source file names, in fold order
    pub files: Vec<String>,
    #[arg(short, long)]
    pub delimiter: Option<char>,
    /// Group the result by this field
    #[arg(long)]
    pub group_by: Option<String>,
    /// Name of the grouped members array
    #[arg(long, default_value = "items")]
    pub group_into: String,
    /// Write the result to <output-dir>/<output-name>.json
    #[arg(short, long)]
    pub write: bool,
    /// Overwrite the first match once instead of always appending
    #[arg(long)]
    pub replace_values: bool,
    /// Canonicalize only match keys when merging
    #[arg(long)]
    pub keys_only: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub options: OptionsArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_merge() {
        let cli = Cli::try_parse_from([
            "csvfold", "merge", "--input-dir", "in", "-k", "city,region", "a.csv", "b.csv",
        ])
        .unwrap();
        if let Command::Merge(args) = cli.command {
            assert_eq!(args.options.input_dir, Some(PathBuf::from("in")));
            assert_eq!(args.options.keys, vec!["city", "region"]);
            assert_eq!(args.files, vec!["a.csv", "b.csv"]);
            assert!(!args.write);
            assert_eq!(args.group_into, "items");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_repeated_keys() {
        let cli = Cli::try_parse_from(["csvfold", "merge", "--key", "city", "--key", "zip"]).unwrap();
        if let Command::Merge(args) = cli.command {
            assert_eq!(args.options.keys, vec!["city", "zip"]);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_merge_flags() {
        let cli = Cli::try_parse_from([
            "csvfold", "merge", "-d", ";", "--group-by", "region", "--group-into", "cities",
            "--write", "--replace-values", "--keys-only", "-o", "rates",
        ])
        .unwrap();
        if let Command::Merge(args) = cli.command {
            assert_eq!(args.delimiter, Some(';'));
            assert_eq!(args.group_by, Some("region".into()));
            assert_eq!(args.group_into, "cities");
            assert!(args.write && args.replace_values && args.keys_only);
            assert_eq!(args.options.output_name, Some("rates".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_show_with_config() {
        let cli = Cli::try_parse_from(["csvfold", "show", "-c", "opts.toml"]).unwrap();
        if let Command::Show(args) = cli.command {
            assert_eq!(args.options.config, Some(PathBuf::from("opts.toml")));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn multi_char_delimiter_rejected() {
        assert!(Cli::try_parse_from(["csvfold", "merge", "-d", "::"]).is_err());
    }

    #[test]
    fn parse_verbose_and_format() {
        let cli = Cli::try_parse_from(["csvfold", "-v", "--format", "json", "show"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}
