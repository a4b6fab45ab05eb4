use anyhow::Context;
use colored::Colorize;
use csvfold_sdk::{CsvMerger, Dataset, GroupBy, MergeOptions, NormalizeScope};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Merge(args) => cmd_merge(args, &cli.format).await,
        Command::Show(args) => cmd_show(args, &cli.format).await,
    }
}

/// Start from the config file (or defaults) and apply flag overrides.
fn resolve_options(args: &OptionsArgs) -> anyhow::Result<MergeOptions> {
    let mut options = match &args.config {
        Some(path) => MergeOptions::load(path)
            .with_context(|| format!("loading options from {}", path.display()))?,
        None => MergeOptions::default(),
    };
    if let Some(dir) = &args.input_dir {
        options.input_dir = dir.clone();
    }
    if !args.keys.is_empty() {
        options.input_keys = args.keys.clone();
    }
    if let Some(dir) = &args.output_dir {
        options.output_dir = dir.clone();
    }
    if let Some(name) = &args.output_name {
        options.output_file_name = name.clone();
    }
    if let Some(encoding) = &args.encoding {
        options.encoding = encoding.parse()?;
    }
    Ok(options)
}

fn resolve_merge_options(args: &MergeArgs) -> anyhow::Result<MergeOptions> {
    let mut options = resolve_options(&args.options)?;
    if !args.files.is_empty() {
        options.input_file_name_list = args.files.clone();
    }
    if let Some(delimiter) = args.delimiter {
        options.column_delimiter = delimiter;
    }
    if let Some(key) = &args.group_by {
        options.group_by = Some(GroupBy::new(key.clone(), args.group_into.clone()));
    }
    if args.write {
        options.write_to_file = Some(true);
    }
    if args.replace_values {
        options.replace_values = Some(true);
    }
    if args.keys_only {
        options.normalize_scope = NormalizeScope::MatchKeys;
    }
    Ok(options)
}

async fn cmd_merge(args: MergeArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let options = resolve_merge_options(&args)?;
    let merger = CsvMerger::filesystem();
    let result = merger.merge_csv_files_to_json_array(&options).await?;
    merger.flush().await;

    match format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Text => {
            println!(
                "{} Merged {} file(s) into {} record(s)",
                "✓".green().bold(),
                options.input_file_name_list.len().to_string().bold(),
                result.len().to_string().bold()
            );
            println!("  Keys: {}", options.input_keys.join(", ").cyan());
            if let Some(group) = &options.group_by {
                println!(
                    "  Grouped by: {} → {}",
                    group.group_by_key.yellow(),
                    group.grouped_array_property.yellow()
                );
            }
            if options.writes_to_file() {
                println!("  Output: {}", options.output_path().display().to_string().blue());
            }
        }
    }
    Ok(())
}

async fn cmd_show(args: ShowArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let options = resolve_options(&args.options)?;
    let data = CsvMerger::filesystem().get_json_array(&options).await;

    match format {
        OutputFormat::Json => print_json(&data)?,
        OutputFormat::Text => {
            let path = options.output_path().display().to_string();
            if data.is_empty() {
                println!("No records in {}.", path.blue());
            } else {
                println!("{} record(s) in {}", data.len().to_string().bold(), path.blue());
                for record in &data {
                    println!("  {}", serde_json::to_string(record)?);
                }
            }
        }
    }
    Ok(())
}

fn print_json(data: &Dataset) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}
