use std::path::{Path, PathBuf};

use crate::config::ConvertConfig;
use crate::convert::{convert, inspect};
use crate::error::Result;
use crate::warnings::format_warning;

/// Load the config file if one was given, defaults otherwise
fn load_config(path: Option<&Path>) -> Result<ConvertConfig> {
    match path {
        Some(path) => ConvertConfig::from_yaml_file(path),
        None => Ok(ConvertConfig::default()),
    }
}

pub fn handle_convert(
    source: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    force: bool,
    json: bool,
) -> Result<()> {
    let mut config = load_config(config.as_deref())?;
    if force {
        config.overwrite = true;
    }

    let conversion = convert(&source, output.as_deref(), &config)?;

    for warning in &conversion.stats.warnings {
        eprintln!("{}", format_warning(warning));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&conversion)?);
        return Ok(());
    }

    let stats = &conversion.stats;
    println!(
        "Converted {} notes from {} documents into {}",
        stats.notes,
        stats.documents,
        conversion.output_dir.display()
    );
    println!("  Markdown: {}", conversion.markdown_path.display());
    match &conversion.image_dir {
        Some(dir) => println!(
            "  Images:   {} ({} relocated)",
            dir.display(),
            stats.images_relocated
        ),
        None => println!("  Images:   none relocated"),
    }
    if stats.images_remote > 0 {
        println!("  {} remote images left as links", stats.images_remote);
    }
    if stats.images_skipped > 0 || stats.documents_failed > 0 {
        println!(
            "  Skipped {} images and {} documents (see warnings above)",
            stats.images_skipped, stats.documents_failed
        );
    }

    Ok(())
}

pub fn handle_check(source: PathBuf, config: Option<PathBuf>, json: bool) -> Result<()> {
    let config = load_config(config.as_deref())?;
    let survey = inspect(&source, &config)?;

    for warning in &survey.warnings {
        eprintln!("{}", format_warning(warning));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&survey)?);
        return Ok(());
    }

    for doc in &survey.documents {
        println!(
            "{}: {} note containers, {} with a valid timestamp",
            doc.path.display(),
            doc.note_containers,
            doc.dated_containers
        );
    }

    if survey.note_containers() == 0 {
        println!("No note containers found - this does not look like a flomo export.");
    } else {
        println!(
            "{} notes ready to convert from {} documents.",
            survey.dated_containers(),
            survey.documents.len()
        );
    }

    Ok(())
}
