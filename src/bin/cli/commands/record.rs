use anyhow::{Context, Result};

use recall_lib::{Principal, Record, RecordId};

use crate::app::App;
use crate::OutputFormat;

fn record_json(record: &Record) -> serde_json::Value {
    serde_json::json!({
        "recordId": record.record_id,
        "owner": record.owner.as_str(),
        "title": record.title,
        "description": record.description,
        "timestamp": record.timestamp.to_rfc3339(),
    })
}

pub fn run_add(app: &mut App, title: String, description: String, format: &OutputFormat) -> Result<()> {
    let principal = app.principal.clone();
    let id = app
        .store
        .add_record(&principal, title, description)
        .context("Failed to add record")?;
    app.save()?;

    let record = app.store.get_record(id)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record_json(record))?),
        OutputFormat::Plain => println!("Added record {}: \"{}\"", id, record.title),
    }
    Ok(())
}

pub fn run_update(
    app: &mut App,
    id: RecordId,
    title: String,
    description: String,
    format: &OutputFormat,
) -> Result<()> {
    let principal = app.principal.clone();
    app.store
        .update_record(&principal, id, title, description)
        .with_context(|| format!("Failed to update record {}", id))?;
    app.save()?;

    let record = app.store.get_record(id)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record_json(record))?),
        OutputFormat::Plain => println!("Updated record {}: \"{}\"", id, record.title),
    }
    Ok(())
}

pub fn run_remove(app: &mut App, id: RecordId, format: &OutputFormat) -> Result<()> {
    let principal = app.principal.clone();
    let cascaded = if app.store.has_flashcards_under(id, &principal) {
        app.store
            .get_all_flashcards_from_record(id)?
            .iter()
            .filter(|card| card.owner == principal)
            .count()
    } else {
        0
    };
    app.store
        .remove_record(&principal, id)
        .with_context(|| format!("Failed to remove record {}", id))?;
    app.save()?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "recordId": id, "flashcardsRemoved": cascaded });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Removed record {}", id);
            if cascaded > 0 {
                println!("  Also removed {} of your flashcards", cascaded);
            }
        }
    }
    Ok(())
}

pub fn run_list(app: &App, owner: Option<&str>, all: bool, format: &OutputFormat) -> Result<()> {
    let records = if all {
        app.store.get_all_records()
    } else {
        let owner = owner.map(Principal::from).unwrap_or_else(|| app.principal.clone());
        app.store.get_all_records_from_address(&owner)
    };

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = records.iter().map(record_json).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if records.is_empty() {
                println!("No records.");
                return Ok(());
            }

            let title_width = records.iter().map(|r| r.title.len()).max().unwrap_or(5).clamp(5, 40);
            println!("{:>6} {:<tw$} {:<12} {}", "ID", "Title", "Owner", "Modified", tw = title_width);
            println!(
                "{} {} {} {}",
                "\u{2500}".repeat(6),
                "\u{2500}".repeat(title_width),
                "\u{2500}".repeat(12),
                "\u{2500}".repeat(16)
            );

            for record in &records {
                let title = if record.title.chars().count() > title_width {
                    let cut: String = record.title.chars().take(title_width - 3).collect();
                    format!("{}...", cut)
                } else {
                    record.title.clone()
                };
                println!(
                    "{:>6} {:<tw$} {:<12} {}",
                    record.record_id,
                    title,
                    record.owner.to_string(),
                    record.timestamp.format("%Y-%m-%d %H:%M"),
                    tw = title_width
                );
            }

            println!("\n{} records", records.len());
        }
    }
    Ok(())
}

pub fn run_count(app: &App, format: &OutputFormat) -> Result<()> {
    let count = app.store.record_count();
    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "recordCount": count })),
        OutputFormat::Plain => println!("{}", count),
    }
    Ok(())
}
