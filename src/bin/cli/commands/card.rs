use anyhow::{Context, Result};

use recall_lib::{Flashcard, FlashcardId, RecordId};

use crate::app::App;
use crate::OutputFormat;

fn card_json(card: &Flashcard) -> serde_json::Value {
    serde_json::json!({
        "flashcardId": card.flashcard_id,
        "recordId": card.corresponding_record_id,
        "owner": card.owner.as_str(),
        "question": card.question,
        "answer": card.answer,
        "timestamp": card.timestamp.to_rfc3339(),
    })
}

pub fn run_add(
    app: &mut App,
    record_id: RecordId,
    question: String,
    answer: String,
    format: &OutputFormat,
) -> Result<()> {
    let principal = app.principal.clone();
    let id = app
        .store
        .add_flashcard(&principal, record_id, question, answer)
        .with_context(|| format!("Failed to add flashcard to record {}", record_id))?;
    app.save()?;

    let card = app.store.get_flashcard(id)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card_json(card))?),
        OutputFormat::Plain => println!("Added flashcard {} under record {}", id, record_id),
    }
    Ok(())
}

pub fn run_update(
    app: &mut App,
    id: FlashcardId,
    question: String,
    answer: String,
    format: &OutputFormat,
) -> Result<()> {
    let principal = app.principal.clone();
    app.store
        .update_flashcard(&principal, id, question, answer)
        .with_context(|| format!("Failed to update flashcard {}", id))?;
    app.save()?;

    let card = app.store.get_flashcard(id)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card_json(card))?),
        OutputFormat::Plain => println!("Updated flashcard {}", id),
    }
    Ok(())
}

pub fn run_remove(app: &mut App, id: FlashcardId, format: &OutputFormat) -> Result<()> {
    let principal = app.principal.clone();
    app.store
        .remove_flashcard(&principal, id)
        .with_context(|| format!("Failed to remove flashcard {}", id))?;
    app.save()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "flashcardId": id, "removed": true })),
        OutputFormat::Plain => println!("Removed flashcard {}", id),
    }
    Ok(())
}

pub fn run_list(app: &App, record_id: RecordId, format: &OutputFormat) -> Result<()> {
    let cards = app
        .store
        .get_all_flashcards_from_record(record_id)
        .with_context(|| format!("Failed to list flashcards of record {}", record_id))?;

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = cards.iter().map(card_json).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("No flashcards under record {}.", record_id);
                return Ok(());
            }

            for card in &cards {
                println!("[{}] {} ({})", card.flashcard_id, card.question, card.owner);
                println!("    {}", card.answer);
            }
            println!("\n{} flashcards", cards.len());
        }
    }
    Ok(())
}
