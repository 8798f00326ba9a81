use anyhow::Result;

use recall_lib::snapshot;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let meta = if app.snapshot_path.exists() {
        Some(snapshot::read_meta(&app.snapshot_path)?)
    } else {
        None
    };
    let consistency = app.store.verify();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "snapshot": app.snapshot_path.display().to_string(),
                "meta": meta,
                "principal": app.principal.as_str(),
                "recordCount": app.store.record_count(),
                "flashcardCount": app.store.flashcard_count(),
                "eventCount": app.store.events().len(),
                "consistent": consistency.is_ok(),
                "problem": consistency.as_ref().err(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Snapshot:   {}", app.snapshot_path.display());
            match &meta {
                Some(meta) => {
                    println!("Saved:      {}", meta.ts.format("%Y-%m-%d %H:%M:%S"));
                    println!("Hash:       {}", meta.content_hash);
                }
                None => println!("Saved:      never"),
            }
            println!("Acting as:  {}", app.principal);
            println!("Records:    {}", app.store.record_count());
            println!("Flashcards: {}", app.store.flashcard_count());
            println!("Events:     {}", app.store.events().len());
            match consistency {
                Ok(()) => println!("Indexes:    consistent"),
                Err(problem) => println!("Indexes:    INCONSISTENT ({})", problem),
            }
        }
    }
    Ok(())
}
