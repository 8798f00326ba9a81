use std::io;

use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, since: usize, format: &OutputFormat) -> Result<()> {
    let log = app.store.events();

    match format {
        OutputFormat::Json => {
            log.write_jsonl(since, io::stdout().lock())?;
        }
        OutputFormat::Plain => {
            let events = log.since(since);
            if events.is_empty() {
                println!("No events.");
                return Ok(());
            }

            for (offset, event) in events.iter().enumerate() {
                println!(
                    "{:>5}  {}  {:<16} {:>6}  {}",
                    since + offset,
                    event.timestamp().format("%Y-%m-%d %H:%M:%S"),
                    event.name(),
                    event.subject_id(),
                    event.owner()
                );
            }
        }
    }
    Ok(())
}
