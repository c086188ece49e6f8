use std::path::Path;

use crate::common::{close_app, open_app, print_json, CliResult};

pub async fn run(path: &Path, json: bool) -> CliResult {
    let mut app = open_app()?;
    let summary = app.import_file(path).await?;
    if json {
        print_json(&summary)?;
    } else {
        println!(
            "Imported {} day(s) and {} task(s)",
            summary.days_added, summary.tasks_added
        );
    }
    close_app(app).await;
    Ok(())
}
