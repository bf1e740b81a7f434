use anyhow::Result;
use diff_desc::{RowKind, RunCategory, SourceOptions};

fn main() -> Result<()> {
    // Two sample texts to compare
    let text1 = "This is the first line.\nHere is the second line.\nAnd the third line.";
    let text2 = "This is the first line.\nHere is the 2nd line.\nAnd the third line.\nPlus a new fourth line.";

    let options = SourceOptions::default();

    // The tagged stream the descriptor is built from
    println!("Tagged stream:");
    print!("{}", options.ndiff(text1, text2));

    let desc = options.describe(text1, text2)?;
    let stats = desc.stats();

    // Print diff statistics
    println!("\nDiff statistics:");
    println!("  Rows: {}", stats.rows);
    println!("  Regions: {}", stats.regions);
    println!("  Added lines: {}", stats.added);
    println!("  Deleted lines: {}", stats.deleted);
    println!("  Changed lines: {}", stats.changed);
    println!("  Unchanged lines: {}", stats.unchanged);

    // Side by side, with colored runs
    println!("\nSide by side:");
    for row in desc.rows() {
        let marker = match row.kind() {
            RowKind::Unchanged => ' ',
            RowKind::Added => '+',
            RowKind::Deleted => '-',
            RowKind::Changed => '~',
        };
        println!(
            "{marker} {:<40} | {}",
            paint(row.base),
            paint(row.modified)
        );
    }

    Ok(())
}

fn paint(line: &diff_desc::Line) -> String {
    if line.is_placeholder() {
        return "\x1b[90m.\x1b[0m".to_string();
    }

    line.runs()
        .iter()
        .map(|run| {
            let text = line.run_text(run);
            match run.category {
                RunCategory::Unchanged => text.to_string(),
                RunCategory::Added => format!("\x1b[32m{text}\x1b[0m"),
                RunCategory::Deleted => format!("\x1b[31m{text}\x1b[0m"),
                RunCategory::Changed => format!("\x1b[33m{text}\x1b[0m"),
            }
        })
        .collect()
}
