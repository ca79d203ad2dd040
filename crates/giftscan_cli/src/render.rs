use std::io::{self, Write};

use colored::Colorize;
use giftscan_core::Report;
use prettytable::{format, Cell, Row, Table};

use crate::cli::Attribute;

/// Table of report rows, first column named after the attribute.
pub fn report_table(report: &Report, attribute: Attribute) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(vec![
        Cell::new(attribute.label()),
        Cell::new("Count"),
        Cell::new("Percent"),
        Cell::new("Rarity"),
    ]));
    for entry in &report.rows {
        table.add_row(Row::new(vec![
            Cell::new(&entry.category),
            Cell::new(&entry.count.to_string()).style_spec("r"),
            Cell::new(&entry.percent_label()).style_spec("r"),
            Cell::new(&entry.rarity),
        ]));
    }
    table
}

pub fn print_table(report: &Report, attribute: Attribute, interrupted: bool) {
    println!();
    println!(
        "{}",
        " Telegram Gift Scanner - Final Results ".black().on_cyan().bold()
    );
    println!();
    let info = "INFO".cyan().bold();
    println!("{info} Checked: {} gifts", report.checked);
    println!("{info} Available: {} gifts", report.available);
    if report.failures.total() > 0 {
        println!(
            "{info} Not counted: {} (fetch {}, parse {})",
            report.failures.total(),
            report.failures.fetch,
            report.failures.parse
        );
    }
    if interrupted {
        println!(
            "{} Scan interrupted, results are partial",
            "WARNING".yellow().bold()
        );
    }
    println!();
    report_table(report, attribute).printstd();
}

pub fn print_json(report: &Report) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, report)?;
    writeln!(out)?;
    Ok(())
}
