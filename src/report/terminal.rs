use std::path::Path;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::model::artifact::TrainingMetadata;
use crate::models::{Label, Prediction, RiskAssessment, ScoredRecord, Severity, TermMatch};

const METER_WIDTH: usize = 20;

/// Render the verdict and risk explanation for a single email.
pub fn render_prediction(raw: &str, prediction: &Prediction, risk: &RiskAssessment, quiet: bool) {
    let verdict = verdict_label(prediction.label);

    if quiet {
        println!(
            "{}  {:.2}%  risk {:.0}% ({})",
            verdict,
            prediction.confidence * 100.0,
            risk.risk_percent,
            risk.match_count
        );
        return;
    }

    println!(
        "\n {} v{}\n",
        "spam-detector".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        " Prediction : {} ({:.2}%)",
        verdict,
        prediction.confidence * 100.0
    );
    println!(
        " Suspicious : {} word(s)",
        risk.match_count.to_string().bold()
    );
    println!(
        " Risk       : {} {:>3.0}% {}",
        risk_meter(risk.risk_percent, risk.severity),
        risk.risk_percent,
        severity_label(risk.severity)
    );

    if !raw.is_empty() {
        println!("\n {}\n", "Highlighted suspicious words:".bold());
        for line in colorize_matches(raw, &risk.matches).lines() {
            println!("   {}", line);
        }
    }
    println!();
}

/// Render a table of scored batch records with a summary line.
///
/// Only spam or medium/high risk records are listed unless `verbose`.
pub fn render_batch(records: &[ScoredRecord], path: &Path, verbose: bool, quiet: bool) -> Result<()> {
    let total = records.len();
    let spam_count = records.iter().filter(|r| r.prediction.label == Label::Spam).count();
    let high_count = records.iter().filter(|r| r.risk.severity == Severity::High).count();

    if quiet {
        println!(
            "Total: {}  Spam: {}  Safe: {}  High risk: {}",
            total,
            spam_count.to_string().red(),
            (total - spam_count).to_string().green(),
            high_count.to_string().red(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "spam-detector".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Scored: {}\n", path.display());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Text").add_attribute(Attribute::Bold),
            Cell::new("Prediction").add_attribute(Attribute::Bold),
            Cell::new("Confidence").add_attribute(Attribute::Bold),
            Cell::new("Matches").add_attribute(Attribute::Bold),
            Cell::new("Risk").add_attribute(Attribute::Bold),
        ]);

    let mut shown = 0;
    for (i, record) in records.iter().enumerate() {
        let flagged = record.prediction.label == Label::Spam
            || record.risk.severity != Severity::Low;
        if !verbose && !flagged {
            continue;
        }
        shown += 1;

        let (prediction_str, prediction_color) = match record.prediction.label {
            Label::Spam => ("✗ spam", Color::Red),
            Label::Safe => ("✓ safe", Color::Green),
        };

        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(preview(&record.text, 60)),
            Cell::new(prediction_str)
                .fg(prediction_color)
                .set_alignment(CellAlignment::Center),
            Cell::new(format!("{:.1}%", record.prediction.confidence * 100.0))
                .set_alignment(CellAlignment::Right),
            Cell::new(record.risk.match_count).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.0}% {}", record.risk.risk_percent, record.risk.severity))
                .fg(severity_color(record.risk.severity)),
        ]);
    }

    if shown > 0 {
        println!("{}", table);
    } else {
        println!(" {} Nothing flagged.", "✓".green());
    }

    println!(
        "\n Total: {}  {} Spam: {}  {} Safe: {}  {} High risk: {}\n",
        total,
        "✗".red(),
        spam_count,
        "✓".green(),
        total - spam_count,
        "⚠".yellow(),
        high_count
    );

    Ok(())
}

/// Render the held-out evaluation of a freshly trained model.
pub fn render_training(metadata: &TrainingMetadata, model_path: &Path, quiet: bool) {
    let eval = &metadata.evaluation;

    if quiet {
        println!("accuracy {:.4}  saved {}", eval.accuracy, model_path.display());
        return;
    }

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48}  │", "TRAINING SUMMARY".bold());
    println!(
        " │  {:<48}  │",
        format!("Train / held-out : {} / {}", metadata.train_size, metadata.test_size)
    );
    println!(
        " │  {:<48}  │",
        format!("Seed / alpha     : {} / {}", metadata.seed, metadata.alpha)
    );
    println!(
        " │  {:<48}  │",
        format!("Accuracy         : {:.2}%", eval.accuracy * 100.0)
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Class").add_attribute(Attribute::Bold),
            Cell::new("Precision").add_attribute(Attribute::Bold),
            Cell::new("Recall").add_attribute(Attribute::Bold),
            Cell::new("Support").add_attribute(Attribute::Bold),
        ]);

    for class in &eval.classes {
        table.add_row(vec![
            Cell::new(class.label.to_string()),
            Cell::new(format!("{:.3}", class.precision)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.3}", class.recall)).set_alignment(CellAlignment::Right),
            Cell::new(class.support).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{}", table);
    println!("\n {} Model saved to {}\n", "✓".green(), model_path.display());
}

fn verdict_label(label: Label) -> ColoredString {
    match label {
        Label::Spam => "⚠ SPAM".red().bold(),
        Label::Safe => "✓ SAFE".green().bold(),
    }
}

fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Low => "low".green(),
        Severity::Medium => "medium".yellow(),
        Severity::High => "high".red().bold(),
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Low => Color::Green,
        Severity::Medium => Color::Yellow,
        Severity::High => Color::Red,
    }
}

fn risk_meter(risk_percent: f64, severity: Severity) -> String {
    let filled = ((risk_percent / 100.0) * METER_WIDTH as f64).round() as usize;
    let filled = filled.min(METER_WIDTH);
    let bar = "█".repeat(filled);
    let bar = match severity {
        Severity::Low => bar.green(),
        Severity::Medium => bar.yellow(),
        Severity::High => bar.red(),
    };
    format!("[{}{}]", bar, "░".repeat(METER_WIDTH - filled))
}

/// Raw text with matched spans in bold yellow; spans are byte ranges sorted by start.
fn colorize_matches(raw: &str, matches: &[TermMatch]) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut cursor = 0;
    for m in matches {
        out.push_str(&raw[cursor..m.start]);
        out.push_str(&raw[m.start..m.end].yellow().bold().to_string());
        cursor = m.end;
    }
    out.push_str(&raw[cursor..]);
    out
}

/// First `max` characters of `text` on one line.
fn preview(text: &str, max: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        flat
    } else {
        let cut: String = flat.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
