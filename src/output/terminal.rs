// Colored terminal output for word scores and chat listings.

use colored::Colorize;

use crate::export::models::Chat;
use crate::words::frequency::FrequencyScores;

const BAR_WIDTH: usize = 20;

/// Display the top-scoring words of a chat as a ranked bar chart.
pub fn display_scores(scores: &FrequencyScores, limit: usize, chat_name: &str) {
    if scores.is_empty() {
        println!("No words left to score in '{chat_name}' after exclusions.");
        return;
    }

    let ranked = scores.ranked(Some(limit));
    println!(
        "\n{}",
        format!(
            "=== Most distinctive words in '{}' (top {} of {}) ===",
            chat_name,
            ranked.len(),
            scores.len()
        )
        .bold()
    );
    println!();

    let max = ranked.first().map_or(0.0, |(_, s)| *s);

    for (i, (word, score)) in ranked.iter().enumerate() {
        let filled = (bar_fraction(*score, max) * BAR_WIDTH as f64).round() as usize;
        let bar = format!(
            "[{}{}]",
            "=".repeat(filled),
            " ".repeat(BAR_WIDTH.saturating_sub(filled))
        );

        // Above 1.0 the chat uses the word more than everyone else does
        let colored_bar = if *score >= 1e6 {
            bar.bright_magenta()
        } else if *score >= 1.0 {
            bar.bright_green()
        } else {
            bar.bright_blue()
        };

        println!(
            "  {:>3}. {:<24} {} {:.3e}",
            i + 1,
            super::truncate_chars(word, 24).bold(),
            colored_bar,
            score
        );
    }
    println!();
}

/// Display every chat in the archive with its message count.
pub fn display_chat_list(chats: &[Chat]) {
    if chats.is_empty() {
        println!("No chats found in file.");
        return;
    }

    println!("\n{}", format!("=== {} chats ===", chats.len()).bold());
    println!();
    println!("  {:>4}  {:<40} {:>9}", "#".dimmed(), "Name".dimmed(), "Messages".dimmed());
    println!("  {}", "-".repeat(56).dimmed());

    for (i, chat) in chats.iter().enumerate() {
        let name = if chat.name.is_empty() {
            "(unnamed)".dimmed().to_string()
        } else {
            super::truncate_chars(&chat.name, 40)
        };
        let messages = chat.messages.iter().filter(|m| m.is_message()).count();
        println!("  {:>4}. {:<40} {:>9}", i + 1, name, messages);
    }
    println!();
}

/// Bar length for `score` relative to `max`, in 0.0..=1.0.
///
/// Log-scaled: scores of words missing from the baseline sit many orders of
/// magnitude above the rest, and a linear bar would flatten everything else.
pub fn bar_fraction(score: f64, max: f64) -> f64 {
    if max <= 0.0 || score <= 0.0 {
        return 0.0;
    }
    (score.ln_1p() / max.ln_1p()).clamp(0.0, 1.0)
}
