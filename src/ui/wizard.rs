use inquire::{Select, Text};

use crate::error::Result;
use crate::models::{Attitude, Style, Tone};

const NO_ATTITUDE: &str = "(none)";

/// Answers gathered from the interactive prompts.
#[derive(Debug, Clone)]
pub struct ArticleDetails {
    pub topic: String,
    pub tone: Tone,
    pub attitude: Option<Attitude>,
    pub style: Style,
}

/// Asks for whatever `preset` does not already provide.
pub fn ask_article_details(preset: ArticleDetails, ask_choices: bool) -> Result<ArticleDetails> {
    eprintln!("Please provide the details for your article:");

    let mut topic = preset.topic.trim().to_string();
    while topic.is_empty() {
        topic = Text::new("Article topic:")
            .with_placeholder("E.g., The Impact of Quantum Computing on Cybersecurity")
            .prompt()?
            .trim()
            .to_string();
        if topic.is_empty() {
            eprintln!("Article topic cannot be empty. Please provide a topic.");
        }
    }

    if !ask_choices {
        return Ok(ArticleDetails { topic, ..preset });
    }

    let tone = Select::new("Tone:", Tone::ALL.to_vec())
        .with_starting_cursor(preset.tone.index())
        .prompt()?;

    let attitude_options: Vec<&str> = std::iter::once(NO_ATTITUDE)
        .chain(Attitude::ALL.iter().map(|a| a.label()))
        .collect();
    let cursor = preset.attitude.map(|a| a.index() + 1).unwrap_or(0);
    let attitude = Select::new("Attitude:", attitude_options)
        .with_starting_cursor(cursor)
        .prompt()?;
    let attitude = parse_attitude_choice(attitude);

    let style = Select::new("Writing style:", Style::ALL.to_vec())
        .with_starting_cursor(preset.style.index())
        .prompt()?;

    Ok(ArticleDetails {
        topic,
        tone,
        attitude,
        style,
    })
}

fn parse_attitude_choice(choice: &str) -> Option<Attitude> {
    if choice == NO_ATTITUDE {
        None
    } else {
        choice.parse().ok()
    }
}
