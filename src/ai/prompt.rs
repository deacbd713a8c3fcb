use crate::models::{word_count, ArticleRequest};

/// A prompt split into system instructions and user content.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: Option<String>,
    pub user: String,
}

impl Prompt {
    /// Single-string form for providers without a system channel.
    pub fn flatten(&self) -> String {
        match &self.system {
            Some(system) => format!("{}\n\n{}", system, self.user),
            None => self.user.clone(),
        }
    }
}

/// Builds the prompt for `attempt` (1-based).
///
/// Attempt 1 asks for a fresh article. Later attempts hand back the whole
/// `current_text` and ask for it to be expanded in place, so the response can
/// replace the previous draft outright.
pub fn build_prompt(request: &ArticleRequest, current_text: &str, attempt: u32) -> Prompt {
    let mut parts = Vec::new();

    if request.has_reference_material() {
        parts.push(reference_block(request.reference_material()));
    }

    if attempt <= 1 {
        parts.push(initial_instructions(request));
    } else {
        parts.push(expansion_instructions(request, current_text));
    }

    Prompt {
        system: Some(system_instructions(request)),
        user: parts.join("\n\n"),
    }
}

fn voice(request: &ArticleRequest) -> String {
    match request.attitude() {
        Some(attitude) => format!(
            "Tone: {}\nAttitude: {}\nWriting style: {}",
            request.tone(), attitude, request.style()
        ),
        None => format!("Tone: {}\nWriting style: {}", request.tone(), request.style()),
    }
}

fn system_instructions(request: &ArticleRequest) -> String {
    format!(
        r#"You are a highly skilled writer specializing in long-form content.
Your task is to produce a comprehensive, detailed and high-quality article.
Keep the following voice consistent from the first line to the last:
{}
Structure the article with clear headings, subheadings and a logical flow.
Return only the article itself, formatted as Markdown."#,
        voice(request)
    )
}

fn reference_block(material: &str) -> String {
    format!(
        r#"Here is some reference material. Integrate the relevant information naturally; synthesize and analyze it rather than copying it.

Reference Material:
{}"#,
        material.trim()
    )
}

fn initial_instructions(request: &ArticleRequest) -> String {
    format!(
        r#"Write a detailed and comprehensive long-form article on the topic of "{topic}".
The article must be at least {min} words long.
It should include an introduction, multiple distinct body sections with appropriate headings, and a strong conclusion.
Provide in-depth analysis, specific examples and relevant details to fully explore the topic."#,
        topic = request.topic(),
        min = request.min_word_count(),
    )
}

fn expansion_instructions(request: &ArticleRequest, current_text: &str) -> String {
    format!(
        r#"The following article on "{topic}" is currently {current} words long.
Expand it to reach a total length of at least {min} words.
Do NOT rewrite the entire article from scratch. Add more detail, deeper analysis, additional examples or further relevant sub-sections to the existing content.
Keep the original voice:
{voice}
Return the complete expanded article, not only the new parts.

Existing article to expand:
{text}"#,
        topic = request.topic(),
        current = word_count(current_text),
        min = request.min_word_count(),
        voice = voice(request),
        text = current_text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attitude, Style, Tone};

    fn request(reference: &str) -> ArticleRequest {
        ArticleRequest::builder("Renewable Energy")
            .tone(Tone::Informative)
            .style(Style::Academic)
            .reference_material(reference)
            .build()
            .unwrap()
    }

    #[test]
    fn initial_prompt_names_topic_and_target() {
        let prompt = build_prompt(&request(""), "", 1);
        assert!(prompt.user.contains("\"Renewable Energy\""));
        assert!(prompt.user.contains("at least 1800 words"));
        assert!(!prompt.user.contains("Reference Material:"));
        let system = prompt.system.unwrap();
        assert!(system.contains("Tone: Informative"));
        assert!(system.contains("Writing style: Academic"));
        assert!(!system.contains("Attitude:"));
    }

    #[test]
    fn expansion_prompt_carries_full_draft_and_count() {
        let draft = "Solar panels convert light.\n\n## Wind\nTurbines spin.";
        let prompt = build_prompt(&request(""), draft, 2);
        assert!(prompt.user.contains(draft));
        assert!(prompt.user.contains("currently 8 words long"));
        assert!(prompt.user.contains("Do NOT rewrite"));
    }

    #[test]
    fn reference_material_is_in_every_attempt() {
        let reference = "--- Start of Reference Document: notes.txt ---\nGrid storage matters.";
        for attempt in 1..=3 {
            let prompt = build_prompt(&request(reference), "draft text", attempt);
            assert!(prompt.user.contains("Grid storage matters."), "attempt {attempt}");
        }
    }

    #[test]
    fn attitude_is_included_when_present() {
        let req = ArticleRequest::builder("Renewable Energy")
            .attitude(Some(Attitude::Hopeful))
            .build()
            .unwrap();
        let prompt = build_prompt(&req, "draft", 2);
        assert!(prompt.system.as_deref().unwrap().contains("Attitude: Hopeful"));
        assert!(prompt.user.contains("Attitude: Hopeful"));
    }

    #[test]
    fn flatten_puts_system_first() {
        let prompt = Prompt {
            system: Some("sys".into()),
            user: "usr".into(),
        };
        assert_eq!(prompt.flatten(), "sys\n\nusr");
    }
}
