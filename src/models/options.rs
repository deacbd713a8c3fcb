use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Declares a closed set of human-readable labels offered to the user.
macro_rules! label_set {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident, {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            /// Position in `ALL`, used as the starting cursor for pickers.
            pub fn index(self) -> usize {
                Self::ALL.iter().position(|v| *v == self).unwrap_or(0)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize(s);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| normalize(v.label()) == wanted)
                    .ok_or_else(|| {
                        let choices: Vec<&str> = Self::ALL.iter().map(|v| v.label()).collect();
                        format!(
                            "unknown {} '{}' (expected one of: {})",
                            stringify!($name).to_lowercase(),
                            s.trim(),
                            choices.join(", ")
                        )
                    })
            }
        }
    };
}

/// "Blog Post", "blog post", "blog-post" and "BLOG_POST" all compare equal.
fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

label_set! {
    /// Voice of the article.
    Tone, default = Informative, {
        Informative => "Informative",
        Persuasive => "Persuasive",
        Friendly => "Friendly",
        Formal => "Formal",
        Humorous => "Humorous",
        Analytical => "Analytical",
        Critical => "Critical",
        Objective => "Objective",
        Subjective => "Subjective",
        Inspirational => "Inspirational",
        Technical => "Technical",
        Poetic => "Poetic",
        Narrative => "Narrative",
        Journalistic => "Journalistic",
    }
}

label_set! {
    /// Stance the writer takes towards the topic.
    Attitude, default = Neutral, {
        Neutral => "Neutral",
        Optimistic => "Optimistic",
        Pessimistic => "Pessimistic",
        Enthusiastic => "Enthusiastic",
        Skeptical => "Skeptical",
        Authoritative => "Authoritative",
        Cautious => "Cautious",
        Hopeful => "Hopeful",
        Empathetic => "Empathetic",
        Doubtful => "Doubtful",
    }
}

label_set! {
    /// Writing style / format of the article.
    Style, default = Conversational, {
        Academic => "Academic",
        Conversational => "Conversational",
        Technical => "Technical",
        BlogPost => "Blog Post",
        Scientific => "Scientific",
        Literary => "Literary",
        Marketing => "Marketing",
        Instructional => "Instructional",
        Storytelling => "Storytelling",
        Debate => "Debate",
        Expository => "Expository",
        Descriptive => "Descriptive",
    }
}
