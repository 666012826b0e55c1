//! Player-facing letters about a resolved short circuit.
//!
//! Text goes through a [`Translator`] so hosts can plug in their own
//! localization. [`EnglishStrings`] is the built-in table.

use serde::{Deserialize, Serialize};

use crate::id::Position;
use crate::incident::ShortCircuitReport;
use crate::outcome::Classification;

pub const KEY_LETTER_LABEL: &str = "shortcircuit.letter_label";
pub const KEY_SUBJECT_CONDUIT: &str = "shortcircuit.subject_conduit";
pub const KEY_FULL_SURGE: &str = "shortcircuit.full_surge";
pub const KEY_PARTIAL_MITIGATION: &str = "shortcircuit.partial_mitigation";
pub const KEY_FULL_MITIGATION: &str = "shortcircuit.full_mitigation";
pub const KEY_WAS_LARGE: &str = "shortcircuit.was_large";
pub const KEY_WAS_HUGE: &str = "shortcircuit.was_huge";

/// Turns a text key plus positional arguments into display text.
pub trait Translator {
    /// The raw template for `key`, with `{0}`, `{1}`, ... placeholders.
    fn template(&self, key: &str) -> Option<&str>;

    /// Render `key` with `args`. Unknown keys render as the key itself.
    fn translate(&self, key: &str, args: &[String]) -> String {
        match self.template(key) {
            Some(template) => fill_placeholders(template, args),
            None => key.to_string(),
        }
    }
}

/// Replace `{i}` with `args[i]` in one left-to-right pass, so argument text
/// is never rescanned. Placeholders without an argument stay as-is.
pub fn fill_placeholders(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let arg = tail.find('}').and_then(|close| {
            let index: usize = tail[1..close].parse().ok()?;
            Some((args.get(index)?, close))
        });
        match arg {
            Some((value, close)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Built-in English text.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishStrings;

impl Translator for EnglishStrings {
    fn template(&self, key: &str) -> Option<&str> {
        let text = match key {
            KEY_LETTER_LABEL => "Short circuit",
            KEY_SUBJECT_CONDUIT => "an electrical conduit",
            KEY_FULL_SURGE => {
                "A short circuit in {0} released all {1} Wd stored on its power network in an explosion."
            }
            KEY_PARTIAL_MITIGATION => {
                "A short circuit in {0} released {1} Wd stored on its power network. Fuses absorbed {2} Wd and the rest exploded."
            }
            KEY_FULL_MITIGATION => {
                "A short circuit in {0} released {1} Wd stored on its power network. Fuses absorbed the entire surge."
            }
            KEY_WAS_LARGE => "The explosion was large.",
            KEY_WAS_HUGE => "The explosion was huge.",
            _ => return None,
        };
        Some(text)
    }
}

/// How urgently the player should look at a letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LetterKind {
    BadNonUrgent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Letter {
    pub label: String,
    pub text: String,
    pub kind: LetterKind,
    /// Where the camera should jump when the player opens the letter.
    pub look_target: Position,
}

/// Receives finished letters.
pub trait LetterSink {
    fn receive_letter(&mut self, letter: Letter);
}

impl LetterSink for Vec<Letter> {
    fn receive_letter(&mut self, letter: Letter) {
        self.push(letter);
    }
}

/// Energy with no decimals, as shown to the player.
pub fn format_energy(energy: f64) -> String {
    format!("{energy:.0}")
}

/// Build the letter for a resolved incident.
pub fn compose_letter<T>(report: &ShortCircuitReport, translator: &T) -> Letter
where
    T: Translator + ?Sized,
{
    let subject = translator.translate(KEY_SUBJECT_CONDUIT, &[]);
    let total = format_energy(report.total_energy_drained);

    let mut paragraphs = vec![match report.classification {
        Classification::FullSurge => translator.translate(KEY_FULL_SURGE, &[subject, total]),
        Classification::PartialMitigation => translator.translate(
            KEY_PARTIAL_MITIGATION,
            &[subject, total, format_energy(report.mitigated_amount)],
        ),
        Classification::FullMitigation => translator.translate(KEY_FULL_MITIGATION, &[subject, total]),
    }];
    if report.severity.large {
        paragraphs.push(translator.translate(KEY_WAS_LARGE, &[]));
    }
    if report.severity.huge {
        paragraphs.push(translator.translate(KEY_WAS_HUGE, &[]));
    }

    Letter {
        label: translator.translate(KEY_LETTER_LABEL, &[]),
        text: paragraphs.join("\n\n"),
        kind: LetterKind::BadNonUrgent,
        look_target: report.location,
    }
}
