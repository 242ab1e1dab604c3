//! Keyword refinement of coarse sentiment labels.
//!
//! Language models tend to answer with a handful of broad labels. The ticket
//! wording is used to pick a more specific label within the same polarity.

use super::Sentiment;

const FRUSTRATION_WORDS: [&str; 6] = [
    "frustrated",
    "annoyed",
    "upset",
    "angry",
    "disappointed",
    "sad",
];
const CURIOSITY_WORDS: [&str; 4] = ["curious", "wondering", "interested", "excited"];
const GRATITUDE_WORDS: [&str; 3] = ["thank", "grateful", "appreciate"];
const CONFUSION_WORDS: [&str; 3] = ["confused", "uncertain", "not sure"];

fn mentions(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

/// Refine `base` using keywords found in the ticket text.
///
/// Negative sentiment becomes `Frustrated` when the customer names their
/// frustration; positive sentiment becomes `Curious` or `Grateful`; neutral
/// becomes `Confused`. Other labels pass through.
pub fn refine(base: Sentiment, ticket_text: &str) -> Sentiment {
    let text = ticket_text.to_lowercase();

    match base {
        Sentiment::Angry if mentions(&text, &FRUSTRATION_WORDS) => Sentiment::Frustrated,
        Sentiment::Happy | Sentiment::Curious => {
            if mentions(&text, &CURIOSITY_WORDS) {
                Sentiment::Curious
            } else if mentions(&text, &GRATITUDE_WORDS) {
                Sentiment::Grateful
            } else {
                base
            }
        }
        Sentiment::Neutral if mentions(&text, &CONFUSION_WORDS) => Sentiment::Confused,
        other => other,
    }
}
