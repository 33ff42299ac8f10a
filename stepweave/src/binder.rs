//! Step binder
//!
//! Greedy, in declaration order: each step takes the highest-scoring match nobody has taken
//! yet. Scores combine textual similarity with a positional term that favors matches further
//! down the document than the previous binding. A step whose best score is under
//! [`MIN_BINDING_SCORE`] stays unmatched and is anchored where the previous binding ended.

use crate::matcher::ContentMatch;
use crate::step::Step;
use log::debug;

/// Scores below this never bind
pub const MIN_BINDING_SCORE: f64 = 0.3;
/// Added when a candidate starts after the previous binding's end
pub const PROGRESS_BONUS: f64 = 0.2;
/// Subtracted when a candidate does not
pub const OUT_OF_ORDER_PENALTY: f64 = 0.1;

const EXACT: f64 = 1.0;
const CONTAINED: f64 = 0.8;
const WORD_OVERLAP: f64 = 0.5;
const SAME_ACTION: f64 = 0.3;

/// Outcome of binding one step
#[derive(Debug, Clone, PartialEq)]
pub enum Binding<'m> {
    Matched {
        content: &'m ContentMatch,
        /// Raw score, positional adjustment included; may exceed 1.0
        score: f64,
    },
    Unmatched {
        best_score: f64,
        suggested_offset: usize,
    },
}

/// A step with its binding
#[derive(Debug, Clone, PartialEq)]
pub struct BoundStep<'s, 'm> {
    pub step: &'s Step,
    pub index: usize,
    pub binding: Binding<'m>,
}

impl<'s, 'm> BoundStep<'s, 'm> {
    pub fn is_unmatched(&self) -> bool {
        matches!(self.binding, Binding::Unmatched { .. })
    }

    pub fn content(&self) -> Option<&'m ContentMatch> {
        match self.binding {
            Binding::Matched { content, .. } => Some(content),
            Binding::Unmatched { .. } => None,
        }
    }

    /// Score clamped to [0, 1]
    pub fn confidence(&self) -> f64 {
        let raw = match self.binding {
            Binding::Matched { score, .. } => score,
            Binding::Unmatched { best_score, .. } => best_score,
        };
        raw.clamp(0.0, 1.0)
    }

    /// Where content for this step begins: match start, or the suggested offset
    pub fn start_offset(&self) -> usize {
        match self.binding {
            Binding::Matched { content, .. } => content.start,
            Binding::Unmatched {
                suggested_offset, ..
            } => suggested_offset,
        }
    }

    /// Where content for this step ends: match end, or the suggested offset
    pub fn end_offset(&self) -> usize {
        match self.binding {
            Binding::Matched { content, .. } => content.end,
            Binding::Unmatched {
                suggested_offset, ..
            } => suggested_offset,
        }
    }
}

/// Textual similarity of a step and a match, before positional adjustment
///
/// 0 when the actions differ; otherwise 1.0 for equal text, 0.8 when one contains the other,
/// half the shared-word ratio when words overlap, and 0.3 for same action with nothing in
/// common (or a step without comparable text).
pub fn similarity(step: &Step, content: &ContentMatch) -> f64 {
    let (Some(action), Some(implied)) = (step.action_name(), content.action()) else {
        return 0.0;
    };
    if action != implied {
        return 0.0;
    }

    let Some(step_text) = step.comparable_text() else {
        return SAME_ACTION;
    };
    let match_text = content.value();

    if step_text == match_text {
        return EXACT;
    }
    if step_text.contains(match_text) || match_text.contains(step_text) {
        return CONTAINED;
    }

    let step_lower = step_text.to_lowercase();
    let match_lower = match_text.to_lowercase();
    let step_words: Vec<&str> = step_lower.split_whitespace().collect();
    let match_words: Vec<&str> = match_lower.split_whitespace().collect();
    let shared = step_words
        .iter()
        .filter(|word| match_words.contains(word))
        .count();

    if shared > 0 {
        let longest = step_words.len().max(match_words.len());
        WORD_OVERLAP * (shared as f64 / longest as f64)
    } else {
        SAME_ACTION
    }
}

/// Bind `steps` to `matches`
///
/// Each match is used at most once. Ties go to the earliest match.
pub fn bind_steps<'s, 'm>(steps: &'s [Step], matches: &'m [ContentMatch]) -> Vec<BoundStep<'s, 'm>> {
    let mut used = vec![false; matches.len()];
    let mut previous_end: Option<usize> = None;
    let mut bound = Vec::with_capacity(steps.len());

    for (index, step) in steps.iter().enumerate() {
        let mut best: Option<usize> = None;
        let mut best_score = 0.0;

        for (candidate, content) in matches.iter().enumerate() {
            if used[candidate] {
                continue;
            }
            let mut score = similarity(step, content);
            if index > 0 {
                match previous_end {
                    Some(end) if content.start <= end => score -= OUT_OF_ORDER_PENALTY,
                    _ => score += PROGRESS_BONUS,
                }
            }
            if score > best_score {
                best = Some(candidate);
                best_score = score;
            }
        }

        let binding = match best {
            Some(candidate) if best_score >= MIN_BINDING_SCORE => {
                let content = &matches[candidate];
                used[candidate] = true;
                previous_end = Some(content.end);
                debug!(
                    "step {index} bound to {} at line {} (score {best_score:.2})",
                    content.pattern_name, content.line
                );
                Binding::Matched {
                    content,
                    score: best_score,
                }
            }
            _ => {
                debug!("step {index} unmatched (best score {best_score:.2})");
                Binding::Unmatched {
                    best_score,
                    suggested_offset: previous_end.unwrap_or(0),
                }
            }
        };

        bound.push(BoundStep {
            step,
            index,
            binding,
        });
    }

    bound
}
