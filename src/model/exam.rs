//! Exam answers and grading arithmetic.
//!
//! Scoring counts selected choices that are marked correct, not questions answered
//! correctly: a question with two correct choices selected adds two, and an unanswered
//! question adds nothing. The grade is that count over the number of questions in the
//! course, as a percentage.

use std::collections::BTreeSet;

use thiserror::Error;
use uuid::Uuid;

/// Prefix of the form fields carrying a selected choice id.
pub const CHOICE_FIELD_PREFIX: &str = "choice";

#[derive(Debug, Error, PartialEq)]
#[error("field `{field}` holds `{value}`, which is not a choice id")]
pub struct InvalidChoiceValue {
    pub field: String,
    pub value: String,
}

/// Choice ids selected in one exam attempt. De-duplicated, order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectedChoices(BTreeSet<Uuid>);

impl SelectedChoices {
    pub fn new<I: IntoIterator<Item = Uuid>>(ids: I) -> Self {
        Self(ids.into_iter().collect())
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.0.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.0.contains(id)
    }

    /// Ids not present in `known`, i.e. choices that are not part of the course.
    pub fn foreign_to(&self, known: &[Uuid]) -> Vec<Uuid> {
        self.0
            .iter()
            .filter(|id| !known.contains(*id))
            .copied()
            .collect()
    }
}

/// Collects every field whose name starts with `choice` and parses its value as a choice id.
/// Other fields are ignored.
pub fn extract_answers<I, K, V>(form_fields: I) -> Result<SelectedChoices, InvalidChoiceValue>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut selected = BTreeSet::new();
    for (key, value) in form_fields {
        let (key, value) = (key.as_ref(), value.as_ref());
        if !key.starts_with(CHOICE_FIELD_PREFIX) {
            continue;
        }

        let id = value.trim().parse::<Uuid>().map_err(|_| InvalidChoiceValue {
            field: key.to_string(),
            value: value.to_string(),
        })?;
        selected.insert(id);
    }

    Ok(SelectedChoices(selected))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grade {
    /// Percentage, `0.0` when the course has no questions.
    pub grade: f64,
    pub correct_answers: i64,
    pub total_questions: i64,
}

impl Grade {
    pub fn compute(correct_answers: i64, total_questions: i64) -> Self {
        let grade = if total_questions > 0 {
            100.0 * correct_answers as f64 / total_questions as f64
        } else {
            0.0
        };

        Self {
            grade,
            correct_answers,
            total_questions,
        }
    }
}
