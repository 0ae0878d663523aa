mod questionnaire;

pub use questionnaire::{
    EpdsQuestion, ScoringDirection, EPDS_QUESTIONS, OPTION_COUNT, QUESTION_COUNT,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::EpdsThresholds;
use super::error::InvalidInput;

pub const MAX_EPDS_SCORE: u8 = 30;

/// Three-band interpretation of an EPDS score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpdsTier {
    Low,
    Possible,
    High,
}

impl EpdsTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Possible => "Possible",
            Self::High => "High",
        }
    }

    pub const fn guidance(self) -> &'static str {
        match self {
            Self::Low => "Your score indicates a low risk for postpartum depression.",
            Self::Possible => {
                "Your score indicates a possible risk for postpartum depression. Consider \
                 discussing this with your healthcare provider."
            }
            Self::High => {
                "Your score indicates a high risk for postpartum depression. We strongly \
                 recommend contacting your healthcare provider for further evaluation and support."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpdsResult {
    pub score: u8,
    pub tier: EpdsTier,
}

/// Scores a complete EPDS questionnaire against the canonical option ordering.
#[derive(Debug, Clone, Default)]
pub struct EpdsEvaluator {
    thresholds: EpdsThresholds,
}

impl EpdsEvaluator {
    pub fn new(thresholds: EpdsThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &EpdsThresholds {
        &self.thresholds
    }

    pub fn questions(&self) -> &'static [EpdsQuestion; QUESTION_COUNT] {
        &EPDS_QUESTIONS
    }

    /// `answers[i]` is the selected option index for question `i`.
    pub fn evaluate(&self, answers: &[u8]) -> Result<EpdsResult, InvalidInput> {
        if answers.len() != QUESTION_COUNT {
            return Err(InvalidInput::AnswerCount {
                expected: QUESTION_COUNT,
                actual: answers.len(),
            });
        }

        let mut score = 0u8;
        for (question_index, (question, option)) in EPDS_QUESTIONS.iter().zip(answers).enumerate()
        {
            if usize::from(*option) >= OPTION_COUNT {
                return Err(InvalidInput::OptionOutOfRange {
                    question: question_index,
                    option: i64::from(*option),
                });
            }
            score += question.contribution(*option);
        }

        let tier = self.thresholds.classify(score);
        debug!(score, tier = tier.label(), "epds questionnaire scored");
        Ok(EpdsResult { score, tier })
    }

    /// Same as [`evaluate`](Self::evaluate) but with the displayed option labels.
    pub fn evaluate_labels<S: AsRef<str>>(&self, labels: &[S]) -> Result<EpdsResult, InvalidInput> {
        if labels.len() != QUESTION_COUNT {
            return Err(InvalidInput::AnswerCount {
                expected: QUESTION_COUNT,
                actual: labels.len(),
            });
        }

        let answers = EPDS_QUESTIONS
            .iter()
            .zip(labels)
            .enumerate()
            .map(|(question_index, (question, label))| {
                question
                    .option_index(label.as_ref())
                    .ok_or_else(|| InvalidInput::UnknownOptionLabel {
                        question: question_index,
                        label: label.as_ref().to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.evaluate(&answers)
    }

    /// Interpret an already computed score, e.g. one recorded by a clinician.
    pub fn classify(&self, score: i64) -> Result<EpdsResult, InvalidInput> {
        let score = u8::try_from(score)
            .ok()
            .filter(|score| *score <= MAX_EPDS_SCORE)
            .ok_or(InvalidInput::EpdsScoreOutOfRange(score))?;

        Ok(EpdsResult {
            score,
            tier: self.thresholds.classify(score),
        })
    }
}

/// Narrow wire-level integers to option indices, rejecting anything outside `0..=3`.
pub fn answers_from_raw(raw: &[i64]) -> Result<Vec<u8>, InvalidInput> {
    raw.iter()
        .enumerate()
        .map(|(question, option)| {
            u8::try_from(*option)
                .ok()
                .filter(|option| usize::from(*option) < OPTION_COUNT)
                .ok_or(InvalidInput::OptionOutOfRange {
                    question,
                    option: *option,
                })
        })
        .collect()
}
