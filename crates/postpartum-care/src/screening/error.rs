use super::risk::RiskFactor;

/// Rejected screening input. No score or tier is produced alongside it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidInput {
    #[error("expected {expected} EPDS answers, received {actual}")]
    AnswerCount { expected: usize, actual: usize },
    #[error("EPDS question {question} has no option {option}")]
    OptionOutOfRange { question: usize, option: i64 },
    #[error("EPDS question {question} has no option labelled '{label}'")]
    UnknownOptionLabel { question: usize, label: String },
    #[error("EPDS score {0} is outside 0..=30")]
    EpdsScoreOutOfRange(i64),
    #[error("missing response for {0}")]
    MissingFactor(RiskFactor),
    #[error("{0} answered more than once")]
    DuplicateFactor(RiskFactor),
    #[error("unknown risk factor '{0}'")]
    UnknownFactor(String),
    #[error("'{label}' is not an accepted answer for {factor}")]
    UnrecognizedLabel { factor: RiskFactor, label: String },
    #[error("rating {rating} for {factor} is outside 1..=5")]
    RatingOutOfRange { factor: RiskFactor, rating: i64 },
    #[error("{factor} expects a {expected}")]
    WrongAnswerKind {
        factor: RiskFactor,
        expected: &'static str,
    },
}
