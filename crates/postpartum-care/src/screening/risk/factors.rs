use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::super::error::InvalidInput;

/// The eight lifestyle factors weighed alongside the EPDS score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    MentalHealth,
    Stress,
    SocialSupport,
    PhysicalHealth,
    Nutrition,
    SleepQuality,
    EconomicStress,
    HormonalChanges,
}

impl RiskFactor {
    pub const ALL: [Self; 8] = [
        Self::MentalHealth,
        Self::Stress,
        Self::SocialSupport,
        Self::PhysicalHealth,
        Self::Nutrition,
        Self::SleepQuality,
        Self::EconomicStress,
        Self::HormonalChanges,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::MentalHealth => "mental_health",
            Self::Stress => "stress",
            Self::SocialSupport => "social_support",
            Self::PhysicalHealth => "physical_health",
            Self::Nutrition => "nutrition",
            Self::SleepQuality => "sleep_quality",
            Self::EconomicStress => "economic_stress",
            Self::HormonalChanges => "hormonal_changes",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|factor| factor.key() == key.trim())
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingScale {
    /// Low rating means high risk: `(6 - rating) * 2`.
    Inverted,
    /// High rating means high risk: `rating * 2`.
    Direct,
}

impl RatingScale {
    pub const fn sub_score(self, rating: Rating) -> u8 {
        match self {
            Self::Inverted => (6 - rating.0) * 2,
            Self::Direct => rating.0 * 2,
        }
    }
}

/// A validated 1-5 self rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    fn for_factor(factor: RiskFactor, value: i64) -> Result<Self, InvalidInput> {
        u8::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(InvalidInput::RatingOutOfRange {
                factor,
                rating: value,
            })
    }
}

impl TryFrom<i64> for Rating {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| format!("rating {value} is outside 1..=5"))
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

macro_rules! categorical_answer {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal, $score:literal;)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            pub const fn sub_score(self) -> u8 {
                match self {
                    $(Self::$variant => $score,)+
                }
            }

            pub fn from_label(label: &str) -> Option<Self> {
                let label = label.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|answer| answer.label().eq_ignore_ascii_case(label))
            }
        }
    };
}

categorical_answer! {
    /// "How have you been feeling about your mental health lately?"
    MentalHealth {
        FeelingGood => "Feeling good", 3;
        SomeStruggles => "Some struggles", 6;
        NeedSupport => "Need support", 10;
    }
}

categorical_answer! {
    /// "How are you managing stressors recently?"
    StressLevel {
        Low => "Low stress", 3;
        Moderate => "Moderate stress", 6;
        High => "High stress", 10;
    }
}

categorical_answer! {
    /// "How has your physical health been lately?"
    PhysicalHealth {
        Healthy => "Feeling healthy", 3;
        SomeConcerns => "Some concerns", 6;
        NeedDoctor => "Need to see a doctor", 10;
    }
}

categorical_answer! {
    /// "Have you noticed any mood or physical changes due to hormones?"
    HormonalChanges {
        No => "No", 3;
        Yes => "Yes", 10;
    }
}

/// Raw, unvalidated answer for a single factor as it arrives over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactorAnswer {
    Rating(i64),
    Label(String),
}

impl FactorAnswer {
    fn label(&self, factor: RiskFactor) -> Result<&str, InvalidInput> {
        match self {
            FactorAnswer::Label(label) => Ok(label),
            FactorAnswer::Rating(_) => Err(InvalidInput::WrongAnswerKind {
                factor,
                expected: "categorical label",
            }),
        }
    }

    fn rating(&self, factor: RiskFactor) -> Result<Rating, InvalidInput> {
        match self {
            FactorAnswer::Rating(value) => Rating::for_factor(factor, *value),
            FactorAnswer::Label(label) => match label.trim().parse::<i64>() {
                Ok(value) => Rating::for_factor(factor, value),
                Err(_) => Err(InvalidInput::WrongAnswerKind {
                    factor,
                    expected: "rating from 1 to 5",
                }),
            },
        }
    }
}

/// One validated response per factor. Sleep duration and free-text notes are not part of
/// this type; check-ins carry them alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskFactorResponses {
    pub mental_health: MentalHealth,
    pub stress: StressLevel,
    pub social_support: Rating,
    pub physical_health: PhysicalHealth,
    pub nutrition: Rating,
    pub sleep_quality: Rating,
    pub economic_stress: Rating,
    pub hormonal_changes: HormonalChanges,
}

impl RiskFactorResponses {
    pub fn sub_score(&self, factor: RiskFactor) -> u8 {
        match factor {
            RiskFactor::MentalHealth => self.mental_health.sub_score(),
            RiskFactor::Stress => self.stress.sub_score(),
            RiskFactor::PhysicalHealth => self.physical_health.sub_score(),
            RiskFactor::HormonalChanges => self.hormonal_changes.sub_score(),
            RiskFactor::SocialSupport => RatingScale::Inverted.sub_score(self.social_support),
            RiskFactor::Nutrition => RatingScale::Inverted.sub_score(self.nutrition),
            RiskFactor::SleepQuality => RatingScale::Inverted.sub_score(self.sleep_quality),
            RiskFactor::EconomicStress => RatingScale::Direct.sub_score(self.economic_stress),
        }
    }

    pub fn sub_scores(&self) -> [(RiskFactor, u8); 8] {
        RiskFactor::ALL.map(|factor| (factor, self.sub_score(factor)))
    }

    /// Validate a keyed answer set. Every factor must be present exactly once and no other
    /// keys are accepted.
    pub fn from_answers(answers: &BTreeMap<String, FactorAnswer>) -> Result<Self, InvalidInput> {
        if let Some(unknown) = answers
            .keys()
            .find(|key| RiskFactor::from_key(key).is_none())
        {
            return Err(InvalidInput::UnknownFactor(unknown.clone()));
        }
        let mut seen = BTreeSet::new();
        for factor in answers.keys().filter_map(|key| RiskFactor::from_key(key)) {
            if !seen.insert(factor) {
                return Err(InvalidInput::DuplicateFactor(factor));
            }
        }

        let answer = |factor: RiskFactor| {
            answers
                .iter()
                .find(|(key, _)| RiskFactor::from_key(key) == Some(factor))
                .map(|(_, answer)| answer)
                .ok_or(InvalidInput::MissingFactor(factor))
        };
        let categorical = |factor: RiskFactor| answer(factor)?.label(factor);
        let rating = |factor: RiskFactor| answer(factor)?.rating(factor);
        let unrecognized = |factor: RiskFactor, label: &str| InvalidInput::UnrecognizedLabel {
            factor,
            label: label.to_string(),
        };

        let mental_health = categorical(RiskFactor::MentalHealth).and_then(|label| {
            MentalHealth::from_label(label)
                .ok_or_else(|| unrecognized(RiskFactor::MentalHealth, label))
        })?;
        let stress = categorical(RiskFactor::Stress).and_then(|label| {
            StressLevel::from_label(label).ok_or_else(|| unrecognized(RiskFactor::Stress, label))
        })?;
        let social_support = rating(RiskFactor::SocialSupport)?;
        let physical_health = categorical(RiskFactor::PhysicalHealth).and_then(|label| {
            PhysicalHealth::from_label(label)
                .ok_or_else(|| unrecognized(RiskFactor::PhysicalHealth, label))
        })?;
        let nutrition = rating(RiskFactor::Nutrition)?;
        let sleep_quality = rating(RiskFactor::SleepQuality)?;
        let economic_stress = rating(RiskFactor::EconomicStress)?;
        let hormonal_changes = categorical(RiskFactor::HormonalChanges).and_then(|label| {
            HormonalChanges::from_label(label)
                .ok_or_else(|| unrecognized(RiskFactor::HormonalChanges, label))
        })?;

        Ok(Self {
            mental_health,
            stress,
            social_support,
            physical_health,
            nutrition,
            sleep_quality,
            economic_stress,
            hormonal_changes,
        })
    }

    /// Inverse of [`from_answers`](Self::from_answers).
    pub fn to_answers(&self) -> BTreeMap<String, FactorAnswer> {
        let label = |value: &str| FactorAnswer::Label(value.to_string());
        let rating = |value: Rating| FactorAnswer::Rating(i64::from(value.value()));

        [
            (RiskFactor::MentalHealth, label(self.mental_health.label())),
            (RiskFactor::Stress, label(self.stress.label())),
            (RiskFactor::SocialSupport, rating(self.social_support)),
            (RiskFactor::PhysicalHealth, label(self.physical_health.label())),
            (RiskFactor::Nutrition, rating(self.nutrition)),
            (RiskFactor::SleepQuality, rating(self.sleep_quality)),
            (RiskFactor::EconomicStress, rating(self.economic_stress)),
            (RiskFactor::HormonalChanges, label(self.hormonal_changes.label())),
        ]
        .into_iter()
        .map(|(factor, answer)| (factor.key().to_string(), answer))
        .collect()
    }
}
