use serde::Serialize;

pub const QUESTION_COUNT: usize = 10;
pub const OPTION_COUNT: usize = 4;

/// How a selected option index turns into a symptom contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringDirection {
    /// Options are listed least-symptomatic-first; the index is the contribution.
    Forward,
    /// Options are listed most-symptomatic-first; the contribution is `3 - index`.
    Reverse,
}

/// One EPDS item with its canonical option ordering.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EpdsQuestion {
    pub prompt: &'static str,
    pub options: [&'static str; OPTION_COUNT],
    pub direction: ScoringDirection,
}

impl EpdsQuestion {
    /// Callers check `option < OPTION_COUNT` first.
    pub(crate) fn contribution(&self, option: u8) -> u8 {
        match self.direction {
            ScoringDirection::Forward => option,
            ScoringDirection::Reverse => (OPTION_COUNT as u8 - 1) - option,
        }
    }

    pub fn option_index(&self, label: &str) -> Option<u8> {
        let label = label.trim();
        self.options
            .iter()
            .position(|option| option.eq_ignore_ascii_case(label))
            .map(|index| index as u8)
    }
}

/// Items 1-2 are forward scored, items 3-10 reverse scored. Every reverse item, including
/// "scared or panicky", keeps its options most-symptomatic-first.
pub static EPDS_QUESTIONS: [EpdsQuestion; QUESTION_COUNT] = [
    EpdsQuestion {
        prompt: "I have been able to laugh and see the funny side of things",
        options: [
            "As much as I always could",
            "Not quite so much now",
            "Definitely not so much now",
            "Not at all",
        ],
        direction: ScoringDirection::Forward,
    },
    EpdsQuestion {
        prompt: "I have looked forward with enjoyment to things",
        options: [
            "As much as I ever did",
            "Rather less than I used to",
            "Definitely less than I used to",
            "Hardly at all",
        ],
        direction: ScoringDirection::Forward,
    },
    EpdsQuestion {
        prompt: "I have blamed myself unnecessarily when things went wrong",
        options: [
            "Yes, most of the time",
            "Yes, some of the time",
            "Not very often",
            "No, never",
        ],
        direction: ScoringDirection::Reverse,
    },
    EpdsQuestion {
        prompt: "I have been anxious or worried for no good reason",
        options: [
            "Yes, very often",
            "Yes, sometimes",
            "Hardly ever",
            "No, not at all",
        ],
        direction: ScoringDirection::Reverse,
    },
    EpdsQuestion {
        prompt: "I have felt scared or panicky for no good reason",
        options: [
            "Yes, quite a lot",
            "Yes, sometimes",
            "No, not much",
            "No, not at all",
        ],
        direction: ScoringDirection::Reverse,
    },
    EpdsQuestion {
        prompt: "Things have been getting to me",
        options: [
            "Yes, most of the time I haven't been able to cope at all",
            "Yes, sometimes I haven't been coping as well as usual",
            "No, most of the time I have coped quite well",
            "No, I have been coping as well as ever",
        ],
        direction: ScoringDirection::Reverse,
    },
    EpdsQuestion {
        prompt: "I have been so unhappy that I have had difficulty sleeping",
        options: [
            "Yes, most of the time",
            "Yes, sometimes",
            "Not very often",
            "No, not at all",
        ],
        direction: ScoringDirection::Reverse,
    },
    EpdsQuestion {
        prompt: "I have felt sad or miserable",
        options: [
            "Yes, most of the time",
            "Yes, quite often",
            "Not very often",
            "No, not at all",
        ],
        direction: ScoringDirection::Reverse,
    },
    EpdsQuestion {
        prompt: "I have been so unhappy that I have been crying",
        options: [
            "Yes, most of the time",
            "Yes, quite often",
            "Only occasionally",
            "No, never",
        ],
        direction: ScoringDirection::Reverse,
    },
    EpdsQuestion {
        prompt: "The thought of harming myself has occurred to me",
        options: ["Yes, quite often", "Sometimes", "Hardly ever", "Never"],
        direction: ScoringDirection::Reverse,
    },
];
