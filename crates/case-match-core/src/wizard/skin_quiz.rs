//! "Not sure" skin-type questionnaire.

/// One quiz question; each option votes for a skin type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizQuestion {
    pub prompt: &'static str,
    /// (option id, skin type it votes for)
    pub options: &'static [(&'static str, &'static str)],
}

impl QuizQuestion {
    /// Skin type voted for by an option.
    pub fn vote_for(&self, option_id: &str) -> Option<&'static str> {
        self.options
            .iter()
            .find(|(id, _)| *id == option_id)
            .map(|(_, skin_type)| *skin_type)
    }
}

pub const SKIN_TYPE_QUIZ: &[QuizQuestion] = &[
    QuizQuestion {
        prompt: "How does your skin feel a few hours after cleansing?",
        options: &[
            ("tight", "dry"),
            ("shiny-all-over", "oily"),
            ("shiny-t-zone", "combination"),
            ("comfortable", "normal"),
        ],
    },
    QuizQuestion {
        prompt: "How visible are your pores?",
        options: &[
            ("barely", "dry"),
            ("large-everywhere", "oily"),
            ("nose-and-forehead", "combination"),
            ("some", "normal"),
        ],
    },
    QuizQuestion {
        prompt: "How does your skin react to new products?",
        options: &[
            ("flaky", "dry"),
            ("breakouts", "oily"),
            ("depends-on-area", "combination"),
            ("no-reaction", "normal"),
            ("stings-or-redness", "sensitive"),
        ],
    },
];

/// Most-voted skin type; ties go to the type voted for first.
pub fn infer_skin_type(votes: &[Option<String>]) -> Option<String> {
    let mut tally: Vec<(&str, usize)> = Vec::new();
    for vote in votes.iter().flatten() {
        match tally.iter_mut().find(|(t, _)| *t == vote.as_str()) {
            Some((_, count)) => *count += 1,
            None => tally.push((vote.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (skin_type, count) in tally {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((skin_type, count));
        }
    }
    best.map(|(skin_type, _)| skin_type.to_string())
}
