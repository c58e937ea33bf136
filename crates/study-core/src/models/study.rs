use std::fmt;

/// The kind of analysis a study tab holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudyMode {
    Reference,
    Topic,
    Qa,
    Event,
    StoryArc,
    Chat,
    Systematic,
}

impl StudyMode {
    pub const ALL: [StudyMode; 7] = [
        StudyMode::Reference,
        StudyMode::Topic,
        StudyMode::Qa,
        StudyMode::Event,
        StudyMode::StoryArc,
        StudyMode::Chat,
        StudyMode::Systematic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StudyMode::Reference => "reference",
            StudyMode::Topic => "topic",
            StudyMode::Qa => "qa",
            StudyMode::Event => "event",
            StudyMode::StoryArc => "storyArc",
            StudyMode::Chat => "chat",
            StudyMode::Systematic => "systematic",
        }
    }

    /// Short human label used as a prefix in tab titles.
    pub fn label(self) -> &'static str {
        match self {
            StudyMode::Reference => "Ref",
            StudyMode::Topic => "Topic",
            StudyMode::Qa => "Q&A",
            StudyMode::Event => "Event",
            StudyMode::StoryArc => "Arc",
            StudyMode::Chat => "Chat",
            StudyMode::Systematic => "Plan",
        }
    }
}

impl fmt::Display for StudyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mode-specific parameters identifying a study.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StudyParams {
    Reference {
        book: String,
        chapter: u32,
        /// Inclusive verse range; `None` means the whole chapter
        verses: Option<(u32, u32)>,
    },
    Topic {
        topic: String,
    },
    Qa {
        question: String,
    },
    Event {
        event: String,
    },
    StoryArc {
        arc: String,
    },
    Chat {
        session_id: String,
        title: String,
    },
    Systematic {
        plan: String,
    },
}

/// One open study. Immutable once created.
///
/// Identity for de-duplication comes from the key produced by a
/// [`crate::TitleProvider`], never from structural equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StudyItem {
    params: StudyParams,
}

impl StudyItem {
    pub fn new(params: StudyParams) -> Self {
        Self { params }
    }

    pub fn reference(book: impl Into<String>, chapter: u32, verses: Option<(u32, u32)>) -> Self {
        let verses = verses.map(|(a, b)| if a <= b { (a, b) } else { (b, a) });
        Self::new(StudyParams::Reference {
            book: book.into(),
            chapter,
            verses,
        })
    }

    pub fn topic(topic: impl Into<String>) -> Self {
        Self::new(StudyParams::Topic {
            topic: topic.into(),
        })
    }

    pub fn qa(question: impl Into<String>) -> Self {
        Self::new(StudyParams::Qa {
            question: question.into(),
        })
    }

    pub fn event(event: impl Into<String>) -> Self {
        Self::new(StudyParams::Event {
            event: event.into(),
        })
    }

    pub fn story_arc(arc: impl Into<String>) -> Self {
        Self::new(StudyParams::StoryArc { arc: arc.into() })
    }

    pub fn chat(session_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(StudyParams::Chat {
            session_id: session_id.into(),
            title: title.into(),
        })
    }

    pub fn systematic(plan: impl Into<String>) -> Self {
        Self::new(StudyParams::Systematic { plan: plan.into() })
    }

    pub fn params(&self) -> &StudyParams {
        &self.params
    }

    pub fn mode(&self) -> StudyMode {
        match self.params {
            StudyParams::Reference { .. } => StudyMode::Reference,
            StudyParams::Topic { .. } => StudyMode::Topic,
            StudyParams::Qa { .. } => StudyMode::Qa,
            StudyParams::Event { .. } => StudyMode::Event,
            StudyParams::StoryArc { .. } => StudyMode::StoryArc,
            StudyParams::Chat { .. } => StudyMode::Chat,
            StudyParams::Systematic { .. } => StudyMode::Systematic,
        }
    }
}
