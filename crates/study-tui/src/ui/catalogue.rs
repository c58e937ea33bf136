use study_core::StudyItem;

/// Studies the `n` key cycles through, and the initial demo tabs.
pub fn demo_studies() -> Vec<StudyItem> {
    vec![
        StudyItem::reference("John", 3, Some((16, 18))),
        StudyItem::reference("Romans", 8, None),
        StudyItem::topic("Grace"),
        StudyItem::qa("Who wrote Hebrews?"),
        StudyItem::event("The Exodus"),
        StudyItem::story_arc("Joseph in Egypt"),
        StudyItem::systematic("Doctrine of God"),
        StudyItem::reference("Psalms", 23, None),
        StudyItem::topic("Covenant"),
        StudyItem::chat("session-1", "Questions on Romans"),
    ]
}

/// How many catalogue entries start open.
pub const DEMO_SEED_COUNT: usize = 4;
