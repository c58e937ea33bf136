//! Title and key derivation for study tabs.
//!
//! The engine treats both strings as opaque: titles are only displayed and
//! keys are only compared for equality.

use crate::constants::GROUP_TITLE_SEPARATOR;
use crate::models::{Group, StudyItem, StudyParams};

/// Derives display titles and identity keys for studies.
pub trait TitleProvider {
    fn title(&self, item: &StudyItem, locale: &str) -> String;
    fn key(&self, item: &StudyItem, locale: &str) -> String;
}

/// Plain formatting shared by every locale.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTitles;

impl TitleProvider for StandardTitles {
    fn title(&self, item: &StudyItem, _locale: &str) -> String {
        match item.params() {
            StudyParams::Reference {
                book,
                chapter,
                verses,
            } => match verses {
                None => format!("{} {}", book, chapter),
                Some((start, end)) if start == end => format!("{} {}:{}", book, chapter, start),
                Some((start, end)) => format!("{} {}:{}-{}", book, chapter, start, end),
            },
            StudyParams::Topic { topic } => topic.clone(),
            StudyParams::Qa { question } => question.clone(),
            StudyParams::Event { event } => event.clone(),
            StudyParams::StoryArc { arc } => arc.clone(),
            StudyParams::Chat { title, .. } => title.clone(),
            StudyParams::Systematic { plan } => plan.clone(),
        }
    }

    fn key(&self, item: &StudyItem, _locale: &str) -> String {
        let body = match item.params() {
            StudyParams::Reference {
                book,
                chapter,
                verses,
            } => match verses {
                None => format!("{}:{}", normalize(book), chapter),
                Some((start, end)) => format!("{}:{}:{}-{}", normalize(book), chapter, start, end),
            },
            StudyParams::Topic { topic } => normalize(topic),
            StudyParams::Qa { question } => normalize(question),
            StudyParams::Event { event } => normalize(event),
            StudyParams::StoryArc { arc } => normalize(arc),
            // Sessions with the same title are still distinct chats
            StudyParams::Chat { session_id, .. } => session_id.clone(),
            StudyParams::Systematic { plan } => normalize(plan),
        };
        format!("{}:{}", item.mode().as_str(), body)
    }
}

/// Title shown for a group: the custom title if set, else the member titles.
pub fn group_title(group: &Group, titles: &dyn TitleProvider, locale: &str) -> String {
    if let Some(custom) = group.custom_title() {
        return custom.to_string();
    }
    let items = group.items();
    match items {
        [] => String::new(),
        [only] => titles.title(only, locale),
        [first, second] => format!(
            "{}{}{}",
            titles.title(first, locale),
            GROUP_TITLE_SEPARATOR,
            titles.title(second, locale)
        ),
        [first, rest @ ..] => format!("{} +{}", titles.title(first, locale), rest.len()),
    }
}

fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_titles() {
        let titles = StandardTitles;
        assert_eq!(titles.title(&StudyItem::reference("John", 3, None), "en"), "John 3");
        assert_eq!(
            titles.title(&StudyItem::reference("John", 3, Some((16, 16))), "en"),
            "John 3:16"
        );
        assert_eq!(
            titles.title(&StudyItem::reference("John", 3, Some((16, 18))), "en"),
            "John 3:16-18"
        );
    }

    #[test]
    fn test_keys_ignore_case_and_spacing() {
        let titles = StandardTitles;
        let a = titles.key(&StudyItem::topic("Grace  and Law"), "en");
        let b = titles.key(&StudyItem::topic("grace and law"), "en");
        assert_eq!(a, b);
        assert_eq!(a, "topic:grace and law");
    }

    #[test]
    fn test_keys_distinguish_modes() {
        let titles = StandardTitles;
        assert_ne!(
            titles.key(&StudyItem::topic("Exodus"), "en"),
            titles.key(&StudyItem::event("Exodus"), "en")
        );
    }

    #[test]
    fn test_chat_key_uses_session() {
        let titles = StandardTitles;
        assert_ne!(
            titles.key(&StudyItem::chat("s1", "Notes"), "en"),
            titles.key(&StudyItem::chat("s2", "Notes"), "en")
        );
    }

    #[test]
    fn test_group_title_derivation() {
        let titles = StandardTitles;
        let mut group = Group::new(vec![StudyItem::topic("Grace"), StudyItem::topic("Faith")]);
        assert_eq!(group_title(&group, &titles, "en"), "Grace + Faith");

        group.items_mut().push(StudyItem::topic("Hope"));
        assert_eq!(group_title(&group, &titles, "en"), "Grace +2");

        group.set_custom_title(Some("Virtues".to_string()));
        assert_eq!(group_title(&group, &titles, "en"), "Virtues");
    }
}
