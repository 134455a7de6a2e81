//! Filler bullets for entries that end up with no usable bullets at all.

/// What a filler policy may look at when producing bullets for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMeta<'a> {
    pub section: Section,
    pub title: &'a str,
    /// Employer for experience entries; `None` for projects.
    pub company: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Experience,
    Project,
}

/// Produces deterministic bullets for an entry. Must be pure: same entry, same bullets.
pub trait FillerPolicy: Send + Sync {
    fn filler_bullets(&self, entry: &EntryMeta<'_>) -> Vec<String>;
}

impl<F> FillerPolicy for F
where
    F: Fn(&EntryMeta<'_>) -> Vec<String> + Send + Sync,
{
    fn filler_bullets(&self, entry: &EntryMeta<'_>) -> Vec<String> {
        self(entry)
    }
}

/// Used by the merge when a policy returns nothing usable.
pub const LAST_RESORT_BULLET: &str = "Contributed to team goals and delivered assigned work.";

/// Default policy: two generic bullets built from the entry title.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericFiller;

impl FillerPolicy for GenericFiller {
    fn filler_bullets(&self, entry: &EntryMeta<'_>) -> Vec<String> {
        let title = entry.title.trim();
        if title.is_empty() {
            return vec![LAST_RESORT_BULLET.to_string()];
        }

        match entry.section {
            Section::Experience => vec![
                format!("Delivered core responsibilities as {title}, collaborating across teams."),
                format!("Improved processes and outcomes within the {title} role."),
            ],
            Section::Project => vec![
                format!("Designed and built {title} end to end."),
                format!("Documented and maintained {title} for ongoing use."),
            ],
        }
    }
}
