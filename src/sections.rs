use std::collections::HashSet;

/// The collapsible sections of the data pane, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    Summary,
    Patient,
    Bills,
    Audit,
    Segments,
}

impl SectionId {
    pub fn all() -> &'static [SectionId] {
        &[
            SectionId::Summary,
            SectionId::Patient,
            SectionId::Bills,
            SectionId::Audit,
            SectionId::Segments,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SectionId::Summary => "Claim Summary",
            SectionId::Patient => "Patient Info",
            SectionId::Bills => "Bills & Items",
            SectionId::Audit => "Audit Issues",
            SectionId::Segments => "Document Segments",
        }
    }

    /// Section bound to the digit keys 1-5
    pub fn from_digit(digit: char) -> Option<Self> {
        let idx = digit.to_digit(10)?.checked_sub(1)? as usize;
        Self::all().get(idx).copied()
    }
}

/// Which sections are expanded. Session-local, all expanded by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionVisibility {
    expanded: HashSet<SectionId>,
}

impl Default for SectionVisibility {
    fn default() -> Self {
        Self {
            expanded: SectionId::all().iter().copied().collect(),
        }
    }
}

impl SectionVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, section: SectionId) {
        if !self.expanded.remove(&section) {
            self.expanded.insert(section);
        }
    }

    pub fn is_expanded(&self, section: SectionId) -> bool {
        self.expanded.contains(&section)
    }
}
