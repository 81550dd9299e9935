use indexmap::IndexMap;
use ratatui::style::{Modifier, Style};

use super::{PanelContext, PanelView, Part, fit};
use crate::claim::Segment;

const LABEL_WIDTH: usize = 22;

/// Friendly name of a segment key; unknown keys are shown as-is
pub fn segment_label(key: &str) -> &str {
    match key {
        "claim_forms" => "Claim Forms",
        "cheque_or_bank_details" => "Bank Details",
        "identity_document" => "Identity Document",
        "discharge_summary" => "Discharge Summary",
        "prescription" => "Prescription",
        "investigation_report" => "Investigation Report",
        "itemized_bill" => "Itemized Bill",
        "consolidated_bill" => "Consolidated Bill",
        "other" => "Other Documents",
        _ => key,
    }
}

pub fn build(segments: &IndexMap<String, Segment>, ctx: &PanelContext) -> PanelView {
    let theme = ctx.theme;
    let mut view = PanelView::new();
    if segments.is_empty() {
        view.push_parts(vec![Part::text(
            "No document segments.",
            Style::default().fg(theme.muted()),
        )]);
        return view;
    }
    let chip = Style::default()
        .fg(theme.primary())
        .bg(theme.base_01)
        .add_modifier(Modifier::UNDERLINED);

    for (key, segment) in segments {
        let mut parts = vec![Part::text(
            fit(segment_label(key), LABEL_WIDTH),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        for range in &segment.page_ranges {
            parts.push(Part::link(range.label(), chip, range.start));
            parts.push(Part::text("  ", Style::default()));
        }
        view.push_parts_wrapped(parts, ctx.width, LABEL_WIDTH);
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::PageRange;
    use crate::panels::test_support::{all_text, ctx};
    use crate::theme::current_theme;

    fn segments(entries: &[(&str, &[(i64, i64)])]) -> IndexMap<String, Segment> {
        entries
            .iter()
            .map(|(key, ranges)| {
                let page_ranges = ranges
                    .iter()
                    .map(|&(start, end)| PageRange { start, end })
                    .collect();
                (key.to_string(), Segment { page_ranges })
            })
            .collect()
    }

    #[test]
    fn chips_label_ranges_and_jump_to_start() {
        let view = build(
            &segments(&[("itemized_bill", &[(5, 5), (5, 8)])]),
            &ctx(current_theme()),
        );
        let text = all_text(&view);
        assert!(text[0].starts_with("Itemized Bill"));
        assert!(text[0].contains("5  5–8"));
        assert!(!text[0].contains('['));
        let pages: Vec<_> = view.targets().iter().map(|t| t.page).collect();
        assert_eq!(pages, [5, 5]);

        let chips: Vec<_> = view.lines()[0]
            .spans
            .iter()
            .filter(|span| span.style.add_modifier.contains(Modifier::UNDERLINED))
            .map(|span| span.content.to_string())
            .collect();
        assert_eq!(chips, ["5", "5–8"]);
    }

    #[test]
    fn keeps_record_order_and_raw_unknown_keys() {
        let view = build(
            &segments(&[
                ("discharge_summary", &[(2, 3)]),
                ("lab_extras", &[(9, 9)]),
                ("claim_forms", &[(1, 1)]),
            ]),
            &ctx(current_theme()),
        );
        let text = all_text(&view);
        assert!(text[0].starts_with("Discharge Summary"));
        assert!(text[1].starts_with("lab_extras"));
        assert!(text[2].starts_with("Claim Forms"));
    }

    #[test]
    fn labels() {
        assert_eq!(segment_label("cheque_or_bank_details"), "Bank Details");
        assert_eq!(segment_label("other"), "Other Documents");
        assert_eq!(segment_label("mystery"), "mystery");
    }
}
