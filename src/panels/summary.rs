use ratatui::style::{Modifier, Style};

use super::{PanelContext, PanelView, Part, fit};
use crate::claim::ClaimRecord;
use crate::format::{money_grouped, or_dash};

const LABEL_WIDTH: usize = 14;

pub fn build(record: &ClaimRecord, ctx: &PanelContext) -> PanelView {
    let theme = ctx.theme;
    let audit = &record.audit_analysis;
    let label = Style::default().fg(theme.muted());
    let value = Style::default().fg(theme.text()).add_modifier(Modifier::BOLD);
    let status_color = if audit.is_underclaimed() {
        theme.warning()
    } else {
        theme.success()
    };

    let mut view = PanelView::new();
    let row = |view: &mut PanelView, name: &str, text: String| {
        view.push_parts(vec![
            Part::text(fit(name, LABEL_WIDTH), label),
            Part::text(text, value),
        ]);
    };

    row(&mut view, "Claim ID", or_dash(&record.claim_id).to_string());
    view.push_parts(vec![
        Part::text(fit("Type", LABEL_WIDTH), label),
        Part::text(or_dash(&record.claim_type).to_string(), value),
        Part::text("  ", Style::default()),
        Part::text(
            format!(" {} ", or_dash(&record.status)),
            Style::default().fg(theme.base_06).bg(theme.base_02),
        ),
    ]);
    row(
        &mut view,
        "Claimed",
        money_grouped(audit.original_claimed_amount),
    );
    row(
        &mut view,
        "Bills Total",
        money_grouped(audit.original_total_of_bills),
    );
    view.push_parts(vec![
        Part::text(fit("Discrepancy", LABEL_WIDTH), label),
        Part::text(
            money_grouped(audit.discrepancy_amount),
            Style::default()
                .fg(theme.warning())
                .add_modifier(Modifier::BOLD),
        ),
        Part::text("  ", Style::default()),
        Part::text(
            format!(" {} ", or_dash(&audit.status)),
            Style::default().fg(theme.base_00).bg(status_color),
        ),
    ]);
    view.push_wrapped(&audit.discrepancy_reason, label, 2, ctx.width);
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::AuditAnalysis;
    use crate::panels::test_support::{all_text, ctx};
    use crate::theme::current_theme;

    fn record(status: &str) -> ClaimRecord {
        ClaimRecord {
            claim_id: "CLM-7".into(),
            claim_type: "Cashless".into(),
            status: "IN_REVIEW".into(),
            audit_analysis: AuditAnalysis {
                original_claimed_amount: 48250.0,
                original_total_of_bills: 51230.5,
                discrepancy_amount: 2980.5,
                discrepancy_reason: "Pharmacy bill not claimed".into(),
                status: status.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn shows_amounts_grouped() {
        let theme = current_theme();
        let text = all_text(&build(&record("UNDERCLAIMED"), &ctx(theme))).join("\n");
        assert!(text.contains("CLM-7"));
        assert!(text.contains("$48,250"));
        assert!(text.contains("$51,230.5"));
        assert!(text.contains("$2,980.5"));
        assert!(text.contains("Pharmacy bill not claimed"));
    }

    #[test]
    fn status_badge_color_follows_audit_status() {
        let theme = current_theme();
        let badge_bg = |status: &str| {
            let view = build(&record(status), &ctx(theme));
            let line = &view.lines()[4];
            line.spans.last().unwrap().style.bg
        };
        assert_eq!(badge_bg("UNDERCLAIMED"), Some(theme.warning()));
        assert_eq!(badge_bg("OVERCLAIMED"), Some(theme.success()));
        assert_eq!(badge_bg(""), Some(theme.success()));
    }

    #[test]
    fn never_emits_jumps() {
        let theme = current_theme();
        assert!(build(&record("X"), &ctx(theme)).targets().is_empty());
    }
}
