use ratatui::style::{Modifier, Style};
use unicode_width::UnicodeWidthStr;

use super::{PanelContext, PanelView, Part, fit_right};
use crate::claim::AuditAnalysis;
use crate::format::{money_fixed, or_dash, yes_no};

pub fn build(audit: &AuditAnalysis, ctx: &PanelContext) -> PanelView {
    let theme = ctx.theme;
    let muted = Style::default().fg(theme.muted());
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let warning = Style::default().fg(theme.warning());
    let destructive = Style::default().fg(theme.destructive());
    let legibility = &audit.medical_legibility;

    let mut view = PanelView::new();
    view.push_parts(vec![
        Part::text(
            audit.medical_legibility_issues.to_string(),
            warning.add_modifier(Modifier::BOLD),
        ),
        Part::text(" Legibility Issues    ", muted),
        Part::text(
            audit.policy_violations_count.to_string(),
            destructive.add_modifier(Modifier::BOLD),
        ),
        Part::text(" Policy Violations", muted),
    ]);
    view.push_blank();

    view.push_parts(vec![Part::text(
        "⚠ Medical Legibility Flags",
        warning.add_modifier(Modifier::BOLD),
    )]);
    let flag = |ok: bool| {
        let color = if ok {
            theme.success()
        } else {
            theme.destructive()
        };
        Part::text(
            format!(" {} ", yes_no(ok)),
            Style::default().fg(theme.base_00).bg(color),
        )
    };
    view.push_parts(vec![
        Part::text("  Prescription Match: ", muted),
        flag(legibility.prescription_bill_match),
        Part::text("   Diagnosis Consistent: ", muted),
        flag(legibility.diagnosis_treatment_consistent),
    ]);
    view.push_wrapped(&legibility.summary, muted, 2, ctx.width);
    for item in &legibility.flagged_items {
        view.push_parts(vec![Part::text(
            format!("  • {}", or_dash(&item.item_name)),
            bold,
        )]);
        view.push_wrapped(&item.flag_reason, warning, 4, ctx.width);
        if !item.recommendation.is_empty() {
            view.push_wrapped(
                &format!("→ {}", item.recommendation),
                muted,
                4,
                ctx.width,
            );
        }
    }
    view.push_blank();

    view.push_parts(vec![Part::text(
        "⛨ Policy Violations",
        destructive.add_modifier(Modifier::BOLD),
    )]);
    view.push_wrapped(&audit.policy_remarks, muted, 2, ctx.width);
    for violation in &audit.policy_violations {
        let amount = money_fixed(violation.amount_impacted);
        let name = format!("  • {}", or_dash(&violation.item_name));
        let gap = (ctx.width as usize).saturating_sub(name.width());
        view.push_parts(vec![
            Part::text(name, bold),
            Part::text(
                fit_right(&amount, gap.max(amount.len() + 2)),
                destructive.add_modifier(Modifier::BOLD),
            ),
        ]);
        if !violation.rule_name.is_empty() {
            view.push_wrapped(
                &format!("Rule: {}", violation.rule_name),
                muted,
                4,
                ctx.width,
            );
        }
        view.push_wrapped(&violation.violation_details, destructive, 4, ctx.width);
        if !violation.recommendation.is_empty() {
            view.push_wrapped(
                &format!("→ {}", violation.recommendation),
                muted,
                4,
                ctx.width,
            );
        }
    }
    view
}
