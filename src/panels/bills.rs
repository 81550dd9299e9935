use ratatui::style::{Modifier, Style};

use super::{PanelContext, PanelView, Part, fit, fit_right};
use crate::claim::{BillEntry, BillItem};
use crate::format::{bill_type_label, money_fixed, money_grouped, or_dash};

/// Shown in the NME column of non-medically-essential items
pub const NME_MARKER: &str = "●";

const SERIAL_WIDTH: usize = 4;
const AMOUNT_WIDTH: usize = 12;
const NME_WIDTH: usize = 5;

pub fn nme_badge(count: usize) -> String {
    if count == 1 {
        "1 NME item".to_string()
    } else {
        format!("{count} NME items")
    }
}

pub fn build(bills: &[BillEntry], ctx: &PanelContext) -> PanelView {
    let mut view = PanelView::new();
    if bills.is_empty() {
        view.push_parts(vec![Part::text(
            "No bills in this record.",
            Style::default().fg(ctx.theme.muted()),
        )]);
        return view;
    }
    for (idx, entry) in bills.iter().enumerate() {
        if idx > 0 {
            view.push_blank();
        }
        push_bill(&mut view, entry, ctx);
    }
    view
}

fn push_bill(view: &mut PanelView, entry: &BillEntry, ctx: &PanelContext) {
    let theme = ctx.theme;
    let bill = &entry.bill;
    let muted = Style::default().fg(theme.muted());
    let on_page = bill.page_number > 0 && bill.page_number as usize == ctx.current_page;

    let marker = if on_page {
        Part::text("▶ ", Style::default().fg(theme.primary()))
    } else {
        Part::text("  ", Style::default())
    };
    let mut invoice = Style::default()
        .fg(theme.text())
        .add_modifier(Modifier::BOLD);
    if on_page {
        invoice = invoice.bg(theme.base_01);
    }
    view.push_parts(vec![
        marker,
        Part::text(or_dash(&bill.invoice_number).to_string(), invoice),
        Part::text(format!("  {}", bill_type_label(&bill.bill_type)), muted),
        Part::text(
            format!("  {}  ", money_grouped(bill.net_amount)),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Part::link(
            format!("Pg {} ↗", bill.page_number),
            Style::default()
                .fg(theme.primary())
                .add_modifier(Modifier::UNDERLINED),
            bill.page_number,
        ),
    ]);

    let mut details = vec![Part::text(
        format!(
            "  {} • {}",
            or_dash(&bill.facility_details.name),
            or_dash(&bill.bill_date)
        ),
        muted,
    )];
    let nme_count = entry.nme_count();
    if nme_count > 0 {
        details.push(Part::text("  ", Style::default()));
        details.push(Part::text(
            format!(" {} ", nme_badge(nme_count)),
            Style::default().fg(theme.nme()).bg(theme.base_01),
        ));
    }
    view.push_parts(details);

    let (item_width, category_width) = text_columns(ctx.width);
    view.push_parts(vec![Part::text(
        format!(
            "  {}{}{}{}{}",
            fit("#", SERIAL_WIDTH),
            fit("Item", item_width),
            fit("Category", category_width),
            fit_right("Amount", AMOUNT_WIDTH),
            fit_right("NME", NME_WIDTH),
        ),
        muted.add_modifier(Modifier::BOLD),
    )]);
    for item in &entry.items {
        push_item(view, item, item_width, category_width, ctx);
    }
}

fn push_item(
    view: &mut PanelView,
    item: &BillItem,
    item_width: usize,
    category_width: usize,
    ctx: &PanelContext,
) {
    let theme = ctx.theme;
    let muted = Style::default().fg(theme.muted());
    let (name_style, amount_style) = if item.is_nme {
        let nme = Style::default().fg(theme.nme());
        (
            nme.add_modifier(Modifier::BOLD),
            nme.add_modifier(Modifier::BOLD),
        )
    } else {
        (
            Style::default().fg(theme.text()),
            Style::default().fg(theme.text()),
        )
    };
    let marker = if item.is_nme { NME_MARKER } else { "" };

    view.push_parts(vec![
        Part::text(format!("  {}", fit(&item.serial, SERIAL_WIDTH)), muted),
        Part::text(fit(&item.item_name, item_width), name_style),
        Part::text(fit(&item.category, category_width), muted),
        Part::text(
            fit_right(&money_fixed(item.final_amount), AMOUNT_WIDTH),
            amount_style,
        ),
        Part::text(
            fit(&format!("   {marker}"), NME_WIDTH),
            Style::default().fg(theme.nme()),
        ),
    ]);
    if let Some(reason) = &item.deduction_reason {
        let indent = 2 + SERIAL_WIDTH;
        view.push_wrapped(
            reason,
            Style::default()
                .fg(theme.nme())
                .add_modifier(Modifier::ITALIC),
            indent,
            ctx.width,
        );
    }
}

/// Split what is left after the fixed columns between item and category
fn text_columns(width: u16) -> (usize, usize) {
    let fixed = 2 + SERIAL_WIDTH + AMOUNT_WIDTH + NME_WIDTH;
    let rest = (width as usize).saturating_sub(fixed).max(16);
    let category = (rest * 2 / 5).clamp(6, 18);
    (rest - category, category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::{BillHeader, FacilityDetails};
    use crate::panels::test_support::{all_text, ctx, line_text};
    use crate::theme::current_theme;

    fn item(serial: &str, name: &str, amount: f64, nme: bool, reason: Option<&str>) -> BillItem {
        BillItem {
            serial: serial.into(),
            item_name: name.into(),
            category: "Consumables".into(),
            final_amount: amount,
            is_nme: nme,
            deduction_reason: reason.map(Into::into),
        }
    }

    fn bill(page: i64, items: Vec<BillItem>) -> BillEntry {
        BillEntry {
            bill: BillHeader {
                bill_id: "B1".into(),
                bill_type: "itemized_bill".into(),
                bill_date: "2024-03-02".into(),
                invoice_number: "INV-77".into(),
                net_amount: 12500.0,
                facility_details: FacilityDetails {
                    name: "City Hospital".into(),
                },
                page_number: page,
                ..Default::default()
            },
            items,
        }
    }

    #[test]
    fn nme_item_gets_fixed_amount_and_marker() {
        let theme = current_theme();
        let bills = [bill(
            4,
            vec![
                item("1", "Consultation", 800.0, false, None),
                item("2", "Gloves", 123.4, true, Some("Consumable not payable")),
            ],
        )];
        let view = build(&bills, &ctx(theme));
        let text = all_text(&view);

        let normal = text.iter().find(|l| l.contains("Consultation")).unwrap();
        assert!(normal.contains("$800.00"));
        assert!(!normal.contains(NME_MARKER));

        let nme = text.iter().position(|l| l.contains("Gloves")).unwrap();
        assert!(text[nme].contains("$123.40"));
        assert!(text[nme].contains(NME_MARKER));
        assert!(text[nme + 1].contains("Consumable not payable"));

        let nme_line = &view.lines()[nme];
        assert!(nme_line
            .spans
            .iter()
            .any(|s| s.content.contains("Gloves") && s.style.fg == Some(theme.nme())));
    }

    #[test]
    fn header_has_page_link_and_badge() {
        let theme = current_theme();
        let bills = [bill(
            4,
            vec![
                item("1", "Gloves", 10.0, true, None),
                item("2", "Mask", 5.0, true, None),
            ],
        )];
        let view = build(&bills, &ctx(theme));
        let header = line_text(&view.lines()[0]);
        assert!(header.contains("INV-77"));
        assert!(header.contains("itemized bill"));
        assert!(header.contains("$12,500"));
        assert!(header.contains("Pg 4"));
        assert!(line_text(&view.lines()[1]).contains("City Hospital • 2024-03-02"));
        assert!(line_text(&view.lines()[1]).contains("2 NME items"));
        assert_eq!(view.targets().len(), 1);
        assert_eq!(view.targets()[0].page, 4);
        assert_eq!(view.targets()[0].line, 0);
    }

    #[test]
    fn badge_only_with_nme_items() {
        let theme = current_theme();
        let view = build(&[bill(2, vec![item("1", "Bed", 1.0, false, None)])], &ctx(theme));
        assert!(!line_text(&view.lines()[1]).contains("NME item"));
        assert_eq!(nme_badge(1), "1 NME item");
    }

    #[test]
    fn bill_on_current_page_is_highlighted() {
        let theme = current_theme();
        let bills = [bill(3, vec![]), bill(5, vec![])];
        let mut context = ctx(theme);
        context.current_page = 5;
        let text = all_text(&build(&bills, &context));
        let headers: Vec<_> = text.iter().filter(|l| l.contains("INV-77")).collect();
        assert!(!headers[0].starts_with("▶"));
        assert!(headers[1].starts_with("▶"));
    }

    #[test]
    fn empty_list() {
        let view = build(&[], &ctx(current_theme()));
        assert_eq!(all_text(&view), ["No bills in this record."]);
    }
}
