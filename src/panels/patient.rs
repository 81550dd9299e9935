use ratatui::style::{Modifier, Style};

use super::{PanelContext, PanelView, Part, fit};
use crate::claim::ClaimRecord;
use crate::format::or_dash;

const LABEL_WIDTH: usize = 12;

pub fn build(record: &ClaimRecord, ctx: &PanelContext) -> PanelView {
    let theme = ctx.theme;
    let patient = record.patient();
    let stay = record.hospitalization();
    let label = Style::default().fg(theme.muted());
    let value = Style::default().fg(theme.text());

    let dob = if patient.patient_age.is_empty() {
        or_dash(&patient.patient_dob).to_string()
    } else {
        format!(
            "{} (Age {})",
            or_dash(&patient.patient_dob),
            patient.patient_age
        )
    };

    let mut view = PanelView::new();
    for (name, text) in [
        ("Name", or_dash(&patient.patient_name).to_string()),
        ("DOB", dob),
        ("Mobile", or_dash(&patient.patient_mobile).to_string()),
        ("Email", or_dash(&patient.patient_email).to_string()),
        ("Policy No", or_dash(&patient.patient_policy_no).to_string()),
        ("Doctor", or_dash(&stay.treating_doctor_name).to_string()),
    ] {
        view.push_parts(vec![
            Part::text(fit(name, LABEL_WIDTH), label),
            Part::text(text, value),
        ]);
    }

    view.push_parts(vec![
        Part::text(fit("Diagnosis", LABEL_WIDTH), label),
        Part::text(
            or_dash(&stay.provisional_final_diagnosis).to_string(),
            value.add_modifier(Modifier::BOLD),
        ),
    ]);
    view.push_parts(vec![Part::text(
        format!(
            "Admitted: {} → Discharged: {}",
            or_dash(&stay.doa),
            or_dash(&stay.dod)
        ),
        label,
    )]);
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels::test_support::{all_text, ctx};
    use crate::theme::current_theme;

    #[test]
    fn lists_patient_and_stay() {
        let record = ClaimRecord::from_json_str(
            r#"{"edited_data": {"patient_summary": {
                "patient_details": {"patient_name": "Asha Rao", "patient_dob": "1980-05-14", "patient_age": 43},
                "hospitalization_details": {"doa": "2024-02-27", "dod": "2024-03-02",
                    "provisional_final_diagnosis": "Dengue fever", "treating_doctor_name": "Dr. Iyer"}
            }}}"#,
        )
        .unwrap();
        let text = all_text(&build(&record, &ctx(current_theme())));
        assert!(text[0].ends_with("Asha Rao"));
        assert!(text[1].ends_with("1980-05-14 (Age 43)"));
        assert!(text[5].ends_with("Dr. Iyer"));
        assert_eq!(text[7], "Admitted: 2024-02-27 → Discharged: 2024-03-02");
    }

    #[test]
    fn blank_fields_show_dash() {
        let text = all_text(&build(&ClaimRecord::default(), &ctx(current_theme())));
        assert!(text[2].ends_with("—"));
        assert_eq!(text[1].trim_end(), format!("{}—", fit("DOB", LABEL_WIDTH)));
    }
}
