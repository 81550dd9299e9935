//! Claim record model
//!
//! Every field is optional. A missing, `null` or wrongly-typed value falls
//! back to a blank string, zero, `false` or an empty list, so a partial record
//! still renders; only JSON syntax errors and a non-object root are rejected.

use indexmap::IndexMap;
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("expected a JSON object at the top level, found {0}")]
    NotAnObject(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClaimRecord {
    #[serde(deserialize_with = "text")]
    pub claim_id: String,
    #[serde(deserialize_with = "text")]
    pub claim_type: String,
    #[serde(deserialize_with = "text")]
    pub status: String,
    #[serde(deserialize_with = "text")]
    pub review_notes: String,
    #[serde(deserialize_with = "lenient")]
    pub audit_analysis: AuditAnalysis,
    #[serde(deserialize_with = "lenient")]
    pub edited_data: EditedData,
    #[serde(deserialize_with = "lenient")]
    pub segments: Segments,
}

impl ClaimRecord {
    pub fn from_json_str(input: &str) -> Result<Self, RecordError> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        if !value.is_object() {
            return Err(RecordError::NotAnObject(json_kind(&value)));
        }
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    pub fn bills(&self) -> &[BillEntry] {
        &self.edited_data.nme_analysis.bills
    }

    pub fn patient(&self) -> &PatientDetails {
        &self.edited_data.patient_summary.patient_details
    }

    pub fn hospitalization(&self) -> &HospitalizationDetails {
        &self.edited_data.patient_summary.hospitalization_details
    }

    pub fn segments(&self) -> &IndexMap<String, Segment> {
        &self.segments.aggregated_segments
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AuditAnalysis {
    #[serde(deserialize_with = "amount")]
    pub original_claimed_amount: f64,
    #[serde(deserialize_with = "amount")]
    pub original_total_of_bills: f64,
    #[serde(deserialize_with = "amount")]
    pub discrepancy_amount: f64,
    #[serde(deserialize_with = "text")]
    pub discrepancy_reason: String,
    #[serde(deserialize_with = "text")]
    pub status: String,
    #[serde(deserialize_with = "whole_number")]
    pub medical_legibility_issues: i64,
    #[serde(deserialize_with = "whole_number")]
    pub policy_violations_count: i64,
    #[serde(deserialize_with = "text")]
    pub policy_remarks: String,
    #[serde(deserialize_with = "lenient")]
    pub medical_legibility: MedicalLegibility,
    #[serde(deserialize_with = "list")]
    pub policy_violations: Vec<PolicyViolation>,
}

impl AuditAnalysis {
    pub fn is_underclaimed(&self) -> bool {
        self.status == "UNDERCLAIMED"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MedicalLegibility {
    #[serde(deserialize_with = "lenient")]
    pub prescription_bill_match: bool,
    #[serde(deserialize_with = "lenient")]
    pub diagnosis_treatment_consistent: bool,
    #[serde(deserialize_with = "list")]
    pub flagged_items: Vec<FlaggedItem>,
    #[serde(deserialize_with = "text")]
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlaggedItem {
    #[serde(deserialize_with = "text")]
    pub item_name: String,
    #[serde(deserialize_with = "text")]
    pub flag_reason: String,
    #[serde(deserialize_with = "text")]
    pub recommendation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PolicyViolation {
    #[serde(deserialize_with = "text")]
    pub rule_name: String,
    #[serde(deserialize_with = "text")]
    pub item_name: String,
    #[serde(deserialize_with = "text")]
    pub violation_details: String,
    #[serde(deserialize_with = "amount")]
    pub amount_impacted: f64,
    #[serde(deserialize_with = "text")]
    pub recommendation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditedData {
    #[serde(deserialize_with = "lenient")]
    pub nme_analysis: NmeAnalysis,
    #[serde(deserialize_with = "lenient")]
    pub patient_summary: PatientSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NmeAnalysis {
    #[serde(deserialize_with = "list")]
    pub bills: Vec<BillEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BillEntry {
    #[serde(deserialize_with = "lenient")]
    pub bill: BillHeader,
    #[serde(deserialize_with = "list")]
    pub items: Vec<BillItem>,
}

impl BillEntry {
    /// Number of non-medically-essential items on this bill
    pub fn nme_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_nme).count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BillHeader {
    #[serde(deserialize_with = "text")]
    pub bill_id: String,
    #[serde(deserialize_with = "text")]
    pub bill_type: String,
    #[serde(deserialize_with = "text")]
    pub bill_date: String,
    #[serde(deserialize_with = "text")]
    pub invoice_number: String,
    #[serde(deserialize_with = "amount")]
    pub net_amount: f64,
    #[serde(deserialize_with = "amount")]
    pub total_discount: f64,
    #[serde(deserialize_with = "lenient")]
    pub facility_details: FacilityDetails,
    #[serde(deserialize_with = "page_number")]
    pub page_number: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FacilityDetails {
    #[serde(deserialize_with = "text")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BillItem {
    #[serde(rename = "s.no.", deserialize_with = "text")]
    pub serial: String,
    #[serde(deserialize_with = "text")]
    pub item_name: String,
    #[serde(deserialize_with = "text")]
    pub category: String,
    #[serde(deserialize_with = "amount")]
    pub final_amount: f64,
    #[serde(deserialize_with = "lenient")]
    pub is_nme: bool,
    #[serde(deserialize_with = "optional_text")]
    pub deduction_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PatientSummary {
    #[serde(deserialize_with = "lenient")]
    pub patient_details: PatientDetails,
    #[serde(deserialize_with = "lenient")]
    pub hospitalization_details: HospitalizationDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PatientDetails {
    #[serde(deserialize_with = "text")]
    pub patient_name: String,
    #[serde(deserialize_with = "text")]
    pub patient_dob: String,
    #[serde(deserialize_with = "text")]
    pub patient_age: String,
    #[serde(deserialize_with = "text")]
    pub patient_mobile: String,
    #[serde(deserialize_with = "text")]
    pub patient_email: String,
    #[serde(deserialize_with = "text")]
    pub patient_policy_no: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HospitalizationDetails {
    #[serde(deserialize_with = "text")]
    pub doa: String,
    #[serde(deserialize_with = "text")]
    pub dod: String,
    #[serde(deserialize_with = "text")]
    pub provisional_final_diagnosis: String,
    #[serde(deserialize_with = "text")]
    pub treating_doctor_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Segments {
    #[serde(deserialize_with = "map")]
    pub aggregated_segments: IndexMap<String, Segment>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Segment {
    #[serde(deserialize_with = "list")]
    pub page_ranges: Vec<PageRange>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageRange {
    #[serde(deserialize_with = "page_number")]
    pub start: i64,
    #[serde(deserialize_with = "page_number")]
    pub end: i64,
}

impl PageRange {
    /// "5" for a single page, "5–8" for a span
    pub fn label(&self) -> String {
        if self.start == self.end {
            self.start.to_string()
        } else {
            format!("{}\u{2013}{}", self.start, self.end)
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_text(Value::deserialize(deserializer)?))
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = value_to_text(Value::deserialize(deserializer)?);
    Ok((!text.is_empty()).then_some(text))
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.filter(|v| v.is_finite()).unwrap_or_default())
}

fn whole_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|v| v.is_finite()).map(|v| v.round() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    Ok(parsed.unwrap_or_default())
}

/// Page references saturate: "inf" and anything past `i64::MAX` become the
/// largest page, "-inf" the smallest and NaN 0. The page coordinator clamps
/// them into the document from there.
fn page_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|v| v.round() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|v| v.round() as i64))
        }
        _ => None,
    };
    Ok(parsed.unwrap_or_default())
}

fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn map<'de, D, T>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(entries) => entries
            .into_iter()
            .filter_map(|(key, item)| serde_json::from_value(item).ok().map(|v| (key, v)))
            .collect(),
        _ => IndexMap::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "claim_id": "CLM-2291",
        "claim_type": "Reimbursement",
        "status": "IN_REVIEW",
        "review_notes": "Second pass",
        "audit_analysis": {
            "original_claimed_amount": 48250,
            "original_total_of_bills": 51230.5,
            "discrepancy_amount": 2980.5,
            "discrepancy_reason": "Pharmacy bill not claimed",
            "status": "UNDERCLAIMED",
            "medical_legibility_issues": 1,
            "policy_violations_count": 2,
            "policy_remarks": "Room rent capped",
            "medical_legibility": {
                "prescription_bill_match": true,
                "diagnosis_treatment_consistent": false,
                "flagged_items": [
                    {"item_name": "Vitamin D3", "flag_reason": "No prescription", "recommendation": "Deduct"}
                ],
                "summary": "Mostly consistent"
            },
            "policy_violations": [
                {"rule_name": "Room cap", "item_name": "Deluxe room", "violation_details": "Over limit",
                 "amount_impacted": 1500, "recommendation": "Deduct excess"}
            ]
        },
        "edited_data": {
            "nme_analysis": {
                "bills": [
                    {
                        "bill": {
                            "bill_id": "B1", "bill_type": "itemized_bill", "bill_date": "2024-03-02",
                            "invoice_number": "INV-77", "net_amount": 12500, "total_discount": 0,
                            "facility_details": {"name": "City Hospital"}, "page_number": 4
                        },
                        "items": [
                            {"s.no.": 1, "item_name": "Consultation", "category": "Doctor", "final_amount": 800, "is_nme": false},
                            {"s.no.": 2, "item_name": "Gloves", "category": "Consumables", "final_amount": 123.4,
                             "is_nme": true, "deduction_reason": "Consumable not payable"}
                        ]
                    }
                ]
            },
            "patient_summary": {
                "patient_details": {
                    "patient_name": "Asha Rao", "patient_dob": "1980-05-14", "patient_age": 43,
                    "patient_mobile": "9800011122", "patient_email": "asha@example.com", "patient_policy_no": "POL-1"
                },
                "hospitalization_details": {
                    "doa": "2024-02-27", "dod": "2024-03-02",
                    "provisional_final_diagnosis": "Dengue fever", "treating_doctor_name": "Dr. Iyer"
                }
            }
        },
        "segments": {
            "aggregated_segments": {
                "discharge_summary": {"page_ranges": [{"start": 2, "end": 3}]},
                "claim_forms": {"page_ranges": [{"start": 1, "end": 1}]},
                "itemized_bill": {"page_ranges": [{"start": 4, "end": 6}, {"start": 9, "end": 9}]}
            }
        }
    }"#;

    #[test]
    fn parses_full_record() {
        let record = ClaimRecord::from_json_str(SAMPLE).unwrap();
        assert_eq!(record.claim_id, "CLM-2291");
        assert!(record.audit_analysis.is_underclaimed());
        assert_eq!(record.audit_analysis.policy_violations[0].amount_impacted, 1500.0);
        assert_eq!(record.bills().len(), 1);
        assert_eq!(record.bills()[0].bill.page_number, 4);
        assert_eq!(record.bills()[0].nme_count(), 1);
        assert_eq!(record.bills()[0].items[0].serial, "1");
        assert_eq!(record.patient().patient_age, "43");
        assert_eq!(record.hospitalization().treating_doctor_name, "Dr. Iyer");
        assert_eq!(
            record.bills()[0].items[1].deduction_reason.as_deref(),
            Some("Consumable not payable")
        );
    }

    #[test]
    fn segments_keep_document_order() {
        let record = ClaimRecord::from_json_str(SAMPLE).unwrap();
        let keys: Vec<_> = record.segments().keys().map(String::as_str).collect();
        assert_eq!(keys, ["discharge_summary", "claim_forms", "itemized_bill"]);
    }

    #[test]
    fn missing_and_mistyped_fields_fall_back() {
        let record = ClaimRecord::from_json_str(
            r#"{
                "claim_id": null,
                "audit_analysis": {"discrepancy_amount": "1,250.75", "policy_violations": "none"},
                "edited_data": {"nme_analysis": {"bills": [null, {"bill": {"page_number": 2.0}}]}},
                "segments": {"aggregated_segments": {"other": null, "prescription": {}}}
            }"#,
        )
        .unwrap();
        assert_eq!(record.claim_id, "");
        assert_eq!(record.audit_analysis.discrepancy_amount, 1250.75);
        assert!(record.audit_analysis.policy_violations.is_empty());
        assert_eq!(record.bills().len(), 1);
        assert_eq!(record.bills()[0].bill.page_number, 2);
        assert!(record.bills()[0].items.is_empty());
        assert_eq!(record.segments().len(), 1);
        assert!(record.segments()["prescription"].page_ranges.is_empty());
        assert_eq!(record.patient(), &PatientDetails::default());
    }

    #[test]
    fn empty_deduction_reason_is_none() {
        let record = ClaimRecord::from_json_str(
            r#"{"edited_data": {"nme_analysis": {"bills": [{"items": [{"deduction_reason": ""}]}]}}}"#,
        )
        .unwrap();
        assert_eq!(record.bills()[0].items[0].deduction_reason, None);
    }

    #[test]
    fn rejects_bad_syntax_and_non_objects() {
        assert!(matches!(
            ClaimRecord::from_json_str("{\"claim_id\": "),
            Err(RecordError::Syntax(_))
        ));
        assert!(matches!(
            ClaimRecord::from_json_str("[1, 2]"),
            Err(RecordError::NotAnObject("an array"))
        ));
    }

    #[test]
    fn page_references_saturate() {
        let record = ClaimRecord::from_json_str(
            r#"{
                "edited_data": {"nme_analysis": {"bills": [
                    {"bill": {"page_number": "inf"}}, {"bill": {"page_number": 1e30}},
                    {"bill": {"page_number": 4.6}}, {"bill": {"page_number": "-Infinity"}},
                    {"bill": {"page_number": " 12 "}}
                ]}},
                "segments": {"aggregated_segments": {"claim_forms": {
                    "page_ranges": [{"start": "NaN", "end": "3.2"}]
                }}}
            }"#,
        )
        .unwrap();
        let pages: Vec<_> = record.bills().iter().map(|b| b.bill.page_number).collect();
        assert_eq!(pages, [i64::MAX, i64::MAX, 5, i64::MIN, 12]);
        let ranges = &record.segments()["claim_forms"].page_ranges;
        assert_eq!(ranges[0], PageRange { start: 0, end: 3 });
    }

    #[test]
    fn page_range_labels() {
        assert_eq!(PageRange { start: 5, end: 5 }.label(), "5");
        assert_eq!(PageRange { start: 5, end: 8 }.label(), "5\u{2013}8");
    }
}
