//! Normalized registry answer.
//!
//! The registry response is loosely structured: values may be missing, be
//! nil-flagged, or sit under prefixed or unprefixed element names depending
//! on the deployment. Everything here reads through [`FieldPath`] so that
//! any of those shapes ends up in the same [`RegistryResult`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::document::{FieldPath, XmlDocument, XmlNode};
use super::error::RegistryError;
use super::{ACTIVE_MARKER, INACTIVE_MARKER};
use crate::core::ErrorKind;

/// Prefix the service uses for its response wrapper elements.
const RESPONSE_PREFIX: &str = "srvc";

/// Local name of the element holding the whole answer.
const RECORD_ELEMENT: &str = "rg_ws_public2_result_rtType";

fn record_path() -> FieldPath {
    FieldPath::new()
        .or(&[
            "env:Body",
            "srvc:rgWsPublic2AfmMethodResponse",
            "srvc:result",
            RECORD_ELEMENT,
        ])
        .or(&[
            "Body",
            "rgWsPublic2AfmMethodResponse",
            "result",
            RECORD_ELEMENT,
        ])
}

fn field(section: &str, name: &str) -> FieldPath {
    FieldPath::prefixed_or_bare(RESPONSE_PREFIX, &[section, name])
}

/// Registry status of an AFM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegistryStatus {
    /// Registered and active.
    Active,
    /// Registered but deactivated.
    Inactive,
    /// Not confirmed by the registry.
    #[default]
    Unknown,
}

/// One business activity registered for the taxpayer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmActivity {
    /// Activity code (KAD).
    pub code: Option<String>,
    /// Activity description.
    pub description: Option<String>,
    /// Activity kind code (1 = primary, 2 = secondary, ...).
    pub kind: Option<String>,
    /// Activity kind description.
    pub kind_descr: Option<String>,
}

/// Additional taxpayer data from `basic_rec`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxpayerDetails {
    /// Trading name.
    pub commercial_title: Option<String>,
    /// Legal form description.
    pub legal_status: Option<String>,
    /// Whether the taxpayer is a business ("ΕΠΙΤΗΔΕΥΜΑΤΙΑΣ", ...).
    pub firm_flag: Option<String>,
    /// Natural or legal person description.
    pub person_kind: Option<String>,
    /// Raw deactivation flag (`1` active, `2` deactivated).
    pub deactivation_flag: Option<String>,
    /// Deactivation flag description.
    pub deactivation_descr: Option<String>,
    pub postal_address: Option<String>,
    pub postal_address_no: Option<String>,
    pub postal_zip_code: Option<String>,
    pub postal_area: Option<String>,
    /// Date of registration.
    pub registration_date: Option<NaiveDate>,
    /// Date of deactivation, if any.
    pub stop_date: Option<NaiveDate>,
    /// Whether the taxpayer is under the normal VAT regime.
    pub normal_vat_system: Option<bool>,
}

/// Normalized answer for one AFM lookup.
///
/// `valid` holds only if the response carries no error code and contains
/// both a name and an AFM. `status` is `Unknown` whenever `valid` is false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryResult {
    pub valid: bool,
    pub status: RegistryStatus,
    pub error_code: Option<String>,
    pub error_descr: Option<String>,
    /// Taxpayer name (`onomasia`).
    pub name: Option<String>,
    /// AFM as confirmed by the registry.
    pub afm: Option<String>,
    /// Tax office code (`doy`).
    pub tax_office_code: Option<String>,
    /// Tax office description (`doy_descr`).
    pub tax_office: Option<String>,
    /// Registry call sequence id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_seq_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<TaxpayerDetails>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activities: Vec<FirmActivity>,
}

impl RegistryResult {
    /// Normalize a raw registry response body.
    ///
    /// A body that parses but lacks the expected structure yields a "no data"
    /// result rather than an error.
    ///
    /// # Errors
    ///
    /// `RegistryError::Parse` if the body is not well-formed XML,
    /// `RegistryError::Fault` if it is a SOAP fault.
    pub fn from_response(xml: &str) -> Result<Self, RegistryError> {
        let doc = XmlDocument::parse(xml)?;
        if let Some(reason) = fault_reason(&doc.root) {
            return Err(RegistryError::Fault(reason));
        }
        Ok(Self::from_document(&doc))
    }

    /// Normalize an already parsed response document.
    pub fn from_document(doc: &XmlDocument) -> Self {
        let Some(record) = record_path()
            .resolve(&doc.root)
            .or_else(|| doc.root.find_local(RECORD_ELEMENT))
        else {
            tracing::debug!("registry response has no result record");
            return Self::default();
        };
        Self::from_record(record)
    }

    fn from_record(record: &XmlNode) -> Self {
        let error_code = field("error_rec", "error_code").text(record);
        let error_descr = field("error_rec", "error_descr").text(record);

        let afm = field("basic_rec", "afm").text(record);
        let name = field("basic_rec", "onomasia").text(record);
        let tax_office_code = field("basic_rec", "doy").text(record);
        let tax_office = field("basic_rec", "doy_descr").text(record);
        let deactivation_descr = field("basic_rec", "deactivation_flag_descr").text(record);

        let valid = error_code.is_none() && name.is_some() && afm.is_some();
        let status = classify(valid, deactivation_descr.as_deref());

        let details = FieldPath::prefixed_or_bare(RESPONSE_PREFIX, &["basic_rec"])
            .resolve(record)
            .filter(|basic| !basic.is_nil())
            .map(|_| read_details(record, deactivation_descr));

        Self {
            valid,
            status,
            error_code,
            error_descr,
            name,
            afm,
            tax_office_code,
            tax_office,
            call_seq_id: FieldPath::prefixed_or_bare(RESPONSE_PREFIX, &["call_seq_id"])
                .text(record),
            details,
            activities: read_activities(record),
        }
    }

    /// Error-outcome record: `error_code` holds the kind, `error_descr` the message.
    pub fn from_error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            error_code: Some(kind.as_str().to_string()),
            error_descr: Some(message.into()),
            ..Self::default()
        }
    }

    /// `true` if the registry reported an error in-band.
    pub fn has_error(&self) -> bool {
        self.error_code.is_some()
    }
}

impl From<&RegistryError> for RegistryResult {
    fn from(e: &RegistryError) -> Self {
        Self::from_error(e.kind(), e.to_string())
    }
}

fn read_details(record: &XmlNode, deactivation_descr: Option<String>) -> TaxpayerDetails {
    let basic = |name: &str| field("basic_rec", name).text(record);
    TaxpayerDetails {
        commercial_title: basic("commer_title"),
        legal_status: basic("legal_status_descr"),
        firm_flag: basic("firm_flag_descr"),
        person_kind: basic("i_ni_flag_descr"),
        deactivation_flag: basic("deactivation_flag"),
        deactivation_descr,
        postal_address: basic("postal_address"),
        postal_address_no: basic("postal_address_no"),
        postal_zip_code: basic("postal_zip_code"),
        postal_area: basic("postal_area_description"),
        registration_date: basic("regist_date").as_deref().and_then(parse_date),
        stop_date: basic("stop_date").as_deref().and_then(parse_date),
        normal_vat_system: basic("normal_vat_system_flag")
            .as_deref()
            .and_then(parse_flag),
    }
}

fn read_activities(record: &XmlNode) -> Vec<FirmActivity> {
    let Some(table) = FieldPath::prefixed_or_bare(RESPONSE_PREFIX, &["firm_act_tab"]).resolve(record)
    else {
        return Vec::new();
    };
    table
        .children
        .iter()
        .filter(|item| item.local_name() == "item")
        .map(|item| {
            let value = |name: &str| {
                FieldPath::prefixed_or_bare(RESPONSE_PREFIX, &[name]).text(item)
            };
            FirmActivity {
                code: value("firm_act_code"),
                description: value("firm_act_descr"),
                kind: value("firm_act_kind"),
                kind_descr: value("firm_act_kind_descr"),
            }
        })
        .filter(|a| *a != FirmActivity::default())
        .collect()
}

/// Reason text of a SOAP 1.2 or 1.1 fault, if the document is one.
pub(crate) fn fault_reason(root: &XmlNode) -> Option<String> {
    let fault = root.find_local("Fault")?;
    let reason = fault
        .find_local("Reason")
        .and_then(|r| r.find_local("Text"))
        .or_else(|| fault.find_local("faultstring"))
        .and_then(XmlNode::text)
        .unwrap_or("unspecified fault");
    Some(reason.to_string())
}

fn classify(valid: bool, deactivation_descr: Option<&str>) -> RegistryStatus {
    if !valid {
        return RegistryStatus::Unknown;
    }
    match deactivation_descr {
        Some(descr) if is_active_marker(descr) => RegistryStatus::Active,
        Some(descr) => {
            if !marker_eq(descr, INACTIVE_MARKER) {
                // Only the two known markers are recognized; anything else
                // counts as inactive until the variant is confirmed.
                tracing::warn!(descr, "unrecognized deactivation description");
            }
            RegistryStatus::Inactive
        }
        None => RegistryStatus::Inactive,
    }
}

/// `true` if `descr` is the registry's "active" marker, ignoring case and
/// whitespace differences.
pub fn is_active_marker(descr: &str) -> bool {
    marker_eq(descr, ACTIVE_MARKER)
}

fn marker_eq(a: &str, b: &str) -> bool {
    normalize_marker(a) == normalize_marker(b)
}

fn normalize_marker(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let day = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn parse_flag(s: &str) -> Option<bool> {
    match s {
        "Y" | "y" => Some(true),
        "N" | "n" => Some(false),
        _ => None,
    }
}
