//! SOAP 1.1 request envelope for `ILoadSearch/GetMultipleLoadDetailResults`.

use crate::domain::model::{LoadSearchApiRequest, LoadSearchCriteria};
use crate::utils::error::Result;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use regex::Regex;
use std::sync::OnceLock;

pub const NS_SOAP_ENV: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const NS_V12: &str = "http://webservices.truckstop.com/v12";
pub const NS_WEB: &str = "http://schemas.datacontract.org/2004/07/WebServices";
pub const NS_WEB_SEARCHING: &str = "http://schemas.datacontract.org/2004/07/WebServices.Searching";
pub const NS_TRUCKSTOP_OBJECTS: &str = "http://schemas.datacontract.org/2004/07/Truckstop2.Objects";

pub const PICKUP_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn push_text(fields: &mut Vec<(&'static str, String)>, name: &'static str, value: Option<&str>) {
    if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
        fields.push((name, v.to_string()));
    }
}

fn push_value<T: ToString>(fields: &mut Vec<(&'static str, String)>, name: &'static str, value: Option<T>) {
    if let Some(v) = value {
        fields.push((name, v.to_string()));
    }
}

/// Criteria children in the order WCF deserializes them (alphabetical).
/// Absent and blank values are left out; `OriginState` is always present.
pub fn criteria_fields(criteria: &LoadSearchCriteria) -> Vec<(&'static str, String)> {
    let mut fields = Vec::new();

    push_text(&mut fields, "DestinationCity", criteria.destination_city.as_deref());
    push_text(&mut fields, "DestinationCountry", criteria.destination_country.as_deref());
    push_value(&mut fields, "DestinationRange", criteria.destination_range);
    push_text(&mut fields, "DestinationState", criteria.destination_state.as_deref());

    if let Some(types) = &criteria.equipment_type {
        let joined = types
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(",");
        push_text(&mut fields, "EquipmentType", Some(&joined));
    }

    push_value(&mut fields, "HoursOld", criteria.hours_old);
    push_text(&mut fields, "LoadType", criteria.load_type.as_deref());
    push_text(&mut fields, "OriginCity", criteria.origin_city.as_deref());
    push_text(&mut fields, "OriginCountry", criteria.origin_country.as_deref());
    push_value(&mut fields, "OriginLatitude", criteria.origin_latitude);
    push_value(&mut fields, "OriginLongitude", criteria.origin_longitude);
    push_value(&mut fields, "OriginRange", criteria.origin_range);
    fields.push(("OriginState", criteria.origin_state.trim().to_string()));
    push_value(&mut fields, "PageNumber", criteria.page_number);
    push_value(&mut fields, "PageSize", criteria.page_size);

    for date in criteria.pickup_dates.iter().flatten() {
        fields.push(("PickupDates", date.format(PICKUP_DATE_FORMAT).to_string()));
    }

    push_text(&mut fields, "SortBy", criteria.sort_by.as_deref());
    push_value(&mut fields, "SortDescending", criteria.sort_descending);

    fields
}

fn write_leaf<W: std::io::Write>(writer: &mut Writer<W>, name: &str, value: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

pub fn build_envelope(request: &LoadSearchApiRequest) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Start(BytesStart::new("soapenv:Envelope").with_attributes([
        ("xmlns:soapenv", NS_SOAP_ENV),
        ("xmlns:v12", NS_V12),
        ("xmlns:web", NS_WEB),
        ("xmlns:web1", NS_WEB_SEARCHING),
        ("xmlns:truc", NS_TRUCKSTOP_OBJECTS),
    ])))?;
    writer.write_event(Event::Empty(BytesStart::new("soapenv:Header")))?;
    writer.write_event(Event::Start(BytesStart::new("soapenv:Body")))?;
    writer.write_event(Event::Start(BytesStart::new("v12:GetMultipleLoadDetailResults")))?;
    writer.write_event(Event::Start(BytesStart::new("v12:searchRequest")))?;

    write_leaf(&mut writer, "web:IntegrationId", &request.integration_id)?;
    write_leaf(&mut writer, "web:Password", &request.password)?;
    write_leaf(&mut writer, "web:UserName", &request.user_name)?;

    if let Some(criteria) = &request.criteria {
        writer.write_event(Event::Start(BytesStart::new("web1:Criteria")))?;
        for (name, value) in criteria_fields(criteria) {
            write_leaf(&mut writer, &format!("web1:{}", name), &value)?;
        }
        writer.write_event(Event::End(BytesEnd::new("web1:Criteria")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("v12:searchRequest")))?;
    writer.write_event(Event::End(BytesEnd::new("v12:GetMultipleLoadDetailResults")))?;
    writer.write_event(Event::End(BytesEnd::new("soapenv:Body")))?;
    writer.write_event(Event::End(BytesEnd::new("soapenv:Envelope")))?;

    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

/// Copy of an envelope that is safe to log.
pub fn redact_password(envelope: &str) -> String {
    static PASSWORD: OnceLock<Regex> = OnceLock::new();
    let re = PASSWORD.get_or_init(|| {
        Regex::new(r"(?s)(<web:Password>).*?(</web:Password>)").expect("static regex")
    });
    re.replace_all(envelope, "${1}***${2}").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::xml::Element;
    use chrono::NaiveDate;

    fn request(criteria: Option<LoadSearchCriteria>) -> LoadSearchApiRequest {
        LoadSearchApiRequest {
            integration_id: "1001".to_string(),
            password: "p<ss&".to_string(),
            user_name: "dispatch".to_string(),
            criteria,
        }
    }

    fn names(fields: &[(&'static str, String)]) -> Vec<&'static str> {
        fields.iter().map(|(name, _)| *name).collect()
    }

    #[test]
    fn test_minimal_criteria_only_emits_origin_state() {
        let criteria = LoadSearchCriteria {
            origin_state: "TX".to_string(),
            origin_city: Some("   ".to_string()),
            equipment_type: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(criteria_fields(&criteria), vec![("OriginState", "TX".to_string())]);
    }

    #[test]
    fn test_full_criteria_is_alphabetical() {
        let criteria = LoadSearchCriteria {
            origin_state: "TX,OK".to_string(),
            origin_city: Some("Dallas".to_string()),
            origin_country: Some("USA".to_string()),
            origin_latitude: Some(32),
            origin_longitude: Some(-96),
            origin_range: Some(150),
            destination_state: Some("GA".to_string()),
            destination_city: Some("Atlanta".to_string()),
            destination_country: Some("USA".to_string()),
            destination_range: Some(100),
            equipment_type: Some(vec!["V".to_string(), "R".to_string()]),
            load_type: Some("Full".to_string()),
            hours_old: Some(4),
            pickup_dates: Some(vec![
                NaiveDate::from_ymd_opt(2025, 3, 14).unwrap().and_hms_opt(0, 0, 0).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 15).unwrap().and_hms_opt(6, 30, 0).unwrap(),
            ]),
            page_number: Some(2),
            page_size: Some(50),
            sort_by: Some("Age".to_string()),
            sort_descending: Some(true),
        };

        let fields = criteria_fields(&criteria);
        let order = names(&fields);
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);
        assert_eq!(order.len(), 19);

        let lookup = |name: &str| -> Vec<&str> {
            fields
                .iter()
                .filter(|(n, _)| *n == name)
                .map(|(_, v)| v.as_str())
                .collect()
        };
        assert_eq!(lookup("EquipmentType"), vec!["V,R"]);
        assert_eq!(
            lookup("PickupDates"),
            vec!["2025-03-14T00:00:00", "2025-03-15T06:30:00"]
        );
        assert_eq!(lookup("SortDescending"), vec!["true"]);
        assert_eq!(lookup("OriginLongitude"), vec!["-96"]);
    }

    #[test]
    fn test_envelope_structure_and_namespaces() {
        let criteria = LoadSearchCriteria {
            origin_state: "TX".to_string(),
            page_size: Some(25),
            ..Default::default()
        };
        let xml = build_envelope(&request(Some(criteria))).unwrap();
        let root = Element::parse(&xml).unwrap();

        assert!(root.is(NS_SOAP_ENV, "Envelope"));
        assert!(root.child(NS_SOAP_ENV, "Header").is_some());
        let search = root
            .find(NS_V12, "GetMultipleLoadDetailResults")
            .and_then(|e| e.child(NS_V12, "searchRequest"))
            .unwrap();

        let children: Vec<&str> = search.elements().map(|e| e.name()).collect();
        assert_eq!(children, vec!["IntegrationId", "Password", "UserName", "Criteria"]);
        assert_eq!(search.child_text(NS_WEB, "Password").as_deref(), Some("p<ss&"));

        let criteria = search.child(NS_WEB_SEARCHING, "Criteria").unwrap();
        let names: Vec<&str> = criteria.elements().map(|e| e.name()).collect();
        assert_eq!(names, vec!["OriginState", "PageSize"]);
        assert!(xml.contains("p&lt;ss&amp;"));
    }

    #[test]
    fn test_envelope_without_criteria() {
        let xml = build_envelope(&request(None)).unwrap();
        assert!(!xml.contains("Criteria"));
        assert!(xml.contains("<web:UserName>dispatch</web:UserName>"));
    }

    #[test]
    fn test_redact_password() {
        let xml = build_envelope(&request(None)).unwrap();
        let redacted = redact_password(&xml);
        assert!(redacted.contains("<web:Password>***</web:Password>"));
        assert!(!redacted.contains("p&lt;ss"));
    }
}
