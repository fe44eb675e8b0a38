use crate::core::envelope::NS_SOAP_ENV;
use crate::core::xml::Element;

pub const NS_SOAP12_ENV: &str = "http://www.w3.org/2003/05/soap-envelope";

/// Fallback used whenever the upstream signals failure without a readable reason.
pub const GENERIC_UPSTREAM_ERROR: &str = "TruckStop API returned an error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapFault {
    pub code: Option<String>,
    pub reason: Option<String>,
}

impl SoapFault {
    pub fn message(&self) -> String {
        format!(
            "SOAP Fault [{}]: {}",
            self.code.as_deref().unwrap_or("Unknown"),
            self.reason.as_deref().unwrap_or(GENERIC_UPSTREAM_ERROR)
        )
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Looks for a SOAP 1.1 or 1.2 `Fault` anywhere under `root`.
pub fn find_fault(root: &Element) -> Option<SoapFault> {
    if let Some(fault) = root.find(NS_SOAP_ENV, "Fault") {
        return Some(SoapFault {
            code: fault.child_local("faultcode").map(Element::text).and_then(non_blank),
            reason: fault.child_local("faultstring").map(Element::text).and_then(non_blank),
        });
    }

    root.find(NS_SOAP12_ENV, "Fault").map(|fault| SoapFault {
        code: fault
            .child(NS_SOAP12_ENV, "Code")
            .and_then(|c| c.child(NS_SOAP12_ENV, "Value"))
            .map(Element::text)
            .and_then(non_blank),
        reason: fault
            .child(NS_SOAP12_ENV, "Reason")
            .and_then(|r| r.child(NS_SOAP12_ENV, "Text"))
            .map(Element::text)
            .and_then(non_blank),
    })
}

/// Error message for a raw fault body. Anything unreadable collapses to the
/// generic upstream message.
pub fn fault_message(xml: &str) -> String {
    match Element::parse(xml) {
        Ok(root) => find_fault(&root)
            .map(|fault| fault.message())
            .unwrap_or_else(|| GENERIC_UPSTREAM_ERROR.to_string()),
        Err(e) => {
            tracing::debug!("Could not parse SOAP fault body: {}", e);
            GENERIC_UPSTREAM_ERROR.to_string()
        }
    }
}
