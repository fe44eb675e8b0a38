//! Flattens a `GetMultipleLoadDetailResults` SOAP response into
//! [`MultipleLoadDetailReturn`].

use crate::core::envelope::{NS_TRUCKSTOP_OBJECTS, NS_V12};
use crate::core::fault::{find_fault, GENERIC_UPSTREAM_ERROR};
use crate::core::lenient::{parse_bool, parse_decimal, parse_int, parse_optional_datetime};
use crate::core::xml::Element;
use crate::domain::model::{EquipmentType, LoadDetail, MultipleLoadDetailReturn};

pub const NS_OBJECTS: &str = "http://schemas.datacontract.org/2004/07/WebServices.Objects";

pub const INVALID_RESPONSE: &str = "Invalid response from TruckStop API";
pub const UNPROCESSABLE_RESPONSE: &str = "Failed to process TruckStop API response";

pub fn parse_response(xml: &str) -> MultipleLoadDetailReturn {
    match Element::parse(xml) {
        Ok(root) => interpret(&root),
        Err(e) => {
            tracing::warn!("Failed to parse response: {}", e);
            MultipleLoadDetailReturn::error(UNPROCESSABLE_RESPONSE)
        }
    }
}

fn interpret(root: &Element) -> MultipleLoadDetailReturn {
    let Some(result) = root.find(NS_V12, "GetMultipleLoadDetailResultsResult") else {
        if let Some(fault) = find_fault(root) {
            return MultipleLoadDetailReturn::error(fault.message());
        }
        tracing::warn!("Could not find result element in response");
        return MultipleLoadDetailReturn::error(INVALID_RESPONSE);
    };

    if let Some(message) = reported_error(result) {
        return MultipleLoadDetailReturn::error(message);
    }

    let Some(details) = result.child(NS_OBJECTS, "DetailResults") else {
        return MultipleLoadDetailReturn::success(Vec::new());
    };

    let loads: Vec<LoadDetail> = details
        .children(NS_OBJECTS, "MultipleLoadDetailResult")
        .map(parse_load)
        .collect();

    tracing::debug!("Parsed {} loads from response", loads.len());
    MultipleLoadDetailReturn::success(loads)
}

/// Error reported inside an otherwise well-formed result: either a non-empty
/// `Errors` collection or a `HasError` flag.
fn reported_error(result: &Element) -> Option<String> {
    let message_or_default = |text: Option<String>| {
        text.map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| GENERIC_UPSTREAM_ERROR.to_string())
    };

    if let Some(errors) = result.child_local("Errors").filter(|e| e.has_elements()) {
        return Some(message_or_default(errors.elements().next().map(Element::text)));
    }

    let flagged = result
        .child_local("HasError")
        .and_then(|e| parse_bool(Some(e.text().as_str())))
        .unwrap_or(false);
    if flagged {
        return Some(message_or_default(
            result.child_local("ErrorMessage").map(Element::text),
        ));
    }

    None
}

fn parse_equipment_type(element: &Element) -> EquipmentType {
    let text = |name: &str| element.child_text(NS_TRUCKSTOP_OBJECTS, name);
    let int = |name: &str| parse_int(text(name).as_deref());
    let flag = |name: &str| parse_bool(text(name).as_deref());

    EquipmentType {
        category: text("Category"),
        category_id: int("CategoryId"),
        code: text("Code"),
        description: text("Description"),
        full_load: flag("FullLoad"),
        id: int("Id"),
        is_categorizable: flag("IsCategorizable"),
        is_combo: flag("IsCombo"),
        is_truck_post: flag("IsTruckPost"),
        map_to_id: int("MapToId"),
        required_option: text("RequiredOption"),
        webservice_only: flag("WebserviceOnly"),
    }
}

fn parse_load(load: &Element) -> LoadDetail {
    let text = |name: &str| load.child_text(NS_OBJECTS, name);
    let int = |name: &str| parse_int(text(name).as_deref());
    let decimal = |name: &str| parse_decimal(text(name).as_deref());
    let flag = |name: &str| parse_bool(text(name).as_deref());

    let equipment_options = load
        .child(NS_OBJECTS, "EquipmentOptions")
        .filter(|e| !e.is_nil())
        .map(|options| {
            options
                .children(NS_TRUCKSTOP_OBJECTS, "TrailerOptionType")
                .map(Element::text)
                .collect()
        });
    let equipment_types = load
        .child(NS_OBJECTS, "EquipmentTypes")
        .filter(|e| !e.is_nil())
        .map(parse_equipment_type);

    LoadDetail {
        id: text("ID"),
        age: text("Age"),
        bond: decimal("Bond"),
        bond_type_id: text("BondTypeID"),
        credit: text("Credit"),
        dot_number: text("DOTNumber"),
        deleted_id: int("DeletedId"),
        delivery_date: text("DeliveryDate"),
        delivery_time: text("DeliveryTime"),
        destination_city: text("DestinationCity"),
        destination_country: text("DestinationCountry"),
        destination_distance: int("DestinationDistance"),
        destination_state: text("DestinationState"),
        destination_zip: text("DestinationZip"),
        distance: int("Distance"),
        entered: parse_optional_datetime(text("Entered").as_deref()),
        equipment: text("Equipment"),
        equipment_options,
        equipment_types,
        experience_factor: text("ExperienceFactor"),
        fuel_cost: decimal("FuelCost"),
        handle_name: text("HandleName"),
        has_bonding: flag("HasBonding"),
        is_deleted: flag("IsDeleted"),
        is_friend: flag("IsFriend"),
        length: decimal("Length"),
        load_type: text("LoadType"),
        mc_number: text("MCNumber"),
        mileage: int("Mileage"),
        origin_city: text("OriginCity"),
        origin_country: text("OriginCountry"),
        origin_distance: int("OriginDistance"),
        origin_state: text("OriginState"),
        origin_zip: text("OriginZip"),
        payment_amount: decimal("PaymentAmount"),
        pickup_date: text("PickupDate"),
        pickup_time: text("PickupTime"),
        point_of_contact: text("PointOfContact"),
        point_of_contact_phone: text("PointOfContactPhone"),
        price_per_gallon: decimal("PricePerGallon"),
        quantity: int("Quantity"),
        spec_info: text("SpecInfo"),
        stops: int("Stops"),
        tmc_number: text("TMCNumber"),
        truck_company_city: text("TruckCompanyCity"),
        truck_company_email: text("TruckCompanyEmail"),
        truck_company_fax: text("TruckCompanyFax"),
        truck_company_id: int("TruckCompanyId"),
        truck_company_name: text("TruckCompanyName"),
        truck_company_phone: text("TruckCompanyPhone"),
        truck_company_state: text("TruckCompanyState"),
        weight: decimal("Weight"),
        width: decimal("Width"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn wrap(result_body: &str) -> String {
        format!(
            r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
  <s:Body>
    <GetMultipleLoadDetailResultsResponse xmlns="http://webservices.truckstop.com/v12">
      <GetMultipleLoadDetailResultsResult xmlns:a="http://schemas.datacontract.org/2004/07/WebServices.Objects" xmlns:i="http://www.w3.org/2001/XMLSchema-instance">
        {}
      </GetMultipleLoadDetailResultsResult>
    </GetMultipleLoadDetailResultsResponse>
  </s:Body>
</s:Envelope>"#,
            result_body
        )
    }

    #[test]
    fn test_parses_loads_and_nested_equipment() {
        let xml = wrap(
            r#"<Errors xmlns="http://schemas.datacontract.org/2004/07/WebServices" i:nil="true"/>
        <a:DetailResults>
          <a:MultipleLoadDetailResult>
            <a:ID>88231</a:ID>
            <a:Bond>0</a:Bond>
            <a:Entered>2025-03-14T09:26:53</a:Entered>
            <a:EquipmentOptions xmlns:b="http://schemas.datacontract.org/2004/07/Truckstop2.Objects">
              <b:TrailerOptionType>Tarps</b:TrailerOptionType>
              <b:TrailerOptionType>Hazardous</b:TrailerOptionType>
            </a:EquipmentOptions>
            <a:EquipmentTypes xmlns:b="http://schemas.datacontract.org/2004/07/Truckstop2.Objects">
              <b:Category>Flatbeds</b:Category>
              <b:CategoryId>2</b:CategoryId>
              <b:Code>F</b:Code>
              <b:Description>Flatbed</b:Description>
              <b:FullLoad i:nil="true"/>
              <b:IsCombo>false</b:IsCombo>
            </a:EquipmentTypes>
            <a:HasBonding>true</a:HasBonding>
            <a:Length>48</a:Length>
            <a:Mileage>not-a-number</a:Mileage>
            <a:OriginCity>Dallas</a:OriginCity>
            <a:PaymentAmount>2150.75</a:PaymentAmount>
            <a:TruckCompanyName>Acme &amp; Sons</a:TruckCompanyName>
          </a:MultipleLoadDetailResult>
          <a:MultipleLoadDetailResult>
            <a:ID>88232</a:ID>
          </a:MultipleLoadDetailResult>
        </a:DetailResults>"#,
        );

        let result = parse_response(&xml);
        assert!(!result.has_error, "{:?}", result.error_message);
        assert_eq!(result.total_results, 2);

        let loads = result.loads.unwrap();
        let first = &loads[0];
        assert_eq!(first.id.as_deref(), Some("88231"));
        assert_eq!(first.bond, Some(Decimal::ZERO));
        assert_eq!(first.entered.unwrap().to_string(), "2025-03-14 09:26:53");
        assert_eq!(
            first.equipment_options,
            Some(vec!["Tarps".to_string(), "Hazardous".to_string()])
        );
        let equipment = first.equipment_types.as_ref().unwrap();
        assert_eq!(equipment.code.as_deref(), Some("F"));
        assert_eq!(equipment.category_id, Some(2));
        assert_eq!(equipment.full_load, None);
        assert_eq!(equipment.is_combo, Some(false));
        assert_eq!(first.has_bonding, Some(true));
        assert_eq!(first.mileage, None);
        assert_eq!(first.payment_amount, Decimal::from_str("2150.75").ok());
        assert_eq!(first.truck_company_name.as_deref(), Some("Acme & Sons"));

        assert_eq!(loads[1].id.as_deref(), Some("88232"));
        assert_eq!(loads[1].equipment_types, None);
    }

    #[test]
    fn test_nil_nested_records_are_absent() {
        let xml = wrap(
            r#"<a:DetailResults>
          <a:MultipleLoadDetailResult>
            <a:ID>7</a:ID>
            <a:EquipmentOptions i:nil="true"/>
            <a:EquipmentTypes i:nil="true"/>
          </a:MultipleLoadDetailResult>
        </a:DetailResults>"#,
        );
        let loads = parse_response(&xml).loads.unwrap();
        assert_eq!(loads[0].equipment_options, None);
        assert_eq!(loads[0].equipment_types, None);
    }

    #[test]
    fn test_missing_detail_results_is_empty_success() {
        let result = parse_response(&wrap(""));
        assert!(!result.has_error);
        assert_eq!(result.total_results, 0);
        assert_eq!(result.loads, Some(vec![]));
    }

    #[test]
    fn test_errors_collection_short_circuits() {
        let xml = wrap(
            r#"<Errors xmlns="http://schemas.datacontract.org/2004/07/WebServices">
          <Error><ErrorMessage>Invalid Integration Id</ErrorMessage></Error>
        </Errors>
        <a:DetailResults><a:MultipleLoadDetailResult><a:ID>1</a:ID></a:MultipleLoadDetailResult></a:DetailResults>"#,
        );
        let result = parse_response(&xml);
        assert!(result.has_error);
        assert_eq!(result.error_message.as_deref(), Some("Invalid Integration Id"));
        assert!(result.loads.is_none());
    }

    #[test]
    fn test_has_error_flag() {
        let xml = wrap("<HasError>true</HasError><ErrorMessage>Search window too large</ErrorMessage>");
        let result = parse_response(&xml);
        assert_eq!(result.error_message.as_deref(), Some("Search window too large"));

        let xml = wrap("<HasError>true</HasError>");
        let result = parse_response(&xml);
        assert_eq!(result.error_message.as_deref(), Some(GENERIC_UPSTREAM_ERROR));
    }

    #[test]
    fn test_missing_result_element() {
        let xml = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body/></s:Envelope>"#;
        let result = parse_response(xml);
        assert_eq!(result.error_message.as_deref(), Some(INVALID_RESPONSE));
    }

    #[test]
    fn test_fault_in_success_status_body() {
        let xml = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body><s:Fault><faultcode>s:Client</faultcode><faultstring>Denied</faultstring></s:Fault></s:Body></s:Envelope>"#;
        let result = parse_response(xml);
        assert_eq!(result.error_message.as_deref(), Some("SOAP Fault [s:Client]: Denied"));
    }

    #[test]
    fn test_malformed_xml() {
        let result = parse_response("<s:Envelope><unclosed>");
        assert!(result.has_error);
        assert_eq!(result.error_message.as_deref(), Some(UNPROCESSABLE_RESPONSE));
    }
}
