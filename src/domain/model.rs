use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// TruckStop integration credentials, as saved by the client.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub integration_id: String,
    pub user_name: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("integration_id", &self.integration_id)
            .field("user_name", &self.user_name)
            .field("password", &"***")
            .finish()
    }
}

/// Body accepted by `POST /api/truckstop/load-search`.
#[derive(Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadSearchApiRequest {
    #[serde(default, alias = "IntegrationId")]
    pub integration_id: String,
    #[serde(default, alias = "Password")]
    pub password: String,
    #[serde(default, alias = "UserName")]
    pub user_name: String,
    #[serde(default, alias = "Criteria", skip_serializing_if = "Option::is_none")]
    pub criteria: Option<LoadSearchCriteria>,
}

impl LoadSearchApiRequest {
    pub fn new(credentials: &Credentials, criteria: Option<LoadSearchCriteria>) -> Self {
        Self {
            integration_id: credentials.integration_id.clone(),
            password: credentials.password.clone(),
            user_name: credentials.user_name.clone(),
            criteria,
        }
    }
}

impl fmt::Debug for LoadSearchApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadSearchApiRequest")
            .field("integration_id", &self.integration_id)
            .field("user_name", &self.user_name)
            .field("password", &"***")
            .field("criteria", &self.criteria)
            .finish()
    }
}

/// Search filters. State fields are comma-separated lists of up to 15 codes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadSearchCriteria {
    #[serde(default, alias = "OriginState")]
    pub origin_state: String,
    #[serde(default, alias = "OriginCity", skip_serializing_if = "Option::is_none")]
    pub origin_city: Option<String>,
    #[serde(default, alias = "OriginCountry", skip_serializing_if = "Option::is_none")]
    pub origin_country: Option<String>,
    #[serde(default, alias = "OriginLatitude", skip_serializing_if = "Option::is_none")]
    pub origin_latitude: Option<i32>,
    #[serde(default, alias = "OriginLongitude", skip_serializing_if = "Option::is_none")]
    pub origin_longitude: Option<i32>,
    #[serde(default, alias = "OriginRange", skip_serializing_if = "Option::is_none")]
    pub origin_range: Option<i32>,

    #[serde(default, alias = "DestinationState", skip_serializing_if = "Option::is_none")]
    pub destination_state: Option<String>,
    #[serde(default, alias = "DestinationCity", skip_serializing_if = "Option::is_none")]
    pub destination_city: Option<String>,
    #[serde(default, alias = "DestinationCountry", skip_serializing_if = "Option::is_none")]
    pub destination_country: Option<String>,
    #[serde(default, alias = "DestinationRange", skip_serializing_if = "Option::is_none")]
    pub destination_range: Option<i32>,

    #[serde(
        default,
        alias = "EquipmentType",
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub equipment_type: Option<Vec<String>>,
    #[serde(default, alias = "LoadType", skip_serializing_if = "Option::is_none")]
    pub load_type: Option<String>,

    #[serde(default, alias = "HoursOld", skip_serializing_if = "Option::is_none")]
    pub hours_old: Option<i32>,
    #[serde(
        default,
        alias = "PickupDates",
        deserialize_with = "pickup_dates",
        skip_serializing_if = "Option::is_none"
    )]
    pub pickup_dates: Option<Vec<NaiveDateTime>>,

    #[serde(default, alias = "PageNumber", skip_serializing_if = "Option::is_none")]
    pub page_number: Option<i32>,
    #[serde(default, alias = "PageSize", skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i32>,

    #[serde(default, alias = "SortBy", skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, alias = "SortDescending", skip_serializing_if = "Option::is_none")]
    pub sort_descending: Option<bool>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<OneOrMany>::deserialize(deserializer)?.map(|value| match value {
            OneOrMany::One(single) => vec![single],
            OneOrMany::Many(list) => list,
        }),
    )
}

fn pickup_dates<'de, D>(deserializer: D) -> Result<Option<Vec<NaiveDateTime>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<String>> = Option::deserialize(deserializer)?;
    raw.map(|dates| {
        dates
            .iter()
            .map(|s| {
                crate::core::lenient::parse_datetime(s).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid pickup date: {}", s))
                })
            })
            .collect()
    })
    .transpose()
}

/// Flattened upstream load record. Every field is optional since the
/// upstream omits or garbles them freely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadDetail {
    pub id: Option<String>,
    pub age: Option<String>,
    pub bond: Option<Decimal>,
    #[serde(rename = "bondTypeID")]
    pub bond_type_id: Option<String>,
    pub credit: Option<String>,
    pub dot_number: Option<String>,
    pub deleted_id: Option<i32>,
    pub delivery_date: Option<String>,
    pub delivery_time: Option<String>,
    pub destination_city: Option<String>,
    pub destination_country: Option<String>,
    pub destination_distance: Option<i32>,
    pub destination_state: Option<String>,
    pub destination_zip: Option<String>,
    pub distance: Option<i32>,
    pub entered: Option<NaiveDateTime>,
    pub equipment: Option<String>,
    pub equipment_options: Option<Vec<String>>,
    pub equipment_types: Option<EquipmentType>,
    pub experience_factor: Option<String>,
    pub fuel_cost: Option<Decimal>,
    pub handle_name: Option<String>,
    pub has_bonding: Option<bool>,
    pub is_deleted: Option<bool>,
    pub is_friend: Option<bool>,
    pub length: Option<Decimal>,
    pub load_type: Option<String>,
    pub mc_number: Option<String>,
    pub mileage: Option<i32>,
    pub origin_city: Option<String>,
    pub origin_country: Option<String>,
    pub origin_distance: Option<i32>,
    pub origin_state: Option<String>,
    pub origin_zip: Option<String>,
    pub payment_amount: Option<Decimal>,
    pub pickup_date: Option<String>,
    pub pickup_time: Option<String>,
    pub point_of_contact: Option<String>,
    pub point_of_contact_phone: Option<String>,
    pub price_per_gallon: Option<Decimal>,
    pub quantity: Option<i32>,
    pub spec_info: Option<String>,
    pub stops: Option<i32>,
    pub tmc_number: Option<String>,
    pub truck_company_city: Option<String>,
    pub truck_company_email: Option<String>,
    pub truck_company_fax: Option<String>,
    pub truck_company_id: Option<i32>,
    pub truck_company_name: Option<String>,
    pub truck_company_phone: Option<String>,
    pub truck_company_state: Option<String>,
    pub weight: Option<Decimal>,
    pub width: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct EquipmentType {
    pub category: Option<String>,
    pub category_id: Option<i32>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub full_load: Option<bool>,
    pub id: Option<i32>,
    pub is_categorizable: Option<bool>,
    pub is_combo: Option<bool>,
    pub is_truck_post: Option<bool>,
    pub map_to_id: Option<i32>,
    pub required_option: Option<String>,
    pub webservice_only: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MultipleLoadDetailReturn {
    #[serde(default)]
    pub loads: Option<Vec<LoadDetail>>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub has_error: bool,
    #[serde(default)]
    pub total_results: i32,
}

impl MultipleLoadDetailReturn {
    pub fn success(loads: Vec<LoadDetail>) -> Self {
        let total_results = i32::try_from(loads.len()).unwrap_or(i32::MAX);
        Self {
            loads: Some(loads),
            error_message: None,
            has_error: false,
            total_results,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            loads: None,
            error_message: Some(message.into()),
            has_error: true,
            total_results: 0,
        }
    }
}

/// Body returned with HTTP 400.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: Option<String>,
}
