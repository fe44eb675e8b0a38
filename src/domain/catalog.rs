//! Reference codes understood by the TruckStop load search.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Country {
    Usa,
    Canada,
    Mexico,
}

impl Country {
    pub fn code(&self) -> &'static str {
        match self {
            Country::Usa => "USA",
            Country::Canada => "CAN",
            Country::Mexico => "MEX",
        }
    }

    pub fn regions(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Country::Usa => US_STATES,
            Country::Canada => CANADIAN_PROVINCES,
            Country::Mexico => MEXICAN_STATES,
        }
    }
}

impl FromStr for Country {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USA" | "US" => Ok(Country::Usa),
            "CAN" | "CA" => Ok(Country::Canada),
            "MEX" | "MX" => Ok(Country::Mexico),
            other => Err(format!("unknown country code: {}", other)),
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

pub const LOAD_TYPES: &[&str] = &["Nothing", "All", "Full", "Partial"];

pub const SORT_COLUMNS: &[&str] = &[
    "Age",
    "OriginCity",
    "OriginState",
    "DestinationCity",
    "DestinationState",
    "PickupDate",
    "Equipment",
    "Rate",
    "Company",
];

/// Maximum number of states accepted in one origin/destination filter.
pub const MAX_STATES: usize = 15;

pub const US_STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"), ("AK", "Alaska"), ("AZ", "Arizona"), ("AR", "Arkansas"),
    ("CA", "California"), ("CO", "Colorado"), ("CT", "Connecticut"), ("DE", "Delaware"),
    ("DC", "District of Columbia"), ("FL", "Florida"), ("GA", "Georgia"), ("HI", "Hawaii"),
    ("ID", "Idaho"), ("IL", "Illinois"), ("IN", "Indiana"), ("IA", "Iowa"),
    ("KS", "Kansas"), ("KY", "Kentucky"), ("LA", "Louisiana"), ("ME", "Maine"),
    ("MD", "Maryland"), ("MA", "Massachusetts"), ("MI", "Michigan"), ("MN", "Minnesota"),
    ("MS", "Mississippi"), ("MO", "Missouri"), ("MT", "Montana"), ("NE", "Nebraska"),
    ("NV", "Nevada"), ("NH", "New Hampshire"), ("NJ", "New Jersey"), ("NM", "New Mexico"),
    ("NY", "New York"), ("NC", "North Carolina"), ("ND", "North Dakota"), ("OH", "Ohio"),
    ("OK", "Oklahoma"), ("OR", "Oregon"), ("PA", "Pennsylvania"), ("RI", "Rhode Island"),
    ("SC", "South Carolina"), ("SD", "South Dakota"), ("TN", "Tennessee"), ("TX", "Texas"),
    ("UT", "Utah"), ("VT", "Vermont"), ("VA", "Virginia"), ("WA", "Washington"),
    ("WV", "West Virginia"), ("WI", "Wisconsin"), ("WY", "Wyoming"),
];

pub const CANADIAN_PROVINCES: &[(&str, &str)] = &[
    ("AB", "Alberta"), ("BC", "British Columbia"), ("MB", "Manitoba"),
    ("NB", "New Brunswick"), ("NL", "Newfoundland and Labrador"), ("NS", "Nova Scotia"),
    ("NT", "Northwest Territories"), ("ON", "Ontario"), ("PE", "Prince Edward Island"),
    ("QC", "Quebec"), ("SK", "Saskatchewan"), ("YT", "Yukon"),
];

pub const MEXICAN_STATES: &[(&str, &str)] = &[
    ("AG", "Aguascalientes"), ("BC", "Baja California"), ("BS", "Baja California Sur"),
    ("CH", "Chihuahua"), ("CL", "Colima"), ("CM", "Campeche"), ("CO", "Coahuila"),
    ("CS", "Chiapas"), ("DF", "Ciudad de México"), ("DG", "Durango"),
    ("GR", "Guerrero"), ("GT", "Guanajuato"), ("HG", "Hidalgo"), ("JA", "Jalisco"),
    ("MI", "Michoacán"), ("MO", "Morelos"), ("MX", "México"), ("NA", "Nayarit"),
    ("NL", "Nuevo León"), ("OA", "Oaxaca"), ("PU", "Puebla"), ("QR", "Quintana Roo"),
    ("QT", "Querétaro"), ("SI", "Sinaloa"), ("SL", "San Luis Potosí"), ("SO", "Sonora"),
    ("TB", "Tabasco"), ("TL", "Tlaxcala"), ("TM", "Tamaulipas"), ("VE", "Veracruz"),
    ("YU", "Yucatán"), ("ZT", "Zacatecas"),
];

/// (code, display name) pairs.
pub const EQUIPMENT_TYPES: &[(&str, &str)] = &[
    ("2F", "TWO FLATBED"),
    ("ANIM", "ANIMAL"),
    ("ANY", "ANY"),
    ("AUTO", "AUTO"),
    ("B-TR", "B TRAIN"),
    ("BDMP", "BELLY DUMP"),
    ("BEAM", "BEAM"),
    ("BELT", "BELT"),
    ("BOAT", "BOAT"),
    ("CH", "CHAIN"),
    ("CONG", "CONESTOGA"),
    ("CONT", "CONTAINER"),
    ("CV", "CURTAIN VAN"),
    ("DA", "DOUBLE DROP AIR"),
    ("DD", "DOUBLE DROP"),
    ("DDE", "DOUBLE DROP EXTENDABLE"),
    ("DUMP", "DUMP"),
    ("ENDP", "END DUMP"),
    ("F", "FLATBED"),
    ("FA", "FLATBED AIR"),
    ("FEXT", "FLATBED EXTENDABLE"),
    ("FINT", "FLATBED INTERMODAL"),
    ("FO", "FLATBED OVER"),
    ("FRV", "FLATBED REMOVABLE"),
    ("FSD", "FLATBED STEP DECK"),
    ("FSDV", "FLATBED STEP DECK VAN"),
    ("FV", "FLATBED VAN"),
    ("FVR", "FLATBED VAN REEFER"),
    ("FVV", "FLATBED VAN VENTED"),
    ("FVVR", "FLATBED VAN VENTED REEFER"),
    ("FWS", "FLATBED WITH SIDES"),
    ("HOPP", "HOPPER"),
    ("HS", "HOTSHOT"),
    ("HTU", "HAUL TRUCK"),
    ("LAF", "LANDALL FLATBED"),
    ("LB", "LOWBOY"),
    ("LBO", "LOWBOY OVER"),
    ("LDOT", "LOWBOY DOUBLE DROP"),
    ("MAXI", "MAXI FLATBED"),
    ("MBHM", "MOVING VAN"),
    ("PNEU", "PNEUMATIC"),
    ("PO", "POWER ONLY"),
    ("R", "REEFER"),
    ("RFV", "REEFER FLATBED VAN"),
    ("RGN", "REMOVABLE GOOSENECK"),
    ("RINT", "REEFER INTERMODAL"),
    ("ROLL", "ROLL OFF"),
    ("RPD", "REEFER PALLET"),
    ("RV", "REEFER VAN"),
    ("RVF", "REEFER VAN FLATBED"),
    ("SD", "STEP DECK"),
    ("SDL", "STEP DECK LOGISTIC"),
    ("SDO", "STEP DECK OVER"),
    ("SDRG", "STEP DECK REMOVABLE GOOSENECK"),
    ("SPEC", "SPECIALIZED"),
    ("SV", "STRAIGHT VAN"),
    ("TANK", "TANKER"),
    ("V", "VAN"),
    ("V-OT", "VAN OTHER"),
    ("VA", "VAN AIR"),
    ("VB", "VAN BLANKET"),
    ("VCAR", "VAN CARRIER"),
    ("VF", "VAN FLATBED"),
    ("VFR", "VAN FLATBED REEFER"),
    ("VINT", "VAN INTERMODAL"),
    ("IX", "VAN INSULATED"),
    ("VIVR", "VAN INSULATED VAN REEFER"),
    ("VLG", "VAN LOGISTICS"),
    ("VM", "VAN MOVING"),
    ("VR", "VAN REEFER"),
    ("VRDD", "VAN REEFER DOUBLE DROP"),
    ("VRF", "VAN REEFER FLATBED"),
    ("X", "VAN OPEN TOP"),
    ("VVR", "VAN VAN REEFER"),
    ("WALK", "WALKING FLOOR"),
];

/// `("TX", "TX - Texas")` style options for a country code; unknown or
/// missing countries have no options.
pub fn state_province_options(country: Option<&str>) -> Vec<(&'static str, String)> {
    let Some(country) = country.and_then(|c| c.parse::<Country>().ok()) else {
        return Vec::new();
    };
    country
        .regions()
        .iter()
        .map(|(code, name)| (*code, format!("{} - {}", code, name)))
        .collect()
}

pub fn is_known_region(country: Country, code: &str) -> bool {
    country
        .regions()
        .iter()
        .any(|(known, _)| known.eq_ignore_ascii_case(code.trim()))
}

/// Display name for an equipment code, or the code itself when unknown.
pub fn equipment_type_name(code: &str) -> String {
    EQUIPMENT_TYPES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| code.to_string())
}

pub fn is_known_equipment_type(code: &str) -> bool {
    EQUIPMENT_TYPES.iter().any(|(known, _)| *known == code)
}
