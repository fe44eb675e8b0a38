//! Terminal and file presentation of load search results.

use crate::domain::catalog::equipment_type_name;
use crate::domain::model::{LoadDetail, MultipleLoadDetailReturn};
use crate::utils::elapsed::elapsed_since;
use crate::utils::error::{ProxyError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

pub const EMPTY_CELL: &str = "-";

pub const TABLE_HEADERS: [&str; 11] = [
    "Time Elapsed",
    "Pickup Date",
    "Equipment",
    "Mode",
    "Company",
    "Origin",
    "Destination",
    "Length",
    "Weight",
    "Rate",
    "Contact",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(ProxyError::validation(format!(
                "unknown output format '{}' (expected table, json or csv)",
                other
            ))),
        }
    }
}

fn text(value: &Option<String>) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(EMPTY_CELL)
        .to_string()
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `45000.50` becomes `45,000.5`.
pub fn format_number(value: Decimal) -> String {
    let normalized = value.normalize().to_string();
    let (sign, unsigned) = match normalized.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", normalized.as_str()),
    };
    match unsigned.split_once('.') {
        Some((whole, fraction)) => format!("{}{}.{}", sign, group_thousands(whole), fraction),
        None => format!("{}{}", sign, group_thousands(unsigned)),
    }
}

fn place(city: &Option<String>, state: &Option<String>) -> String {
    match (text(city).as_str(), text(state).as_str()) {
        (EMPTY_CELL, EMPTY_CELL) => EMPTY_CELL.to_string(),
        (city, EMPTY_CELL) => city.to_string(),
        (EMPTY_CELL, state) => state.to_string(),
        (city, state) => format!("{}, {}", city, state),
    }
}

fn decimal_cell(value: Option<Decimal>, render: impl Fn(String) -> String) -> String {
    match value {
        Some(v) if !v.is_zero() => render(format_number(v)),
        _ => EMPTY_CELL.to_string(),
    }
}

fn yes_no(value: Option<bool>) -> String {
    match value {
        Some(true) => "Yes".to_string(),
        Some(false) => "No".to_string(),
        None => EMPTY_CELL.to_string(),
    }
}

fn opt_display<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| EMPTY_CELL.to_string())
}

pub fn equipment_label(load: &LoadDetail) -> String {
    let description = load
        .equipment_types
        .as_ref()
        .and_then(|e| e.description.clone());
    match (text(&description).as_str(), text(&load.equipment).as_str()) {
        (EMPTY_CELL, EMPTY_CELL) => EMPTY_CELL.to_string(),
        (EMPTY_CELL, code) => equipment_type_name(code),
        (label, _) => label.to_string(),
    }
}

/// Contact name followed by phone, either one alone when the other is blank.
pub fn contact_label(load: &LoadDetail) -> String {
    match (text(&load.point_of_contact).as_str(), text(&load.point_of_contact_phone).as_str()) {
        (EMPTY_CELL, phone) => phone.to_string(),
        (name, EMPTY_CELL) => name.to_string(),
        (name, phone) => format!("{} {}", name, phone),
    }
}

/// One table row, in `TABLE_HEADERS` order.
pub fn load_row(load: &LoadDetail, now: DateTime<Utc>) -> Vec<String> {
    vec![
        load.entered
            .map(|entered| elapsed_since(entered, now))
            .unwrap_or_else(|| EMPTY_CELL.to_string()),
        text(&load.pickup_date),
        equipment_label(load),
        text(&load.load_type),
        text(&load.truck_company_name),
        place(&load.origin_city, &load.origin_state),
        place(&load.destination_city, &load.destination_state),
        decimal_cell(load.length, |n| format!("{}'", n)),
        decimal_cell(load.weight, |n| format!("{} lbs", n)),
        decimal_cell(load.payment_amount, |n| format!("${}", n)),
        contact_label(load),
    ]
}

pub fn render_table(loads: &[LoadDetail], now: DateTime<Utc>) -> String {
    let rows: Vec<Vec<String>> = loads.iter().map(|load| load_row(load, now)).collect();

    let mut widths: Vec<usize> = TABLE_HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(line(TABLE_HEADERS.to_vec()));
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &rows {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    out.join("\n")
}

/// Grouped key/value sections for a single load.
pub fn detail_sections(load: &LoadDetail) -> Vec<(&'static str, Vec<(&'static str, String)>)> {
    vec![
        (
            "Company",
            vec![
                ("Name", text(&load.truck_company_name)),
                ("City", text(&load.truck_company_city)),
                ("State", text(&load.truck_company_state)),
                ("MC Number", text(&load.mc_number)),
                ("DOT Number", text(&load.dot_number)),
                ("Credit", text(&load.credit)),
                ("Experience", text(&load.experience_factor)),
                ("Bonded", yes_no(load.has_bonding)),
            ],
        ),
        (
            "Contact",
            vec![
                ("Point of Contact", text(&load.point_of_contact)),
                ("Phone", text(&load.point_of_contact_phone)),
                ("Company Phone", text(&load.truck_company_phone)),
                ("Fax", text(&load.truck_company_fax)),
                ("Email", text(&load.truck_company_email)),
            ],
        ),
        (
            "Load",
            vec![
                ("ID", text(&load.id)),
                ("Equipment", equipment_label(load)),
                ("Mode", text(&load.load_type)),
                ("Length", decimal_cell(load.length, |n| format!("{}'", n))),
                ("Width", decimal_cell(load.width, |n| format!("{}'", n))),
                ("Weight", decimal_cell(load.weight, |n| format!("{} lbs", n))),
                ("Rate", decimal_cell(load.payment_amount, |n| format!("${}", n))),
                ("Quantity", opt_display(load.quantity)),
                ("Stops", opt_display(load.stops)),
                ("Mileage", opt_display(load.mileage)),
            ],
        ),
        (
            "Origin",
            vec![
                ("Location", place(&load.origin_city, &load.origin_state)),
                ("Country", text(&load.origin_country)),
                ("Zip", text(&load.origin_zip)),
                ("Distance", opt_display(load.origin_distance)),
            ],
        ),
        (
            "Destination",
            vec![
                ("Location", place(&load.destination_city, &load.destination_state)),
                ("Country", text(&load.destination_country)),
                ("Zip", text(&load.destination_zip)),
                ("Distance", opt_display(load.destination_distance)),
            ],
        ),
        (
            "Dates",
            vec![
                ("Pickup", text(&load.pickup_date)),
                ("Pickup Time", text(&load.pickup_time)),
                ("Delivery", text(&load.delivery_date)),
                ("Delivery Time", text(&load.delivery_time)),
                ("Entered", opt_display(load.entered)),
                ("Age", text(&load.age)),
            ],
        ),
        (
            "Other",
            vec![
                ("Special Info", text(&load.spec_info)),
                (
                    "Options",
                    load.equipment_options
                        .as_ref()
                        .filter(|o| !o.is_empty())
                        .map(|o| o.join(", "))
                        .unwrap_or_else(|| EMPTY_CELL.to_string()),
                ),
                ("Fuel Cost", decimal_cell(load.fuel_cost, |n| format!("${}", n))),
                ("Friend", yes_no(load.is_friend)),
                ("Deleted", yes_no(load.is_deleted)),
            ],
        ),
    ]
}

pub fn render_detail(load: &LoadDetail) -> String {
    let mut out = Vec::new();
    for (title, fields) in detail_sections(load) {
        out.push(format!("== {} ==", title));
        let width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (label, value) in fields {
            out.push(format!("  {:<width$}  {}", label, value, width = width));
        }
    }
    out.join("\n")
}

pub fn render_csv(loads: &[LoadDetail], now: DateTime<Utc>) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(TABLE_HEADERS)?;
    for load in loads {
        writer.write_record(load_row(load, now))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ProxyError::IoError(std::io::Error::new(e.error().kind(), e.to_string())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn render_json(result: &MultipleLoadDetailReturn) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Everything printed for one search round.
pub fn render_result(
    result: &MultipleLoadDetailReturn,
    format: OutputFormat,
    now: DateTime<Utc>,
) -> Result<String> {
    let loads = result.loads.as_deref().unwrap_or_default();
    match format {
        OutputFormat::Json => render_json(result),
        OutputFormat::Csv => render_csv(loads, now),
        OutputFormat::Table if loads.is_empty() => Ok("No loads found".to_string()),
        OutputFormat::Table => Ok(format!(
            "{}\n\n{} load(s), {} total",
            render_table(loads, now),
            loads.len(),
            result.total_results
        )),
    }
}
