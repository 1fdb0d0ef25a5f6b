use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid expiry date {input:?}: expected a ctime-style timestamp such as \"Mon Jan 2 15:04:05 MST 2006\"")]
pub struct ParseExpiryError {
    input: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    pub id: i64,
    pub code: String,
    pub discount_type: String,
    pub value: f64,
    pub minimum_order_value: Option<f64>,
    pub max_redemptions: Option<i64>,
    pub redeemed_count: i64,
    pub expiry_date: DateTime<Utc>,
    pub applicable_products: Vec<i64>,
    pub is_active: bool,
    pub user_specific: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCouponRequest {
    pub code: String,
    pub discount_type: String,
    pub value: f64,
    #[serde(default)]
    pub minimum_order_value: Option<f64>,
    #[serde(default)]
    pub max_redemptions: Option<i64>,
    pub expiry_date: String,
    #[serde(default)]
    pub applicable_products: Vec<i64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub user_specific: bool,
}

fn default_true() -> bool {
    true
}

impl Coupon {
    /// Build a coupon from a creation payload. The id stays zero until storage
    /// assigns one; `created_at`/`updated_at` are stamped with the current UTC
    /// time. An unparsable expiry date is a returned error, never a zero-value
    /// coupon.
    pub fn from_request(request: CreateCouponRequest) -> Result<Self, ParseExpiryError> {
        let expiry_date = parse_expiry(&request.expiry_date)?;
        let now = Utc::now();

        Ok(Self {
            id: 0,
            code: request.code,
            discount_type: request.discount_type,
            value: request.value,
            minimum_order_value: request.minimum_order_value,
            max_redemptions: request.max_redemptions,
            redeemed_count: 0,
            expiry_date,
            applicable_products: request.applicable_products,
            is_active: request.is_active,
            user_specific: request.user_specific,
            created_at: now,
            updated_at: now,
        })
    }
}

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Parse a ctime-style timestamp such as `"Mon Jan 2 15:04:05 MST 2030"`.
///
/// The weekday and zone-abbreviation fields are accepted but not interpreted:
/// zone abbreviations are ambiguous, so the remaining fields are read as UTC,
/// and the weekday is not checked against the calendar date.
fn parse_expiry(input: &str) -> Result<DateTime<Utc>, ParseExpiryError> {
    let err = || ParseExpiryError {
        input: input.to_string(),
    };

    let tokens: Vec<&str> = input.split_whitespace().collect();
    let &[weekday, month, day, time, _zone, year] = tokens.as_slice() else {
        return Err(err());
    };

    if !WEEKDAYS.iter().any(|w| w.eq_ignore_ascii_case(weekday)) {
        return Err(err());
    }

    let rebuilt = format!("{month} {day} {time} {year}");
    let naive = NaiveDateTime::parse_from_str(&rebuilt, "%b %e %H:%M:%S %Y").map_err(|_| err())?;

    Ok(naive.and_utc())
}
