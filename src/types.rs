//! Type definitions for QRZ XML responses.

use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root response container for all QRZ XML responses
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename = "QRZDatabase")]
pub struct QrzResponse {
    /// API version
    #[serde(rename = "@version")]
    pub version: Option<String>,

    /// XML namespace
    #[serde(rename = "@xmlns")]
    pub xmlns: Option<String>,

    /// Session information (always present)
    #[serde(rename = "Session")]
    pub session: SessionInfo,

    /// Callsign record (present for successful lookups)
    #[serde(rename = "Callsign")]
    pub callsign: Option<CallsignRecord>,
}

/// Session information and status
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionInfo {
    /// Session key for authenticated requests
    #[serde(rename = "Key")]
    pub key: Option<String>,

    /// Number of lookups performed in current 24-hour period
    #[serde(rename = "Count")]
    pub count: Option<u32>,

    /// Subscription expiration date or "non-subscriber"
    #[serde(rename = "SubExp")]
    pub sub_exp: Option<String>,

    /// Current GMT time
    #[serde(rename = "GMTime")]
    pub gm_time: Option<String>,

    /// Informational message
    #[serde(rename = "Message")]
    pub message: Option<String>,

    /// Error message
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

impl SessionInfo {
    /// Check if session has a valid key
    pub fn has_valid_session(&self) -> bool {
        self.key.is_some()
    }

    /// Check if there's an error
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Get the error message if present
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Get the informational message if present
    pub fn info_message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Station record decoded from a `<Callsign>` element.
///
/// Every field except `call` is optional; elements absent from the XML
/// deserialize to `None` rather than an empty default. Records are immutable
/// once decoded - the client hands out clones, and callers are not expected
/// to modify them.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CallsignRecord {
    /// Primary callsign
    #[serde(rename = "call")]
    pub call: String,

    /// Other callsigns that resolve to this record
    #[serde(rename = "aliases")]
    pub aliases: Option<String>,

    /// DXCC entity ID (country code)
    #[serde(rename = "dxcc")]
    pub dxcc: Option<u32>,

    /// First name
    #[serde(rename = "fname")]
    pub fname: Option<String>,

    /// Last name
    #[serde(rename = "name")]
    pub name: Option<String>,

    /// Combined full name and nickname
    #[serde(rename = "name_fmt")]
    pub name_fmt: Option<String>,

    /// Address line 1 (house number and street)
    #[serde(rename = "addr1")]
    pub addr1: Option<String>,

    /// Address line 2 (city)
    #[serde(rename = "addr2")]
    pub addr2: Option<String>,

    /// State (USA only)
    #[serde(rename = "state")]
    pub state: Option<String>,

    /// ZIP/postal code
    #[serde(rename = "zip")]
    pub zip: Option<String>,

    /// Country name for QSL mailing address
    #[serde(rename = "country")]
    pub country: Option<String>,

    /// DXCC entity code for mailing address country
    #[serde(rename = "ccode")]
    pub ccode: Option<u32>,

    /// Latitude (signed decimal, S < 0 > N)
    #[serde(rename = "lat")]
    pub lat: Option<f64>,

    /// Longitude (signed decimal, W < 0 > E)
    #[serde(rename = "lon")]
    pub lon: Option<f64>,

    /// Maidenhead grid locator
    #[serde(rename = "grid")]
    pub grid: Option<String>,

    /// County name (USA)
    #[serde(rename = "county")]
    pub county: Option<String>,

    /// FIPS county identifier (USA)
    #[serde(rename = "fips")]
    pub fips: Option<String>,

    /// DXCC country name of the callsign
    #[serde(rename = "land")]
    pub land: Option<String>,

    /// License effective date (USA)
    #[serde(rename = "efdate", default, with = "license_date")]
    pub efdate: Option<NaiveDate>,

    /// License expiration date (USA)
    #[serde(rename = "expdate", default, with = "license_date")]
    pub expdate: Option<NaiveDate>,

    /// Previous callsign
    #[serde(rename = "p_call")]
    pub p_call: Option<String>,

    /// License class
    #[serde(rename = "class")]
    pub class: Option<String>,

    /// License type codes (USA)
    #[serde(rename = "codes")]
    pub codes: Option<String>,

    /// QSL manager info
    #[serde(rename = "qslmgr")]
    pub qslmgr: Option<String>,

    /// Email address
    #[serde(rename = "email")]
    pub email: Option<String>,

    /// Web page address
    #[serde(rename = "url")]
    pub url: Option<String>,

    /// QRZ web page views
    #[serde(rename = "u_views")]
    pub u_views: Option<u32>,

    /// Biography size in bytes
    #[serde(rename = "bio")]
    pub bio: Option<String>,

    /// Full URL of primary image
    #[serde(rename = "image")]
    pub image: Option<String>,

    /// QRZ database serial number
    #[serde(rename = "serial")]
    pub serial: Option<u32>,

    /// Last modified date
    #[serde(rename = "moddate")]
    pub moddate: Option<String>,

    /// Metro Service Area (USPS)
    #[serde(rename = "MSA")]
    pub msa: Option<String>,

    /// Telephone area code (USA)
    #[serde(rename = "AreaCode")]
    pub area_code: Option<String>,

    /// Time zone (USA)
    #[serde(rename = "TimeZone")]
    pub time_zone: Option<String>,

    /// GMT time offset
    #[serde(rename = "GMTOffset")]
    pub gmt_offset: Option<String>,

    /// Daylight saving time observed
    #[serde(rename = "DST")]
    pub dst: Option<String>,

    /// Will accept eQSL (Y/N or blank)
    #[serde(rename = "eqsl")]
    pub eqsl: Option<String>,

    /// Will return paper QSL (Y/N or blank)
    #[serde(rename = "mqsl")]
    pub mqsl: Option<String>,

    /// CQ Zone identifier
    #[serde(rename = "cqzone")]
    pub cqzone: Option<u32>,

    /// ITU Zone identifier
    #[serde(rename = "ituzone")]
    pub ituzone: Option<u32>,

    /// Source of lat/long data
    #[serde(rename = "geoloc")]
    pub geoloc: Option<String>,

    /// Operator's birth year
    #[serde(rename = "born")]
    pub born: Option<u32>,
}

impl CallsignRecord {
    /// Get the operator's full name.
    ///
    /// Prefers the service-formatted `name_fmt` field, falling back to
    /// combining the first and last name.
    pub fn fullname(&self) -> Option<String> {
        if let Some(fmt) = &self.name_fmt {
            return Some(fmt.clone());
        }
        match (&self.fname, &self.name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        }
    }

    /// Get coordinates as a tuple (lat, lon) if both are present
    pub fn latlon(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// Check if QSL information indicates acceptance of eQSL
    pub fn accepts_eqsl(&self) -> Option<bool> {
        self.eqsl.as_ref().map(|s| s.eq_ignore_ascii_case("y"))
    }

    /// Check if QSL information indicates will return paper QSL
    pub fn returns_paper_qsl(&self) -> Option<bool> {
        self.mqsl.as_ref().map(|s| s.eq_ignore_ascii_case("y"))
    }

    /// Serialize the record into a field-name to value mapping.
    ///
    /// Fields absent in the source XML appear as JSON null. The output
    /// round-trips losslessly through [`CallsignRecord::from_dict`].
    pub fn to_dict(&self) -> Result<Map<String, Value>> {
        let value = serde_json::to_value(self)?;
        Ok(value.as_object().cloned().unwrap_or_default())
    }

    /// Reconstruct a record from a mapping produced by [`CallsignRecord::to_dict`]
    pub fn from_dict(fields: Map<String, Value>) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(fields))?)
    }

    /// Serialize the record as a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Serde adapter for QRZ license dates (`YYYY-MM-DD`).
///
/// The service uses placeholder values such as `0000-00-00` for records
/// without license dates; anything unparseable decodes as absent.
mod license_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<String> = Option::deserialize(deserializer)?;
        Ok(value.and_then(|s| NaiveDate::parse_from_str(s.trim(), FORMAT).ok()))
    }
}

// Implement Default for CallsignRecord to help with testing
#[allow(clippy::derivable_impls)]
impl Default for CallsignRecord {
    fn default() -> Self {
        Self {
            call: String::new(),
            aliases: None,
            dxcc: None,
            fname: None,
            name: None,
            name_fmt: None,
            addr1: None,
            addr2: None,
            state: None,
            zip: None,
            country: None,
            ccode: None,
            lat: None,
            lon: None,
            grid: None,
            county: None,
            fips: None,
            land: None,
            efdate: None,
            expdate: None,
            p_call: None,
            class: None,
            codes: None,
            qslmgr: None,
            email: None,
            url: None,
            u_views: None,
            bio: None,
            image: None,
            serial: None,
            moddate: None,
            msa: None,
            area_code: None,
            time_zone: None,
            gmt_offset: None,
            dst: None,
            eqsl: None,
            mqsl: None,
            cqzone: None,
            ituzone: None,
            geoloc: None,
            born: None,
        }
    }
}
