//! # Country Names
//!
//! Static ISO 3166-1 alpha-2 name table used to make check reasons readable.
//! Codes missing from the table are printed bare.

use crate::identity::{CountryCode, ResolvedCountry};

/// `(code, name)` pairs, sorted by code for binary search.
const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("AE", "United Arab Emirates"),
    ("AR", "Argentina"),
    ("AT", "Austria"),
    ("AU", "Australia"),
    ("BD", "Bangladesh"),
    ("BE", "Belgium"),
    ("BR", "Brazil"),
    ("CA", "Canada"),
    ("CH", "Switzerland"),
    ("CL", "Chile"),
    ("CN", "China"),
    ("CO", "Colombia"),
    ("CZ", "Czechia"),
    ("DE", "Germany"),
    ("DK", "Denmark"),
    ("EG", "Egypt"),
    ("ES", "Spain"),
    ("FI", "Finland"),
    ("FR", "France"),
    ("GB", "United Kingdom"),
    ("GR", "Greece"),
    ("HK", "Hong Kong"),
    ("ID", "Indonesia"),
    ("IE", "Ireland"),
    ("IL", "Israel"),
    ("IN", "India"),
    ("IT", "Italy"),
    ("JP", "Japan"),
    ("KE", "Kenya"),
    ("KR", "South Korea"),
    ("LK", "Sri Lanka"),
    ("MX", "Mexico"),
    ("MY", "Malaysia"),
    ("NG", "Nigeria"),
    ("NL", "Netherlands"),
    ("NO", "Norway"),
    ("NZ", "New Zealand"),
    ("PH", "Philippines"),
    ("PK", "Pakistan"),
    ("PL", "Poland"),
    ("PT", "Portugal"),
    ("QA", "Qatar"),
    ("RO", "Romania"),
    ("SA", "Saudi Arabia"),
    ("SE", "Sweden"),
    ("SG", "Singapore"),
    ("TH", "Thailand"),
    ("TR", "Turkey"),
    ("TW", "Taiwan"),
    ("UA", "Ukraine"),
    ("US", "United States"),
    ("VN", "Vietnam"),
    ("ZA", "South Africa"),
];

/// English short name for a country code, if known.
pub fn country_name(code: &CountryCode) -> Option<&'static str> {
    COUNTRY_NAMES
        .binary_search_by(|(c, _)| (*c).cmp(code.as_str()))
        .ok()
        .map(|idx| COUNTRY_NAMES[idx].1)
}

/// Human-readable label: `United States (US)`, the bare code when the name
/// is unknown, or `unknown location` for an unresolved lookup.
pub fn describe_country(country: &ResolvedCountry) -> String {
    match country {
        ResolvedCountry::Known(code) => match country_name(code) {
            Some(name) => format!("{name} ({code})"),
            None => code.to_string(),
        },
        ResolvedCountry::Unknown => "unknown location".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CountryCode {
        CountryCode::new(s).unwrap()
    }

    #[test]
    fn table_is_sorted_and_unique() {
        assert!(COUNTRY_NAMES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn known_names() {
        assert_eq!(country_name(&code("US")), Some("United States"));
        assert_eq!(country_name(&code("my")), Some("Malaysia"));
        assert_eq!(country_name(&code("ZA")), Some("South Africa"));
        assert_eq!(country_name(&code("AE")), Some("United Arab Emirates"));
    }

    #[test]
    fn unknown_code_has_no_name() {
        assert_eq!(country_name(&code("XX")), None);
    }

    #[test]
    fn describe_variants() {
        assert_eq!(
            describe_country(&ResolvedCountry::Known(code("IN"))),
            "India (IN)"
        );
        assert_eq!(describe_country(&ResolvedCountry::Known(code("XX"))), "XX");
        assert_eq!(describe_country(&ResolvedCountry::Unknown), "unknown location");
    }
}
