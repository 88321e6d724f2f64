//! Currency selection parsing and validation

use crate::constants::SUPPORTED_CURRENCIES;

/// Validated list of uppercase currency codes
///
/// Parsed from a comma-separated spec (`"USD,BTC"`). If any code is not in
/// the supported set the whole selection falls back to USD, matching the
/// upstream API's accepted `vs_currency` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyList(Vec<String>);

impl CurrencyList {
    /// Parses and validates a comma-separated currency spec, telling the
    /// user when the selection falls back to USD
    pub fn from_spec(spec: &str) -> Self {
        match Self::validate(spec) {
            Ok(codes) => Self(codes),
            Err(warning) => {
                eprintln!("{}", crate::render::warning_line(&warning));
                Self(vec!["USD".to_string()])
            }
        }
    }

    /// Splits a spec into uppercase codes; the error carries the
    /// user-facing fallback message
    fn validate(spec: &str) -> Result<Vec<String>, String> {
        let codes: Vec<String> = spec
            .split(',')
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .collect();

        let all_supported = !codes.is_empty()
            && codes
                .iter()
                .all(|c| SUPPORTED_CURRENCIES.contains(&c.as_str()));

        if all_supported {
            Ok(codes)
        } else {
            Err(format!("'{spec}' is not a valid currency value, using 'USD'"))
        }
    }

    /// The validated uppercase currency codes
    pub fn codes(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

impl std::fmt::Display for CurrencyList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_uppercases() {
        let list = CurrencyList::from_spec("usd, btc");
        assert_eq!(list.codes(), &["USD".to_string(), "BTC".to_string()]);
    }

    #[test]
    fn invalid_code_falls_back_to_usd() {
        let list = CurrencyList::from_spec("USD,DOGECOINZ");
        assert_eq!(list.codes(), &["USD".to_string()]);
    }

    #[test]
    fn empty_spec_falls_back_to_usd() {
        let list = CurrencyList::from_spec("");
        assert_eq!(list.codes(), &["USD".to_string()]);
    }

    #[test]
    fn fallback_message_names_the_rejected_spec() {
        let warning = CurrencyList::validate("USD,DOGECOINZ").unwrap_err();
        assert!(warning.contains("'USD,DOGECOINZ'"));
        assert!(warning.contains("using 'USD'"));
    }
}
