use serde::{Deserialize, Serialize};

use crate::reconcile::Reconcile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityType {
    StockOrBond,
    Derivative,
    CurrencyPair,
}

impl SecurityType {
    #[must_use]
    pub fn of(code: &str) -> Self {
        let chars: Vec<char> = code.chars().collect();
        if chars.len() == 12 && !code.contains('-') {
            Self::StockOrBond
        } else if chars.len() == 6 || (chars.len() > 7 && chars[6] == '_') {
            Self::CurrencyPair
        } else {
            Self::Derivative
        }
    }

    #[must_use]
    pub fn currency_pair(contract: &str) -> &str {
        match contract.char_indices().nth(6) {
            Some((end, _)) => &contract[..end],
            None => contract,
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::StockOrBond => "stock or bond",
            Self::Derivative => "derivative contract",
            Self::CurrencyPair => "currency",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Security {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(rename = "type")]
    pub security_type: SecurityType,
    #[serde(default)]
    pub isin: Option<String>,
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Security {
    #[must_use]
    pub fn new(security_type: SecurityType) -> Self {
        Self {
            id: None,
            security_type,
            isin: None,
            ticker: None,
            name: None,
        }
    }
}

impl Reconcile for Security {}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Security, SecurityType};

    #[test]
    fn classifies_codes() {
        assert_eq!(SecurityType::of("NL0009805522"), SecurityType::StockOrBond);
        assert_eq!(SecurityType::of("USDRUB"), SecurityType::CurrencyPair);
        assert_eq!(SecurityType::of("USDRUB_TOM"), SecurityType::CurrencyPair);
        assert_eq!(SecurityType::of("Si-12.21"), SecurityType::Derivative);
        assert_eq!(SecurityType::of("RI-12.21M170221CA"), SecurityType::Derivative);
        assert_eq!(SecurityType::of("SiZ1"), SecurityType::Derivative);
        assert_eq!(SecurityType::of("USDRUB_"), SecurityType::Derivative);
    }

    #[test]
    fn currency_pair_is_first_six_chars() {
        assert_eq!(SecurityType::currency_pair("USDRUB_TOM"), "USDRUB");
        assert_eq!(SecurityType::currency_pair("USDRUB"), "USDRUB");
        assert_eq!(SecurityType::currency_pair("EUR"), "EUR");
    }

    #[test]
    fn serializes_type_field() {
        let mut security = Security::new(SecurityType::StockOrBond);
        security.isin = Some("NL0009805522".to_string());
        let json = serde_json::to_value(&security).expect("serialize");
        assert_eq!(json["type"], "STOCK_OR_BOND");

        let back: Security = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, security);
    }
}
