//! Payment terms and methods.

use serde::{Deserialize, Serialize};

/// Agreed payment terms for an order.
///
/// Wire values match the sales-force conventions (`contado` = cash up
/// front, `credito_N` = N days of credit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentTerms {
    #[default]
    #[serde(rename = "contado")]
    Cash,
    #[serde(rename = "credito_30")]
    Credit30,
    #[serde(rename = "credito_60")]
    Credit60,
    #[serde(rename = "credito_90")]
    Credit90,
}

impl PaymentTerms {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentTerms::Cash => "contado",
            PaymentTerms::Credit30 => "credito_30",
            PaymentTerms::Credit60 => "credito_60",
            PaymentTerms::Credit90 => "credito_90",
        }
    }

    /// Parses a wire value back into payment terms.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "contado" => Some(PaymentTerms::Cash),
            "credito_30" => Some(PaymentTerms::Credit30),
            "credito_60" => Some(PaymentTerms::Credit60),
            "credito_90" => Some(PaymentTerms::Credit90),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentTerms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "transferencia")]
    Transfer,
    #[serde(rename = "cheque")]
    Check,
    #[serde(rename = "efectivo")]
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Transfer => "transferencia",
            PaymentMethod::Check => "cheque",
            PaymentMethod::Cash => "efectivo",
        }
    }

    /// Parses a wire value back into a payment method.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "transferencia" => Some(PaymentMethod::Transfer),
            "cheque" => Some(PaymentMethod::Check),
            "efectivo" => Some(PaymentMethod::Cash),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_terms_default_to_cash() {
        assert_eq!(PaymentTerms::default(), PaymentTerms::Cash);
    }

    #[test]
    fn payment_terms_wire_values() {
        assert_eq!(
            serde_json::to_string(&PaymentTerms::Credit30).unwrap(),
            "\"credito_30\""
        );
        let terms: PaymentTerms = serde_json::from_str("\"contado\"").unwrap();
        assert_eq!(terms, PaymentTerms::Cash);
    }

    #[test]
    fn payment_method_wire_values() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Transfer).unwrap(),
            "\"transferencia\""
        );
        let method: PaymentMethod = serde_json::from_str("\"efectivo\"").unwrap();
        assert_eq!(method, PaymentMethod::Cash);
    }
}
