use serde::{Deserialize, Serialize};

/// Flat fee for the eviction order phase, in euros.
pub const BASE_FEE: u32 = 1300;
/// Additional fee when the enforcement phase is needed, in euros.
pub const ENFORCEMENT_FEE: u32 = 1200;
/// Indicative time to obtain the order.
pub const ORDER_DAYS: u32 = 90;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct QuoteRequest {
    #[serde(default = "default_months")]
    pub mensilita: u32,
    #[serde(default)]
    pub esecutiva: bool,
}

fn default_months() -> u32 {
    3
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteEstimate {
    pub mensilita: u32,
    pub base: u32,
    pub esecutiva: u32,
    pub totale: u32,
    pub ordinanza_giorni: u32,
}

/// Indicative cost of the procedure. The unpaid months are echoed back but
/// do not change the fee.
pub fn estimate(request: QuoteRequest) -> QuoteEstimate {
    let esecutiva = if request.esecutiva { ENFORCEMENT_FEE } else { 0 };
    QuoteEstimate {
        mensilita: request.mensilita.max(1),
        base: BASE_FEE,
        esecutiva,
        totale: BASE_FEE + esecutiva,
        ordinanza_giorni: ORDER_DAYS,
    }
}
