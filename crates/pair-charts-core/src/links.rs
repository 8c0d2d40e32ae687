use crate::currency::Currency;

/// Swap page URL pre-filled with the selected pair.
pub fn swap_url(currency0: &Currency, currency1: &Currency) -> String {
    format!(
        "/#/swap?inputCurrency={}&outputCurrency={}",
        currency0.id(),
        currency1.id()
    )
}

/// Add-liquidity page URL for the selected pair.
pub fn add_liquidity_url(currency0: &Currency, currency1: &Currency) -> String {
    format!("/#/add/{}/{}", currency0.id(), currency1.id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::{Currency, DEFAULT_CHAIN_ID, KUNI_ADDRESS};

    #[test]
    fn swap_url_uses_currency_ids() {
        let (kuni, native) = Currency::default_selection();
        assert_eq!(
            swap_url(&kuni, &native),
            format!("/#/swap?inputCurrency={KUNI_ADDRESS}&outputCurrency=ETH")
        );
    }

    #[test]
    fn add_liquidity_url_uses_currency_ids() {
        let token = Currency::token(DEFAULT_CHAIN_ID, "0xabc", 18, "FOO");
        let native = Currency::native(DEFAULT_CHAIN_ID);
        assert_eq!(add_liquidity_url(&native, &token), "/#/add/ETH/0xabc");
    }
}
