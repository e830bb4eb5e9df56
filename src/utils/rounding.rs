/// Decimal places kept for activations and genome weights
pub const WEIGHT_DECIMALS: i32 = 5;
/// Decimal places kept for money amounts
pub const MONEY_DECIMALS: i32 = 2;

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn round_weight(value: f64) -> f64 {
    round_to(value, WEIGHT_DECIMALS)
}

pub fn round_money(value: f64) -> f64 {
    round_to(value, MONEY_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.234567, 5), 1.23457);
        assert_eq!(round_money(4.2600000001), 4.26);
        assert_eq!(round_money(-1.234), -1.23);
        assert_eq!(round_weight(0.0), 0.0);
    }
}
