use serde::Serialize;

/// Money split of one booking, in whole currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FareBreakdown {
    pub total_amount: i64,
    pub driver_amount: i64,
    pub platform_fee: i64,
}

/// `percent` of `amount`, rounded to the nearest unit (halves round up).
/// Both inputs are non-negative.
pub fn percent_of(amount: i64, percent: i64) -> i64 {
    (amount * percent + 50) / 100
}

pub fn fare_breakdown(price_per_seat: i64, seats: i32, fee_percent: i64) -> FareBreakdown {
    let total_amount = price_per_seat * seats as i64;
    let platform_fee = percent_of(total_amount, fee_percent);
    FareBreakdown {
        total_amount,
        driver_amount: total_amount - platform_fee,
        platform_fee,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_rounds_to_nearest_unit() {
        assert_eq!(percent_of(1000, 10), 100);
        assert_eq!(percent_of(105, 10), 11); // 10.5 -> 11
        assert_eq!(percent_of(104, 10), 10); // 10.4 -> 10
        assert_eq!(percent_of(0, 10), 0);
        assert_eq!(percent_of(999, 0), 0);
    }

    #[test]
    fn test_breakdown_parts_add_up() {
        let fare = fare_breakdown(250, 2, 10);
        assert_eq!(fare.total_amount, 500);
        assert_eq!(fare.platform_fee, 50);
        assert_eq!(fare.driver_amount, 450);

        let odd = fare_breakdown(333, 3, 15);
        assert_eq!(odd.total_amount, 999);
        assert_eq!(odd.platform_fee, 150); // 149.85
        assert_eq!(odd.driver_amount + odd.platform_fee, odd.total_amount);
    }
}
