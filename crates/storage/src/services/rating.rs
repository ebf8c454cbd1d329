use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Category;

/// Anything that carries a rating and the weight it contributes with.
pub trait Weighted {
    fn rating(&self) -> Decimal;
    fn weight(&self) -> Decimal;
}

impl Weighted for Category {
    fn rating(&self) -> Decimal {
        self.rating
    }

    fn weight(&self) -> Decimal {
        self.weight
    }
}

impl Weighted for (Decimal, Decimal) {
    fn rating(&self) -> Decimal {
        self.0
    }

    fn weight(&self) -> Decimal {
        self.1
    }
}

/// Round to one decimal place, halves away from zero.
pub fn round_score(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// `Σ(rating·weight) / Σ(weight)` rounded to one decimal.
///
/// Returns zero when the weights sum to zero, which also covers an empty
/// input. Ratings are used as given, including values outside `[1, 5]`.
pub fn weighted_score<W: Weighted>(items: &[W]) -> Decimal {
    let (weighted_sum, weight_sum) = items
        .iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(sum, weights), item| {
            (sum + item.rating() * item.weight(), weights + item.weight())
        });

    if weight_sum.is_zero() {
        return Decimal::ZERO;
    }

    round_score(weighted_sum / weight_sum)
}

/// Unweighted mean, rounded like [`weighted_score`]. Zero for no values.
pub fn mean(values: &[Decimal]) -> Decimal {
    let items: Vec<(Decimal, Decimal)> = values.iter().map(|v| (*v, Decimal::ONE)).collect();
    weighted_score(&items)
}
