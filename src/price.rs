use rand::Rng;

/// Price tier for a restaurant, ordered cheapest to priciest.
/// Rendered as repeated currency symbols ("£" through "££££").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PriceLabel {
    Budget,
    Moderate,
    Expensive,
    Luxury,
}

impl PriceLabel {
    pub fn symbol(self) -> &'static str {
        match self {
            PriceLabel::Budget => "£",
            PriceLabel::Moderate => "££",
            PriceLabel::Expensive => "£££",
            PriceLabel::Luxury => "££££",
        }
    }
}

impl std::fmt::Display for PriceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Pick a price label for a rating: the rating selects one of four buckets
/// (inclusive lower bounds, checked highest first), and a single uniform
/// draw in [0,1) selects a label from that bucket's distribution.
///
/// Per-bucket distributions (Luxury/Expensive/Moderate/Budget):
/// ≥4.5 → 20/40/40/0, [4.0,4.5) → 20/50/30/0,
/// [3.5,4.0) → 0/10/60/30, <3.5 → 0/0/30/70.
pub fn assign(rating: f64, rng: &mut impl Rng) -> PriceLabel {
    let draw: f64 = rng.gen();

    if rating >= 4.5 {
        if draw < 0.2 {
            PriceLabel::Luxury
        } else if draw < 0.6 {
            PriceLabel::Expensive
        } else {
            PriceLabel::Moderate
        }
    } else if rating >= 4.0 {
        if draw < 0.5 {
            PriceLabel::Expensive
        } else if draw < 0.8 {
            PriceLabel::Moderate
        } else {
            PriceLabel::Luxury
        }
    } else if rating >= 3.5 {
        if draw < 0.6 {
            PriceLabel::Moderate
        } else if draw < 0.9 {
            PriceLabel::Budget
        } else {
            PriceLabel::Expensive
        }
    } else if draw < 0.7 {
        PriceLabel::Budget
    } else {
        PriceLabel::Moderate
    }
}
