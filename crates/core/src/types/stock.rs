//! Stock label tiers shown on menu cards.

use serde::{Deserialize, Serialize};

/// Threshold ladder for the stock badge, evaluated on raw stock.
///
/// | stock    | tier        |
/// |----------|-------------|
/// | `> 10`   | `Available` |
/// | `6..=10` | `FewLeft`   |
/// | `1..=5`  | `LastUnits` |
/// | `0`      | `SoldOut`   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "tier", content = "count")]
pub enum StockLevel {
    Available,
    FewLeft(u32),
    LastUnits(u32),
    SoldOut,
}

impl StockLevel {
    /// Classify a raw stock count.
    #[must_use]
    pub const fn from_stock(stock: u32) -> Self {
        match stock {
            0 => Self::SoldOut,
            1..=5 => Self::LastUnits(stock),
            6..=10 => Self::FewLeft(stock),
            _ => Self::Available,
        }
    }

    /// Style class for the badge.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::FewLeft(_) => "few-left",
            Self::LastUnits(_) => "last-units",
            Self::SoldOut => "not-available",
        }
    }

    /// Badge text shown to shoppers.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Available => "Disponible".to_string(),
            Self::FewLeft(n) => format!("¡Quedan solo {n}!"),
            Self::LastUnits(n) => format!("¡Últimas {n} unidades!"),
            Self::SoldOut => "Agotado".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ladder_boundaries() {
        assert_eq!(StockLevel::from_stock(11), StockLevel::Available);
        assert_eq!(StockLevel::from_stock(10), StockLevel::FewLeft(10));
        assert_eq!(StockLevel::from_stock(6), StockLevel::FewLeft(6));
        assert_eq!(StockLevel::from_stock(5), StockLevel::LastUnits(5));
        assert_eq!(StockLevel::from_stock(1), StockLevel::LastUnits(1));
        assert_eq!(StockLevel::from_stock(0), StockLevel::SoldOut);
    }

    #[test]
    fn test_css_classes() {
        assert_eq!(StockLevel::from_stock(11).css_class(), "available");
        assert_eq!(StockLevel::from_stock(10).css_class(), "few-left");
        assert_eq!(StockLevel::from_stock(5).css_class(), "last-units");
        assert_eq!(StockLevel::from_stock(0).css_class(), "not-available");
    }

    #[test]
    fn test_labels_carry_exact_count() {
        assert_eq!(StockLevel::from_stock(7).label(), "¡Quedan solo 7!");
        assert_eq!(StockLevel::from_stock(2).label(), "¡Últimas 2 unidades!");
        assert_eq!(StockLevel::from_stock(40).label(), "Disponible");
        assert_eq!(StockLevel::SoldOut.label(), "Agotado");
    }
}
