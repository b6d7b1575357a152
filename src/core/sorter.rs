use crate::domain::model::OrderView;
use crate::utils::error::{ReportError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_SORT_FIELD: &str = "total_cost";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Id,
    ClientName,
    OrderDate,
    TotalCost,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Id,
        SortKey::ClientName,
        SortKey::OrderDate,
        SortKey::TotalCost,
    ];

    pub fn field_name(&self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::ClientName => "client_name",
            SortKey::OrderDate => "order_date",
            SortKey::TotalCost => "total_cost",
        }
    }

    fn compare(&self, a: &OrderView, b: &OrderView) -> Ordering {
        match self {
            SortKey::Id => a.id.cmp(&b.id),
            SortKey::ClientName => a.client_name.cmp(&b.client_name),
            SortKey::OrderDate => a.order_date.cmp(&b.order_date),
            SortKey::TotalCost => a.total_cost.total_cmp(&b.total_cost),
        }
    }
}

impl FromStr for SortKey {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        // Short names match the order table column headers.
        match s.trim() {
            "id" => Ok(SortKey::Id),
            "client_name" | "client" => Ok(SortKey::ClientName),
            "order_date" | "date" => Ok(SortKey::OrderDate),
            "total_cost" | "cost" => Ok(SortKey::TotalCost),
            other => Err(ReportError::FieldNotFound {
                field: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Sorts by a field name. Unknown names fail even for an empty input.
pub fn sort_orders(orders: &[OrderView], by: &str, reverse: bool) -> Result<Vec<OrderView>> {
    let key: SortKey = by.parse()?;
    Ok(sort_orders_by(orders, key, reverse))
}

/// Stable in both directions: equal keys keep their input order.
pub fn sort_orders_by(orders: &[OrderView], key: SortKey, reverse: bool) -> Vec<OrderView> {
    let mut sorted = orders.to_vec();
    if reverse {
        sorted.sort_by(|a, b| key.compare(b, a));
    } else {
        sorted.sort_by(|a, b| key.compare(a, b));
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn order(id: i64, client: &str, month: u32, total: f64) -> OrderView {
        OrderView {
            id,
            client_name: client.to_string(),
            order_date: NaiveDate::from_ymd_opt(2023, month, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            total_cost: total,
            items: String::new(),
        }
    }

    fn mock_orders() -> Vec<OrderView> {
        vec![
            order(1, "Иван Иванов", 1, 100.0),
            order(2, "Сергей Петров", 2, 150.0),
            order(3, "Анна Смирнова", 3, 200.0),
            order(4, "Михаил Кузнецов", 4, 50.0),
        ]
    }

    fn ids(orders: &[OrderView]) -> Vec<i64> {
        orders.iter().map(|o| o.id).collect()
    }

    #[test]
    fn test_sort_orders_total_cost_descending() {
        let sorted = sort_orders(&mock_orders(), "total_cost", true).unwrap();
        assert_eq!(ids(&sorted), vec![3, 2, 1, 4]);
    }

    #[test]
    fn test_sort_orders_total_cost_ascending() {
        let sorted = sort_orders(&mock_orders(), "total_cost", false).unwrap();
        assert_eq!(ids(&sorted), vec![4, 1, 2, 3]);
    }

    #[test]
    fn test_sort_by_client_name_and_date() {
        let by_name = sort_orders(&mock_orders(), "client", false).unwrap();
        assert_eq!(ids(&by_name), vec![3, 1, 4, 2]);

        let by_date = sort_orders(&mock_orders(), "order_date", true).unwrap();
        assert_eq!(ids(&by_date), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_unknown_field_fails() {
        let err = sort_orders(&mock_orders(), "price", true).unwrap_err();
        assert!(matches!(err, ReportError::FieldNotFound { ref field } if field == "price"));

        assert!(sort_orders(&[], "price", true).is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(sort_orders(&[], DEFAULT_SORT_FIELD, true).unwrap().is_empty());
    }

    #[test]
    fn test_equal_keys_keep_input_order() {
        let orders = vec![
            order(1, "a", 1, 10.0),
            order(2, "b", 1, 20.0),
            order(3, "c", 1, 10.0),
            order(4, "d", 1, 20.0),
        ];
        let desc = sort_orders_by(&orders, SortKey::TotalCost, true);
        assert_eq!(ids(&desc), vec![2, 4, 1, 3]);
        let asc = sort_orders_by(&orders, SortKey::TotalCost, false);
        assert_eq!(ids(&asc), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_field_names_round_trip() {
        for key in SortKey::ALL {
            assert_eq!(key.field_name().parse::<SortKey>().unwrap(), key);
        }
    }
}
