//! Grouped sums over order views.

use crate::domain::model::{ClientTotal, DailyRevenue, OrderRow, OrderView};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_TOP_N: usize = 5;

/// Largest spenders first. Equal totals keep the order in which clients first appear.
pub fn top_clients(orders: &[OrderView], n: usize) -> Vec<ClientTotal> {
    let mut totals = totals_by_client(orders);
    // sort_by is stable, so ties stay in first-seen order
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals.truncate(n);
    totals
}

/// Per-client sums in first-seen client order.
pub fn totals_by_client(orders: &[OrderView]) -> Vec<ClientTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<ClientTotal> = Vec::new();

    for order in orders {
        match index.get(order.client_name.as_str()) {
            Some(&i) => totals[i].total += order.total_cost,
            None => {
                index.insert(order.client_name.as_str(), totals.len());
                totals.push(ClientTotal {
                    client_name: order.client_name.clone(),
                    total: order.total_cost,
                });
            }
        }
    }

    totals
}

/// Revenue per calendar day, oldest first.
pub fn daily_revenue(orders: &[OrderView]) -> Vec<DailyRevenue> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for order in orders {
        *by_day.entry(order.order_date.date()).or_insert(0.0) += order.total_cost;
    }

    by_day
        .into_iter()
        .map(|(date, total)| DailyRevenue { date, total })
        .collect()
}

pub fn order_table(orders: &[OrderView]) -> Vec<OrderRow> {
    orders
        .iter()
        .map(|order| OrderRow {
            id: order.id,
            client_name: order.client_name.clone(),
            order_date: order.order_date.format("%Y-%m-%d %H:%M:%S").to_string(),
            total_cost: format!("{:.2}", order.total_cost),
            items: order.items.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn order(id: i64, client: &str, date: &str, total: f64) -> OrderView {
        OrderView {
            id,
            client_name: client.to_string(),
            order_date: NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S").unwrap(),
            total_cost: total,
            items: String::new(),
        }
    }

    fn sample_orders() -> Vec<OrderView> {
        vec![
            order(1, "Иван Иванов", "2023-01-01 10:00:00", 100.0),
            order(2, "Сергей Петров", "2023-01-01 18:30:00", 150.0),
            order(3, "Анна Смирнова", "2023-01-03 09:00:00", 200.0),
            order(4, "Иван Иванов", "2023-01-02 12:00:00", 120.0),
            order(5, "Михаил Кузнецов", "2023-01-03 11:00:00", 50.0),
        ]
    }

    #[test]
    fn test_top_clients_sums_and_orders_descending() {
        let top = top_clients(&sample_orders(), 3);
        let names: Vec<&str> = top.iter().map(|t| t.client_name.as_str()).collect();
        assert_eq!(names, vec!["Иван Иванов", "Анна Смирнова", "Сергей Петров"]);
        assert_eq!(top[0].total, 220.0);
    }

    #[test]
    fn test_top_clients_caps_at_distinct_clients() {
        let orders = sample_orders();
        assert_eq!(top_clients(&orders, 10).len(), 4);
        assert_eq!(top_clients(&orders, DEFAULT_TOP_N).len(), 4);
        assert!(top_clients(&orders, 0).is_empty());
    }

    #[test]
    fn test_top_clients_ties_keep_first_seen_order() {
        let orders = vec![
            order(1, "B", "2023-01-01 00:00:00", 10.0),
            order(2, "A", "2023-01-01 00:00:00", 10.0),
            order(3, "C", "2023-01-01 00:00:00", 30.0),
        ];
        let names: Vec<String> = top_clients(&orders, 5)
            .into_iter()
            .map(|t| t.client_name)
            .collect();
        assert_eq!(names, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(top_clients(&[], 5).is_empty());
        assert!(daily_revenue(&[]).is_empty());
        assert!(order_table(&[]).is_empty());
    }

    #[test]
    fn test_daily_revenue_truncates_to_day() {
        let revenue = daily_revenue(&sample_orders());
        let expected = vec![
            (NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), 250.0),
            (NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(), 120.0),
            (NaiveDate::from_ymd_opt(2023, 1, 3).unwrap(), 250.0),
        ];
        let actual: Vec<(NaiveDate, f64)> = revenue.iter().map(|d| (d.date, d.total)).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_aggregations_do_not_touch_input_and_are_repeatable() {
        let orders = sample_orders();
        let snapshot = orders.clone();
        assert_eq!(top_clients(&orders, 5), top_clients(&orders, 5));
        assert_eq!(daily_revenue(&orders), daily_revenue(&orders));
        assert_eq!(orders, snapshot);
    }

    #[test]
    fn test_order_table_formats_rows() {
        let rows = order_table(&sample_orders()[..1]);
        assert_eq!(rows[0].order_date, "2023-01-01 10:00:00");
        assert_eq!(rows[0].total_cost, "100.00");
    }
}
