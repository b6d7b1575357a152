use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{validate_email, validate_non_empty_string, validate_phone, Validate};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// City name returned when an address cannot be resolved.
pub const UNKNOWN_CITY: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
}

impl Validate for ClientRecord {
    /// Reports every invalid field at once, one per line.
    fn validate(&self) -> Result<()> {
        let errors: Vec<String> = [
            validate_non_empty_string("name", &self.name),
            validate_email(&self.email),
            validate_phone(&self.phone),
        ]
        .into_iter()
        .filter_map(|r| r.err())
        .map(|e| match e {
            ReportError::ValidationError { message } => message,
            other => other.to_string(),
        })
        .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ReportError::ValidationError {
                message: errors.join("\n"),
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

/// Denormalized order row: client name joined in, total pre-summed from the order lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderView {
    pub id: i64,
    pub client_name: String,
    pub order_date: NaiveDateTime,
    pub total_cost: f64,
    #[serde(default)]
    pub items: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientTotal {
    pub client_name: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub total: f64,
}

/// Flat row written to the orders table output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRow {
    pub id: i64,
    pub client_name: String,
    pub order_date: String,
    pub total_cost: String,
    pub items: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityGroup {
    pub city: String,
    pub clients: Vec<String>,
}

/// Undirected edge between two client names, stored with the smaller name first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub a: String,
    pub b: String,
}

impl Edge {
    pub fn new(x: &str, y: &str) -> Self {
        if x <= y {
            Self {
                a: x.to_string(),
                b: y.to_string(),
            }
        } else {
            Self {
                a: y.to_string(),
                b: x.to_string(),
            }
        }
    }

    pub fn touches(&self, name: &str) -> bool {
        self.a == name || self.b == name
    }
}

/// Co-location graph: clients in the same city are pairwise connected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CityGraph {
    pub cities: BTreeSet<String>,
    pub clients: BTreeSet<String>,
    pub edges: BTreeSet<Edge>,
}

impl CityGraph {
    pub fn add_city(&mut self, city: &str) {
        self.cities.insert(city.to_string());
    }

    /// Adds an edge between two distinct names. Returns false for self-pairs and repeats.
    pub fn add_edge(&mut self, x: &str, y: &str) -> bool {
        if x == y {
            return false;
        }
        self.clients.insert(x.to_string());
        self.clients.insert(y.to_string());
        self.edges.insert(Edge::new(x, y))
    }

    pub fn has_edge(&self, x: &str, y: &str) -> bool {
        self.edges.contains(&Edge::new(x, y))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True when no two clients share a city. City nodes may still be present.
    pub fn has_no_edges(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn neighbors<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges.iter().filter_map(move |e| {
            if e.a == name {
                Some(e.b.as_str())
            } else if e.b == name {
                Some(e.a.as_str())
            } else {
                None
            }
        })
    }
}

/// Everything a single report run produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub top_clients: Vec<ClientTotal>,
    pub daily_revenue: Vec<DailyRevenue>,
    pub city_groups: Vec<CityGroup>,
    pub graph: CityGraph,
    pub sorted_orders: Vec<OrderView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_are_undirected() {
        let mut graph = CityGraph::default();
        assert!(graph.add_edge("Zoe", "Anna"));
        assert!(!graph.add_edge("Anna", "Zoe"));
        assert!(graph.has_edge("Zoe", "Anna"));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges.iter().next().unwrap().a, "Anna");
    }

    #[test]
    fn test_self_pairs_are_ignored() {
        let mut graph = CityGraph::default();
        assert!(!graph.add_edge("Anna", "Anna"));
        assert!(graph.has_no_edges());
        assert!(graph.clients.is_empty());
    }

    fn client(email: &str, phone: &str) -> ClientRecord {
        ClientRecord {
            id: 1,
            name: "Иван Иванов".to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            address: Some("Омск".to_string()),
        }
    }

    #[test]
    fn test_client_validation() {
        assert!(client("ivan@example.com", "+79123456789").validate().is_ok());
        assert!(client("invalid_email", "+79011234567").validate().is_err());
        assert!(client("anna@example.ru", "abc").validate().is_err());
    }

    #[test]
    fn test_client_validation_reports_all_fields() {
        let err = client("invalid_email", "abc").validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("invalid_email"));
        assert!(message.contains("abc"));
    }

    #[test]
    fn test_city_nodes_without_edges() {
        let mut graph = CityGraph::default();
        graph.add_city("Омск");
        assert!(graph.has_no_edges());
        assert_eq!(graph.cities.len(), 1);
        assert_ne!(graph, CityGraph::default());
    }

    #[test]
    fn test_neighbors() {
        let mut graph = CityGraph::default();
        graph.add_edge("x", "y");
        graph.add_edge("z", "x");
        let mut n: Vec<&str> = graph.neighbors("x").collect();
        n.sort();
        assert_eq!(n, vec!["y", "z"]);
    }
}
