use crate::core::address::CityExtractor;
use crate::domain::model::{CityGraph, CityGroup, ClientRecord};
use std::collections::HashMap;

/// Groups client names by extracted city. Cities appear in first-seen order.
pub fn group_clients_by_city(clients: &[ClientRecord], extractor: &CityExtractor) -> Vec<CityGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<CityGroup> = Vec::new();

    for client in clients {
        let city = extractor.extract(client.address.as_deref());
        match index.get(&city) {
            Some(&i) => groups[i].clients.push(client.name.clone()),
            None => {
                index.insert(city.clone(), groups.len());
                groups.push(CityGroup {
                    city,
                    clients: vec![client.name.clone()],
                });
            }
        }
    }

    groups
}

/// Builds the co-location graph from already computed city groups.
pub fn build_city_graph(groups: &[CityGroup]) -> CityGraph {
    let mut graph = CityGraph::default();

    for group in groups {
        graph.add_city(&group.city);
        for (i, x) in group.clients.iter().enumerate() {
            for y in &group.clients[i + 1..] {
                graph.add_edge(x, y);
            }
        }
    }

    graph
}

pub fn group_by_city(clients: &[ClientRecord]) -> CityGraph {
    group_by_city_with(clients, &CityExtractor::default())
}

pub fn group_by_city_with(clients: &[ClientRecord], extractor: &CityExtractor) -> CityGraph {
    city_groups_and_graph(clients, extractor).1
}

/// City groups plus the co-location graph. Fewer than two clients yield an empty graph.
pub fn city_groups_and_graph(
    clients: &[ClientRecord],
    extractor: &CityExtractor,
) -> (Vec<CityGroup>, CityGraph) {
    let groups = group_clients_by_city(clients, extractor);
    if clients.len() < 2 {
        tracing::debug!("Not enough clients for a geography graph: {}", clients.len());
        return (groups, CityGraph::default());
    }

    let graph = build_city_graph(&groups);
    tracing::debug!(
        "Geography graph: {} cities, {} clients, {} edges",
        graph.cities.len(),
        graph.clients.len(),
        graph.edge_count()
    );
    (groups, graph)
}
