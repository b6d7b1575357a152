use crate::domain::model::{ClientRecord, OrderView, ProductRecord};
use crate::domain::ports::{ReportSource, Storage};
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Format order dates are stored in.
pub const ORDER_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// File names of the four tables inside the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTables {
    pub clients: String,
    pub products: String,
    pub orders: String,
    pub order_lines: String,
}

impl Default for SourceTables {
    fn default() -> Self {
        Self {
            clients: "clients.csv".to_string(),
            products: "products.csv".to_string(),
            orders: "orders.csv".to_string(),
            order_lines: "order_products.csv".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct OrderRecordRow {
    id: i64,
    client_id: Option<i64>,
    order_date: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct OrderLineRow {
    order_id: i64,
    product_id: i64,
    quantity: Option<u32>,
}

/// Accepts plain dates, `YYYY-MM-DD HH:MM:SS`, the `T`-separated form and RFC 3339.
pub fn parse_order_date(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_local());
    }

    Err(ReportError::InvalidDate {
        value: value.to_string(),
    })
}

/// CSV tables behind a [`Storage`], joined into report records on read.
pub struct CsvDataSource<S: Storage> {
    storage: S,
    tables: SourceTables,
}

impl<S: Storage> CsvDataSource<S> {
    pub fn new(storage: S) -> Self {
        Self::with_tables(storage, SourceTables::default())
    }

    pub fn with_tables(storage: S, tables: SourceTables) -> Self {
        Self { storage, tables }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn tables(&self) -> &SourceTables {
        &self.tables
    }

    async fn read_table<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>> {
        let data = self.storage.read_file(file).await?;
        let mut reader = csv::Reader::from_reader(data.as_slice());
        let rows = reader.deserialize().collect::<std::result::Result<Vec<T>, _>>()?;
        tracing::debug!("Read {} rows from {}", rows.len(), file);
        Ok(rows)
    }

    async fn read_optional_table<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>> {
        if !self.storage.exists(file).await {
            tracing::debug!("Table {} not present, treating as empty", file);
            return Ok(Vec::new());
        }
        self.read_table(file).await
    }

    async fn write_table<T: Serialize>(&self, file: &str, rows: &[T]) -> Result<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in rows {
            writer.serialize(row)?;
        }
        let data = writer.into_inner().map_err(|e| ReportError::ProcessingError {
            message: format!("Failed to flush table {}: {}", file, e),
        })?;
        self.storage.write_file(file, &data).await?;
        tracing::debug!("Wrote {} rows to {}", rows.len(), file);
        Ok(())
    }

    pub async fn write_clients(&self, clients: &[ClientRecord]) -> Result<()> {
        self.write_table(&self.tables.clients, clients).await
    }

    /// Validates and appends one client. Emails are unique across the table.
    pub async fn add_client(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        address: Option<&str>,
    ) -> Result<i64> {
        let mut clients: Vec<ClientRecord> = self.read_optional_table(&self.tables.clients).await?;

        let client = ClientRecord {
            id: next_id(clients.iter().map(|c| c.id)),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            address: address.map(str::to_string),
        };
        client.validate()?;
        if clients.iter().any(|c| c.email == client.email) {
            return Err(ReportError::ValidationError {
                message: format!("Client with email {} already exists", client.email),
            });
        }

        let id = client.id;
        clients.push(client);
        self.write_table(&self.tables.clients, &clients).await?;
        tracing::info!("Added client {}", id);
        Ok(id)
    }

    pub async fn add_product(&self, name: &str, price: f64) -> Result<i64> {
        validate_non_empty_string("name", name)?;
        if !price.is_finite() || price < 0.0 {
            return Err(ReportError::ValidationError {
                message: format!("Invalid product price: {}", price),
            });
        }

        let mut products: Vec<ProductRecord> =
            self.read_optional_table(&self.tables.products).await?;
        let id = next_id(products.iter().map(|p| p.id));
        products.push(ProductRecord {
            id,
            name: name.to_string(),
            price,
        });

        self.write_table(&self.tables.products, &products).await?;
        tracing::info!("Added product {}", id);
        Ok(id)
    }

    /// Appends an order and its lines. `lines` holds `(product_id, quantity)` pairs;
    /// the client and every product must already exist.
    pub async fn add_order(
        &self,
        client_id: i64,
        order_date: NaiveDateTime,
        lines: &[(i64, u32)],
    ) -> Result<i64> {
        let clients: Vec<ClientRecord> = self.read_optional_table(&self.tables.clients).await?;
        if !clients.iter().any(|c| c.id == client_id) {
            return Err(ReportError::ValidationError {
                message: format!("Unknown client id {}", client_id),
            });
        }

        let products: Vec<ProductRecord> = self.read_optional_table(&self.tables.products).await?;
        let known: HashSet<i64> = products.iter().map(|p| p.id).collect();
        for &(product_id, quantity) in lines {
            if !known.contains(&product_id) {
                return Err(ReportError::ValidationError {
                    message: format!("Unknown product id {}", product_id),
                });
            }
            if quantity == 0 {
                return Err(ReportError::ValidationError {
                    message: format!("Quantity for product {} must be at least 1", product_id),
                });
            }
        }

        let mut orders: Vec<OrderRecordRow> = self.read_optional_table(&self.tables.orders).await?;
        let mut order_lines: Vec<OrderLineRow> =
            self.read_optional_table(&self.tables.order_lines).await?;

        let id = next_id(orders.iter().map(|o| o.id));
        orders.push(OrderRecordRow {
            id,
            client_id: Some(client_id),
            order_date: order_date.format(ORDER_DATE_FORMAT).to_string(),
        });
        order_lines.extend(lines.iter().map(|&(product_id, quantity)| OrderLineRow {
            order_id: id,
            product_id,
            quantity: Some(quantity),
        }));

        self.write_table(&self.tables.orders, &orders).await?;
        self.write_table(&self.tables.order_lines, &order_lines).await?;
        tracing::info!("Added order {} with {} lines", id, lines.len());
        Ok(id)
    }

    fn join_orders(
        orders: Vec<OrderRecordRow>,
        clients: &[ClientRecord],
        products: &[ProductRecord],
        lines: &[OrderLineRow],
    ) -> Result<Vec<OrderView>> {
        let clients_by_id: HashMap<i64, &ClientRecord> = clients.iter().map(|c| (c.id, c)).collect();
        let products_by_id: HashMap<i64, &ProductRecord> =
            products.iter().map(|p| (p.id, p)).collect();
        let mut lines_by_order: HashMap<i64, Vec<&OrderLineRow>> = HashMap::new();
        for line in lines {
            lines_by_order.entry(line.order_id).or_default().push(line);
        }

        let mut orders = orders;
        orders.sort_by_key(|o| o.id);

        let mut views = Vec::with_capacity(orders.len());
        for order in orders {
            let client_name = match order.client_id.and_then(|id| clients_by_id.get(&id)) {
                Some(client) => client.name.clone(),
                None => {
                    tracing::warn!("Order {} has no matching client", order.id);
                    String::new()
                }
            };

            let mut total_cost = 0.0;
            let mut items = Vec::new();
            for line in lines_by_order.get(&order.id).into_iter().flatten() {
                let Some(product) = products_by_id.get(&line.product_id) else {
                    tracing::warn!(
                        "Order {} references missing product {}",
                        order.id,
                        line.product_id
                    );
                    continue;
                };
                let quantity = line.quantity.unwrap_or(1);
                total_cost += product.price * f64::from(quantity);
                items.push(format!("{}: {}", product.name, quantity));
            }

            if total_cost < 0.0 {
                return Err(ReportError::ValidationError {
                    message: format!("Order {} has negative total cost {:.2}", order.id, total_cost),
                });
            }

            views.push(OrderView {
                id: order.id,
                client_name,
                order_date: parse_order_date(&order.order_date)?,
                total_cost,
                items: items.join(","),
            });
        }

        Ok(views)
    }
}

fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().unwrap_or(0) + 1
}

#[async_trait]
impl<S: Storage> ReportSource for CsvDataSource<S> {
    async fn list_all_orders(&self) -> Result<Vec<OrderView>> {
        let orders: Vec<OrderRecordRow> = self.read_table(&self.tables.orders).await?;
        let clients = self.list_all_clients().await?;
        let products = self.list_all_products().await?;
        let lines: Vec<OrderLineRow> = self.read_optional_table(&self.tables.order_lines).await?;

        Self::join_orders(orders, &clients, &products, &lines)
    }

    async fn list_all_clients(&self) -> Result<Vec<ClientRecord>> {
        self.read_optional_table(&self.tables.clients).await
    }

    async fn list_all_products(&self) -> Result<Vec<ProductRecord>> {
        self.read_optional_table(&self.tables.products).await
    }
}
