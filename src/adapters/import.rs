use crate::adapters::csv_source::CsvDataSource;
use crate::domain::model::ClientRecord;
use crate::domain::ports::{ReportSource, Storage};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Deserialize)]
struct ImportRow {
    name: String,
    email: String,
    phone: String,
    #[serde(default)]
    address: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Validates client rows from an external CSV and appends the good ones to the clients table.
///
/// Rows that fail to parse, fail validation, or reuse an existing email are
/// skipped with a warning. Accepted rows get ids after the current maximum.
pub async fn import_clients<S: Storage>(source: &CsvDataSource<S>, csv_data: &[u8]) -> Result<ImportSummary> {
    let mut clients = source.list_all_clients().await?;
    let mut emails: HashSet<String> = clients.iter().map(|c| c.email.clone()).collect();
    let mut next_id = clients.iter().map(|c| c.id).max().unwrap_or(0) + 1;
    let mut summary = ImportSummary::default();

    let mut reader = csv::Reader::from_reader(csv_data);
    for (line, row) in reader.deserialize::<ImportRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("Skipping CSV row {}: {}", line + 1, e);
                summary.skipped += 1;
                continue;
            }
        };

        let client = ClientRecord {
            id: next_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            address: row.address,
        };

        if let Err(e) = client.validate() {
            tracing::warn!("Skipping CSV row {}: {}", line + 1, e);
            summary.skipped += 1;
            continue;
        }
        if !emails.insert(client.email.clone()) {
            tracing::warn!(
                "Skipping CSV row {}: client with email {} already exists",
                line + 1,
                client.email
            );
            summary.skipped += 1;
            continue;
        }

        next_id += 1;
        summary.imported += 1;
        clients.push(client);
    }

    if summary.imported > 0 {
        source.write_clients(&clients).await?;
    }
    tracing::info!(
        "Client import finished: {} imported, {} skipped",
        summary.imported,
        summary.skipped
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStorage;

    const EXISTING: &str = "id,name,email,phone,address\n\
        3,Иван Иванов,ivan@example.com,+79123456789,Москва\n";

    #[tokio::test]
    async fn test_import_validates_and_dedups() {
        let storage = MemoryStorage::new();
        storage.insert("clients.csv", EXISTING).await;
        let source = CsvDataSource::new(storage);

        let input = "name,email,phone,address\n\
            Анна Смирнова,anna@example.ru,+79011234567,\"Краснодар г., ул. Пушкина, 12\"\n\
            Петр Петров,invalid_email,+79011234567,Москва\n\
            Иван Двойник,ivan@example.com,+79000000000,Омск\n\
            Сергей Петров,sergey@example.com,abc,Тула\n\
            Михаил Кузнецов,misha@example.com,89001112233,\n";

        let summary = import_clients(&source, input.as_bytes()).await.unwrap();

        assert_eq!(summary, ImportSummary { imported: 2, skipped: 3 });

        let clients = source.list_all_clients().await.unwrap();
        let ids: Vec<i64> = clients.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 4, 5]);
        assert_eq!(clients[1].name, "Анна Смирнова");
        assert_eq!(clients[2].address, None);
    }

    #[tokio::test]
    async fn test_import_into_empty_table() {
        let storage = MemoryStorage::new();
        let source = CsvDataSource::new(storage.clone());

        let input = "name,email,phone,address\nОльга,olga@example.com,+7123,Омск\n";
        let summary = import_clients(&source, input.as_bytes()).await.unwrap();

        assert_eq!(summary.imported, 1);
        assert_eq!(source.list_all_clients().await.unwrap()[0].id, 1);
    }

    #[tokio::test]
    async fn test_rows_missing_columns_are_skipped() {
        let storage = MemoryStorage::new();
        let source = CsvDataSource::new(storage.clone());

        let input = "name,phone\nОльга,+7123\n";
        let summary = import_clients(&source, input.as_bytes()).await.unwrap();

        assert_eq!(summary, ImportSummary { imported: 0, skipped: 1 });
        assert!(storage.get_file("clients.csv").await.is_none());
    }
}
