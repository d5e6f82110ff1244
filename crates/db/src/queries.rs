// crates/db/src/queries.rs
//! Typed queries for smoking events and cigarette settings.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::{Database, DbResult};
use kemuri_core::{CigaretteSettings, SmokingEvent};

/// Input for an event insert: the instant plus the optional settings link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewEvent {
    pub timestamp: DateTime<Utc>,
    pub cigarette_id: Option<i64>,
}

/// Uniform storage format so `ORDER BY timestamp` sorts lexicographically.
fn encode_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn decode_ts(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}

impl Database {
    /// The most recently created settings row, or `None` before first setup.
    pub async fn latest_cigarette(&self) -> DbResult<Option<CigaretteSettings>> {
        let row: Option<(i64, String, f64, f64)> = sqlx::query_as(
            "SELECT id, brand, tar, nicotine FROM cigarettes ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(|(id, brand, tar, nicotine)| CigaretteSettings {
            id,
            brand,
            tar,
            nicotine,
        }))
    }

    /// Append a new settings row. History is kept; this row becomes "latest".
    pub async fn create_cigarette(
        &self,
        brand: &str,
        tar: f64,
        nicotine: f64,
    ) -> DbResult<CigaretteSettings> {
        let result = sqlx::query(
            "INSERT INTO cigarettes (brand, tar, nicotine, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(brand)
        .bind(tar)
        .bind(nicotine)
        .bind(encode_ts(Utc::now()))
        .execute(self.pool())
        .await?;
        Ok(CigaretteSettings {
            id: result.last_insert_rowid(),
            brand: brand.to_string(),
            tar,
            nicotine,
        })
    }

    /// All events, newest first, with the linked settings row joined in
    /// for display.
    pub async fn list_events(&self) -> DbResult<Vec<SmokingEvent>> {
        let rows: Vec<(i64, String, Option<i64>, Option<String>, Option<f64>, Option<f64>)> =
            sqlx::query_as(
                "SELECT e.id, e.timestamp, e.cigarette_id, c.brand, c.tar, c.nicotine
                 FROM smoking_events e
                 LEFT JOIN cigarettes c ON c.id = e.cigarette_id
                 ORDER BY e.timestamp DESC, e.id DESC",
            )
            .fetch_all(self.pool())
            .await?;

        rows.into_iter()
            .map(|(id, raw_ts, cigarette_id, brand, tar, nicotine)| {
                let cigarette = match (cigarette_id, brand) {
                    (Some(cid), Some(brand)) => Some(CigaretteSettings {
                        id: cid,
                        brand,
                        tar: tar.unwrap_or(0.0),
                        nicotine: nicotine.unwrap_or(0.0),
                    }),
                    _ => None,
                };
                Ok(SmokingEvent {
                    id,
                    timestamp: decode_ts(&raw_ts)?,
                    cigarette_id,
                    cigarette,
                })
            })
            .collect()
    }

    /// Insert a single event.
    pub async fn create_event(&self, event: NewEvent) -> DbResult<SmokingEvent> {
        let result =
            sqlx::query("INSERT INTO smoking_events (timestamp, cigarette_id) VALUES (?, ?)")
                .bind(encode_ts(event.timestamp))
                .bind(event.cigarette_id)
                .execute(self.pool())
                .await?;
        Ok(SmokingEvent {
            id: result.last_insert_rowid(),
            timestamp: event.timestamp,
            cigarette_id: event.cigarette_id,
            cigarette: None,
        })
    }

    /// Insert a batch of events in one transaction: either every row lands
    /// or none do.
    pub async fn create_events_bulk(&self, events: &[NewEvent]) -> DbResult<usize> {
        let mut tx = self.pool().begin().await?;
        for event in events {
            sqlx::query("INSERT INTO smoking_events (timestamp, cigarette_id) VALUES (?, ?)")
                .bind(encode_ts(event.timestamp))
                .bind(event.cigarette_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(events.len())
    }

    /// Retroactively link every unlinked event to the given settings row.
    /// Returns the number of events updated.
    pub async fn backfill_event_cigarettes(&self, cigarette_id: i64) -> DbResult<u64> {
        let result =
            sqlx::query("UPDATE smoking_events SET cigarette_id = ? WHERE cigarette_id IS NULL")
                .bind(cigarette_id)
                .execute(self.pool())
                .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_latest_cigarette_empty() {
        let db = Database::new_in_memory().await.unwrap();
        assert_eq!(db.latest_cigarette().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_create_then_latest_cigarette() {
        let db = Database::new_in_memory().await.unwrap();
        db.create_cigarette("メビウス", 8.0, 0.7).await.unwrap();
        let latest = db.create_cigarette("セブンスター", 14.0, 1.2).await.unwrap();

        let read_back = db.latest_cigarette().await.unwrap().unwrap();
        assert_eq!(read_back, latest);
        assert_eq!(read_back.brand, "セブンスター");
    }

    #[tokio::test]
    async fn test_list_events_descending_with_join() {
        let db = Database::new_in_memory().await.unwrap();
        let cig = db.create_cigarette("メビウス", 8.0, 0.7).await.unwrap();

        db.create_event(NewEvent {
            timestamp: ts("2024-03-01T01:00:00Z"),
            cigarette_id: None,
        })
        .await
        .unwrap();
        db.create_event(NewEvent {
            timestamp: ts("2024-03-02T01:00:00Z"),
            cigarette_id: Some(cig.id),
        })
        .await
        .unwrap();

        let events = db.list_events().await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].timestamp, ts("2024-03-02T01:00:00Z"));
        assert_eq!(events[0].cigarette.as_ref().unwrap().brand, "メビウス");
        assert_eq!(events[1].cigarette, None);
    }

    #[tokio::test]
    async fn test_bulk_insert_all_rows_land() {
        let db = Database::new_in_memory().await.unwrap();
        let batch: Vec<NewEvent> = (0..5)
            .map(|i| NewEvent {
                timestamp: ts("2024-03-01T00:00:00Z") + chrono::Duration::hours(i),
                cigarette_id: None,
            })
            .collect();

        let created = db.create_events_bulk(&batch).await.unwrap();
        assert_eq!(created, 5);
        assert_eq!(db.list_events().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_bulk_insert_is_atomic() {
        let db = Database::new_in_memory().await.unwrap();
        // Second row violates the cigarettes foreign key (sqlx enables
        // foreign_keys by default), so the whole batch must roll back.
        let batch = vec![
            NewEvent {
                timestamp: ts("2024-03-01T00:00:00Z"),
                cigarette_id: None,
            },
            NewEvent {
                timestamp: ts("2024-03-01T01:00:00Z"),
                cigarette_id: Some(9999),
            },
        ];

        assert!(db.create_events_bulk(&batch).await.is_err());
        assert_eq!(db.list_events().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_backfill_links_only_unlinked() {
        let db = Database::new_in_memory().await.unwrap();
        let old = db.create_cigarette("わかば", 19.0, 1.5).await.unwrap();
        db.create_event(NewEvent {
            timestamp: ts("2024-03-01T00:00:00Z"),
            cigarette_id: Some(old.id),
        })
        .await
        .unwrap();
        db.create_event(NewEvent {
            timestamp: ts("2024-03-02T00:00:00Z"),
            cigarette_id: None,
        })
        .await
        .unwrap();

        let latest = db.create_cigarette("メビウス", 8.0, 0.7).await.unwrap();
        let updated = db.backfill_event_cigarettes(latest.id).await.unwrap();
        assert_eq!(updated, 1);

        let events = db.list_events().await.unwrap();
        // Newest event picked up the latest settings; the already-linked
        // one kept its original snapshot.
        assert_eq!(events[0].cigarette_id, Some(latest.id));
        assert_eq!(events[1].cigarette_id, Some(old.id));
    }
}
