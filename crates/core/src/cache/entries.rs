//! Cache entry CRUD operations.
//!
//! Entries are keyed by `(store, key)` and always replaced wholesale.
//! Writing into a store that does not exist yet creates it.

use super::connection::CacheDb;
use crate::{Error, StoredResponse};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, Connection};

const UPSERT_ENTRY: &str = "INSERT INTO cache_entries (
        store, key, url, status_code, status_text, headers_json, body, digest, fetched_at, stored_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
    ON CONFLICT(store, key) DO UPDATE SET
        url = excluded.url,
        status_code = excluded.status_code,
        status_text = excluded.status_text,
        headers_json = excluded.headers_json,
        body = excluded.body,
        digest = excluded.digest,
        fetched_at = excluded.fetched_at,
        stored_at = excluded.stored_at";

fn ensure_store(conn: &Connection, store: &str, now: &str) -> Result<(), Error> {
    conn.execute(
        "INSERT OR IGNORE INTO cache_stores (name, created_at) VALUES (?1, ?2)",
        params![store, now],
    )?;
    Ok(())
}

fn write_entry(conn: &Connection, store: &str, key: &str, response: &StoredResponse, now: &str) -> Result<(), Error> {
    let headers_json =
        serde_json::to_string(&response.headers).map_err(|e| Error::CorruptEntry(format!("headers: {e}")))?;
    conn.execute(
        UPSERT_ENTRY,
        params![
            store,
            key,
            &response.url,
            response.status as i64,
            &response.status_text,
            headers_json,
            &response.body,
            &response.digest,
            &response.fetched_at,
            now,
        ],
    )?;
    Ok(())
}

impl CacheDb {
    /// Insert or replace the entry for `key` in `store`.
    pub async fn put_entry(&self, store: &str, key: &str, response: &StoredResponse) -> Result<(), Error> {
        let store = store.to_string();
        let key = key.to_string();
        let response = response.clone();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                ensure_store(&tx, &store, &now)?;
                write_entry(&tx, &store, &key, &response, &now)?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or replace several entries in one transaction.
    ///
    /// Either every entry is written or none is.
    pub async fn put_entries(&self, store: &str, entries: &[(String, StoredResponse)]) -> Result<(), Error> {
        let store = store.to_string();
        let entries = entries.to_vec();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                ensure_store(&tx, &store, &now)?;
                for (key, response) in &entries {
                    write_entry(&tx, &store, key, response, &now)?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Get the entry for `key` in `store`.
    ///
    /// Returns None if the store or the key doesn't exist.
    pub async fn get_entry(&self, store: &str, key: &str) -> Result<Option<StoredResponse>, Error> {
        let store = store.to_string();
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<StoredResponse>, Error> {
                let result = conn.query_row(
                    "SELECT url, status_code, status_text, headers_json, body, digest, fetched_at
                     FROM cache_entries WHERE store = ?1 AND key = ?2",
                    params![store, key],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, i64>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, String>(3)?,
                            row.get::<_, Vec<u8>>(4)?,
                            row.get::<_, String>(5)?,
                            row.get::<_, String>(6)?,
                        ))
                    },
                );

                let (url, status, status_text, headers_json, body, digest, fetched_at) = match result {
                    Ok(row) => row,
                    Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                    Err(e) => return Err(e.into()),
                };

                let headers = serde_json::from_str(&headers_json)
                    .map_err(|e| Error::CorruptEntry(format!("headers for {key}: {e}")))?;
                let status =
                    u16::try_from(status).map_err(|_| Error::CorruptEntry(format!("status {status} for {key}")))?;

                Ok(Some(StoredResponse { url, status, status_text, headers, body, digest, fetched_at }))
            })
            .await
            .map_err(Error::from)
    }

    /// Keys held by `store`, in insertion order.
    pub async fn entry_keys(&self, store: &str) -> Result<Vec<String>, Error> {
        let store = store.to_string();
        self.conn
            .call(move |conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT key FROM cache_entries WHERE store = ?1 ORDER BY rowid")?;
                let keys = stmt
                    .query_map(params![store], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(keys)
            })
            .await
            .map_err(Error::from)
    }
}
