use super::Database;
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use rusqlite::{params, OptionalExtension};

/// Date (YYYY-MM-DD) of the last sent performance report
pub const LAST_REPORT_DATE_KEY: &str = "last_report_date";

impl Database {
    pub fn get_state(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM state WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_state(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO state (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn last_report_date(&self) -> Result<Option<NaiveDate>> {
        Ok(self
            .get_state(LAST_REPORT_DATE_KEY)?
            .and_then(|v| NaiveDate::parse_from_str(&v, "%Y-%m-%d").ok()))
    }

    pub fn set_last_report_date(&self, date: NaiveDate) -> Result<()> {
        self.set_state(LAST_REPORT_DATE_KEY, &date.format("%Y-%m-%d").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_upsert() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_state("k").unwrap().is_none());

        db.set_state("k", "one").unwrap();
        db.set_state("k", "two").unwrap();
        assert_eq!(db.get_state("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_last_report_date() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.last_report_date().unwrap().is_none());

        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        db.set_last_report_date(date).unwrap();
        assert_eq!(db.last_report_date().unwrap(), Some(date));
    }
}
