//! The expense store: records plus the category and payment method lookup
//! tables.

use std::path::Path;

use rusqlite::{Connection, params};

use daybook_core::dates::{format_date, parse_date};
use daybook_core::expense::{CategoryLabel, ExpenseRecord, PaymentMethodLabel};

use crate::{Migration, StoreError, run_migrations};

/// Schema history. Version 2 adds the payment method lookup table without
/// touching existing `expenses`/`categories` data.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: "
        CREATE TABLE IF NOT EXISTS expenses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            description TEXT NOT NULL,
            amount REAL NOT NULL,
            category TEXT NOT NULL DEFAULT '',
            payment_method TEXT NOT NULL DEFAULT '',
            date TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        );
        ",
    },
    Migration {
        version: 2,
        sql: "
        CREATE TABLE IF NOT EXISTS payment_methods (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        );
        ",
    },
];

/// Persistent store for the expense variant.
pub struct ExpenseStore {
    conn: Connection,
}

impl ExpenseStore {
    /// Opens (and migrates) the store at the given path, creating it if
    /// necessary.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens an in-memory store. Useful for testing; the data is gone when
    /// the connection closes.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        run_migrations(&conn, MIGRATIONS)?;
        Ok(Self { conn })
    }

    /// Inserts the record when it has no id, otherwise overwrites the record
    /// at that id. Returns the stored record with its id filled in.
    pub fn put(&mut self, record: &ExpenseRecord) -> Result<ExpenseRecord, StoreError> {
        self.conn.execute(
            "
            INSERT OR REPLACE INTO expenses
            (id, description, amount, category, payment_method, date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
            params![
                record.id,
                record.description,
                record.amount,
                record.category,
                record.payment_method,
                format_date(record.date),
            ],
        )?;
        let id = match record.id {
            Some(id) => id,
            None => self.conn.last_insert_rowid(),
        };
        Ok(ExpenseRecord {
            id: Some(id),
            ..record.clone()
        })
    }

    /// Lists every record ordered by date, then insertion order.
    pub fn get_all(&self) -> Result<Vec<ExpenseRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, description, amount, category, payment_method, date
            FROM expenses
            ORDER BY date ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, description, amount, category, payment_method, date_text) = row?;
            let date = parse_date(&date_text).ok_or_else(|| StoreError::InvalidRecord {
                id,
                message: format!("malformed date {date_text}"),
            })?;
            records.push(ExpenseRecord {
                id: Some(id),
                description,
                amount,
                category,
                payment_method,
                date,
            });
        }
        Ok(records)
    }

    /// Removes the record. Deleting an id that does not exist is a no-op.
    pub fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM expenses WHERE id = ?1", [id])?;
        Ok(())
    }

    /// Adds a category label.
    pub fn add_category(&mut self, name: &str) -> Result<CategoryLabel, StoreError> {
        self.conn
            .execute("INSERT INTO categories (name) VALUES (?1)", [name])?;
        Ok(CategoryLabel {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    /// Lists category labels in creation order.
    pub fn categories(&self) -> Result<Vec<CategoryLabel>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM categories ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok(CategoryLabel {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        let mut labels = Vec::new();
        for row in rows {
            labels.push(row?);
        }
        Ok(labels)
    }

    /// Removes a category label. Records keep their denormalized category
    /// string; nothing cascades.
    pub fn delete_category(&mut self, id: i64) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM categories WHERE id = ?1", [id])?;
        Ok(())
    }

    /// Adds a payment method label.
    pub fn add_payment_method(&mut self, name: &str) -> Result<PaymentMethodLabel, StoreError> {
        self.conn
            .execute("INSERT INTO payment_methods (name) VALUES (?1)", [name])?;
        Ok(PaymentMethodLabel {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    /// Lists payment method labels in creation order.
    pub fn payment_methods(&self) -> Result<Vec<PaymentMethodLabel>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM payment_methods ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok(PaymentMethodLabel {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        let mut labels = Vec::new();
        for row in rows {
            labels.push(row?);
        }
        Ok(labels)
    }

    /// Removes a payment method label. No cascade.
    pub fn delete_payment_method(&mut self, id: i64) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM payment_methods WHERE id = ?1", [id])?;
        Ok(())
    }
}
