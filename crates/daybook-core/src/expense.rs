//! Expense records and their submission validation.

use chrono::NaiveDate;

use crate::dates::parse_date;
use crate::parse::parse_amount;
use crate::types::ValidationError;

/// A single expense entry.
///
/// `category` and `payment_method` are denormalized free-text labels; they
/// reference the lookup tables by name only, so deleting a label never
/// cascades into existing records.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    /// Store-assigned id. `None` until the record is first persisted.
    pub id: Option<i64>,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub payment_method: String,
    pub date: NaiveDate,
}

/// A row in the category lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLabel {
    pub id: i64,
    pub name: String,
}

/// A row in the payment method lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMethodLabel {
    pub id: i64,
    pub name: String,
}

/// Raw expense form input, validated into an [`ExpenseRecord`].
#[derive(Debug, Clone, Default)]
pub struct ExpenseDraft {
    pub id: Option<i64>,
    pub description: String,
    pub amount: String,
    pub category: String,
    pub payment_method: String,
    pub date: String,
}

impl ExpenseDraft {
    /// Validates the draft, producing a record ready for the store.
    ///
    /// Description and amount are required; category and payment method may
    /// be empty. All parsing resolves here, before any store mutation.
    pub fn validate(self) -> Result<ExpenseRecord, ValidationError> {
        let description = self.description.trim().to_string();
        if description.is_empty() {
            return Err(ValidationError::Empty {
                field: "description",
            });
        }

        let amount = parse_amount(&self.amount).ok_or(ValidationError::InvalidAmount {
            value: self.amount.trim().to_string(),
        })?;

        let date = parse_date(&self.date).ok_or(ValidationError::InvalidDate {
            value: self.date.trim().to_string(),
        })?;

        Ok(ExpenseRecord {
            id: self.id,
            description,
            amount,
            category: self.category.trim().to_string(),
            payment_method: self.payment_method.trim().to_string(),
            date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ExpenseDraft {
        ExpenseDraft {
            id: None,
            description: "Weekly groceries".to_string(),
            amount: "42.50".to_string(),
            category: "Food".to_string(),
            payment_method: "Card".to_string(),
            date: "2025-03-09".to_string(),
        }
    }

    #[test]
    fn valid_draft_produces_record() {
        let record = draft().validate().expect("draft should validate");
        assert_eq!(record.description, "Weekly groceries");
        assert!((record.amount - 42.5).abs() < f64::EPSILON);
        assert_eq!(record.category, "Food");
        assert_eq!(record.date, parse_date("2025-03-09").unwrap());
        assert!(record.id.is_none());
    }

    #[test]
    fn description_is_required() {
        let mut input = draft();
        input.description = "   ".to_string();
        assert_eq!(
            input.validate(),
            Err(ValidationError::Empty {
                field: "description"
            })
        );
    }

    #[test]
    fn amount_must_be_a_non_negative_number() {
        let mut input = draft();
        input.amount = "-3".to_string();
        assert_eq!(
            input.validate(),
            Err(ValidationError::InvalidAmount {
                value: "-3".to_string()
            })
        );

        let mut input = draft();
        input.amount = String::new();
        assert!(matches!(
            input.validate(),
            Err(ValidationError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn category_and_payment_method_may_be_empty() {
        let mut input = draft();
        input.category = String::new();
        input.payment_method = "  ".to_string();
        let record = input.validate().expect("draft should validate");
        assert_eq!(record.category, "");
        assert_eq!(record.payment_method, "");
    }

    #[test]
    fn malformed_date_is_rejected() {
        let mut input = draft();
        input.date = "03/09/2025".to_string();
        assert_eq!(
            input.validate(),
            Err(ValidationError::InvalidDate {
                value: "03/09/2025".to_string()
            })
        );
    }
}
