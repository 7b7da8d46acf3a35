//! Reversal request parsing.
//!
//! The payload arrives as JSON:
//!
//! ```json
//! { "invoice_id": 10, "include_item_list": [{ "item_id": 1032, "qty": 2 }] }
//! ```
//!
//! A missing, `null` or empty `include_item_list` asks for a full reversal.

use serde::{Deserialize, Deserializer, Serialize};

use revoice_shared::types::{InvoiceId, ItemId};

use super::error::ReversalError;
use super::store::REVERSAL_REMARK_PREFIX;

/// One requested return: give back `qty` units of `item_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnLine {
    /// The item being returned.
    pub item_id: ItemId,
    /// Units to return; must be positive.
    pub qty: i32,
}

/// A request to reverse an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnRequest {
    /// The invoice to reverse.
    pub invoice_id: InvoiceId,
    /// Items to return. Empty means reverse everything.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub include_item_list: Vec<ReturnLine>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ReturnLine>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ReturnLine>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Which reversal path a request takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReversalMode<'a> {
    /// Delete the invoice and its original transaction.
    Full,
    /// Return the listed quantities and post a reversing journal.
    Partial(&'a [ReturnLine]),
}

impl ReturnRequest {
    /// Creates a full reversal request.
    #[must_use]
    pub const fn full(invoice_id: InvoiceId) -> Self {
        Self {
            invoice_id,
            include_item_list: Vec::new(),
        }
    }

    /// Creates a partial reversal request.
    #[must_use]
    pub const fn partial(invoice_id: InvoiceId, include_item_list: Vec<ReturnLine>) -> Self {
        Self {
            invoice_id,
            include_item_list,
        }
    }

    /// Parses and validates a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns `MalformedRequest` if the payload is not valid JSON of the
    /// expected shape or a requested quantity is not positive.
    pub fn parse(payload: &str) -> Result<Self, ReversalError> {
        let request: Self = serde_json::from_str(payload)
            .map_err(|e| ReversalError::MalformedRequest(e.to_string()))?;
        request.validate()?;
        Ok(request)
    }

    /// Checks the request for values the engine cannot honour.
    ///
    /// # Errors
    ///
    /// Returns `MalformedRequest` for a zero or negative quantity.
    pub fn validate(&self) -> Result<(), ReversalError> {
        if let Some(line) = self.include_item_list.iter().find(|line| line.qty <= 0) {
            return Err(ReversalError::MalformedRequest(format!(
                "quantity for item {} must be positive, got {}",
                line.item_id, line.qty
            )));
        }
        Ok(())
    }

    /// The reversal path selected by this request.
    #[must_use]
    pub fn mode(&self) -> ReversalMode<'_> {
        if self.include_item_list.is_empty() {
            ReversalMode::Full
        } else {
            ReversalMode::Partial(&self.include_item_list)
        }
    }

    /// Distinct requested items, in first-mention order.
    #[must_use]
    pub fn requested_items(&self) -> Vec<ItemId> {
        let mut items = Vec::with_capacity(self.include_item_list.len());
        for line in &self.include_item_list {
            if !items.contains(&line.item_id) {
                items.push(line.item_id);
            }
        }
        items
    }

    /// Remark stored on the reversing transaction.
    #[must_use]
    pub fn reversal_remark(&self) -> String {
        let payload = serde_json::to_string(self).unwrap_or_default();
        format!(
            "{REVERSAL_REMARK_PREFIX} {}\nPayload - {payload}",
            self.invoice_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_request() {
        let request = ReturnRequest::parse(
            r#"{"invoice_id": 10, "include_item_list": [{"item_id": 1032, "qty": 2}, {"item_id": 3013, "qty": 1}]}"#,
        )
        .unwrap();

        assert_eq!(request.invoice_id, InvoiceId::new(10));
        assert_eq!(
            request.mode(),
            ReversalMode::Partial(&[
                ReturnLine { item_id: ItemId::new(1032), qty: 2 },
                ReturnLine { item_id: ItemId::new(3013), qty: 1 },
            ])
        );
    }

    #[test]
    fn test_missing_empty_and_null_lists_mean_full_reversal() {
        for payload in [
            r#"{"invoice_id": 10}"#,
            r#"{"invoice_id": 10, "include_item_list": []}"#,
            r#"{"invoice_id": 10, "include_item_list": null}"#,
        ] {
            let request = ReturnRequest::parse(payload).unwrap();
            assert_eq!(request.mode(), ReversalMode::Full, "payload: {payload}");
        }
    }

    #[test]
    fn test_malformed_payloads() {
        for payload in [
            "",
            "{}",
            r#"{"invoice_id": "ten"}"#,
            r#"{"invoice_id": 10, "include_item_list": [1032, 3013]}"#,
            r#"{"invoice_id": 10, "include_item_list": [{"item_id": 1}]}"#,
        ] {
            let err = ReturnRequest::parse(payload).unwrap_err();
            assert!(
                matches!(err, ReversalError::MalformedRequest(_)),
                "payload: {payload}"
            );
        }
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let err = ReturnRequest::parse(
            r#"{"invoice_id": 10, "include_item_list": [{"item_id": 5, "qty": 0}]}"#,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_REQUEST");

        let err = ReturnRequest::parse(
            r#"{"invoice_id": 10, "include_item_list": [{"item_id": 5, "qty": -3}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("got -3"));
    }

    #[test]
    fn test_requested_items_are_distinct() {
        let request = ReturnRequest::partial(
            InvoiceId::new(1),
            vec![
                ReturnLine { item_id: ItemId::new(7), qty: 1 },
                ReturnLine { item_id: ItemId::new(5), qty: 1 },
                ReturnLine { item_id: ItemId::new(7), qty: 2 },
            ],
        );
        assert_eq!(request.requested_items(), vec![ItemId::new(7), ItemId::new(5)]);
    }

    #[test]
    fn test_reversal_remark() {
        let request = ReturnRequest::partial(
            InvoiceId::new(10),
            vec![ReturnLine { item_id: ItemId::new(5), qty: 4 }],
        );
        assert_eq!(
            request.reversal_remark(),
            "INVOICE REVERSAL 10\nPayload - {\"invoice_id\":10,\"include_item_list\":[{\"item_id\":5,\"qty\":4}]}"
        );
    }
}
