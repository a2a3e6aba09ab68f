use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod status;

pub use status::{OrderStatus, ParseOrderStatusError};

use crate::OrderId;
use crate::error::{OrderError, ValidationError};
use crate::item::{Item, ItemDraft};

/// A customer order as stored, with its items decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub phone: Option<String>,
    pub items: Vec<Item>,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub pickup_time: Option<String>,
    pub modified: bool,
}

/// What happened to an order when one of its items was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRemoval {
    /// The item was dropped and others remain.
    Shortened { remaining: usize },
    /// It was the last item: the list is kept and the order is now ready.
    Emptied,
}

impl Order {
    fn check_index(&self, index: usize) -> Result<(), OrderError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(OrderError::ItemOutOfRange {
                order_id: self.id,
                index,
                len: self.items.len(),
            })
        }
    }

    /// Cancels the item at `index`. Later items shift down by one.
    pub fn remove_item(&mut self, index: usize) -> Result<ItemRemoval, OrderError> {
        self.check_index(index)?;

        if self.items.len() == 1 {
            self.status = OrderStatus::Ready;
            return Ok(ItemRemoval::Emptied);
        }

        self.items.remove(index);
        Ok(ItemRemoval::Shortened {
            remaining: self.items.len(),
        })
    }

    /// Replaces the item at `index` in place and flags the order as modified.
    /// Returns the item that was replaced.
    pub fn replace_item(&mut self, index: usize, item: Item) -> Result<Item, OrderError> {
        self.check_index(index)?;

        self.modified = true;
        Ok(std::mem::replace(&mut self.items[index], item))
    }
}

/// A validated order ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    customer_name: String,
    phone: Option<String>,
    items: Vec<Item>,
    pickup_time: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

impl NewOrder {
    pub fn new(
        customer_name: &str,
        phone: Option<&str>,
        items: Vec<Item>,
        pickup_time: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let customer_name =
            non_blank(Some(customer_name)).ok_or(ValidationError::MissingCustomerName)?;

        if items.is_empty() {
            return Err(ValidationError::NoItems);
        }

        Ok(Self {
            customer_name,
            phone: non_blank(phone),
            items,
            pickup_time: non_blank(pickup_time),
        })
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn pickup_time(&self) -> Option<&str> {
        self.pickup_time.as_deref()
    }
}

/// Unvalidated order as submitted by the operator intake form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    #[serde(default, alias = "cliente")]
    pub customer_name: Option<String>,
    #[serde(default, alias = "telefone")]
    pub phone: Option<String>,
    #[serde(default, alias = "retirar_as")]
    pub pickup_time: Option<String>,
    #[serde(default, alias = "itens")]
    pub items: Option<Vec<ItemDraft>>,
}

impl TryFrom<OrderDraft> for NewOrder {
    type Error = ValidationError;

    fn try_from(draft: OrderDraft) -> Result<Self, Self::Error> {
        let customer_name = draft.customer_name.unwrap_or_default();
        if customer_name.trim().is_empty() {
            return Err(ValidationError::MissingCustomerName);
        }

        let drafts = draft.items.unwrap_or_default();
        if drafts.is_empty() {
            return Err(ValidationError::NoItems);
        }

        let items = drafts
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                Item::try_from(item).map_err(|reason| ValidationError::InvalidItem {
                    position: i + 1,
                    reason,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(
            &customer_name,
            draft.phone.as_deref(),
            items,
            draft.pickup_time.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ItemError;
    use crate::item::{Cut, Seasoning};

    fn item(description: &str) -> Item {
        Item::new(description, Cut::Steak, Seasoning::Yes, None).unwrap()
    }

    fn order_with(items: Vec<Item>) -> Order {
        Order {
            id: OrderId(7),
            customer_name: "Maria".to_string(),
            phone: None,
            items,
            created_at: Utc::now(),
            status: OrderStatus::Pending,
            pickup_time: None,
            modified: false,
        }
    }

    fn item_draft(description: &str) -> ItemDraft {
        ItemDraft {
            description: Some(description.to_string()),
            cut: Some("Bife".to_string()),
            seasoning: Some("yes".to_string()),
            grind_count: None,
        }
    }

    #[test]
    fn test_remove_item_shifts_later_items() {
        let mut order = order_with(vec![item("a"), item("b"), item("c")]);

        let removal = order.remove_item(1).unwrap();

        assert_eq!(removal, ItemRemoval::Shortened { remaining: 2 });
        assert_eq!(order.items, vec![item("a"), item("c")]);
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn test_remove_last_item_marks_ready_and_keeps_list() {
        let mut order = order_with(vec![item("1kg")]);

        let removal = order.remove_item(0).unwrap();

        assert_eq!(removal, ItemRemoval::Emptied);
        assert_eq!(order.status, OrderStatus::Ready);
        assert_eq!(order.items.len(), 1);
    }

    #[test]
    fn test_remove_item_out_of_range_leaves_items() {
        let mut order = order_with(vec![item("a"), item("b")]);

        let err = order.remove_item(2).unwrap_err();

        assert!(matches!(
            err,
            OrderError::ItemOutOfRange {
                order_id: OrderId(7),
                index: 2,
                len: 2
            }
        ));
        assert_eq!(order.items, vec![item("a"), item("b")]);
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn test_replace_item_sets_modified() {
        let mut order = order_with(vec![item("a"), item("b")]);

        let old = order.replace_item(1, item("z")).unwrap();

        assert_eq!(old, item("b"));
        assert_eq!(order.items, vec![item("a"), item("z")]);
        assert!(order.modified);
    }

    #[test]
    fn test_replace_item_out_of_range_keeps_flag_clear() {
        let mut order = order_with(vec![item("a")]);

        assert!(order.replace_item(5, item("z")).is_err());
        assert!(!order.modified);
        assert_eq!(order.items, vec![item("a")]);
    }

    #[test]
    fn test_new_order_requires_name_and_items() {
        assert_eq!(
            NewOrder::new("   ", None, vec![item("a")], None).unwrap_err(),
            ValidationError::MissingCustomerName
        );
        assert_eq!(
            NewOrder::new("Maria", None, vec![], None).unwrap_err(),
            ValidationError::NoItems
        );
    }

    #[test]
    fn test_new_order_trims_optional_fields() {
        let order = NewOrder::new(" Maria ", Some("  "), vec![item("a")], Some(" 15h ")).unwrap();

        assert_eq!(order.customer_name(), "Maria");
        assert_eq!(order.phone(), None);
        assert_eq!(order.pickup_time(), Some("15h"));
    }

    #[test]
    fn test_draft_validation_reports_item_position() {
        let mut bad = item_draft("2kg");
        bad.cut = Some("Picanha".to_string());

        let draft = OrderDraft {
            customer_name: Some("João".to_string()),
            items: Some(vec![item_draft("1kg"), bad]),
            ..OrderDraft::default()
        };

        assert_eq!(
            NewOrder::try_from(draft).unwrap_err(),
            ValidationError::InvalidItem {
                position: 2,
                reason: ItemError::UnknownCut("Picanha".to_string()),
            }
        );
    }

    #[test]
    fn test_draft_missing_items() {
        let draft = OrderDraft {
            customer_name: Some("João".to_string()),
            ..OrderDraft::default()
        };
        assert_eq!(NewOrder::try_from(draft).unwrap_err(), ValidationError::NoItems);

        let draft = OrderDraft {
            items: Some(vec![item_draft("1kg")]),
            ..OrderDraft::default()
        };
        assert_eq!(
            NewOrder::try_from(draft).unwrap_err(),
            ValidationError::MissingCustomerName
        );
    }
}
