//! Users, items, cases and their types.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use ruby_id::{CaseId, CaseTypeId, ItemId, ItemTypeId, UserId};
use ruby_wire::{define_wire_enum, define_wire_object, Backref, Shared};

define_wire_enum! {
    /// How rare an item type is.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum ItemRarity {
        Common,
        Uncommon,
        Rare,
        Epic,
        Legendary,
    }
}

define_wire_object! {
    /// A registered player.
    #[derive(Debug, Clone)]
    pub struct User {
        pub id: UserId,
        pub user_name: String,
        /// Balance in the smallest currency unit.
        pub balance: i64,
        pub created_at: DateTime<Utc>,
    }
}

define_wire_object! {
    /// A kind of item that can drop from a case.
    #[derive(Debug, Clone)]
    pub struct ItemType {
        pub id: ItemTypeId,
        pub name: String,
        pub rarity: ItemRarity,
        pub price: i64,
    }
}

define_wire_object! {
    /// A concrete item produced by opening a case.
    #[derive(Debug)]
    pub struct Item {
        pub id: ItemId,
        pub item_type: Shared<ItemType>,
        pub owner_id: Option<UserId>,
        pub owning_case: Backref<Case>,
    }
}

define_wire_object! {
    /// A kind of case offered for sale.
    #[derive(Debug, Clone)]
    pub struct CaseType {
        pub id: CaseTypeId,
        pub name: String,
        pub price: i64,
    }
}

define_wire_object! {
    /// An opened case and the items it produced.
    #[derive(Debug)]
    pub struct Case {
        pub id: CaseId,
        pub case_type: Shared<CaseType>,
        pub items: Vec<Shared<Item>>,
        pub opened_by: Option<UserId>,
        pub created_at: DateTime<Utc>,
    }
}

impl User {
    /// Creates a user with a fresh id and an empty balance.
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            user_name: user_name.into(),
            balance: 0,
            created_at: Utc::now(),
        }
    }
}

impl ItemType {
    pub fn new(name: impl Into<String>, rarity: ItemRarity, price: i64) -> Shared<Self> {
        Rc::new(RefCell::new(Self {
            id: ItemTypeId::new(),
            name: name.into(),
            rarity,
            price,
        }))
    }
}

impl CaseType {
    pub fn new(name: impl Into<String>, price: i64) -> Shared<Self> {
        Rc::new(RefCell::new(Self {
            id: CaseTypeId::new(),
            name: name.into(),
            price,
        }))
    }
}

/// Opens a case of `case_type`, producing one item per entry of `drops`.
///
/// Every item points back to the returned case and is owned by `opened_by`.
pub fn open_case(
    case_type: Shared<CaseType>,
    drops: &[Shared<ItemType>],
    opened_by: Option<UserId>,
) -> Shared<Case> {
    Rc::new_cyclic(|case| {
        let items = drops
            .iter()
            .map(|item_type| {
                Rc::new(RefCell::new(Item {
                    id: ItemId::new(),
                    item_type: Rc::clone(item_type),
                    owner_id: opened_by,
                    owning_case: case.clone(),
                }))
            })
            .collect();

        RefCell::new(Case {
            id: CaseId::new(),
            case_type,
            items,
            opened_by,
            created_at: Utc::now(),
        })
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ruby_id::CodecRegistry;
    use ruby_wire::{GraphSerializer, ReferencePolicy, SerializerOptions};
    use serde_json::json;

    use super::*;

    fn serializer(references: ReferencePolicy) -> GraphSerializer {
        GraphSerializer::with_options(
            Arc::new(CodecRegistry::standard()),
            SerializerOptions {
                references,
                pretty: false,
            },
        )
    }

    #[test]
    fn test_open_case_links_items_back_to_case() {
        let case_type = CaseType::new("Starter", 100);
        let knife = ItemType::new("Knife", ItemRarity::Legendary, 5_000);
        let case = open_case(case_type, &[knife], None);

        let case_ref = case.borrow();
        let item = case_ref.items[0].borrow();
        let owner = item.owning_case.upgrade().unwrap();
        assert!(Rc::ptr_eq(&owner, &case));
    }

    #[test]
    fn test_case_serializes_with_back_references_flattened() {
        let user = User::new("ada");
        let case_type = CaseType::new("Starter", 100);
        let knife = ItemType::new("Knife", ItemRarity::Legendary, 5_000);
        let case = open_case(case_type, &[knife.clone(), knife], Some(user.id));

        let value = serializer(ReferencePolicy::IgnoreRepeated).to_value(&case);
        let case_ref = case.borrow();

        assert_eq!(value["id"], json!(case_ref.id.encode()));
        assert_eq!(value["case_type"]["name"], json!("Starter"));
        assert_eq!(value["opened_by"], json!(user.id.encode()));

        let items = value["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["item_type"]["rarity"], json!("legendary"));
        assert_eq!(items[0]["owning_case"], json!(null));
        // The shared item type was already written for the first item.
        assert_eq!(items[1]["item_type"], json!(null));
        assert_eq!(items[1]["owning_case"], json!(null));
    }

    #[test]
    fn test_shared_item_type_repeats_when_ignoring_cycles_only() {
        let case_type = CaseType::new("Starter", 100);
        let knife = ItemType::new("Knife", ItemRarity::Rare, 5_000);
        let case = open_case(case_type, &[knife.clone(), knife], None);

        let value = serializer(ReferencePolicy::IgnoreCycles).to_value(&case);
        let items = value["items"].as_array().unwrap();
        assert_eq!(items[1]["item_type"]["name"], json!("Knife"));
        assert_eq!(items[1]["owning_case"], json!(null));
    }

    #[test]
    fn test_user_fields() {
        let user = User::new("ada");
        let value = serializer(ReferencePolicy::default()).to_value(&user);
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["id", "user_name", "balance", "created_at"]);
        assert_eq!(value["balance"], json!(0));
    }
}
