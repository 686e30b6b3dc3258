//! Offer draft aggregate.
//!
//! Holds the in-memory list of line items an operator builds up before the
//! surrounding application persists the offer, together with the scratch
//! state of the custom-item sub-form. All operations are synchronous and
//! infallible; malformed numeric input is normalized instead of rejected.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::types::{EquipmentId, ItemId, ProductId, SubcontractorId};

/// Catalog product as presented by the product picker.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub base_price: f64,
}

/// Single line item of an offer draft.
///
/// `discount_amount`, `total` and `display_order` are carried for
/// persistence compatibility and are not maintained by the draft.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OfferDraftItem {
    pub id: ItemId,
    pub product_id: Option<ProductId>,
    pub name: String,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    pub discount_percent: f64,
    pub subtotal: f64,
    pub discount_amount: f64,
    pub total: f64,
    pub display_order: i32,
    pub equipment_ids: Vec<EquipmentId>,
    pub subcontractor_id: Option<SubcontractorId>,
    pub needs_subcontractor: bool,
}

/// Partial update applied to an existing line item.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct OfferItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub quantity: Option<f64>,
    pub unit_price: Option<f64>,
    pub discount_percent: Option<f64>,
}

/// Scratch state of the custom-item sub-form.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CustomItemDraft {
    pub name: String,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    pub discount_percent: f64,
    pub equipment_ids: Vec<EquipmentId>,
    pub subcontractor_id: Option<SubcontractorId>,
    pub needs_subcontractor: bool,
}

impl Default for CustomItemDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            unit: None,
            quantity: 1.0,
            unit_price: 0.0,
            discount_percent: 0.0,
            equipment_ids: Vec::new(),
            subcontractor_id: None,
            needs_subcontractor: false,
        }
    }
}

/// Partial update merged into the custom-item scratch state.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CustomItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub quantity: Option<f64>,
    pub unit_price: Option<f64>,
    pub discount_percent: Option<f64>,
    pub equipment_ids: Option<Vec<EquipmentId>>,
    pub subcontractor_id: Option<SubcontractorId>,
    pub needs_subcontractor: Option<bool>,
}

/// How out-of-range pricing input is treated when computing subtotals.
///
/// `Passthrough` keeps the historical behavior: discounts above 100% or
/// negative amounts are accepted verbatim, which can invert or negate a
/// subtotal. Upstream form validation is expected to keep values sane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DiscountPolicy {
    #[default]
    Passthrough,
    /// Clamp discount to [0, 100] and negative quantity/price to 0.
    Clamp,
}

/// In-memory draft of an offer under construction.
#[derive(Clone, Debug, Default)]
pub struct OfferDraft {
    items: Vec<OfferDraftItem>,
    custom_item: CustomItemDraft,
    pub show_custom_item_form: bool,
    pub show_equipment_selector: bool,
    pub show_subcontractor_selector: bool,
    equipment_selection: HashMap<EquipmentId, bool>,
    equipment_conflicts: HashMap<EquipmentId, Vec<EquipmentId>>,
    policy: DiscountPolicy,
}

impl OfferDraft {
    /// Creates an empty draft with the default (passthrough) policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty draft applying the given discount policy.
    pub fn with_policy(policy: DiscountPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Current line items, in insertion order.
    pub fn items(&self) -> &[OfferDraftItem] {
        &self.items
    }

    /// Current custom-item scratch state.
    pub fn custom_item(&self) -> &CustomItemDraft {
        &self.custom_item
    }

    /// Equipment picked in the equipment selector.
    pub fn equipment_selection(&self) -> &HashMap<EquipmentId, bool> {
        &self.equipment_selection
    }

    /// Known booking conflicts per equipment record.
    pub fn equipment_conflicts(&self) -> &HashMap<EquipmentId, Vec<EquipmentId>> {
        &self.equipment_conflicts
    }

    /// Adds a catalog product to the draft.
    ///
    /// If the product is already present its quantity is incremented by one;
    /// otherwise a new line item is appended with quantity 1 and no discount.
    pub fn add_product(&mut self, product: &CatalogProduct) -> ItemId {
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product_id == Some(product.id))
        {
            item.quantity += 1.0;
            item.subtotal = line_subtotal(
                item.quantity,
                item.unit_price,
                item.discount_percent,
                self.policy,
            );
            return item.id;
        }

        let id = ItemId::new();
        let subtotal = line_subtotal(1.0, sanitize_amount(product.base_price), 0.0, self.policy);
        self.items.push(OfferDraftItem {
            id,
            product_id: Some(product.id),
            name: product.name.clone(),
            description: product.description.clone(),
            unit: product.unit.clone(),
            quantity: 1.0,
            unit_price: sanitize_amount(product.base_price),
            discount_percent: 0.0,
            subtotal,
            discount_amount: 0.0,
            total: 0.0,
            display_order: 0,
            equipment_ids: Vec::new(),
            subcontractor_id: None,
            needs_subcontractor: false,
        });
        id
    }

    /// Removes the line item with the given id. No-op when absent.
    pub fn remove_item(&mut self, id: ItemId) {
        self.items.retain(|item| item.id != id);
    }

    /// Merges the patch into the matching item and recomputes its subtotal.
    /// No-op when the id is not present.
    pub fn update_item(&mut self, id: ItemId, patch: OfferItemPatch) {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return;
        };

        if let Some(name) = patch.name {
            item.name = name;
        }
        if let Some(description) = patch.description {
            item.description = Some(description);
        }
        if let Some(unit) = patch.unit {
            item.unit = Some(unit);
        }
        if let Some(quantity) = patch.quantity {
            item.quantity = sanitize_quantity(quantity);
        }
        if let Some(unit_price) = patch.unit_price {
            item.unit_price = sanitize_amount(unit_price);
        }
        if let Some(discount_percent) = patch.discount_percent {
            item.discount_percent = sanitize_amount(discount_percent);
        }

        // Recomputed unconditionally so the subtotal is never stale.
        item.subtotal = line_subtotal(
            item.quantity,
            item.unit_price,
            item.discount_percent,
            self.policy,
        );
    }

    /// Merges the patch into the custom-item scratch state.
    pub fn set_custom_item(&mut self, patch: CustomItemPatch) {
        let draft = &mut self.custom_item;
        if let Some(name) = patch.name {
            draft.name = name;
        }
        if let Some(description) = patch.description {
            draft.description = Some(description);
        }
        if let Some(unit) = patch.unit {
            draft.unit = Some(unit);
        }
        if let Some(quantity) = patch.quantity {
            draft.quantity = sanitize_quantity(quantity);
        }
        if let Some(unit_price) = patch.unit_price {
            draft.unit_price = sanitize_amount(unit_price);
        }
        if let Some(discount_percent) = patch.discount_percent {
            draft.discount_percent = sanitize_amount(discount_percent);
        }
        if let Some(equipment_ids) = patch.equipment_ids {
            draft.equipment_ids = equipment_ids;
        }
        if let Some(subcontractor_id) = patch.subcontractor_id {
            draft.subcontractor_id = Some(subcontractor_id);
        }
        if let Some(needs_subcontractor) = patch.needs_subcontractor {
            draft.needs_subcontractor = needs_subcontractor;
        }
    }

    /// Converts the custom-item scratch state into a new line item.
    ///
    /// The scratch state and the sub-form toggles are reset afterwards so
    /// the form comes back empty for the next entry.
    pub fn commit_custom_item(&mut self) -> ItemId {
        let draft = std::mem::take(&mut self.custom_item);
        let id = ItemId::new();
        let subtotal = line_subtotal(
            draft.quantity,
            draft.unit_price,
            draft.discount_percent,
            self.policy,
        );
        self.items.push(OfferDraftItem {
            id,
            product_id: None,
            name: draft.name,
            description: draft.description,
            unit: draft.unit,
            quantity: draft.quantity,
            unit_price: draft.unit_price,
            discount_percent: draft.discount_percent,
            subtotal,
            discount_amount: 0.0,
            total: 0.0,
            display_order: 0,
            equipment_ids: draft.equipment_ids,
            subcontractor_id: draft.subcontractor_id,
            needs_subcontractor: draft.needs_subcontractor,
        });

        self.show_custom_item_form = false;
        self.show_equipment_selector = false;
        self.show_subcontractor_selector = false;
        id
    }

    /// Flips the selection state of a piece of equipment.
    pub fn toggle_equipment(&mut self, id: EquipmentId) {
        let entry = self.equipment_selection.entry(id).or_insert(false);
        *entry = !*entry;
    }

    /// Records booking conflicts reported for a piece of equipment.
    pub fn set_equipment_conflicts(&mut self, id: EquipmentId, conflicts: Vec<EquipmentId>) {
        self.equipment_conflicts.insert(id, conflicts);
    }

    /// Clears the entire draft back to the initial empty configuration.
    /// The discount policy is configuration, not state, and survives.
    pub fn reset(&mut self) {
        let policy = self.policy;
        *self = Self::with_policy(policy);
    }

    /// Running total: sum of line subtotals, recomputed on every read.
    pub fn total(&self) -> f64 {
        self.items.iter().map(|item| item.subtotal).sum()
    }
}

/// Non-finite quantities fall back to 1.
fn sanitize_quantity(value: f64) -> f64 {
    if value.is_finite() { value } else { 1.0 }
}

/// Non-finite prices and discounts fall back to 0.
fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// `quantity * unit_price * (1 - discount / 100)` under the given policy.
fn line_subtotal(
    quantity: f64,
    unit_price: f64,
    discount_percent: f64,
    policy: DiscountPolicy,
) -> f64 {
    let (quantity, unit_price, discount_percent) = match policy {
        DiscountPolicy::Passthrough => (quantity, unit_price, discount_percent),
        DiscountPolicy::Clamp => (
            quantity.max(0.0),
            unit_price.max(0.0),
            discount_percent.clamp(0.0, 100.0),
        ),
    };
    quantity * unit_price * (1.0 - discount_percent / 100.0)
}
