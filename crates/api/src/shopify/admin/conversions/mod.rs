//! Type conversions from GraphQL response types to domain types.

use print_quote_core::CustomAttribute;

use crate::shopify::UserError;
use crate::shopify::types::{
    CompletedDraftOrder, DraftOrder, DraftOrderLineItem, FileRecord, FileStatus, LegacyFileRecord,
    Money, StagedUploadTarget,
};

use super::queries::common::{
    AttributeInput, DraftOrderFields, DraftOrderLineItemFields, MoneyBag, UserErrors,
};
use super::queries::{draft_order_complete, file_fields::FileNode, get_metaobjects, staged_uploads_create};

pub fn convert_user_errors(errors: Vec<UserErrors>) -> Vec<UserError> {
    errors
        .into_iter()
        .map(|e| UserError {
            field: e.field.unwrap_or_default(),
            message: e.message,
        })
        .collect()
}

fn convert_money(bag: MoneyBag) -> Money {
    Money {
        amount: bag.shop_money.amount,
        currency_code: bag.shop_money.currency_code,
    }
}

// =============================================================================
// Files
// =============================================================================

pub fn convert_staged_target(
    target: staged_uploads_create::StagedMediaUploadTarget,
) -> StagedUploadTarget {
    StagedUploadTarget {
        url: target.url.unwrap_or_default(),
        resource_url: target.resource_url.unwrap_or_default(),
        parameters: target
            .parameters
            .into_iter()
            .map(|p| (p.name, p.value))
            .collect(),
    }
}

pub fn convert_file(node: FileNode) -> FileRecord {
    let url = node.url.or_else(|| node.image.map(|image| image.url));
    let original_file_size = node
        .original_file_size
        .or_else(|| node.original_source.and_then(|s| s.file_size));

    FileRecord {
        id: node.id,
        url,
        alt: node.alt,
        original_file_size,
        status: node
            .file_status
            .map_or_else(|| FileStatus::Unknown(String::new()), FileStatus::from),
    }
}

pub fn convert_metaobject(node: get_metaobjects::Metaobject) -> LegacyFileRecord {
    LegacyFileRecord {
        id: node.id,
        handle: node.handle,
        fields: node
            .fields
            .into_iter()
            .map(|f| (f.key, f.value.unwrap_or_default()))
            .collect(),
    }
}

// =============================================================================
// Draft orders
// =============================================================================

fn convert_line_item(item: DraftOrderLineItemFields) -> DraftOrderLineItem {
    DraftOrderLineItem {
        id: item.id,
        title: item.title,
        quantity: item.quantity,
        original_unit_price: item.original_unit_price_set.map(convert_money),
        custom_attributes: item
            .custom_attributes
            .into_iter()
            .map(|a| CustomAttribute {
                key: a.key,
                value: a.value.unwrap_or_default(),
            })
            .collect(),
    }
}

pub fn convert_draft_order(order: DraftOrderFields) -> DraftOrder {
    DraftOrder {
        id: order.id,
        name: order.name,
        status: order.status,
        email: order.email,
        note: order.note2,
        created_at: order.created_at,
        updated_at: order.updated_at,
        invoice_url: order.invoice_url,
        tax_exempt: order.tax_exempt,
        tags: order.tags,
        total_price: order.total_price_set.map(convert_money),
        subtotal_price: order.subtotal_price_set.map(convert_money),
        line_items: order
            .line_items
            .nodes
            .into_iter()
            .map(convert_line_item)
            .collect(),
    }
}

pub fn convert_completed_draft_order(
    order: draft_order_complete::CompletedDraftOrder,
) -> CompletedDraftOrder {
    let (order_id, order_name) = order
        .order
        .map_or((None, None), |o| (Some(o.id), Some(o.name)));

    CompletedDraftOrder {
        id: order.id,
        name: order.name,
        status: order.status,
        invoice_url: order.invoice_url,
        total_price: order.total_price_set.map(convert_money),
        order_id,
        order_name,
    }
}

pub fn attribute_inputs(attributes: &[CustomAttribute]) -> Vec<AttributeInput> {
    attributes
        .iter()
        .map(|a| AttributeInput {
            key: a.key.clone(),
            value: a.value.clone(),
        })
        .collect()
}
