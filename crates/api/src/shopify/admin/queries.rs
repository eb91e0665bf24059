//! GraphQL operations for the Shopify Admin API.
//!
//! Each operation is a zero-sized type implementing
//! [`graphql_client::GraphQLQuery`], with its `Variables` and `ResponseData`
//! in a snake_case module of the same name (the layout the derive macro
//! produces). Only the fields this service reads are selected.

use graphql_client::{GraphQLQuery, QueryBody};

/// Declare an operation type backed by a module holding `QUERY`,
/// `OPERATION_NAME`, `Variables` and `ResponseData`.
macro_rules! operation {
    ($name:ident => $module:ident) => {
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $module::QUERY,
                    operation_name: $module::OPERATION_NAME,
                }
            }
        }
    };
}

/// Selection shared by every query returning a draft order.
macro_rules! draft_order_fragment {
    () => {
        r"
fragment DraftOrderFields on DraftOrder {
  id
  name
  status
  email
  note2
  createdAt
  updatedAt
  invoiceUrl
  taxExempt
  tags
  totalPriceSet { shopMoney { amount currencyCode } }
  subtotalPriceSet { shopMoney { amount currencyCode } }
  lineItems(first: 10) {
    nodes {
      id
      title
      quantity
      originalUnitPriceSet { shopMoney { amount currencyCode } }
      customAttributes { key value }
    }
  }
}
"
    };
}

operation!(StagedUploadsCreate => staged_uploads_create);
operation!(FileCreate => file_create);
operation!(FileDelete => file_delete);
operation!(GetFile => get_file);
operation!(GetMetaobjects => get_metaobjects);
operation!(DraftOrderCreate => draft_order_create);
operation!(GetDraftOrders => get_draft_orders);
operation!(GetDraftOrder => get_draft_order);
operation!(DraftOrderUpdate => draft_order_update);
operation!(DraftOrderDelete => draft_order_delete);
operation!(DraftOrderComplete => draft_order_complete);
operation!(DraftOrderInvoiceSend => draft_order_invoice_send);

/// Shapes shared between operations.
pub mod common {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Deserialize)]
    pub struct UserErrors {
        pub field: Option<Vec<String>>,
        pub message: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MoneyV2 {
        pub amount: String,
        pub currency_code: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MoneyBag {
        pub shop_money: MoneyV2,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Attribute {
        pub key: String,
        pub value: Option<String>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct AttributeInput {
        pub key: String,
        pub value: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DraftOrderLineItemFields {
        pub id: String,
        pub title: String,
        pub quantity: i64,
        pub original_unit_price_set: Option<MoneyBag>,
        #[serde(default)]
        pub custom_attributes: Vec<Attribute>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct DraftOrderLineItemConnection {
        pub nodes: Vec<DraftOrderLineItemFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DraftOrderFields {
        pub id: String,
        pub name: String,
        pub status: String,
        pub email: Option<String>,
        pub note2: Option<String>,
        pub created_at: String,
        pub updated_at: String,
        pub invoice_url: Option<String>,
        #[serde(default)]
        pub tax_exempt: bool,
        #[serde(default)]
        pub tags: Vec<String>,
        pub total_price_set: Option<MoneyBag>,
        pub subtotal_price_set: Option<MoneyBag>,
        pub line_items: DraftOrderLineItemConnection,
    }

    /// Line item input for `DraftOrderInput.lineItems` (custom items only).
    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DraftOrderLineItemInput {
        pub title: String,
        pub quantity: i64,
        pub original_unit_price: String,
        pub custom_attributes: Vec<AttributeInput>,
        pub requires_shipping: bool,
    }

    #[derive(Debug, Clone, Default, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DraftOrderInput {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub email: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub note: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub tags: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub tax_exempt: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub line_items: Option<Vec<DraftOrderLineItemInput>>,
    }
}

pub mod staged_uploads_create {
    use serde::{Deserialize, Serialize};

    pub use super::common::UserErrors;

    pub const OPERATION_NAME: &str = "StagedUploadsCreate";
    pub const QUERY: &str = r"
mutation StagedUploadsCreate($input: [StagedUploadInput!]!) {
  stagedUploadsCreate(input: $input) {
    stagedTargets {
      url
      resourceUrl
      parameters { name value }
    }
    userErrors { field message }
  }
}
";

    #[derive(Debug, Clone, Copy, Serialize)]
    #[allow(clippy::upper_case_acronyms)]
    pub enum StagedUploadTargetGenerateUploadResource {
        FILE,
        IMAGE,
    }

    #[derive(Debug, Clone, Copy, Serialize)]
    #[allow(clippy::upper_case_acronyms)]
    pub enum StagedUploadHttpMethodType {
        POST,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StagedUploadInput {
        pub filename: String,
        pub mime_type: String,
        pub resource: StagedUploadTargetGenerateUploadResource,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub file_size: Option<String>,
        pub http_method: StagedUploadHttpMethodType,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: Vec<StagedUploadInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct StagedUploadParameter {
        pub name: String,
        pub value: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StagedMediaUploadTarget {
        pub url: Option<String>,
        pub resource_url: Option<String>,
        #[serde(default)]
        pub parameters: Vec<StagedUploadParameter>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StagedUploadsCreatePayload {
        pub staged_targets: Option<Vec<StagedMediaUploadTarget>>,
        pub user_errors: Vec<UserErrors>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub staged_uploads_create: Option<StagedUploadsCreatePayload>,
    }
}

/// Fields selected on any `File` implementation.
pub mod file_fields {
    use serde::Deserialize;

    #[derive(Debug, Clone, Deserialize)]
    pub struct Image {
        pub url: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct OriginalSource {
        pub file_size: Option<u64>,
    }

    /// Union of the `GenericFile` and `MediaImage` fragments.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FileNode {
        #[serde(rename = "__typename")]
        pub typename: String,
        pub id: String,
        pub file_status: Option<String>,
        pub alt: Option<String>,
        /// `GenericFile.url`
        pub url: Option<String>,
        /// `GenericFile.originalFileSize`
        pub original_file_size: Option<u64>,
        /// `MediaImage.image`
        pub image: Option<Image>,
        /// `MediaImage.originalSource`
        pub original_source: Option<OriginalSource>,
    }
}

pub mod file_create {
    use serde::{Deserialize, Serialize};

    pub use super::common::UserErrors;
    pub use super::file_fields::FileNode;

    pub const OPERATION_NAME: &str = "FileCreate";
    pub const QUERY: &str = r"
mutation FileCreate($files: [FileCreateInput!]!) {
  fileCreate(files: $files) {
    files {
      __typename
      id
      fileStatus
      alt
      ... on GenericFile { url originalFileSize }
      ... on MediaImage { image { url } originalSource { fileSize } }
    }
    userErrors { field message }
  }
}
";

    #[derive(Debug, Clone, Copy, Serialize)]
    #[allow(clippy::upper_case_acronyms)]
    pub enum FileContentType {
        FILE,
        IMAGE,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FileCreateInput {
        pub original_source: String,
        pub content_type: FileContentType,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub alt: Option<String>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub files: Vec<FileCreateInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FileCreatePayload {
        pub files: Option<Vec<FileNode>>,
        pub user_errors: Vec<UserErrors>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub file_create: Option<FileCreatePayload>,
    }
}

pub mod file_delete {
    use serde::{Deserialize, Serialize};

    pub use super::common::UserErrors;

    pub const OPERATION_NAME: &str = "FileDelete";
    pub const QUERY: &str = r"
mutation FileDelete($fileIds: [ID!]!) {
  fileDelete(fileIds: $fileIds) {
    deletedFileIds
    userErrors { field message }
  }
}
";

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub file_ids: Vec<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FileDeletePayload {
        pub deleted_file_ids: Option<Vec<String>>,
        pub user_errors: Vec<UserErrors>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub file_delete: Option<FileDeletePayload>,
    }
}

pub mod get_file {
    use serde::{Deserialize, Serialize};

    pub use super::file_fields::FileNode;

    pub const OPERATION_NAME: &str = "GetFile";
    pub const QUERY: &str = r"
query GetFile($id: ID!) {
  node(id: $id) {
    __typename
    id
    ... on GenericFile { fileStatus alt url originalFileSize }
    ... on MediaImage { fileStatus alt image { url } originalSource { fileSize } }
  }
}
";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub node: Option<FileNode>,
    }
}

pub mod get_metaobjects {
    use serde::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "GetMetaobjects";
    pub const QUERY: &str = r"
query GetMetaobjects($type: String!, $first: Int!) {
  metaobjects(type: $type, first: $first) {
    nodes {
      id
      handle
      fields { key value }
    }
  }
}
";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        #[serde(rename = "type")]
        pub type_: String,
        pub first: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct MetaobjectField {
        pub key: String,
        pub value: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Metaobject {
        pub id: String,
        pub handle: String,
        pub fields: Vec<MetaobjectField>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct MetaobjectConnection {
        pub nodes: Vec<Metaobject>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub metaobjects: MetaobjectConnection,
    }
}

pub mod draft_order_create {
    use serde::{Deserialize, Serialize};

    pub use super::common::{DraftOrderFields, DraftOrderInput, UserErrors};

    pub const OPERATION_NAME: &str = "DraftOrderCreate";
    pub const QUERY: &str = concat!(
        r"
mutation DraftOrderCreate($input: DraftOrderInput!) {
  draftOrderCreate(input: $input) {
    draftOrder { ...DraftOrderFields }
    userErrors { field message }
  }
}
",
        draft_order_fragment!()
    );

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: DraftOrderInput,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DraftOrderCreatePayload {
        pub draft_order: Option<DraftOrderFields>,
        pub user_errors: Vec<UserErrors>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub draft_order_create: Option<DraftOrderCreatePayload>,
    }
}

pub mod get_draft_orders {
    use serde::{Deserialize, Serialize};

    pub use super::common::DraftOrderFields;

    pub const OPERATION_NAME: &str = "GetDraftOrders";
    pub const QUERY: &str = concat!(
        r"
query GetDraftOrders($first: Int!, $query: String) {
  draftOrders(first: $first, query: $query, sortKey: ID, reverse: true) {
    nodes { ...DraftOrderFields }
    pageInfo { hasNextPage }
  }
}
",
        draft_order_fragment!()
    );

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
        pub query: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PageInfo {
        pub has_next_page: bool,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DraftOrderConnection {
        pub nodes: Vec<DraftOrderFields>,
        pub page_info: PageInfo,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub draft_orders: DraftOrderConnection,
    }
}

pub mod get_draft_order {
    use serde::{Deserialize, Serialize};

    pub use super::common::DraftOrderFields;

    pub const OPERATION_NAME: &str = "GetDraftOrder";
    pub const QUERY: &str = concat!(
        r"
query GetDraftOrder($id: ID!) {
  draftOrder(id: $id) { ...DraftOrderFields }
}
",
        draft_order_fragment!()
    );

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub draft_order: Option<DraftOrderFields>,
    }
}

pub mod draft_order_update {
    use serde::{Deserialize, Serialize};

    pub use super::common::{DraftOrderFields, DraftOrderInput, UserErrors};

    pub const OPERATION_NAME: &str = "DraftOrderUpdate";
    pub const QUERY: &str = concat!(
        r"
mutation DraftOrderUpdate($id: ID!, $input: DraftOrderInput!) {
  draftOrderUpdate(id: $id, input: $input) {
    draftOrder { ...DraftOrderFields }
    userErrors { field message }
  }
}
",
        draft_order_fragment!()
    );

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub id: String,
        pub input: DraftOrderInput,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DraftOrderUpdatePayload {
        pub draft_order: Option<DraftOrderFields>,
        pub user_errors: Vec<UserErrors>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub draft_order_update: Option<DraftOrderUpdatePayload>,
    }
}

pub mod draft_order_delete {
    use serde::{Deserialize, Serialize};

    pub use super::common::UserErrors;

    pub const OPERATION_NAME: &str = "DraftOrderDelete";
    pub const QUERY: &str = r"
mutation DraftOrderDelete($input: DraftOrderDeleteInput!) {
  draftOrderDelete(input: $input) {
    deletedId
    userErrors { field message }
  }
}
";

    #[derive(Debug, Clone, Serialize)]
    pub struct DraftOrderDeleteInput {
        pub id: String,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: DraftOrderDeleteInput,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DraftOrderDeletePayload {
        pub deleted_id: Option<String>,
        pub user_errors: Vec<UserErrors>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub draft_order_delete: Option<DraftOrderDeletePayload>,
    }
}

pub mod draft_order_complete {
    use serde::{Deserialize, Serialize};

    pub use super::common::{MoneyBag, UserErrors};

    pub const OPERATION_NAME: &str = "DraftOrderComplete";
    pub const QUERY: &str = r"
mutation DraftOrderComplete($id: ID!, $paymentPending: Boolean) {
  draftOrderComplete(id: $id, paymentPending: $paymentPending) {
    draftOrder {
      id
      name
      status
      invoiceUrl
      totalPriceSet { shopMoney { amount currencyCode } }
      order { id name }
    }
    userErrors { field message }
  }
}
";

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub id: String,
        pub payment_pending: Option<bool>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CompletedOrder {
        pub id: String,
        pub name: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CompletedDraftOrder {
        pub id: String,
        pub name: String,
        pub status: String,
        pub invoice_url: Option<String>,
        pub total_price_set: Option<MoneyBag>,
        pub order: Option<CompletedOrder>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DraftOrderCompletePayload {
        pub draft_order: Option<CompletedDraftOrder>,
        pub user_errors: Vec<UserErrors>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub draft_order_complete: Option<DraftOrderCompletePayload>,
    }
}

pub mod draft_order_invoice_send {
    use serde::{Deserialize, Serialize};

    pub use super::common::{DraftOrderFields, UserErrors};

    pub const OPERATION_NAME: &str = "DraftOrderInvoiceSend";
    pub const QUERY: &str = concat!(
        r"
mutation DraftOrderInvoiceSend($id: ID!, $email: EmailInput) {
  draftOrderInvoiceSend(id: $id, email: $email) {
    draftOrder { ...DraftOrderFields }
    userErrors { field message }
  }
}
",
        draft_order_fragment!()
    );

    #[derive(Debug, Clone, Default, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct EmailInput {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub to: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub subject: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub custom_message: Option<String>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub id: String,
        pub email: Option<EmailInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DraftOrderInvoiceSendPayload {
        pub draft_order: Option<DraftOrderFields>,
        pub user_errors: Vec<UserErrors>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub draft_order_invoice_send: Option<DraftOrderInvoiceSendPayload>,
    }
}
