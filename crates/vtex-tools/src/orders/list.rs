use super::ORDERS_PATH;
use crate::CREDENTIAL_HEADERS;
use reqwest::{Client, Method};
use tooling::{Field, FieldType, HttpTool, HttpToolSpec, ObjectSchema, ToolError};

pub const LIST_ORDERS: &str = "LIST_ORDERS";

pub fn list_orders_spec() -> HttpToolSpec {
    HttpToolSpec {
        id: LIST_ORDERS.to_string(),
        description: "List VTEX orders with detailed information including status, payment, \
                      shipping, and customer details"
            .to_string(),
        method: Method::GET,
        path: ORDERS_PATH.to_string(),
        input: input_schema(),
        output: output_schema(),
        credential_headers: CREDENTIAL_HEADERS,
    }
}

pub fn create_list_orders_tool(client: Client) -> Result<HttpTool, ToolError> {
    HttpTool::with_client(list_orders_spec(), client)
}

fn input_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field(Field::string("orderBy").describe(
            "Sort as {OrderField},{OrderType}. OrderField: creationDate, orderId, items, \
             totalValue or origin. OrderType: asc or desc.",
        ))
        .field(Field::number("page").describe("Page to retrieve, up to 30 pages."))
        .field(Field::number("per_page").describe(
            "Orders per page. Defaults to 15, up to 100. Retrieval is limited to 30 pages.",
        ))
        .field(Field::boolean("f_hasInputInvoice").describe(
            "Only return orders with a non null invoiceInput field.",
        ))
        .field(Field::string("q").describe(
            "Fulltext filter by order id, client email, client document or client name. \
             The + character is not allowed.",
        ))
        .field(Field::string("f_shippingEstimate").describe(
            "Shipping estimate in days with the .days suffix, e.g. 1.days (tomorrow), \
             0.days (today), -1.days (late), 7.days (next week).",
        ))
        .field(Field::string("f_invoicedDate").describe(
            "Invoiced date range, e.g. invoicedDate:[2022-01-01T02:00:00.000Z TO \
             2022-01-02T01:59:59.999Z].",
        ))
        .field(Field::string("f_creationDate").describe(
            "Creation date range, e.g. creationDate:[2022-01-01T02:00:00.000Z TO \
             2022-01-02T01:59:59.999Z].",
        ))
        .field(Field::string("f_authorizedDate").describe(
            "Authorized date range, e.g. authorizedDate:[2022-01-01T02:00:00.000Z TO \
             2022-01-02T01:59:59.999Z].",
        ))
        .field(Field::string("f_UtmSource").describe(
            "Urchin Tracking Module (UTM) source, e.g. christmas_campaign.",
        ))
        .field(Field::string("f_sellerNames").describe("Seller name, e.g. SellerName."))
        .field(Field::string("f_callCenterOperatorName").describe(
            "Call center operator identification, e.g. Operator%20Name.",
        ))
        .field(Field::string("f_salesChannel").describe(
            "Sales channel (trade policy) name, e.g. Main.",
        ))
        .field(Field::string("salesChannelId").describe(
            "Sales channel (trade policy) id, e.g. 1.",
        ))
        .field(Field::string("f_affiliateId").describe("Affiliate id, e.g. WLM."))
        .field(Field::string("f_status").describe(
            "Order status, e.g. waiting-for-sellers-confirmation, payment-pending, \
             payment-approved, ready-for-handling, handling, invoiced, canceled.",
        ))
        .field(Field::boolean("incompleteOrders").describe(
            "true returns incomplete orders, false returns orders that are not incomplete.",
        ))
        .field(Field::string("f_paymentNames").describe("Payment type, e.g. Visa."))
        .field(Field::string("f_RnB").describe(
            "Rates and benefits (promotions), e.g. Free+Shipping.",
        ))
        .field(Field::string("searchField").describe(
            "Search by SKU id, gift list id, transaction id (TID), PCI connector TID, \
             payment id (PID) or connector NSU.",
        ))
        .field(Field::boolean("f_isInstore").describe(
            "true returns orders made via inStore, false returns the others.",
        ))
}

fn order_summary_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field(Field::string("orderId").required().describe("Unique order identifier"))
        .field(Field::string("creationDate").required().describe("Creation date (ISO 8601)"))
        .field(Field::string("clientName").nullable().describe("Customer name"))
        .field(Field::array("items", FieldType::Any).nullable().describe("Order items"))
        .field(Field::number("totalValue").required().describe("Total value in cents"))
        .field(Field::string("paymentNames").required().describe("Payment method names"))
        .field(Field::string("status").required().describe("Order status code"))
        .field(Field::string("statusDescription").required().describe("Readable order status"))
        .field(Field::string("marketPlaceOrderId").nullable().describe("Marketplace order id"))
        .field(Field::string("sequence").required().describe("Order sequence number"))
        .field(Field::string("salesChannel").required().describe("Sales channel id"))
        .field(Field::string("affiliateId").required().describe("Affiliate id"))
        .field(Field::string("origin").required().describe("Order origin (Marketplace, Fulfillment)"))
        .field(Field::boolean("workflowInErrorState").required().describe("Workflow has errors"))
        .field(Field::boolean("workflowInRetry").required().describe("Workflow is retrying"))
        .field(Field::string("lastMessageUnread").nullable().describe("Last unread message"))
        .field(Field::string("ShippingEstimatedDate").nullable().describe("Estimated shipping date"))
        .field(Field::string("ShippingEstimatedDateMax").nullable().describe("Latest estimated shipping date"))
        .field(Field::string("ShippingEstimatedDateMin").nullable().describe("Earliest estimated shipping date"))
        .field(Field::boolean("orderIsComplete").required().describe("Order is complete"))
        .field(Field::string("listId").nullable().describe("Originating list id"))
        .field(Field::string("listType").nullable().describe("Originating list type"))
        .field(Field::string("authorizedDate").nullable().describe("Payment authorization date"))
        .field(Field::string("callCenterOperatorName").nullable().describe("Call center operator"))
        .field(Field::number("totalItems").required().describe("Number of items"))
        .field(Field::string("currencyCode").required().describe("Currency code (BRL, USD)"))
        .field(Field::string("hostname").required().describe("Store hostname"))
        .field(Field::array("invoiceOutput", FieldType::Any).nullable().describe("Output invoices"))
        .field(Field::array("invoiceInput", FieldType::Any).nullable().describe("Input invoices"))
        .field(Field::string("lastChange").required().describe("Last change date"))
        .field(Field::boolean("isAllDelivered").required().describe("All items delivered"))
        .field(Field::boolean("isAnyDelivered").required().describe("Any item delivered"))
        .field(Field::array("giftCardProviders", FieldType::Any).nullable().describe("Gift card providers"))
        .field(Field::string("orderFormId").required().describe("Order form id"))
        .field(Field::string("paymentApprovedDate").nullable().describe("Payment approval date"))
        .field(Field::string("readyForHandlingDate").nullable().describe("Ready for handling date"))
        .field(Field::array("deliveryDates", FieldType::Any).nullable().describe("Delivery dates"))
        .field(Field::array("customFieldsValues", FieldType::Any).nullable().describe("Custom field values"))
        .field(Field::array("customFields", FieldType::Any).required().describe("Custom fields"))
}

fn paging_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field(Field::number("total").required())
        .field(Field::number("pages").required())
        .field(Field::number("currentPage").required())
        .field(Field::number("perPage").required())
}

fn output_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field(Field::array("list", FieldType::Object(order_summary_schema())).required())
        .field(Field::object("paging", paging_schema()).describe("Pagination information"))
}
