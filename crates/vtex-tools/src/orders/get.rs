use super::ORDERS_PATH;
use crate::CREDENTIAL_HEADERS;
use reqwest::{Client, Method};
use tooling::{Field, FieldType, HttpTool, HttpToolSpec, ObjectSchema, ToolError};

pub const GET_ORDER: &str = "GET_ORDER";

pub fn get_order_spec() -> HttpToolSpec {
    HttpToolSpec {
        id: GET_ORDER.to_string(),
        description: "Get a single VTEX order by id, including items, totals, client profile, \
                      shipping and payment data"
            .to_string(),
        method: Method::GET,
        path: format!("{}/{{orderId}}", ORDERS_PATH),
        input: ObjectSchema::new().field(
            Field::string("orderId")
                .in_path()
                .describe("Order id, e.g. v212333lux-02"),
        ),
        output: output_schema(),
        credential_headers: CREDENTIAL_HEADERS,
    }
}

pub fn create_get_order_tool(client: Client) -> Result<HttpTool, ToolError> {
    HttpTool::with_client(get_order_spec(), client)
}

fn total_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field(Field::string("id").required())
        .field(Field::string("name").nullable())
        .field(Field::number("value").required())
}

fn output_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field(Field::string("orderId").required().describe("Unique order identifier"))
        .field(Field::string("sequence").nullable().describe("Order sequence number"))
        .field(Field::string("marketplaceOrderId").nullable().describe("Marketplace order id"))
        .field(Field::string("orderGroup").nullable().describe("Order group id"))
        .field(Field::string("status").required().describe("Order status code"))
        .field(Field::string("statusDescription").nullable().describe("Readable order status"))
        .field(Field::number("value").required().describe("Order value in cents"))
        .field(Field::string("creationDate").required().describe("Creation date (ISO 8601)"))
        .field(Field::string("lastChange").nullable().describe("Last change date"))
        .field(Field::string("origin").nullable().describe("Order origin"))
        .field(Field::string("affiliateId").nullable().describe("Affiliate id"))
        .field(Field::string("salesChannel").nullable().describe("Sales channel id"))
        .field(Field::string("hostname").nullable().describe("Store hostname"))
        .field(Field::boolean("isCompleted").nullable().describe("Order is complete"))
        .field(
            Field::array("totals", FieldType::Object(total_schema()))
                .describe("Order totals (items, discounts, shipping, tax)"),
        )
        .field(Field::array("items", FieldType::Any).describe("Order items"))
        .field(Field::array("sellers", FieldType::Any).describe("Sellers fulfilling the order"))
        .field(Field::any("clientProfileData").nullable().describe("Customer profile"))
        .field(Field::any("shippingData").nullable().describe("Shipping address and logistics"))
        .field(Field::any("paymentData").nullable().describe("Payment transactions"))
        .field(Field::any("packageAttachment").nullable().describe("Packages and invoices"))
}
