mod get;
mod list;

pub use get::{create_get_order_tool, get_order_spec, GET_ORDER};
pub use list::{create_list_orders_tool, list_orders_spec, LIST_ORDERS};

pub(crate) const ORDERS_PATH: &str = "/api/oms/pvt/orders";
