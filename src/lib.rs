pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::http::HttpTransport;
pub use app::operations::{
    CancelSubscriptionRequest, CompletePayPalPurchaseRequest, CreateCustomerRequest,
    CreateSubscriptionRequest, FetchSubscriptionInvoiceRequest, FetchSubscriptionRequest,
    InvoiceState, PayPalPurchaseRequest, PaymentMethodType, PurchaseRequest, RefundRequest,
    SubscriptionOperation,
};
pub use core::{
    gateway::Gateway,
    parameters::{ParameterBag, Parameters},
    request::Operation,
    response::Response,
};
pub use domain::items::{Item, RefundItem};
pub use domain::model::{Attribute, Customer, Plan, Price, Product};
pub use utils::error::{GatewayError, Result};
