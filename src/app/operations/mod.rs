pub mod cancel_subscription;
pub mod complete_paypal_purchase;
pub mod create_customer;
pub mod create_subscription;
pub mod fetch_subscription;
pub mod fetch_subscription_invoice;
pub mod paypal_purchase;
pub mod purchase;
pub mod refund;

pub use cancel_subscription::CancelSubscriptionRequest;
pub use complete_paypal_purchase::CompletePayPalPurchaseRequest;
pub use create_customer::CreateCustomerRequest;
pub use create_subscription::CreateSubscriptionRequest;
pub use fetch_subscription::{FetchSubscriptionRequest, SubscriptionOperation};
pub use fetch_subscription_invoice::{FetchSubscriptionInvoiceRequest, InvoiceState};
pub use paypal_purchase::PayPalPurchaseRequest;
pub use purchase::{PaymentMethodType, PurchaseRequest};
pub use refund::RefundRequest;
