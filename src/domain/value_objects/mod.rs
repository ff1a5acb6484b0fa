pub mod customers;
pub mod enums;
pub mod invoice_validation;
pub mod invoices;
pub mod sessions;
