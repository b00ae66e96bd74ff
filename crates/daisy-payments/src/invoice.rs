//! One-Time-Payment Invoices
//!
//! Builds and submits OTP invoice requests.

use std::sync::Arc;

use daisy_core::{ApiRequest, DaisyError, Invoice, InvoiceParams, Result, Transport};

#[cfg(feature = "http")]
use daisy_runtime::{Credentials, DaisyConfig, HttpTransport};

use crate::unwrap_data;

/// Server-side client for one-time payments
#[derive(Clone)]
pub struct PaymentsClient {
    transport: Arc<dyn Transport>,
}

impl PaymentsClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    #[cfg(feature = "http")]
    pub fn connect(credentials: Credentials, config: &DaisyConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::with_config(credentials, config)?)))
    }

    /// Create an invoice. `invoiced_price` is required; absent optional
    /// fields are left out of the request body.
    pub async fn create_invoice(&self, params: &InvoiceParams) -> Result<Invoice> {
        if params.invoiced_price.is_empty() {
            return Err(DaisyError::Argument(
                "Missing params.invoicedPrice argument.".into(),
            ));
        }

        let body = self
            .transport
            .send(ApiRequest::post("/otp/", params)?)
            .await?;
        let invoice: Invoice = unwrap_data(body)?;

        tracing::info!(invoice_id = %invoice.id, price = %params.invoiced_price, "Created invoice");

        Ok(invoice)
    }
}
