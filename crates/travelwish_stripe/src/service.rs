// --- File: crates/travelwish_stripe/src/service.rs ---
//! [`PaymentGatewayService`] implementation backed by the gateway REST API.

use std::collections::HashMap;
use std::sync::Arc;

use crate::logic;
use travelwish_common::services::{
    BoxFuture, CreateIntentParams, GatewayCustomer, GatewayError, GatewayPaymentMethod,
    PaymentGatewayService, PaymentIntent,
};
use travelwish_config::AppConfig;

/// Production gateway service talking to the configured REST endpoint.
pub struct StripeGatewayService {
    api_base: String,
}

impl StripeGatewayService {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let api_base = config
            .gateway
            .as_ref()
            .and_then(|g| g.api_base_url.clone())
            .unwrap_or_else(|| logic::DEFAULT_API_BASE.to_string());
        Self { api_base }
    }

    /// Builds a service against an explicit base URL (used by tests against a
    /// local stub server).
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
        }
    }
}

impl PaymentGatewayService for StripeGatewayService {
    fn create_payment_intent(
        &self,
        params: CreateIntentParams,
    ) -> BoxFuture<'_, PaymentIntent, GatewayError> {
        Box::pin(async move { logic::create_payment_intent(&self.api_base, params).await })
    }

    fn retrieve_payment_intent(
        &self,
        intent_id: &str,
    ) -> BoxFuture<'_, PaymentIntent, GatewayError> {
        let intent_id = intent_id.to_string();
        Box::pin(async move { logic::retrieve_payment_intent(&self.api_base, &intent_id).await })
    }

    fn confirm_payment_intent(
        &self,
        intent_id: &str,
    ) -> BoxFuture<'_, PaymentIntent, GatewayError> {
        let intent_id = intent_id.to_string();
        Box::pin(async move { logic::confirm_payment_intent(&self.api_base, &intent_id).await })
    }

    fn create_customer(
        &self,
        email: &str,
        name: &str,
        metadata: HashMap<String, String>,
    ) -> BoxFuture<'_, GatewayCustomer, GatewayError> {
        let email = email.to_string();
        let name = name.to_string();
        Box::pin(
            async move { logic::create_customer(&self.api_base, &email, &name, &metadata).await },
        )
    }

    fn retrieve_payment_method(
        &self,
        payment_method_id: &str,
    ) -> BoxFuture<'_, GatewayPaymentMethod, GatewayError> {
        let payment_method_id = payment_method_id.to_string();
        Box::pin(async move {
            logic::retrieve_payment_method(&self.api_base, &payment_method_id).await
        })
    }

    fn attach_payment_method(
        &self,
        payment_method_id: &str,
        customer_id: &str,
    ) -> BoxFuture<'_, GatewayPaymentMethod, GatewayError> {
        let payment_method_id = payment_method_id.to_string();
        let customer_id = customer_id.to_string();
        Box::pin(async move {
            logic::attach_payment_method(&self.api_base, &payment_method_id, &customer_id).await
        })
    }

    fn list_payment_intents(
        &self,
        customer_id: &str,
        limit: u8,
    ) -> BoxFuture<'_, Vec<PaymentIntent>, GatewayError> {
        let customer_id = customer_id.to_string();
        Box::pin(async move {
            logic::list_payment_intents(&self.api_base, &customer_id, limit).await
        })
    }
}
