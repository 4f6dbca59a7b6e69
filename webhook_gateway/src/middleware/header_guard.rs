//! Header guard middleware for the callback scopes.
//!
//! Every integration sends its callbacks as JSON and, apart from Midtrans, authenticates with a static API key in a
//! request header. This middleware checks both before the request reaches a handler.
//!
//! Each integration words its rejections differently, so the messages are part of the [`HeaderRules`] for a scope.
//!
//! Only `POST` requests are checked. Anything else is passed through so that the router can answer with
//! `405 Method Not Allowed`.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{
        header::{HeaderMap, CONTENT_TYPE},
        Method,
    },
    Error,
};
use futures::future::LocalBoxFuture;
use gateway_common::Secret;
use log::{trace, warn};

use crate::errors::ServerError;

const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Clone, Debug)]
pub struct ApiKeyRule {
    pub header: &'static str,
    pub key: Secret<String>,
    pub missing: &'static str,
    pub invalid: &'static str,
}

#[derive(Clone, Debug)]
pub struct HeaderRules {
    pub name: &'static str,
    pub content_type_missing: &'static str,
    pub content_type_invalid: &'static str,
    pub api_key: Option<ApiKeyRule>,
    /// If true, rejections carry no message body.
    pub silent: bool,
}

impl HeaderRules {
    pub fn mileapp(key: Secret<String>) -> Self {
        Self {
            name: "MileApp",
            content_type_missing: "content-type is required",
            content_type_invalid: "invalid content-type",
            api_key: Some(ApiKeyRule {
                header: "x-api-key",
                key,
                missing: "x-api-key is required",
                invalid: "invalid x-api-key",
            }),
            silent: false,
        }
    }

    pub fn shoptree(key: Secret<String>) -> Self {
        Self {
            name: "Shoptree",
            content_type_missing: "content type is required",
            content_type_invalid: "content type should be application/json",
            api_key: Some(ApiKeyRule {
                header: "X-Client-Api-Key",
                key,
                missing: "x client api key is required",
                invalid: "invalid x client api key",
            }),
            silent: false,
        }
    }

    /// Midtrans authenticates its notifications with a signature in the body, so only the content type is checked.
    pub fn midtrans() -> Self {
        Self {
            name: "Midtrans",
            content_type_missing: "content type is required",
            content_type_invalid: "content type should be application/json",
            api_key: None,
            silent: true,
        }
    }

    /// Returns the rejection message for the first rule the headers break, if any.
    pub fn check(&self, headers: &HeaderMap) -> Result<(), &'static str> {
        let content_type = header_value(headers, CONTENT_TYPE.as_str());
        match content_type {
            None => return Err(self.content_type_missing),
            Some(ct) if ct != JSON_CONTENT_TYPE => return Err(self.content_type_invalid),
            Some(_) => {},
        }
        if let Some(rule) = &self.api_key {
            match header_value(headers, rule.header) {
                None => return Err(rule.missing),
                Some(key) if !rule.key.matches(key) => return Err(rule.invalid),
                Some(_) => {},
            }
        }
        Ok(())
    }

    fn rejection(&self, message: &str) -> ServerError {
        if self.silent {
            ServerError::NotificationRejected(message.to_string())
        } else {
            ServerError::HeaderRejected(message.to_string())
        }
    }
}

/// Empty and non-ASCII header values are treated as absent.
fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok()).filter(|v| !v.is_empty())
}

pub struct HeaderGuardFactory {
    rules: HeaderRules,
}

impl HeaderGuardFactory {
    pub fn new(rules: HeaderRules) -> Self {
        HeaderGuardFactory { rules }
    }
}

impl<S, B> Transform<S, ServiceRequest> for HeaderGuardFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = HeaderGuardService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(HeaderGuardService { rules: Rc::new(self.rules.clone()), service: Rc::new(service) }))
    }
}

pub struct HeaderGuardService<S> {
    rules: Rc<HeaderRules>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for HeaderGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let rules = Rc::clone(&self.rules);
        Box::pin(async move {
            if req.method() != Method::POST {
                trace!("🛡️ {} {} is not a callback. Skipping header checks.", req.method(), req.path());
                return service.call(req).await;
            }
            match rules.check(req.headers()) {
                Ok(()) => {
                    trace!("🛡️ {} callback headers for {} ✅️", rules.name, req.path());
                    service.call(req).await
                },
                Err(message) => {
                    warn!("🛡️ Rejected {} callback to {}. {message}", rules.name, req.path());
                    Err(rules.rejection(message).into())
                },
            }
        })
    }
}
