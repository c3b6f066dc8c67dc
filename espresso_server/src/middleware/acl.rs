//! Permission middleware for the espresso menu server.
//! This middleware can be placed on any route or service.
//!
//! It will verify the bearer token on the incoming request against the issuer's key set and then
//! check the `permissions` claim for the permission the route requires. If the token is valid and
//! carries the permission, the decoded claims are stored in the request extensions and the request
//! is allowed to continue. Otherwise the verifier's error (400/401) or a 403 Forbidden response is
//! returned.

use std::{pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web,
    Error,
    HttpMessage,
};
use futures::{
    future::{ok, Ready},
    Future,
};
use log::warn;

use crate::{
    auth::{extract_bearer_token, TokenVerifier},
    errors::{AuthError, ServerError},
};

pub struct PermissionMiddlewareFactory {
    required_permission: String,
}

impl PermissionMiddlewareFactory {
    pub fn new(required_permission: &str) -> Self {
        PermissionMiddlewareFactory { required_permission: required_permission.to_string() }
    }
}

impl<S, B> Transform<S, ServiceRequest> for PermissionMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = PermissionMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(PermissionMiddlewareService {
            required_permission: self.required_permission.clone(),
            service: Rc::new(service),
        })
    }
}

pub struct PermissionMiddlewareService<S> {
    required_permission: String,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for PermissionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let required = self.required_permission.clone();
        Box::pin(async move {
            let verifier = req.app_data::<web::Data<TokenVerifier>>().cloned().ok_or_else(|| {
                warn!("No token verifier found in app data");
                Error::from(ServerError::Unspecified("No token verifier configured".to_string()))
            })?;
            let token = extract_bearer_token(req.headers()).map_err(ServerError::from)?;
            let claims = verifier.verify(&token).await.map_err(ServerError::from)?;
            let permissions =
                claims.permissions.clone().ok_or(ServerError::from(AuthError::PermissionsClaimMissing))?;
            if permissions.iter().any(|p| p == &required) {
                req.extensions_mut().insert(claims);
                service.call(req).await
            } else {
                Err(ServerError::from(AuthError::InsufficientPermissions(required)).into())
            }
        })
    }
}
