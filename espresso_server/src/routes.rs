//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat
//! and tidy 🙏
//!
//! Handlers are generic over the storage backend, so actix cannot register them directly; the
//! `route!` macro generates a small `HttpServiceFactory` per route. Routes that name a required
//! permission get wrapped in the [`PermissionMiddlewareFactory`](crate::middleware::PermissionMiddlewareFactory),
//! so the handler only ever runs with verified claims in the request extensions.

use actix_web::{get, web, HttpResponse, Responder};
use espresso_engine::{
    db_types::{Drink, NewDrink, UpdateDrink},
    DrinkApiError,
    DrinkManagement,
    MenuApi,
};
use log::*;

use crate::{
    auth::JwtClaims,
    data_objects::{DeleteResponse, DrinksResponse, NewDrinkParams, UpdateDrinkParams},
    errors::ServerError,
};

#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $bound:ty) => {
        paste::paste! { pub struct [<$name:camel Route>]<B>(core::marker::PhantomData<fn() -> B>);}
        paste::paste! { impl<B> [<$name:camel Route>]<B> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> B>)
            }
        }}
        paste::paste! { impl<B> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<B>
        where
            B: $bound + 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<B>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $bound:ty where requires $permission:literal) => {
        paste::paste! { pub struct [<$name:camel Route>]<B>(core::marker::PhantomData<fn() -> B>);}
        paste::paste! { impl<B> [<$name:camel Route>]<B> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> B>)
            }
        }}
        paste::paste! { impl<B> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<B>
        where
            B: $bound + 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<B>)
                    .wrap($crate::middleware::PermissionMiddlewareFactory::new($permission));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Drinks (public)  --------------------------------------------
route!(drinks => Get "/drinks" impl DrinkManagement);
/// The public menu. No token is required and only the short drink representation is returned; the
/// ingredient names stay behind the `get:drinks-detail` permission.
pub async fn drinks<B: DrinkManagement>(api: web::Data<MenuApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received public menu request");
    let drinks = api.fetch_all_drinks().await.map_err(|e| ServerError::BackendError(e.to_string()))?;
    let summaries = drinks.iter().map(Drink::short).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(DrinksResponse::new(summaries)))
}

//----------------------------------------------   Drinks (detail)  --------------------------------------------
route!(drinks_detail => Get "/drinks-detail" impl DrinkManagement where requires "get:drinks-detail");
pub async fn drinks_detail<B: DrinkManagement>(
    claims: JwtClaims,
    api: web::Data<MenuApi<B>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ {} requested the detailed menu", claims.sub);
    let drinks = api.fetch_all_drinks().await.map_err(|e| ServerError::BackendError(e.to_string()))?;
    Ok(HttpResponse::Ok().json(DrinksResponse::new(drinks)))
}

//----------------------------------------------   Create  -----------------------------------------------------
route!(create_drink => Post "/drinks" impl DrinkManagement where requires "post:drinks");
pub async fn create_drink<B: DrinkManagement>(
    claims: JwtClaims,
    api: web::Data<MenuApi<B>>,
    body: web::Json<NewDrinkParams>,
) -> Result<HttpResponse, ServerError> {
    let params = body.into_inner();
    // Both keys must be present and non-empty before a record is constructed.
    let title = params
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ServerError::UnprocessableEntity("A non-empty 'title' is required.".to_string()))?;
    let recipe = params
        .recipe
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ServerError::UnprocessableEntity("A non-empty 'recipe' is required.".to_string()))?;
    debug!("💻️ {} is creating drink '{title}'", claims.sub);
    let drink = api.create_drink(NewDrink { title, recipe }).await.map_err(|e| match e {
        DrinkApiError::TitleExists(_) => ServerError::UnprocessableEntity(e.to_string()),
        e => ServerError::BackendError(e.to_string()),
    })?;
    Ok(HttpResponse::Ok().json(DrinksResponse::new(vec![drink])))
}

//----------------------------------------------   Update  -----------------------------------------------------
route!(update_drink => Patch "/drinks/{id}" impl DrinkManagement where requires "patch:drinks");
pub async fn update_drink<B: DrinkManagement>(
    claims: JwtClaims,
    api: web::Data<MenuApi<B>>,
    path: web::Path<i64>,
    body: web::Json<UpdateDrinkParams>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    // The 404 decision is made up front, before any mutation is attempted.
    let existing = api
        .drink_by_id(id)
        .await
        .map_err(|e| ServerError::BackendError(e.to_string()))?
        .ok_or_else(|| ServerError::NoRecordFound(format!("No drink with id {id}.")))?;
    let params = body.into_inner();
    let update = UpdateDrink { title: params.title, recipe: params.recipe };
    if update.is_empty() {
        return Ok(HttpResponse::Ok().json(DrinksResponse::new(vec![existing])));
    }
    debug!("💻️ {} is updating drink {id}", claims.sub);
    let drink = api.update_drink(id, update).await.map_err(|e| match e {
        DrinkApiError::DrinkNotFound(id) => ServerError::NoRecordFound(format!("No drink with id {id}.")),
        e => ServerError::BackendError(e.to_string()),
    })?;
    Ok(HttpResponse::Ok().json(DrinksResponse::new(vec![drink])))
}

//----------------------------------------------   Delete  -----------------------------------------------------
route!(delete_drink => Delete "/drinks/{id}" impl DrinkManagement where requires "delete:drinks");
pub async fn delete_drink<B: DrinkManagement>(
    claims: JwtClaims,
    api: web::Data<MenuApi<B>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    if api.drink_by_id(id).await.map_err(|e| ServerError::UnprocessableEntity(e.to_string()))?.is_none() {
        return Err(ServerError::NoRecordFound(format!("No drink with id {id}.")));
    }
    debug!("💻️ {} is deleting drink {id}", claims.sub);
    api.delete_drink(id).await.map_err(|e| match e {
        DrinkApiError::DrinkNotFound(id) => ServerError::NoRecordFound(format!("No drink with id {id}.")),
        e => ServerError::UnprocessableEntity(e.to_string()),
    })?;
    Ok(HttpResponse::Ok().json(DeleteResponse { success: true, delete: id }))
}
