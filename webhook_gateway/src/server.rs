use actix_web::{
    dev::{HttpServiceFactory, Server},
    http::KeepAlive,
    middleware::Logger,
    web,
    App,
    HttpServer,
};
use callback_engine::{
    traits::{InventoryManagement, PaymentStorefront, TaskManagement, TransactionStatusLookup},
    PaymentReconciliationApi,
    StockApi,
    TaskStatusApi,
};
use gateway_clients::{MidtransApi, StorefrontClient};
use gateway_common::Secret;
use log::*;

use crate::{
    config::{ServerConfig, ServerOptions},
    errors::ServerError,
    middleware::{HeaderGuardFactory, HeaderRules},
    midtrans_routes::{self, TransactionUpdateRoute},
    mileapp_routes::{self, TaskStatusRoute},
    routes::{health, version},
    shoptree_routes::{self, ProductStatusUpdateRoute, StockUpdateRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    config.validate()?;
    let storefront =
        StorefrontClient::new(config.storefront.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let midtrans =
        MidtransApi::new(config.midtrans.api.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, storefront, midtrans)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    storefront: StorefrontClient,
    midtrans: MidtransApi,
) -> Result<Server, ServerError> {
    let options = ServerOptions::from_config(&config);
    let reconciliation_options = config.midtrans.reconciliation_options()?;
    let keep_alive = config
        .keep_alive
        .to_std()
        .map_err(|e| ServerError::ConfigurationError(format!("Invalid keep-alive timeout. {e}")))?;
    let client_request_timeout = config
        .client_request_timeout
        .to_std()
        .map_err(|e| ServerError::ConfigurationError(format!("Invalid client request timeout. {e}")))?;
    let mileapp_key = config.mileapp.auth_key.clone();
    let shoptree_key = config.shoptree.auth_key.clone();
    let server_key = config.midtrans.api.server_key.clone();
    info!("💻️ Midtrans notifications are processed with a deadline of {:?}", reconciliation_options.deadline);
    let srv = HttpServer::new(move || {
        let task_api = TaskStatusApi::new(storefront.clone());
        let stock_api = StockApi::new(storefront.clone());
        let payment_api = PaymentReconciliationApi::new(midtrans.clone(), storefront.clone(), server_key.clone())
            .with_options(reconciliation_options);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("gateway::access_log"))
            .app_data(web::Data::new(options))
            .app_data(web::Data::new(task_api))
            .app_data(web::Data::new(stock_api))
            .app_data(web::Data::new(payment_api))
            .service(health)
            .service(version)
            .service(mileapp_scope::<StorefrontClient>(mileapp_key.clone()))
            .service(shoptree_scope::<StorefrontClient>(shoptree_key.clone()))
            .service(midtrans_scope::<MidtransApi, StorefrontClient>())
    })
    .keep_alive(KeepAlive::Timeout(keep_alive))
    .client_request_timeout(client_request_timeout)
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// MileApp callbacks. Handlers expect a `TaskStatusApi<B>` in the app data.
pub fn mileapp_scope<B: TaskManagement + 'static>(auth_key: Secret<String>) -> impl HttpServiceFactory {
    web::scope("/mileapp")
        .app_data(mileapp_routes::json_config())
        .wrap(HeaderGuardFactory::new(HeaderRules::mileapp(auth_key)))
        .service(TaskStatusRoute::<B>::new())
}

/// Shoptree callbacks. Handlers expect a `StockApi<B>` in the app data.
pub fn shoptree_scope<B: InventoryManagement + 'static>(auth_key: Secret<String>) -> impl HttpServiceFactory {
    web::scope("/shoptree")
        .app_data(shoptree_routes::json_config())
        .wrap(HeaderGuardFactory::new(HeaderRules::shoptree(auth_key)))
        .service(StockUpdateRoute::<B>::new())
        .service(ProductStatusUpdateRoute::<B>::new())
}

/// Midtrans notifications. Handlers expect a `PaymentReconciliationApi<L, S>` in the app data.
pub fn midtrans_scope<L, S>() -> impl HttpServiceFactory
where
    L: TransactionStatusLookup + 'static,
    S: PaymentStorefront + 'static,
{
    web::scope("/midtrans")
        .app_data(midtrans_routes::json_config())
        .wrap(HeaderGuardFactory::new(HeaderRules::midtrans()))
        .service(TransactionUpdateRoute::<L, S>::new())
}
