/// Network adapters for the catalog API and its token endpoint
mod authenticator;
mod port_client;

pub use authenticator::{Credentials, PortAuthenticator};
pub use port_client::{CatalogClientConfig, PortCatalogClient};
