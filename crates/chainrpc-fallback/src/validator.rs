//! Network validator: checks that the configured endpoints agree on which
//! network they serve, and drops the ones that cannot tell.

use futures::future;

use crate::error::FallbackError;
use crate::network::Network;
use crate::observer::{DispatchObserver, TracingObserver};
use crate::registry::{self, Endpoint, EndpointConfig};

/// Endpoints that passed validation, all on `network`.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub network: Network,
    /// Eligible endpoints, in their original relative order.
    pub endpoints: Vec<Endpoint>,
}

/// Detect every endpoint's network concurrently and return the common one.
///
/// Endpoints whose detection fails, or that report [`Network::UNKNOWN`], are
/// excluded from the result rather than failing the whole check.
pub async fn validate_and_get_network<I, E>(endpoints: I) -> Result<ValidationResult, FallbackError>
where
    I: IntoIterator<Item = E>,
    E: Into<EndpointConfig>,
{
    validate_with_observer(endpoints, &TracingObserver).await
}

/// [`validate_and_get_network`] reporting to a caller-supplied observer.
pub async fn validate_with_observer<I, E>(
    endpoints: I,
    observer: &dyn DispatchObserver,
) -> Result<ValidationResult, FallbackError>
where
    I: IntoIterator<Item = E>,
    E: Into<EndpointConfig>,
{
    let endpoints = registry::normalize(endpoints);
    if endpoints.is_empty() {
        return Err(FallbackError::NoProvider);
    }

    let detected =
        future::join_all(endpoints.iter().map(|ep| ep.transport().detect_network())).await;

    let mut networks: Vec<Network> = Vec::new();
    let mut eligible = Vec::with_capacity(endpoints.len());
    for (endpoint, detection) in endpoints.into_iter().zip(detected) {
        match detection {
            Ok(network) if !network.is_unknown() => {
                if !networks.contains(&network) {
                    networks.push(network);
                }
                eligible.push(endpoint);
            }
            Ok(_) => observer.network_undetected(endpoint.url(), None),
            Err(e) => observer.network_undetected(endpoint.url(), Some(&e)),
        }
    }

    match networks.as_slice() {
        [] => Err(FallbackError::CannotDetectNetworks),
        [network] => {
            observer.network_validated(*network, eligible.len());
            Ok(ValidationResult {
                network: *network,
                endpoints: eligible,
            })
        }
        _ => Err(FallbackError::InconsistentNetworks { networks }),
    }
}
