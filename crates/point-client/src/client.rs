use std::time::Duration;

use therm_shared::{PointType, PointUpdate, ServerState, ThermError};
use thiserror::Error;
use tracing::debug;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid server URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned HTTP {status}")]
    Status { status: u16 },

    #[error("invalid server state: {0}")]
    InvalidState(#[from] ThermError),
}

/// Sends temperature readings of one fixed grid point to the server.
pub struct PointClient {
    client: reqwest::Client,
    endpoint: Url,
    /// column of the point
    pub x: u16,
    /// row of the point
    pub y: u16,
    pub point_type: PointType,
}

impl PointClient {
    /// Creates a client posting to `<server>/state`.
    pub fn new(server: &str, x: u16, y: u16, point_type: PointType) -> Result<Self, ClientError> {
        let raw = format!("{}/state", server.trim_end_matches('/'));
        let endpoint = Url::parse(&raw).map_err(|source| ClientError::InvalidUrl {
            url: raw.clone(),
            source,
        })?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            x,
            y,
            point_type,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn update(&self, temp: f32) -> PointUpdate {
        PointUpdate {
            x: self.x,
            y: self.y,
            temp,
            point_type: self.point_type,
        }
    }

    /// Posts one reading. The response body is ignored.
    pub async fn send(&self, temp: f32) -> Result<(), ClientError> {
        let update = self.update(temp);
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&update)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
            });
        }
        debug!(x = self.x, y = self.y, temp, "reading sent");
        Ok(())
    }

    /// Fetches and validates the current server state.
    pub async fn fetch_state(&self) -> Result<ServerState, ClientError> {
        let response = self.client.get(self.endpoint.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
            });
        }

        let state: ServerState = response.json().await?;
        state.validate_layout()?;
        Ok(state)
    }

    /// Checks that the configured point lies inside the server's grid.
    pub fn check_bounds(&self, state: &ServerState) -> Result<(), ClientError> {
        if self.x >= state.width || self.y >= state.height {
            return Err(ThermError::OutOfBounds {
                x: self.x as usize,
                y: self.y as usize,
                width: state.width,
                height: state.height,
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_construction() {
        let client = PointClient::new("http://localhost:8000/", 1, 2, PointType::Boundary).unwrap();
        assert_eq!(client.endpoint().as_str(), "http://localhost:8000/state");

        let client = PointClient::new("http://host/api", 0, 0, PointType::Boundary).unwrap();
        assert_eq!(client.endpoint().as_str(), "http://host/api/state");
    }

    #[test]
    fn test_invalid_url() {
        let err = PointClient::new("not a url", 0, 0, PointType::GroundTruth)
            .err()
            .unwrap();
        assert!(matches!(err, ClientError::InvalidUrl { .. }));
    }

    #[test]
    fn test_update_uses_fixed_point() {
        let client = PointClient::new("http://localhost:8000", 3, 4, PointType::GroundTruth).unwrap();
        let update = client.update(19.25);
        assert_eq!((update.x, update.y), (3, 4));
        assert_eq!(update.point_type, PointType::GroundTruth);
        assert_eq!(update.temp, 19.25);
    }
}
