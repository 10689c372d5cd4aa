//! Request-level retrieval: validate, fetch each pair, extract, assemble.

use netcdf_parser::open_dataset;
use ocads_common::{MedianFile, NameList, Request};
use tracing::{info, instrument};

use crate::config::ClientConfig;
use crate::data::OcadsData;
use crate::error::{ClientError, ClientResult};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::retrieve::retrieve_with_fallback;

/// Retrieves median files and extracts their arrays.
pub struct OcadsClient<F = HttpFetcher> {
    fetcher: F,
    config: ClientConfig,
}

impl OcadsClient<HttpFetcher> {
    /// Client fetching over HTTP into `config.cache_dir`.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self { fetcher, config })
    }
}

impl<F: Fetcher> OcadsClient<F> {
    /// Client using a custom fetcher; only the URLs of `config` are used.
    pub fn with_fetcher(fetcher: F, config: ClientConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Retrieve every (variable, scenario) pair.
    ///
    /// All names are validated before the first download. Pairs are handled
    /// one at a time, variables outer; the first failure ends the call.
    pub async fn download(
        &self,
        variables: impl Into<NameList>,
        scenarios: impl Into<NameList>,
    ) -> ClientResult<OcadsData> {
        let request = Request::parse(variables, scenarios)?;
        self.download_request(&request).await
    }

    #[instrument(skip(self, request), fields(pairs = request.len()))]
    pub async fn download_request(&self, request: &Request) -> ClientResult<OcadsData> {
        let mut output = OcadsData::new();

        for &variable in &request.variables {
            output.reset_variable(variable);

            for &scenario in &request.scenarios {
                let file = MedianFile::new(variable, scenario);
                let filename = file.filename();

                info!(filename = %filename, "Downloading");
                let path = retrieve_with_fallback(
                    &self.fetcher,
                    &file,
                    &self.config.base_url,
                    &self.config.mirror_url,
                )
                .await
                .map_err(|source| ClientError::Fetch {
                    filename: filename.clone(),
                    source,
                })?;

                let array = open_dataset(&path)
                    .and_then(|dataset| dataset.variable(variable.file_variable_name()))
                    .map_err(|source| ClientError::Dataset {
                        filename: filename.clone(),
                        source,
                    })?;

                output.insert(variable, scenario, array);
            }
        }

        Ok(output)
    }
}

/// Retrieve `variables × scenarios` with the default configuration.
///
/// Accepts a single name or a list for each argument.
pub async fn download_ocads_data(
    variables: impl Into<NameList>,
    scenarios: impl Into<NameList>,
) -> ClientResult<OcadsData> {
    let request = Request::parse(variables, scenarios)?;
    OcadsClient::new(ClientConfig::default())?
        .download_request(&request)
        .await
}
