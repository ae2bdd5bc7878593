use crate::clients::AsyncExchanger;
use crate::clients::ClientError;
use async_trait::async_trait;
use http::header::*;
use http::{Method, Request};
use hyper::{Body, Client as HyperClient};
use hyper_alpn::AlpnConnector;
use log::debug;
use mime::Mime;
use std::str::FromStr;
use std::time::Duration;
use strum_macros::{Display, EnumString};
use url::Url;

pub const GOOGLE: &str = "https://dns.google/dns-query";
pub const CLOUDFLARE: &str = "https://cloudflare-dns.com/dns-query";
pub const CLEANBROWSING: &str = "https://doh.cleanbrowsing.org/doh/family-filter/";

// For use in Content-type and Accept headers
const CONTENT_TYPE_APPLICATION_DNS_MESSAGE: &str = "application/dns-message";

// The param name that contains the DNS request.
const DNS_QUERY_PARAM: &str = "dns";

// A DNS message can't be longer than its 16 bit TCP length prefix allows.
const MAX_MESSAGE_LEN: usize = 65535;

/// Well known public DoH resolvers.
#[derive(Copy, Clone, Debug, Display, EnumString, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Server {
    Google,
    Cloudflare,
    CleanBrowsing,
}

impl Server {
    pub fn url(self) -> &'static str {
        match self {
            Server::Google => GOOGLE,
            Server::Cloudflare => CLOUDFLARE,
            Server::CleanBrowsing => CLEANBROWSING,
        }
    }
}

/// Everything the [`Client`] needs to know about where and how to send queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub server: Url,

    /// One of GET or POST.
    pub method: Method,

    /// Limit on the whole request, from connecting to reading the body.
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: Url::parse(GOOGLE).expect("GOOGLE is a valid url"),
            method: Method::GET,
            timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Config for one of the well known servers, using GET.
    pub fn for_server(server: Server) -> Result<Self, ClientError> {
        Ok(Config {
            server: Url::parse(server.url())?,
            ..Default::default()
        })
    }

    /// Config for a server given by name (for example `"cloudflare"`) or by url.
    pub fn for_name(name: &str) -> Result<Self, ClientError> {
        if let Ok(server) = Server::from_str(&name.to_ascii_lowercase()) {
            return Self::for_server(server);
        }

        if name.starts_with("https://") || name.starts_with("http://") {
            return Ok(Config {
                server: Url::parse(name)?,
                ..Default::default()
            });
        }

        Err(ClientError::UnknownServer(name.to_string()))
    }
}

/// A DNS over HTTPS (DoH) Client (rfc8484).
///
/// # Example
///
/// ```rust,no_run
/// use dohdns::clients::{AsyncExchanger, Config, DoHClient, Server};
/// use dohdns::{decode_response, encode_query};
///
/// #[tokio::main]
/// async fn main() -> Result<(), dohdns::clients::ClientError> {
///     let query = encode_query("example.com", "A")?;
///
///     let response = DoHClient::new(Config::for_server(Server::Cloudflare)?)?
///        .exchange(&query)
///        .await?;
///
///     for answer in decode_response(&response, "A")? {
///         println!("{}", answer);
///     }
///     Ok(())
/// }
/// ```
///
/// See <https://datatracker.ietf.org/doc/html/rfc8484>
pub struct Client {
    config: Config,
}

impl Client {
    /// Creates a new Client for the configured server.
    ///
    /// Be aware that the server will typically be in the form of `https://domain_name/`. That
    /// `domain_name` will be resolved by the system's standard DNS library.
    pub fn new(config: Config) -> Result<Self, ClientError> {
        match config.method {
            Method::GET | Method::POST => (), // Nothing,
            _ => return Err(ClientError::UnsupportedMethod(config.method)),
        }

        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds the GET or POST request carrying `query`.
    fn request(&self, query: &[u8]) -> Result<Request<Body>, ClientError> {
        // Base request common to both GET and POST
        let req = Request::builder()
            .method(&self.config.method)
            .header(ACCEPT, CONTENT_TYPE_APPLICATION_DNS_MESSAGE);

        let req = match self.config.method {
            Method::GET => {
                // Encode the message as a base64 string
                let buf = base64::encode_config(query, base64::URL_SAFE_NO_PAD);

                // and add to the query params.
                let mut url = self.config.server.clone();
                url.query_pairs_mut().append_pair(DNS_QUERY_PARAM, &buf);

                // We have to do this wierd as_str().parse() thing because the
                // http::Uri doesn't provide a way to easily mutate or construct it.
                let uri: hyper::Uri = url.as_str().parse()?;
                req.uri(uri).body(Body::empty())?
            }
            Method::POST => {
                req.uri(self.config.server.as_str())
                    .header(CONTENT_TYPE, CONTENT_TYPE_APPLICATION_DNS_MESSAGE)
                    .body(Body::from(query.to_vec()))? // content-length header will be added.
            }
            _ => return Err(ClientError::UnsupportedMethod(self.config.method.clone())),
        };

        Ok(req)
    }

    async fn send(&self, req: Request<Body>) -> Result<Vec<u8>, ClientError> {
        // Create a Alpn client, so our connection will upgrade to HTTP/2.
        let alpn = AlpnConnector::new();

        let client = HyperClient::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .http2_only(true)
            .build::<_, hyper::Body>(alpn);

        let resp = client.request(req).await?;

        if !resp.status().is_success() {
            return Err(ClientError::Status(resp.status()));
        }

        if let Some(content_type) = resp.headers().get(CONTENT_TYPE) {
            if !content_type_equal(content_type, CONTENT_TYPE_APPLICATION_DNS_MESSAGE) {
                return Err(ClientError::ContentType(
                    format!("{:?}", content_type),
                    CONTENT_TYPE_APPLICATION_DNS_MESSAGE,
                ));
            }
        }

        // Read the full body
        let body = hyper::body::to_bytes(resp.into_body()).await?;
        if body.len() > MAX_MESSAGE_LEN {
            return Err(ClientError::TooLarge(body.len()));
        }

        Ok(body.to_vec())
    }
}

#[async_trait]
impl AsyncExchanger for Client {
    /// Sends the encoded query to the server via HTTPS and returns the response body.
    async fn exchange(&self, query: &[u8]) -> Result<Vec<u8>, ClientError> {
        let req = self.request(query)?;

        debug!(
            "{} {} ({} byte query)",
            self.config.method,
            req.uri(),
            query.len()
        );

        match tokio::time::timeout(self.config.timeout, self.send(req)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(ClientError::Timeout(self.config.timeout)),
        }
    }
}

/// Compares the "essence" of a content type, that is "type/subtype" without
/// any "+suffix" or "; param=value", against `expected`.
fn content_type_equal(content_type: &HeaderValue, expected: &str) -> bool {
    content_type
        .to_str()
        .ok()
        .and_then(|t| Mime::from_str(t).ok())
        .map_or(false, |t| t.essence_str() == expected)
}
