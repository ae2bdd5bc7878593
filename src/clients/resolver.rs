use crate::clients::doh::Client as DoHClient;
use crate::clients::doh::Config;
use crate::clients::AsyncExchanger;
use crate::clients::ClientError;
use crate::types::*;
use crate::Query;
use log::debug;

/// Looks up names by encoding a query, exchanging it with a DNS server and
/// decoding the answers.
pub struct Resolver<E = DoHClient> {
    client: E,
}

impl Resolver {
    /// Creates a new Resolver that talks DNS over HTTPS.
    pub fn new(config: Config) -> Result<Resolver<DoHClient>, ClientError> {
        Ok(Resolver::new_with_client(DoHClient::new(config)?))
    }
}

impl<E> Resolver<E>
where
    E: AsyncExchanger,
{
    /// Creates a new Resolver that exchanges messages with `client`.
    pub fn new_with_client(client: E) -> Resolver<E> {
        Resolver { client }
    }

    pub fn client(&self) -> &E {
        &self.client
    }

    /// Resolves `name` into its records of the given type.
    ///
    /// A name without any such records is a successful, empty, [`Response`].
    /// Check [`Header::rcode`] to tell a missing name apart from a name with
    /// no records of that type.
    pub async fn lookup(&self, name: &str, r#type: Type) -> Result<Response, ClientError> {
        let query = Query::new(name, r#type);
        let req = query.to_vec()?;

        let resp = self.client.exchange(&req).await?;
        debug!("{} {}: received {} byte response", name, r#type, resp.len());

        let response = Response::from_slice(&resp, r#type)?;
        if response.header.id != query.id {
            debug!(
                "{} {}: response id {} does not match query id {}",
                name, r#type, response.header.id, query.id
            );
        }

        debug!(
            "{} {}: {:?} with {} answers",
            name,
            r#type,
            response.header.rcode(),
            response.answers.len()
        );

        Ok(response)
    }
}
