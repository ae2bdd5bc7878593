// Simple host(1) style command line, that looks names up over DNS over HTTPS.
// host [--server google] {domain} [type]
mod util;

use clap::Parser;
use dohdns::clients::{AsyncExchanger, Config, DoHClient};
use dohdns::{Query, Rcode, Resource, Response, Type};
use http::Method;
use log::debug;
use std::process;
use std::time::Duration;

#[derive(Parser)]
/// DNS lookup utility using DNS over HTTPS
struct Args {
    /// Resolver to query: google, cloudflare, cleanbrowsing, or a https:// url
    #[clap(short, long, default_value = "google")]
    server: String,

    /// Send the query in a POST body, instead of a GET parameter
    #[clap(long)]
    post: bool,

    /// Seconds to wait for the resolver to answer
    #[clap(short, long, default_value_t = 10)]
    timeout: u64,

    /// Hex dump the query and response messages
    #[clap(short, long)]
    verbose: bool,

    /// Domain name to look up
    domain: String,

    /// Record type: A, AAAA, CNAME, MX or NS (anything else means A)
    #[clap(default_value = "A")]
    qtype: String,
}

// A simple type alias so as to DRY.
type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

fn config(args: &Args) -> Result<Config> {
    let mut config = Config::for_name(&args.server)?;
    if args.post {
        config.method = Method::POST;
    }
    config.timeout = Duration::from_secs(args.timeout);

    Ok(config)
}

/// Formats one answer the way host(1) does.
fn describe(domain: &str, resource: &Resource) -> String {
    match resource {
        Resource::A(ip) => format!("{} has address {}", domain, ip),
        Resource::AAAA(ip) => format!("{} has IPv6 address {}", domain, ip),
        Resource::CNAME(name) => format!("{} is an alias for {}.", domain, name),
        Resource::NS(name) => format!("{} name server {}.", domain, name),
        Resource::MX(mx) => format!(
            "{} mail is handled by {} {}.",
            domain, mx.preference, mx.exchange
        ),
    }
}

/// Explains why there were no answers.
fn describe_empty(domain: &str, r#type: Type, response: &Response) -> String {
    match response.header.rcode() {
        Some(Rcode::NXDomain) => format!("Host {} not found: 3(NXDOMAIN)", domain),
        Some(Rcode::NoError) => format!("{} has no {} record", domain, r#type),
        Some(rcode) => format!(
            "Host {} not found: {}({})",
            domain,
            rcode as u16,
            rcode.to_string().to_uppercase()
        ),
        None => format!("Host {} not found", domain),
    }
}

async fn run(args: Args) -> Result<bool> {
    let r#type = Type::from_mnemonic(&args.qtype);
    let client = DoHClient::new(config(&args)?)?;
    debug!("querying {} for {} {}", client.config().server, args.domain, r#type);

    let query = Query::new(&args.domain, r#type).to_vec()?;
    if args.verbose {
        println!("query:\n{}", util::hexdump(&query));
    }

    let resp = client.exchange(&query).await?;
    if args.verbose {
        println!("response:\n{}", util::hexdump(&resp));
    }

    let response = Response::from_slice(&resp, r#type)?;
    if response.is_empty() {
        println!("{}", describe_empty(&args.domain, r#type, &response));
        return Ok(false);
    }

    for answer in &response.answers {
        if args.verbose {
            println!("{}", answer);
        } else {
            println!("{}", describe(&args.domain, &answer.resource));
        }
    }

    Ok(true)
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args = Args::parse();

    match run(args).await {
        Ok(true) => (),
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!(";; resolution failed: {}", e);
            process::exit(2);
        }
    }
}
