use bytes::Bytes;
use clap::{Parser, Subcommand, ValueEnum};
use respline::{Client, ClientConfig, Command, DEFAULT_HOST, DEFAULT_PORT};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = RespCli::parse();
    let mut config = ClientConfig::new(cli.host, cli.port).with_database(cli.db);
    if let Some(password) = cli.password {
        config = config.with_password(password);
    }
    if let Some(secs) = cli.connect_timeout {
        config = config.with_connect_timeout(Duration::from_secs(secs));
    }

    let mut client = Client::connect(config).await?;
    one_shot_command(&mut client, cli.command).await?;
    client.close().await?;

    Ok(())
}

async fn one_shot_command(client: &mut Client, subcommand: RespSubcommand) -> anyhow::Result<()> {
    match subcommand {
        RespSubcommand::Ping { msg } => {
            let response = client.ping(msg.map(Bytes::from)).await?;
            println!("{}", String::from_utf8_lossy(response.as_ref()));
        }
        RespSubcommand::Get { key } => {
            let response = client.get(&key).await?;
            if let Some(value) = response {
                println!("{}", String::from_utf8_lossy(value.as_ref()));
            } else {
                println!("(nil)");
            }
        }
        RespSubcommand::Set {
            key,
            value,
            expire_unit,
            expires,
        } => {
            let duration = to_duration(expire_unit, expires);
            if let Some(duration) = duration {
                client.set_expires(&key, &value, duration).await?;
            } else {
                client.set(&key, &value).await?;
            }
            println!("OK");
        }
        RespSubcommand::Del { keys } => {
            let removed = client.del(&keys).await?;
            println!("(integer) {removed}");
        }
        RespSubcommand::Raw { verb, args } => {
            let cmd = Command::new(&verb).args(&args);
            // error replies are printed like any other reply
            let reply = client.execute(&cmd).await?;
            println!("{reply}");
        }
    };

    Ok(())
}

#[derive(Debug, Parser)]
#[command(name = "respline-cli", version, author)]
/// A simple Redis cli client
struct RespCli {
    #[clap(subcommand)]
    command: RespSubcommand,
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,
    /// Password sent with AUTH before any other command.
    #[arg(long, env = "RESPLINE_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    /// Database index to SELECT.
    #[arg(long, default_value_t = 0)]
    db: i64,
    /// Give up connecting after this many seconds.
    #[arg(long)]
    connect_timeout: Option<u64>,
}

#[derive(Debug, Subcommand)]
/// Subcommand to execute in one-shot command mode.
enum RespSubcommand {
    /// Ping the server.
    Ping {
        /// Message to ping
        msg: Option<String>,
    },
    /// Get the value of key.
    Get {
        /// Name of key to get.
        key: String,
    },
    /// Set key to hold the string value.
    Set {
        /// Name of the key to set.
        key: String,
        /// Value to set.
        value: String,
        /// Expiration unit, can be either `ex` or `px`.
        #[arg(value_enum, requires = "expires")]
        expire_unit: Option<ExpirationUnit>,
        /// Expire the value after the specified amount of time.
        #[arg(requires = "expire_unit")]
        expires: Option<u64>,
    },
    /// Delete one or more keys.
    Del {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Send any command and print the reply.
    Raw {
        /// Command name, e.g. `HGETALL`.
        verb: String,
        args: Vec<String>,
    },
}

#[derive(Debug, Clone, ValueEnum)]
enum ExpirationUnit {
    EX,
    PX,
}

fn to_duration(unit: Option<ExpirationUnit>, expires: Option<u64>) -> Option<Duration> {
    match (unit, expires) {
        (Some(ExpirationUnit::EX), Some(expires)) => Some(Duration::from_secs(expires)),
        (Some(ExpirationUnit::PX), Some(expires)) => Some(Duration::from_millis(expires)),
        _ => None,
    }
}
