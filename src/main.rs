use clap::Parser;
use dotenvy::dotenv;
use log::error;
use std::path::PathBuf;
use tweet_archiver::archive::{self, ArchiveRequest};
use tweet_archiver::config::Credentials;
use tweet_archiver::twitter_client::TwitterClient;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Account whose timeline gets archived, without the leading @
    #[arg(short, long, env = "TWITTER_TARGET_ACCOUNT")]
    account: String,

    /// How many of the latest tweets to request
    #[arg(short = 'n', long, env = "TWEET_FETCH_COUNT", default_value_t = 20)]
    count: usize,

    /// Directory the JSON archive is written into
    #[arg(long, env = "TWEET_OUTPUT_DIR", default_value = "output")]
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .init();

    let args = Args::parse();
    let credentials = Credentials::from_env();
    let request = ArchiveRequest {
        account: args.account,
        count: args.count,
        output_dir: args.output_dir,
    };

    let mut twitter_client = TwitterClient::new();
    // A missing session cache just means the run starts unauthenticated.
    let _ = twitter_client.load_session();

    // Best-effort throughout: log whatever went wrong and exit normally.
    if let Err(err) = archive::run(&mut twitter_client, &credentials, &request).await {
        error!("Archive run failed: {err:#}");
    }
}
